//! Record model for genie-balance.
//!
//! This crate provides the typed in-memory view of a game database that the
//! diff engine operates on: a [`DataSet`] of per-civilization unit tables,
//! where each [`Unit`] carries the balance-relevant fields plus optional
//! substructures that only some unit shapes have.
//!
//! # Key Types
//!
//! - [`DataSet`] / [`Civ`] — the full record set and its per-civilization variants
//! - [`Unit`] — one unit record with optional [`Moving`], [`Action`],
//!   [`Combat`], [`Creatable`], and [`Building`] substructures
//! - [`ResourceCost`] — one (type, amount, paid) cost slot
//! - [`UnitId`] — small integer key for unit records

pub mod dataset;
pub mod unit;

pub use dataset::{Civ, DataSet};
pub use unit::{Action, Building, Combat, Creatable, Moving, ResourceCost, Unit, UnitId};
