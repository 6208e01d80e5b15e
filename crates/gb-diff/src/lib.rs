//! Balance diff engine.
//!
//! Records field-level modifications made to a unit data set, persists only
//! the changes in a compact versioned binary file, and replays them onto the
//! same or a freshly loaded data set.
//!
//! A [`BalanceDiff`] is seeded from a base [`gb_types::DataSet`]: one
//! [`UnitEntry`] per distinct unit ID, each a table of tracked cells holding
//! the field's base value, current value, and a modified flag. Edits go
//! through [`UnitEntry::set`]; saving walks the entries and emits only
//! modified fields; loading seeds a fresh store and merges the file's
//! flagged fields on top; applying writes modified values into a target
//! data set.
//!
//! # Key Types
//!
//! - [`BalanceDiff`] — the store: seed, load, save, apply
//! - [`UnitEntry`] — one unit's tracked fields and modified-field count
//! - [`TrackedField`] — one field's base/current value and modified flag
//! - [`UnitField`] / [`FieldKind`] / [`FieldValue`] — the field descriptor table
//! - [`DiffError`] — version, type-mismatch, and apply-precondition errors
//!
//! # Wire format (version 1, little-endian)
//!
//! ```text
//! i32  format_version
//! i32  entry_count                  // entries with >= 1 modified field
//! per entry:
//!   i16  unit_id
//!   per field, in UnitField::ALL order:
//!     u8   modified_flag            // always present, even for fields
//!                                   // the unit's shape lacks
//!     payload if flag == 1, width per FieldKind
//! ```

pub mod cell;
pub mod entry;
pub mod error;
pub mod field;
pub mod store;

pub use cell::TrackedField;
pub use entry::UnitEntry;
pub use error::{DiffError, DiffResult, MissingSubstructure};
pub use field::{AttackArmorEntry, AttackArmorList, FieldKind, FieldValue, UnitField, FIELD_COUNT};
pub use store::{BalanceDiff, FORMAT_VERSION};
