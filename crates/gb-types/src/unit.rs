use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Small integer key identifying a unit record within a civilization table.
pub type UnitId = i16;

/// One unit record, reduced to the balance-relevant fields.
///
/// The substructures mirror the optional sections of the underlying game
/// database: a non-moving unit has no [`Moving`] section, a unit that cannot
/// fight has no [`Combat`] section, and so on. Which sections exist is part
/// of the unit's shape and never changes after loading.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub hit_points: i16,
    pub speed: f32,
    pub line_of_sight: f32,
    pub garrison_capacity: u8,
    pub moving: Option<Moving>,
    pub action: Option<Action>,
    pub combat: Option<Combat>,
    pub creatable: Option<Creatable>,
    pub building: Option<Building>,
}

/// Movement attributes of units that can travel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Moving {
    pub rotation_speed: f32,
}

/// Attributes of units that act on their own (gather, hunt, patrol).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub search_radius: f32,
}

/// Combat attributes: ranges, reload, attack and armor tables, projectile
/// behavior.
///
/// `attacks` and `armors` map an armor class to an amount; classes absent
/// from the map do not participate in damage calculation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Combat {
    pub min_range: f32,
    pub max_range: f32,
    pub displayed_range: f32,
    pub reload_time: f32,
    pub displayed_reload_time: f32,
    pub blast_radius: f32,
    pub attacks: BTreeMap<u16, u16>,
    pub displayed_attack: i16,
    pub projectile_frame_delay: i16,
    pub projectile_accuracy_percent: i16,
    pub projectile_dispersion: f32,
    pub projectile_graphic_displacement: [f32; 3],
    pub armors: BTreeMap<u16, u16>,
    pub displayed_melee_armor: i16,
}

/// Attributes of units that can be trained or built.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Creatable {
    pub projectile_count: f32,
    pub projectile_count_on_full_garrison: u8,
    pub projectile_spawning_area_width: f32,
    pub projectile_spawning_area_height: f32,
    pub projectile_spawning_area_randomness: f32,
    pub displayed_pierce_armor: i16,
    pub train_time: i16,
    pub resource_costs: [ResourceCost; 3],
}

/// Building-only attributes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub garrison_heal_rate_factor: f32,
}

/// One resource cost slot of a creatable unit.
///
/// `paid` distinguishes costs that are deducted from storage from costs that
/// are only required to be present. It is a small integer on the wire, not a
/// bool, and is kept that way here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCost {
    pub resource_type: i16,
    pub amount: i16,
    pub paid: i16,
}
