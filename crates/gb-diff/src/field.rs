//! The field descriptor table.
//!
//! Every balance-relevant unit field is described by a [`UnitField`] variant.
//! The declaration order of the variants is the wire order of the diff file
//! format and must never be reordered without a format version bump. The
//! table drives seeding, serialization, and application generically, so the
//! schema lives here as data rather than as thirty-odd hand-written
//! read/write methods.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use gb_buffer::{BufferResult, RamBuffer};
use gb_types::{ResourceCost, Unit};

/// Number of tracked fields per unit entry.
pub const FIELD_COUNT: usize = 33;

/// Identifies one tracked field of a unit entry.
///
/// Variant order is the wire order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UnitField {
    // Main stats
    HitPoints,
    Speed,
    RotationSpeed,
    LineOfSight,
    SearchRadius,
    // Attack values
    MinRange,
    MaxRange,
    DisplayedRange,
    ReloadTime,
    DisplayedReloadTime,
    BlastRadius,
    Attacks,
    DisplayedAttack,
    // Projectile data
    ProjectileCount,
    ProjectileCountOnFullGarrison,
    ProjectileFrameDelay,
    ProjectileAccuracyPercent,
    ProjectileDispersion,
    ProjectileGraphicDisplacementX,
    ProjectileGraphicDisplacementY,
    ProjectileGraphicDisplacementZ,
    ProjectileSpawningAreaWidth,
    ProjectileSpawningAreaHeight,
    ProjectileSpawningAreaRandomness,
    // Armor values
    Armors,
    DisplayedMeleeArmor,
    DisplayedPierceArmor,
    // Garrison values
    GarrisonCapacity,
    GarrisonHealRateFactor,
    // Creation values
    TrainTime,
    Cost1,
    Cost2,
    Cost3,
}

impl UnitField {
    /// All fields in wire order.
    pub const ALL: [UnitField; FIELD_COUNT] = [
        UnitField::HitPoints,
        UnitField::Speed,
        UnitField::RotationSpeed,
        UnitField::LineOfSight,
        UnitField::SearchRadius,
        UnitField::MinRange,
        UnitField::MaxRange,
        UnitField::DisplayedRange,
        UnitField::ReloadTime,
        UnitField::DisplayedReloadTime,
        UnitField::BlastRadius,
        UnitField::Attacks,
        UnitField::DisplayedAttack,
        UnitField::ProjectileCount,
        UnitField::ProjectileCountOnFullGarrison,
        UnitField::ProjectileFrameDelay,
        UnitField::ProjectileAccuracyPercent,
        UnitField::ProjectileDispersion,
        UnitField::ProjectileGraphicDisplacementX,
        UnitField::ProjectileGraphicDisplacementY,
        UnitField::ProjectileGraphicDisplacementZ,
        UnitField::ProjectileSpawningAreaWidth,
        UnitField::ProjectileSpawningAreaHeight,
        UnitField::ProjectileSpawningAreaRandomness,
        UnitField::Armors,
        UnitField::DisplayedMeleeArmor,
        UnitField::DisplayedPierceArmor,
        UnitField::GarrisonCapacity,
        UnitField::GarrisonHealRateFactor,
        UnitField::TrainTime,
        UnitField::Cost1,
        UnitField::Cost2,
        UnitField::Cost3,
    ];

    /// Position in the wire order; indexes an entry's slot table.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Wire type of this field's payload.
    pub fn kind(self) -> FieldKind {
        use UnitField as F;
        match self {
            F::GarrisonCapacity | F::ProjectileCountOnFullGarrison => FieldKind::U8,
            F::HitPoints
            | F::DisplayedAttack
            | F::ProjectileFrameDelay
            | F::ProjectileAccuracyPercent
            | F::DisplayedMeleeArmor
            | F::DisplayedPierceArmor
            | F::TrainTime => FieldKind::I16,
            F::Attacks | F::Armors => FieldKind::List,
            F::Cost1 | F::Cost2 | F::Cost3 => FieldKind::Cost,
            _ => FieldKind::F32,
        }
    }

    /// Static label for diagnostics.
    pub fn name(self) -> &'static str {
        use UnitField as F;
        match self {
            F::HitPoints => "hit_points",
            F::Speed => "speed",
            F::RotationSpeed => "rotation_speed",
            F::LineOfSight => "line_of_sight",
            F::SearchRadius => "search_radius",
            F::MinRange => "min_range",
            F::MaxRange => "max_range",
            F::DisplayedRange => "displayed_range",
            F::ReloadTime => "reload_time",
            F::DisplayedReloadTime => "displayed_reload_time",
            F::BlastRadius => "blast_radius",
            F::Attacks => "attacks",
            F::DisplayedAttack => "displayed_attack",
            F::ProjectileCount => "projectile_count",
            F::ProjectileCountOnFullGarrison => "projectile_count_on_full_garrison",
            F::ProjectileFrameDelay => "projectile_frame_delay",
            F::ProjectileAccuracyPercent => "projectile_accuracy_percent",
            F::ProjectileDispersion => "projectile_dispersion",
            F::ProjectileGraphicDisplacementX => "projectile_graphic_displacement_x",
            F::ProjectileGraphicDisplacementY => "projectile_graphic_displacement_y",
            F::ProjectileGraphicDisplacementZ => "projectile_graphic_displacement_z",
            F::ProjectileSpawningAreaWidth => "projectile_spawning_area_width",
            F::ProjectileSpawningAreaHeight => "projectile_spawning_area_height",
            F::ProjectileSpawningAreaRandomness => "projectile_spawning_area_randomness",
            F::Armors => "armors",
            F::DisplayedMeleeArmor => "displayed_melee_armor",
            F::DisplayedPierceArmor => "displayed_pierce_armor",
            F::GarrisonCapacity => "garrison_capacity",
            F::GarrisonHealRateFactor => "garrison_heal_rate_factor",
            F::TrainTime => "train_time",
            F::Cost1 => "cost1",
            F::Cost2 => "cost2",
            F::Cost3 => "cost3",
        }
    }

    /// Read this field's current value out of a unit.
    ///
    /// Returns `None` when the unit's shape lacks the substructure the field
    /// lives in.
    pub fn extract(self, unit: &Unit) -> Option<FieldValue> {
        use FieldValue as V;
        use UnitField as F;
        match self {
            F::HitPoints => Some(V::I16(unit.hit_points)),
            F::Speed => Some(V::F32(unit.speed)),
            F::LineOfSight => Some(V::F32(unit.line_of_sight)),
            F::GarrisonCapacity => Some(V::U8(unit.garrison_capacity)),
            F::RotationSpeed => unit.moving.as_ref().map(|m| V::F32(m.rotation_speed)),
            F::SearchRadius => unit.action.as_ref().map(|a| V::F32(a.search_radius)),
            F::MinRange => unit.combat.as_ref().map(|c| V::F32(c.min_range)),
            F::MaxRange => unit.combat.as_ref().map(|c| V::F32(c.max_range)),
            F::DisplayedRange => unit.combat.as_ref().map(|c| V::F32(c.displayed_range)),
            F::ReloadTime => unit.combat.as_ref().map(|c| V::F32(c.reload_time)),
            F::DisplayedReloadTime => unit.combat.as_ref().map(|c| V::F32(c.displayed_reload_time)),
            F::BlastRadius => unit.combat.as_ref().map(|c| V::F32(c.blast_radius)),
            F::Attacks => unit
                .combat
                .as_ref()
                .map(|c| V::List(AttackArmorList::from_map(&c.attacks))),
            F::DisplayedAttack => unit.combat.as_ref().map(|c| V::I16(c.displayed_attack)),
            F::ProjectileFrameDelay => unit.combat.as_ref().map(|c| V::I16(c.projectile_frame_delay)),
            F::ProjectileAccuracyPercent => unit
                .combat
                .as_ref()
                .map(|c| V::I16(c.projectile_accuracy_percent)),
            F::ProjectileDispersion => unit.combat.as_ref().map(|c| V::F32(c.projectile_dispersion)),
            F::ProjectileGraphicDisplacementX => unit
                .combat
                .as_ref()
                .map(|c| V::F32(c.projectile_graphic_displacement[0])),
            F::ProjectileGraphicDisplacementY => unit
                .combat
                .as_ref()
                .map(|c| V::F32(c.projectile_graphic_displacement[1])),
            F::ProjectileGraphicDisplacementZ => unit
                .combat
                .as_ref()
                .map(|c| V::F32(c.projectile_graphic_displacement[2])),
            F::Armors => unit
                .combat
                .as_ref()
                .map(|c| V::List(AttackArmorList::from_map(&c.armors))),
            F::DisplayedMeleeArmor => unit.combat.as_ref().map(|c| V::I16(c.displayed_melee_armor)),
            F::ProjectileCount => unit.creatable.as_ref().map(|c| V::F32(c.projectile_count)),
            F::ProjectileCountOnFullGarrison => unit
                .creatable
                .as_ref()
                .map(|c| V::U8(c.projectile_count_on_full_garrison)),
            F::ProjectileSpawningAreaWidth => unit
                .creatable
                .as_ref()
                .map(|c| V::F32(c.projectile_spawning_area_width)),
            F::ProjectileSpawningAreaHeight => unit
                .creatable
                .as_ref()
                .map(|c| V::F32(c.projectile_spawning_area_height)),
            F::ProjectileSpawningAreaRandomness => unit
                .creatable
                .as_ref()
                .map(|c| V::F32(c.projectile_spawning_area_randomness)),
            F::DisplayedPierceArmor => unit.creatable.as_ref().map(|c| V::I16(c.displayed_pierce_armor)),
            F::TrainTime => unit.creatable.as_ref().map(|c| V::I16(c.train_time)),
            F::Cost1 => unit.creatable.as_ref().map(|c| V::Cost(c.resource_costs[0])),
            F::Cost2 => unit.creatable.as_ref().map(|c| V::Cost(c.resource_costs[1])),
            F::Cost3 => unit.creatable.as_ref().map(|c| V::Cost(c.resource_costs[2])),
            F::GarrisonHealRateFactor => unit
                .building
                .as_ref()
                .map(|b| V::F32(b.garrison_heal_rate_factor)),
        }
    }

    /// Write `value` into the unit's corresponding nested field.
    ///
    /// Returns `false` when the substructure holding the field is absent
    /// from the unit's shape (or on a kind mismatch, which callers rule out
    /// by construction).
    pub fn inject(self, unit: &mut Unit, value: &FieldValue) -> bool {
        use FieldValue as V;
        use UnitField as F;
        match (self, value) {
            (F::HitPoints, V::I16(v)) => {
                unit.hit_points = *v;
                true
            }
            (F::Speed, V::F32(v)) => {
                unit.speed = *v;
                true
            }
            (F::LineOfSight, V::F32(v)) => {
                unit.line_of_sight = *v;
                true
            }
            (F::GarrisonCapacity, V::U8(v)) => {
                unit.garrison_capacity = *v;
                true
            }
            (F::RotationSpeed, V::F32(v)) => set_moving(unit, |m| m.rotation_speed = *v),
            (F::SearchRadius, V::F32(v)) => set_action(unit, |a| a.search_radius = *v),
            (F::MinRange, V::F32(v)) => set_combat(unit, |c| c.min_range = *v),
            (F::MaxRange, V::F32(v)) => set_combat(unit, |c| c.max_range = *v),
            (F::DisplayedRange, V::F32(v)) => set_combat(unit, |c| c.displayed_range = *v),
            (F::ReloadTime, V::F32(v)) => set_combat(unit, |c| c.reload_time = *v),
            (F::DisplayedReloadTime, V::F32(v)) => set_combat(unit, |c| c.displayed_reload_time = *v),
            (F::BlastRadius, V::F32(v)) => set_combat(unit, |c| c.blast_radius = *v),
            (F::Attacks, V::List(v)) => set_combat(unit, |c| c.attacks = v.to_map()),
            (F::DisplayedAttack, V::I16(v)) => set_combat(unit, |c| c.displayed_attack = *v),
            (F::ProjectileFrameDelay, V::I16(v)) => set_combat(unit, |c| c.projectile_frame_delay = *v),
            (F::ProjectileAccuracyPercent, V::I16(v)) => {
                set_combat(unit, |c| c.projectile_accuracy_percent = *v)
            }
            (F::ProjectileDispersion, V::F32(v)) => set_combat(unit, |c| c.projectile_dispersion = *v),
            (F::ProjectileGraphicDisplacementX, V::F32(v)) => {
                set_combat(unit, |c| c.projectile_graphic_displacement[0] = *v)
            }
            (F::ProjectileGraphicDisplacementY, V::F32(v)) => {
                set_combat(unit, |c| c.projectile_graphic_displacement[1] = *v)
            }
            (F::ProjectileGraphicDisplacementZ, V::F32(v)) => {
                set_combat(unit, |c| c.projectile_graphic_displacement[2] = *v)
            }
            (F::Armors, V::List(v)) => set_combat(unit, |c| c.armors = v.to_map()),
            (F::DisplayedMeleeArmor, V::I16(v)) => set_combat(unit, |c| c.displayed_melee_armor = *v),
            (F::ProjectileCount, V::F32(v)) => set_creatable(unit, |c| c.projectile_count = *v),
            (F::ProjectileCountOnFullGarrison, V::U8(v)) => {
                set_creatable(unit, |c| c.projectile_count_on_full_garrison = *v)
            }
            (F::ProjectileSpawningAreaWidth, V::F32(v)) => {
                set_creatable(unit, |c| c.projectile_spawning_area_width = *v)
            }
            (F::ProjectileSpawningAreaHeight, V::F32(v)) => {
                set_creatable(unit, |c| c.projectile_spawning_area_height = *v)
            }
            (F::ProjectileSpawningAreaRandomness, V::F32(v)) => {
                set_creatable(unit, |c| c.projectile_spawning_area_randomness = *v)
            }
            (F::DisplayedPierceArmor, V::I16(v)) => {
                set_creatable(unit, |c| c.displayed_pierce_armor = *v)
            }
            (F::TrainTime, V::I16(v)) => set_creatable(unit, |c| c.train_time = *v),
            (F::Cost1, V::Cost(v)) => set_creatable(unit, |c| c.resource_costs[0] = *v),
            (F::Cost2, V::Cost(v)) => set_creatable(unit, |c| c.resource_costs[1] = *v),
            (F::Cost3, V::Cost(v)) => set_creatable(unit, |c| c.resource_costs[2] = *v),
            (F::GarrisonHealRateFactor, V::F32(v)) => {
                set_building(unit, |b| b.garrison_heal_rate_factor = *v)
            }
            _ => false,
        }
    }
}

impl fmt::Display for UnitField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn set_moving(unit: &mut Unit, set: impl FnOnce(&mut gb_types::Moving)) -> bool {
    match unit.moving.as_mut() {
        Some(m) => {
            set(m);
            true
        }
        None => false,
    }
}

fn set_action(unit: &mut Unit, set: impl FnOnce(&mut gb_types::Action)) -> bool {
    match unit.action.as_mut() {
        Some(a) => {
            set(a);
            true
        }
        None => false,
    }
}

fn set_combat(unit: &mut Unit, set: impl FnOnce(&mut gb_types::Combat)) -> bool {
    match unit.combat.as_mut() {
        Some(c) => {
            set(c);
            true
        }
        None => false,
    }
}

fn set_creatable(unit: &mut Unit, set: impl FnOnce(&mut gb_types::Creatable)) -> bool {
    match unit.creatable.as_mut() {
        Some(c) => {
            set(c);
            true
        }
        None => false,
    }
}

fn set_building(unit: &mut Unit, set: impl FnOnce(&mut gb_types::Building)) -> bool {
    match unit.building.as_mut() {
        Some(b) => {
            set(b);
            true
        }
        None => false,
    }
}

/// Wire type of a field payload.
///
/// Widths are fixed by the schema: `U8` is one byte, `I16` two bytes signed,
/// `F32` four bytes IEEE, `List` a 4-byte count followed by 4-byte pairs,
/// `Cost` three 2-byte signed fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    U8,
    I16,
    F32,
    List,
    Cost,
}

impl FieldKind {
    /// Decode one payload of this kind at the buffer cursor.
    pub fn read_payload(self, buf: &mut RamBuffer) -> BufferResult<FieldValue> {
        Ok(match self {
            FieldKind::U8 => FieldValue::U8(buf.read_u8()?),
            FieldKind::I16 => FieldValue::I16(buf.read_i16()?),
            FieldKind::F32 => FieldValue::F32(buf.read_f32()?),
            FieldKind::List => {
                let count = buf.read_i32()?;
                // Each pair is 4 bytes; a corrupt count cannot allocate more
                // than the buffer could hold.
                let capacity = (count.max(0) as usize).min(buf.remaining() / 4);
                let mut entries = Vec::with_capacity(capacity);
                for _ in 0..count {
                    entries.push(AttackArmorEntry {
                        armor_class: buf.read_u16()?,
                        amount: buf.read_u16()?,
                    });
                }
                FieldValue::List(AttackArmorList::new(entries))
            }
            FieldKind::Cost => FieldValue::Cost(ResourceCost {
                resource_type: buf.read_i16()?,
                amount: buf.read_i16()?,
                paid: buf.read_i16()?,
            }),
        })
    }

    /// Consume one payload of this kind without keeping it. Used to skip
    /// entries for record IDs the current base set does not know.
    pub fn skip_payload(self, buf: &mut RamBuffer) -> BufferResult<()> {
        self.read_payload(buf).map(|_| ())
    }
}

/// One tracked field's value, tagged by wire type.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    U8(u8),
    I16(i16),
    F32(f32),
    List(AttackArmorList),
    Cost(ResourceCost),
}

impl FieldValue {
    /// The wire type of this value.
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldValue::U8(_) => FieldKind::U8,
            FieldValue::I16(_) => FieldKind::I16,
            FieldValue::F32(_) => FieldKind::F32,
            FieldValue::List(_) => FieldKind::List,
            FieldValue::Cost(_) => FieldKind::Cost,
        }
    }

    /// Encode this value's payload at the end of the buffer.
    pub fn write_payload(&self, buf: &mut RamBuffer) {
        match self {
            FieldValue::U8(v) => buf.write_u8(*v),
            FieldValue::I16(v) => buf.write_i16(*v),
            FieldValue::F32(v) => buf.write_f32(*v),
            FieldValue::List(list) => {
                buf.write_i32(list.entries().len() as i32);
                for entry in list.entries() {
                    buf.write_u16(entry.armor_class);
                    buf.write_u16(entry.amount);
                }
            }
            FieldValue::Cost(cost) => {
                buf.write_i16(cost.resource_type);
                buf.write_i16(cost.amount);
                buf.write_i16(cost.paid);
            }
        }
    }
}

/// One (armor class, amount) pair of an attack or armor table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttackArmorEntry {
    pub armor_class: u16,
    pub amount: u16,
}

/// An ordered attack/armor table that compares by set equality.
///
/// The wire format preserves the order entries were written in, but two
/// tables holding the same (class, amount) pairs are the same table no
/// matter the order, so equality ignores ordering (and multiplicity).
#[derive(Clone, Debug, Default)]
pub struct AttackArmorList(Vec<AttackArmorEntry>);

impl AttackArmorList {
    /// Wrap a list of entries, preserving their order.
    pub fn new(entries: Vec<AttackArmorEntry>) -> Self {
        Self(entries)
    }

    /// Build from a class-keyed map, in ascending class order.
    pub fn from_map(map: &BTreeMap<u16, u16>) -> Self {
        Self(
            map.iter()
                .map(|(&armor_class, &amount)| AttackArmorEntry { armor_class, amount })
                .collect(),
        )
    }

    /// Convert back into a class-keyed map. Duplicate classes keep the last
    /// entry's amount.
    pub fn to_map(&self) -> BTreeMap<u16, u16> {
        self.0.iter().map(|e| (e.armor_class, e.amount)).collect()
    }

    /// The entries in stored order.
    pub fn entries(&self) -> &[AttackArmorEntry] {
        &self.0
    }
}

impl PartialEq for AttackArmorList {
    fn eq(&self, other: &Self) -> bool {
        let a: BTreeSet<AttackArmorEntry> = self.0.iter().copied().collect();
        let b: BTreeSet<AttackArmorEntry> = other.0.iter().copied().collect();
        a == b
    }
}

impl Eq for AttackArmorList {}

impl FromIterator<AttackArmorEntry> for AttackArmorList {
    fn from_iter<I: IntoIterator<Item = AttackArmorEntry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_types::{Combat, Unit};

    fn aae(armor_class: u16, amount: u16) -> AttackArmorEntry {
        AttackArmorEntry { armor_class, amount }
    }

    #[test]
    fn wire_order_matches_indices() {
        for (i, field) in UnitField::ALL.iter().enumerate() {
            assert_eq!(field.index(), i, "field {field} out of order");
        }
    }

    #[test]
    fn list_equality_ignores_order() {
        let a = AttackArmorList::new(vec![aae(3, 5), aae(4, 2)]);
        let b = AttackArmorList::new(vec![aae(4, 2), aae(3, 5)]);
        assert_eq!(a, b);

        let c = AttackArmorList::new(vec![aae(4, 2), aae(3, 6)]);
        assert_ne!(a, c);
    }

    #[test]
    fn payload_roundtrip_every_kind() {
        let values = [
            FieldValue::U8(200),
            FieldValue::I16(-42),
            FieldValue::F32(0.875),
            FieldValue::List(AttackArmorList::new(vec![aae(1, 9), aae(2, 8)])),
            FieldValue::Cost(ResourceCost {
                resource_type: 0,
                amount: 60,
                paid: 1,
            }),
        ];
        for value in values {
            let mut buf = RamBuffer::new();
            value.write_payload(&mut buf);
            let decoded = value.kind().read_payload(&mut buf).unwrap();
            assert_eq!(decoded, value);
            assert_eq!(buf.remaining(), 0, "payload not fully consumed");
        }
    }

    #[test]
    fn extract_absent_substructure_is_none() {
        let unit = Unit::default();
        assert!(UnitField::HitPoints.extract(&unit).is_some());
        assert!(UnitField::MinRange.extract(&unit).is_none());
        assert!(UnitField::Cost1.extract(&unit).is_none());
    }

    #[test]
    fn inject_reports_missing_substructure() {
        let mut unit = Unit::default();
        assert!(!UnitField::MinRange.inject(&mut unit, &FieldValue::F32(2.0)));

        unit.combat = Some(Combat::default());
        assert!(UnitField::MinRange.inject(&mut unit, &FieldValue::F32(2.0)));
        assert_eq!(unit.combat.as_ref().unwrap().min_range, 2.0);
    }

    #[test]
    fn inject_list_replaces_class_map() {
        let mut unit = Unit {
            combat: Some(Combat::default()),
            ..Unit::default()
        };
        let list = FieldValue::List(AttackArmorList::new(vec![aae(3, 7), aae(1, 4)]));
        assert!(UnitField::Attacks.inject(&mut unit, &list));
        let attacks = &unit.combat.as_ref().unwrap().attacks;
        assert_eq!(attacks.get(&3), Some(&7));
        assert_eq!(attacks.get(&1), Some(&4));
        assert_eq!(attacks.len(), 2);
    }
}
