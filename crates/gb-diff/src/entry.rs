//! Per-unit entries: the full set of tracked fields for one unit ID.

use gb_buffer::RamBuffer;
use gb_types::Unit;

use crate::cell::TrackedField;
use crate::error::{DiffError, DiffResult};
use crate::field::{FieldValue, UnitField, FIELD_COUNT};

/// All tracked fields of one unit, plus the running modified-field count.
///
/// Slots follow the wire order of [`UnitField::ALL`]. A `None` slot means
/// the unit's shape lacks the substructure the field lives in; such fields
/// still occupy their flag byte on the wire (always 0) so that an entry's
/// byte length never depends on which base set seeded it.
#[derive(Clone, Debug)]
pub struct UnitEntry {
    fields: [Option<TrackedField>; FIELD_COUNT],
    modified_count: usize,
}

impl UnitEntry {
    /// Seed an entry from a unit's current values. Every present field
    /// becomes an unmodified cell whose base value is the unit's value.
    pub fn from_unit(unit: &Unit) -> Self {
        let fields = std::array::from_fn(|i| {
            UnitField::ALL[i].extract(unit).map(TrackedField::new)
        });
        Self {
            fields,
            modified_count: 0,
        }
    }

    /// Whether the unit's shape has this field at all.
    pub fn has_field(&self, field: UnitField) -> bool {
        self.fields[field.index()].is_some()
    }

    /// The field's current value, or `None` when the field is absent from
    /// the unit's shape.
    pub fn get(&self, field: UnitField) -> Option<&FieldValue> {
        self.fields[field.index()].as_ref().map(TrackedField::value)
    }

    /// The field's base value.
    pub fn base(&self, field: UnitField) -> Option<&FieldValue> {
        self.fields[field.index()].as_ref().map(TrackedField::base)
    }

    /// Whether the field currently differs from its base value. Absent
    /// fields are never modified.
    pub fn is_modified(&self, field: UnitField) -> bool {
        self.fields[field.index()]
            .as_ref()
            .is_some_and(TrackedField::is_modified)
    }

    /// Number of fields currently flagged as modified. An entry with a zero
    /// count is not persisted at all.
    pub fn modified_count(&self) -> usize {
        self.modified_count
    }

    /// Assign a new current value to a field.
    ///
    /// The value's wire kind must match the field's; assigning to a field
    /// the unit's shape lacks is a no-op. Returns whether the field is
    /// modified after the assignment.
    pub fn set(&mut self, field: UnitField, value: FieldValue) -> DiffResult<bool> {
        if value.kind() != field.kind() {
            return Err(DiffError::FieldTypeMismatch {
                field,
                expected: field.kind(),
                actual: value.kind(),
            });
        }
        match &mut self.fields[field.index()] {
            Some(cell) => {
                let delta = cell.assign(value);
                let modified = cell.is_modified();
                self.bump(delta);
                Ok(modified)
            }
            None => Ok(false),
        }
    }

    /// Read an entry's field data at the buffer cursor, replacing any edits
    /// this entry held before.
    ///
    /// Every cell first returns to its base value. Then one flag byte per
    /// schema field is consumed in wire order; a set flag is followed by the
    /// field's payload, which is force-assigned into the cell. Payloads for
    /// fields this entry's shape lacks are consumed and discarded so the
    /// stream stays aligned.
    pub fn read_from(&mut self, buf: &mut RamBuffer) -> DiffResult<()> {
        for cell in self.fields.iter_mut().flatten() {
            let _ = cell.reset();
        }
        self.modified_count = 0;

        for field in UnitField::ALL {
            if buf.read_u8()? != 1 {
                continue;
            }
            let value = field.kind().read_payload(buf)?;
            if let Some(cell) = &mut self.fields[field.index()] {
                let delta = cell.force_assign(value);
                self.bump(delta);
            }
        }
        Ok(())
    }

    /// Write this entry's field data at the end of the buffer: one flag
    /// byte per schema field in wire order, each set flag followed by the
    /// field's payload.
    pub fn write_to(&self, buf: &mut RamBuffer) {
        for field in UnitField::ALL {
            match &self.fields[field.index()] {
                Some(cell) if cell.is_modified() => {
                    buf.write_u8(1);
                    cell.value().write_payload(buf);
                }
                _ => buf.write_u8(0),
            }
        }
    }

    /// Consume exactly one entry's bytes at the buffer cursor without
    /// assigning them anywhere. Entries are self-delimiting (every field
    /// contributes its flag byte and, when flagged, a fixed-width payload),
    /// so entries for unknown unit IDs can be skipped without losing stream
    /// alignment.
    pub fn skip_in(buf: &mut RamBuffer) -> DiffResult<()> {
        for field in UnitField::ALL {
            if buf.read_u8()? == 1 {
                field.kind().skip_payload(buf)?;
            }
        }
        Ok(())
    }

    /// Write every modified field's current value into the target unit.
    ///
    /// Returns the fields that could not be applied because the target's
    /// shape lacks the required substructure; all other fields are applied
    /// regardless.
    pub fn apply_to_unit(&self, unit: &mut Unit) -> Vec<UnitField> {
        let mut missing = Vec::new();
        for field in UnitField::ALL {
            if let Some(cell) = &self.fields[field.index()] {
                if cell.is_modified() && !field.inject(unit, cell.value()) {
                    missing.push(field);
                }
            }
        }
        missing
    }

    fn bump(&mut self, delta: i32) {
        match delta {
            1 => self.modified_count += 1,
            -1 => self.modified_count -= 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gb_types::{Combat, Creatable, Moving, ResourceCost, Unit};

    fn archer() -> Unit {
        Unit {
            hit_points: 30,
            speed: 0.96,
            line_of_sight: 6.0,
            garrison_capacity: 0,
            moving: Some(Moving { rotation_speed: 0.0 }),
            action: None,
            combat: Some(Combat {
                max_range: 4.0,
                reload_time: 2.0,
                attacks: [(3, 4)].into(),
                armors: [(3, 0), (4, 0)].into(),
                ..Combat::default()
            }),
            creatable: Some(Creatable {
                train_time: 35,
                resource_costs: [
                    ResourceCost { resource_type: 0, amount: 25, paid: 1 },
                    ResourceCost { resource_type: 3, amount: 45, paid: 1 },
                    ResourceCost::default(),
                ],
                ..Creatable::default()
            }),
            building: None,
        }
    }

    fn modified_count_by_recount(entry: &UnitEntry) -> usize {
        UnitField::ALL
            .iter()
            .filter(|f| entry.is_modified(**f))
            .count()
    }

    #[test]
    fn seed_has_no_modifications() {
        let entry = UnitEntry::from_unit(&archer());
        assert_eq!(entry.modified_count(), 0);
        assert!(entry.has_field(UnitField::MaxRange));
        assert!(!entry.has_field(UnitField::SearchRadius));
        assert!(!entry.has_field(UnitField::GarrisonHealRateFactor));
    }

    #[test]
    fn count_matches_flags_after_every_assignment() {
        let mut entry = UnitEntry::from_unit(&archer());

        entry.set(UnitField::HitPoints, FieldValue::I16(45)).unwrap();
        assert_eq!(entry.modified_count(), modified_count_by_recount(&entry));
        assert_eq!(entry.modified_count(), 1);

        entry.set(UnitField::MaxRange, FieldValue::F32(5.0)).unwrap();
        assert_eq!(entry.modified_count(), modified_count_by_recount(&entry));
        assert_eq!(entry.modified_count(), 2);

        // Back to base.
        entry.set(UnitField::HitPoints, FieldValue::I16(30)).unwrap();
        assert_eq!(entry.modified_count(), modified_count_by_recount(&entry));
        assert_eq!(entry.modified_count(), 1);
    }

    #[test]
    fn set_on_absent_field_is_a_noop() {
        let mut entry = UnitEntry::from_unit(&archer());
        let changed = entry
            .set(UnitField::SearchRadius, FieldValue::F32(9.0))
            .unwrap();
        assert!(!changed);
        assert_eq!(entry.modified_count(), 0);
    }

    #[test]
    fn set_rejects_kind_mismatch() {
        let mut entry = UnitEntry::from_unit(&archer());
        let err = entry
            .set(UnitField::HitPoints, FieldValue::F32(45.0))
            .unwrap_err();
        assert!(matches!(err, DiffError::FieldTypeMismatch { .. }));
    }

    #[test]
    fn entry_wire_roundtrip() {
        let unit = archer();
        let mut entry = UnitEntry::from_unit(&unit);
        entry.set(UnitField::HitPoints, FieldValue::I16(45)).unwrap();
        entry.set(UnitField::ReloadTime, FieldValue::F32(1.8)).unwrap();
        entry
            .set(
                UnitField::Cost1,
                FieldValue::Cost(ResourceCost {
                    resource_type: 0,
                    amount: 30,
                    paid: 1,
                }),
            )
            .unwrap();

        let mut buf = RamBuffer::new();
        entry.write_to(&mut buf);

        let mut loaded = UnitEntry::from_unit(&unit);
        loaded.read_from(&mut buf).unwrap();
        assert_eq!(buf.remaining(), 0);

        assert_eq!(loaded.modified_count(), 3);
        assert_eq!(loaded.get(UnitField::HitPoints), Some(&FieldValue::I16(45)));
        assert_eq!(loaded.get(UnitField::ReloadTime), Some(&FieldValue::F32(1.8)));
        assert!(loaded.is_modified(UnitField::Cost1));
        // Untouched fields stay at base.
        assert!(!loaded.is_modified(UnitField::Speed));
        assert_eq!(loaded.get(UnitField::MaxRange), Some(&FieldValue::F32(4.0)));
    }

    #[test]
    fn read_replaces_prior_edits() {
        let unit = archer();

        let mut saved = UnitEntry::from_unit(&unit);
        saved.set(UnitField::HitPoints, FieldValue::I16(45)).unwrap();
        let mut buf = RamBuffer::new();
        saved.write_to(&mut buf);

        let mut entry = UnitEntry::from_unit(&unit);
        entry.set(UnitField::MaxRange, FieldValue::F32(9.0)).unwrap();
        entry.read_from(&mut buf).unwrap();

        assert_eq!(entry.modified_count(), 1);
        assert!(entry.is_modified(UnitField::HitPoints));
        assert!(!entry.is_modified(UnitField::MaxRange));
        assert_eq!(entry.get(UnitField::MaxRange), Some(&FieldValue::F32(4.0)));
    }

    #[test]
    fn absent_fields_still_occupy_flag_bytes() {
        // A unit with no substructures writes one 0 flag byte per schema
        // field and nothing else.
        let bare = Unit::default();
        let entry = UnitEntry::from_unit(&bare);
        let mut buf = RamBuffer::new();
        entry.write_to(&mut buf);
        assert_eq!(buf.len(), FIELD_COUNT);
    }

    #[test]
    fn skip_consumes_exactly_one_entry() {
        let unit = archer();
        let mut entry = UnitEntry::from_unit(&unit);
        entry.set(UnitField::HitPoints, FieldValue::I16(1)).unwrap();
        entry
            .set(
                UnitField::Attacks,
                FieldValue::List(
                    [crate::field::AttackArmorEntry { armor_class: 3, amount: 9 }]
                        .into_iter()
                        .collect(),
                ),
            )
            .unwrap();

        let mut buf = RamBuffer::new();
        entry.write_to(&mut buf);
        buf.write_i16(0x55AA); // sentinel after the entry

        UnitEntry::skip_in(&mut buf).unwrap();
        assert_eq!(buf.read_i16().unwrap(), 0x55AA);
    }

    #[test]
    fn apply_writes_only_modified_fields() {
        let mut entry = UnitEntry::from_unit(&archer());
        entry.set(UnitField::HitPoints, FieldValue::I16(45)).unwrap();
        entry.set(UnitField::ReloadTime, FieldValue::F32(1.5)).unwrap();

        let mut target = archer();
        target.speed = 1.2; // diverged field that must not be touched
        let missing = entry.apply_to_unit(&mut target);

        assert!(missing.is_empty());
        assert_eq!(target.hit_points, 45);
        assert_eq!(target.combat.as_ref().unwrap().reload_time, 1.5);
        assert_eq!(target.speed, 1.2);
    }

    #[test]
    fn apply_reports_missing_substructure() {
        let mut entry = UnitEntry::from_unit(&archer());
        entry.set(UnitField::HitPoints, FieldValue::I16(45)).unwrap();
        entry.set(UnitField::ReloadTime, FieldValue::F32(1.5)).unwrap();

        let mut target = archer();
        target.combat = None;
        let missing = entry.apply_to_unit(&mut target);

        assert_eq!(missing, vec![UnitField::ReloadTime]);
        // The satisfiable field was still applied.
        assert_eq!(target.hit_points, 45);
    }
}
