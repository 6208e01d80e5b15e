//! The diff store: all recorded balance changes, keyed by unit ID.

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, warn};

use gb_buffer::RamBuffer;
use gb_types::{DataSet, UnitId};

use crate::entry::UnitEntry;
use crate::error::{DiffError, DiffResult, MissingSubstructure};

/// The diff file format version this build writes and the newest it reads.
pub const FORMAT_VERSION: i32 = 1;

/// All balance changes against one base data set, keyed by unit ID.
///
/// Seeded with one [`UnitEntry`] per distinct unit ID across every
/// civilization of the base set; the first civilization defining an ID
/// supplies the base values, later ones never override. Entries are kept in
/// ID order, so saving the same store twice produces identical bytes.
#[derive(Clone, Debug)]
pub struct BalanceDiff {
    entries: BTreeMap<UnitId, UnitEntry>,
}

impl BalanceDiff {
    /// Seed a fresh store from a base data set, with no modifications.
    pub fn new(base: &DataSet) -> Self {
        let mut entries = BTreeMap::new();
        for civ in &base.civs {
            for (&id, unit) in &civ.units {
                entries
                    .entry(id)
                    .or_insert_with(|| UnitEntry::from_unit(unit));
            }
        }
        debug!(units = entries.len(), civs = base.civs.len(), "seeded diff store");
        Self { entries }
    }

    /// Seed from the base set, then merge the diff file at `path` on top.
    ///
    /// Fails with [`DiffError::UnsupportedVersion`] when the file was
    /// written by a newer format, without applying anything. Entries whose
    /// unit ID is absent from the base set are skipped whole; the rest of
    /// the file still loads.
    pub fn load(base: &DataSet, path: &Path) -> DiffResult<Self> {
        let mut buf = RamBuffer::from_file(path)?;
        let store = Self::from_buffer(base, &mut buf)?;
        debug!(path = %path.display(), modified = store.modified_entry_count(), "loaded diff file");
        Ok(store)
    }

    /// Same as [`BalanceDiff::load`], reading from an in-memory buffer.
    pub fn from_buffer(base: &DataSet, buf: &mut RamBuffer) -> DiffResult<Self> {
        let mut store = Self::new(base);

        let version = buf.read_i32()?;
        if version > FORMAT_VERSION {
            return Err(DiffError::UnsupportedVersion {
                version,
                supported: FORMAT_VERSION,
            });
        }

        let entry_count = buf.read_i32()?;
        for _ in 0..entry_count {
            let id = buf.read_i16()?;
            match store.entries.get_mut(&id) {
                Some(entry) => entry.read_from(buf)?,
                None => {
                    warn!(unit = id, "unknown unit id in diff file, skipping entry");
                    UnitEntry::skip_in(buf)?;
                }
            }
        }
        Ok(store)
    }

    /// Write the diff file at `path`.
    pub fn save(&self, path: &Path) -> DiffResult<()> {
        let buf = self.to_buffer();
        buf.save(path)?;
        debug!(path = %path.display(), modified = self.modified_entry_count(), bytes = buf.len(), "saved diff file");
        Ok(())
    }

    /// Encode the diff file into an in-memory buffer: the format version,
    /// the count of entries holding at least one modified field, then each
    /// such entry's ID and field data in ID order. Entries without
    /// modifications contribute nothing.
    pub fn to_buffer(&self) -> RamBuffer {
        let mut buf = RamBuffer::new();
        buf.write_i32(FORMAT_VERSION);

        let modified: Vec<(&UnitId, &UnitEntry)> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.modified_count() > 0)
            .collect();
        buf.write_i32(modified.len() as i32);

        for (&id, entry) in modified {
            buf.write_i16(id);
            entry.write_to(&mut buf);
        }
        buf
    }

    /// Write every modified field of every entry into the target data set.
    ///
    /// Each entry is applied to every civilization that contains its unit
    /// ID; civilizations without the ID are skipped. When a target unit's
    /// shape lacks a substructure a modified field needs, the failure is
    /// recorded and application continues; the returned error aggregates
    /// every unmet precondition across the whole apply.
    pub fn apply_to(&self, target: &mut DataSet) -> DiffResult<()> {
        let mut missing = Vec::new();
        for (&id, entry) in &self.entries {
            if entry.modified_count() == 0 {
                continue;
            }
            for (civ_index, civ) in target.civs.iter_mut().enumerate() {
                if let Some(unit) = civ.units.get_mut(&id) {
                    for field in entry.apply_to_unit(unit) {
                        missing.push(MissingSubstructure {
                            unit: id,
                            civ: civ_index,
                            field,
                        });
                    }
                }
            }
        }
        debug!(entries = self.modified_entry_count(), failures = missing.len(), "applied diff store");
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DiffError::MissingSubstructures(missing))
        }
    }

    /// The entry for a unit ID, if the base set defined it.
    pub fn entry(&self, id: UnitId) -> Option<&UnitEntry> {
        self.entries.get(&id)
    }

    /// Mutable access to a unit's entry, for editing its fields.
    pub fn entry_mut(&mut self, id: UnitId) -> Option<&mut UnitEntry> {
        self.entries.get_mut(&id)
    }

    /// All unit IDs, ascending.
    pub fn ids(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.entries.keys().copied()
    }

    /// Number of entries (one per distinct unit ID in the base set).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries with at least one modified field; what
    /// [`BalanceDiff::save`] will persist.
    pub fn modified_entry_count(&self) -> usize {
        self.entries
            .values()
            .filter(|entry| entry.modified_count() > 0)
            .count()
    }
}
