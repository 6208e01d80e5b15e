use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::unit::{Unit, UnitId};

/// One civilization's unit table.
///
/// Several civilizations usually define the same unit ID with slightly
/// different values; each such copy is an independent record.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Civ {
    pub name: String,
    pub units: BTreeMap<UnitId, Unit>,
}

impl Civ {
    /// Create an empty civilization table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            units: BTreeMap::new(),
        }
    }
}

/// The full record set: all civilization variants, in file order.
///
/// The order of `civs` is significant to consumers that resolve conflicting
/// definitions of the same unit ID, so it is preserved as loaded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSet {
    pub civs: Vec<Civ>,
}

impl DataSet {
    /// Create an empty data set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over every distinct unit ID across all civilizations, in the
    /// order they are first encountered (civilization order, then ID order
    /// within a civilization).
    pub fn unit_ids(&self) -> Vec<UnitId> {
        let mut seen = Vec::new();
        for civ in &self.civs {
            for id in civ.units.keys() {
                if !seen.contains(id) {
                    seen.push(*id);
                }
            }
        }
        seen
    }
}
