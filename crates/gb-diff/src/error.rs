use std::fmt;

use thiserror::Error;

use gb_buffer::BufferError;
use gb_types::UnitId;

use crate::field::{FieldKind, UnitField};

#[derive(Debug, Error)]
pub enum DiffError {
    #[error("file format version {version} is newer than supported version {supported}")]
    UnsupportedVersion { version: i32, supported: i32 },

    #[error("value of kind {actual:?} assigned to field {field}, which expects {expected:?}")]
    FieldTypeMismatch {
        field: UnitField,
        expected: FieldKind,
        actual: FieldKind,
    },

    #[error("apply target is missing substructures: {}", format_missing(.0))]
    MissingSubstructures(Vec<MissingSubstructure>),

    #[error("buffer error: {0}")]
    Buffer(#[from] BufferError),
}

pub type DiffResult<T> = Result<T, DiffError>;

/// One unmet precondition found while applying a diff: the target unit's
/// shape lacks the substructure a modified field lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MissingSubstructure {
    pub unit: UnitId,
    pub civ: usize,
    pub field: UnitField,
}

impl fmt::Display for MissingSubstructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unit {} civ {} field {}", self.unit, self.civ, self.field)
    }
}

fn format_missing(missing: &[MissingSubstructure]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
