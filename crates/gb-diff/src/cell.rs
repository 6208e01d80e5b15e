//! Tracked value cells.
//!
//! A [`TrackedField`] pairs a field's immutable base value with its current
//! value and a modified flag. The flag is derived: it is set exactly when
//! the current value differs from the base value under the field's equality
//! rules (set equality for attack/armor tables, field-wise for costs).
//!
//! Cells do not hold a reference back to their owning entry. Every mutation
//! returns the change it caused to the entry's modified-field count (-1, 0,
//! or +1), and the entry applies that delta immediately, so flag and count
//! can never disagree.

use crate::field::FieldValue;

/// One field's base value, current value, and modified flag.
#[derive(Clone, Debug)]
pub struct TrackedField {
    base: FieldValue,
    value: FieldValue,
    modified: bool,
}

impl TrackedField {
    /// Create a cell seeded with `base`; the current value starts equal to
    /// it and the cell is unmodified. The base value is fixed for the cell's
    /// lifetime.
    pub fn new(base: FieldValue) -> Self {
        Self {
            value: base.clone(),
            base,
            modified: false,
        }
    }

    /// The current value.
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// The base value the modified flag is measured against.
    pub fn base(&self) -> &FieldValue {
        &self.base
    }

    /// Whether the current value differs from the base value.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Assign a new current value, recomputing the modified flag by
    /// comparison against the base value. Assigning the base value back
    /// clears the flag.
    #[must_use = "apply the returned delta to the owning entry's modified count"]
    pub fn assign(&mut self, value: FieldValue) -> i32 {
        let modified = value != self.base;
        self.value = value;
        self.transition(modified)
    }

    /// Assign a value that is known to be modified, regardless of equality.
    ///
    /// Used on the load path, where the serialized flag is authoritative:
    /// a field only appears in the stream because it was modified when saved.
    #[must_use = "apply the returned delta to the owning entry's modified count"]
    pub fn force_assign(&mut self, value: FieldValue) -> i32 {
        self.value = value;
        self.transition(true)
    }

    /// Return the cell to its base value, unmodified.
    #[must_use = "apply the returned delta to the owning entry's modified count"]
    pub fn reset(&mut self) -> i32 {
        self.value = self.base.clone();
        self.transition(false)
    }

    fn transition(&mut self, modified: bool) -> i32 {
        let delta = match (self.modified, modified) {
            (false, true) => 1,
            (true, false) => -1,
            _ => 0,
        };
        self.modified = modified;
        delta
    }
}
