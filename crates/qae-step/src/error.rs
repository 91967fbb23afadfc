//! Error types for the step model
//!
//! Covers violations of the sequence invariants (contiguous `order`,
//! unique `id`) and parsing of the action vocabulary.

/// Step model errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// Two steps share an id
    #[error("duplicate step id: '{0}'")]
    DuplicateId(String),

    /// `order` is not a contiguous permutation of `0..n`
    #[error("non-contiguous order at position {position}: expected {expected}, got {actual}")]
    NonContiguousOrder {
        /// Position in the slice
        position: usize,
        /// Order the position should carry
        expected: usize,
        /// Order found
        actual: usize,
    },

    /// Index outside the sequence
    #[error("index {index} out of range for sequence of {len} steps")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Sequence length
        len: usize,
    },

    /// Action name outside the closed vocabulary
    #[error("unknown action: '{0}'")]
    UnknownAction(String),
}

impl StepError {
    /// Create out-of-range error
    #[inline]
    #[must_use]
    pub fn out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }
}

/// Result alias for step operations
pub type StepResult<T> = Result<T, StepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_id_display() {
        let err = StepError::DuplicateId("step-1".to_string());
        assert_eq!(err.to_string(), "duplicate step id: 'step-1'");
    }

    #[test]
    fn out_of_range_display() {
        let err = StepError::out_of_range(4, 3);
        assert!(err.to_string().contains("out of range"));
    }
}
