//! Policy construction errors

use thiserror::Error;

/// Result type for policy construction and validation
pub type PolicyResult<T> = Result<T, PolicyError>;

/// Policy error types
///
/// These can only occur while validating configuration at construction time.
/// The collection callbacks themselves never fail: invariant violations there
/// indicate a collector bug and are checked with debug assertions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    /// Alignment is zero or not a power of two
    #[error("alignment must be a nonzero power of two, got {alignment}")]
    InvalidAlignment { alignment: u64 },
    /// A size parameter is not a multiple of the alignment
    #[error("{name} = {value} is not aligned to {alignment}")]
    UnalignedParameter {
        name: &'static str,
        value: u64,
        alignment: u64,
    },
    /// A size parameter is below the minimum space size
    #[error("{name} = {value} is below the minimum space size {min}")]
    BelowMinimumSpace {
        name: &'static str,
        value: u64,
        min: u64,
    },
    /// A size exceeds the maximum configured for its space
    #[error("{name} = {value} exceeds its maximum {max}")]
    AboveMaximumSpace {
        name: &'static str,
        value: u64,
        max: u64,
    },
    /// Tenuring threshold outside the permitted range
    #[error("tenuring threshold {value} outside [1, {max}]")]
    TenuringThresholdOutOfRange { value: u32, max: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PolicyError::InvalidAlignment { alignment: 3 };
        assert_eq!(
            err.to_string(),
            "alignment must be a nonzero power of two, got 3"
        );

        let err = PolicyError::BelowMinimumSpace {
            name: "eden_size",
            value: 1024,
            min: 65536,
        };
        assert_eq!(
            err.to_string(),
            "eden_size = 1024 is below the minimum space size 65536"
        );
    }
}
