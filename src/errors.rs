//! Error types for the diffprog crate.
//!
//! Every fallible operation in the crate returns a [`FunctionError`]. There are two
//! failure modes:
//!
//! - `ShapeMismatch`: operands of a combinator disagree on their input/output
//!   dimensions, or a point handed to an evaluator has the wrong length
//! - `Construction`: a primitive was built from malformed parameters
//!
//! Floating-point domain conditions (division by zero, logarithm of a non-positive
//! number) are not errors. They propagate as IEEE NaN/Infinity.

use thiserror::Error;

/// Errors that can occur when building or evaluating a differentiable function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FunctionError {
    /// Error when a dimension does not match the one required by the operation
    #[error("Shape mismatch in {context}: expected {expected}, got {got}")]
    ShapeMismatch {
        context: &'static str,
        expected: usize,
        got: usize,
    },
    /// Error when a primitive is built from malformed parameters
    #[error("Invalid construction: {0}")]
    Construction(String),
}

impl FunctionError {
    pub(crate) fn shape(context: &'static str, expected: usize, got: usize) -> Self {
        FunctionError::ShapeMismatch {
            context,
            expected,
            got,
        }
    }
}

/// Checks that a point has exactly `expected` coordinates.
pub(crate) fn check_len(
    context: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), FunctionError> {
    if expected != got {
        return Err(FunctionError::shape(context, expected, got));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FunctionError::shape("sum", 2, 3);
        assert_eq!(err.to_string(), "Shape mismatch in sum: expected 2, got 3");

        let err = FunctionError::Construction("empty row".to_string());
        assert_eq!(err.to_string(), "Invalid construction: empty row");
    }

    #[test]
    fn test_check_len() {
        assert!(check_len("evaluate", 2, 2).is_ok());
        assert!(matches!(
            check_len("evaluate", 2, 1),
            Err(FunctionError::ShapeMismatch {
                expected: 2,
                got: 1,
                ..
            })
        ));
    }
}
