use std::fmt;

/// The result type used by every fallible network operation.
pub type Result<T> = std::result::Result<T, NetError>;

/// Errors produced by a network's `run` and `train` operations.
///
/// Invalid construction parameters are not an error value; the constructor
/// signals them with `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetError {
    /// A caller-supplied slice does not match the configured topology.
    ShapeMismatch {
        /// Human-readable context for the mismatch (e.g. "inputs").
        what: &'static str,
        /// Observed length.
        got: usize,
        /// Expected length.
        expected: usize,
    },

    /// A traversal postcondition failed: the layer loops and the derived
    /// counts disagree. Indicates a defect in the layout math, not bad input.
    BrokenInvariant {
        /// Which count went wrong (e.g. "weights consumed").
        what: &'static str,
        /// Observed value.
        got: usize,
        /// Expected value.
        expected: usize,
    },
}

impl fmt::Display for NetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetError::ShapeMismatch { what, got, expected } => {
                write!(f, "shape mismatch for {what}: got {got}, expected {expected}")
            }
            NetError::BrokenInvariant { what, got, expected } => {
                write!(
                    f,
                    "broken invariant for {what}: got {got}, expected {expected}"
                )
            }
        }
    }
}

impl std::error::Error for NetError {}
