//! Error types for the verification circuits.

use thiserror::Error;

/// Errors raised while decoding inputs or building a circuit.
#[derive(Debug, Error)]
pub enum CircuitError {
    /// Input was not valid hex.
    #[error("hex decode error: {0}")]
    Decode(#[from] hex::FromHexError),

    /// Input decoded to the wrong number of bytes or bits.
    #[error("invalid length for {what}: expected {expected}, got {actual}")]
    InvalidLength {
        /// Which input was malformed.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Constraint synthesis failed.
    #[error(transparent)]
    Synthesis(#[from] zked_synth::Error),
}

impl CircuitError {
    /// Whether the failure is an unsatisfied constraint, as opposed to a
    /// malformed input or circuit shape.
    pub fn is_unsatisfied(&self) -> bool {
        matches!(self, CircuitError::Synthesis(err) if err.is_unsatisfied())
    }
}
