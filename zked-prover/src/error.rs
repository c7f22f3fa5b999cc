use crate::CircuitShape;
use thiserror::Error;

/// Failures at the proof-system boundary.
#[derive(Debug, Error)]
pub enum ProverError {
    /// The witness does not satisfy the circuit.
    #[error("witness does not satisfy the circuit: {0}")]
    Unsatisfied(zked_synth::Error),

    /// The circuit could not be synthesized at all.
    #[error("synthesis failed: {0}")]
    Synthesis(zked_synth::Error),

    /// A proof or witness was produced for a differently shaped circuit.
    #[error("circuit shape mismatch: key has {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: CircuitShape,
        actual: CircuitShape,
    },

    /// The public inputs carried by a proof differ from the verifier's.
    #[error("public input mismatch at position {index}")]
    PublicInputMismatch { index: usize },

    /// The proof carries the wrong number of public inputs.
    #[error("expected {expected} public inputs, got {actual}")]
    PublicInputCount { expected: usize, actual: usize },
}

impl From<zked_synth::Error> for ProverError {
    fn from(err: zked_synth::Error) -> Self {
        if err.is_unsatisfied() {
            ProverError::Unsatisfied(err)
        } else {
            ProverError::Synthesis(err)
        }
    }
}
