//! Error types for circuit synthesis.
//!
//! Errors are kept minimal since the `Maybe<T>` abstraction removes most
//! witness-related failures at compile time. What remains are unsatisfied
//! constraints, inconsistent witness data and circuit shapes that cannot be
//! built.

use thiserror::Error;

/// Synthesis error that can occur during circuit construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A constraint does not hold for the supplied witness.
    ///
    /// The checking driver reports the number of constraints emitted before
    /// the failing one. A recorded system numbers multiplication constraints
    /// first and linear constraints after them.
    #[error("unsatisfied constraint #{index}: {message}")]
    UnsatisfiedConstraint {
        /// Position of the failing constraint.
        index: usize,
        /// Kind of constraint that failed.
        message: &'static str,
    },

    /// The witness data was malformed or inconsistent with the circuit shape.
    #[error("malformed witness: {message}")]
    MalformedWitness {
        /// Description of what was wrong.
        message: &'static str,
    },

    /// The circuit cannot be constructed with the requested shape.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl Error {
    /// Whether this error means "no satisfying witness" rather than a
    /// construction failure.
    pub fn is_unsatisfied(&self) -> bool {
        matches!(self, Error::UnsatisfiedConstraint { .. })
    }
}

/// Result type alias for synthesis operations.
pub type Result<T> = core::result::Result<T, Error>;
