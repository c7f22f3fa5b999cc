//! Concrete driver implementations.
//!
//! - [`proving`]: records the witness and every constraint
//! - [`checking`]: evaluates constraints eagerly without storing them
//! - [`counting`]: measures circuit shape without witness data

pub mod checking;
pub mod counting;
pub mod proving;

pub use checking::CheckingDriver;
pub use counting::CountingDriver;
pub use proving::ProvingDriver;

/// Size of a synthesized constraint system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DriverStats {
    /// Number of wires allocated, including the ONE wire.
    pub num_wires: usize,
    /// Number of multiplication constraints.
    pub num_mul_constraints: usize,
    /// Number of linear constraints.
    pub num_linear_constraints: usize,
}

impl DriverStats {
    /// Total number of constraints.
    pub const fn total_constraints(&self) -> usize {
        self.num_mul_constraints + self.num_linear_constraints
    }
}
