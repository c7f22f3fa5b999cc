//! Circuit definition trait.
//!
//! Synthesis is split into phases that share the same `output` step:
//!
//! ```text
//! Verification path:
//! Instance → input() → IO → output() → Public Input
//!
//! Proving path:
//! Witness  → main()  → IO → output() → Public Input
//! ```
//!
//! Running both paths through the same `output` keeps the public input
//! layout identical for prover and verifier.

use crate::driver::{Driver, Witness};
use crate::error::Error;
use ff::PrimeField;

/// A circuit that can be proven and verified.
pub trait Circuit<F: PrimeField>: Sized {
    /// The public instance type that the verifier sees.
    type Instance<'instance>;

    /// The intermediate IO type that flows from `input`/`main` to `output`.
    type IO<'source, D: Driver<F = F>>;

    /// The full assignment the prover uses.
    type Witness<'witness>;

    /// Turn instance data into circuit IO.
    ///
    /// Only public values are allocated here; no constraint of the relation
    /// itself is emitted.
    fn input<'instance, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        input: Witness<D, Self::Instance<'instance>>,
    ) -> Result<Self::IO<'instance, D>, Error>;

    /// Synthesize every constraint of the relation.
    ///
    /// The witness is `Empty` under shape-only drivers, so nothing here may
    /// branch on witness values.
    fn main<'witness, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        witness: Witness<D, Self::Witness<'witness>>,
    ) -> Result<Self::IO<'witness, D>, Error>;

    /// Write the IO to the driver's public input sink.
    fn output<'source, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        io: Self::IO<'source, D>,
        output: &mut D::IO,
    ) -> Result<(), Error>;

    /// Run `main` followed by `output`.
    fn synthesize_prove<'witness, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        witness: Witness<D, Self::Witness<'witness>>,
        output: &mut D::IO,
    ) -> Result<(), Error> {
        let io = self.main(dr, witness)?;
        self.output(dr, io, output)
    }

    /// Run `input` followed by `output`.
    fn synthesize_verify<'instance, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        instance: Witness<D, Self::Instance<'instance>>,
        output: &mut D::IO,
    ) -> Result<(), Error> {
        let io = self.input(dr, instance)?;
        self.output(dr, io, output)
    }
}
