//! Proving driver that records a full rank-1 constraint system.
//!
//! The `ProvingDriver`:
//! - allocates wires as positions in a witness vector
//! - stores every multiplication gate and linear constraint
//! - can re-check the recorded system against its witness afterwards
//!
//! Wire values are `Always<F>` since witnesses are always present.

use super::DriverStats;
use crate::driver::Driver;
use crate::error::Error;
use crate::maybe::AlwaysKind;
use crate::sink::{IndexSink, Sink};
use ff::PrimeField;

/// A wire in the proving driver: a position in the witness vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProvingWire {
    /// Index into the witness vector.
    pub index: usize,
}

impl ProvingWire {
    /// Create a new wire at the given index.
    pub const fn new(index: usize) -> Self {
        ProvingWire { index }
    }

    /// The constant ONE wire (always at index 0).
    pub const ONE: Self = ProvingWire { index: 0 };
}

/// A multiplication constraint: a * b = c
#[derive(Debug, Clone)]
pub struct MulConstraint {
    /// Left input wire.
    pub a: usize,
    /// Right input wire.
    pub b: usize,
    /// Output wire.
    pub c: usize,
}

/// A linear constraint: sum of (wire, coefficient) = 0
#[derive(Debug, Clone)]
pub struct LinearConstraint<F> {
    /// Terms in the linear combination.
    pub terms: Vec<(usize, F)>,
}

/// The proving driver collects constraints and witness data.
#[derive(Debug, Clone)]
pub struct ProvingDriver<F: PrimeField> {
    /// The witness values; index 0 is the ONE wire.
    pub witness: Vec<F>,
    /// Multiplication constraints.
    pub mul_constraints: Vec<MulConstraint>,
    /// Linear constraints (all must equal zero).
    pub linear_constraints: Vec<LinearConstraint<F>>,
}

impl<F: PrimeField> ProvingDriver<F> {
    /// Create a new proving driver.
    pub fn new() -> Self {
        ProvingDriver {
            witness: vec![F::ONE],
            mul_constraints: Vec::new(),
            linear_constraints: Vec::new(),
        }
    }

    fn alloc_wire(&mut self, value: F) -> ProvingWire {
        let index = self.witness.len();
        self.witness.push(value);
        ProvingWire::new(index)
    }

    /// Resolve the public inputs recorded by an [`IndexSink`].
    pub fn public_inputs(&self, sink: &IndexSink) -> Vec<F> {
        sink.indices.iter().map(|&i| self.witness[i]).collect()
    }

    /// Check that all recorded constraints are satisfied by the witness.
    pub fn check_constraints(&self) -> Result<(), Error> {
        if self.witness.first() != Some(&F::ONE) {
            return Err(Error::MalformedWitness {
                message: "ONE wire does not hold one",
            });
        }

        for (index, mul) in self.mul_constraints.iter().enumerate() {
            let a = self.witness[mul.a];
            let b = self.witness[mul.b];
            let c = self.witness[mul.c];
            if a * b != c {
                return Err(Error::UnsatisfiedConstraint {
                    index,
                    message: "multiplication constraint failed",
                });
            }
        }

        for (index, linear) in self.linear_constraints.iter().enumerate() {
            let sum = linear
                .terms
                .iter()
                .fold(F::ZERO, |acc, &(wire, coeff)| acc + self.witness[wire] * coeff);
            if sum != F::ZERO {
                return Err(Error::UnsatisfiedConstraint {
                    index: self.mul_constraints.len() + index,
                    message: "linear constraint failed",
                });
            }
        }

        tracing::debug!(
            mul = self.mul_constraints.len(),
            linear = self.linear_constraints.len(),
            "recorded constraint system is satisfied"
        );
        Ok(())
    }

    /// Get statistics about the constraint system.
    pub fn stats(&self) -> DriverStats {
        DriverStats {
            num_wires: self.witness.len(),
            num_mul_constraints: self.mul_constraints.len(),
            num_linear_constraints: self.linear_constraints.len(),
        }
    }
}

impl<F: PrimeField> Default for ProvingDriver<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> Driver for ProvingDriver<F> {
    type F = F;
    type W = ProvingWire;
    type MaybeKind = AlwaysKind;
    type IO = IndexSink;

    const ONE: Self::W = ProvingWire::ONE;

    fn mul(
        &mut self,
        values: impl FnOnce() -> Result<(Self::F, Self::F, Self::F), Error>,
    ) -> Result<(Self::W, Self::W, Self::W), Error> {
        let (a_val, b_val, c_val) = values()?;

        let a = self.alloc_wire(a_val);
        let b = self.alloc_wire(b_val);
        let c = self.alloc_wire(c_val);

        self.mul_constraints.push(MulConstraint {
            a: a.index,
            b: b.index,
            c: c.index,
        });

        Ok((a, b, c))
    }

    fn add<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        lc: impl FnOnce() -> L,
    ) -> Result<Self::W, Error> {
        let mut sum = F::ZERO;
        let mut terms: Vec<_> = lc()
            .into_iter()
            .map(|(wire, coeff)| {
                sum += self.witness[wire.index] * coeff;
                (wire.index, coeff)
            })
            .collect();

        // lc - result = 0
        let result = self.alloc_wire(sum);
        terms.push((result.index, -F::ONE));
        self.linear_constraints.push(LinearConstraint { terms });

        Ok(result)
    }

    fn enforce_zero<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        lc: impl FnOnce() -> L,
    ) -> Result<(), Error> {
        let terms: Vec<_> = lc()
            .into_iter()
            .map(|(wire, coeff)| (wire.index, coeff))
            .collect();

        self.linear_constraints.push(LinearConstraint { terms });
        Ok(())
    }
}

impl<F: PrimeField> Sink<ProvingDriver<F>> for IndexSink {
    fn push(&mut self, wire: ProvingWire) -> Result<(), Error> {
        self.indices.push(wire.index);
        Ok(())
    }
}
