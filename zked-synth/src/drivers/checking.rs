//! Checking driver that evaluates constraints as they are emitted.
//!
//! The `CheckingDriver` carries the value of every wire and fails at the
//! first constraint that does not hold. Nothing is stored besides counters,
//! so it is the driver of choice for circuits with millions of constraints
//! where a recorded system would not fit in memory.
//!
//! Its counters follow the same rules as the other drivers, so the
//! resulting [`DriverStats`] can be compared against a
//! [`CountingDriver`](super::CountingDriver) run.

use super::DriverStats;
use crate::driver::Driver;
use crate::error::Error;
use crate::maybe::AlwaysKind;
use crate::sink::{CollectingSink, Sink};
use ff::PrimeField;

/// A wire in the checking driver: the value it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedWire<F> {
    /// The value of this wire.
    pub value: F,
}

impl<F: PrimeField> CheckedWire<F> {
    /// Create a new wire with the given value.
    pub const fn new(value: F) -> Self {
        CheckedWire { value }
    }
}

/// A driver that checks every constraint eagerly.
#[derive(Debug, Clone)]
pub struct CheckingDriver<F: PrimeField> {
    stats: DriverStats,
    _marker: core::marker::PhantomData<F>,
}

impl<F: PrimeField> CheckingDriver<F> {
    /// Create a new checking driver.
    pub fn new() -> Self {
        CheckingDriver {
            stats: DriverStats {
                num_wires: 1,
                ..DriverStats::default()
            },
            _marker: core::marker::PhantomData,
        }
    }

    /// Statistics of everything checked so far.
    pub const fn stats(&self) -> DriverStats {
        self.stats
    }

    fn next_index(&self) -> usize {
        self.stats.total_constraints()
    }

    fn evaluate<L: IntoIterator<Item = (CheckedWire<F>, F)>>(lc: L) -> F {
        lc.into_iter()
            .fold(F::ZERO, |acc, (wire, coeff)| acc + wire.value * coeff)
    }
}

impl<F: PrimeField> Default for CheckingDriver<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> Driver for CheckingDriver<F> {
    type F = F;
    type W = CheckedWire<F>;
    type MaybeKind = AlwaysKind;
    type IO = CollectingSink<F>;

    const ONE: Self::W = CheckedWire { value: F::ONE };

    fn mul(
        &mut self,
        values: impl FnOnce() -> Result<(Self::F, Self::F, Self::F), Error>,
    ) -> Result<(Self::W, Self::W, Self::W), Error> {
        let (a, b, c) = values()?;
        if a * b != c {
            return Err(Error::UnsatisfiedConstraint {
                index: self.next_index(),
                message: "multiplication constraint failed",
            });
        }
        self.stats.num_mul_constraints += 1;
        self.stats.num_wires += 3;
        Ok((CheckedWire::new(a), CheckedWire::new(b), CheckedWire::new(c)))
    }

    fn add<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        lc: impl FnOnce() -> L,
    ) -> Result<Self::W, Error> {
        let sum = Self::evaluate(lc());
        self.stats.num_linear_constraints += 1;
        self.stats.num_wires += 1;
        Ok(CheckedWire::new(sum))
    }

    fn enforce_zero<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        lc: impl FnOnce() -> L,
    ) -> Result<(), Error> {
        if Self::evaluate(lc()) != F::ZERO {
            return Err(Error::UnsatisfiedConstraint {
                index: self.next_index(),
                message: "linear constraint failed",
            });
        }
        self.stats.num_linear_constraints += 1;
        Ok(())
    }
}

impl<F: PrimeField> Sink<CheckingDriver<F>> for CollectingSink<F> {
    fn push(&mut self, wire: CheckedWire<F>) -> Result<(), Error> {
        self.inputs.push(wire.value);
        Ok(())
    }
}
