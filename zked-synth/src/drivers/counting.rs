//! Counting driver for measuring circuit size without witness data.
//!
//! The `CountingDriver` determines the shape of a circuit (wires,
//! constraints, public inputs) without computing or storing anything. Its
//! counts match what [`ProvingDriver`](super::ProvingDriver) and
//! [`CheckingDriver`](super::CheckingDriver) report for the same circuit.

use super::DriverStats;
use crate::driver::Driver;
use crate::error::Error;
use crate::maybe::EmptyKind;
use crate::sink::{CountingSink, Sink};
use core::marker::PhantomData;
use ff::PrimeField;

/// A wire in the counting driver.
///
/// Zero-sized since only counts are tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CountingWire(());

/// The counting driver tracks circuit statistics without allocating.
#[derive(Debug, Clone)]
pub struct CountingDriver<F> {
    stats: DriverStats,
    _marker: PhantomData<F>,
}

impl<F: PrimeField> CountingDriver<F> {
    /// Create a new counting driver.
    pub const fn new() -> Self {
        CountingDriver {
            stats: DriverStats {
                num_wires: 1, // ONE wire
                num_mul_constraints: 0,
                num_linear_constraints: 0,
            },
            _marker: PhantomData,
        }
    }

    /// Get circuit statistics.
    pub const fn stats(&self) -> DriverStats {
        self.stats
    }
}

impl<F: PrimeField> Default for CountingDriver<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: PrimeField> Driver for CountingDriver<F> {
    type F = F;
    type W = CountingWire;
    type MaybeKind = EmptyKind;
    type IO = CountingSink;

    const ONE: Self::W = CountingWire(());

    fn mul(
        &mut self,
        _values: impl FnOnce() -> Result<(Self::F, Self::F, Self::F), Error>,
    ) -> Result<(Self::W, Self::W, Self::W), Error> {
        self.stats.num_mul_constraints += 1;
        self.stats.num_wires += 3;
        Ok((CountingWire(()), CountingWire(()), CountingWire(())))
    }

    fn add<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        _lc: impl FnOnce() -> L,
    ) -> Result<Self::W, Error> {
        self.stats.num_wires += 1;
        self.stats.num_linear_constraints += 1;
        Ok(CountingWire(()))
    }

    fn enforce_zero<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        _lc: impl FnOnce() -> L,
    ) -> Result<(), Error> {
        self.stats.num_linear_constraints += 1;
        Ok(())
    }
}

impl<F: PrimeField> Sink<CountingDriver<F>> for CountingSink {
    fn push(&mut self, _wire: CountingWire) -> Result<(), Error> {
        self.count += 1;
        Ok(())
    }
}
