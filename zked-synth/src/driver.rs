//! Circuit synthesis drivers.
//!
//! A `Driver` is a compile-time specialized context for how a circuit is
//! synthesized at runtime. The same gadget code runs under every driver:
//!
//! - **Recording**: the driver stores the witness and every constraint.
//! - **Checking**: the driver evaluates each constraint as it is emitted.
//! - **Counting**: the driver only measures the shape of the circuit.
//!
//! # Wire Types
//!
//! `D::W` is an abstract wire. Depending on the driver it is an index into
//! the witness vector, a concrete field element, or nothing at all.
//!
//! # Linking
//!
//! `mul` returns three *fresh* wires constrained by `a * b = c`. They are not
//! related to any existing wire until a gadget links them with
//! `enforce_zero`. Every gadget in this crate does so; gadgets built on top
//! must do the same.
//!
//! ```rust,ignore
//! fn square<D: Driver>(dr: &mut D, x: &WireValue<D>) -> Result<WireValue<D>, Error> {
//!     let (a, b, c) = dr.mul(|| {
//!         let v = *x.value.snag();
//!         Ok((v, v, v.square()))
//!     })?;
//!     dr.enforce_equal(&a, &x.wire)?;
//!     dr.enforce_equal(&b, &x.wire)?;
//!     Ok(WireValue::new(c, D::just(|| x.value.snag().square())))
//! }
//! ```

use crate::error::Error;
use crate::maybe::{Maybe, MaybeKind};
use crate::sink::Sink;
use ff::{Field, PrimeField};

/// Type alias for the witness type of a driver.
///
/// This is `Always<T>` when the driver has witness data, or `Empty<T>` when
/// it doesn't.
pub type Witness<D, T> = <<D as Driver>::MaybeKind as MaybeKind>::Rebind<T>;

/// A circuit synthesis driver.
pub trait Driver: Sized {
    /// The outer field over which constraints are expressed.
    type F: PrimeField;

    /// The abstract wire type.
    type W: Clone;

    /// The constant ONE wire.
    const ONE: Self::W;

    /// `AlwaysKind` when witnesses are present, `EmptyKind` otherwise.
    type MaybeKind: MaybeKind;

    /// The IO sink type for public inputs.
    type IO: Sink<Self>;

    // =========================================================================
    // Constraint methods
    // =========================================================================

    /// Create a multiplication constraint `a * b = c` over three new wires.
    ///
    /// The closure supplies the values of the three wires and is only invoked
    /// when the driver carries a witness.
    fn mul(
        &mut self,
        values: impl FnOnce() -> Result<(Self::F, Self::F, Self::F), Error>,
    ) -> Result<(Self::W, Self::W, Self::W), Error>;

    /// Create a wire equal to a linear combination of existing wires.
    fn add<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        lc: impl FnOnce() -> L,
    ) -> Result<Self::W, Error>;

    /// Enforce that a linear combination of wires equals zero.
    fn enforce_zero<L: IntoIterator<Item = (Self::W, Self::F)>>(
        &mut self,
        lc: impl FnOnce() -> L,
    ) -> Result<(), Error>;

    // =========================================================================
    // Convenience methods
    // =========================================================================

    /// Create a `Maybe<T>` using the provided closure.
    #[inline(always)]
    fn just<R>(f: impl FnOnce() -> R) -> Witness<Self, R> {
        <Witness<Self, ()> as Maybe<()>>::just(f)
    }

    /// Create a `Maybe<T>` using the provided fallible closure.
    #[inline(always)]
    fn with<R>(f: impl FnOnce() -> Result<R, Error>) -> Result<Witness<Self, R>, Error> {
        <Witness<Self, ()> as Maybe<()>>::with(f)
    }

    /// Allocate an unconstrained wire with the given witness value.
    fn alloc(&mut self, value: impl FnOnce() -> Result<Self::F, Error>) -> Result<Self::W, Error> {
        let (_, _, w) = self.mul(|| {
            let v = value()?;
            Ok((Self::F::ONE, v, v))
        })?;
        Ok(w)
    }

    /// A wire equal to the given constant.
    fn constant(&mut self, value: Self::F) -> Result<Self::W, Error> {
        self.add(|| [(Self::ONE, value)])
    }

    /// Enforce that two wires are equal.
    fn enforce_equal(&mut self, a: &Self::W, b: &Self::W) -> Result<(), Error> {
        self.enforce_zero(|| [(a.clone(), Self::F::ONE), (b.clone(), -Self::F::ONE)])
    }

    /// Allocate a wire constrained to 0 or 1.
    ///
    /// Emits `x * y = z` linked by `y = 1 - x` and `z = 0`; `x` becomes the
    /// bit.
    fn alloc_boolean(&mut self, value: &Witness<Self, bool>) -> Result<WireValue<Self>, Error> {
        let field_value = Self::just(|| if *value.snag() { Self::F::ONE } else { Self::F::ZERO });
        let (x, y, z) = self.mul(|| {
            let v = *field_value.snag();
            Ok((v, Self::F::ONE - v, Self::F::ZERO))
        })?;
        self.enforce_zero(|| {
            [
                (y, Self::F::ONE),
                (x.clone(), Self::F::ONE),
                (Self::ONE, -Self::F::ONE),
            ]
        })?;
        self.enforce_zero(|| [(z, Self::F::ONE)])?;
        Ok(WireValue::new(x, field_value))
    }
}

/// A wire together with its witness value, if the driver carries one.
pub struct WireValue<D: Driver> {
    /// The abstract wire handle.
    pub wire: D::W,
    /// The witness value, if available.
    pub value: Witness<D, D::F>,
}

impl<D: Driver> Clone for WireValue<D> {
    fn clone(&self) -> Self {
        WireValue {
            wire: self.wire.clone(),
            value: D::just(|| *self.value.snag()),
        }
    }
}

impl<D: Driver> WireValue<D> {
    /// Create a new wire value.
    pub fn new(wire: D::W, value: Witness<D, D::F>) -> Self {
        WireValue { wire, value }
    }

    /// Allocate an unconstrained witness wire.
    pub fn alloc(dr: &mut D, value: Witness<D, D::F>) -> Result<Self, Error> {
        let wire = dr.alloc(|| Ok(*value.snag()))?;
        Ok(WireValue { wire, value })
    }

    /// A wire fixed to a constant.
    pub fn constant(dr: &mut D, value: D::F) -> Result<Self, Error> {
        let wire = dr.constant(value)?;
        Ok(WireValue {
            wire,
            value: D::just(|| value),
        })
    }

    /// A wire equal to `Σ coeff · term + constant`.
    pub fn linear(
        dr: &mut D,
        terms: &[(&WireValue<D>, D::F)],
        constant: D::F,
    ) -> Result<Self, Error> {
        let wire = dr.add(|| {
            terms
                .iter()
                .map(|(t, c)| (t.wire.clone(), *c))
                .chain(core::iter::once((D::ONE, constant)))
                .collect::<Vec<_>>()
        })?;
        let value = D::just(|| {
            terms
                .iter()
                .fold(constant, |acc, (t, c)| acc + *t.value.snag() * c)
        });
        Ok(WireValue { wire, value })
    }

    /// Get a reference to the wire.
    pub fn wire(&self) -> &D::W {
        &self.wire
    }

    /// Get a reference to the value.
    pub fn value(&self) -> &Witness<D, D::F> {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{CheckingDriver, CountingDriver, ProvingDriver};
    use crate::maybe::{Always, Empty};
    use halo2curves_axiom::bn256::Fr;

    #[test]
    fn default_helpers_hold_on_honest_witnesses() {
        let mut dr = ProvingDriver::<Fr>::new();
        let a = dr.alloc(|| Ok(Fr::from(7))).unwrap();
        let b = dr.constant(Fr::from(7)).unwrap();
        dr.enforce_equal(&a, &b).unwrap();
        let bit = dr.alloc_boolean(&Always(true)).unwrap();
        assert_eq!(*bit.value.snag(), Fr::ONE);
        dr.check_constraints().unwrap();

        dr.witness[bit.wire.index] = Fr::from(2);
        assert!(dr.check_constraints().is_err());
    }

    #[test]
    fn unequal_wires_are_unsatisfiable() {
        let mut dr = CheckingDriver::<Fr>::new();
        let a = dr.alloc(|| Ok(Fr::from(3))).unwrap();
        let b = dr.constant(Fr::from(4)).unwrap();
        assert!(dr.enforce_equal(&a, &b).unwrap_err().is_unsatisfied());
    }

    #[test]
    fn boolean_allocation_costs_one_gate() {
        let mut dr = CountingDriver::<Fr>::new();
        dr.alloc_boolean(&Empty::new()).unwrap();
        let stats = dr.stats();
        assert_eq!(stats.num_mul_constraints, 1);
        assert_eq!(stats.num_linear_constraints, 2);
    }
}
