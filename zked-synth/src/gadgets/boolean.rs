//! Boolean gadgets.

use super::arithmetic::mul;
use crate::driver::{Driver, WireValue, Witness};
use crate::error::Error;
use crate::maybe::Maybe;
use ff::Field;

/// A wire constrained to 0 or 1.
pub struct BoolWire<D: Driver> {
    /// The underlying wire value.
    pub wire: WireValue<D>,
}

impl<D: Driver> Clone for BoolWire<D> {
    fn clone(&self) -> Self {
        BoolWire {
            wire: self.wire.clone(),
        }
    }
}

impl<D: Driver> BoolWire<D> {
    /// Wrap a wire that is already known to be boolean.
    pub fn new_unchecked(wire: WireValue<D>) -> Self {
        BoolWire { wire }
    }

    /// Allocate a new boolean wire.
    pub fn alloc(dr: &mut D, value: Witness<D, bool>) -> Result<Self, Error> {
        Ok(BoolWire {
            wire: dr.alloc_boolean(&value)?,
        })
    }

    /// Get the underlying wire.
    pub fn wire(&self) -> &D::W {
        &self.wire.wire
    }

    /// Get the value as a field element.
    pub fn value(&self) -> &Witness<D, D::F> {
        &self.wire.value
    }

    /// Get the value as a boolean.
    pub fn bool_value(&self) -> Witness<D, bool> {
        D::just(|| *self.wire.value.snag() == D::F::ONE)
    }
}

/// Boolean AND: a * b
pub fn and<D: Driver>(dr: &mut D, a: &BoolWire<D>, b: &BoolWire<D>) -> Result<BoolWire<D>, Error> {
    let ab = mul(dr, &a.wire, &b.wire)?;
    Ok(BoolWire::new_unchecked(ab))
}

/// Boolean OR: a + b - a * b
pub fn or<D: Driver>(dr: &mut D, a: &BoolWire<D>, b: &BoolWire<D>) -> Result<BoolWire<D>, Error> {
    let ab = mul(dr, &a.wire, &b.wire)?;
    let result = WireValue::linear(
        dr,
        &[(&a.wire, D::F::ONE), (&b.wire, D::F::ONE), (&ab, -D::F::ONE)],
        D::F::ZERO,
    )?;
    Ok(BoolWire::new_unchecked(result))
}

/// Boolean XOR: a + b - 2 * a * b
pub fn xor<D: Driver>(dr: &mut D, a: &BoolWire<D>, b: &BoolWire<D>) -> Result<BoolWire<D>, Error> {
    let ab = mul(dr, &a.wire, &b.wire)?;
    let two = D::F::ONE.double();
    let result = WireValue::linear(
        dr,
        &[(&a.wire, D::F::ONE), (&b.wire, D::F::ONE), (&ab, -two)],
        D::F::ZERO,
    )?;
    Ok(BoolWire::new_unchecked(result))
}

/// Boolean NOT: 1 - a
pub fn not<D: Driver>(dr: &mut D, a: &BoolWire<D>) -> Result<BoolWire<D>, Error> {
    let result = WireValue::linear(dr, &[(&a.wire, -D::F::ONE)], D::F::ONE)?;
    Ok(BoolWire::new_unchecked(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::{CheckingDriver, ProvingDriver};
    use crate::maybe::Always;
    use halo2curves_axiom::bn256::Fr;

    #[test]
    fn truth_tables() {
        for (x, y) in [(false, false), (false, true), (true, false), (true, true)] {
            let mut dr = CheckingDriver::<Fr>::new();
            let a = BoolWire::alloc(&mut dr, Always(x)).unwrap();
            let b = BoolWire::alloc(&mut dr, Always(y)).unwrap();
            assert_eq!(and(&mut dr, &a, &b).unwrap().bool_value().take(), x & y);
            assert_eq!(or(&mut dr, &a, &b).unwrap().bool_value().take(), x | y);
            assert_eq!(xor(&mut dr, &a, &b).unwrap().bool_value().take(), x ^ y);
            assert_eq!(not(&mut dr, &a).unwrap().bool_value().take(), !x);
        }
    }

    #[test]
    fn non_boolean_witness_is_rejected() {
        let mut dr = ProvingDriver::<Fr>::new();
        let bit = BoolWire::alloc(&mut dr, Always(true)).unwrap();
        dr.check_constraints().unwrap();

        let index = bit.wire.wire.index;
        dr.witness[index] = Fr::from(2);
        assert!(dr.check_constraints().is_err());
    }
}
