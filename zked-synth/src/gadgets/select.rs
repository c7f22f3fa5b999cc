//! Selection gadgets for conditional logic.

use super::boolean::BoolWire;
use crate::driver::{Driver, WireValue};
use crate::error::Error;
use crate::maybe::Maybe;
use ff::Field;

/// Conditional selection: `a` if `condition` is 1, `b` otherwise.
///
/// Computed as `condition * (a - b) + b`.
pub fn select<D: Driver>(
    dr: &mut D,
    condition: &BoolWire<D>,
    a: &WireValue<D>,
    b: &WireValue<D>,
) -> Result<WireValue<D>, Error> {
    let (x, y, z) = dr.mul(|| {
        let cond_val = *condition.wire.value.snag();
        let diff_val = *a.value.snag() - *b.value.snag();
        Ok((cond_val, diff_val, cond_val * diff_val))
    })?;
    dr.enforce_equal(&x, condition.wire())?;
    dr.enforce_zero(|| {
        [
            (y, D::F::ONE),
            (a.wire.clone(), -D::F::ONE),
            (b.wire.clone(), D::F::ONE),
        ]
    })?;

    let result_wire = dr.add(|| [(z, D::F::ONE), (b.wire.clone(), D::F::ONE)])?;
    let result_value = D::just(|| {
        if *condition.wire.value.snag() == D::F::ONE {
            *a.value.snag()
        } else {
            *b.value.snag()
        }
    });

    Ok(WireValue::new(result_wire, result_value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::CheckingDriver;
    use crate::maybe::Always;
    use halo2curves_axiom::bn256::Fr;

    #[test]
    fn selects_either_branch() {
        let mut dr = CheckingDriver::<Fr>::new();
        let a = WireValue::alloc(&mut dr, Always(Fr::from(11))).unwrap();
        let b = WireValue::alloc(&mut dr, Always(Fr::from(22))).unwrap();
        let yes = BoolWire::alloc(&mut dr, Always(true)).unwrap();
        let no = BoolWire::alloc(&mut dr, Always(false)).unwrap();

        assert_eq!(select(&mut dr, &yes, &a, &b).unwrap().wire.value, Fr::from(11));
        assert_eq!(select(&mut dr, &no, &a, &b).unwrap().wire.value, Fr::from(22));
    }
}
