//! Arithmetic gadgets over the outer field.

use crate::driver::{Driver, WireValue};
use crate::error::Error;
use crate::maybe::Maybe;

/// Product of two wires: one multiplication gate linked to both operands.
pub fn mul<D: Driver>(
    dr: &mut D,
    a: &WireValue<D>,
    b: &WireValue<D>,
) -> Result<WireValue<D>, Error> {
    let (x, y, z) = dr.mul(|| {
        let a_val = *a.value.snag();
        let b_val = *b.value.snag();
        Ok((a_val, b_val, a_val * b_val))
    })?;
    dr.enforce_equal(&x, &a.wire)?;
    dr.enforce_equal(&y, &b.wire)?;

    let value = D::just(|| *a.value.snag() * *b.value.snag());
    Ok(WireValue::new(z, value))
}
