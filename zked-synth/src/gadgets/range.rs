//! Range check gadgets.
//!
//! Everything here works on little-endian bit decompositions. A value built
//! from `n` boolean wires is in `[0, 2^n)` as long as `n` stays below the
//! field's capacity.

use super::boolean::BoolWire;
use crate::driver::{Driver, WireValue, Witness};
use crate::error::Error;
use crate::maybe::Maybe;
use ff::{Field, PrimeField};
use num_bigint::BigUint;

fn check_width<F: PrimeField>(num_bits: usize) -> Result<(), Error> {
    if num_bits as u32 >= F::CAPACITY {
        return Err(Error::InvalidConfiguration(format!(
            "{num_bits}-bit decomposition does not fit a field of capacity {}",
            F::CAPACITY
        )));
    }
    Ok(())
}

/// Map an unsigned integer into the field.
pub fn field_from_biguint<F: PrimeField>(value: &BigUint) -> F {
    let shift = F::from_u128(1u128 << 64);
    value
        .to_u64_digits()
        .iter()
        .rev()
        .fold(F::ZERO, |acc, &digit| acc * shift + F::from(digit))
}

/// Allocate a `num_bits`-wide unsigned integer as boolean wires.
///
/// Only the low `num_bits` bits of the witness are used; a witness that does
/// not fit simply produces a different value, which the caller's constraints
/// then reject.
pub fn alloc_uint<D: Driver>(
    dr: &mut D,
    value: &Witness<D, BigUint>,
    num_bits: usize,
) -> Result<(WireValue<D>, Vec<BoolWire<D>>), Error> {
    check_width::<D::F>(num_bits)?;
    let bits = (0..num_bits)
        .map(|i| BoolWire::alloc(dr, D::just(|| value.snag().bit(i as u64))))
        .collect::<Result<Vec<_>, _>>()?;
    let packed = from_bits(dr, &bits)?;
    Ok((packed, bits))
}

/// Decompose a field element into bits (little-endian).
///
/// Assumes the field's canonical representation is little-endian. The
/// decomposition is constrained to equal the original value.
pub fn to_bits<D: Driver>(
    dr: &mut D,
    a: &WireValue<D>,
    num_bits: usize,
) -> Result<Vec<BoolWire<D>>, Error> {
    check_width::<D::F>(num_bits)?;
    let repr = D::just(|| a.value.snag().to_repr());

    let bits = (0..num_bits)
        .map(|i| {
            let bit = D::just(|| {
                let bytes = repr.snag().as_ref();
                bytes
                    .get(i / 8)
                    .map(|byte| (byte >> (i % 8)) & 1 == 1)
                    .unwrap_or(false)
            });
            BoolWire::alloc(dr, bit)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut power_of_two = D::F::ONE;
    let mut lc_terms = Vec::with_capacity(num_bits + 1);
    for bit in &bits {
        lc_terms.push((bit.wire().clone(), power_of_two));
        power_of_two = power_of_two.double();
    }
    lc_terms.push((a.wire.clone(), -D::F::ONE));
    dr.enforce_zero(|| lc_terms)?;

    Ok(bits)
}

/// Recompose little-endian bits into a single wire.
pub fn from_bits<D: Driver>(dr: &mut D, bits: &[BoolWire<D>]) -> Result<WireValue<D>, Error> {
    check_width::<D::F>(bits.len())?;

    let mut power_of_two = D::F::ONE;
    let mut lc_terms = Vec::with_capacity(bits.len());
    for bit in bits {
        lc_terms.push((bit.wire().clone(), power_of_two));
        power_of_two = power_of_two.double();
    }
    let wire = dr.add(|| lc_terms)?;

    let value = D::just(|| {
        bits.iter().rev().fold(D::F::ZERO, |acc, bit| acc.double() + *bit.value().snag())
    });
    Ok(WireValue::new(wire, value))
}

/// Check that a value is within `[0, 2^num_bits)`.
pub fn range_check<D: Driver>(dr: &mut D, a: &WireValue<D>, num_bits: usize) -> Result<(), Error> {
    to_bits(dr, a, num_bits).map(|_| ())
}
