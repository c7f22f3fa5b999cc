//! Bit vectors and the byte/hex adapters.
//!
//! Bytes expand most significant bit first: `0x80` becomes
//! `[1, 0, 0, 0, 0, 0, 0, 0]`, and a byte string is the concatenation of its
//! bytes in order. Hex test vectors follow the same convention.

use crate::error::CircuitError;
use ff::Field;
use zked_synth::gadgets::{self, BoolWire};
use zked_synth::{Driver, Error, Maybe, WireValue, Witness};

/// A bit that is either fixed when the circuit is built or a constrained
/// boolean wire.
///
/// Gates on constant bits fold away without emitting constraints, which is
/// what keeps padding and round constants free.
pub enum Bit<D: Driver> {
    /// A bit known at build time.
    Constant(bool),
    /// A boolean wire.
    Var(BoolWire<D>),
}

impl<D: Driver> Clone for Bit<D> {
    fn clone(&self) -> Self {
        match self {
            Bit::Constant(b) => Bit::Constant(*b),
            Bit::Var(wire) => Bit::Var(wire.clone()),
        }
    }
}

impl<D: Driver> Bit<D> {
    /// Allocate a constrained boolean wire.
    pub fn alloc(dr: &mut D, value: Witness<D, bool>) -> Result<Self, Error> {
        BoolWire::alloc(dr, value).map(Bit::Var)
    }

    /// The build-time value, if this bit is constant.
    pub fn as_constant(&self) -> Option<bool> {
        match self {
            Bit::Constant(b) => Some(*b),
            Bit::Var(_) => None,
        }
    }

    /// The witness value of the bit.
    pub fn value(&self) -> Witness<D, bool> {
        match self {
            Bit::Constant(b) => {
                let b = *b;
                D::just(|| b)
            }
            Bit::Var(wire) => wire.bool_value(),
        }
    }

    /// `(wire, coeff)` contributing `coeff * self` to a linear combination.
    pub(crate) fn term(&self, coeff: D::F) -> (D::W, D::F) {
        match self {
            Bit::Constant(true) => (D::ONE, coeff),
            Bit::Constant(false) => (D::ONE, D::F::ZERO),
            Bit::Var(wire) => (wire.wire().clone(), coeff),
        }
    }

    /// The bit as a field element. Only call inside witness closures.
    pub(crate) fn field_value(&self) -> D::F {
        match self {
            Bit::Constant(true) => D::F::ONE,
            Bit::Constant(false) => D::F::ZERO,
            Bit::Var(wire) => *wire.value().snag(),
        }
    }

    /// Materialize the bit as a wire.
    pub fn to_wire(&self, dr: &mut D) -> Result<WireValue<D>, Error> {
        match self {
            Bit::Constant(b) => {
                WireValue::constant(dr, if *b { D::F::ONE } else { D::F::ZERO })
            }
            Bit::Var(wire) => Ok(wire.wire.clone()),
        }
    }

    /// Boolean NOT.
    pub fn not(&self, dr: &mut D) -> Result<Self, Error> {
        match self {
            Bit::Constant(b) => Ok(Bit::Constant(!b)),
            Bit::Var(wire) => gadgets::not(dr, wire).map(Bit::Var),
        }
    }

    /// Boolean XOR.
    pub fn xor(dr: &mut D, a: &Self, b: &Self) -> Result<Self, Error> {
        match (a, b) {
            (Bit::Constant(x), Bit::Constant(y)) => Ok(Bit::Constant(x ^ y)),
            (Bit::Constant(false), v) | (v, Bit::Constant(false)) => Ok(v.clone()),
            (Bit::Constant(true), v) | (v, Bit::Constant(true)) => v.not(dr),
            (Bit::Var(x), Bit::Var(y)) => gadgets::xor(dr, x, y).map(Bit::Var),
        }
    }

    /// Boolean AND.
    pub fn and(dr: &mut D, a: &Self, b: &Self) -> Result<Self, Error> {
        match (a, b) {
            (Bit::Constant(false), _) | (_, Bit::Constant(false)) => Ok(Bit::Constant(false)),
            (Bit::Constant(true), v) | (v, Bit::Constant(true)) => Ok(v.clone()),
            (Bit::Var(x), Bit::Var(y)) => gadgets::and(dr, x, y).map(Bit::Var),
        }
    }

    /// Boolean OR.
    pub fn or(dr: &mut D, a: &Self, b: &Self) -> Result<Self, Error> {
        match (a, b) {
            (Bit::Constant(true), _) | (_, Bit::Constant(true)) => Ok(Bit::Constant(true)),
            (Bit::Constant(false), v) | (v, Bit::Constant(false)) => Ok(v.clone()),
            (Bit::Var(x), Bit::Var(y)) => gadgets::or(dr, x, y).map(Bit::Var),
        }
    }

    /// Constrain two bits to be equal.
    ///
    /// Always emits one linear constraint, even for two constants, so the
    /// circuit shape never depends on which bits happen to be fixed.
    pub fn enforce_equal(dr: &mut D, a: &Self, b: &Self) -> Result<(), Error> {
        dr.enforce_zero(|| [a.term(D::F::ONE), b.term(-D::F::ONE)])
    }
}

/// A wire equal to `Σ coeff · bit + constant`.
pub(crate) fn linear<D: Driver>(
    dr: &mut D,
    terms: &[(&Bit<D>, D::F)],
    constant: D::F,
) -> Result<WireValue<D>, Error> {
    let wire = dr.add(|| {
        terms
            .iter()
            .map(|(bit, coeff)| bit.term(*coeff))
            .chain(core::iter::once((D::ONE, constant)))
            .collect::<Vec<_>>()
    })?;
    let value = D::just(|| {
        terms
            .iter()
            .fold(constant, |acc, (bit, coeff)| acc + bit.field_value() * coeff)
    });
    Ok(WireValue::new(wire, value))
}

/// Expand bytes into bits, most significant bit first within each byte.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    bytes
        .iter()
        .flat_map(|byte| (0..8).rev().map(move |i| (byte >> i) & 1 == 1))
        .collect()
}

/// Decode a hex string into bits.
pub fn hex_to_bits(hex: &str) -> Result<Vec<bool>, CircuitError> {
    Ok(bytes_to_bits(&hex::decode(hex.trim())?))
}

/// Pack bits back into bytes. The length must be a multiple of 8.
pub fn bits_to_bytes(bits: &[bool]) -> Result<Vec<u8>, CircuitError> {
    if bits.len() % 8 != 0 {
        return Err(CircuitError::InvalidLength {
            what: "bit string",
            expected: bits.len().next_multiple_of(8),
            actual: bits.len(),
        });
    }
    Ok(bits
        .chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect())
}

/// Reverse the bit order within every byte.
///
/// Turns an MSB-first byte string into the little-endian bit order of the
/// integer those bytes encode in little-endian byte order, and back.
pub fn swap_bit_order<T: Clone>(bits: &[T]) -> Vec<T> {
    bits.chunks(8)
        .flat_map(|chunk| chunk.iter().rev().cloned())
        .collect()
}

/// Fixed bits that emit no constraints.
pub fn constant_bits<D: Driver>(bits: &[bool]) -> Vec<Bit<D>> {
    bits.iter().copied().map(Bit::Constant).collect()
}

/// Allocate `len` constrained bits from a witness bit string.
///
/// A witness of the wrong length is rejected as malformed before any bit is
/// allocated.
pub fn alloc_bits<D: Driver>(
    dr: &mut D,
    bits: Witness<D, &[bool]>,
    len: usize,
) -> Result<Vec<Bit<D>>, Error> {
    D::with(|| {
        if bits.snag().len() == len {
            Ok(())
        } else {
            Err(Error::MalformedWitness {
                message: "bit string length does not match the circuit",
            })
        }
    })?;
    (0..len)
        .map(|i| Bit::alloc(dr, D::just(|| bits.snag()[i])))
        .collect()
}

/// The witness values of a bit vector.
pub fn bit_values<D: Driver>(bits: &[Bit<D>]) -> Witness<D, Vec<bool>> {
    D::just(|| bits.iter().map(|bit| bit.value().take()).collect())
}
