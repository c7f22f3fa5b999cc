//! SHA-512 over boolean wires.
//!
//! Words are [`UInt64`] values holding 64 [`Bit`]s, least significant first.
//! Rotations and shifts only relabel bits; XOR, Ch and Maj are per-bit gates;
//! addition mod 2^64 is a ripple-carry chain of full adders whose last carry
//! is dropped. Gates that see a constant bit fold away, so padding, the
//! initial state and the round constants cost nothing by themselves.
//!
//! Bit strings use the byte convention of [`crate::bits`]: message bytes in
//! order, most significant bit first. The digest comes out the same way.

use crate::bits::{linear, Bit};
use ff::Field;
use tracing::debug;
use zked_synth::gadgets::{self, BoolWire};
use zked_synth::{Driver, Error, Maybe, WireValue, Witness};

/// Width of the digest in bits.
pub const DIGEST_BITS: usize = 512;

const BLOCK_BITS: usize = 1024;
const LENGTH_BITS: usize = 128;

const IV: [u64; 8] = [
    0x6a09e667f3bcc908, 0xbb67ae8584caa73b, 0x3c6ef372fe94f82b, 0xa54ff53a5f1d36f1,
    0x510e527fade682d1, 0x9b05688c2b3e6c1f, 0x1f83d9abfb41bd6b, 0x5be0cd19137e2179,
];

const K: [u64; 80] = [
    0x428a2f98d728ae22, 0x7137449123ef65cd, 0xb5c0fbcfec4d3b2f, 0xe9b5dba58189dbbc,
    0x3956c25bf348b538, 0x59f111f1b605d019, 0x923f82a4af194f9b, 0xab1c5ed5da6d8118,
    0xd807aa98a3030242, 0x12835b0145706fbe, 0x243185be4ee4b28c, 0x550c7dc3d5ffb4e2,
    0x72be5d74f27b896f, 0x80deb1fe3b1696b1, 0x9bdc06a725c71235, 0xc19bf174cf692694,
    0xe49b69c19ef14ad2, 0xefbe4786384f25e3, 0x0fc19dc68b8cd5b5, 0x240ca1cc77ac9c65,
    0x2de92c6f592b0275, 0x4a7484aa6ea6e483, 0x5cb0a9dcbd41fbd4, 0x76f988da831153b5,
    0x983e5152ee66dfab, 0xa831c66d2db43210, 0xb00327c898fb213f, 0xbf597fc7beef0ee4,
    0xc6e00bf33da88fc2, 0xd5a79147930aa725, 0x06ca6351e003826f, 0x142929670a0e6e70,
    0x27b70a8546d22ffc, 0x2e1b21385c26c926, 0x4d2c6dfc5ac42aed, 0x53380d139d95b3df,
    0x650a73548baf63de, 0x766a0abb3c77b2a8, 0x81c2c92e47edaee6, 0x92722c851482353b,
    0xa2bfe8a14cf10364, 0xa81a664bbc423001, 0xc24b8b70d0f89791, 0xc76c51a30654be30,
    0xd192e819d6ef5218, 0xd69906245565a910, 0xf40e35855771202a, 0x106aa07032bbd1b8,
    0x19a4c116b8d2d0c8, 0x1e376c085141ab53, 0x2748774cdf8eeb99, 0x34b0bcb5e19b48a8,
    0x391c0cb3c5c95a63, 0x4ed8aa4ae3418acb, 0x5b9cca4f7763e373, 0x682e6ff3d6b2b8a3,
    0x748f82ee5defb2fc, 0x78a5636f43172f60, 0x84c87814a1f0ab72, 0x8cc702081a6439ec,
    0x90befffa23631e28, 0xa4506cebde82bde9, 0xbef9a3f7b2c67915, 0xc67178f2e372532b,
    0xca273eceea26619c, 0xd186b8c721c0c207, 0xeada7dd6cde0eb1e, 0xf57d4f7fee6ed178,
    0x06f067aa72176fba, 0x0a637dc5a2c898a6, 0x113f9804bef90dae, 0x1b710b35131c471b,
    0x28db77f523047d84, 0x32caab7b40c72493, 0x3c9ebe0a15c9bebc, 0x431d67c49c100d4c,
    0x4cc5d4becb3e42b6, 0x597f299cfc657e2a, 0x5fcb6fab3ad6faec, 0x6c44198c4a475817,
];

/// A 64-bit word of bits, least significant bit first.
pub struct UInt64<D: Driver> {
    bits: [Bit<D>; 64],
}

impl<D: Driver> Clone for UInt64<D> {
    fn clone(&self) -> Self {
        UInt64 {
            bits: self.bits.clone(),
        }
    }
}

impl<D: Driver> UInt64<D> {
    fn try_build(mut bit: impl FnMut(usize) -> Result<Bit<D>, Error>) -> Result<Self, Error> {
        let mut bits: [Bit<D>; 64] = core::array::from_fn(|_| Bit::Constant(false));
        for (i, slot) in bits.iter_mut().enumerate() {
            *slot = bit(i)?;
        }
        Ok(UInt64 { bits })
    }

    /// A word fixed at build time.
    pub fn constant(value: u64) -> Self {
        UInt64 {
            bits: core::array::from_fn(|i| Bit::Constant((value >> i) & 1 == 1)),
        }
    }

    /// Read a word from 64 bits given most significant first.
    pub fn from_bits_be(bits: &[Bit<D>]) -> Result<Self, Error> {
        if bits.len() != 64 {
            return Err(Error::InvalidConfiguration(format!(
                "a 64-bit word needs 64 bits, got {}",
                bits.len()
            )));
        }
        Ok(UInt64 {
            bits: core::array::from_fn(|i| bits[63 - i].clone()),
        })
    }

    /// The witness value of the word.
    pub fn value(&self) -> Witness<D, u64> {
        D::just(|| {
            self.bits
                .iter()
                .enumerate()
                .fold(0u64, |acc, (i, bit)| acc | (u64::from(bit.value().take()) << i))
        })
    }

    /// Rotate right by `n` bits.
    pub fn rotr(&self, n: usize) -> Self {
        UInt64 {
            bits: core::array::from_fn(|i| self.bits[(i + n) % 64].clone()),
        }
    }

    /// Logical shift right by `n` bits.
    pub fn shr(&self, n: usize) -> Self {
        UInt64 {
            bits: core::array::from_fn(|i| {
                self.bits.get(i + n).cloned().unwrap_or(Bit::Constant(false))
            }),
        }
    }

    /// Bitwise XOR of three words.
    pub fn xor3(dr: &mut D, a: &Self, b: &Self, c: &Self) -> Result<Self, Error> {
        Self::try_build(|i| {
            let ab = Bit::xor(dr, &a.bits[i], &b.bits[i])?;
            Bit::xor(dr, &ab, &c.bits[i])
        })
    }

    /// `(e AND f) XOR (NOT e AND g)`, bit by bit.
    pub fn ch(dr: &mut D, e: &Self, f: &Self, g: &Self) -> Result<Self, Error> {
        Self::try_build(|i| ch(dr, &e.bits[i], &f.bits[i], &g.bits[i]))
    }

    /// Bitwise majority of three words.
    pub fn maj(dr: &mut D, a: &Self, b: &Self, c: &Self) -> Result<Self, Error> {
        Self::try_build(|i| maj(dr, &a.bits[i], &b.bits[i], &c.bits[i]))
    }

    /// Addition mod 2^64.
    pub fn add(&self, dr: &mut D, other: &Self) -> Result<Self, Error> {
        let mut carry = Bit::Constant(false);
        Self::try_build(|i| {
            let (sum, next) = full_add(dr, &self.bits[i], &other.bits[i], &carry)?;
            carry = next;
            Ok(sum)
        })
    }
}

/// The output of [`sha512`]: exactly 512 bits, most significant bit of the
/// first digest byte first.
pub struct Sha512Digest<D: Driver> {
    bits: [Bit<D>; DIGEST_BITS],
}

impl<D: Driver> Clone for Sha512Digest<D> {
    fn clone(&self) -> Self {
        Sha512Digest {
            bits: self.bits.clone(),
        }
    }
}

impl<D: Driver> Sha512Digest<D> {
    fn from_state(state: &[UInt64<D>]) -> Self {
        Sha512Digest {
            bits: core::array::from_fn(|i| state[i / 64].bits[63 - i % 64].clone()),
        }
    }

    /// The digest bits.
    pub fn bits(&self) -> &[Bit<D>; DIGEST_BITS] {
        &self.bits
    }

    /// Take the digest bits.
    pub fn into_bits(self) -> [Bit<D>; DIGEST_BITS] {
        self.bits
    }

    /// The witness value of the digest as bytes.
    pub fn value(&self) -> Witness<D, [u8; 64]> {
        D::just(|| {
            let mut bytes = [0u8; 64];
            for (i, bit) in self.bits.iter().enumerate() {
                if bit.value().take() {
                    bytes[i / 8] |= 0x80 >> (i % 8);
                }
            }
            bytes
        })
    }

    /// Constrain the digest to equal `expected`, bit by bit.
    pub fn enforce_equal(&self, dr: &mut D, expected: &[Bit<D>]) -> Result<(), Error> {
        if expected.len() != DIGEST_BITS {
            return Err(Error::InvalidConfiguration(format!(
                "expected digest has {} bits, not {DIGEST_BITS}",
                expected.len()
            )));
        }
        for (bit, want) in self.bits.iter().zip(expected) {
            Bit::enforce_equal(dr, bit, want)?;
        }
        Ok(())
    }
}

/// Hash a message given as whole bytes.
///
/// The message length is part of the circuit shape; a length that is not a
/// multiple of 8 is rejected.
pub fn sha512<D: Driver>(dr: &mut D, message: &[Bit<D>]) -> Result<Sha512Digest<D>, Error> {
    if message.len() % 8 != 0 {
        return Err(Error::InvalidConfiguration(format!(
            "message of {} bits is not a whole number of bytes",
            message.len()
        )));
    }

    let padded = pad(message);
    let mut state: Vec<UInt64<D>> = IV.iter().map(|&word| UInt64::constant(word)).collect();
    for (index, block) in padded.chunks(BLOCK_BITS).enumerate() {
        state = compress(dr, &state, block)?;
        debug!(block = index, "compressed sha512 block");
    }
    Ok(Sha512Digest::from_state(&state))
}

fn pad<D: Driver>(message: &[Bit<D>]) -> Vec<Bit<D>> {
    let length = message.len() as u128;
    let mut bits = message.to_vec();
    bits.push(Bit::Constant(true));
    while bits.len() % BLOCK_BITS != BLOCK_BITS - LENGTH_BITS {
        bits.push(Bit::Constant(false));
    }
    bits.extend((0..LENGTH_BITS).rev().map(|i| Bit::Constant((length >> i) & 1 == 1)));
    bits
}

fn compress<D: Driver>(
    dr: &mut D,
    state: &[UInt64<D>],
    block: &[Bit<D>],
) -> Result<Vec<UInt64<D>>, Error> {
    let mut w = block
        .chunks(64)
        .map(UInt64::from_bits_be)
        .collect::<Result<Vec<_>, _>>()?;
    for t in 16..80 {
        let s0 = small_sigma0(dr, &w[t - 15])?;
        let s1 = small_sigma1(dr, &w[t - 2])?;
        let word = s1.add(dr, &w[t - 7])?.add(dr, &s0)?.add(dr, &w[t - 16])?;
        w.push(word);
    }

    let mut a = state[0].clone();
    let mut b = state[1].clone();
    let mut c = state[2].clone();
    let mut d = state[3].clone();
    let mut e = state[4].clone();
    let mut f = state[5].clone();
    let mut g = state[6].clone();
    let mut h = state[7].clone();

    for (t, &k) in K.iter().enumerate() {
        let sigma1 = big_sigma1(dr, &e)?;
        let choice = UInt64::ch(dr, &e, &f, &g)?;
        let t1 = h
            .add(dr, &UInt64::constant(k))?
            .add(dr, &w[t])?
            .add(dr, &sigma1)?
            .add(dr, &choice)?;
        let sigma0 = big_sigma0(dr, &a)?;
        let majority = UInt64::maj(dr, &a, &b, &c)?;
        let t2 = sigma0.add(dr, &majority)?;

        h = g;
        g = f;
        f = e;
        e = d.add(dr, &t1)?;
        d = c;
        c = b;
        b = a;
        a = t1.add(dr, &t2)?;
    }

    [a, b, c, d, e, f, g, h]
        .iter()
        .zip(state)
        .map(|(working, initial)| initial.add(dr, working))
        .collect()
}

fn big_sigma0<D: Driver>(dr: &mut D, x: &UInt64<D>) -> Result<UInt64<D>, Error> {
    UInt64::xor3(dr, &x.rotr(28), &x.rotr(34), &x.rotr(39))
}

fn big_sigma1<D: Driver>(dr: &mut D, x: &UInt64<D>) -> Result<UInt64<D>, Error> {
    UInt64::xor3(dr, &x.rotr(14), &x.rotr(18), &x.rotr(41))
}

fn small_sigma0<D: Driver>(dr: &mut D, x: &UInt64<D>) -> Result<UInt64<D>, Error> {
    UInt64::xor3(dr, &x.rotr(1), &x.rotr(8), &x.shr(7))
}

fn small_sigma1<D: Driver>(dr: &mut D, x: &UInt64<D>) -> Result<UInt64<D>, Error> {
    UInt64::xor3(dr, &x.rotr(19), &x.rotr(61), &x.shr(6))
}

fn var_bit<D: Driver>(wire: D::W, value: Witness<D, D::F>) -> Bit<D> {
    Bit::Var(BoolWire::new_unchecked(WireValue::new(wire, value)))
}

/// `g + e * (f - g)`.
fn ch<D: Driver>(dr: &mut D, e: &Bit<D>, f: &Bit<D>, g: &Bit<D>) -> Result<Bit<D>, Error> {
    match (e, f.as_constant(), g.as_constant()) {
        (Bit::Constant(true), _, _) => Ok(f.clone()),
        (Bit::Constant(false), _, _) => Ok(g.clone()),
        (_, Some(x), Some(y)) if x == y => Ok(Bit::Constant(x)),
        (_, Some(true), Some(false)) => Ok(e.clone()),
        (_, Some(false), Some(true)) => e.not(dr),
        _ => {
            let diff = linear(dr, &[(f, D::F::ONE), (g, -D::F::ONE)], D::F::ZERO)?;
            let selector = e.to_wire(dr)?;
            let product = gadgets::mul(dr, &selector, &diff)?;
            let wire = dr.add(|| [(product.wire.clone(), D::F::ONE), g.term(D::F::ONE)])?;
            let value = D::just(|| *product.value.snag() + g.field_value());
            Ok(var_bit(wire, value))
        }
    }
}

/// Wires shared by the majority gate and the full adder over three variable
/// bits: `a XOR b`, `a AND b` and `(a XOR b) AND c`.
struct AdderParts<D: Driver> {
    a_xor_b: WireValue<D>,
    a_and_b: WireValue<D>,
    xor_and_c: WireValue<D>,
}

fn adder_parts<D: Driver>(
    dr: &mut D,
    a: &BoolWire<D>,
    b: &BoolWire<D>,
    c: &BoolWire<D>,
) -> Result<AdderParts<D>, Error> {
    let a_and_b = gadgets::mul(dr, &a.wire, &b.wire)?;
    let a_xor_b = WireValue::linear(
        dr,
        &[
            (&a.wire, D::F::ONE),
            (&b.wire, D::F::ONE),
            (&a_and_b, -D::F::ONE.double()),
        ],
        D::F::ZERO,
    )?;
    let xor_and_c = gadgets::mul(dr, &a_xor_b, &c.wire)?;
    Ok(AdderParts {
        a_xor_b,
        a_and_b,
        xor_and_c,
    })
}

fn carry_of<D: Driver>(dr: &mut D, parts: &AdderParts<D>) -> Result<Bit<D>, Error> {
    let carry = WireValue::linear(
        dr,
        &[(&parts.a_and_b, D::F::ONE), (&parts.xor_and_c, D::F::ONE)],
        D::F::ZERO,
    )?;
    Ok(Bit::Var(BoolWire::new_unchecked(carry)))
}

fn maj<D: Driver>(dr: &mut D, a: &Bit<D>, b: &Bit<D>, c: &Bit<D>) -> Result<Bit<D>, Error> {
    match (a, b, c) {
        (Bit::Constant(k), x, y) | (x, Bit::Constant(k), y) | (x, y, Bit::Constant(k)) => {
            if *k {
                Bit::or(dr, x, y)
            } else {
                Bit::and(dr, x, y)
            }
        }
        (Bit::Var(a), Bit::Var(b), Bit::Var(c)) => {
            let parts = adder_parts(dr, a, b, c)?;
            carry_of(dr, &parts)
        }
    }
}

/// Sum and carry of two bits.
fn half_add<D: Driver>(dr: &mut D, a: &Bit<D>, b: &Bit<D>) -> Result<(Bit<D>, Bit<D>), Error> {
    match (a, b) {
        (Bit::Constant(false), v) | (v, Bit::Constant(false)) => Ok((v.clone(), Bit::Constant(false))),
        (Bit::Constant(true), v) | (v, Bit::Constant(true)) => Ok((v.not(dr)?, v.clone())),
        (Bit::Var(x), Bit::Var(y)) => {
            let carry = gadgets::mul(dr, &x.wire, &y.wire)?;
            let sum = WireValue::linear(
                dr,
                &[
                    (&x.wire, D::F::ONE),
                    (&y.wire, D::F::ONE),
                    (&carry, -D::F::ONE.double()),
                ],
                D::F::ZERO,
            )?;
            Ok((
                Bit::Var(BoolWire::new_unchecked(sum)),
                Bit::Var(BoolWire::new_unchecked(carry)),
            ))
        }
    }
}

/// Sum and carry of two bits plus one.
fn half_add_one<D: Driver>(
    dr: &mut D,
    a: &Bit<D>,
    b: &Bit<D>,
) -> Result<(Bit<D>, Bit<D>), Error> {
    match (a, b) {
        (Bit::Var(x), Bit::Var(y)) => {
            // sum = NOT (x XOR y), carry = x OR y, from a single product.
            let xy = gadgets::mul(dr, &x.wire, &y.wire)?;
            let sum = WireValue::linear(
                dr,
                &[
                    (&x.wire, -D::F::ONE),
                    (&y.wire, -D::F::ONE),
                    (&xy, D::F::ONE.double()),
                ],
                D::F::ONE,
            )?;
            let carry = WireValue::linear(
                dr,
                &[(&x.wire, D::F::ONE), (&y.wire, D::F::ONE), (&xy, -D::F::ONE)],
                D::F::ZERO,
            )?;
            Ok((
                Bit::Var(BoolWire::new_unchecked(sum)),
                Bit::Var(BoolWire::new_unchecked(carry)),
            ))
        }
        _ => {
            let sum = Bit::xor(dr, a, b)?.not(dr)?;
            let carry = Bit::or(dr, a, b)?;
            Ok((sum, carry))
        }
    }
}

/// Sum and carry of three bits.
fn full_add<D: Driver>(
    dr: &mut D,
    a: &Bit<D>,
    b: &Bit<D>,
    c: &Bit<D>,
) -> Result<(Bit<D>, Bit<D>), Error> {
    match (a, b, c) {
        (Bit::Constant(k), x, y) | (x, Bit::Constant(k), y) | (x, y, Bit::Constant(k)) => {
            if *k {
                half_add_one(dr, x, y)
            } else {
                half_add(dr, x, y)
            }
        }
        (Bit::Var(a), Bit::Var(b), Bit::Var(c)) => {
            let parts = adder_parts(dr, a, b, c)?;
            let sum = WireValue::linear(
                dr,
                &[
                    (&parts.a_xor_b, D::F::ONE),
                    (&c.wire, D::F::ONE),
                    (&parts.xor_and_c, -D::F::ONE.double()),
                ],
                D::F::ZERO,
            )?;
            let carry = carry_of(dr, &parts)?;
            Ok((Bit::Var(BoolWire::new_unchecked(sum)), carry))
        }
    }
}
