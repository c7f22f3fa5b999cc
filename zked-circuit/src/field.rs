//! Non-native prime field arithmetic over 64-bit limbs.
//!
//! An element of a field with modulus `m < 2^256` is held as four limb wires,
//! each range-checked to 64 bits, and is always the canonical representative
//! in `[0, m)`. That makes equality a plain limb-wise comparison.
//!
//! Every operation is phrased as an integer identity between limb
//! polynomials. For a result `r` of some expression `e` the prover supplies a
//! quotient `q`, and the circuit checks `e - q·m - r = 0` over the integers:
//! coefficient `k` of the polynomial plus the carry coming in from `k - 1`
//! must equal `2^64` times the carry going out. Carries are signed, so each
//! one is biased by its static lower bound and range-checked to the width of
//! its static range. The bounds are tracked exactly while the polynomial is
//! built, and synthesis refuses any shape whose intermediate values could
//! wrap around the outer field.

use crate::bits::{self, Bit};
use core::marker::PhantomData;
use ff::{Field, PrimeField};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use zked_synth::gadgets::{self, alloc_uint, field_from_biguint};
use zked_synth::{Driver, Error, Maybe, MaybeKind, WireValue, Witness};

/// Bits per limb.
pub const LIMB_BITS: usize = 64;
/// Limbs per element.
pub const NUM_LIMBS: usize = 4;
/// Bit width of an element's limb representation.
pub const ELEMENT_BITS: usize = LIMB_BITS * NUM_LIMBS;

/// Build an integer from little-endian 64-bit limbs.
pub fn limbs_to_biguint(limbs: &[u64]) -> BigUint {
    limbs
        .iter()
        .rev()
        .fold(BigUint::zero(), |acc, &limb| (acc << LIMB_BITS) + limb)
}

fn limb_of(value: &BigUint, index: usize) -> BigUint {
    (value >> (LIMB_BITS * index)) & BigUint::from(u64::MAX)
}

fn field_from_bigint<F: PrimeField>(value: &BigInt) -> F {
    let magnitude = field_from_biguint::<F>(value.magnitude());
    if value.is_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Parameters of a prime field emulated inside the circuit.
pub trait FieldParams: Sized + 'static {
    /// Human-readable name, used in diagnostics.
    const NAME: &'static str;

    /// The prime modulus as little-endian 64-bit limbs.
    const MODULUS: [u64; NUM_LIMBS];

    /// The modulus.
    fn modulus() -> BigUint {
        limbs_to_biguint(&Self::MODULUS)
    }

    /// A square root of `a`, if `a` is a quadratic residue.
    ///
    /// Covers moduli congruent to 3 mod 4 and to 5 mod 8. For the latter,
    /// `2^((m-1)/4)` is a square root of -1.
    fn sqrt(a: &BigUint) -> Option<BigUint> {
        let m = Self::modulus();
        let a = a % &m;
        let candidate = if &m % 4u32 == BigUint::from(3u32) {
            a.modpow(&((&m + 1u32) >> 2), &m)
        } else if &m % 8u32 == BigUint::from(5u32) {
            let c = a.modpow(&((&m + 3u32) >> 3), &m);
            if (&c * &c) % &m == a {
                c
            } else {
                let sqrt_m1 = BigUint::from(2u32).modpow(&((&m - 1u32) >> 2), &m);
                (c * sqrt_m1) % &m
            }
        } else {
            return None;
        };
        ((&candidate * &candidate) % &m == a).then_some(candidate)
    }
}

/// The base field of Ed25519, `2^255 - 19`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Base;

impl FieldParams for Ed25519Base {
    const NAME: &'static str = "ed25519 base field";
    const MODULUS: [u64; NUM_LIMBS] = [
        0xffff_ffff_ffff_ffed,
        0xffff_ffff_ffff_ffff,
        0xffff_ffff_ffff_ffff,
        0x7fff_ffff_ffff_ffff,
    ];
}

/// The prime order `l` of the Ed25519 base point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519Scalar;

impl FieldParams for Ed25519Scalar {
    const NAME: &'static str = "ed25519 scalar field";
    const MODULUS: [u64; NUM_LIMBS] = [
        0x5812_631a_5cf5_d3ed,
        0x14de_f9de_a2f7_9cd6,
        0x0000_0000_0000_0000,
        0x1000_0000_0000_0000,
    ];
}

/// A summand of a field expression.
pub enum Term<'a, D: Driver, P: FieldParams> {
    /// `coeff · x`
    Scaled(&'a FieldElement<D, P>, BigInt),
    /// `coeff · x · y`
    Product(&'a FieldElement<D, P>, &'a FieldElement<D, P>, BigInt),
    /// A constant.
    Constant(BigInt),
}

impl<'a, D: Driver, P: FieldParams> Term<'a, D, P> {
    /// `coeff · x`
    pub fn scaled(x: &'a FieldElement<D, P>, coeff: impl Into<BigInt>) -> Self {
        Term::Scaled(x, coeff.into())
    }

    /// `coeff · x · y`
    pub fn product(
        x: &'a FieldElement<D, P>,
        y: &'a FieldElement<D, P>,
        coeff: impl Into<BigInt>,
    ) -> Self {
        Term::Product(x, y, coeff.into())
    }

    /// A constant.
    pub fn constant(value: impl Into<BigInt>) -> Self {
        Term::Constant(value.into())
    }

    /// Integer value of the term. Only call inside witness closures.
    fn value(&self) -> BigInt {
        match self {
            Term::Scaled(x, c) => c * BigInt::from(x.value.snag().clone()),
            Term::Product(x, y, c) => {
                c * BigInt::from(x.value.snag().clone()) * BigInt::from(y.value.snag().clone())
            }
            Term::Constant(c) => c.clone(),
        }
    }
}

/// Reduce a coefficient to the representative of least magnitude.
fn balanced<P: FieldParams>(coeff: &BigInt) -> BigInt {
    let m = BigInt::from(P::modulus());
    let reduced = coeff.mod_floor(&m);
    if &reduced + &reduced > m {
        reduced - m
    } else {
        reduced
    }
}

struct Coefficient<D: Driver> {
    terms: Vec<(D::W, D::F)>,
    lo: BigInt,
    hi: BigInt,
}

/// An integer polynomial in `2^64` whose coefficients are linear
/// combinations of wires with statically known bounds.
struct LimbPoly<D: Driver> {
    coeffs: Vec<Coefficient<D>>,
    values: Witness<D, Vec<BigInt>>,
}

impl<D: Driver> LimbPoly<D> {
    fn new() -> Self {
        LimbPoly {
            coeffs: Vec::new(),
            values: D::just(Vec::new),
        }
    }

    fn slot(&mut self, k: usize) -> &mut Coefficient<D> {
        while self.coeffs.len() <= k {
            self.coeffs.push(Coefficient {
                terms: Vec::new(),
                lo: BigInt::zero(),
                hi: BigInt::zero(),
            });
        }
        let len = self.coeffs.len();
        self.update_values(|values| values.resize(len, BigInt::zero()));
        &mut self.coeffs[k]
    }

    fn update_values(&mut self, f: impl FnOnce(&mut Vec<BigInt>)) {
        if D::MaybeKind::HAS_VALUE {
            f(self.values.view_mut().take());
        }
    }

    /// Add `scale · wire` at position `k`, for a wire in `[0, max]`.
    fn push(
        &mut self,
        k: usize,
        wire: D::W,
        scale: &BigInt,
        max: &BigInt,
        value: &Witness<D, BigInt>,
    ) {
        let coeff = self.slot(k);
        coeff.terms.push((wire, field_from_bigint(scale)));
        if scale.is_negative() {
            coeff.lo += scale * max;
        } else {
            coeff.hi += scale * max;
        }
        self.update_values(|values| values[k] += scale * value.snag());
    }

    /// Add `scale · wire` for an arbitrary `scale`, split across positions by
    /// its own limbs.
    fn push_scaled(
        &mut self,
        k: usize,
        wire: &D::W,
        scale: &BigInt,
        max: &BigInt,
        value: &Witness<D, BigInt>,
    ) {
        let negative = scale.is_negative();
        for (l, digit) in scale.magnitude().to_u64_digits().into_iter().enumerate() {
            if digit == 0 {
                continue;
            }
            let digit = if negative {
                -BigInt::from(digit)
            } else {
                BigInt::from(digit)
            };
            self.push(k + l, wire.clone(), &digit, max, value);
        }
    }

    fn push_constant_limb(&mut self, k: usize, c: BigInt) {
        let coeff = self.slot(k);
        coeff.terms.push((D::ONE, field_from_bigint(&c)));
        coeff.lo += &c;
        coeff.hi += &c;
        self.update_values(|values| values[k] += c);
    }

    fn add_constant(&mut self, c: &BigInt) {
        let negative = c.is_negative();
        for (k, digit) in c.magnitude().to_u64_digits().into_iter().enumerate() {
            if digit != 0 {
                let digit = BigInt::from(digit);
                self.push_constant_limb(k, if negative { -digit } else { digit });
            }
        }
    }

    fn add_element<P: FieldParams>(&mut self, x: &FieldElement<D, P>, scale: &BigInt) {
        let max = BigInt::from(u64::MAX);
        for (i, limb) in x.limbs.iter().enumerate() {
            let value = D::just(|| BigInt::from(limb_of(x.value.snag(), i)));
            self.push_scaled(i, &limb.wire, scale, &max, &value);
        }
    }

    fn add_product<P: FieldParams>(
        &mut self,
        dr: &mut D,
        x: &FieldElement<D, P>,
        y: &FieldElement<D, P>,
        scale: &BigInt,
    ) -> Result<(), Error> {
        let max = BigInt::from(u64::MAX) * BigInt::from(u64::MAX);
        for (i, a) in x.limbs.iter().enumerate() {
            for (j, b) in y.limbs.iter().enumerate() {
                let product = gadgets::mul(dr, a, b)?;
                let value = D::just(|| {
                    BigInt::from(limb_of(x.value.snag(), i)) * BigInt::from(limb_of(y.value.snag(), j))
                });
                self.push_scaled(i + j, &product.wire, scale, &max, &value);
            }
        }
        Ok(())
    }

    fn add_term<P: FieldParams>(
        &mut self,
        dr: &mut D,
        term: &Term<'_, D, P>,
        negate: bool,
    ) -> Result<(), Error> {
        let sign = |c: &BigInt| {
            let c = balanced::<P>(c);
            if negate {
                -c
            } else {
                c
            }
        };
        match term {
            Term::Scaled(x, c) => self.add_element(*x, &sign(c)),
            Term::Product(x, y, c) => self.add_product(dr, *x, *y, &sign(c))?,
            Term::Constant(c) => self.add_constant(&sign(c)),
        }
        Ok(())
    }

    /// Add `x · term`. Only linear terms can be multiplied this way.
    fn add_scaled_by<P: FieldParams>(
        &mut self,
        dr: &mut D,
        x: &FieldElement<D, P>,
        term: &Term<'_, D, P>,
    ) -> Result<(), Error> {
        match term {
            Term::Scaled(y, c) => self.add_product(dr, x, *y, &balanced::<P>(c)),
            Term::Constant(c) => {
                self.add_element(x, &balanced::<P>(c));
                Ok(())
            }
            Term::Product(..) => Err(Error::InvalidConfiguration(format!(
                "{} denominators must be linear in their elements",
                P::NAME
            ))),
        }
    }

    fn add_bits(&mut self, bits_le: &[Bit<D>]) {
        let one = BigInt::one();
        for (k, chunk) in bits_le.chunks(LIMB_BITS).enumerate() {
            for (j, bit) in chunk.iter().enumerate() {
                let weight = &one << j;
                match bit {
                    Bit::Constant(false) => {}
                    Bit::Constant(true) => self.push_constant_limb(k, weight),
                    Bit::Var(wire) => {
                        let value = D::just(|| BigInt::from(u8::from(bit.value().take())));
                        self.push(k, wire.wire().clone(), &weight, &one, &value);
                    }
                }
            }
        }
    }

    fn total_bounds(&self) -> (BigInt, BigInt) {
        self.coeffs.iter().rev().fold(
            (BigInt::zero(), BigInt::zero()),
            |(lo, hi), coeff| ((lo << LIMB_BITS) + &coeff.lo, (hi << LIMB_BITS) + &coeff.hi),
        )
    }

    fn total_value(&self) -> Witness<D, BigInt> {
        D::just(|| {
            self.values
                .snag()
                .iter()
                .rev()
                .fold(BigInt::zero(), |acc, v| (acc << LIMB_BITS) + v)
        })
    }

    /// Constrain the polynomial to be zero as an integer.
    fn enforce_zero(self, dr: &mut D) -> Result<(), Error> {
        let LimbPoly { coeffs, values } = self;
        let radix = BigInt::one() << LIMB_BITS;
        let radix_f = field_from_bigint::<D::F>(&radix);
        let last = coeffs.len().saturating_sub(1);

        let mut carry: Option<D::W> = None;
        let mut carry_lo = BigInt::zero();
        let mut carry_hi = BigInt::zero();
        let mut carry_value: Witness<D, BigInt> = D::just(BigInt::zero);

        for (k, coeff) in coeffs.into_iter().enumerate() {
            let lo = &coeff.lo + &carry_lo;
            let hi = &coeff.hi + &carry_hi;
            let mut terms = coeff.terms;
            if let Some(wire) = carry.take() {
                terms.push((wire, D::F::ONE));
                terms.push((D::ONE, field_from_bigint(&carry_lo)));
            }

            if k == last {
                check_capacity::<D::F>(lo.abs().max(hi.abs()))?;
                return dr.enforce_zero(|| terms);
            }

            let next_lo = lo.div_floor(&radix);
            let next_hi = hi.div_floor(&radix);
            check_capacity::<D::F>(
                lo.abs().max(hi.abs()) + &radix * next_lo.abs().max(next_hi.abs()),
            )?;

            let next_value = D::just(|| (&values.snag()[k] + carry_value.snag()).div_floor(&radix));
            let biased = D::just(|| {
                (next_value.snag() - &next_lo)
                    .to_biguint()
                    .unwrap_or_default()
            });
            let width = (&next_hi - &next_lo).bits() as usize;
            let (wire, _) = alloc_uint(dr, &biased, width)?;

            terms.push((wire.wire.clone(), -radix_f));
            terms.push((D::ONE, -field_from_bigint::<D::F>(&(&next_lo * &radix))));
            dr.enforce_zero(|| terms)?;

            carry = Some(wire.wire);
            carry_lo = next_lo;
            carry_hi = next_hi;
            carry_value = next_value;
        }
        Ok(())
    }

    /// Constrain the polynomial to be a multiple of `P`'s modulus.
    fn enforce_multiple_of<P: FieldParams>(mut self, dr: &mut D) -> Result<(), Error> {
        let m = BigInt::from(P::modulus());
        let (lo, _) = self.total_bounds();
        if lo.is_negative() {
            let shift = Integer::div_ceil(&-lo, &m) * &m;
            self.add_constant(&shift);
        }

        let (_, hi) = self.total_bounds();
        let quotient_bits = hi.div_floor(&m).bits() as usize;
        let total = self.total_value();
        let quotient = D::just(|| {
            total
                .snag()
                .div_floor(&m)
                .to_biguint()
                .unwrap_or_default()
        });

        for (i, start) in (0..quotient_bits).step_by(LIMB_BITS).enumerate() {
            let width = (quotient_bits - start).min(LIMB_BITS);
            let limb = D::just(|| limb_of(quotient.snag(), i));
            let (wire, _) = alloc_uint(dr, &limb, width)?;
            let max = (BigInt::one() << width) - 1;
            let value = D::just(|| BigInt::from(limb.snag().clone()));
            for (l, &m_limb) in P::MODULUS.iter().enumerate() {
                if m_limb != 0 {
                    self.push(i + l, wire.wire.clone(), &-BigInt::from(m_limb), &max, &value);
                }
            }
        }
        self.enforce_zero(dr)
    }
}

fn check_capacity<F: PrimeField>(bound: BigInt) -> Result<(), Error> {
    if bound.bits() > u64::from(F::CAPACITY) {
        return Err(Error::InvalidConfiguration(format!(
            "limb identity needs {} bits, the outer field holds {}",
            bound.bits(),
            F::CAPACITY
        )));
    }
    Ok(())
}

/// Allocate `num_bits` bits of `value` as 64-bit limb wires.
fn alloc_limbs<D: Driver>(
    dr: &mut D,
    value: &Witness<D, BigUint>,
    num_bits: usize,
) -> Result<(Vec<WireValue<D>>, Vec<Bit<D>>), Error> {
    let mut limbs = Vec::with_capacity(num_bits.div_ceil(LIMB_BITS));
    let mut bits = Vec::with_capacity(num_bits);
    for (i, start) in (0..num_bits).step_by(LIMB_BITS).enumerate() {
        let width = (num_bits - start).min(LIMB_BITS);
        let limb = D::just(|| limb_of(value.snag(), i));
        let (wire, limb_bits) = alloc_uint(dr, &limb, width)?;
        limbs.push(wire);
        bits.extend(limb_bits.into_iter().map(Bit::Var));
    }
    Ok((limbs, bits))
}

/// A canonical element of the field described by `P`.
pub struct FieldElement<D: Driver, P: FieldParams> {
    limbs: Vec<WireValue<D>>,
    bits: Option<Vec<Bit<D>>>,
    value: Witness<D, BigUint>,
    _params: PhantomData<P>,
}

impl<D: Driver, P: FieldParams> Clone for FieldElement<D, P> {
    fn clone(&self) -> Self {
        FieldElement {
            limbs: self.limbs.clone(),
            bits: self.bits.clone(),
            value: D::just(|| self.value.snag().clone()),
            _params: PhantomData,
        }
    }
}

impl<D: Driver, P: FieldParams> FieldElement<D, P> {
    /// Allocate an element from a witness value.
    ///
    /// The limbs are range-checked and the value is constrained to be below
    /// the modulus, so a witness `>= m` makes the circuit unsatisfiable.
    pub fn alloc(dr: &mut D, value: Witness<D, BigUint>) -> Result<Self, Error> {
        let (limbs, bits) = alloc_limbs(dr, &value, ELEMENT_BITS)?;
        let value = D::just(|| value.snag() % (BigUint::one() << ELEMENT_BITS));
        let element = FieldElement {
            limbs,
            bits: Some(bits),
            value,
            _params: PhantomData,
        };
        element.enforce_canonical(dr)?;
        Ok(element)
    }

    /// A constant element, reduced mod `m`.
    pub fn constant(dr: &mut D, value: &BigUint) -> Result<Self, Error> {
        let reduced = value % P::modulus();
        let limbs = (0..NUM_LIMBS)
            .map(|i| WireValue::constant(dr, field_from_biguint(&limb_of(&reduced, i))))
            .collect::<Result<Vec<_>, _>>()?;
        let bits = (0..ELEMENT_BITS as u64)
            .map(|i| Bit::Constant(reduced.bit(i)))
            .collect();
        Ok(FieldElement {
            limbs,
            bits: Some(bits),
            value: D::just(|| reduced),
            _params: PhantomData,
        })
    }

    /// The constant one.
    pub fn one(dr: &mut D) -> Result<Self, Error> {
        Self::constant(dr, &BigUint::one())
    }

    /// Pack at most 256 little-endian bits into an element.
    ///
    /// The packed integer must be below the modulus; otherwise the circuit is
    /// unsatisfiable.
    pub fn from_bits_le(dr: &mut D, bits_le: &[Bit<D>]) -> Result<Self, Error> {
        if bits_le.len() > ELEMENT_BITS {
            return Err(Error::InvalidConfiguration(format!(
                "{} bits do not fit a {} element",
                bits_le.len(),
                P::NAME
            )));
        }
        let mut padded = bits_le.to_vec();
        padded.resize(ELEMENT_BITS, Bit::Constant(false));

        let mut limbs = Vec::with_capacity(NUM_LIMBS);
        for chunk in padded.chunks(LIMB_BITS) {
            let mut weight = D::F::ONE;
            let mut terms = Vec::with_capacity(LIMB_BITS);
            for bit in chunk {
                terms.push((bit, weight));
                weight = weight.double();
            }
            limbs.push(bits::linear(dr, &terms, D::F::ZERO)?);
        }

        let value = D::just(|| {
            padded
                .iter()
                .rev()
                .fold(BigUint::zero(), |acc, bit| (acc << 1) + u8::from(bit.value().take()))
        });
        let element = FieldElement {
            limbs,
            bits: Some(padded),
            value,
            _params: PhantomData,
        };
        element.enforce_canonical(dr)?;
        Ok(element)
    }

    /// Reduce an arbitrary-width little-endian bit string mod `m`.
    pub fn reduce_wide(dr: &mut D, bits_le: &[Bit<D>]) -> Result<Self, Error> {
        let mut poly = LimbPoly::new();
        poly.add_bits(bits_le);
        Self::reduce(dr, poly)
    }

    /// The witness value.
    pub fn value(&self) -> &Witness<D, BigUint> {
        &self.value
    }

    /// The limb wires, least significant first.
    pub fn limbs(&self) -> &[WireValue<D>] {
        &self.limbs
    }

    fn enforce_canonical(&self, dr: &mut D) -> Result<(), Error> {
        let max = P::modulus() - 1u32;
        let slack = D::just(|| {
            let value = self.value.snag();
            if value <= &max {
                &max - value
            } else {
                BigUint::zero()
            }
        });
        let (slack_limbs, _) = alloc_limbs(dr, &slack, max.bits() as usize)?;

        // x + slack = m - 1 with slack >= 0.
        let mut poly = LimbPoly::new();
        poly.add_element(self, &BigInt::one());
        let limb_max = BigInt::from(u64::MAX);
        for (i, limb) in slack_limbs.iter().enumerate() {
            let value = D::just(|| BigInt::from(limb_of(slack.snag(), i)));
            poly.push(i, limb.wire.clone(), &BigInt::one(), &limb_max, &value);
        }
        poly.add_constant(&-BigInt::from(max));
        poly.enforce_zero(dr)
    }

    fn reduce(dr: &mut D, mut poly: LimbPoly<D>) -> Result<Self, Error> {
        let m = BigInt::from(P::modulus());
        let total = poly.total_value();
        let remainder = D::just(|| total.snag().mod_floor(&m).to_biguint().unwrap_or_default());
        let r = Self::alloc(dr, remainder)?;
        poly.add_element(&r, &-BigInt::one());
        poly.enforce_multiple_of::<P>(dr)?;
        Ok(r)
    }

    /// `Σ terms mod m`.
    pub fn sum_of(dr: &mut D, terms: &[Term<'_, D, P>]) -> Result<Self, Error> {
        let mut poly = LimbPoly::new();
        for term in terms {
            poly.add_term(dr, term, false)?;
        }
        Self::reduce(dr, poly)
    }

    /// Constrain `Σ terms ≡ 0 (mod m)`.
    pub fn enforce_zero_sum(dr: &mut D, terms: &[Term<'_, D, P>]) -> Result<(), Error> {
        let mut poly = LimbPoly::new();
        for term in terms {
            poly.add_term(dr, term, false)?;
        }
        poly.enforce_multiple_of::<P>(dr)
    }

    /// The element `x` with `x · Σ denominator ≡ Σ numerator (mod m)`.
    ///
    /// The denominator may only hold scaled elements and constants. When it
    /// is zero the witness is zero and the circuit is unsatisfiable unless
    /// the numerator is zero too.
    pub fn quotient(
        dr: &mut D,
        numerator: &[Term<'_, D, P>],
        denominator: &[Term<'_, D, P>],
    ) -> Result<Self, Error> {
        let m = BigInt::from(P::modulus());
        let value = D::just(|| {
            let num = numerator.iter().map(Term::value).sum::<BigInt>().mod_floor(&m);
            let den = denominator.iter().map(Term::value).sum::<BigInt>().mod_floor(&m);
            let inverse = den.modpow(&(&m - 2), &m);
            (num * inverse).mod_floor(&m).to_biguint().unwrap_or_default()
        });
        let x = Self::alloc(dr, value)?;

        let mut poly = LimbPoly::new();
        for term in denominator {
            poly.add_scaled_by(dr, &x, term)?;
        }
        for term in numerator {
            poly.add_term(dr, term, true)?;
        }
        poly.enforce_multiple_of::<P>(dr)?;
        Ok(x)
    }

    /// `self + other`
    pub fn add(&self, dr: &mut D, other: &Self) -> Result<Self, Error> {
        Self::sum_of(dr, &[Term::scaled(self, 1), Term::scaled(other, 1)])
    }

    /// `self - other`
    pub fn sub(&self, dr: &mut D, other: &Self) -> Result<Self, Error> {
        Self::sum_of(dr, &[Term::scaled(self, 1), Term::scaled(other, -1)])
    }

    /// `-self`
    pub fn neg(&self, dr: &mut D) -> Result<Self, Error> {
        Self::sum_of(dr, &[Term::scaled(self, -1)])
    }

    /// `self · other`
    pub fn mul(&self, dr: &mut D, other: &Self) -> Result<Self, Error> {
        Self::sum_of(dr, &[Term::product(self, other, 1)])
    }

    /// `self²`
    pub fn square(&self, dr: &mut D) -> Result<Self, Error> {
        self.mul(dr, self)
    }

    /// `c · self` for a constant `c`.
    pub fn mul_const(&self, dr: &mut D, c: &BigUint) -> Result<Self, Error> {
        Self::sum_of(dr, &[Term::scaled(self, c.clone())])
    }

    /// `self / denominator`
    pub fn div(&self, dr: &mut D, denominator: &Self) -> Result<Self, Error> {
        Self::quotient(dr, &[Term::scaled(self, 1)], &[Term::scaled(denominator, 1)])
    }

    /// `self⁻¹`. Unsatisfiable for zero.
    pub fn inverse(&self, dr: &mut D) -> Result<Self, Error> {
        Self::quotient(dr, &[Term::constant(1)], &[Term::scaled(self, 1)])
    }

    /// A square root of `self`. Unsatisfiable for a non-residue.
    pub fn sqrt(&self, dr: &mut D) -> Result<Self, Error> {
        let value = D::just(|| P::sqrt(self.value.snag()).unwrap_or_default());
        let root = Self::alloc(dr, value)?;
        Self::enforce_zero_sum(dr, &[Term::product(&root, &root, 1), Term::scaled(self, -1)])?;
        Ok(root)
    }

    /// `a` if `condition` is set, `b` otherwise.
    pub fn select(dr: &mut D, condition: &Bit<D>, a: &Self, b: &Self) -> Result<Self, Error> {
        let wire = match condition {
            Bit::Constant(true) => return Ok(a.clone()),
            Bit::Constant(false) => return Ok(b.clone()),
            Bit::Var(wire) => wire,
        };
        let limbs = a
            .limbs
            .iter()
            .zip(&b.limbs)
            .map(|(x, y)| gadgets::select(dr, wire, x, y))
            .collect::<Result<Vec<_>, _>>()?;
        let value = D::just(|| {
            if condition.value().take() {
                a.value.snag().clone()
            } else {
                b.value.snag().clone()
            }
        });
        Ok(FieldElement {
            limbs,
            bits: None,
            value,
            _params: PhantomData,
        })
    }

    /// Constrain two elements to be equal.
    pub fn enforce_equal(dr: &mut D, a: &Self, b: &Self) -> Result<(), Error> {
        for (x, y) in a.limbs.iter().zip(&b.limbs) {
            dr.enforce_equal(&x.wire, &y.wire)?;
        }
        Ok(())
    }

    /// The 256 little-endian bits of the element.
    pub fn to_bits_le(&self, dr: &mut D) -> Result<Vec<Bit<D>>, Error> {
        if let Some(bits) = &self.bits {
            return Ok(bits.clone());
        }
        let mut bits = Vec::with_capacity(ELEMENT_BITS);
        for limb in &self.limbs {
            bits.extend(gadgets::to_bits(dr, limb, LIMB_BITS)?.into_iter().map(Bit::Var));
        }
        Ok(bits)
    }

    /// The least significant bit.
    pub fn parity(&self, dr: &mut D) -> Result<Bit<D>, Error> {
        if let Some(bits) = &self.bits {
            return Ok(bits[0].clone());
        }
        let low = gadgets::to_bits(dr, &self.limbs[0], LIMB_BITS)?;
        Ok(Bit::Var(low[0].clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::alloc_bits;
    use halo2curves_axiom::bn256::Fr;
    use proptest::prelude::*;
    use rand::{Rng, SeedableRng};
    use zked_synth::drivers::{CheckingDriver, CountingDriver, ProvingDriver};
    use zked_synth::{Always, Empty};

    type Base<D> = FieldElement<D, Ed25519Base>;
    type Scalar<D> = FieldElement<D, Ed25519Scalar>;
    type Checked = CheckingDriver<Fr>;

    fn random_below(rng: &mut impl Rng, m: &BigUint) -> BigUint {
        let bytes: [u8; 32] = rng.gen();
        BigUint::from_bytes_le(&bytes) % m
    }

    #[test]
    fn moduli_match_their_definitions() {
        let p = (BigUint::one() << 255) - 19u32;
        assert_eq!(Ed25519Base::modulus(), p);
        let l = (BigUint::one() << 252)
            + "27742317777372353535851937790883648493"
                .parse::<BigUint>()
                .unwrap();
        assert_eq!(Ed25519Scalar::modulus(), l);
    }

    #[test]
    fn native_square_roots() {
        let p = Ed25519Base::modulus();
        let minus_one = &p - 1u32;
        let i = Ed25519Base::sqrt(&minus_one).unwrap();
        assert_eq!((&i * &i) % &p, minus_one);
        // 2 is not a square mod p.
        assert!(Ed25519Base::sqrt(&BigUint::from(2u32)).is_none());
        let root = Ed25519Scalar::sqrt(&BigUint::from(4u32)).unwrap();
        assert_eq!((&root * &root) % Ed25519Scalar::modulus(), BigUint::from(4u32));
    }

    #[test]
    fn inverse_times_element_is_one() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let p = Ed25519Base::modulus();
        for _ in 0..4 {
            let x = random_below(&mut rng, &p);
            let mut dr = Checked::new();
            let a = Base::alloc(&mut dr, Always(x.clone())).unwrap();
            let inv = a.inverse(&mut dr).unwrap();
            let product = a.mul(&mut dr, &inv).unwrap();
            assert_eq!(product.value().snag().clone(), BigUint::one());
            let one = Base::one(&mut dr).unwrap();
            Base::enforce_equal(&mut dr, &product, &one).unwrap();
        }
    }

    #[test]
    fn inverse_of_zero_is_unsatisfiable() {
        let mut dr = Checked::new();
        let zero = Base::alloc(&mut dr, Always(BigUint::zero())).unwrap();
        assert!(matches!(zero.inverse(&mut dr), Err(err) if err.is_unsatisfied()));
    }

    #[test]
    fn non_canonical_witness_is_unsatisfiable() {
        let mut dr = Checked::new();
        let result = Base::alloc(&mut dr, Always(Ed25519Base::modulus()));
        assert!(matches!(result, Err(err) if err.is_unsatisfied()));

        let mut dr = Checked::new();
        let max = Ed25519Base::modulus() - 1u32;
        Base::alloc(&mut dr, Always(max)).unwrap();
    }

    #[test]
    fn wrong_remainder_breaks_the_recorded_system() {
        let mut dr = ProvingDriver::<Fr>::new();
        let a = Scalar::alloc(&mut dr, Always(BigUint::from(12345u32))).unwrap();
        let b = Scalar::alloc(&mut dr, Always(Ed25519Scalar::modulus() - 2u32)).unwrap();
        let c = a.mul(&mut dr, &b).unwrap();
        assert_eq!(c.value().snag().clone(), Ed25519Scalar::modulus() - 24690u32);
        dr.check_constraints().unwrap();

        let index = c.limbs()[0].wire.index;
        dr.witness[index] += Fr::ONE;
        assert!(dr.check_constraints().is_err());
    }

    #[test]
    fn square_roots_in_circuit() {
        let mut dr = Checked::new();
        let four = Base::alloc(&mut dr, Always(BigUint::from(4u32))).unwrap();
        let root = four.sqrt(&mut dr).unwrap();
        let root = root.value().snag().clone();
        assert!(root == BigUint::from(2u32) || root == Ed25519Base::modulus() - 2u32);

        let mut dr = Checked::new();
        let two = Base::alloc(&mut dr, Always(BigUint::from(2u32))).unwrap();
        assert!(matches!(two.sqrt(&mut dr), Err(err) if err.is_unsatisfied()));
    }

    #[test]
    fn bits_round_trip_and_range() {
        let value = Ed25519Scalar::modulus() - 1u32;
        let bits: Vec<bool> = (0..256).map(|i| value.bit(i)).collect();
        let mut dr = Checked::new();
        let wires = alloc_bits(&mut dr, Always(&bits[..]), 256).unwrap();
        let element = Scalar::from_bits_le(&mut dr, &wires).unwrap();
        assert_eq!(element.value().snag().clone(), value);
        assert!(!element.parity(&mut dr).unwrap().value().take());

        let too_big = Ed25519Scalar::modulus();
        let bits: Vec<bool> = (0..256).map(|i| too_big.bit(i)).collect();
        let mut dr = Checked::new();
        let wires = alloc_bits(&mut dr, Always(&bits[..]), 256).unwrap();
        let result = Scalar::from_bits_le(&mut dr, &wires);
        assert!(matches!(result, Err(err) if err.is_unsatisfied()));
    }

    #[test]
    fn selected_elements_decompose() {
        let mut dr = Checked::new();
        let a = Base::alloc(&mut dr, Always(BigUint::from(5u32))).unwrap();
        let b = Base::alloc(&mut dr, Always(BigUint::from(8u32))).unwrap();
        let flag = Bit::alloc(&mut dr, Always(true)).unwrap();
        let chosen = Base::select(&mut dr, &flag, &a, &b).unwrap();
        assert_eq!(chosen.value().snag().clone(), BigUint::from(5u32));
        assert!(chosen.parity(&mut dr).unwrap().value().take());
        let bits = chosen.to_bits_le(&mut dr).unwrap();
        assert_eq!(bits.len(), ELEMENT_BITS);
        assert!(bits[2].value().take());
    }

    #[test]
    fn wide_reduction_matches_native() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let bytes: [u8; 64] = core::array::from_fn(|_| rng.gen());
        let wide = BigUint::from_bytes_le(&bytes);
        let bits: Vec<bool> = (0..512).map(|i| wide.bit(i)).collect();

        let mut dr = Checked::new();
        let wires = alloc_bits(&mut dr, Always(&bits[..]), 512).unwrap();
        let reduced = Scalar::reduce_wide(&mut dr, &wires).unwrap();
        assert_eq!(reduced.value().snag().clone(), &wide % Ed25519Scalar::modulus());
    }

    #[test]
    fn shapes_agree_across_drivers() {
        let mut counting = CountingDriver::<Fr>::new();
        let a = Base::alloc(&mut counting, Empty::new()).unwrap();
        let b = Base::alloc(&mut counting, Empty::new()).unwrap();
        let c = a.mul(&mut counting, &b).unwrap();
        c.div(&mut counting, &a).unwrap();

        let mut checking = Checked::new();
        let a = Base::alloc(&mut checking, Always(BigUint::from(3u32))).unwrap();
        let b = Base::alloc(&mut checking, Always(Ed25519Base::modulus() - 5u32)).unwrap();
        let c = a.mul(&mut checking, &b).unwrap();
        let d = c.div(&mut checking, &a).unwrap();
        assert_eq!(d.value().snag().clone(), Ed25519Base::modulus() - 5u32);

        assert_eq!(counting.stats(), checking.stats());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn arithmetic_matches_biguint(a in any::<[u8; 32]>(), b in any::<[u8; 32]>()) {
            let p = Ed25519Base::modulus();
            let a = BigUint::from_bytes_le(&a) % &p;
            let b = BigUint::from_bytes_le(&b) % &p;

            let mut dr = Checked::new();
            let x = Base::alloc(&mut dr, Always(a.clone())).unwrap();
            let y = Base::alloc(&mut dr, Always(b.clone())).unwrap();

            prop_assert_eq!(x.add(&mut dr, &y).unwrap().value().snag().clone(), (&a + &b) % &p);
            prop_assert_eq!(x.sub(&mut dr, &y).unwrap().value().snag().clone(), (&a + &p - &b) % &p);
            prop_assert_eq!(x.mul(&mut dr, &y).unwrap().value().snag().clone(), (&a * &b) % &p);
            prop_assert_eq!(x.neg(&mut dr).unwrap().value().snag().clone(), (&p - &a) % &p);
            let c = BigUint::from(121666u32);
            prop_assert_eq!(x.mul_const(&mut dr, &c).unwrap().value().snag().clone(), (&a * &c) % &p);
        }
    }
}
