//! Twisted Edwards curves `a·x² + y² = 1 + d·x²·y²` in affine coordinates.
//!
//! Coordinates are non-native [`FieldElement`]s. Additions use the unified
//! formula, which is complete when `a` is a square and `d` is not, so no
//! input needs special-casing. Doubling uses the dedicated formula that
//! holds for every point on the curve.

use crate::bits::{swap_bit_order, Bit};
use crate::field::{limbs_to_biguint, FieldElement, FieldParams, Term, NUM_LIMBS};
use crate::field::{Ed25519Base, Ed25519Scalar};
use core::marker::PhantomData;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use zked_synth::{Driver, Error, Maybe, Witness};

/// Width of a compressed point encoding in bits.
pub const ENCODED_BITS: usize = 256;

/// Parameters of a twisted Edwards curve.
pub trait CurveParams: Copy + core::fmt::Debug + Eq + 'static {
    /// Field of the coordinates.
    type Base: FieldParams;
    /// Field of scalars, of prime order equal to the base point's.
    type Scalar: FieldParams;

    /// Curve coefficient `a`.
    const A: i64;
    /// Curve coefficient `d`, little-endian limbs.
    const D: [u64; NUM_LIMBS];
    /// Base point x-coordinate, little-endian limbs.
    const BASE_X: [u64; NUM_LIMBS];
    /// Base point y-coordinate, little-endian limbs.
    const BASE_Y: [u64; NUM_LIMBS];

    /// `a` as an integer.
    fn a() -> BigInt {
        BigInt::from(Self::A)
    }

    /// `d` as an integer.
    fn d() -> BigUint {
        limbs_to_biguint(&Self::D)
    }
}

/// Edwards25519, the curve behind Ed25519 signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ed25519;

impl CurveParams for Ed25519 {
    type Base = Ed25519Base;
    type Scalar = Ed25519Scalar;

    const A: i64 = -1;
    const D: [u64; NUM_LIMBS] = [
        0x75eb_4dca_1359_78a3,
        0x0070_0a4d_4141_d8ab,
        0x8cc7_4079_7779_e898,
        0x5203_6cee_2b6f_fe73,
    ];
    const BASE_X: [u64; NUM_LIMBS] = [
        0xc956_2d60_8f25_d51a,
        0x692c_c760_9525_a7b2,
        0xc0a4_e231_fdd6_dc5c,
        0x2169_36d3_cd6e_53fe,
    ];
    const BASE_Y: [u64; NUM_LIMBS] = [
        0x6666_6666_6666_6658,
        0x6666_6666_6666_6666,
        0x6666_6666_6666_6666,
        0x6666_6666_6666_6666,
    ];
}

fn base_modulus<C: CurveParams>() -> BigInt {
    BigInt::from(C::Base::modulus())
}

fn reduce<C: CurveParams>(value: BigInt) -> BigUint {
    value
        .mod_floor(&base_modulus::<C>())
        .to_biguint()
        .unwrap_or_default()
}

fn invert<C: CurveParams>(value: &BigUint) -> BigUint {
    let p = C::Base::modulus();
    value.modpow(&(&p - 2u32), &p)
}

/// An affine point computed outside the circuit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NativePoint<C: CurveParams> {
    /// x-coordinate, reduced.
    pub x: BigUint,
    /// y-coordinate, reduced.
    pub y: BigUint,
    _curve: PhantomData<C>,
}

impl<C: CurveParams> NativePoint<C> {
    /// A point from its coordinates. Not checked to be on the curve.
    pub fn new(x: BigUint, y: BigUint) -> Self {
        let p = C::Base::modulus();
        NativePoint {
            x: x % &p,
            y: y % &p,
            _curve: PhantomData,
        }
    }

    /// The neutral element `(0, 1)`.
    pub fn identity() -> Self {
        Self::new(BigUint::zero(), BigUint::one())
    }

    /// The curve's base point.
    pub fn generator() -> Self {
        Self::new(limbs_to_biguint(&C::BASE_X), limbs_to_biguint(&C::BASE_Y))
    }

    /// Whether the point satisfies the curve equation.
    pub fn is_on_curve(&self) -> bool {
        let x = BigInt::from(self.x.clone());
        let y = BigInt::from(self.y.clone());
        let xx = &x * &x;
        let yy = &y * &y;
        let d = BigInt::from(C::d());
        reduce::<C>(C::a() * &xx + &yy - 1 - d * xx * yy).is_zero()
    }

    /// Point addition.
    pub fn add(&self, other: &Self) -> Self {
        let (x1, y1) = (BigInt::from(self.x.clone()), BigInt::from(self.y.clone()));
        let (x2, y2) = (BigInt::from(other.x.clone()), BigInt::from(other.y.clone()));
        let t = &x1 * &x2;
        let u = &y1 * &y2;
        let v = BigInt::from(C::d()) * &t * &u;
        let x_num = reduce::<C>(&x1 * &y2 + &y1 * &x2);
        let x_den = reduce::<C>(BigInt::one() + &v);
        let y_num = reduce::<C>(u - C::a() * t);
        let y_den = reduce::<C>(BigInt::one() - v);
        Self::new(x_num * invert::<C>(&x_den), y_num * invert::<C>(&y_den))
    }

    /// Point doubling.
    pub fn double(&self) -> Self {
        self.add(self)
    }

    /// `[scalar] self`.
    pub fn mul(&self, scalar: &BigUint) -> Self {
        (0..scalar.bits()).rev().fold(Self::identity(), |acc, i| {
            let acc = acc.double();
            if scalar.bit(i) {
                acc.add(self)
            } else {
                acc
            }
        })
    }

    /// The 32-byte compressed encoding: `y` little-endian with the parity of
    /// `x` in the top bit.
    pub fn encode(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        let y = self.y.to_bytes_le();
        bytes[..y.len()].copy_from_slice(&y);
        if self.x.bit(0) {
            bytes[31] |= 0x80;
        }
        bytes
    }

    /// Decode a compressed point. Rejects non-canonical `y`, missing square
    /// roots and a set sign bit on `x = 0`.
    pub fn decode(bytes: &[u8; 32]) -> Option<Self> {
        let sign = bytes[31] >> 7 == 1;
        let mut y_bytes = *bytes;
        y_bytes[31] &= 0x7f;
        let y = BigUint::from_bytes_le(&y_bytes);
        let p = C::Base::modulus();
        if y >= p {
            return None;
        }

        let yy = BigInt::from(&y * &y);
        let num = reduce::<C>(&yy - 1);
        let den = reduce::<C>(BigInt::from(C::d()) * &yy - C::a());
        let x2 = (num * invert::<C>(&den)) % &p;
        let mut x = C::Base::sqrt(&x2)?;
        if x.is_zero() && sign {
            return None;
        }
        if x.bit(0) != sign {
            x = &p - x;
        }
        Some(Self::new(x, y))
    }
}

/// A curve point whose coordinates are circuit values.
pub struct Point<D: Driver, C: CurveParams> {
    x: FieldElement<D, C::Base>,
    y: FieldElement<D, C::Base>,
}

type Coordinate<D, C> = FieldElement<D, <C as CurveParams>::Base>;

impl<D: Driver, C: CurveParams> Clone for Point<D, C> {
    fn clone(&self) -> Self {
        Point {
            x: self.x.clone(),
            y: self.y.clone(),
        }
    }
}

impl<D: Driver, C: CurveParams> Point<D, C> {
    /// The x-coordinate.
    pub fn x(&self) -> &Coordinate<D, C> {
        &self.x
    }

    /// The y-coordinate.
    pub fn y(&self) -> &Coordinate<D, C> {
        &self.y
    }

    /// Allocate a point from a witness and constrain it to the curve.
    pub fn alloc(dr: &mut D, value: Witness<D, NativePoint<C>>) -> Result<Self, Error> {
        let x = Coordinate::<D, C>::alloc(dr, D::just(|| value.snag().x.clone()))?;
        let y = Coordinate::<D, C>::alloc(dr, D::just(|| value.snag().y.clone()))?;
        let point = Point { x, y };
        point.enforce_on_curve(dr)?;
        Ok(point)
    }

    /// A point fixed at build time.
    pub fn constant(dr: &mut D, point: &NativePoint<C>) -> Result<Self, Error> {
        Ok(Point {
            x: Coordinate::<D, C>::constant(dr, &point.x)?,
            y: Coordinate::<D, C>::constant(dr, &point.y)?,
        })
    }

    /// The neutral element.
    pub fn identity(dr: &mut D) -> Result<Self, Error> {
        Self::constant(dr, &NativePoint::identity())
    }

    /// The witness value of the point.
    pub fn value(&self) -> Witness<D, NativePoint<C>> {
        D::just(|| NativePoint::new(self.x.value().snag().clone(), self.y.value().snag().clone()))
    }

    /// Constrain `a·x² + y² = 1 + d·x²·y²`.
    pub fn enforce_on_curve(&self, dr: &mut D) -> Result<(), Error> {
        let xx = self.x.square(dr)?;
        let yy = self.y.square(dr)?;
        Coordinate::<D, C>::enforce_zero_sum(
            dr,
            &[
                Term::scaled(&xx, C::a()),
                Term::scaled(&yy, 1),
                Term::constant(-1),
                Term::product(&xx, &yy, -BigInt::from(C::d())),
            ],
        )
    }

    /// Constrain two points to be equal.
    pub fn enforce_equal(dr: &mut D, a: &Self, b: &Self) -> Result<(), Error> {
        Coordinate::<D, C>::enforce_equal(dr, &a.x, &b.x)?;
        Coordinate::<D, C>::enforce_equal(dr, &a.y, &b.y)
    }

    /// `a` if `condition` is set, `b` otherwise.
    pub fn select(dr: &mut D, condition: &Bit<D>, a: &Self, b: &Self) -> Result<Self, Error> {
        Ok(Point {
            x: Coordinate::<D, C>::select(dr, condition, &a.x, &b.x)?,
            y: Coordinate::<D, C>::select(dr, condition, &a.y, &b.y)?,
        })
    }

    /// Unified addition.
    pub fn add(&self, dr: &mut D, other: &Self) -> Result<Self, Error> {
        let d = BigInt::from(C::d());
        let t = self.x.mul(dr, &other.x)?;
        let u = self.y.mul(dr, &other.y)?;
        let v = t.mul(dr, &u)?;

        let x = Coordinate::<D, C>::quotient(
            dr,
            &[
                Term::product(&self.x, &other.y, 1),
                Term::product(&self.y, &other.x, 1),
            ],
            &[Term::constant(1), Term::scaled(&v, d.clone())],
        )?;
        let y = Coordinate::<D, C>::quotient(
            dr,
            &[Term::scaled(&u, 1), Term::scaled(&t, -C::a())],
            &[Term::constant(1), Term::scaled(&v, -d)],
        )?;
        Ok(Point { x, y })
    }

    /// Addition of a point fixed at build time.
    ///
    /// The constant coordinates fold into the term coefficients, leaving a
    /// single product `x·y` to compute.
    pub fn add_constant(&self, dr: &mut D, other: &NativePoint<C>) -> Result<Self, Error> {
        let cx = BigInt::from(other.x.clone());
        let cy = BigInt::from(other.y.clone());
        let k = BigInt::from(C::d()) * &cx * &cy;
        let t = self.x.mul(dr, &self.y)?;

        let x = Coordinate::<D, C>::quotient(
            dr,
            &[Term::scaled(&self.x, cy.clone()), Term::scaled(&self.y, cx.clone())],
            &[Term::constant(1), Term::scaled(&t, k.clone())],
        )?;
        let y = Coordinate::<D, C>::quotient(
            dr,
            &[Term::scaled(&self.y, cy), Term::scaled(&self.x, -C::a() * cx)],
            &[Term::constant(1), Term::scaled(&t, -k)],
        )?;
        Ok(Point { x, y })
    }

    /// Point doubling.
    pub fn double(&self, dr: &mut D) -> Result<Self, Error> {
        let a = C::a();
        let xx = self.x.square(dr)?;
        let yy = self.y.square(dr)?;

        let x = Coordinate::<D, C>::quotient(
            dr,
            &[Term::product(&self.x, &self.y, 2)],
            &[Term::scaled(&xx, a.clone()), Term::scaled(&yy, 1)],
        )?;
        let y = Coordinate::<D, C>::quotient(
            dr,
            &[Term::scaled(&yy, 1), Term::scaled(&xx, -a.clone())],
            &[Term::constant(2), Term::scaled(&xx, -a), Term::scaled(&yy, -1)],
        )?;
        Ok(Point { x, y })
    }

    /// `[scalar] self` for a scalar given as little-endian bits.
    ///
    /// Double-and-add from the most significant bit. Every step computes the
    /// sum and selects it, so the shape only depends on the bit count.
    pub fn scalar_mul(&self, dr: &mut D, bits_le: &[Bit<D>]) -> Result<Self, Error> {
        let mut acc = Self::identity(dr)?;
        for bit in bits_le.iter().rev() {
            acc = acc.double(dr)?;
            let sum = acc.add(dr, self)?;
            acc = Self::select(dr, bit, &sum, &acc)?;
        }
        Ok(acc)
    }

    /// `[scalar] base` for a base point fixed at build time.
    ///
    /// Adds the precomputed multiples `2^i · base` selected by each bit.
    pub fn fixed_base_mul(
        dr: &mut D,
        base: &NativePoint<C>,
        bits_le: &[Bit<D>],
    ) -> Result<Self, Error> {
        let mut acc = Self::identity(dr)?;
        let mut multiple = base.clone();
        for bit in bits_le {
            let sum = acc.add_constant(dr, &multiple)?;
            acc = Self::select(dr, bit, &sum, &acc)?;
            multiple = multiple.double();
        }
        Ok(acc)
    }

    /// Decode a 256-bit compressed encoding given in byte order, most
    /// significant bit first within each byte.
    ///
    /// Unsatisfiable when `y` is not canonical, when `x²` has no square root
    /// or when the sign bit is set on `x = 0`.
    pub fn decompress(dr: &mut D, encoding: &[Bit<D>]) -> Result<Self, Error> {
        if encoding.len() != ENCODED_BITS {
            return Err(Error::InvalidConfiguration(format!(
                "a compressed point has {ENCODED_BITS} bits, got {}",
                encoding.len()
            )));
        }
        let bits_le = swap_bit_order(encoding);
        let sign = &bits_le[ENCODED_BITS - 1];

        let y = Coordinate::<D, C>::from_bits_le(dr, &bits_le[..ENCODED_BITS - 1])?;
        let yy = y.square(dr)?;
        let xx = Coordinate::<D, C>::quotient(
            dr,
            &[Term::scaled(&yy, 1), Term::constant(-1)],
            &[Term::scaled(&yy, C::d()), Term::constant(-C::a())],
        )?;
        let root = xx.sqrt(dr)?;
        let negated = root.neg(dr)?;

        let root_parity = root.parity(dr)?;
        let flip = Bit::xor(dr, &root_parity, sign)?;
        let x = Coordinate::<D, C>::select(dr, &flip, &negated, &root)?;
        let x_parity = x.parity(dr)?;
        Bit::enforce_equal(dr, &x_parity, sign)?;

        Ok(Point { x, y })
    }

    /// The 256-bit compressed encoding in byte order, most significant bit
    /// first within each byte.
    pub fn encode(&self, dr: &mut D) -> Result<Vec<Bit<D>>, Error> {
        let mut bits_le = self.y.to_bits_le(dr)?;
        bits_le.truncate(ENCODED_BITS - 1);
        bits_le.push(self.x.parity(dr)?);
        Ok(swap_bit_order(&bits_le))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{alloc_bits, bit_values, bytes_to_bits, constant_bits};
    use ed25519_dalek::SigningKey;
    use halo2curves_axiom::bn256::Fr;
    use hex_literal::hex;
    use proptest::prelude::*;
    use sha2::Digest;
    use zked_synth::drivers::CheckingDriver;
    use zked_synth::Always;

    type Native = NativePoint<Ed25519>;
    type Checked = CheckingDriver<Fr>;
    type EdPoint = Point<Checked, Ed25519>;

    fn scalar_bits(value: u64, width: usize) -> Vec<Bit<Checked>> {
        (0..width).map(|i| Bit::Constant((value >> i) & 1 == 1)).collect()
    }

    fn alloc_scalar(dr: &mut Checked, value: &BigUint, width: usize) -> Vec<Bit<Checked>> {
        let bits: Vec<bool> = (0..width as u64).map(|i| value.bit(i)).collect();
        alloc_bits(dr, Always(&bits[..]), width).unwrap()
    }

    fn random_point(seed: &[u8; 32]) -> Native {
        Native::generator().mul(&BigUint::from_bytes_le(seed))
    }

    #[test]
    fn generator_encoding() {
        let g = Native::generator();
        assert!(g.is_on_curve());
        assert_eq!(
            g.encode(),
            hex!("5866666666666666666666666666666666666666666666666666666666666666")
        );
        assert_eq!(Native::decode(&g.encode()), Some(g));
    }

    #[test]
    fn native_scalar_mul_derives_rfc8032_public_key() {
        // RFC 8032, section 7.1, test 1.
        let secret = hex!("9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60");
        let public = hex!("d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a");

        let mut h: [u8; 64] = [0; 64];
        h.copy_from_slice(&sha2::Sha512::digest(secret));
        h[0] &= 248;
        h[31] &= 127;
        h[31] |= 64;
        let scalar = BigUint::from_bytes_le(&h[..32]);

        assert_eq!(Native::generator().mul(&scalar).encode(), public);
    }

    #[test]
    fn native_decode_accepts_dalek_keys() {
        let mut rng = rand::thread_rng();
        for _ in 0..8 {
            let key = SigningKey::generate(&mut rng);
            let bytes = key.verifying_key().to_bytes();
            let point = Native::decode(&bytes).unwrap();
            assert!(point.is_on_curve());
            assert_eq!(point.encode(), bytes);
        }
    }

    #[test]
    fn decompress_rejects_invalid_encodings() {
        let p_bytes = hex!("edffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff7f");
        // y = 1 gives x = 0, so the sign bit cannot be set.
        let signed_zero = hex!("0100000000000000000000000000000000000000000000000000000000000080");

        for bytes in [p_bytes, signed_zero] {
            assert_eq!(Native::decode(&bytes), None);
            let encoding = bytes_to_bits(&bytes);
            let mut dr = Checked::new();
            let wires = alloc_bits(&mut dr, Always(&encoding[..]), ENCODED_BITS).unwrap();
            let result = EdPoint::decompress(&mut dr, &wires);
            assert!(matches!(result, Err(err) if err.is_unsatisfied()));
        }
    }

    #[test]
    fn decompress_rejects_points_off_the_curve() {
        // y = 2 has no matching x on edwards25519.
        let mut bytes = [0u8; 32];
        bytes[0] = 2;
        assert_eq!(Native::decode(&bytes), None);

        let mut dr = Checked::new();
        let encoding = constant_bits(&bytes_to_bits(&bytes));
        let result = EdPoint::decompress(&mut dr, &encoding);
        assert!(matches!(result, Err(err) if err.is_unsatisfied()));
    }

    #[test]
    fn addition_and_doubling_match_native() {
        let p = Native::generator().mul(&BigUint::from(5u32));
        let q = Native::generator().mul(&BigUint::from(11u32));

        let mut dr = Checked::new();
        let a = EdPoint::alloc(&mut dr, Always(p.clone())).unwrap();
        let b = EdPoint::alloc(&mut dr, Always(q.clone())).unwrap();
        assert_eq!(a.add(&mut dr, &b).unwrap().value().take(), p.add(&q));
        assert_eq!(a.double(&mut dr).unwrap().value().take(), p.double());
        assert_eq!(a.add_constant(&mut dr, &q).unwrap().value().take(), p.add(&q));

        let identity = EdPoint::identity(&mut dr).unwrap();
        assert_eq!(identity.double(&mut dr).unwrap().value().take(), Native::identity());
        assert_eq!(a.add(&mut dr, &identity).unwrap().value().take(), p);
    }

    #[test]
    fn fixed_base_matches_variable_base() {
        let scalar = 0b1011_0110u64;
        let mut dr = Checked::new();
        let bits = alloc_scalar(&mut dr, &BigUint::from(scalar), 8);

        let fixed = EdPoint::fixed_base_mul(&mut dr, &Native::generator(), &bits).unwrap();
        let generator = EdPoint::constant(&mut dr, &Native::generator()).unwrap();
        let variable = generator.scalar_mul(&mut dr, &scalar_bits(scalar, 8)).unwrap();

        EdPoint::enforce_equal(&mut dr, &fixed, &variable).unwrap();
        assert_eq!(
            fixed.value().take(),
            Native::generator().mul(&BigUint::from(scalar))
        );
    }

    #[test]
    fn unequal_points_are_unsatisfiable() {
        let mut dr = Checked::new();
        let a = EdPoint::alloc(&mut dr, Always(Native::generator())).unwrap();
        let b = a.double(&mut dr).unwrap();
        assert!(EdPoint::enforce_equal(&mut dr, &a, &b).unwrap_err().is_unsatisfied());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(4))]

        #[test]
        fn decompress_then_encode_is_identity(seed in any::<[u8; 32]>()) {
            let point = random_point(&seed);
            let encoding = bytes_to_bits(&point.encode());

            let mut dr = Checked::new();
            let wires = alloc_bits(&mut dr, Always(&encoding[..]), ENCODED_BITS).unwrap();
            let decoded = EdPoint::decompress(&mut dr, &wires).unwrap();
            prop_assert_eq!(decoded.value().take(), point);
            decoded.enforce_on_curve(&mut dr).unwrap();

            let encoded = decoded.encode(&mut dr).unwrap();
            prop_assert_eq!(bit_values::<Checked>(&encoded).take(), encoding);
        }

        #[test]
        fn scalar_multiplication_is_additive(
            seed in any::<[u8; 32]>(),
            x in any::<u128>(),
            y in any::<u128>(),
        ) {
            let base = random_point(&seed);
            let (x, y) = (BigUint::from(x), BigUint::from(y));
            let sum = &x + &y;

            let mut dr = Checked::new();
            let point = EdPoint::alloc(&mut dr, Always(base.clone())).unwrap();
            let x_bits = alloc_scalar(&mut dr, &x, 128);
            let y_bits = alloc_scalar(&mut dr, &y, 128);
            let sum_bits = alloc_scalar(&mut dr, &sum, 129);

            let xp = point.scalar_mul(&mut dr, &x_bits).unwrap();
            let yp = point.scalar_mul(&mut dr, &y_bits).unwrap();
            let added = xp.add(&mut dr, &yp).unwrap();
            let direct = point.scalar_mul(&mut dr, &sum_bits).unwrap();

            EdPoint::enforce_equal(&mut dr, &added, &direct).unwrap();
            prop_assert_eq!(direct.value().take(), base.mul(&sum));
        }
    }
}
