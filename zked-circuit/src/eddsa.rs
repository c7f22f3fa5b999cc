//! EdDSA signature verification as a constraint system.
//!
//! There is no verdict wire. A signature that does not verify leaves the
//! constraint system without a satisfying witness.

use crate::bits::{swap_bit_order, Bit};
use crate::curve::{CurveParams, NativePoint, Point, ENCODED_BITS};
use crate::field::{FieldElement, FieldParams};
use crate::sha512::sha512;
use tracing::debug;
use zked_synth::{Driver, Error};

/// Width of a public key in bits.
pub const PUBLIC_KEY_BITS: usize = ENCODED_BITS;
/// Width of a signature `R || S` in bits.
pub const SIGNATURE_BITS: usize = 2 * ENCODED_BITS;

fn check_len(what: &str, actual: usize, expected: usize) -> Result<(), Error> {
    if actual != expected {
        return Err(Error::InvalidConfiguration(format!(
            "{what} must be {expected} bits, got {actual}"
        )));
    }
    Ok(())
}

/// Constrain `signature` to be a valid signature of `message` under
/// `public_key`.
///
/// All inputs are byte strings in bit form, most significant bit first
/// within each byte. Following RFC 8032 the check is
/// `[S]B = R + [SHA-512(R || A || M) mod l]A` with `S < l`; encodings of `A`
/// and `R` must be canonical.
pub fn verify<D: Driver, C: CurveParams>(
    dr: &mut D,
    message: &[Bit<D>],
    public_key: &[Bit<D>],
    signature: &[Bit<D>],
) -> Result<(), Error> {
    check_len("public key", public_key.len(), PUBLIC_KEY_BITS)?;
    check_len("signature", signature.len(), SIGNATURE_BITS)?;

    let a = Point::<D, C>::decompress(dr, public_key)?;
    let (r_encoding, s_encoding) = signature.split_at(ENCODED_BITS);
    let r = Point::<D, C>::decompress(dr, r_encoding)?;

    // The scalar field is narrower than 256 bits; once S is known to be
    // canonical its top bits are zero and can be skipped.
    let scalar_bits = C::Scalar::modulus().bits() as usize;
    let mut s_bits = swap_bit_order(s_encoding);
    FieldElement::<D, C::Scalar>::from_bits_le(dr, &s_bits)?;
    s_bits.truncate(scalar_bits);
    debug!(message_bits = message.len(), "decoded public key and signature");

    let transcript: Vec<Bit<D>> = r_encoding
        .iter()
        .chain(public_key)
        .chain(message)
        .cloned()
        .collect();
    let digest = sha512(dr, &transcript)?;
    let h = FieldElement::<D, C::Scalar>::reduce_wide(dr, &swap_bit_order(digest.bits()))?;
    let mut h_bits = h.to_bits_le(dr)?;
    h_bits.truncate(scalar_bits);
    debug!("derived challenge scalar");

    let lhs = Point::<D, C>::fixed_base_mul(dr, &NativePoint::generator(), &s_bits)?;
    let ha = a.scalar_mul(dr, &h_bits)?;
    let rhs = r.add(dr, &ha)?;
    debug!("computed both sides of the verification equation");

    Point::enforce_equal(dr, &lhs, &rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::{alloc_bits, constant_bits, hex_to_bits};
    use crate::curve::Ed25519;
    use halo2curves_axiom::bn256::Fr;
    use zked_synth::drivers::{CheckingDriver, CountingDriver};
    use zked_synth::{Always, Empty};

    #[test]
    fn wrong_input_widths_are_configuration_errors() {
        let mut dr = CountingDriver::<Fr>::new();
        let message = alloc_bits(&mut dr, Empty::new(), 8).unwrap();
        let key = alloc_bits(&mut dr, Empty::new(), PUBLIC_KEY_BITS).unwrap();
        let short = alloc_bits(&mut dr, Empty::new(), SIGNATURE_BITS - 8).unwrap();
        let err = verify::<_, Ed25519>(&mut dr, &message, &key, &short).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
    }

    #[test]
    fn non_canonical_s_is_rejected() {
        let message = hex_to_bits("53756363696e6374204c616273").unwrap();
        let key = hex_to_bits("f7ec1c43f4de9d49556de87b86b26a98942cb078486fdb44de38b80864c39731")
            .unwrap();
        // R from a valid signature, S replaced by S + l.
        let mut signature = hex_to_bits(
            "35c323757c20640a294345c89c0bfcebe3d554fdb0c7b7a0bdb72222c531b1ec",
        )
        .unwrap();
        let s = num_bigint::BigUint::from_bytes_le(
            &hex::decode("849fed99a053e0f5b02dd9a25bb6eb018885526d9f583cdbde0b1e9f6329da09")
                .unwrap(),
        ) + crate::field::Ed25519Scalar::modulus();
        let mut s_bytes = s.to_bytes_le();
        s_bytes.resize(32, 0);
        signature.extend(crate::bits::bytes_to_bits(&s_bytes));

        let mut dr = CheckingDriver::<Fr>::new();
        let signature = alloc_bits(&mut dr, Always(&signature[..]), SIGNATURE_BITS).unwrap();
        let err = verify::<_, Ed25519>(
            &mut dr,
            &constant_bits(&message),
            &constant_bits(&key),
            &signature,
        )
        .unwrap_err();
        assert!(err.is_unsatisfied());
    }
}
