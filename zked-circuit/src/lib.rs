//! # zked-circuit - SHA-512 and Ed25519 verification circuits
//!
//! Gadgets built on [`zked_synth`] that express SHA-512 and RFC 8032 Ed25519
//! signature verification as arithmetic constraints over a large prime field
//! (BN254's scalar field in the tests).
//!
//! Layers, leaves first:
//!
//! - [`bits`]: constrained bits and the byte/hex adapters
//! - [`sha512`]: the hash over boolean wires
//! - [`field`]: non-native arithmetic modulo the Ed25519 base and scalar
//!   fields, four 64-bit limbs per element
//! - [`curve`]: twisted Edwards points, complete addition, scalar
//!   multiplication and point compression
//! - [`eddsa`]: the verification predicate
//! - [`circuits`]: [`zked_synth::Circuit`] descriptors and their witnesses
//!
//! Byte strings are bits in byte order, most significant bit first within
//! each byte, so `hex_to_bits("80")` is `[1, 0, 0, 0, 0, 0, 0, 0]`.
//!
//! ```rust,ignore
//! use zked_circuit::{Eddsa25519Assignment, Eddsa25519Circuit};
//! use zked_synth::{drivers::CheckingDriver, sink::CollectingSink, Always, Circuit};
//!
//! let assignment = Eddsa25519Assignment::from_hex(message, public_key, signature)?;
//! let circuit = Eddsa25519Circuit::for_assignment(&assignment);
//! let mut dr = CheckingDriver::<Fr>::new();
//! circuit.synthesize_prove(&mut dr, Always(&assignment), &mut CollectingSink::new())?;
//! ```

pub mod bits;
pub mod circuits;
pub mod curve;
pub mod eddsa;
pub mod error;
pub mod field;
pub mod sha512;

pub use bits::{bits_to_bytes, bytes_to_bits, hex_to_bits, Bit};
pub use circuits::{
    Eddsa25519Assignment, Eddsa25519Circuit, Eddsa25519Instance, Sha512Assignment, Sha512Circuit,
};
pub use curve::{CurveParams, Ed25519, NativePoint, Point};
pub use error::CircuitError;
pub use field::{Ed25519Base, Ed25519Scalar, FieldElement, FieldParams};
pub use sha512::{sha512, Sha512Digest};
