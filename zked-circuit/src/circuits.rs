//! Circuit descriptors and their assignments.
//!
//! Each descriptor fixes the shape of a circuit (the message length) and
//! implements [`Circuit`] so that any driver can synthesize it. Public inputs
//! are bits, one field element per bit.

use crate::bits::{alloc_bits, hex_to_bits, Bit};
use crate::curve::Ed25519;
use crate::eddsa::{self, PUBLIC_KEY_BITS, SIGNATURE_BITS};
use crate::error::CircuitError;
use crate::sha512::{sha512, DIGEST_BITS};
use ff::PrimeField;
use tracing::debug;
use zked_synth::{Circuit, Driver, Error, Maybe, Sink, Witness};

fn push_bits<D: Driver>(dr: &mut D, bits: Vec<Bit<D>>, output: &mut D::IO) -> Result<(), Error> {
    let wires = bits
        .into_iter()
        .map(|bit| bit.to_wire(dr).map(|w| w.wire))
        .collect::<Result<Vec<_>, _>>()?;
    output.push_many(wires)
}

fn decode_exact(what: &'static str, hex: &str, bytes: usize) -> Result<Vec<bool>, CircuitError> {
    let bits = hex_to_bits(hex)?;
    if bits.len() != bytes * 8 {
        return Err(CircuitError::InvalidLength {
            what,
            expected: bytes,
            actual: bits.len() / 8,
        });
    }
    Ok(bits)
}

/// SHA-512 of a private message, exposing the digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sha512Circuit {
    /// Message length in bits. Must be a multiple of 8.
    pub message_bits: usize,
}

/// Witness for [`Sha512Circuit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sha512Assignment {
    /// Message bits, most significant bit first within each byte.
    pub message: Vec<bool>,
}

impl Sha512Assignment {
    /// Decode a hex message.
    pub fn from_hex(message: &str) -> Result<Self, CircuitError> {
        Ok(Sha512Assignment {
            message: hex_to_bits(message)?,
        })
    }
}

impl Sha512Circuit {
    /// The circuit shaped for `assignment`.
    pub fn for_assignment(assignment: &Sha512Assignment) -> Self {
        Sha512Circuit {
            message_bits: assignment.message.len(),
        }
    }
}

impl<F: PrimeField> Circuit<F> for Sha512Circuit {
    /// The expected digest bits.
    type Instance<'instance> = &'instance [bool];
    type IO<'source, D: Driver<F = F>> = Vec<Bit<D>>;
    type Witness<'witness> = &'witness Sha512Assignment;

    fn input<'instance, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        input: Witness<D, Self::Instance<'instance>>,
    ) -> Result<Self::IO<'instance, D>, Error> {
        alloc_bits(dr, input, DIGEST_BITS)
    }

    fn main<'witness, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        witness: Witness<D, Self::Witness<'witness>>,
    ) -> Result<Self::IO<'witness, D>, Error> {
        let message = alloc_bits(
            dr,
            D::just(|| {
                let assignment: &Sha512Assignment = *witness.snag();
                assignment.message.as_slice()
            }),
            self.message_bits,
        )?;
        let digest = sha512(dr, &message)?;
        Ok(digest.into_bits().to_vec())
    }

    fn output<'source, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        io: Self::IO<'source, D>,
        output: &mut D::IO,
    ) -> Result<(), Error> {
        push_bits(dr, io, output)
    }
}

/// Ed25519 signature verification over a public message and key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eddsa25519Circuit {
    /// Message length in bits. Must be a multiple of 8.
    pub message_bits: usize,
}

/// Public part of an [`Eddsa25519Circuit`] statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eddsa25519Instance {
    /// Message bits.
    pub message: Vec<bool>,
    /// Encoded public key, 256 bits.
    pub public_key: Vec<bool>,
}

/// Witness for [`Eddsa25519Circuit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Eddsa25519Assignment {
    /// Message bits.
    pub message: Vec<bool>,
    /// Encoded public key, 256 bits.
    pub public_key: Vec<bool>,
    /// Signature `R || S`, 512 bits.
    pub signature: Vec<bool>,
}

impl Eddsa25519Assignment {
    /// Decode hex inputs. The public key must be 32 bytes and the signature
    /// 64 bytes.
    pub fn from_hex(message: &str, public_key: &str, signature: &str) -> Result<Self, CircuitError> {
        Ok(Eddsa25519Assignment {
            message: hex_to_bits(message)?,
            public_key: decode_exact("public key", public_key, PUBLIC_KEY_BITS / 8)?,
            signature: decode_exact("signature", signature, SIGNATURE_BITS / 8)?,
        })
    }

    /// The public part of the statement.
    pub fn instance(&self) -> Eddsa25519Instance {
        Eddsa25519Instance {
            message: self.message.clone(),
            public_key: self.public_key.clone(),
        }
    }
}

impl Eddsa25519Circuit {
    /// The circuit shaped for `assignment`.
    pub fn for_assignment(assignment: &Eddsa25519Assignment) -> Self {
        Eddsa25519Circuit {
            message_bits: assignment.message.len(),
        }
    }

    fn alloc_public<'a, D: Driver>(
        &self,
        dr: &mut D,
        message: Witness<D, &'a [bool]>,
        public_key: Witness<D, &'a [bool]>,
    ) -> Result<(Vec<Bit<D>>, Vec<Bit<D>>), Error> {
        let message = alloc_bits(dr, message, self.message_bits)?;
        let public_key = alloc_bits(dr, public_key, PUBLIC_KEY_BITS)?;
        Ok((message, public_key))
    }
}

impl<F: PrimeField> Circuit<F> for Eddsa25519Circuit {
    type Instance<'instance> = &'instance Eddsa25519Instance;
    /// Message bits followed by public key bits.
    type IO<'source, D: Driver<F = F>> = Vec<Bit<D>>;
    type Witness<'witness> = &'witness Eddsa25519Assignment;

    fn input<'instance, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        input: Witness<D, Self::Instance<'instance>>,
    ) -> Result<Self::IO<'instance, D>, Error> {
        let (mut message, public_key) = self.alloc_public(
            dr,
            D::just(|| {
                let instance: &Eddsa25519Instance = *input.snag();
                instance.message.as_slice()
            }),
            D::just(|| {
                let instance: &Eddsa25519Instance = *input.snag();
                instance.public_key.as_slice()
            }),
        )?;
        message.extend(public_key);
        Ok(message)
    }

    fn main<'witness, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        witness: Witness<D, Self::Witness<'witness>>,
    ) -> Result<Self::IO<'witness, D>, Error> {
        let (mut message, public_key) = self.alloc_public(
            dr,
            D::just(|| {
                let assignment: &Eddsa25519Assignment = *witness.snag();
                assignment.message.as_slice()
            }),
            D::just(|| {
                let assignment: &Eddsa25519Assignment = *witness.snag();
                assignment.public_key.as_slice()
            }),
        )?;
        let signature = alloc_bits(
            dr,
            D::just(|| {
                let assignment: &Eddsa25519Assignment = *witness.snag();
                assignment.signature.as_slice()
            }),
            SIGNATURE_BITS,
        )?;

        eddsa::verify::<D, Ed25519>(dr, &message, &public_key, &signature)?;
        debug!(message_bits = self.message_bits, "signature verification synthesized");

        message.extend(public_key);
        Ok(message)
    }

    fn output<'source, D: Driver<F = F>>(
        &self,
        dr: &mut D,
        io: Self::IO<'source, D>,
        output: &mut D::IO,
    ) -> Result<(), Error> {
        push_bits(dr, io, output)
    }
}
