//! Proof-system boundary for the zked circuits.
//!
//! [`ProofSystem`] is the seam a real backend plugs into. The crate ships a
//! [`MockProofSystem`] that synthesizes the circuit with the counting and
//! checking drivers instead of producing a succinct proof. It accepts exactly
//! the witnesses a sound backend would accept.

mod error;
mod mock;

pub use error::ProverError;
pub use mock::{MockProof, MockProofSystem, MockProvingKey, MockVerifyingKey};

use ff::PrimeField;
use halo2curves_axiom::bn256::Fr;
use serde::{Deserialize, Serialize};
use zked_synth::drivers::CheckingDriver;
use zked_synth::sink::CollectingSink;
use zked_synth::{Always, Circuit, DriverStats};

/// Version tag written into every [`ProofBundle`].
pub const CIRCUIT_VERSION: u32 = 1;

/// Size of a synthesized circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CircuitShape {
    pub num_mul: usize,
    pub num_linear: usize,
    pub num_wires: usize,
    pub num_public_inputs: usize,
}

impl CircuitShape {
    pub fn new(stats: DriverStats, num_public_inputs: usize) -> Self {
        CircuitShape {
            num_mul: stats.num_mul_constraints,
            num_linear: stats.num_linear_constraints,
            num_wires: stats.num_wires,
            num_public_inputs,
        }
    }

    pub fn total_constraints(&self) -> usize {
        self.num_mul + self.num_linear
    }
}

/// A proving backend.
pub trait ProofSystem {
    type ProvingKey;
    type VerifyingKey;
    type Proof;

    /// Derive keys from the circuit shape alone.
    fn setup<C: Circuit<Fr>>(
        &self,
        circuit: &C,
    ) -> Result<(Self::ProvingKey, Self::VerifyingKey), ProverError>;

    /// Prove knowledge of a satisfying witness.
    fn prove<'witness, C: Circuit<Fr>>(
        &self,
        circuit: &C,
        pk: &Self::ProvingKey,
        witness: C::Witness<'witness>,
    ) -> Result<Self::Proof, ProverError>;

    /// Check a proof against the verifier's public inputs.
    fn verify(
        &self,
        vk: &Self::VerifyingKey,
        proof: &Self::Proof,
        public_inputs: &[Fr],
    ) -> Result<(), ProverError>;
}

/// The public inputs a verifier derives from an instance.
pub fn public_inputs<'instance, C: Circuit<Fr>>(
    circuit: &C,
    instance: C::Instance<'instance>,
) -> Result<Vec<Fr>, ProverError> {
    let mut dr = CheckingDriver::<Fr>::new();
    let mut sink = CollectingSink::new();
    circuit.synthesize_verify(&mut dr, Always(instance), &mut sink)?;
    Ok(sink.into_inputs())
}

/// Hex encoding of a field element's canonical representation.
pub fn field_to_hex(value: &Fr) -> String {
    hex::encode(value.to_repr())
}

/// Proof plus metadata, as written by the CLI.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProofBundle {
    pub circuit_version: u32,
    /// Which circuit the proof is for, e.g. `sha512` or `eddsa25519`.
    pub circuit: String,
    pub proof: MockProof,
}

/// Set up, prove and verify in one go, returning the bundle.
pub fn prove_bundle<'witness, 'instance, C: Circuit<Fr>>(
    name: &str,
    circuit: &C,
    witness: C::Witness<'witness>,
    instance: C::Instance<'instance>,
) -> Result<ProofBundle, ProverError> {
    let system = MockProofSystem;
    let (pk, vk) = system.setup(circuit)?;
    let proof = system.prove(circuit, &pk, witness)?;
    let expected = public_inputs(circuit, instance)?;
    system.verify(&vk, &proof, &expected)?;
    Ok(ProofBundle {
        circuit_version: CIRCUIT_VERSION,
        circuit: name.to_owned(),
        proof,
    })
}
