//! A stand-in backend that checks the constraint system directly.

use crate::{field_to_hex, CircuitShape, ProofSystem, ProverError};
use halo2curves_axiom::bn256::Fr;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use zked_synth::drivers::{CheckingDriver, CountingDriver};
use zked_synth::sink::{CollectingSink, CountingSink};
use zked_synth::{Always, Circuit, Empty};

/// Backend that "proves" by running the checking driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockProofSystem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockProvingKey {
    pub shape: CircuitShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockVerifyingKey {
    pub shape: CircuitShape,
}

/// The shape the witness was checked against and the public inputs it
/// produced, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockProof {
    pub shape: CircuitShape,
    pub public_inputs: Vec<String>,
}

impl ProofSystem for MockProofSystem {
    type ProvingKey = MockProvingKey;
    type VerifyingKey = MockVerifyingKey;
    type Proof = MockProof;

    fn setup<C: Circuit<Fr>>(
        &self,
        circuit: &C,
    ) -> Result<(MockProvingKey, MockVerifyingKey), ProverError> {
        let mut dr = CountingDriver::<Fr>::new();
        let mut sink = CountingSink::new();
        circuit.synthesize_prove(&mut dr, Empty::new(), &mut sink)?;

        let shape = CircuitShape::new(dr.stats(), sink.count());
        info!(
            constraints = shape.total_constraints(),
            wires = shape.num_wires,
            public_inputs = shape.num_public_inputs,
            "setup complete"
        );
        Ok((MockProvingKey { shape }, MockVerifyingKey { shape }))
    }

    fn prove<'witness, C: Circuit<Fr>>(
        &self,
        circuit: &C,
        pk: &MockProvingKey,
        witness: C::Witness<'witness>,
    ) -> Result<MockProof, ProverError> {
        let mut dr = CheckingDriver::<Fr>::new();
        let mut sink = CollectingSink::new();
        circuit.synthesize_prove(&mut dr, Always(witness), &mut sink)?;

        let inputs = sink.into_inputs();
        let shape = CircuitShape::new(dr.stats(), inputs.len());
        if shape != pk.shape {
            return Err(ProverError::ShapeMismatch {
                expected: pk.shape,
                actual: shape,
            });
        }
        debug!(constraints = shape.total_constraints(), "witness satisfies every constraint");

        Ok(MockProof {
            shape,
            public_inputs: inputs.iter().map(field_to_hex).collect(),
        })
    }

    fn verify(
        &self,
        vk: &MockVerifyingKey,
        proof: &MockProof,
        public_inputs: &[Fr],
    ) -> Result<(), ProverError> {
        if proof.shape != vk.shape {
            return Err(ProverError::ShapeMismatch {
                expected: vk.shape,
                actual: proof.shape,
            });
        }
        if proof.public_inputs.len() != public_inputs.len() {
            return Err(ProverError::PublicInputCount {
                expected: public_inputs.len(),
                actual: proof.public_inputs.len(),
            });
        }
        if let Some(index) = proof
            .public_inputs
            .iter()
            .zip(public_inputs)
            .position(|(claimed, expected)| *claimed != field_to_hex(expected))
        {
            return Err(ProverError::PublicInputMismatch { index });
        }
        Ok(())
    }
}
