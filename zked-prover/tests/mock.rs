//! The mock backend on the fixed Ed25519 vector.

use hex_literal::hex;
use zked_circuit::{bytes_to_bits, Eddsa25519Assignment, Eddsa25519Circuit};
use zked_prover::{
    prove_bundle, public_inputs, MockProofSystem, ProofBundle, ProofSystem, ProverError,
    CIRCUIT_VERSION,
};

fn fixed_assignment() -> Eddsa25519Assignment {
    Eddsa25519Assignment {
        message: bytes_to_bits(b"Succinct Labs"),
        public_key: bytes_to_bits(&hex!(
            "f7ec1c43f4de9d49556de87b86b26a98942cb078486fdb44de38b80864c39731"
        )),
        signature: bytes_to_bits(&hex!(
            "35c323757c20640a294345c89c0bfcebe3d554fdb0c7b7a0bdb72222c531b1ec"
            "849fed99a053e0f5b02dd9a25bb6eb018885526d9f583cdbde0b1e9f6329da09"
        )),
    }
}

#[test]
fn fixed_vector_passes_setup_prove_verify() {
    let assignment = fixed_assignment();
    let circuit = Eddsa25519Circuit::for_assignment(&assignment);
    let bundle = prove_bundle("eddsa25519", &circuit, &assignment, &assignment.instance()).unwrap();

    assert_eq!(bundle.circuit_version, CIRCUIT_VERSION);
    assert_eq!(bundle.proof.shape.num_public_inputs, 13 * 8 + 256);
    assert_eq!(bundle.proof.public_inputs.len(), 13 * 8 + 256);

    let json = serde_json::to_string(&bundle).unwrap();
    let decoded: ProofBundle = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded.proof, bundle.proof);
}

#[test]
fn proof_does_not_verify_for_another_message() {
    let assignment = fixed_assignment();
    let circuit = Eddsa25519Circuit::for_assignment(&assignment);
    let system = MockProofSystem;
    let (pk, vk) = system.setup(&circuit).unwrap();
    let proof = system.prove(&circuit, &pk, &assignment).unwrap();

    let mut other = assignment.instance();
    // Flip the last bit of the message.
    other.message[13 * 8 - 1] ^= true;
    let expected = public_inputs(&circuit, &other).unwrap();
    let err = system.verify(&vk, &proof, &expected).unwrap_err();
    assert!(matches!(err, ProverError::PublicInputMismatch { index } if index == 13 * 8 - 1));
}

#[test]
fn forged_signature_cannot_be_proven() {
    let mut assignment = fixed_assignment();
    assignment.signature[300] ^= true;
    let circuit = Eddsa25519Circuit::for_assignment(&assignment);
    let system = MockProofSystem;
    let (pk, _) = system.setup(&circuit).unwrap();

    let err = system.prove(&circuit, &pk, &assignment).unwrap_err();
    assert!(matches!(err, ProverError::Unsatisfied(_)));
}
