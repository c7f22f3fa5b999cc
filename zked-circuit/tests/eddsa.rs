//! End-to-end tests of the signature verification circuit.

use ed25519_dalek::{Signer, SigningKey};
use halo2curves_axiom::bn256::Fr;
use hex_literal::hex;
use rand::RngCore;
use zked_circuit::{bytes_to_bits, Eddsa25519Assignment, Eddsa25519Circuit};
use zked_synth::drivers::{CheckingDriver, CountingDriver};
use zked_synth::sink::{CollectingSink, CountingSink};
use zked_synth::{Always, Circuit, Empty, Error};

const MESSAGE: [u8; 13] = *b"Succinct Labs";
const PUBLIC_KEY: [u8; 32] =
    hex!("f7ec1c43f4de9d49556de87b86b26a98942cb078486fdb44de38b80864c39731");
const SIGNATURE: [u8; 64] = hex!(
    "35c323757c20640a294345c89c0bfcebe3d554fdb0c7b7a0bdb72222c531b1ec"
    "849fed99a053e0f5b02dd9a25bb6eb018885526d9f583cdbde0b1e9f6329da09"
);

fn fixed_assignment() -> Eddsa25519Assignment {
    Eddsa25519Assignment {
        message: bytes_to_bits(&MESSAGE),
        public_key: bytes_to_bits(&PUBLIC_KEY),
        signature: bytes_to_bits(&SIGNATURE),
    }
}

fn prove(assignment: &Eddsa25519Assignment) -> Result<Vec<Fr>, Error> {
    let circuit = Eddsa25519Circuit::for_assignment(assignment);
    let mut dr = CheckingDriver::<Fr>::new();
    let mut sink = CollectingSink::new();
    circuit.synthesize_prove(&mut dr, Always(assignment), &mut sink)?;
    Ok(sink.into_inputs())
}

#[test]
fn fixed_vector_is_satisfiable() {
    let assignment = fixed_assignment();
    assert_eq!(
        assignment,
        Eddsa25519Assignment::from_hex(
            "53756363696e6374204c616273",
            "f7ec1c43f4de9d49556de87b86b26a98942cb078486fdb44de38b80864c39731",
            "35c323757c20640a294345c89c0bfcebe3d554fdb0c7b7a0bdb72222c531b1ec\
             849fed99a053e0f5b02dd9a25bb6eb018885526d9f583cdbde0b1e9f6329da09",
        )
        .unwrap()
    );

    let inputs = prove(&assignment).unwrap();
    assert_eq!(inputs.len(), MESSAGE.len() * 8 + 256);
}

#[test]
fn single_bit_flips_are_unsatisfiable() {
    // Low bit of R's y, R's sign bit, low bit of S, a middle bit of S and
    // the top bit of S.
    for position in [7, 248, 263, 380, 504] {
        let mut assignment = fixed_assignment();
        assignment.signature[position] ^= true;
        let err = prove(&assignment).unwrap_err();
        assert!(err.is_unsatisfied(), "bit {position}: {err}");
    }
}

#[test]
fn other_message_is_unsatisfiable() {
    let mut assignment = fixed_assignment();
    assignment.message = bytes_to_bits(b"Succinct Labz");
    assert!(prove(&assignment).unwrap_err().is_unsatisfied());
}

#[test]
fn verifier_reconstructs_the_public_inputs() {
    let assignment = fixed_assignment();
    let proved = prove(&assignment).unwrap();

    let circuit = Eddsa25519Circuit::for_assignment(&assignment);
    let instance = assignment.instance();
    let mut dr = CheckingDriver::<Fr>::new();
    let mut expected = CollectingSink::new();
    circuit
        .synthesize_verify(&mut dr, Always(&instance), &mut expected)
        .unwrap();

    assert_eq!(proved, expected.into_inputs());
}

#[test]
fn shape_matches_between_counting_and_checking() {
    let assignment = fixed_assignment();
    let circuit = Eddsa25519Circuit::for_assignment(&assignment);

    let mut counting = CountingDriver::<Fr>::new();
    let mut counted = CountingSink::new();
    circuit
        .synthesize_prove(&mut counting, Empty::new(), &mut counted)
        .unwrap();

    let mut checking = CheckingDriver::<Fr>::new();
    circuit
        .synthesize_prove(&mut checking, Always(&assignment), &mut CollectingSink::new())
        .unwrap();

    assert_eq!(counting.stats(), checking.stats());
    assert_eq!(counted.count(), assignment.message.len() + 256);
}

#[test]
fn random_dalek_signatures_verify() {
    let mut rng = rand::thread_rng();
    let key = SigningKey::generate(&mut rng);
    // Long enough that R || A || M spans two hash blocks.
    let mut message = [0u8; 90];
    rng.fill_bytes(&mut message);
    let signature = key.sign(&message);

    let assignment = Eddsa25519Assignment {
        message: bytes_to_bits(&message),
        public_key: bytes_to_bits(key.verifying_key().as_bytes()),
        signature: bytes_to_bits(&signature.to_bytes()),
    };
    prove(&assignment).unwrap();
}

#[test]
fn witness_with_wrong_message_length_is_malformed() {
    let assignment = fixed_assignment();
    let circuit = Eddsa25519Circuit {
        message_bits: assignment.message.len() + 8,
    };
    let mut dr = CheckingDriver::<Fr>::new();
    let err = circuit
        .synthesize_prove(&mut dr, Always(&assignment), &mut CollectingSink::new())
        .unwrap_err();
    assert!(matches!(err, Error::MalformedWitness { .. }));
}
