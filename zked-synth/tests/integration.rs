//! Integration tests for the zked-synth crate.

use ff::Field;
use halo2curves_axiom::bn256::Fr;
use zked_synth::drivers::{CheckingDriver, CountingDriver, ProvingDriver};
use zked_synth::gadgets::{alloc_uint, mul, select, BoolWire};
use zked_synth::sink::{CollectingSink, CountingSink, IndexSink};
use zked_synth::{Always, Circuit, Driver, Empty, Error, Maybe, Sink, WireValue, Witness};

/// Knowledge of a square root of a public value.
struct SquareRootCircuit;

impl Circuit<Fr> for SquareRootCircuit {
    type Instance<'instance> = Fr;
    type IO<'source, D: Driver<F = Fr>> = WireValue<D>;
    type Witness<'witness> = (Fr, Fr);

    fn input<'instance, D: Driver<F = Fr>>(
        &self,
        dr: &mut D,
        input: Witness<D, Self::Instance<'instance>>,
    ) -> Result<Self::IO<'instance, D>, Error> {
        WireValue::alloc(dr, input)
    }

    fn main<'witness, D: Driver<F = Fr>>(
        &self,
        dr: &mut D,
        witness: Witness<D, Self::Witness<'witness>>,
    ) -> Result<Self::IO<'witness, D>, Error> {
        let root = WireValue::alloc(dr, D::just(|| witness.snag().0))?;
        let square = WireValue::alloc(dr, D::just(|| witness.snag().1))?;
        let product = mul(dr, &root, &root)?;
        dr.enforce_equal(&product.wire, &square.wire)?;
        Ok(square)
    }

    fn output<'source, D: Driver<F = Fr>>(
        &self,
        _dr: &mut D,
        io: Self::IO<'source, D>,
        output: &mut D::IO,
    ) -> Result<(), Error> {
        output.push(io.wire)
    }
}

#[test]
fn proving_driver_records_a_satisfied_system() {
    let mut dr = ProvingDriver::<Fr>::new();
    let mut sink = IndexSink::new();
    SquareRootCircuit
        .synthesize_prove(&mut dr, Always((Fr::from(3), Fr::from(9))), &mut sink)
        .unwrap();

    dr.check_constraints().unwrap();
    assert_eq!(dr.public_inputs(&sink), vec![Fr::from(9)]);
}

#[test]
fn drivers_agree_on_shape() {
    let mut proving = ProvingDriver::<Fr>::new();
    SquareRootCircuit
        .synthesize_prove(&mut proving, Always((Fr::from(5), Fr::from(25))), &mut IndexSink::new())
        .unwrap();

    let mut checking = CheckingDriver::<Fr>::new();
    let mut collected = CollectingSink::new();
    SquareRootCircuit
        .synthesize_prove(&mut checking, Always((Fr::from(5), Fr::from(25))), &mut collected)
        .unwrap();

    let mut counting = CountingDriver::<Fr>::new();
    let mut counted = CountingSink::new();
    SquareRootCircuit
        .synthesize_prove(&mut counting, Empty::new(), &mut counted)
        .unwrap();

    assert_eq!(proving.stats(), checking.stats());
    assert_eq!(checking.stats(), counting.stats());
    assert_eq!(counted.count(), collected.inputs.len());
}

#[test]
fn wrong_root_is_unsatisfied() {
    let mut checking = CheckingDriver::<Fr>::new();
    let err = SquareRootCircuit
        .synthesize_prove(
            &mut checking,
            Always((Fr::from(3), Fr::from(10))),
            &mut CollectingSink::new(),
        )
        .unwrap_err();
    assert!(err.is_unsatisfied());

    let mut proving = ProvingDriver::<Fr>::new();
    SquareRootCircuit
        .synthesize_prove(
            &mut proving,
            Always((Fr::from(3), Fr::from(10))),
            &mut IndexSink::new(),
        )
        .unwrap();
    assert!(proving.check_constraints().is_err());
}

#[test]
fn verification_path_reproduces_public_inputs() {
    let mut prover = CheckingDriver::<Fr>::new();
    let mut proved = CollectingSink::new();
    SquareRootCircuit
        .synthesize_prove(&mut prover, Always((-Fr::from(4), Fr::from(16))), &mut proved)
        .unwrap();

    let mut verifier = CheckingDriver::<Fr>::new();
    let mut expected = CollectingSink::new();
    SquareRootCircuit
        .synthesize_verify(&mut verifier, Always(Fr::from(16)), &mut expected)
        .unwrap();

    assert_eq!(proved.into_inputs(), expected.into_inputs());
}

#[test]
fn gadgets_compose_under_the_counting_driver() {
    let mut dr = CountingDriver::<Fr>::new();
    let (value, bits) = alloc_uint(&mut dr, &Empty::new(), 16).unwrap();
    let flag = BoolWire::alloc(&mut dr, Empty::new()).unwrap();
    let zero = WireValue::constant(&mut dr, Fr::ZERO).unwrap();
    select(&mut dr, &flag, &value, &zero).unwrap();

    let stats = dr.stats();
    // 17 boolean allocations plus the selector gate.
    assert_eq!(bits.len(), 16);
    assert_eq!(stats.num_mul_constraints, 18);
}
