use ark_ec::CurveGroup;
use ark_std::{rand::thread_rng, UniformRand};
use blake2::Blake2s256;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hodlem_proofs::utils::permutation::Permutation;
use hodlem_proofs::zkp::arguments::shuffle::prover::Prover;
use hodlem_proofs::zkp::arguments::shuffle::{challenge, Parameters};

type Curve = ark_bn254::G1Projective;
type Scalar = ark_bn254::Fr;

const DECK: usize = 53;

fn bench_reshuffle(c: &mut Criterion) {
    let rng = &mut thread_rng();
    let previous: Vec<_> = (0..DECK).map(|_| Curve::rand(rng).into_affine()).collect();

    let mut group = c.benchmark_group("reshuffle");
    group.sample_size(10);

    for rounds in [4usize, 16, 32] {
        let permutation = Permutation::fixing_first(rng, DECK);
        let key = Scalar::rand(rng);
        let shuffled = Prover::<Curve>::shuffle(&previous, &permutation, key).unwrap();

        group.bench_with_input(BenchmarkId::new("prove", rounds), &rounds, |b, &rounds| {
            b.iter(|| {
                let secrets = Prover::<Curve>::commit(&mut thread_rng(), &shuffled, rounds).unwrap();
                let bits = challenge::<Curve, Blake2s256>(&secrets.seed, &shuffled, rounds);
                Prover::<Curve>::respond(&secrets, &bits, &permutation, key).unwrap()
            })
        });

        let secrets = Prover::<Curve>::commit(rng, &shuffled, rounds).unwrap();
        let bits = challenge::<Curve, Blake2s256>(&secrets.seed, &shuffled, rounds);
        let proof = Prover::<Curve>::respond(&secrets, &bits, &permutation, key).unwrap();
        let parameters = Parameters::<Curve>::new(&previous, &shuffled, rounds);

        group.bench_with_input(BenchmarkId::new("verify", rounds), &rounds, |b, _| {
            b.iter(|| proof.verify::<Blake2s256>(&parameters, &secrets.seed).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_reshuffle);
criterion_main!(benches);
