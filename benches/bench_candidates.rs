use std::time::Duration;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use primebench::{
    Candidate,
    candidate::advance_by,
    iterations::{approx_nth, iterations},
    primes,
};

const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

fn bench_limit() -> u64 {
    #[cfg(feature = "bench-ci")]
    {
        1_000
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        100_000
    }
}

fn bench_sizes() -> Vec<u64> {
    iterations().take_while(|&n| n <= bench_limit()).collect()
}

fn nth_prime(candidate: &Candidate, n: u64) -> u64 {
    let mut seq = candidate.sequence(approx_nth(n));
    advance_by(seq.as_mut(), n).expect("nth prime")
}

fn bench_nth_prime(c: &mut Criterion) {
    let mut group = c.benchmark_group("nth_prime");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for candidate in primes::catalog() {
        for n in bench_sizes() {
            group.bench_with_input(
                BenchmarkId::new(candidate.name(), n),
                &n,
                |b, &n| b.iter(|| nth_prime(&candidate, n)),
            );
        }
    }
    group.finish();
}

criterion_group!(
    name = candidate_benches;
    config = Criterion::default();
    targets = bench_nth_prime
);
criterion_main!(candidate_benches);
