use log::info;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Runs the given test the given number of times with a seeded random number
/// generator. The seed is logged, so that a failing run can be reproduced
/// with [random_test_seeded].
pub fn random_test<F>(iterations: usize, test: F)
where
    F: FnMut(&mut StdRng),
{
    let seed: u64 = rand::rng().random();
    random_test_seeded(seed, iterations, test);
}

/// Runs the given test with a generator seeded by the given seed.
pub fn random_test_seeded<F>(seed: u64, iterations: usize, mut test: F)
where
    F: FnMut(&mut StdRng),
{
    info!("random_test seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    for _ in 0..iterations {
        test(&mut rng);
    }
}
