use rand::distributions::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random source used by controllers built
/// with [`PopulationController::from_seed`].
///
/// [`PopulationController::from_seed`]: crate::PopulationController::from_seed
pub type SimRng = StdRng;

/// Returns a reproducible random source.
pub fn seeded(seed: u64) -> SimRng {
    StdRng::seed_from_u64(seed)
}

/// Samples a magnitude uniformly from [0, 1)
/// and flips its sign with probability 0.5,
/// yielding values in (-1, 1).
#[derive(Clone, Copy, Debug)]
pub struct SignedUnit;

impl Distribution<f32> for SignedUnit {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let magnitude = rng.gen::<f32>();
        if rng.gen_bool(0.5) {
            -magnitude
        } else {
            magnitude
        }
    }
}
