use super::{Stimuli, Stimulus};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Temporal white noise: every tick draws a new gray level, uniformly
/// distributed over all 256 levels.
pub struct WhiteNoise(StdRng);

impl WhiteNoise {
    pub fn new() -> Self {
        WhiteNoise(StdRng::from_entropy())
    }

    /// Reproducible noise sequence for the given seed.
    pub fn seeded(seed: u64) -> Self {
        WhiteNoise(StdRng::seed_from_u64(seed))
    }
}

impl Default for WhiteNoise {
    fn default() -> Self {
        Self::new()
    }
}

impl Stimuli for WhiteNoise {
    fn next_stimulus(&mut self) -> Stimulus {
        Stimulus::gray(self.0.gen())
    }
}
