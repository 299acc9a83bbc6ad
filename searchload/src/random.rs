use rand::distr::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generator for synthesized document ids and bodies.
///
/// Each virtual user owns one. Seed it with [`RandomSource::seeded`] to replay the
/// exact same ids and bodies across experiments; [`RandomSource::from_entropy`] seeds
/// once from the OS.
#[derive(Debug, Clone)]
pub struct RandomSource {
    rng: StdRng,
}

impl RandomSource {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// `len` characters drawn from `[A-Za-z0-9]`.
    pub fn alphanumeric(&mut self, len: usize) -> String {
        (&mut self.rng)
            .sample_iter(Alphanumeric)
            .take(len)
            .map(char::from)
            .collect()
    }

    /// Derives an independent source, e.g. one per virtual user from a single run seed.
    pub fn fork(&mut self) -> Self {
        Self::seeded(self.rng.random())
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::from_entropy()
    }
}
