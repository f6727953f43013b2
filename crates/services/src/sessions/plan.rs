use std::sync::{Mutex, PoisonError};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use survey_core::model::Exposure;

/// Picks the exposures a session will show.
///
/// Sampling is uniform and without replacement; the provider's order is not
/// preserved. The RNG is seedable so tests can pin the selection.
pub struct ExposureSampler {
    rng: Mutex<StdRng>,
}

impl ExposureSampler {
    /// Sampler seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Deterministic sampler for tests and reproducible runs.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Take `min(candidates.len(), target)` exposures at random.
    #[must_use]
    pub fn sample(&self, mut candidates: Vec<Exposure>, target: usize) -> Vec<Exposure> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        candidates.as_mut_slice().shuffle(&mut *rng);
        candidates.truncate(target);
        candidates
    }
}

impl Default for ExposureSampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl std::fmt::Debug for ExposureSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExposureSampler").finish_non_exhaustive()
    }
}
