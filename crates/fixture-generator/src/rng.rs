//! Random source construction.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

/// Environment variable holding a default seed for injectors.
pub const SEED_ENV_VAR: &str = "FIXTURE_GEN_SEED";

/// Seed from [`SEED_ENV_VAR`], if set to a valid `u64`.
pub fn seed_from_env() -> Option<u64> {
    let raw = std::env::var(SEED_ENV_VAR).ok()?;
    match raw.trim().parse() {
        Ok(seed) => Some(seed),
        Err(e) => {
            warn!("Ignoring {SEED_ENV_VAR}={raw:?}: {e}");
            None
        }
    }
}

/// RNG seeded from `seed`, then from the environment, then from OS entropy.
pub fn new_rng(seed: Option<u64>) -> StdRng {
    match seed.or_else(seed_from_env) {
        Some(seed) => {
            debug!(seed, "Using seeded RNG");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_os_rng(),
    }
}
