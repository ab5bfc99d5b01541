//! Bounded random delays standing in for real backend latency.

use anyhow::{bail, Result};
use parking_lot::Mutex;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::logger::Logger;

pub const MIN_DELAY_MS: u64 = 2_000;
pub const MAX_DELAY_MS: u64 = 60_000;
pub const FALLBACK_DELAY_MS: u64 = 2_000;

pub struct LatencySimulator {
    min_ms: u64,
    max_ms: u64,
    rng: Mutex<StdRng>,
    logger: Logger,
}

impl LatencySimulator {
    pub fn new(logger: Logger) -> Self {
        Self::with_bounds(MIN_DELAY_MS, MAX_DELAY_MS, logger)
    }

    pub fn with_bounds(min_ms: u64, max_ms: u64, logger: Logger) -> Self {
        Self {
            min_ms,
            max_ms,
            rng: Mutex::new(StdRng::from_entropy()),
            logger,
        }
    }

    /// Replaces the entropy-seeded generator with a reproducible one.
    pub fn seeded(self, seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
            ..self
        }
    }

    pub fn bounds(&self) -> (u64, u64) {
        (self.min_ms, self.max_ms)
    }

    /// Milliseconds to wait, uniform over the inclusive bounds.
    ///
    /// Never fails: a sampling fault is logged and [`FALLBACK_DELAY_MS`] is
    /// returned instead.
    pub fn next_delay(&self) -> u64 {
        match self.sample() {
            Ok(delay_ms) => delay_ms,
            Err(err) => {
                self.logger
                    .error("Failed to generate random delay", err.as_ref());
                FALLBACK_DELAY_MS
            }
        }
    }

    fn sample(&self) -> Result<u64> {
        if self.min_ms > self.max_ms {
            bail!(
                "delay bounds are inverted: min {}ms > max {}ms",
                self.min_ms,
                self.max_ms
            );
        }
        Ok(self.rng.lock().gen_range(self.min_ms..=self.max_ms))
    }
}

#[cfg(test)]
#[path = "tests/latency_tests.rs"]
mod tests;
