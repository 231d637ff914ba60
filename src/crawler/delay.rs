//! Inter-listing delay jitter

use crate::config::RunConfig;
use rand::Rng;
use std::time::Duration;

/// Uniform random delay between two bounds (seconds)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DelayPolicy {
    min_secs: f64,
    max_secs: f64,
}

impl DelayPolicy {
    /// Creates a policy; swapped or negative bounds are normalized
    ///
    /// Run configurations are validated before they get here; the
    /// normalization covers library callers building a policy directly.
    pub fn new(min_secs: f64, max_secs: f64) -> Self {
        let min_secs = finite_secs(min_secs);
        let max_secs = finite_secs(max_secs);
        if min_secs <= max_secs {
            Self { min_secs, max_secs }
        } else {
            Self {
                min_secs: max_secs,
                max_secs: min_secs,
            }
        }
    }

    /// Draws a delay in `[min, max]`
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        let secs = if self.min_secs == self.max_secs {
            self.min_secs
        } else {
            rng.gen_range(self.min_secs..=self.max_secs)
        };
        Duration::try_from_secs_f64(secs).unwrap_or_else(|_| self.max())
    }

    pub fn min(&self) -> Duration {
        Duration::try_from_secs_f64(self.min_secs).unwrap_or(Duration::MAX)
    }

    /// Upper bound, saturating at `Duration::MAX` for out-of-range bounds
    pub fn max(&self) -> Duration {
        Duration::try_from_secs_f64(self.max_secs).unwrap_or(Duration::MAX)
    }
}

fn finite_secs(secs: f64) -> f64 {
    if secs.is_nan() {
        0.0
    } else {
        secs.clamp(0.0, f64::MAX)
    }
}

impl From<&RunConfig> for DelayPolicy {
    fn from(config: &RunConfig) -> Self {
        Self::new(config.min_delay, config.max_delay)
    }
}
