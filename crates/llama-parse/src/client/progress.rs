//! Time-based progress estimate for pending jobs
//!
//! The service does not report progress. The estimate is a linear projection
//! of elapsed time against an assumed job duration, held below a ceiling until
//! the job leaves PENDING. It is advisory only.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::consts::{DEFAULT_ESTIMATED_DURATION_MS, DEFAULT_PROGRESS_CEILING};

/// Receives progress percentages while a job is being polled
///
/// Values never decrease and the last call is always exactly 100.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, percent: f64);
}

impl<F> ProgressObserver for F
where
    F: Fn(f64) + Send + Sync,
{
    fn on_progress(&self, percent: f64) {
        self(percent)
    }
}

/// `min(elapsed_ms / 30000 * 100, 95)`
pub fn estimate_progress(elapsed_ms: f64) -> f64 {
    ProgressEstimator::default().estimate_ms(elapsed_ms)
}

/// Linear progress projection with a configurable baseline and ceiling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEstimator {
    estimated_duration: Duration,
    ceiling: f64,
}

impl Default for ProgressEstimator {
    fn default() -> Self {
        Self {
            estimated_duration: Duration::from_millis(DEFAULT_ESTIMATED_DURATION_MS),
            ceiling: DEFAULT_PROGRESS_CEILING,
        }
    }
}

impl ProgressEstimator {
    pub fn new(estimated_duration: Duration, ceiling: f64) -> Self {
        Self {
            estimated_duration,
            ceiling,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.estimated_duration(), config.progress_ceiling)
    }

    pub fn estimate(&self, elapsed: Duration) -> f64 {
        self.estimate_ms(elapsed.as_secs_f64() * 1000.0)
    }

    pub fn estimate_ms(&self, elapsed_ms: f64) -> f64 {
        let baseline_ms = self.estimated_duration.as_secs_f64() * 1000.0;
        if baseline_ms <= 0.0 {
            return self.ceiling;
        }
        (elapsed_ms.max(0.0) / baseline_ms * 100.0).min(self.ceiling)
    }
}
