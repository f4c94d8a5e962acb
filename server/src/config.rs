//! Backend configuration

use devcmd_shared::lifecycle;

/// Configuration for the mock backend
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Artificial latency per call, normalized with `floor(max(0, ms))`
    pub latency_ms: f64,
    /// Fail every call with the simulated error
    pub force_error: bool,
    /// Chance that a new command is destined to fail
    pub failure_probability: f64,
    /// Seed for outcome draws; `None` seeds from entropy
    pub rng_seed: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            latency_ms: lifecycle::DEFAULT_LATENCY_MS as f64,
            force_error: false,
            failure_probability: lifecycle::FAILURE_PROBABILITY,
            rng_seed: None,
        }
    }
}
