//! Latency and failure injection for store operations

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use thiserror::Error;
use tokio::time::{sleep, Duration};
use tracing::warn;

/// Message carried by every simulated failure
pub const SIMULATED_ERROR_MESSAGE: &str = "Mock API error (simulated)";

/// Errors returned by the mock backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("{}", SIMULATED_ERROR_MESSAGE)]
    Simulated,
}

/// Clamp to zero and drop any fractional part
pub fn normalize_latency_ms(ms: f64) -> u64 {
    // NaN.max(0.0) is 0.0 and the cast saturates at u64::MAX
    ms.max(0.0).floor() as u64
}

/// Wraps operations with artificial latency and optional forced failure
#[derive(Debug)]
pub struct NetworkSimulator {
    latency_ms: AtomicU64,
    force_error: AtomicBool,
}

impl NetworkSimulator {
    pub fn new(latency_ms: f64, force_error: bool) -> Self {
        Self {
            latency_ms: AtomicU64::new(normalize_latency_ms(latency_ms)),
            force_error: AtomicBool::new(force_error),
        }
    }

    /// Applies to calls started after this returns
    pub fn set_latency_ms(&self, ms: f64) {
        self.latency_ms.store(normalize_latency_ms(ms), Ordering::SeqCst);
    }

    pub fn latency_ms(&self) -> u64 {
        self.latency_ms.load(Ordering::SeqCst)
    }

    /// When set, every call fails without running its operation
    pub fn set_force_error(&self, force: bool) {
        self.force_error.store(force, Ordering::SeqCst);
    }

    pub fn force_error(&self) -> bool {
        self.force_error.load(Ordering::SeqCst)
    }

    /// Run `operation` and deliver its result after the configured latency.
    ///
    /// The operation runs as soon as this future is first polled; only
    /// delivery of the result is delayed. With forced errors on, the
    /// operation is dropped unevaluated and [`ApiError::Simulated`] is
    /// delivered after the same delay.
    pub async fn simulate<T, F>(&self, operation: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> T,
    {
        let delay = Duration::from_millis(self.latency_ms());

        let result = if self.force_error() {
            warn!("Simulated network failure");
            Err(ApiError::Simulated)
        } else {
            Ok(operation())
        };

        if !delay.is_zero() {
            sleep(delay).await;
        }

        result
    }
}

impl Default for NetworkSimulator {
    fn default() -> Self {
        Self::new(devcmd_shared::lifecycle::DEFAULT_LATENCY_MS as f64, false)
    }
}
