//! Device Command Simulator Shared Types
//!
//! This crate provides the data model, the time source abstraction and the
//! command lifecycle rules shared by the mock backend and its consumers.

pub mod clock;
pub mod model;
pub mod params;
pub mod state_machine;

use std::time::{SystemTime, UNIX_EPOCH};

// Re-export commonly used types at crate root
pub use clock::{Clock, ManualClock, SystemClock};
pub use model::{
    Command, CommandStatus, CommandType, Device, LoadState, ScheduleRequest, StatusFilter,
};
pub use params::{ParamValue, ParamsError};
pub use state_machine::CommandRuntimeInfo;

/// Get current timestamp in milliseconds since Unix epoch
pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Timing and probability parameters for the command lifecycle
pub mod lifecycle {
    /// Delay after creation before a command is leased
    pub const LEASE_AFTER_MS: u64 = 2_000;

    /// Delay after leasing before a command completes
    pub const COMPLETE_AFTER_LEASE_MS: u64 = 3_000;

    /// Validity window of a lease, counted from the moment of leasing
    pub const LEASE_DURATION_MS: u64 = 60_000;

    /// Offset from creation at which a command reaches a terminal status
    pub const COMPLETE_AFTER_MS: u64 = LEASE_AFTER_MS + COMPLETE_AFTER_LEASE_MS;

    /// Probability that a command is destined to fail
    pub const FAILURE_PROBABILITY: f64 = 0.15;

    /// Period of the command polling loop
    pub const POLL_INTERVAL_MS: u64 = 5_000;

    /// Default artificial network latency
    pub const DEFAULT_LATENCY_MS: u64 = 200;

    /// Command numbers are allocated starting just after this value
    pub const FIRST_COMMAND_NUMBER: u64 = 120;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_now_ms_is_after_epoch() {
        assert!(now_ms() > 0);
    }

    #[test]
    fn test_completion_offset() {
        assert_eq!(lifecycle::COMPLETE_AFTER_MS, 5_000);
    }
}
