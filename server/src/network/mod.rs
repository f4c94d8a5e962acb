//! Simulated network between consumers and the command store
//!
//! Every store operation passes through the [`NetworkSimulator`], which adds
//! latency and can be told to fail every call.

mod simulator;

pub use simulator::{normalize_latency_ms, ApiError, NetworkSimulator, SIMULATED_ERROR_MESSAGE};
