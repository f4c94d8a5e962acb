//! Mock device command backend
//!
//! An in-memory stand-in for a command scheduling service. Commands advance
//! through their lifecycle as a function of elapsed time and every call goes
//! through a simulated network with configurable latency and failures.

mod api;
pub mod command;
mod config;
pub mod network;

pub use api::MockApi;
pub use config::BackendConfig;
pub use network::{ApiError, SIMULATED_ERROR_MESSAGE};
