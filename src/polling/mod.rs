//! Polling views for the console
//!
//! This module handles:
//! - Loading the device catalog once on startup
//! - Keeping the selected device's commands fresh on a timer and on demand
//! - Cancelling superseded loops so stale results never reach the view

mod coordinator;
mod devices;

pub use coordinator::{CommandsView, PollingConfig, PollingCoordinator};
pub use devices::{DeviceListLoader, DevicesView};
