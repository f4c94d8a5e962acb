//! Command scheduling for the console
//!
//! This module handles:
//! - Requiring a selected device before anything is sent
//! - Parsing free-text params into a structured value
//! - Submitting the command and refreshing the device's view

mod scheduler;

pub use scheduler::{CommandScheduler, ScheduleError};
