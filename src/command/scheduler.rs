//! Command scheduler - validates user input and submits new commands

use crate::format::format_error;
use crate::polling::PollingCoordinator;
use crate::source::CommandSource;
use devcmd_shared::{Command, CommandType, ParamValue, ParamsError, ScheduleRequest};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Why a command could not be scheduled
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Select a device first.")]
    NoDevice,

    #[error(transparent)]
    InvalidParams(#[from] ParamsError),

    #[error("{0}")]
    Upstream(String),
}

/// Submits commands for the selected device and refreshes its view
pub struct CommandScheduler {
    source: Arc<dyn CommandSource>,
    coordinator: Arc<PollingCoordinator>,
}

impl CommandScheduler {
    pub fn new(source: Arc<dyn CommandSource>, coordinator: Arc<PollingCoordinator>) -> Self {
        Self {
            source,
            coordinator,
        }
    }

    /// Schedule `command_type` with params typed as free text.
    ///
    /// Nothing is sent when no device is selected or the params are not
    /// valid JSON.
    pub async fn submit(
        &self,
        device_id: Option<&str>,
        command_type: CommandType,
        raw_params: &str,
    ) -> Result<Command, ScheduleError> {
        let device_id = device_id.ok_or(ScheduleError::NoDevice)?;
        let params = ParamValue::from_text(raw_params)?;

        let request = ScheduleRequest::new(command_type).with_params(params);
        let command = self
            .source
            .create_command(device_id, request)
            .await
            .map_err(|err| {
                let message = format_error(&err);
                warn!("Scheduling {} for {} failed: {}", command_type, device_id, message);
                ScheduleError::Upstream(message)
            })?;

        info!("Scheduled {} as {}", command_type, command.command_id);
        self.coordinator.refresh().await;

        Ok(command)
    }
}
