//! Devices, commands and the load states observed by consumers

use crate::params::ParamValue;
use serde::Serialize;
use std::fmt;

/// A device that can receive commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: String,
}

impl Device {
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
        }
    }
}

/// Kinds of command a device understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandType {
    Ping,
    Reboot,
    CollectLogs,
}

impl CommandType {
    pub const ALL: [CommandType; 3] = [Self::Ping, Self::Reboot, Self::CollectLogs];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ping => "PING",
            Self::Reboot => "REBOOT",
            Self::CollectLogs => "COLLECT_LOGS",
        }
    }
}

impl fmt::Display for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CommandStatus {
    Pending,
    Leased,
    Succeeded,
    Failed,
}

impl CommandStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Leased => "LEASED",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command scheduled against a device
///
/// `lease_expires_at_ms` is set once the command has been leased and is kept
/// after completion. `completed_at_ms` is set only for terminal statuses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub command_id: String,
    pub device_id: String,
    #[serde(rename = "type")]
    pub command_type: CommandType,
    pub params: ParamValue,
    pub status: CommandStatus,
    pub created_at_ms: u64,
    pub lease_expires_at_ms: Option<u64>,
    pub completed_at_ms: Option<u64>,
}

impl Command {
    /// Create a freshly scheduled command
    pub fn pending(
        command_id: impl Into<String>,
        device_id: impl Into<String>,
        command_type: CommandType,
        params: ParamValue,
        created_at_ms: u64,
    ) -> Self {
        Self {
            command_id: command_id.into(),
            device_id: device_id.into(),
            command_type,
            params,
            status: CommandStatus::Pending,
            created_at_ms,
            lease_expires_at_ms: None,
            completed_at_ms: None,
        }
    }
}

/// Request body for scheduling a command
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleRequest {
    pub command_type: CommandType,
    /// `None` is stored as an empty map
    pub params: Option<ParamValue>,
}

impl ScheduleRequest {
    pub fn new(command_type: CommandType) -> Self {
        Self {
            command_type,
            params: None,
        }
    }

    pub fn with_params(mut self, params: ParamValue) -> Self {
        self.params = Some(params);
        self
    }
}

/// Externally observed state of an asynchronously loaded view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
    Error,
}

/// Which commands a consumer wants to see
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Leased,
    /// Succeeded or failed
    Terminal,
}

impl StatusFilter {
    pub fn matches(&self, status: CommandStatus) -> bool {
        match self {
            Self::All => true,
            Self::Pending => status == CommandStatus::Pending,
            Self::Leased => status == CommandStatus::Leased,
            Self::Terminal => status.is_terminal(),
        }
    }

    /// Newest first, filtered by status
    pub fn apply(&self, commands: &[Command]) -> Vec<Command> {
        let mut visible: Vec<Command> = commands
            .iter()
            .filter(|c| self.matches(c.status))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at_ms.cmp(&a.created_at_ms));
        visible
    }
}
