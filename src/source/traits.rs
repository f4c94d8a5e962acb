//! Data source trait abstraction

use anyhow::Result;
use async_trait::async_trait;
use devcmd_shared::{Command, Device, ScheduleRequest};

/// Backend operations the console consumes
#[async_trait]
pub trait CommandSource: Send + Sync {
    /// Full device catalog
    async fn list_devices(&self) -> Result<Vec<Device>>;

    /// Current commands of one device, in storage order
    async fn list_commands(&self, device_id: &str) -> Result<Vec<Command>>;

    /// Schedule a command and return it as created
    async fn create_command(&self, device_id: &str, request: ScheduleRequest) -> Result<Command>;

    /// Make every subsequent call fail
    fn set_force_error(&self, force: bool);
}
