//! [`CommandSource`] backed by the in-process mock API

use super::traits::CommandSource;
use anyhow::Result;
use async_trait::async_trait;
use devcmd_server::MockApi;
use devcmd_shared::{Command, Device, ScheduleRequest};

#[async_trait]
impl CommandSource for MockApi {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        Ok(MockApi::list_devices(self).await?)
    }

    async fn list_commands(&self, device_id: &str) -> Result<Vec<Command>> {
        Ok(MockApi::list_commands(self, device_id).await?)
    }

    async fn create_command(&self, device_id: &str, request: ScheduleRequest) -> Result<Command> {
        Ok(MockApi::create_command(self, device_id, request).await?)
    }

    fn set_force_error(&self, force: bool) {
        MockApi::set_force_error(self, force);
    }
}
