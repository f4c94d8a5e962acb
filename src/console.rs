//! The console: device list, command view and scheduler wired together

use crate::command::{CommandScheduler, ScheduleError};
use crate::polling::{
    CommandsView, DeviceListLoader, DevicesView, PollingConfig, PollingCoordinator,
};
use crate::source::CommandSource;
use devcmd_shared::{Clock, Command, CommandType, StatusFilter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Consumer-side state for one console session
pub struct Console {
    source: Arc<dyn CommandSource>,
    devices: DeviceListLoader,
    commands: Arc<PollingCoordinator>,
    scheduler: CommandScheduler,
    status_filter: RwLock<StatusFilter>,
    force_errors: AtomicBool,
}

impl Console {
    pub fn new(
        source: Arc<dyn CommandSource>,
        clock: Arc<dyn Clock>,
        config: PollingConfig,
    ) -> Self {
        let commands = Arc::new(PollingCoordinator::new(source.clone(), clock, config));
        Self {
            devices: DeviceListLoader::new(source.clone()),
            scheduler: CommandScheduler::new(source.clone(), commands.clone()),
            commands,
            source,
            status_filter: RwLock::new(StatusFilter::All),
            force_errors: AtomicBool::new(false),
        }
    }

    /// Load the device list; called once when the console starts
    pub async fn start(&self) {
        self.devices.load().await;
    }

    pub async fn reload_devices(&self) {
        self.devices.load().await;
    }

    pub async fn select_device(&self, device_id: Option<String>) {
        self.commands.select_device(device_id).await;
    }

    pub async fn selected_device(&self) -> Option<String> {
        self.commands.view().await.device_id
    }

    pub async fn refresh(&self) {
        self.commands.refresh().await;
    }

    /// Schedule a command for the selected device
    pub async fn schedule(
        &self,
        command_type: CommandType,
        raw_params: &str,
    ) -> Result<Command, ScheduleError> {
        let device_id = self.selected_device().await;
        self.scheduler
            .submit(device_id.as_deref(), command_type, raw_params)
            .await
    }

    pub fn set_force_errors(&self, force: bool) {
        info!("Forced errors {}", if force { "on" } else { "off" });
        self.force_errors.store(force, Ordering::SeqCst);
        self.source.set_force_error(force);
    }

    pub fn force_errors(&self) -> bool {
        self.force_errors.load(Ordering::SeqCst)
    }

    pub async fn set_status_filter(&self, filter: StatusFilter) {
        *self.status_filter.write().await = filter;
    }

    /// Commands of the selected device, filtered and newest first
    pub async fn visible_commands(&self) -> Vec<Command> {
        let filter = *self.status_filter.read().await;
        filter.apply(&self.commands.view().await.commands)
    }

    pub async fn devices_view(&self) -> DevicesView {
        self.devices.view().await
    }

    pub async fn commands_view(&self) -> CommandsView {
        self.commands.view().await
    }

    /// Stop background polling
    pub async fn shutdown(&self) {
        self.commands.shutdown().await;
    }
}
