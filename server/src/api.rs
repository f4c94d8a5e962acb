//! Service facade consumed by clients

use crate::command::{CommandStore, RandomSource, SeededRandom};
use crate::config::BackendConfig;
use crate::network::{ApiError, NetworkSimulator};
use devcmd_shared::{Clock, Command, Device, ScheduleRequest, SystemClock};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Mock command API.
///
/// Store access is synchronous and never held across an await, so a plain
/// mutex is enough even when the API is shared between tasks.
pub struct MockApi {
    store: Mutex<CommandStore>,
    network: NetworkSimulator,
}

impl MockApi {
    /// Create an API backed by the wall clock
    pub fn new(config: BackendConfig) -> Self {
        let random: Box<dyn RandomSource> = match config.rng_seed {
            Some(seed) => Box::new(SeededRandom::from_seed(seed)),
            None => Box::new(SeededRandom::from_entropy()),
        };
        Self::with_parts(config, Arc::new(SystemClock), random)
    }

    /// Create an API with an explicit clock and outcome source
    pub fn with_parts(
        config: BackendConfig,
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
    ) -> Self {
        Self {
            store: Mutex::new(CommandStore::new(clock, random, config.failure_probability)),
            network: NetworkSimulator::new(config.latency_ms, config.force_error),
        }
    }

    /// GET /devices
    pub async fn list_devices(&self) -> Result<Vec<Device>, ApiError> {
        self.network.simulate(|| self.store().devices()).await
    }

    /// GET /devices/:device_id/commands
    pub async fn list_commands(&self, device_id: &str) -> Result<Vec<Command>, ApiError> {
        self.network
            .simulate(|| self.store().list_commands(device_id))
            .await
    }

    /// POST /devices/:device_id/commands
    pub async fn create_command(
        &self,
        device_id: &str,
        request: ScheduleRequest,
    ) -> Result<Command, ApiError> {
        self.network
            .simulate(|| self.store().create_command(device_id, request))
            .await
    }

    pub fn set_force_error(&self, force: bool) {
        self.network.set_force_error(force);
    }

    pub fn set_latency_ms(&self, ms: f64) {
        self.network.set_latency_ms(ms);
    }

    /// Clear all commands and re-seed
    pub fn reset(&self) {
        self.store().reset();
    }

    fn store(&self) -> MutexGuard<'_, CommandStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new(BackendConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::FixedRandom;
    use devcmd_shared::{CommandStatus, CommandType, ManualClock, ParamValue};

    const T0: u64 = 1_700_000_000_000;

    fn api(draw: f64) -> (Arc<ManualClock>, MockApi) {
        let clock = Arc::new(ManualClock::new(T0));
        let config = BackendConfig {
            latency_ms: 0.0,
            ..Default::default()
        };
        let api = MockApi::with_parts(config, clock.clone(), Box::new(FixedRandom(draw)));
        (clock, api)
    }

    #[tokio::test]
    async fn test_devices_are_cloned() {
        let (_clock, api) = api(0.5);

        let mut first = api.list_devices().await.unwrap();
        assert!(!first.is_empty());
        first.push(Device::new("mutated"));

        let second = api.list_devices().await.unwrap();
        assert!(second.iter().all(|d| d.device_id != "mutated"));
    }

    #[tokio::test]
    async fn test_schedule_and_advance() {
        let (clock, api) = api(0.5);

        let request = ScheduleRequest::new(CommandType::Ping)
            .with_params(ParamValue::map([("a", ParamValue::from(1))]));
        let created = api.create_command("d_custom", request).await.unwrap();
        assert!(created.command_id.starts_with("c_"));

        let list = api.list_commands("d_custom").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].command_id, created.command_id);
        assert_eq!(list[0].status, CommandStatus::Pending);

        clock.advance(2_000);
        let list = api.list_commands("d_custom").await.unwrap();
        assert_eq!(list[0].status, CommandStatus::Leased);
        assert!(list[0].lease_expires_at_ms.is_some());

        clock.advance(3_000);
        let list = api.list_commands("d_custom").await.unwrap();
        assert_eq!(list[0].status, CommandStatus::Succeeded);
        assert!(list[0].completed_at_ms.is_some());
    }

    #[tokio::test]
    async fn test_failed_outcome() {
        let (clock, api) = api(0.1);

        api.create_command("d_fail", ScheduleRequest::new(CommandType::Reboot))
            .await
            .unwrap();
        clock.advance(5_000);

        let list = api.list_commands("d_fail").await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].status, CommandStatus::Failed);
        assert!(list[0].completed_at_ms.is_some());
    }

    #[tokio::test]
    async fn test_force_error_mid_session() {
        let (_clock, api) = api(0.5);
        assert!(api.list_commands("d_001").await.is_ok());

        api.set_force_error(true);
        let err = api.list_commands("d_001").await.unwrap_err();
        assert_eq!(err.to_string(), "Mock API error (simulated)");

        // Nothing was created while failing
        assert!(api
            .create_command("d_new", ScheduleRequest::new(CommandType::Ping))
            .await
            .is_err());

        api.set_force_error(false);
        assert_eq!(api.list_commands("d_001").await.unwrap().len(), 3);
        assert!(api.list_commands("d_new").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_runtime_data() {
        let (_clock, api) = api(0.5);

        api.create_command("d_new", ScheduleRequest::new(CommandType::Ping))
            .await
            .unwrap();
        assert_eq!(api.list_commands("d_new").await.unwrap().len(), 1);

        api.reset();

        assert!(api.list_commands("d_new").await.unwrap().is_empty());
        assert_eq!(api.list_commands("d_003").await.unwrap().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_latency_applies_to_api_calls() {
        let (_clock, api) = api(0.5);
        api.set_latency_ms(250.4);

        let start = tokio::time::Instant::now();
        api.list_devices().await.unwrap();
        assert!(start.elapsed() >= std::time::Duration::from_millis(250));
    }
}
