//! Scriptable in-memory source for tests

use super::traits::CommandSource;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use devcmd_shared::{Command, CommandType, Device, ParamValue, ScheduleRequest};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::time::{sleep, Duration};

/// A single command tagged with its device, handy as fetch output
pub fn command_for(device_id: &str) -> Command {
    Command::pending(
        format!("c_{device_id}"),
        device_id,
        CommandType::Ping,
        ParamValue::empty(),
        0,
    )
}

#[derive(Default)]
pub struct StubSource {
    devices: Vec<Device>,
    delays: HashMap<String, Duration>,
    /// Consumed front to back; once empty, fetches return `command_for(device)`
    scripted: Mutex<VecDeque<Result<Vec<Command>, String>>>,
    device_failure: Option<String>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<(String, ScheduleRequest)>>,
    force_error: AtomicBool,
}

impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_devices(mut self, ids: &[&str]) -> Self {
        self.devices = ids.iter().map(|id| Device::new(*id)).collect();
        self
    }

    pub fn with_delay(mut self, device_id: &str, delay: Duration) -> Self {
        self.delays.insert(device_id.to_string(), delay);
        self
    }

    pub fn with_outcome(self, outcome: Result<Vec<Command>, &str>) -> Self {
        self.scripted
            .lock()
            .unwrap()
            .push_back(outcome.map_err(str::to_string));
        self
    }

    pub fn with_device_failure(mut self, message: &str) -> Self {
        self.device_failure = Some(message.to_string());
        self
    }

    /// Device ids passed to `list_commands`, in call order
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn created(&self) -> Vec<(String, ScheduleRequest)> {
        self.created.lock().unwrap().clone()
    }

    pub fn force_error(&self) -> bool {
        self.force_error.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandSource for StubSource {
    async fn list_devices(&self) -> Result<Vec<Device>> {
        match &self.device_failure {
            Some(message) => Err(anyhow!(message.clone())),
            None => Ok(self.devices.clone()),
        }
    }

    async fn list_commands(&self, device_id: &str) -> Result<Vec<Command>> {
        self.calls.lock().unwrap().push(device_id.to_string());
        let outcome = self.scripted.lock().unwrap().pop_front();

        if let Some(delay) = self.delays.get(device_id) {
            sleep(*delay).await;
        }

        match outcome {
            Some(Ok(commands)) => Ok(commands),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Ok(vec![command_for(device_id)]),
        }
    }

    async fn create_command(&self, device_id: &str, request: ScheduleRequest) -> Result<Command> {
        if self.force_error() {
            return Err(anyhow!("Mock API error (simulated)"));
        }
        self.created
            .lock()
            .unwrap()
            .push((device_id.to_string(), request.clone()));
        Ok(Command::pending(
            "c_new",
            device_id,
            request.command_type,
            request.params.unwrap_or_default(),
            0,
        ))
    }

    fn set_force_error(&self, force: bool) {
        self.force_error.store(force, Ordering::SeqCst);
    }
}
