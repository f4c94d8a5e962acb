//! In-memory store of devices and their commands

use super::random::RandomSource;
use devcmd_shared::{
    lifecycle, state_machine, Clock, Command, CommandRuntimeInfo, CommandType, Device,
    ParamValue, ScheduleRequest,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Devices present from startup, in catalog order
pub const SEED_DEVICE_IDS: [&str; 3] = ["d_001", "d_002", "d_003"];

/// Owns every device, command and runtime record.
///
/// Callers only ever receive clones, so nothing outside the store can alias
/// or mutate its collections.
pub struct CommandStore {
    devices: Vec<Device>,
    /// Commands per device, in insertion order
    commands_by_device: HashMap<String, Vec<Command>>,
    /// Runtime info by command_id
    runtime: HashMap<String, CommandRuntimeInfo>,
    next_command_number: u64,
    clock: Arc<dyn Clock>,
    random: Box<dyn RandomSource>,
    failure_probability: f64,
}

impl CommandStore {
    /// Create a store and seed it with the demo catalog
    pub fn new(
        clock: Arc<dyn Clock>,
        random: Box<dyn RandomSource>,
        failure_probability: f64,
    ) -> Self {
        let mut store = Self {
            devices: SEED_DEVICE_IDS.iter().map(|id| Device::new(*id)).collect(),
            commands_by_device: HashMap::new(),
            runtime: HashMap::new(),
            next_command_number: lifecycle::FIRST_COMMAND_NUMBER,
            clock,
            random,
            failure_probability,
        };
        store.seed();
        store
    }

    /// Full device catalog
    pub fn devices(&self) -> Vec<Device> {
        self.devices.clone()
    }

    /// Advance every command of `device_id` to the current instant and return them
    pub fn list_commands(&mut self, device_id: &str) -> Vec<Command> {
        let now = self.clock.now_ms();

        let Some(commands) = self.commands_by_device.get_mut(device_id) else {
            return Vec::new();
        };

        for cmd in commands.iter_mut() {
            let Some(info) = self.runtime.get(&cmd.command_id) else {
                continue;
            };
            for t in state_machine::advance(cmd, info, now) {
                debug!(
                    "Command {} on {}: {} -> {}",
                    cmd.command_id, device_id, t.from, t.to
                );
            }
        }

        commands.clone()
    }

    /// Schedule a new command created at the current instant
    pub fn create_command(&mut self, device_id: &str, request: ScheduleRequest) -> Command {
        let params = request.params.unwrap_or_default();
        let created_at_ms = self.clock.now_ms();
        let command = self.insert(device_id, request.command_type, params, created_at_ms);

        info!(
            "Scheduled command {} ({}) for {}",
            command.command_id, command.command_type, device_id
        );

        command
    }

    /// Drop all commands and re-seed from scratch
    pub fn reset(&mut self) {
        self.commands_by_device.clear();
        self.runtime.clear();
        self.next_command_number = lifecycle::FIRST_COMMAND_NUMBER;
        self.seed();
        info!("Command store reset");
    }

    fn next_command_id(&mut self) -> String {
        self.next_command_number += 1;
        format!("c_{}", self.next_command_number)
    }

    fn insert(
        &mut self,
        device_id: &str,
        command_type: CommandType,
        params: ParamValue,
        created_at_ms: u64,
    ) -> Command {
        let command_id = self.next_command_id();
        let will_fail = self.random.next_f64() < self.failure_probability;

        let command = Command::pending(
            command_id.clone(),
            device_id,
            command_type,
            params,
            created_at_ms,
        );

        self.commands_by_device
            .entry(device_id.to_string())
            .or_default()
            .push(command.clone());
        self.runtime
            .insert(command_id, CommandRuntimeInfo::new(created_at_ms, will_fail));

        command
    }

    /// Backdated commands so the first read already shows mixed statuses
    fn seed(&mut self) {
        let now = self.clock.now_ms();
        let device_ids: Vec<String> = self.devices.iter().map(|d| d.device_id.clone()).collect();

        for device_id in &device_ids {
            self.insert(
                device_id,
                CommandType::Ping,
                ParamValue::map([("seeded", ParamValue::Bool(true))]),
                now.saturating_sub(90_000),
            );
            self.insert(
                device_id,
                CommandType::CollectLogs,
                ParamValue::map([("window", ParamValue::from("last_5m"))]),
                now.saturating_sub(25_000),
            );
            self.insert(
                device_id,
                CommandType::Reboot,
                ParamValue::map([("reason", ParamValue::from("seeded_demo"))]),
                now.saturating_sub(2_000),
            );
        }
    }
}
