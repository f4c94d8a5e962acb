//! Command Lifecycle State Machine
//!
//! Commands move PENDING -> LEASED -> {SUCCEEDED | FAILED} purely as a
//! function of elapsed time. Nothing runs in the background: the stored
//! record is brought up to date whenever it is read, and every threshold is
//! checked on each call so a command that was not read for a long time lands
//! directly in its correct state.

use crate::{lifecycle, Command, CommandStatus};

/// Per-command data that drives the lifecycle but is never shown to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandRuntimeInfo {
    pub created_at_ms: u64,
    /// Drawn once at creation, so the outcome is fixed for the command's life
    pub will_fail: bool,
}

impl CommandRuntimeInfo {
    pub fn new(created_at_ms: u64, will_fail: bool) -> Self {
        Self {
            created_at_ms,
            will_fail,
        }
    }

    /// Instant at which the command becomes leased
    pub fn lease_at_ms(&self) -> u64 {
        self.created_at_ms + lifecycle::LEASE_AFTER_MS
    }

    /// Instant at which the command reaches its terminal status
    pub fn completes_at_ms(&self) -> u64 {
        self.created_at_ms + lifecycle::COMPLETE_AFTER_MS
    }

    /// Absolute lease expiry, fixed at the moment of leasing
    pub fn lease_expires_at_ms(&self) -> u64 {
        self.lease_at_ms() + lifecycle::LEASE_DURATION_MS
    }

    fn terminal_status(&self) -> CommandStatus {
        if self.will_fail {
            CommandStatus::Failed
        } else {
            CommandStatus::Succeeded
        }
    }
}

/// A status change applied by [`advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: CommandStatus,
    pub to: CommandStatus,
}

/// Status a command must have at `now_ms`, without touching any record
pub fn status_at(info: &CommandRuntimeInfo, now_ms: u64) -> CommandStatus {
    if now_ms >= info.completes_at_ms() {
        info.terminal_status()
    } else if now_ms >= info.lease_at_ms() {
        CommandStatus::Leased
    } else {
        CommandStatus::Pending
    }
}

/// Bring a stored command up to date with `now_ms`.
///
/// Returns the transitions taken, in order. Terminal commands are left alone
/// and calling this again with the same `now_ms` is a no-op.
pub fn advance(command: &mut Command, info: &CommandRuntimeInfo, now_ms: u64) -> Vec<Transition> {
    let target = status_at(info, now_ms);
    let mut taken = Vec::new();

    if command.status == CommandStatus::Pending && target != CommandStatus::Pending {
        command.lease_expires_at_ms = Some(info.lease_expires_at_ms());
        taken.push(step(command, CommandStatus::Leased));
    }

    // Re-checked even right after leasing so long gaps resolve in one call
    if command.status == CommandStatus::Leased && target.is_terminal() {
        command.completed_at_ms = Some(info.completes_at_ms());
        taken.push(step(command, target));
    }

    taken
}

fn step(command: &mut Command, to: CommandStatus) -> Transition {
    let from = command.status;
    debug_assert!(is_valid_transition(from, to), "{from} -> {to}");
    command.status = to;
    Transition { from, to }
}

/// Check if a status change respects the forward-only lifecycle
pub fn is_valid_transition(from: CommandStatus, to: CommandStatus) -> bool {
    use CommandStatus::*;

    matches!(
        (from, to),
        (Pending, Leased) | (Leased, Succeeded) | (Leased, Failed)
    )
}
