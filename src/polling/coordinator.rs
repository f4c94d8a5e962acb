//! Live view of the selected device's commands
//!
//! One polling loop runs per selected device. A loop fires immediately, then
//! on every interval tick and on every manual refresh. At most one fetch is
//! in flight per loop; triggers arriving while it runs are dropped, not
//! queued. Each loop carries a generation number and a result is applied
//! only if its generation is still current, so a slow fetch for a device that
//! is no longer selected can never reach the view.

use crate::format::format_error;
use crate::source::CommandSource;
use devcmd_shared::{lifecycle, Clock, Command, LoadState};
use futures::future::{BoxFuture, FutureExt, OptionFuture};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Shortest period a polling loop will run with
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// Configuration for command polling
#[derive(Debug, Clone)]
pub struct PollingConfig {
    /// Delay between timer-driven fetches, raised to 1 ms if shorter
    pub interval: Duration,
}

impl PollingConfig {
    /// The period a loop actually ticks at
    fn period(&self) -> Duration {
        self.interval.max(MIN_POLL_INTERVAL)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(lifecycle::POLL_INTERVAL_MS),
        }
    }
}

/// What a consumer renders for the selected device
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandsView {
    pub device_id: Option<String>,
    pub commands: Vec<Command>,
    pub state: LoadState,
    pub error: Option<String>,
    /// True while a non-initial fetch is outstanding
    pub refreshing: bool,
    pub last_updated_at_ms: Option<u64>,
}

/// View plus the bookkeeping that decides whether a result may be applied
#[derive(Debug, Default)]
struct PollState {
    view: CommandsView,
    generation: u64,
    initial: bool,
}

/// What caused a fetch attempt
#[derive(Debug, Clone, Copy)]
enum Trigger {
    Timer,
    Manual,
}

type Fetch = BoxFuture<'static, anyhow::Result<Vec<Command>>>;

/// Handle to a running loop; dropping it stops the loop
struct ActiveLoop {
    generation: u64,
    refresh_tx: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl Drop for ActiveLoop {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Keeps a self-refreshing view of one device's commands
pub struct PollingCoordinator {
    source: Arc<dyn CommandSource>,
    clock: Arc<dyn Clock>,
    config: PollingConfig,
    state: Arc<RwLock<PollState>>,
    active: Mutex<Option<ActiveLoop>>,
}

impl PollingCoordinator {
    pub fn new(
        source: Arc<dyn CommandSource>,
        clock: Arc<dyn Clock>,
        config: PollingConfig,
    ) -> Self {
        Self {
            source,
            clock,
            config,
            state: Arc::new(RwLock::new(PollState::default())),
            active: Mutex::new(None),
        }
    }

    /// Switch the view to `device_id`, or to nothing.
    ///
    /// The previous loop is cancelled before this returns, including any
    /// fetch it has in flight.
    pub async fn select_device(&self, device_id: Option<String>) {
        let mut active = self.active.lock().await;

        let generation = {
            let mut state = self.state.write().await;
            state.generation += 1;
            state.initial = true;
            state.view = CommandsView {
                device_id: device_id.clone(),
                state: if device_id.is_some() {
                    LoadState::Loading
                } else {
                    LoadState::Idle
                },
                ..Default::default()
            };
            state.generation
        };

        if let Some(old) = active.take() {
            debug!("Cancelling polling loop (generation {})", old.generation);
        }

        let Some(device_id) = device_id else {
            return;
        };

        info!("Polling commands for {} (generation {})", device_id, generation);

        let (refresh_tx, refresh_rx) = mpsc::unbounded_channel();
        let poll_loop = PollLoop {
            generation,
            device_id,
            source: self.source.clone(),
            clock: self.clock.clone(),
            state: self.state.clone(),
        };
        let period = self.config.period();
        let task = tokio::spawn(async move {
            poll_loop.run(period, refresh_rx).await;
        });

        *active = Some(ActiveLoop {
            generation,
            refresh_tx,
            task,
        });
    }

    /// Ask the active loop to fetch now
    pub async fn refresh(&self) {
        if let Some(active) = self.active.lock().await.as_ref() {
            // A closed channel means the loop is gone; nothing to refresh
            let _ = active.refresh_tx.send(());
        }
    }

    /// Snapshot of the current view
    pub async fn view(&self) -> CommandsView {
        self.state.read().await.view.clone()
    }

    /// Stop polling, leaving the last view in place
    pub async fn shutdown(&self) {
        if let Some(old) = self.active.lock().await.take() {
            // Anything still in flight for this loop must not land
            let mut state = self.state.write().await;
            state.generation += 1;
            state.view.refreshing = false;
            info!("Polling loop stopped (generation {})", old.generation);
        }
    }
}

/// The body of one polling loop
struct PollLoop {
    generation: u64,
    device_id: String,
    source: Arc<dyn CommandSource>,
    clock: Arc<dyn Clock>,
    state: Arc<RwLock<PollState>>,
}

impl PollLoop {
    async fn run(self, period: Duration, mut refresh_rx: mpsc::UnboundedReceiver<()>) {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut in_flight: Option<Fetch> = None;

        loop {
            // A finished fetch is applied before any trigger is looked at
            tokio::select! {
                biased;
                Some(outcome) = OptionFuture::from(in_flight.as_mut()) => {
                    in_flight = None;
                    self.complete(outcome).await;
                }
                _ = ticker.tick() => self.fire(Trigger::Timer, &mut in_flight).await,
                Some(()) = refresh_rx.recv() => self.fire(Trigger::Manual, &mut in_flight).await,
            }
        }
    }

    /// Start a fetch unless one is already running
    async fn fire(&self, trigger: Trigger, in_flight: &mut Option<Fetch>) {
        if in_flight.is_some() {
            debug!(
                "Fetch for {} already in flight, dropping {:?} trigger",
                self.device_id, trigger
            );
            return;
        }

        {
            let mut state = self.state.write().await;
            if state.generation != self.generation {
                return;
            }
            state.view.refreshing = !state.initial;
        }

        debug!("Fetching commands for {} ({:?})", self.device_id, trigger);

        let source = self.source.clone();
        let device_id = self.device_id.clone();
        *in_flight = Some(async move { source.list_commands(&device_id).await }.boxed());
    }

    /// Apply a fetch result if this loop is still the current one
    async fn complete(&self, outcome: anyhow::Result<Vec<Command>>) {
        let mut state = self.state.write().await;
        if state.generation != self.generation {
            debug!("Discarding stale result for {}", self.device_id);
            return;
        }

        state.initial = false;
        state.view.refreshing = false;

        match outcome {
            Ok(commands) => {
                state.view.commands = commands;
                state.view.error = None;
                state.view.state = LoadState::Ready;
                state.view.last_updated_at_ms = Some(self.clock.now_ms());
            }
            Err(err) => {
                let message = format_error(&err);
                warn!("Fetching commands for {} failed: {}", self.device_id, message);
                state.view.error = Some(message);
                // Cached commands beat an error banner
                state.view.state = if state.view.commands.is_empty() {
                    LoadState::Error
                } else {
                    LoadState::Ready
                };
            }
        }
    }
}
