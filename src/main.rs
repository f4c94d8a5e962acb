mod command;
mod console;
mod format;
mod polling;
mod source;

use console::Console;
use devcmd_server::{BackendConfig, MockApi};
use devcmd_shared::{CommandType, LoadState, StatusFilter, SystemClock};
use polling::PollingConfig;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const HELP: &str = "commands: devices | select <id> | unselect | refresh | \
ping|reboot|logs [json] | filter all|pending|leased|terminal | errors | show | quit";

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let backend_config = BackendConfig::default();
    let polling_config = PollingConfig::default();
    info!(
        "Mock backend: latency={}ms failure_probability={} poll every {:?}",
        backend_config.latency_ms, backend_config.failure_probability, polling_config.interval
    );

    let api = Arc::new(MockApi::new(backend_config));
    let console = Console::new(api, Arc::new(SystemClock), polling_config);

    console.start().await;
    render_devices(&console).await;

    // Select the first device so polling starts without any input
    if let Some(first) = console.devices_view().await.devices.first() {
        console.select_device(Some(first.device_id.clone())).await;
    }
    info!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&console, line.trim()).await? {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("Shutting down");
    console.shutdown().await;
    Ok(())
}

/// Apply one input line. Returns false when the user asked to quit.
async fn handle_line(console: &Console, line: &str) -> anyhow::Result<bool> {
    let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

    match word {
        "" => {}
        "quit" | "exit" => return Ok(false),
        "devices" => {
            console.reload_devices().await;
            render_devices(console).await;
        }
        "select" if !rest.trim().is_empty() => {
            console.select_device(Some(rest.trim().to_string())).await;
        }
        "unselect" => console.select_device(None).await,
        "refresh" => console.refresh().await,
        "errors" => console.set_force_errors(!console.force_errors()),
        "filter" => match parse_filter(rest.trim()) {
            Some(filter) => {
                console.set_status_filter(filter).await;
                render_commands(console).await?;
            }
            None => warn!("Unknown filter '{}'", rest.trim()),
        },
        "show" => render_commands(console).await?,
        other => match parse_command_type(other) {
            Some(command_type) => match console.schedule(command_type, rest).await {
                Ok(cmd) => info!("Scheduled {} on {}", cmd.command_id, cmd.device_id),
                Err(e) => error!("{}", e),
            },
            None => info!("{}", HELP),
        },
    }

    Ok(true)
}

fn parse_command_type(word: &str) -> Option<CommandType> {
    if word.eq_ignore_ascii_case("logs") {
        return Some(CommandType::CollectLogs);
    }
    CommandType::ALL
        .into_iter()
        .find(|t| t.as_str().eq_ignore_ascii_case(word))
}

fn parse_filter(word: &str) -> Option<StatusFilter> {
    match word.to_ascii_lowercase().as_str() {
        "all" => Some(StatusFilter::All),
        "pending" => Some(StatusFilter::Pending),
        "leased" => Some(StatusFilter::Leased),
        "terminal" => Some(StatusFilter::Terminal),
        _ => None,
    }
}

async fn render_devices(console: &Console) {
    let view = console.devices_view().await;
    match view.state {
        LoadState::Error => error!(
            "Could not load devices: {}",
            view.error.as_deref().unwrap_or_default()
        ),
        _ => {
            let ids: Vec<&str> = view.devices.iter().map(|d| d.device_id.as_str()).collect();
            info!("Devices: {}", ids.join(", "));
        }
    }
}

/// Log the current command view
async fn render_commands(console: &Console) -> anyhow::Result<()> {
    let view = console.commands_view().await;
    let device = view.device_id.as_deref().unwrap_or("-");

    match view.state {
        LoadState::Idle => info!("No device selected"),
        LoadState::Loading => info!("[{}] loading...", device),
        LoadState::Error => warn!(
            "[{}] error: {}",
            device,
            view.error.as_deref().unwrap_or_default()
        ),
        LoadState::Ready => {
            info!(
                "[{}] {} commands, updated at {:?}{}{}",
                device,
                view.commands.len(),
                view.last_updated_at_ms,
                if view.refreshing { " (refreshing)" } else { "" },
                view.error
                    .as_deref()
                    .map(|e| format!(" (last refresh failed: {e})"))
                    .unwrap_or_default()
            );
            for cmd in console.visible_commands().await {
                info!("  {}", serde_json::to_string(&cmd)?);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_type() {
        assert_eq!(parse_command_type("ping"), Some(CommandType::Ping));
        assert_eq!(parse_command_type("REBOOT"), Some(CommandType::Reboot));
        assert_eq!(parse_command_type("logs"), Some(CommandType::CollectLogs));
        assert_eq!(parse_command_type("collect_logs"), Some(CommandType::CollectLogs));
        assert_eq!(parse_command_type("nope"), None);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(parse_filter("Pending"), Some(StatusFilter::Pending));
        assert_eq!(parse_filter("terminal"), Some(StatusFilter::Terminal));
        assert_eq!(parse_filter(""), None);
    }
}
