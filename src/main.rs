//! Auto Fishing - Destiny 2 fishing script
//!
//! Usage: `auto-fishing [config.toml]`. Without an argument the config is
//! read from `<data dir>/config/fishing.toml`.

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;

use auto_fishing::clock::system_clock;
use auto_fishing::config::Config;
use auto_fishing::fishing::{run_session, start_countdown, Fisher, SessionEnd, SessionSettings};
use auto_fishing::input::platform_backend;
use auto_fishing::log_main::{append_session, get_sessions_path, SessionRecord};
use auto_fishing::screen_reader::ScreenService;
use auto_fishing::utils::cancel::{install_ctrlc_handler, spawn_enter_listener, CancelToken};
use auto_fishing::utils::path::{default_config_path, get_data_dir};

const START_COUNTDOWN_SECS: u64 = 5;

#[derive(Parser, Debug)]
#[command(name = "auto-fishing")]
#[command(about = "Auto fishing for Destiny 2")]
struct Cli {
    /// Path to the TOML config. Default: <data dir>/config/fishing.toml
    config: Option<PathBuf>,
}

fn init_logging() {
    let log_dir = get_data_dir().join("debug").join("log");
    let _ = std::fs::create_dir_all(&log_dir);

    let log_file_path = log_dir.join("debug.log");
    let file_result = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path);

    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    const LOG_FILTER: &str = "info,auto_fishing=info";

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(LOG_FILTER));

    match file_result {
        Ok(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false);

            let stdout_layer = tracing_subscriber::fmt::layer();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(file_layer)
                .with(stdout_layer)
                .init();

            tracing::info!("[INIT] Logging initialized, file: {:?}", log_file_path);
        }
        Err(e) => {
            // Fallback: stdout-only logging with same filter
            tracing_subscriber::fmt().with_env_filter(env_filter).init();
            eprintln!(
                "[INIT] Failed to create debug log file at {:?}: {}",
                log_file_path, e
            );
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {:?}", config_path))?;

    let clock = system_clock();
    let backend = platform_backend().context("Failed to initialize input")?;
    let mut fisher = Fisher::from_config(&config, backend, Box::new(ScreenService::new()), clock.clone())
        .context("Failed to set up fishing")?;

    match config.fish_limit() {
        Some(limit) => println!("Fish limit is set to {}", limit),
        None => println!("Fish limit is not set"),
    }
    if fisher.anti_afk_enabled() {
        println!("Anti-AFK is enabled");
    } else {
        println!("Anti-AFK is disabled");
    }
    println!("Using fishing method {:?}", fisher.method_name());

    let cancel = CancelToken::new();
    if let Err(e) = install_ctrlc_handler(cancel.clone()) {
        tracing::warn!("[INIT] Failed to install Ctrl+C handler: {}", e);
    }
    spawn_enter_listener(cancel.clone());

    if !start_countdown(START_COUNTDOWN_SECS, &cancel, &clock) {
        tracing::info!("[INIT] Cancelled during countdown");
    }

    let settings = SessionSettings {
        fish_limit: config.fish_limit(),
        do_initial_cast: config.do_initial_cast,
    };

    let start = Utc::now();
    let summary = run_session(&mut fisher, &settings, &cancel);

    let record = SessionRecord {
        start: start.to_rfc3339(),
        stop: Some(Utc::now().to_rfc3339()),
        fish_caught: summary.fish_caught,
        end: summary.end.label(),
    };
    if let Err(e) = append_session(&get_sessions_path(), record) {
        tracing::warn!("[SESSION] Failed to save session history: {}", e);
    }

    match summary.end {
        SessionEnd::Failed(e) => Err(e).context("Fishing stopped by an error"),
        SessionEnd::LimitReached | SessionEnd::Cancelled => Ok(()),
    }
}
