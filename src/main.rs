mod app;
mod config;
mod logger;
mod mqtt;
mod recognition;
mod replay;
mod telemetry;
mod types;
mod utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use chrono::Utc;
use clap::Parser;
use crossbeam_channel::bounded;
use log::{error, info, warn};

use app::handlers::SessionHandler;
use app::{DataChannels, GestureApp};
use config::{AppConfig, ConfigError, ConfigManager};
use mqtt::run_mqtt_client;
use telemetry::{ManualClock, SystemClock};

const DEFAULT_CONFIG_FILE: &str = "gesturehub.toml";

#[derive(Parser, Debug)]
#[command(name = "gesture-hub", version, about = "Hand gesture recognition with per-session performance telemetry")]
struct Cli {
    /// Config file (default: ./gesturehub.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Replay a JSON-lines landmark recording instead of connecting to MQTT
    #[arg(long)]
    replay: Option<PathBuf>,

    /// Session id for the first session (generated when omitted)
    #[arg(long)]
    session_id: Option<String>,

    /// Network type label written to every exported row
    #[arg(long)]
    network_type: Option<String>,

    /// Resolution label written to every exported row
    #[arg(long)]
    resolution: Option<String>,

    /// Directory for CSV exports
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Write the effective configuration (file plus flags) to PATH and exit
    #[arg(long, value_name = "PATH")]
    write_config: Option<PathBuf>,

    /// Log per-frame classification details
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    logger::init_logger(if cli.verbose { "debug" } else { "info" });
    info!("GestureHub v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Some(path) = &cli.write_config {
        match config.get_config().save_to_file(path) {
            Ok(()) => info!("Configuration written to {}", path.display()),
            Err(e) => {
                error!("Failed to write configuration: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let result = match cli.replay {
        Some(path) => run_replay_mode(config, &path, cli.session_id),
        None => run_live_mode(config, cli.session_id),
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// 加载配置文件，命令行参数覆盖文件中的值
fn load_config(cli: &Cli) -> Result<ConfigManager, ConfigError> {
    let mut manager = match &cli.config {
        Some(path) => ConfigManager::load_from_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => ConfigManager::load_from_file(DEFAULT_CONFIG_FILE)?,
        None => ConfigManager::from_config(AppConfig::default()),
    };

    match manager.config_path() {
        Some(path) => info!("Loaded config from {}", path.display()),
        None => info!("No config file, using defaults"),
    }

    let config = manager.get_config_mut();
    if let Some(network_type) = &cli.network_type {
        config.session.network_type = network_type.clone();
    }
    if let Some(resolution) = &cli.resolution {
        config.session.resolution = resolution.clone();
    }
    if let Some(dir) = &cli.export_dir {
        config.export.directory = dir.to_string_lossy().into_owned();
    }
    config.validate()?;

    Ok(manager)
}

fn run_live_mode(config: ConfigManager, session_id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let app_config = config.get_config().clone();

    let (frame_sender, frame_receiver) = bounded(app_config.channels.frame_channel_capacity);
    let (control_sender, control_receiver) = bounded(app_config.channels.control_channel_capacity);
    let shutdown_signal = Arc::new(AtomicBool::new(false));

    let handler_shutdown = Arc::clone(&shutdown_signal);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        handler_shutdown.store(true, Ordering::Relaxed);
    })?;

    let mqtt_shutdown = Arc::clone(&shutdown_signal);
    let mqtt_handle = thread::spawn(move || {
        if let Err(e) = run_mqtt_client(app_config.mqtt, frame_sender, control_sender, mqtt_shutdown) {
            error!("MQTT thread failed: {}", e);
        }
    });

    let mut app = GestureApp::new(config, Box::new(SystemClock::new()));
    if app.config.get_config().session.auto_start {
        SessionHandler::start_session(&mut app, session_id, None, None);
    }

    let channels = DataChannels {
        frame_receiver,
        control_receiver,
    };
    app.run(&channels, &shutdown_signal);

    // 主循环退出后通知 MQTT 线程
    shutdown_signal.store(true, Ordering::Relaxed);
    if mqtt_handle.is_finished() {
        if mqtt_handle.join().is_err() {
            error!("MQTT thread panicked");
        }
    } else {
        // 线程在等待下一个broker事件，进程退出时一并结束
        warn!("MQTT thread still waiting on the broker, not joining");
    }

    info!("GestureHub stopped");
    Ok(())
}

fn run_replay_mode(config: ConfigManager, path: &Path, session_id: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let frames = replay::load_frames(path)?;
    info!("Replaying {} frames from {}", frames.len(), path.display());

    if !replay::frames_are_timestamped(&frames) {
        info!(
            "Some frames carry no timestamp, spacing them {} ms apart",
            config.get_config().replay.frame_interval_ms
        );
    }

    let clock = ManualClock::new(Utc::now());
    let mut app = GestureApp::new(config, Box::new(clock.clone()));
    let summary = replay::run_replay(&mut app, &frames, &clock, session_id)?;

    info!("{}", summary.message());
    Ok(())
}
