//! Ball launcher daemon
//!
//! Usage: ball-launcher-server [--config <path>] [--port <port>]
//!
//! Listens for requests over TCP and drives the configured launcher. Runs
//! until Ctrl-C.

use ball_launcher::{create_launcher, Config, Error, LauncherServer, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Ball launcher server: executes launcher requests from a remote client
#[derive(Parser, Debug)]
#[command(name = "ball-launcher-server", version)]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the port to bind
    #[arg(short, long)]
    port: Option<u16>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(port) = args.port {
        config.server.port = port;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    log::info!("Ball launcher server v{} starting...", env!("CARGO_PKG_VERSION"));
    match &args.config {
        Some(path) => log::info!("Using config: {}", path.display()),
        None => log::info!("Using default configuration"),
    }

    let launcher = create_launcher(&config.launcher)?;
    log::info!("Launcher: {}", config.launcher.launcher_type);

    let mut server = LauncherServer::bind(&config.server, launcher)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = Arc::clone(&running);
    ctrlc::set_handler(move || {
        log::info!("Received shutdown signal");
        r.store(false, Ordering::Relaxed);
    })
    .map_err(|e| Error::Config(format!("Error setting Ctrl-C handler: {}", e)))?;

    log::info!("Press Ctrl-C to stop.");
    server.run(&running);

    Ok(())
}
