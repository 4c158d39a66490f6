//! Ball launcher command-line client
//!
//! Usage:
//!   ball-launcher-client [--ip <addr>] [--port <port>] set-state <phi> <theta> [motor flags]
//!   ball-launcher-client [--ip <addr>] [--port <port>] set-rpm <phi> <theta> [motor flags]
//!   ball-launcher-client [--ip <addr>] [--port <port>] launch
//!
//! Sends exactly one request. The exit status is non-zero when the server
//! rejects it or the connection fails.

use ball_launcher::{Config, LauncherClient, Motors, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Ball launcher client: sends one command to a ball launcher server
#[derive(Parser, Debug)]
#[command(name = "ball-launcher-client", version)]
struct Args {
    /// TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Server IP address
    #[arg(long)]
    ip: Option<String>,

    /// Server port
    #[arg(short, long)]
    port: Option<u16>,

    /// Reply timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Set orientation and motor activations
    SetState(StateArgs),
    /// Set orientation and motor speeds
    SetRpm(StateArgs),
    /// Launch one ball
    Launch,
}

#[derive(ClapArgs, Debug)]
struct StateArgs {
    /// Azimuthal angle of the launcher, in [0, 1]
    phi: f32,
    /// Altitude of the launcher, in [0, 1]
    theta: f32,
    /// Activation of the top left motor, in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    top_left_motor: f32,
    /// Activation of the top right motor, in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    top_right_motor: f32,
    /// Activation of the bottom motor, in [0, 1]
    #[arg(long, default_value_t = 0.0)]
    bottom_motor: f32,
}

impl StateArgs {
    fn motors(&self) -> Motors {
        Motors::new(self.top_left_motor, self.top_right_motor, self.bottom_motor)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(ip) = args.ip {
        config.client.ip_address = ip;
    }
    if let Some(port) = args.port {
        config.client.port = port;
    }
    if args.timeout_ms.is_some() {
        config.client.timeout_ms = args.timeout_ms;
    }

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.as_str()),
    )
    .init();

    let mut client = LauncherClient::connect(&config.client)?;

    match &args.command {
        Command::SetState(state) => client.set_state(state.phi, state.theta, state.motors())?,
        Command::SetRpm(state) => client.set_rpm(state.phi, state.theta, state.motors())?,
        Command::Launch => client.launch_ball()?,
    }

    log::info!("Request acknowledged");
    Ok(())
}
