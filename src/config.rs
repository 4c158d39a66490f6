//! Configuration for the ball launcher daemon and client
//!
//! Loads configuration from a TOML file. Every field has a default, so a
//! missing file section falls back to values suitable for a local setup.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Top-level configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub launcher: LauncherConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Listening side of the request/reply socket
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Interface to bind (default: 0.0.0.0)
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port number (default: 5555)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Sleep between polls when no request is pending, in milliseconds (default: 10)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

/// Connecting side of the request/reply socket
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClientConfig {
    /// Server IP address (default: 127.0.0.1)
    #[serde(default = "default_ip_address")]
    pub ip_address: String,

    /// TCP port number (default: 5555)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Connect/read/write timeout in milliseconds. Absent means block forever.
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Launcher implementation selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LauncherConfig {
    /// Launcher implementation (only "simulated" is built in)
    #[serde(rename = "type", default = "default_launcher_type")]
    pub launcher_type: String,

    /// Number of balls loaded. Absent means unlimited.
    #[serde(default)]
    pub ball_supply: Option<u32>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default log filter (trace, debug, info, warn, error); RUST_LOG wins
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_ip_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5555
}

fn default_poll_interval() -> u64 {
    10
}

fn default_launcher_type() -> String {
    "simulated".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            poll_interval_ms: default_poll_interval(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ip_address: default_ip_address(),
            port: default_port(),
            timeout_ms: None,
        }
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            launcher_type: default_launcher_type(),
            ball_supply: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Example
    /// ```no_run
    /// use ball_launcher::Config;
    ///
    /// let config = Config::load("ball_launcher.toml")?;
    /// # Ok::<(), ball_launcher::Error>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

impl ServerConfig {
    /// Address the reply socket binds to
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl ClientConfig {
    /// Server address, resolved from `ip_address` and `port`
    pub fn server_address(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.ip_address, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address {}: {}", self.ip_address, e)))
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
