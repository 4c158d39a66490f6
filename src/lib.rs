//! Ball launcher - remote control of a ball launching device
//!
//! A client commands the launcher (orientation, motor speeds, launch
//! trigger) over TCP using a strict request/reply exchange. Each request
//! is a protobuf message; each reply is a single acknowledgment byte.
//!
//! - [`client::LauncherClient`]: one blocking call per request kind
//! - [`server::LauncherServer`]: non-blocking poll/dispatch loop driving a
//!   [`launcher::Launcher`]

pub mod client;
pub mod config;
pub mod error;
pub mod launcher;
pub mod protocol;
pub mod server;
pub mod transport;

// Re-export commonly used types
pub use client::LauncherClient;
pub use config::Config;
pub use error::{Error, Result};
pub use launcher::{create_launcher, Launcher, SimulatedLauncher};
pub use protocol::{Acknowledgment, LauncherState, Motors, Request, RequestKind};
pub use server::{LauncherServer, PollOutcome, ServerStats};
