//! Launcher abstraction and implementations.
//!
//! - [`Launcher`]: Trait to implement for new hardware
//! - [`SimulatedLauncher`]: Hardware-free launcher for development and tests

mod simulated;

pub use simulated::SimulatedLauncher;

use crate::config::LauncherConfig;
use crate::error::{Error, Result};
use crate::protocol::LauncherState;

/// Actuator capability driven by the server loop.
///
/// Calls may block for the duration of the physical movement. Any failure
/// is reported as an `Err` (normally [`Error::Actuator`]); the server turns
/// it into a failure acknowledgment.
pub trait Launcher: Send {
    /// Set orientation and motor activations
    fn set_state(&mut self, state: &LauncherState) -> Result<()>;

    /// Set orientation and motor speeds
    fn set_rpm(&mut self, state: &LauncherState) -> Result<()>;

    /// Fire one ball
    fn launch_ball(&mut self) -> Result<()>;
}

impl<L: Launcher + ?Sized> Launcher for Box<L> {
    fn set_state(&mut self, state: &LauncherState) -> Result<()> {
        (**self).set_state(state)
    }

    fn set_rpm(&mut self, state: &LauncherState) -> Result<()> {
        (**self).set_rpm(state)
    }

    fn launch_ball(&mut self) -> Result<()> {
        (**self).launch_ball()
    }
}

/// Create a launcher based on configuration
pub fn create_launcher(config: &LauncherConfig) -> Result<Box<dyn Launcher>> {
    match config.launcher_type.as_str() {
        "simulated" => Ok(Box::new(SimulatedLauncher::new(config.ball_supply))),
        other => Err(Error::Config(format!("Unknown launcher type: {}", other))),
    }
}
