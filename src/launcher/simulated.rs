//! Simulated launcher
//!
//! Starts at the neutral orientation with all wheels at rest. Keeps the last
//! commanded orientation and motor targets, and counts launched balls
//! against an optional finite supply.

use super::Launcher;
use crate::error::{Error, Result};
use crate::protocol::LauncherState;

/// Launcher without hardware behind it
#[derive(Debug, Clone)]
pub struct SimulatedLauncher {
    state: LauncherState,
    /// Last SET_RPM targets, kept apart from activations
    rpm: LauncherState,
    /// Remaining balls, `None` for unlimited
    ball_supply: Option<u32>,
    balls_launched: u64,
}

impl SimulatedLauncher {
    pub fn new(ball_supply: Option<u32>) -> Self {
        log::info!(
            "Simulated launcher ready (ball supply: {})",
            ball_supply.map_or_else(|| "unlimited".to_string(), |n| n.to_string())
        );
        Self {
            state: LauncherState::neutral(),
            rpm: LauncherState::neutral(),
            ball_supply,
            balls_launched: 0,
        }
    }

    pub fn state(&self) -> &LauncherState {
        &self.state
    }

    pub fn rpm(&self) -> &LauncherState {
        &self.rpm
    }

    pub fn balls_launched(&self) -> u64 {
        self.balls_launched
    }

    pub fn ball_supply(&self) -> Option<u32> {
        self.ball_supply
    }
}

impl Default for SimulatedLauncher {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Every field must be a finite value in [0, 1]
fn validate(state: &LauncherState) -> Result<()> {
    for (name, value) in state.fields() {
        if !value.is_finite() || !(0.0..=1.0).contains(&value) {
            return Err(Error::Actuator(format!(
                "{} out of range [0, 1]: {}",
                name, value
            )));
        }
    }
    Ok(())
}

impl Launcher for SimulatedLauncher {
    fn set_state(&mut self, state: &LauncherState) -> Result<()> {
        validate(state)?;
        log::debug!("Launcher state -> {:?}", state);
        self.state = *state;
        Ok(())
    }

    fn set_rpm(&mut self, state: &LauncherState) -> Result<()> {
        validate(state)?;
        log::debug!("Launcher rpm -> {:?}", state);
        self.state.phi = state.phi;
        self.state.theta = state.theta;
        self.rpm = *state;
        Ok(())
    }

    fn launch_ball(&mut self) -> Result<()> {
        if let Some(remaining) = self.ball_supply.as_mut() {
            if *remaining == 0 {
                return Err(Error::Actuator("Ball supply empty".to_string()));
            }
            *remaining -= 1;
        }
        self.balls_launched += 1;
        log::info!("Ball launched (total: {})", self.balls_launched);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::Motors;

    #[test]
    fn test_starts_neutral() {
        let launcher = SimulatedLauncher::default();
        assert_eq!(*launcher.state(), LauncherState::neutral());
        assert_eq!(launcher.balls_launched(), 0);
    }

    #[test]
    fn test_set_state_stores_values() {
        let mut launcher = SimulatedLauncher::default();
        let target = LauncherState::new(0.2, 0.8, Motors::new(0.5, 0.5, 0.1));
        launcher.set_state(&target).unwrap();
        assert_eq!(*launcher.state(), target);
    }

    #[test]
    fn test_set_rpm_moves_orientation_only() {
        let mut launcher = SimulatedLauncher::default();
        let target = LauncherState::new(0.1, 0.9, Motors::new(1.0, 1.0, 1.0));
        launcher.set_rpm(&target).unwrap();
        assert_eq!(*launcher.rpm(), target);
        assert_eq!(launcher.state().phi, 0.1);
        assert_eq!(launcher.state().top_left_motor, 0.0);
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut launcher = SimulatedLauncher::default();
        let bad = LauncherState::new(1.5, 0.5, Motors::default());
        assert!(matches!(launcher.set_state(&bad), Err(Error::Actuator(_))));

        let nan = LauncherState::new(0.5, 0.5, Motors::new(f32::NAN, 0.0, 0.0));
        assert!(matches!(launcher.set_rpm(&nan), Err(Error::Actuator(_))));

        // Rejected commands leave the launcher where it was
        assert_eq!(*launcher.state(), LauncherState::neutral());
    }

    #[test]
    fn test_ball_supply_runs_out() {
        let mut launcher = SimulatedLauncher::new(Some(2));
        launcher.launch_ball().unwrap();
        launcher.launch_ball().unwrap();
        assert!(matches!(launcher.launch_ball(), Err(Error::Actuator(_))));
        assert_eq!(launcher.balls_launched(), 2);
        assert_eq!(launcher.ball_supply(), Some(0));
    }
}
