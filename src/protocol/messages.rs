//! Request types, in domain form and in protobuf wire form.
//!
//! The wire structs mirror this schema:
//!
//! ```text
//! message State {
//!   float phi = 1;
//!   float theta = 2;
//!   float top_left_motor = 3;
//!   float top_right_motor = 4;
//!   float bottom_motor = 5;
//! }
//!
//! message Request {
//!   enum RequestType { SET_STATE = 0; SET_RPM = 1; LAUNCH_BALL = 2; }
//!   RequestType request = 1;
//!   State state = 2;
//! }
//! ```

use std::fmt;

/// Orientation and motor activations of the launcher.
///
/// All values are nominally in `[0, 1]`. The wire format does not enforce
/// the range; launchers validate what they accept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LauncherState {
    /// Azimuthal angle of the launcher
    pub phi: f32,
    /// Altitude of the launcher
    pub theta: f32,
    pub top_left_motor: f32,
    pub top_right_motor: f32,
    pub bottom_motor: f32,
}

/// Activation of the three launch wheels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Motors {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom: f32,
}

impl Motors {
    pub fn new(top_left: f32, top_right: f32, bottom: f32) -> Self {
        Self {
            top_left,
            top_right,
            bottom,
        }
    }
}

impl LauncherState {
    /// Centered orientation with all wheels at rest
    pub fn neutral() -> Self {
        Self {
            phi: 0.5,
            theta: 0.5,
            ..Self::default()
        }
    }

    pub fn new(phi: f32, theta: f32, motors: Motors) -> Self {
        Self {
            phi,
            theta,
            top_left_motor: motors.top_left,
            top_right_motor: motors.top_right,
            bottom_motor: motors.bottom,
        }
    }

    /// Fields in wire order, paired with their names
    pub fn fields(&self) -> [(&'static str, f32); 5] {
        [
            ("phi", self.phi),
            ("theta", self.theta),
            ("top_left_motor", self.top_left_motor),
            ("top_right_motor", self.top_right_motor),
            ("bottom_motor", self.bottom_motor),
        ]
    }
}

/// Kind tag of a request, without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    SetState,
    SetRpm,
    LaunchBall,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestKind::SetState => "SET_STATE",
            RequestKind::SetRpm => "SET_RPM",
            RequestKind::LaunchBall => "LAUNCH_BALL",
        };
        f.write_str(name)
    }
}

/// A command for the launcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Request {
    /// Set orientation and motor activations
    SetState(LauncherState),
    /// Set orientation and motor speeds
    SetRpm(LauncherState),
    /// Fire one ball
    LaunchBall,
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::SetState(_) => RequestKind::SetState,
            Request::SetRpm(_) => RequestKind::SetRpm,
            Request::LaunchBall => RequestKind::LaunchBall,
        }
    }
}

/// Protobuf `Request.RequestType`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum RequestType {
    SetState = 0,
    SetRpm = 1,
    LaunchBall = 2,
}

impl From<RequestKind> for RequestType {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::SetState => RequestType::SetState,
            RequestKind::SetRpm => RequestType::SetRpm,
            RequestKind::LaunchBall => RequestType::LaunchBall,
        }
    }
}

impl From<RequestType> for RequestKind {
    fn from(request_type: RequestType) -> Self {
        match request_type {
            RequestType::SetState => RequestKind::SetState,
            RequestType::SetRpm => RequestKind::SetRpm,
            RequestType::LaunchBall => RequestKind::LaunchBall,
        }
    }
}

/// Protobuf `Request` message
#[derive(Clone, PartialEq, prost::Message)]
pub struct RequestProto {
    #[prost(enumeration = "RequestType", tag = "1")]
    pub request: i32,
    #[prost(message, optional, tag = "2")]
    pub state: Option<StateProto>,
}

/// Protobuf `State` message
#[derive(Clone, Copy, PartialEq, prost::Message)]
pub struct StateProto {
    #[prost(float, tag = "1")]
    pub phi: f32,
    #[prost(float, tag = "2")]
    pub theta: f32,
    #[prost(float, tag = "3")]
    pub top_left_motor: f32,
    #[prost(float, tag = "4")]
    pub top_right_motor: f32,
    #[prost(float, tag = "5")]
    pub bottom_motor: f32,
}

impl From<&LauncherState> for StateProto {
    fn from(state: &LauncherState) -> Self {
        Self {
            phi: state.phi,
            theta: state.theta,
            top_left_motor: state.top_left_motor,
            top_right_motor: state.top_right_motor,
            bottom_motor: state.bottom_motor,
        }
    }
}

impl From<StateProto> for LauncherState {
    fn from(state: StateProto) -> Self {
        Self {
            phi: state.phi,
            theta: state.theta,
            top_left_motor: state.top_left_motor,
            top_right_motor: state.top_right_motor,
            bottom_motor: state.bottom_motor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_motors_default_to_rest() {
        let state = LauncherState::new(0.5, 0.3, Motors::default());
        assert_eq!(state.top_left_motor, 0.0);
        assert_eq!(state.top_right_motor, 0.0);
        assert_eq!(state.bottom_motor, 0.0);
    }

    #[test]
    fn test_neutral_state() {
        let state = LauncherState::neutral();
        assert_eq!((state.phi, state.theta), (0.5, 0.5));
        assert_eq!(state.fields()[2..].iter().map(|(_, v)| *v).sum::<f32>(), 0.0);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(Request::LaunchBall.kind(), RequestKind::LaunchBall);
        assert_eq!(
            Request::SetRpm(LauncherState::default()).kind(),
            RequestKind::SetRpm
        );
        assert_eq!(RequestType::from(RequestKind::SetRpm) as i32, 1);
        assert_eq!(RequestKind::from(RequestType::LaunchBall), RequestKind::LaunchBall);
        assert_eq!(RequestKind::SetState.to_string(), "SET_STATE");
    }
}
