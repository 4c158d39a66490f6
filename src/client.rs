//! Ball launcher client
//!
//! Each call sends one request and blocks for its acknowledgment. There is
//! no retry: a failure acknowledgment becomes [`Error::RequestFailed`], and
//! socket problems surface as [`Error::Transport`].

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::protocol::{encode, Acknowledgment, LauncherState, Motors, Request};
use crate::transport::{RequestSocket, RequestTransport};

/// Client sending commands to the ball launcher server
pub struct LauncherClient<T = RequestSocket> {
    transport: T,
}

impl LauncherClient<RequestSocket> {
    /// Connect to the server named in `config`
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        let addr = config.server_address()?;
        let socket = RequestSocket::connect(addr, config.timeout())?;
        Ok(Self::new(socket))
    }
}

impl<T: RequestTransport> LauncherClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Set orientation of the launcher and motor activations.
    ///
    /// `phi` is the azimuthal angle and `theta` the altitude, both in
    /// `[0, 1]`. Pass `Motors::default()` to leave all wheels at rest.
    pub fn set_state(&mut self, phi: f32, theta: f32, motors: Motors) -> Result<()> {
        self.send(Request::SetState(LauncherState::new(phi, theta, motors)))
    }

    /// Set orientation of the launcher and motor speeds
    pub fn set_rpm(&mut self, phi: f32, theta: f32, motors: Motors) -> Result<()> {
        self.send(Request::SetRpm(LauncherState::new(phi, theta, motors)))
    }

    /// Launch one ball
    pub fn launch_ball(&mut self) -> Result<()> {
        self.send(Request::LaunchBall)
    }

    fn send(&mut self, request: Request) -> Result<()> {
        let kind = request.kind();
        log::debug!("Sending {:?}", request);

        let reply = self.transport.request(&encode(&request))?;
        match Acknowledgment::from_reply(&reply)? {
            Acknowledgment::Ok => Ok(()),
            Acknowledgment::Failed => Err(Error::RequestFailed { kind }),
        }
    }
}
