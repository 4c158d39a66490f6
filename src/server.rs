//! Request dispatch loop
//!
//! The server alternates between two states:
//!
//! ```text
//!            no request
//!          ┌───────────┐
//!          ▼           │
//!      ┌────────┐  try_recv   ┌─────────────┐
//!      │  Idle  │────────────▶│ Dispatching │
//!      └────────┘   request   └──────┬──────┘
//!          ▲                         │ decode + launcher call
//!          └─────────────────────────┘
//!              send exactly one ack
//! ```
//!
//! Every accepted request gets exactly one acknowledgment. Decode errors,
//! unknown kinds, launcher errors and launcher panics all collapse into
//! [`Acknowledgment::Failed`]; none of them escape the dispatch step.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::launcher::Launcher;
use crate::protocol::{decode, Acknowledgment, Request};
use crate::transport::{ReplySocket, ReplyTransport};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Result of a single poll
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Nothing was pending
    Idle,
    /// One request was handled and answered
    Replied(Acknowledgment),
}

/// Counters since the server was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerStats {
    pub requests: u64,
    pub succeeded: u64,
    pub failed: u64,
    pub idle_polls: u64,
}

/// Housekeeping run on every idle poll
pub type IdleHook = Box<dyn FnMut() + Send>;

/// Server owning a reply transport and the launcher it drives
pub struct LauncherServer<T, L> {
    transport: T,
    launcher: L,
    poll_interval: Duration,
    idle_hook: Option<IdleHook>,
    stats: ServerStats,
}

/// Default pause after an idle poll (10ms keeps request latency low)
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(10);

impl<L: Launcher> LauncherServer<ReplySocket, L> {
    /// Bind the listening endpoint. Bind failure is fatal to the caller.
    pub fn bind(config: &ServerConfig, launcher: L) -> Result<Self> {
        let address = config.listen_address();
        let socket = ReplySocket::bind(address.as_str())?;
        log::info!("Ball launcher server listening on tcp://{}", address);
        Ok(Self::new(socket, launcher).with_poll_interval(config.poll_interval()))
    }

    pub fn local_addr(&self) -> Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }
}

impl<T: ReplyTransport, L: Launcher> LauncherServer<T, L> {
    pub fn new(transport: T, launcher: L) -> Self {
        Self {
            transport,
            launcher,
            poll_interval: DEFAULT_POLL_INTERVAL,
            idle_hook: None,
            stats: ServerStats::default(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Install housekeeping to run whenever no request is pending
    /// (for example a ball supply check)
    pub fn with_idle_hook(mut self, hook: impl FnMut() + Send + 'static) -> Self {
        self.idle_hook = Some(Box::new(hook));
        self
    }

    pub fn stats(&self) -> ServerStats {
        self.stats
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run one Idle -> (Dispatching ->) Idle cycle
    ///
    /// Returns `Err` only for transport failures; request failures are
    /// reported to the client and show up here as `Replied(Failed)`.
    pub fn poll_once(&mut self) -> Result<PollOutcome> {
        let Some(bytes) = self.transport.try_recv()? else {
            self.stats.idle_polls += 1;
            if let Some(hook) = self.idle_hook.as_mut() {
                hook();
            }
            return Ok(PollOutcome::Idle);
        };

        self.stats.requests += 1;
        let result = self.dispatch(&bytes);
        let ack = Acknowledgment::from(&result);
        match &result {
            Ok(()) => self.stats.succeeded += 1,
            Err(e) => {
                self.stats.failed += 1;
                log::warn!("Request failed: {}", e);
            }
        }

        self.transport.send(&[ack.to_byte()])?;
        Ok(PollOutcome::Replied(ack))
    }

    /// Poll until `running` is cleared
    ///
    /// Transport errors are logged and polling continues; the transport
    /// drops the broken connection and waits for the next client.
    pub fn run(&mut self, running: &AtomicBool) {
        log::info!("Ball launcher server running");
        while running.load(Ordering::Relaxed) {
            match self.poll_once() {
                Ok(PollOutcome::Idle) => std::thread::sleep(self.poll_interval),
                Ok(PollOutcome::Replied(_)) => {}
                Err(e) => {
                    log::error!("Transport error: {}", e);
                    std::thread::sleep(self.poll_interval);
                }
            }
        }
        let stats = self.stats;
        log::info!(
            "Ball launcher server stopped ({} requests, {} ok, {} failed)",
            stats.requests,
            stats.succeeded,
            stats.failed
        );
    }

    fn dispatch(&mut self, bytes: &[u8]) -> Result<()> {
        let request = decode(bytes)?;
        log::debug!("Dispatching {:?}", request);

        let launcher = &mut self.launcher;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| match &request {
            Request::SetState(state) => launcher.set_state(state),
            Request::SetRpm(state) => launcher.set_rpm(state),
            Request::LaunchBall => launcher.launch_ball(),
        }));

        match outcome {
            Ok(result) => result,
            Err(payload) => Err(Error::Actuator(format!(
                "Launcher panicked during {}: {}",
                request.kind(),
                panic_message(payload.as_ref())
            ))),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "unknown panic"
    }
}
