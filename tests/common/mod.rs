//! Shared harness for request/reply integration tests

#![allow(dead_code)]

use ball_launcher::config::{ClientConfig, ServerConfig};
use ball_launcher::{Error, Launcher, LauncherServer, LauncherState, Result, ServerStats};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

/// Launcher call as observed by the server
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    SetState(LauncherState),
    SetRpm(LauncherState),
    LaunchBall,
}

/// Launcher whose calls stay visible to the test after the server takes ownership
#[derive(Clone, Default)]
pub struct SharedLauncher {
    calls: Arc<Mutex<Vec<Call>>>,
    failing: Arc<AtomicBool>,
    delay: Arc<Mutex<Duration>>,
}

impl SharedLauncher {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Make every following call fail with an internal fault
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Block every following call for `delay` before answering
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    fn record(&self, call: Call) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        if self.failing.load(Ordering::SeqCst) {
            Err(Error::Actuator("internal fault".to_string()))
        } else {
            Ok(())
        }
    }
}

impl Launcher for SharedLauncher {
    fn set_state(&mut self, state: &LauncherState) -> Result<()> {
        self.record(Call::SetState(*state))
    }

    fn set_rpm(&mut self, state: &LauncherState) -> Result<()> {
        self.record(Call::SetRpm(*state))
    }

    fn launch_ball(&mut self) -> Result<()> {
        self.record(Call::LaunchBall)
    }
}

/// Server running on its own thread, bound to an ephemeral localhost port
pub struct RunningServer {
    pub addr: SocketAddr,
    running: Arc<AtomicBool>,
    handle: Option<JoinHandle<ServerStats>>,
}

impl RunningServer {
    pub fn start<L: Launcher + 'static>(launcher: L) -> Self {
        let config = ServerConfig {
            bind_address: "127.0.0.1".to_string(),
            port: 0,
            poll_interval_ms: 1,
        };
        let mut server = LauncherServer::bind(&config, launcher).unwrap();
        let addr = server.local_addr().unwrap();

        let running = Arc::new(AtomicBool::new(true));
        let flag = Arc::clone(&running);
        let handle = std::thread::spawn(move || {
            server.run(&flag);
            server.stats()
        });

        Self {
            addr,
            running,
            handle: Some(handle),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            ip_address: self.addr.ip().to_string(),
            port: self.addr.port(),
            timeout_ms: Some(5000),
        }
    }

    /// Stop the loop and return its final counters
    pub fn stop(mut self) -> ServerStats {
        self.running.store(false, Ordering::Relaxed);
        self.handle.take().unwrap().join().unwrap()
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

pub const TIMEOUT: Duration = Duration::from_secs(5);
