// glowctl/src/ipc/service.rs

//! The service side of the IPC channel.
//!
//! One process owns the hardware and serves controller requests over a Unix
//! socket. Every device-opening operation holds the registry lock from
//! before the device is opened until after it is closed, so two peers can
//! never interleave control writes to the same device; read-only operations
//! release the lock as soon as their result is produced.

use std::fs;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use crate::device::Device;
use crate::device::registry::DeviceRegistry;
use crate::ipc::codec::{read_frame, write_frame};
use crate::ipc::messages::{Reply, Request};
use crate::{Error, Result};

/// Hosts a [`DeviceRegistry`] behind the IPC boundary.
pub struct GlowService {
    registry: Mutex<DeviceRegistry>,
    state_file: Option<PathBuf>,
}

impl GlowService {
    pub fn new(state_file: Option<PathBuf>) -> Self {
        Self::with_registry(DeviceRegistry::new(), state_file)
    }

    /// Build a service over an explicit registry (tests inject devices with
    /// mock backends here).
    pub fn with_registry(registry: DeviceRegistry, state_file: Option<PathBuf>) -> Self {
        Self {
            registry: Mutex::new(registry),
            state_file,
        }
    }

    /// Bind the socket and serve until a `Quit` request arrives. Connections
    /// are served in arrival order; a failed connection is logged and the
    /// loop continues.
    pub fn run(&self, socket_path: &Path) -> Result<()> {
        self.preload_state();

        // A stale socket from a previous run would make bind fail.
        if socket_path.exists() {
            let _ = fs::remove_file(socket_path);
        }
        let listener = UnixListener::bind(socket_path)?;
        info!("glowctl service listening on {}", socket_path.display());

        for incoming in listener.incoming() {
            match incoming {
                Ok(mut stream) => {
                    if self.serve_connection(&mut stream) {
                        break;
                    }
                }
                Err(error) => warn!("failed to accept connection: {}", error),
            }
        }

        let _ = fs::remove_file(socket_path);
        info!("glowctl service stopped");
        Ok(())
    }

    /// Serve one connection until the peer disconnects. Returns true when a
    /// `Quit` request was handled and the accept loop should stop.
    fn serve_connection(&self, stream: &mut UnixStream) -> bool {
        loop {
            let request: Request = match read_frame(stream) {
                Ok(request) => request,
                Err(Error::Io(ref error))
                    if error.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return false;
                }
                Err(error) => {
                    warn!("dropping connection: {}", error);
                    return false;
                }
            };
            let quit = matches!(request, Request::Quit);
            let reply = self.handle(request);
            if let Err(error) = write_frame(stream, &reply) {
                warn!("failed to send reply: {}", error);
                return false;
            }
            if quit {
                return true;
            }
        }
    }

    /// Handle one request. Failures become [`Reply::Error`] so they reach
    /// the peer instead of killing the service loop.
    pub fn handle(&self, request: Request) -> Reply {
        debug!("handling {:?}", request);
        match self.dispatch(request) {
            Ok(reply) => reply,
            Err(error) => {
                warn!("request failed: {}", error);
                Reply::Error {
                    message: error.to_string(),
                }
            }
        }
    }

    fn dispatch(&self, request: Request) -> Result<Reply> {
        match request {
            Request::ListDevices => {
                let mut registry = self.lock();
                let devices = registry
                    .find_devices()
                    .into_iter()
                    .map(|d| {
                        (
                            d.descriptor().short_name.to_string(),
                            d.descriptor().name.to_string(),
                        )
                    })
                    .collect();
                Ok(Reply::Devices { devices })
            }
            Request::LoadState => {
                self.preload_state();
                Ok(Reply::Ok)
            }
            Request::SaveState => {
                let path = self.state_file.as_deref().ok_or(Error::NoStateFile)?;
                self.lock().write_state_of_devices(path)?;
                Ok(Reply::Ok)
            }
            Request::GetState => Ok(Reply::State {
                document: self.lock().state_document()?,
            }),
            Request::SetState { document } => {
                let mut registry = self.lock();
                registry.apply_document(&document)?;
                registry.restore_states_of_devices();
                Ok(Reply::Ok)
            }
            Request::SetColorAt {
                device,
                color,
                field,
            } => self
                .with_device(&device, |d| d.send_color(&color, field))
                .map(|_| Reply::Ok),
            Request::SetColors { device, colors } => self
                .with_device(&device, |d| d.send_colors(&colors))
                .map(|_| Reply::Ok),
            Request::SetBreathe {
                device,
                color,
                speed,
                brightness,
            } => self
                .with_device(&device, |d| d.send_breathe(&color, speed, brightness))
                .map(|_| Reply::Ok),
            Request::SetCycle {
                device,
                speed,
                brightness,
            } => self
                .with_device(&device, |d| d.send_cycle(speed, brightness))
                .map(|_| Reply::Ok),
            Request::Echo { text } => Ok(Reply::Echo { text }),
            Request::Quit => Ok(Reply::Ok),
        }
    }

    /// Open a device, run `operation`, always disconnect. The registry lock
    /// is held for the whole open/send/close window.
    fn with_device<F>(&self, short_name: &str, operation: F) -> Result<()>
    where
        F: FnOnce(&mut Device) -> Result<()>,
    {
        let mut registry = self.lock();
        let device = registry
            .get_device(short_name)
            .ok_or_else(|| Error::DeviceNotFound(short_name.to_string()))?;
        device.connect()?;
        let result = operation(device);
        device.disconnect();
        result
    }

    /// Load and replay the configured state file, forgivingly. Called at
    /// startup and on `LoadState`; without a configured file it is a no-op.
    fn preload_state(&self) {
        let Some(path) = self.state_file.as_deref() else {
            return;
        };
        let mut registry = self.lock();
        match registry.load_state_of_devices(path) {
            Ok(_) => {
                registry.restore_states_of_devices();
            }
            Err(error) => warn!(
                "failed to restore state from {}: {}",
                path.display(),
                error
            ),
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeviceRegistry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
