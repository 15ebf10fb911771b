// glowctl/src/controller.rs

//! The dual-backend controller façade.
//!
//! [`Controller`] is the one interface callers program against; the backend
//! choice is made once, at construction, by picking the implementation:
//! [`LocalController`] drives the registry/device stack in-process,
//! [`RemoteController`] forwards every call to a service over IPC.

use std::collections::BTreeMap;
use std::path::Path;

use log::warn;

use crate::device::Device;
use crate::device::registry::DeviceRegistry;
use crate::ipc::client::IpcClient;
use crate::ipc::messages::{Reply, Request};
use crate::state::{self, DeviceState};
use crate::{Error, Result};

/// The operation set shared by both backends.
pub trait Controller {
    /// Present devices: short name to display name.
    fn list_devices(&mut self) -> Result<BTreeMap<String, String>>;

    /// Snapshot of every known device's state.
    fn get_state(&mut self) -> Result<BTreeMap<String, DeviceState>>;

    /// Apply an aggregate state document and replay it against hardware.
    fn set_state(&mut self, document: &str) -> Result<()>;

    fn set_color_at(&mut self, device: &str, color: &str, field: u8) -> Result<()>;

    fn set_colors(&mut self, device: &str, colors: &[String]) -> Result<()>;

    fn set_breathe(
        &mut self,
        device: &str,
        color: &str,
        speed: Option<u32>,
        brightness: Option<u8>,
    ) -> Result<()>;

    fn set_cycle(&mut self, device: &str, speed: Option<u32>, brightness: Option<u8>)
    -> Result<()>;

    /// Persist state. Local backends write `filename`; the remote service
    /// writes its own configured file and ignores the argument.
    fn save_state(&mut self, filename: Option<&Path>) -> Result<()>;

    /// Load persisted state and replay it.
    fn load_state(&mut self, filename: Option<&Path>) -> Result<()>;

    /// Stop a remote service loop. Only meaningful remotely.
    fn quit(&mut self) -> Result<()>;
}

/// Controller over local hardware.
pub struct LocalController {
    registry: DeviceRegistry,
}

impl Default for LocalController {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalController {
    pub fn new() -> Self {
        Self::with_registry(DeviceRegistry::new())
    }

    pub fn with_registry(registry: DeviceRegistry) -> Self {
        Self { registry }
    }

    /// Open a device, run `operation`, always disconnect.
    fn with_device<F>(&mut self, short_name: &str, operation: F) -> Result<()>
    where
        F: FnOnce(&mut Device) -> Result<()>,
    {
        let device = self
            .registry
            .get_device(short_name)
            .ok_or_else(|| Error::DeviceNotFound(short_name.to_string()))?;
        device.connect()?;
        let result = operation(device);
        device.disconnect();
        result
    }
}

impl Controller for LocalController {
    fn list_devices(&mut self) -> Result<BTreeMap<String, String>> {
        Ok(self
            .registry
            .find_devices()
            .into_iter()
            .map(|d| {
                (
                    d.descriptor().short_name.to_string(),
                    d.descriptor().name.to_string(),
                )
            })
            .collect())
    }

    fn get_state(&mut self) -> Result<BTreeMap<String, DeviceState>> {
        Ok(self.registry.states())
    }

    fn set_state(&mut self, document: &str) -> Result<()> {
        self.registry.apply_document(document)?;
        self.registry.restore_states_of_devices();
        Ok(())
    }

    fn set_color_at(&mut self, device: &str, color: &str, field: u8) -> Result<()> {
        self.with_device(device, |d| d.send_color(color, field))
    }

    fn set_colors(&mut self, device: &str, colors: &[String]) -> Result<()> {
        self.with_device(device, |d| d.send_colors(colors))
    }

    fn set_breathe(
        &mut self,
        device: &str,
        color: &str,
        speed: Option<u32>,
        brightness: Option<u8>,
    ) -> Result<()> {
        self.with_device(device, |d| d.send_breathe(color, speed, brightness))
    }

    fn set_cycle(
        &mut self,
        device: &str,
        speed: Option<u32>,
        brightness: Option<u8>,
    ) -> Result<()> {
        self.with_device(device, |d| d.send_cycle(speed, brightness))
    }

    fn save_state(&mut self, filename: Option<&Path>) -> Result<()> {
        let path = filename.ok_or(Error::NoStateFile)?;
        self.registry.write_state_of_devices(path)
    }

    fn load_state(&mut self, filename: Option<&Path>) -> Result<()> {
        let path = filename.ok_or(Error::NoStateFile)?;
        self.registry.load_state_of_devices(path)?;
        self.registry.restore_states_of_devices();
        Ok(())
    }

    fn quit(&mut self) -> Result<()> {
        Err(Error::UnsupportedOperation(
            "quit only applies to a remote service",
        ))
    }
}

/// Controller forwarding every operation to a glowctl service.
pub struct RemoteController {
    client: IpcClient,
}

impl RemoteController {
    /// Connect to the service socket.
    pub fn connect(socket_path: &Path) -> Result<Self> {
        Ok(Self {
            client: IpcClient::connect(socket_path)?,
        })
    }

    fn expect_ok(reply: Reply) -> Result<()> {
        match reply {
            Reply::Ok => Ok(()),
            _ => Err(Error::UnexpectedReply),
        }
    }
}

impl Controller for RemoteController {
    fn list_devices(&mut self) -> Result<BTreeMap<String, String>> {
        match self.client.call(&Request::ListDevices)? {
            Reply::Devices { devices } => Ok(devices),
            _ => Err(Error::UnexpectedReply),
        }
    }

    fn get_state(&mut self) -> Result<BTreeMap<String, DeviceState>> {
        match self.client.call(&Request::GetState)? {
            Reply::State { document } => state::parse_state_collection(&document),
            _ => Err(Error::UnexpectedReply),
        }
    }

    fn set_state(&mut self, document: &str) -> Result<()> {
        Self::expect_ok(self.client.call(&Request::SetState {
            document: document.to_string(),
        })?)
    }

    fn set_color_at(&mut self, device: &str, color: &str, field: u8) -> Result<()> {
        Self::expect_ok(self.client.call(&Request::SetColorAt {
            device: device.to_string(),
            color: color.to_string(),
            field,
        })?)
    }

    fn set_colors(&mut self, device: &str, colors: &[String]) -> Result<()> {
        Self::expect_ok(self.client.call(&Request::SetColors {
            device: device.to_string(),
            colors: colors.to_vec(),
        })?)
    }

    fn set_breathe(
        &mut self,
        device: &str,
        color: &str,
        speed: Option<u32>,
        brightness: Option<u8>,
    ) -> Result<()> {
        Self::expect_ok(self.client.call(&Request::SetBreathe {
            device: device.to_string(),
            color: color.to_string(),
            speed,
            brightness,
        })?)
    }

    fn set_cycle(
        &mut self,
        device: &str,
        speed: Option<u32>,
        brightness: Option<u8>,
    ) -> Result<()> {
        Self::expect_ok(self.client.call(&Request::SetCycle {
            device: device.to_string(),
            speed,
            brightness,
        })?)
    }

    fn save_state(&mut self, filename: Option<&Path>) -> Result<()> {
        if filename.is_some() {
            warn!("remote service writes its own state file; ignoring filename");
        }
        Self::expect_ok(self.client.call(&Request::SaveState)?)
    }

    fn load_state(&mut self, filename: Option<&Path>) -> Result<()> {
        if filename.is_some() {
            warn!("remote service reads its own state file; ignoring filename");
        }
        Self::expect_ok(self.client.call(&Request::LoadState)?)
    }

    fn quit(&mut self) -> Result<()> {
        Self::expect_ok(self.client.call(&Request::Quit)?)
    }
}
