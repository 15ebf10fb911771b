// glowctl/src/device/registry.rs

//! Enumerates the known devices and persists their aggregate state.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::warn;

use crate::device::{Device, models};
use crate::state::{DeviceState, StateDocument};
use crate::{Error, Result};

/// Required suffix for state files.
pub const STATE_FILE_EXTENSION: &str = ".gstate";

/// A per-device failure captured during a bulk load/restore pass.
#[derive(Debug)]
pub struct RestoreFailure {
    pub device: String,
    pub error: Error,
}

/// Owns the fixed list of known devices. The list is stable identity: state
/// accumulated through commands lives on the same [`Device`] instance every
/// time it is looked up, so it can be queried and persisted afterwards.
pub struct DeviceRegistry {
    known: Vec<Device>,
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self {
            known: models::known_descriptors()
                .into_iter()
                .map(Device::new)
                .collect(),
        }
    }

    /// Build a registry over an explicit device list (tests inject devices
    /// with mock backends here).
    pub fn with_devices(known: Vec<Device>) -> Self {
        Self { known }
    }

    pub fn known_devices(&self) -> &[Device] {
        &self.known
    }

    /// Known devices that are physically present, in catalog order.
    pub fn find_devices(&mut self) -> Vec<&mut Device> {
        self.known
            .iter_mut()
            .filter_map(|device| if device.exists() { Some(device) } else { None })
            .collect()
    }

    /// Present device matching `short_name`, if any.
    pub fn get_device(&mut self, short_name: &str) -> Option<&mut Device> {
        let device = self
            .known
            .iter_mut()
            .find(|d| d.descriptor().short_name == short_name)?;
        if device.exists() { Some(device) } else { None }
    }

    /// Lookup against the full catalog regardless of presence; used to read
    /// capability metadata for devices that are not plugged in.
    pub fn get_known_device(&mut self, short_name: &str) -> Option<&mut Device> {
        self.known
            .iter_mut()
            .find(|d| d.descriptor().short_name == short_name)
    }

    /// Snapshot of every known device's state.
    pub fn states(&self) -> BTreeMap<String, DeviceState> {
        self.known
            .iter()
            .map(|d| (d.descriptor().short_name.to_string(), d.state().clone()))
            .collect()
    }

    /// Aggregate `{short_name -> document}` state as pretty-printed JSON.
    pub fn state_document(&self) -> Result<String> {
        let mut documents = BTreeMap::new();
        for device in &self.known {
            documents.insert(device.descriptor().short_name, device.state().to_document());
        }
        Ok(serde_json::to_string_pretty(&documents)?)
    }

    /// Apply an aggregate state document. State for unknown device names is
    /// ignored; a corrupt per-device block is recorded and skipped rather
    /// than aborting the whole load.
    pub fn apply_document(&mut self, text: &str) -> Result<Vec<RestoreFailure>> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(text)?;
        let mut failures = Vec::new();
        for device in &mut self.known {
            let name = device.descriptor().short_name;
            let Some(value) = raw.get(name) else {
                continue;
            };
            let applied = serde_json::from_value::<StateDocument>(value.clone())
                .map_err(Error::from)
                .and_then(|doc| DeviceState::from_document(&doc));
            match applied {
                Ok(state) => device.set_state(state),
                Err(error) => {
                    warn!("could not load state of device '{}': {}", name, error);
                    failures.push(RestoreFailure {
                        device: name.to_string(),
                        error,
                    });
                }
            }
        }
        Ok(failures)
    }

    /// Load the aggregate state from a file.
    pub fn load_state_of_devices(&mut self, path: &Path) -> Result<Vec<RestoreFailure>> {
        let text = fs::read_to_string(path)?;
        self.apply_document(&text)
    }

    /// Write the aggregate state to a file. The filename must carry the
    /// `.gstate` suffix.
    pub fn write_state_of_devices(&self, path: &Path) -> Result<()> {
        let name = path.to_string_lossy();
        if !name.ends_with(STATE_FILE_EXTENSION) {
            return Err(Error::InvalidStateFilename(name.into_owned()));
        }
        fs::write(path, self.state_document()?)?;
        Ok(())
    }

    /// Replay every known device's recorded state against the hardware.
    /// Per-device failures are captured and reported; the loop never aborts.
    pub fn restore_states_of_devices(&mut self) -> Vec<RestoreFailure> {
        let mut failures = Vec::new();
        for device in &mut self.known {
            if let Err(error) = device.restore_state() {
                let name = device.descriptor().short_name;
                warn!("could not restore state of device '{}': {}", name, error);
                failures.push(RestoreFailure {
                    device: name.to_string(),
                    error,
                });
            }
        }
        failures
    }
}
