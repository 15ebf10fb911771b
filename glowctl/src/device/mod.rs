// glowctl/src/device/mod.rs

//! Device descriptors and the command send protocol.
//!
//! A [`Descriptor`] is the static identity/capability/template record for
//! one hardware model; a [`Device`] pairs it with the mutable
//! [`DeviceState`] and a lazily-constructed transport backend. Commands are
//! built as hex strings from per-model [`Templates`] with codec tokens
//! spliced in, then decoded to bytes and written as HID SET_REPORT control
//! transfers framed by the interrupt handshake the firmware expects.

pub mod models;
pub mod registry;

use std::thread;
use std::time::Duration;

use log::debug;

use crate::codec::{self, ValueSpec};
use crate::constants::{CONTROL_TIMEOUT_MS, MAX_INTERRUPT_POLLS};
use crate::state::{DeviceState, Mode};
use crate::transport::{ControlSetup, UsbBackend};
use crate::types::{Color, DeviceKind};
use crate::{Error, Result};

/// Per-model command templates in hex form. Tokens are spliced between the
/// fixed parts; the result decodes to the exact report the firmware expects,
/// zero padding included.
#[derive(Debug, Clone)]
pub struct Templates {
    /// Priming sequence sent before every real command, when the model
    /// requires one to arm its report handler.
    pub prepare: Option<&'static str>,
    /// Color-at-field command: `parts[0] + field + parts[1] + color + parts[2]`.
    pub color: [&'static str; 3],
    /// Breathe command: `parts[0] + color + parts[1] + speed + parts[2] + brightness + parts[3]`.
    pub breathe: [&'static str; 4],
    /// Cycle command: `parts[0] + speed + parts[1] + brightness + parts[2]`.
    pub cycle: [&'static str; 3],
}

impl Templates {
    pub fn color_command(&self, field: &str, color: &str) -> String {
        let [a, b, c] = self.color;
        format!("{a}{field}{b}{color}{c}")
    }

    pub fn breathe_command(&self, color: &str, speed: &str, brightness: &str) -> String {
        let [a, b, c, d] = self.breathe;
        format!("{a}{color}{b}{speed}{c}{brightness}{d}")
    }

    pub fn cycle_command(&self, speed: &str, brightness: &str) -> String {
        let [a, b, c] = self.cycle;
        format!("{a}{speed}{b}{brightness}{c}")
    }
}

/// Static identity, capabilities, timings and value specs for one model.
#[derive(Debug, Clone)]
pub struct Descriptor {
    pub kind: DeviceKind,
    pub short_name: &'static str,
    pub name: &'static str,
    pub vendor_id: u16,
    pub product_id: u16,
    /// Interface carrying the vendor HID collection (`wIndex`).
    pub interface: u8,
    /// Interrupt IN endpoint used for command acknowledgements.
    pub interrupt_endpoint: Option<u8>,
    pub request_type: u8,
    pub request: u8,
    pub w_value: u16,
    /// Number of addressable color fields beyond the uniform field 0.
    pub max_color_fields: u8,
    pub can_breathe: bool,
    pub can_cycle: bool,
    pub settle_after_prepare: Duration,
    pub settle_after_command: Duration,
    pub interrupt_length: usize,
    pub field_spec: ValueSpec,
    pub color_spec: ValueSpec,
    pub speed_spec: ValueSpec,
    pub bright_spec: ValueSpec,
    pub templates: Templates,
}

impl Descriptor {
    /// Setup packet for this model's lighting reports.
    pub fn control_setup(&self) -> ControlSetup {
        ControlSetup {
            request_type: self.request_type,
            request: self.request,
            value: self.w_value,
            index: self.interface as u16,
        }
    }
}

/// One known device: descriptor plus commanded state plus (once used) its
/// transport backend. The backend is constructed lazily on first access so
/// a registry can be built without touching the bus.
pub struct Device {
    descriptor: Descriptor,
    state: DeviceState,
    backend: Option<Box<dyn UsbBackend>>,
}

#[cfg(feature = "usb")]
fn default_backend(descriptor: &Descriptor) -> Result<Box<dyn UsbBackend>> {
    Ok(Box::new(crate::transport::RusbBackend::new(
        descriptor.vendor_id,
        descriptor.product_id,
        descriptor.interface,
    )?))
}

#[cfg(not(feature = "usb"))]
fn default_backend(_descriptor: &Descriptor) -> Result<Box<dyn UsbBackend>> {
    Err(Error::BackendUnavailable)
}

impl Device {
    pub fn new(descriptor: Descriptor) -> Self {
        Self {
            descriptor,
            state: DeviceState::new(),
            backend: None,
        }
    }

    /// Create a Device with an existing backend instance. This is primarily
    /// intended for tests where a MockBackend is provided.
    pub fn with_backend(descriptor: Descriptor, backend: Box<dyn UsbBackend>) -> Self {
        Self {
            descriptor,
            state: DeviceState::new(),
            backend: Some(backend),
        }
    }

    pub fn descriptor(&self) -> &Descriptor {
        &self.descriptor
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    /// Replace the recorded state, e.g. when applying a loaded document.
    pub fn set_state(&mut self, state: DeviceState) {
        self.state = state;
    }

    fn backend_mut(&mut self) -> Result<&mut (dyn UsbBackend + 'static)> {
        if self.backend.is_none() {
            self.backend = Some(default_backend(&self.descriptor)?);
        }
        self.backend.as_deref_mut().ok_or(Error::BackendUnavailable)
    }

    /// Whether a matching device is currently present on the bus.
    pub fn exists(&mut self) -> bool {
        match self.backend_mut() {
            Ok(backend) => backend.probe().unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Open the device and claim its vendor interface.
    pub fn connect(&mut self) -> Result<()> {
        let short_name = self.descriptor.short_name;
        self.backend_mut()?.open().map_err(|error| match error {
            Error::DeviceNotFound(_) => Error::DeviceNotFound(short_name.to_string()),
            other => other,
        })
    }

    /// Release the interface and hand the device back to the kernel driver.
    /// Best effort: teardown failures are logged inside the backend and never
    /// propagate, so callers can always finish their cleanup.
    pub fn disconnect(&mut self) {
        if let Some(backend) = self.backend.as_deref_mut() {
            backend.close();
        }
    }

    /// Set a single color at a field slot. Field 0 means "whole device".
    pub fn send_color(&mut self, color: &str, field: u8) -> Result<()> {
        let color = Color::parse(color)?;
        debug!(
            "{}: set color {} at field {}",
            self.descriptor.short_name, color, field
        );
        let command = self.descriptor.templates.color_command(
            &self.descriptor.field_spec.format(Some(u32::from(field))),
            &self.descriptor.color_spec.format_color(Some(color)),
        );
        self.transmit(&command)?;
        self.state.set_static_color(color, usize::from(field));
        Ok(())
    }

    /// Set one color per field. Zero colors fall back to uniform white, one
    /// color applies uniformly, several colors go to fields 1.. in order
    /// (field 0 is reserved for the uniform case). Colors beyond the device's
    /// field capacity are silently dropped.
    pub fn send_colors(&mut self, colors: &[String]) -> Result<()> {
        if colors.len() <= 1 {
            let color = colors.first().map(String::as_str).unwrap_or("ffffff");
            return self.send_color(color, 0);
        }
        let count = colors.len().min(usize::from(self.descriptor.max_color_fields));
        for (i, color) in colors.iter().take(count).enumerate() {
            self.send_color(color, (i + 1) as u8)?;
        }
        Ok(())
    }

    /// Start the breathing animation. Brightness defaults to the spec
    /// maximum; speed left absent encodes as the device default.
    pub fn send_breathe(
        &mut self,
        color: &str,
        speed: Option<u32>,
        brightness: Option<u8>,
    ) -> Result<()> {
        if !self.descriptor.can_breathe {
            return Err(Error::UnsupportedEffect("breathe"));
        }
        let color = Color::parse(color)?;
        let brightness = brightness.or(Some(self.descriptor.bright_spec.max as u8));
        debug!(
            "{}: breathe {} speed {:?} brightness {:?}",
            self.descriptor.short_name, color, speed, brightness
        );
        let command = self.descriptor.templates.breathe_command(
            &self.descriptor.color_spec.format_color(Some(color)),
            &self.descriptor.speed_spec.format(speed),
            &self.descriptor.bright_spec.format(brightness.map(u32::from)),
        );
        self.transmit(&command)?;
        self.state.set_breathing(color, speed, brightness);
        Ok(())
    }

    /// Start the hardware rainbow cycle.
    pub fn send_cycle(&mut self, speed: Option<u32>, brightness: Option<u8>) -> Result<()> {
        if !self.descriptor.can_cycle {
            return Err(Error::UnsupportedEffect("cycle"));
        }
        let brightness = brightness.or(Some(self.descriptor.bright_spec.max as u8));
        debug!(
            "{}: cycle speed {:?} brightness {:?}",
            self.descriptor.short_name, speed, brightness
        );
        let command = self.descriptor.templates.cycle_command(
            &self.descriptor.speed_spec.format(speed),
            &self.descriptor.bright_spec.format(brightness.map(u32::from)),
        );
        self.transmit(&command)?;
        self.state.set_cycling(speed, brightness);
        Ok(())
    }

    /// Replay the recorded state against the hardware, if the device is
    /// currently plugged in. The device is disconnected afterwards even when
    /// a resend fails.
    pub fn restore_state(&mut self) -> Result<()> {
        if !self.exists() {
            return Ok(());
        }
        match self.state.mode().clone() {
            Mode::Off => Ok(()),
            Mode::Static { colors, uniform } => {
                if colors.is_empty() {
                    return Ok(());
                }
                self.connect()?;
                let result: Result<()> = (|| {
                    if uniform {
                        if let Some(Some(color)) = colors.first() {
                            self.send_color(&color.to_string(), 0)?;
                        }
                    } else {
                        for (field, color) in colors.iter().enumerate() {
                            if let Some(color) = color {
                                self.send_color(&color.to_string(), field as u8)?;
                            }
                        }
                    }
                    Ok(())
                })();
                self.disconnect();
                result
            }
            Mode::Breathing {
                color,
                speed,
                brightness,
            } => {
                self.connect()?;
                let result = self.send_breathe(&color.to_string(), speed, brightness);
                self.disconnect();
                result
            }
            Mode::Cycling { speed, brightness } => {
                self.connect()?;
                let result = self.send_cycle(speed, brightness);
                self.disconnect();
                result
            }
        }
    }

    /// The send protocol shared by every command: optional prepare stage,
    /// then the real command, each framed by an interrupt wait and followed
    /// by the model's settle delay.
    fn transmit(&mut self, command: &str) -> Result<()> {
        if let Some(prepare) = self.descriptor.templates.prepare {
            self.write_stage(prepare, self.descriptor.settle_after_prepare)?;
        }
        self.write_stage(command, self.descriptor.settle_after_command)
    }

    fn write_stage(&mut self, hex: &str, settle: Duration) -> Result<()> {
        let bytes = codec::hex_to_bytes(hex)?;
        let setup = self.descriptor.control_setup();
        self.begin_interrupt()?;
        self.backend_mut()?
            .control_write(setup, &bytes, CONTROL_TIMEOUT_MS)?;
        thread::sleep(settle);
        self.end_interrupt();
        Ok(())
    }

    fn begin_interrupt(&mut self) -> Result<()> {
        let Some(endpoint) = self.descriptor.interrupt_endpoint else {
            return Ok(());
        };
        let length = self.descriptor.interrupt_length;
        let backend = self.backend_mut()?;
        if backend.supports_interrupts() {
            backend.submit_interrupt(endpoint, length)?;
        }
        Ok(())
    }

    /// Bounded busy-wait for the interrupt acknowledgement. Exhausting the
    /// budget is not an error; the command may simply overlap the previous
    /// acknowledgement.
    fn end_interrupt(&mut self) {
        let short_name = self.descriptor.short_name;
        let Ok(backend) = self.backend_mut() else {
            return;
        };
        if !backend.supports_interrupts() {
            return;
        }
        for _ in 0..MAX_INTERRUPT_POLLS {
            if backend.poll_interrupt() {
                return;
            }
        }
        debug!("{}: no interrupt acknowledgement in time", short_name);
    }
}
