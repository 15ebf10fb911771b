// glowctl/src/transport/usb.rs

#![cfg(feature = "usb")]

use std::time::Duration;

use log::{debug, warn};

use rusb::UsbContext;
use rusb::{Context, DeviceHandle};

use crate::transport::traits::{ControlSetup, UsbBackend};
use crate::{Error, Result};

/// How long each poll of a pending interrupt read blocks. The bounded wait
/// loop multiplies this by [`crate::constants::MAX_INTERRUPT_POLLS`].
const INTERRUPT_POLL_TIMEOUT_MS: u64 = 1;

/// rusb-based backend for one vendor/product identity. It is feature-gated
/// behind `--features usb` and requires the `rusb` crate.
///
/// The handle is opened on `open` and dropped on `close`; if the kernel HID
/// driver owned the interface it is detached for the session and reattached
/// on close so special keys keep working afterwards. Reattachment is
/// attempted even when the interface release fails.
pub struct RusbBackend {
    context: Context,
    vendor_id: u16,
    product_id: u16,
    interface: u8,
    handle: Option<DeviceHandle<Context>>,
    detached: bool,
    pending: Option<(u8, usize)>,
}

impl RusbBackend {
    pub fn new(vendor_id: u16, product_id: u16, interface: u8) -> Result<Self> {
        Ok(Self {
            context: Context::new()?,
            vendor_id,
            product_id,
            interface,
            handle: None,
            detached: false,
            pending: None,
        })
    }

    fn find_device(&self) -> Result<Option<rusb::Device<Context>>> {
        for device in self.context.devices()?.iter() {
            let dd = device.device_descriptor()?;
            if dd.vendor_id() == self.vendor_id && dd.product_id() == self.product_id {
                return Ok(Some(device));
            }
        }
        Ok(None)
    }

    fn identity(&self) -> String {
        format!("{:04x}:{:04x}", self.vendor_id, self.product_id)
    }
}

impl UsbBackend for RusbBackend {
    fn probe(&mut self) -> Result<bool> {
        Ok(self.find_device()?.is_some())
    }

    fn open(&mut self) -> Result<()> {
        let device = self
            .find_device()?
            .ok_or_else(|| Error::DeviceNotFound(self.identity()))?;
        let mut handle = device.open()?;

        // The kernel HID driver usually owns the G-series vendor interface;
        // no report reaches the device until it is detached.
        let iface = self.interface;
        if matches!(handle.kernel_driver_active(iface), Ok(true)) {
            debug!("detaching kernel driver from interface {}", iface);
            handle.detach_kernel_driver(iface)?;
            self.detached = true;
        } else {
            debug!("kernel driver not active on interface {}", iface);
            self.detached = false;
        }

        handle.claim_interface(iface)?;
        self.handle = Some(handle);
        Ok(())
    }

    fn close(&mut self) {
        self.pending = None;
        let Some(mut handle) = self.handle.take() else {
            return;
        };
        if let Err(error) = handle.release_interface(self.interface) {
            warn!(
                "failed to release interface {}: {}",
                self.interface, error
            );
        }
        // Reattach regardless of the release outcome; leaving the interface
        // unbound disables the device's special keys until replug.
        if self.detached {
            debug!("reattaching kernel driver to interface {}", self.interface);
            if let Err(error) = handle.attach_kernel_driver(self.interface) {
                warn!(
                    "failed to reattach kernel driver to interface {}: {}",
                    self.interface, error
                );
            }
            self.detached = false;
        }
    }

    fn control_write(&mut self, setup: ControlSetup, data: &[u8], timeout_ms: u64) -> Result<()> {
        let handle = self.handle.as_ref().ok_or(Error::NotConnected)?;
        handle.write_control(
            setup.request_type,
            setup.request,
            setup.value,
            setup.index,
            data,
            Duration::from_millis(timeout_ms),
        )?;
        Ok(())
    }

    fn supports_interrupts(&self) -> bool {
        true
    }

    fn submit_interrupt(&mut self, endpoint: u8, length: usize) -> Result<()> {
        self.pending = Some((endpoint, length));
        Ok(())
    }

    fn poll_interrupt(&mut self) -> bool {
        let Some((endpoint, length)) = self.pending else {
            return true;
        };
        let Some(handle) = self.handle.as_ref() else {
            self.pending = None;
            return true;
        };
        let mut buf = vec![0u8; length];
        match handle.read_interrupt(
            endpoint,
            &mut buf,
            Duration::from_millis(INTERRUPT_POLL_TIMEOUT_MS),
        ) {
            Ok(n) => {
                debug!("interrupt acknowledgement ({} bytes)", n);
                self.pending = None;
                true
            }
            Err(rusb::Error::Timeout) => false,
            Err(error) => {
                // Treat any other read failure as a missed acknowledgement;
                // the send protocol tolerates that.
                debug!("interrupt read failed: {}", error);
                self.pending = None;
                true
            }
        }
    }
}
