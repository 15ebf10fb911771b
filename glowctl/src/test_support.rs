//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize mock-backend setup so tests across the crate and
//! the tests/ directory can share the same wiring.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::codec::ValueSpec;
use crate::device::{Descriptor, Device, Templates};
use crate::transport::traits::{ControlSetup, UsbBackend};
use crate::transport::MockBackend;
use crate::types::DeviceKind;
use crate::Result;

/// Backend wrapper that delegates into a shared [`MockBackend`], so a test
/// can keep inspecting the mock after a [`Device`] has taken ownership of
/// the backend box.
#[doc(hidden)]
pub struct SharedBackend {
    inner: Arc<Mutex<MockBackend>>,
}

impl SharedBackend {
    pub fn new(inner: Arc<Mutex<MockBackend>>) -> Self {
        Self { inner }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockBackend> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl UsbBackend for SharedBackend {
    fn probe(&mut self) -> Result<bool> {
        self.lock().probe()
    }

    fn open(&mut self) -> Result<()> {
        self.lock().open()
    }

    fn close(&mut self) {
        self.lock().close()
    }

    fn control_write(&mut self, setup: ControlSetup, data: &[u8], timeout_ms: u64) -> Result<()> {
        self.lock().control_write(setup, data, timeout_ms)
    }

    fn supports_interrupts(&self) -> bool {
        self.lock().supports_interrupts()
    }

    fn submit_interrupt(&mut self, endpoint: u8, length: usize) -> Result<()> {
        self.lock().submit_interrupt(endpoint, length)
    }

    fn poll_interrupt(&mut self) -> bool {
        self.lock().poll_interrupt()
    }
}

/// A synthetic descriptor with G213-shaped templates, six color fields and
/// both effects, but no prepare command and no settle delays so tests stay
/// fast and byte assertions stay simple.
#[doc(hidden)]
pub fn test_descriptor() -> Descriptor {
    Descriptor {
        kind: DeviceKind::G213,
        short_name: "test",
        name: "Test Keyboard",
        vendor_id: 0x046d,
        product_id: 0xffff,
        interface: 0x01,
        interrupt_endpoint: Some(0x82),
        request_type: 0x21,
        request: 0x09,
        w_value: 0x0211,
        max_color_fields: 6,
        can_breathe: true,
        can_cycle: true,
        settle_after_prepare: Duration::ZERO,
        settle_after_command: Duration::ZERO,
        interrupt_length: 20,
        field_spec: ValueSpec::new(2, 0, 6, 0),
        color_spec: ValueSpec::new(6, 0x000000, 0xffffff, 0xffffff),
        speed_spec: ValueSpec::new(4, 0x03e8, 0x4e20, 0x2af8),
        bright_spec: ValueSpec::new(2, 0x01, 0x64, 0x64),
        templates: Templates {
            prepare: None,
            color: ["11ff0c3a", "01", "0200000000000000000000"],
            breathe: ["11ff0c3a0002", "", "00", "00000000000000"],
            cycle: ["11ff0c3a0003ffffff0000", "", "000000000000"],
        },
    }
}

/// Build a [`Device`] over a shared mock backend and hand back both the
/// shared handle (for assertions) and the device.
#[doc(hidden)]
pub fn device_with_shared_mock(
    descriptor: Descriptor,
    present: bool,
) -> (Arc<Mutex<MockBackend>>, Device) {
    let mock = Arc::new(Mutex::new(MockBackend::new(present)));
    let device = Device::with_backend(descriptor, Box::new(SharedBackend::new(mock.clone())));
    (mock, device)
}
