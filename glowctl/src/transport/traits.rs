// glowctl/src/transport/traits.rs

use crate::Result;

/// Setup packet fields for a vendor/class control write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlSetup {
    pub request_type: u8,
    pub request: u8,
    pub value: u16,
    pub index: u16,
}

/// UsbBackend abstracts raw device access away from descriptor/command logic.
///
/// An implementation owns the device handle and the "detached" bookkeeping
/// (whether the kernel driver was unbound to permit raw access). The claimed
/// interface must be released and, if detached, the kernel driver reattached
/// on every `close` path, including after errors. Backends are `Send` so a
/// registry can live inside a service thread.
pub trait UsbBackend: Send {
    /// Check whether a matching device is present on the bus.
    fn probe(&mut self) -> Result<bool>;

    /// Open the device: acquire the handle, detach the kernel driver from the
    /// target interface if it is bound, claim the interface.
    fn open(&mut self) -> Result<()>;

    /// Tear everything down, best effort. Release/reattach failures are
    /// logged and swallowed so the caller's cleanup path always completes.
    fn close(&mut self);

    /// Perform a control transfer write with the given setup packet.
    fn control_write(&mut self, setup: ControlSetup, data: &[u8], timeout_ms: u64) -> Result<()>;

    /// Whether this backend can service interrupt reads. Backends without
    /// interrupt support fall through the default no-op wait hooks.
    fn supports_interrupts(&self) -> bool {
        false
    }

    /// Queue an interrupt read on `endpoint`. The read is serviced by
    /// subsequent [`UsbBackend::poll_interrupt`] calls.
    fn submit_interrupt(&mut self, _endpoint: u8, _length: usize) -> Result<()> {
        Ok(())
    }

    /// Pump the pending interrupt read once. Returns true when the read has
    /// completed (or nothing is pending), false while it is still in flight.
    fn poll_interrupt(&mut self) -> bool {
        true
    }
}
