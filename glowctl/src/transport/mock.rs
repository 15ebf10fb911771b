// glowctl/src/transport/mock.rs

use crate::transport::traits::{ControlSetup, UsbBackend};
use crate::{Error, Result};

/// Mock backend for unit tests. It records control writes and interrupt
/// submissions and lets tests script presence, open failures and how many
/// polls an interrupt acknowledgement takes.
#[derive(Debug, Default)]
pub struct MockBackend {
    /// Whether `probe` reports the device as present.
    pub present: bool,
    /// Recorded control writes: (setup, payload).
    pub writes: Vec<(ControlSetup, Vec<u8>)>,
    pub open_calls: usize,
    pub close_calls: usize,
    pub opened: bool,
    /// Testing hook: make the next `open` fail with DeviceNotFound.
    pub fail_open: bool,
    /// Whether the backend claims interrupt support.
    pub interrupts: bool,
    /// Recorded interrupt submissions: (endpoint, length).
    pub interrupt_submissions: Vec<(u8, usize)>,
    /// Testing hook: number of polls before a pending interrupt completes.
    /// Values larger than the device's poll budget simulate exhaustion.
    pub polls_until_ack: usize,
    pending: bool,
    polls_left: usize,
}

impl MockBackend {
    pub fn new(present: bool) -> Self {
        Self {
            present,
            ..Self::default()
        }
    }

    pub fn with_interrupts(present: bool) -> Self {
        Self {
            present,
            interrupts: true,
            ..Self::default()
        }
    }

    /// Payloads of all recorded control writes.
    pub fn written_payloads(&self) -> Vec<Vec<u8>> {
        self.writes.iter().map(|(_, data)| data.clone()).collect()
    }
}

impl UsbBackend for MockBackend {
    fn probe(&mut self) -> Result<bool> {
        Ok(self.present)
    }

    fn open(&mut self) -> Result<()> {
        self.open_calls += 1;
        if self.fail_open || !self.present {
            return Err(Error::DeviceNotFound(String::from("mock")));
        }
        self.opened = true;
        Ok(())
    }

    fn close(&mut self) {
        self.close_calls += 1;
        self.opened = false;
    }

    fn control_write(&mut self, setup: ControlSetup, data: &[u8], _timeout_ms: u64) -> Result<()> {
        if !self.opened {
            return Err(Error::NotConnected);
        }
        self.writes.push((setup, data.to_vec()));
        Ok(())
    }

    fn supports_interrupts(&self) -> bool {
        self.interrupts
    }

    fn submit_interrupt(&mut self, endpoint: u8, length: usize) -> Result<()> {
        self.interrupt_submissions.push((endpoint, length));
        self.pending = true;
        self.polls_left = self.polls_until_ack;
        Ok(())
    }

    fn poll_interrupt(&mut self) -> bool {
        if !self.pending {
            return true;
        }
        if self.polls_left == 0 {
            self.pending = false;
            return true;
        }
        self.polls_left -= 1;
        false
    }
}
