// glowctl/src/constants.rs
//! Common protocol constants used across the crate

use std::time::Duration;

/// HID class request SET_REPORT, carried in `bRequest`
pub const HID_REQ_SET_REPORT: u8 = 0x09;

/// `bmRequestType` for host-to-interface class requests (OUT | CLASS | INTERFACE)
pub const HID_REQUEST_TYPE_OUT: u8 = 0x21;

/// `wValue` selecting the 0x11-prefixed output report the G-series firmware
/// expects lighting commands on
pub const HID_REPORT_W_VALUE: u16 = 0x0211;

/// Timeout for a single control transfer in milliseconds
pub const CONTROL_TIMEOUT_MS: u64 = 1000;

/// Upper bound on poll iterations while waiting for an interrupt
/// acknowledgement. Exhausting the budget is a silent, non-fatal outcome.
pub const MAX_INTERRUPT_POLLS: usize = 50;

/// Bytes to request from the interrupt endpoint per acknowledgement read
pub const INTERRUPT_READ_LENGTH: usize = 20;

/// Settle delay after each control write; the hardware drops reports that
/// arrive back to back
pub const SETTLE_DELAY: Duration = Duration::from_millis(10);
