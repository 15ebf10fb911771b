// glowctl/src/ipc/messages.rs

//! Request/reply messages exchanged between a controller and the service.
//!
//! Optional numeric parameters cross the boundary as native `Option` values;
//! the receiving side resolves `None` to the device defaults before encoding
//! the hardware command. Colors travel as six-hex-digit strings, state
//! collections as the encoded JSON document so heterogeneous and absent
//! fields round-trip losslessly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Operations a remote controller can invoke on the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    /// Map of present devices: short name to display name.
    ListDevices,
    /// Reload state from the service's own state file and replay it.
    LoadState,
    /// Save state to the service's own state file.
    SaveState,
    /// Full state collection as an encoded document.
    GetState,
    /// Apply a state collection and replay it.
    SetState { document: String },
    SetColorAt {
        device: String,
        color: String,
        field: u8,
    },
    SetColors {
        device: String,
        colors: Vec<String>,
    },
    SetBreathe {
        device: String,
        color: String,
        speed: Option<u32>,
        brightness: Option<u8>,
    },
    SetCycle {
        device: String,
        speed: Option<u32>,
        brightness: Option<u8>,
    },
    /// Liveness probe; echoed back unchanged.
    Echo { text: String },
    /// Stop the service loop.
    Quit,
}

/// Service replies. Failures travel as [`Reply::Error`] so one bad request
/// never tears down the connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Reply {
    Ok,
    Devices { devices: BTreeMap<String, String> },
    State { document: String },
    Echo { text: String },
    Error { message: String },
}
