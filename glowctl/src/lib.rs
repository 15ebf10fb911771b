// glowctl/src/lib.rs

//! glowctl
//!
//! Controls RGB lighting on Logitech G-series USB peripherals, either
//! directly over USB or through a service process reached via IPC.

pub mod codec;
pub mod constants;
pub mod controller;
pub mod device;
pub mod error;
pub mod ipc;
pub mod prelude;
pub mod state;
pub mod test_support;
pub mod transport;
pub mod types;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the newtypes in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
