// glowctl/src/transport/mod.rs

pub mod mock;
pub mod traits;
#[cfg(feature = "usb")]
pub mod usb;

pub use mock::MockBackend;
pub use traits::{ControlSetup, UsbBackend};
#[cfg(feature = "usb")]
pub use usb::RusbBackend;
