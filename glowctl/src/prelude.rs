// glowctl/src/prelude.rs

pub use crate::codec::ValueSpec;
pub use crate::controller::{Controller, LocalController, RemoteController};
pub use crate::device::registry::DeviceRegistry;
pub use crate::device::{Descriptor, Device, Templates};
pub use crate::ipc::{GlowService, IpcClient};
pub use crate::state::{DeviceState, Mode, StateDocument};
pub use crate::{Color, DeviceKind, Error, Result};
