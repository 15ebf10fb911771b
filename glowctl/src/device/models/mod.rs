// glowctl/src/device/models/mod.rs

//! The fixed catalog of supported hardware models.

use crate::device::Descriptor;
use crate::types::DeviceKind;

mod g203;
mod g213;

/// Descriptor for a specific model.
pub fn descriptor_for(kind: DeviceKind) -> Descriptor {
    match kind {
        DeviceKind::G203 => g203::descriptor(),
        DeviceKind::G213 => g213::descriptor(),
    }
}

/// All known descriptors, in catalog order.
pub fn known_descriptors() -> Vec<Descriptor> {
    vec![g203::descriptor(), g213::descriptor()]
}
