//! Logitech G213 Prodigy keyboard.

use crate::codec::ValueSpec;
use crate::constants::{
    HID_REPORT_W_VALUE, HID_REQ_SET_REPORT, HID_REQUEST_TYPE_OUT, INTERRUPT_READ_LENGTH,
    SETTLE_DELAY,
};
use crate::device::{Descriptor, Templates};
use crate::types::DeviceKind;

/// Six addressable key zones besides the uniform field 0.
const MAX_COLOR_FIELDS: u8 = 6;

pub fn descriptor() -> Descriptor {
    Descriptor {
        kind: DeviceKind::G213,
        short_name: "g213",
        name: "G213 Keyboard",
        vendor_id: 0x046d,
        product_id: 0xc336,
        interface: 0x01,
        interrupt_endpoint: Some(0x82),
        request_type: HID_REQUEST_TYPE_OUT,
        request: HID_REQ_SET_REPORT,
        w_value: HID_REPORT_W_VALUE,
        max_color_fields: MAX_COLOR_FIELDS,
        can_breathe: true,
        can_cycle: true,
        settle_after_prepare: SETTLE_DELAY,
        settle_after_command: SETTLE_DELAY,
        interrupt_length: INTERRUPT_READ_LENGTH,
        field_spec: ValueSpec::new(2, 0, MAX_COLOR_FIELDS as u32, 0),
        color_spec: ValueSpec::new(6, 0x000000, 0xffffff, 0xffffff),
        speed_spec: ValueSpec::new(4, 0x03e8, 0x4e20, 0x2af8),
        bright_spec: ValueSpec::new(2, 0x01, 0x64, 0x64),
        templates: Templates {
            prepare: Some("11ff0c0a00000000000000000000000000000000"),
            // 11ff0c3a{field}01{color}02 + zero padding
            color: ["11ff0c3a", "01", "0200000000000000000000"],
            // 11ff0c3a0002{color}{speed}00{bright} + zero padding
            breathe: ["11ff0c3a0002", "", "00", "00000000000000"],
            // 11ff0c3a0003ffffff0000{speed}{bright} + zero padding
            cycle: ["11ff0c3a0003ffffff0000", "", "000000000000"],
        },
    }
}
