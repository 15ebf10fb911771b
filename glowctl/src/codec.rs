//! Fixed-width hex token codec for device command values.
//!
//! The hardware accepts only fixed-width hex fields, so every domain value
//! (color, speed, brightness, field index) is rendered through a [`ValueSpec`]
//! describing its output width and numeric range. Out-of-range values clamp
//! rather than error; "too fast" silently becomes "fastest". Absent values
//! substitute the spec default.

use crate::types::Color;
use crate::{Error, Result};

/// Immutable description of one encodable value: output width in hex digits,
/// inclusive range and the default used when the caller passes `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueSpec {
    pub width: usize,
    pub min: u32,
    pub max: u32,
    pub default: u32,
}

impl ValueSpec {
    pub const fn new(width: usize, min: u32, max: u32, default: u32) -> Self {
        Self {
            width,
            min,
            max,
            default,
        }
    }

    /// Clamp a value into the spec range.
    pub fn clamp(&self, value: u32) -> u32 {
        value.max(self.min).min(self.max)
    }

    /// Render a numeric value (or the default when absent) as a fixed-width
    /// lowercase hex token.
    pub fn format(&self, value: Option<u32>) -> String {
        let value = self.clamp(value.unwrap_or(self.default));
        format!("{:0width$x}", value, width = self.width)
    }

    /// Render a color (or the default when absent) as a hex token. Colors are
    /// validated where they enter the system ([`Color::parse`]); this only
    /// clamps and defaults.
    pub fn format_color(&self, color: Option<Color>) -> String {
        self.format(color.map(|c| c.value()))
    }
}

/// Decode a hex command string into the raw bytes sent over the wire.
///
/// Command templates are static and the spliced tokens come from
/// [`ValueSpec::format`], so a failure here means a malformed template.
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    if hex.len() % 2 != 0 {
        return Err(Error::InvalidCommand(hex.to_string()));
    }
    (0..hex.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| Error::InvalidCommand(hex.to_string()))
        })
        .collect()
}
