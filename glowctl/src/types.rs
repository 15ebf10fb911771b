// glowctl/src/types.rs

use crate::{Error, Result};
use derive_more::Display;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 24-bit RGB color - Newtype Pattern
///
/// Always rendered as six lowercase hex digits (`"ff0080"`), the form the
/// hardware command templates and the persisted state document use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{:06x}", _0)]
pub struct Color(u32);

impl Color {
    /// Wrap a raw RGB value, masking it to 24 bits.
    pub const fn new(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    /// Parse a color from exactly six hex digits (case-insensitive).
    pub fn parse(s: &str) -> Result<Self> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(s.to_string()));
        }
        let value =
            u32::from_str_radix(s, 16).map_err(|_| Error::InvalidColor(s.to_string()))?;
        Ok(Self(value))
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::parse(&s).map_err(D::Error::custom)
    }
}

/// DeviceKind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DeviceKind {
    #[display(fmt = "g203")]
    G203,
    #[display(fmt = "g213")]
    G213,
}

impl DeviceKind {
    pub fn from_product_id(pid: u16) -> Option<Self> {
        match pid {
            0xc084 => Some(Self::G203),
            0xc336 => Some(Self::G213),
            _ => None,
        }
    }
}
