//! Per-device lighting state and its persisted document form.
//!
//! The live state is a tagged [`Mode`] union, so "at most one of static,
//! breathing, cycling" holds structurally instead of by caller discipline.
//! For persistence and the IPC boundary the state flattens into
//! [`StateDocument`], a plain key-value record that round-trips losslessly
//! for every mode including absent values.

use std::collections::BTreeMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::types::Color;
use crate::{Error, Result};

/// The lighting mode a device was last commanded into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// No command has been sent yet (or the state was cleared).
    #[default]
    Off,
    /// Fixed color(s). `colors` is sparse: entries the caller never set stay
    /// `None`. `uniform` means the field-0 color applies to the whole device.
    Static {
        colors: Vec<Option<Color>>,
        uniform: bool,
    },
    /// Breathing animation on one color. `None` speed/brightness mean "use
    /// the device default when encoding".
    Breathing {
        color: Color,
        speed: Option<u32>,
        brightness: Option<u8>,
    },
    /// Hardware rainbow sweep; no color is stored.
    Cycling {
        speed: Option<u32>,
        brightness: Option<u8>,
    },
}

/// Mutable record of a device's last-commanded lighting mode.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceState {
    mode: Mode,
}

impl DeviceState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// Record a static color at `field`. Colors accumulate while the mode
    /// stays static (consecutive per-field sends build up the sparse list);
    /// entering static from any other mode starts a fresh list.
    pub fn set_static_color(&mut self, color: Color, field: usize) {
        let mut colors = match std::mem::take(&mut self.mode) {
            Mode::Static { colors, .. } => colors,
            _ => Vec::new(),
        };
        if colors.len() <= field {
            colors.resize(field + 1, None);
        }
        colors[field] = Some(color);
        self.mode = Mode::Static {
            colors,
            uniform: field == 0,
        };
    }

    pub fn set_breathing(&mut self, color: Color, speed: Option<u32>, brightness: Option<u8>) {
        self.mode = Mode::Breathing {
            color,
            speed,
            brightness,
        };
    }

    pub fn set_cycling(&mut self, speed: Option<u32>, brightness: Option<u8>) {
        self.mode = Mode::Cycling { speed, brightness };
    }

    /// Flatten into the persisted document form.
    pub fn to_document(&self) -> StateDocument {
        match &self.mode {
            Mode::Off => StateDocument::default(),
            Mode::Static { colors, uniform } => StateDocument {
                colors: Some(colors.iter().map(|c| c.map(|c| c.to_string())).collect()),
                colors_uniform: *uniform,
                is_static: true,
                ..StateDocument::default()
            },
            Mode::Breathing {
                color,
                speed,
                brightness,
            } => StateDocument {
                colors: Some(vec![Some(color.to_string())]),
                breathing: true,
                speed: *speed,
                brightness: *brightness,
                ..StateDocument::default()
            },
            Mode::Cycling { speed, brightness } => StateDocument {
                cycling: true,
                speed: *speed,
                brightness: *brightness,
                ..StateDocument::default()
            },
        }
    }

    /// Rebuild from a document. Flag precedence is static, breathing,
    /// cycling; a document with none set yields [`Mode::Off`].
    pub fn from_document(doc: &StateDocument) -> Result<Self> {
        let mode = if doc.is_static {
            Mode::Static {
                colors: parse_colors(&doc.colors)?,
                uniform: doc.colors_uniform,
            }
        } else if doc.breathing {
            let color = parse_colors(&doc.colors)?
                .into_iter()
                .flatten()
                .next()
                .ok_or_else(|| {
                    Error::InvalidStateDocument("breathing entry without a color".to_string())
                })?;
            Mode::Breathing {
                color,
                speed: doc.speed,
                brightness: doc.brightness,
            }
        } else if doc.cycling {
            Mode::Cycling {
                speed: doc.speed,
                brightness: doc.brightness,
            }
        } else {
            Mode::Off
        };
        Ok(Self { mode })
    }
}

fn parse_colors(raw: &Option<Vec<Option<String>>>) -> Result<Vec<Option<Color>>> {
    match raw {
        None => Ok(Vec::new()),
        Some(list) => list
            .iter()
            .map(|entry| entry.as_deref().map(Color::parse).transpose())
            .collect(),
    }
}

/// Flat key-value form of one device's state as it appears in `.gstate`
/// files and IPC payloads. Unknown top-level keys are ignored on read and
/// every field has a default, so partial documents parse.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub colors: Option<Vec<Option<String>>>,
    #[serde(default)]
    pub colors_uniform: bool,
    #[serde(rename = "static", default)]
    pub is_static: bool,
    #[serde(default)]
    pub breathing: bool,
    #[serde(default)]
    pub cycling: bool,
    #[serde(default)]
    pub brightness: Option<u8>,
    #[serde(default)]
    pub speed: Option<u32>,
}

/// Parse an aggregate `{short_name -> document}` JSON text into device
/// states. Per-device decode failures are logged and skipped so one corrupt
/// block cannot poison the rest of the collection.
pub fn parse_state_collection(text: &str) -> Result<BTreeMap<String, DeviceState>> {
    let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(text)?;
    let mut states = BTreeMap::new();
    for (name, value) in raw {
        let parsed = serde_json::from_value::<StateDocument>(value)
            .map_err(Error::from)
            .and_then(|doc| DeviceState::from_document(&doc));
        match parsed {
            Ok(state) => {
                states.insert(name, state);
            }
            Err(error) => warn!("could not load state of device '{}': {}", name, error),
        }
    }
    Ok(states)
}
