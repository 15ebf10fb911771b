// fixtures.rs - commonly used test documents and payloads

use glowctl::state::{DeviceState, StateDocument};
use glowctl::types::Color;

pub fn color(s: &str) -> Color {
    Color::parse(s).unwrap()
}

/// Aggregate document with one uniform static entry for `name`.
pub fn uniform_static_document(name: &str, color: &str) -> String {
    format!(
        r#"{{"{name}": {{"static": true, "colors": ["{color}"], "colors_uniform": true}}}}"#
    )
}

/// Aggregate document with a cycling entry for `name`.
pub fn cycling_document(name: &str, speed: u32) -> String {
    format!(r#"{{"{name}": {{"cycling": true, "speed": {speed}}}}}"#)
}

pub fn breathing_state(color_hex: &str, speed: Option<u32>, brightness: Option<u8>) -> DeviceState {
    let mut state = DeviceState::new();
    state.set_breathing(color(color_hex), speed, brightness);
    state
}

pub fn sample_document_all_null_colors() -> StateDocument {
    StateDocument {
        colors: Some(vec![None, None, None]),
        is_static: true,
        ..StateDocument::default()
    }
}
