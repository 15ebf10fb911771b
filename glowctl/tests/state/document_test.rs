#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use glowctl::state::{DeviceState, Mode, StateDocument};

#[test]
fn json_document_roundtrips_through_text() {
    let mut state = DeviceState::new();
    state.set_static_color(fixtures::color("ff0000"), 2);
    let doc = state.to_document();

    let text = serde_json::to_string_pretty(&doc).unwrap();
    let parsed: StateDocument = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed, doc);
    assert_eq!(DeviceState::from_document(&parsed).unwrap(), state);
}

#[test]
fn all_null_colors_parse_to_empty_static_fields() {
    let doc = fixtures::sample_document_all_null_colors();
    let state = DeviceState::from_document(&doc).unwrap();
    match state.mode() {
        Mode::Static { colors, .. } => assert!(colors.iter().all(Option::is_none)),
        other => panic!("expected static mode, got {:?}", other),
    }
}

#[test]
fn flat_keys_match_the_persisted_layout() {
    let mut state = DeviceState::new();
    state.set_breathing(fixtures::color("8000ff"), Some(3000), Some(64));
    let value = serde_json::to_value(state.to_document()).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "colors",
        "colors_uniform",
        "static",
        "breathing",
        "cycling",
        "brightness",
        "speed",
    ] {
        assert!(object.contains_key(key), "missing key {key}");
    }
    assert_eq!(object["breathing"], serde_json::json!(true));
    assert_eq!(object["static"], serde_json::json!(false));
    assert_eq!(object["speed"], serde_json::json!(3000));
}

#[test]
fn invalid_color_string_in_document_is_an_error() {
    let doc: StateDocument =
        serde_json::from_str(r#"{"static": true, "colors": ["not-a-color"]}"#).unwrap();
    assert!(DeviceState::from_document(&doc).is_err());
}
