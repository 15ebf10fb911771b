#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use glowctl::Error;
use glowctl::device::Device;
use glowctl::device::registry::DeviceRegistry;
use glowctl::test_support::test_descriptor;

fn registry_with_offline_device() -> DeviceRegistry {
    // No backend injected: persistence never needs the bus.
    DeviceRegistry::with_devices(vec![Device::new(test_descriptor())])
}

#[test]
fn state_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.gstate");

    let mut registry = registry_with_offline_device();
    registry
        .apply_document(&fixtures::uniform_static_document("test", "aabbcc"))
        .unwrap();
    registry.write_state_of_devices(&path).unwrap();

    let mut reloaded = registry_with_offline_device();
    let failures = reloaded.load_state_of_devices(&path).unwrap();
    assert!(failures.is_empty());
    assert_eq!(reloaded.states(), registry.states());
}

#[test]
fn wrong_extension_is_rejected_before_writing() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.json");
    let registry = registry_with_offline_device();
    assert!(matches!(
        registry.write_state_of_devices(&path),
        Err(Error::InvalidStateFilename(_))
    ));
    assert!(!path.exists());
}

#[test]
fn missing_file_is_an_io_error() {
    let mut registry = registry_with_offline_device();
    assert!(matches!(
        registry.load_state_of_devices(std::path::Path::new("/nonexistent/x.gstate")),
        Err(Error::Io(_))
    ));
}

#[test]
fn corrupt_device_block_does_not_abort_the_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.gstate");
    std::fs::write(
        &path,
        r#"{
            "test": {"breathing": true},
            "other": {"cycling": true}
        }"#,
    )
    .unwrap();

    let mut registry = registry_with_offline_device();
    let failures = registry.load_state_of_devices(&path).unwrap();
    // "test" is corrupt (breathing without color) and recorded; "other" is
    // unknown and silently ignored.
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].device, "test");
}

#[test]
fn written_document_is_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.gstate");
    let registry = registry_with_offline_device();
    registry.write_state_of_devices(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert!(value.get("test").is_some());
}
