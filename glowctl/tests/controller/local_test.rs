#[path = "../common/mod.rs"]
mod common;

use std::sync::{Arc, Mutex};

use glowctl::Error;
use glowctl::controller::{Controller, LocalController};
use glowctl::device::registry::DeviceRegistry;
use glowctl::state::Mode;
use glowctl::test_support::{device_with_shared_mock, test_descriptor};
use glowctl::transport::MockBackend;

fn local_with_mock() -> (Arc<Mutex<MockBackend>>, LocalController) {
    let (mock, device) = device_with_shared_mock(test_descriptor(), true);
    let registry = DeviceRegistry::with_devices(vec![device]);
    (mock, LocalController::with_registry(registry))
}

#[test]
fn list_devices_maps_short_to_display_names() {
    let (_, mut controller) = local_with_mock();
    let devices = controller.list_devices().unwrap();
    assert_eq!(devices.len(), 1);
    assert_eq!(devices["test"], "Test Keyboard");
}

#[test]
fn absent_devices_are_not_listed() {
    let (mock, device) = device_with_shared_mock(test_descriptor(), true);
    mock.lock().unwrap().present = false;
    let mut controller =
        LocalController::with_registry(DeviceRegistry::with_devices(vec![device]));
    assert!(controller.list_devices().unwrap().is_empty());
}

#[test]
fn full_command_state_save_load_cycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("devices.gstate");

    let (_, mut controller) = local_with_mock();
    controller.set_color_at("test", "FF0000", 2).unwrap();
    controller.save_state(Some(&path)).unwrap();

    // A fresh controller replays the saved state on load.
    let (mock, device) = device_with_shared_mock(test_descriptor(), true);
    let mut fresh = LocalController::with_registry(DeviceRegistry::with_devices(vec![device]));
    fresh.load_state(Some(&path)).unwrap();

    let writes = mock.lock().unwrap().written_payloads();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0],
        hex::decode("11ff0c3a0201ff00000200000000000000000000").unwrap()
    );

    let states = fresh.get_state().unwrap();
    match states["test"].mode() {
        Mode::Static { colors, uniform } => {
            assert!(!uniform);
            assert_eq!(colors[2].unwrap().to_string(), "ff0000");
        }
        other => panic!("expected static mode, got {:?}", other),
    }
}

#[test]
fn set_colors_routes_through_the_device() {
    let (mock, mut controller) = local_with_mock();
    let colors: Vec<String> = ["112233", "445566"].iter().map(|s| s.to_string()).collect();
    controller.set_colors("test", &colors).unwrap();
    assert_eq!(mock.lock().unwrap().writes.len(), 2);
}

#[test]
fn effects_route_through_the_device() {
    let (mock, mut controller) = local_with_mock();
    controller
        .set_breathe("test", "00ff00", Some(2000), Some(80))
        .unwrap();
    controller.set_cycle("test", None, None).unwrap();
    assert_eq!(mock.lock().unwrap().writes.len(), 2);
}

#[test]
fn load_state_requires_a_filename_locally() {
    let (_, mut controller) = local_with_mock();
    assert!(matches!(
        controller.load_state(None),
        Err(Error::NoStateFile)
    ));
}
