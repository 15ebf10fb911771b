#[path = "../common/mod.rs"]
mod common;

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use glowctl::controller::{Controller, RemoteController};
use glowctl::device::registry::DeviceRegistry;
use glowctl::ipc::GlowService;
use glowctl::state::Mode;
use glowctl::test_support::{device_with_shared_mock, test_descriptor};
use glowctl::transport::MockBackend;

struct RunningService {
    socket: std::path::PathBuf,
    mock: Arc<Mutex<MockBackend>>,
    handle: thread::JoinHandle<()>,
    _dir: tempfile::TempDir,
}

fn start_service() -> RunningService {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("glowctl.sock");
    let (mock, device) = device_with_shared_mock(test_descriptor(), true);
    let registry = DeviceRegistry::with_devices(vec![device]);
    let service = GlowService::with_registry(registry, None);
    let server_socket = socket.clone();
    let handle = thread::spawn(move || {
        service.run(&server_socket).unwrap();
    });
    RunningService {
        socket,
        mock,
        handle,
        _dir: dir,
    }
}

fn connect_with_retry(socket: &Path) -> RemoteController {
    for _ in 0..200 {
        if let Ok(controller) = RemoteController::connect(socket) {
            return controller;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("service did not come up at {}", socket.display());
}

#[test]
fn absent_optionals_resolve_to_defaults_on_the_service_side() {
    let service = start_service();
    let mut controller = connect_with_retry(&service.socket);

    controller.set_breathe("test", "00ff00", None, None).unwrap();
    controller.quit().unwrap();
    service.handle.join().unwrap();

    // The service filled in the default speed and the maximum brightness
    // before encoding the hardware command.
    let writes = service.mock.lock().unwrap().written_payloads();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0],
        hex::decode("11ff0c3a000200ff002af8006400000000000000").unwrap()
    );
}

#[test]
fn state_collection_roundtrips_across_the_boundary() {
    let service = start_service();
    let mut controller = connect_with_retry(&service.socket);

    controller.set_color_at("test", "FF0000", 2).unwrap();
    let states = controller.get_state().unwrap();
    match states["test"].mode() {
        Mode::Static { colors, uniform } => {
            assert!(!uniform);
            assert_eq!(colors[2].unwrap().to_string(), "ff0000");
        }
        other => panic!("expected static mode, got {:?}", other),
    }

    // Push a different state back and confirm the service replays it.
    controller
        .set_state(r#"{"test": {"cycling": true, "speed": 4000}}"#)
        .unwrap();
    let states = controller.get_state().unwrap();
    assert!(matches!(
        states["test"].mode(),
        Mode::Cycling {
            speed: Some(4000),
            ..
        }
    ));

    controller.quit().unwrap();
    service.handle.join().unwrap();
}

#[test]
fn list_devices_and_errors_cross_the_boundary() {
    let service = start_service();
    let mut controller = connect_with_retry(&service.socket);

    let devices = controller.list_devices().unwrap();
    assert_eq!(devices["test"], "Test Keyboard");

    // Unknown device surfaces as a remote error, not a dropped connection.
    let err = controller.set_color_at("g999", "ff0000", 0).unwrap_err();
    assert!(matches!(err, glowctl::Error::Remote(_)));

    // The connection is still usable afterwards.
    controller.set_color_at("test", "ff0000", 0).unwrap();

    controller.quit().unwrap();
    service.handle.join().unwrap();
}

#[test]
fn explicit_optionals_cross_the_boundary_unchanged() {
    let service = start_service();
    let mut controller = connect_with_retry(&service.socket);

    controller
        .set_cycle("test", Some(8000), Some(30))
        .unwrap();
    controller.quit().unwrap();
    service.handle.join().unwrap();

    // 8000 = 0x1f40, 30 = 0x1e
    let writes = service.mock.lock().unwrap().written_payloads();
    assert_eq!(
        writes[0],
        hex::decode("11ff0c3a0003ffffff00001f401e000000000000").unwrap()
    );
}
