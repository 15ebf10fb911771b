#[path = "../common/mod.rs"]
mod common;

use common::fixtures;
use glowctl::device::registry::DeviceRegistry;
use glowctl::state::Mode;
use glowctl::test_support::{device_with_shared_mock, test_descriptor};

#[test]
fn single_field_state_restores_exactly_one_command() {
    // Command a color, persist the registry state, then replay it into a
    // fresh registry backed by a fresh mock.
    let (_, mut device) = device_with_shared_mock(test_descriptor(), true);
    device.connect().unwrap();
    device.send_color("FF0000", 2).unwrap();
    device.disconnect();
    let registry = DeviceRegistry::with_devices(vec![device]);
    let document = registry.state_document().unwrap();

    let (mock, device) = device_with_shared_mock(test_descriptor(), true);
    let mut restored = DeviceRegistry::with_devices(vec![device]);
    let failures = restored.apply_document(&document).unwrap();
    assert!(failures.is_empty());
    assert!(restored.restore_states_of_devices().is_empty());

    let backend = mock.lock().unwrap();
    let writes = backend.written_payloads();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0],
        hex::decode("11ff0c3a0201ff00000200000000000000000000").unwrap()
    );
    // restore opened and closed the device around the single resend
    assert_eq!(backend.open_calls, 1);
    assert_eq!(backend.close_calls, 1);
}

#[test]
fn uniform_state_restores_only_field_zero() {
    let (mock, device) = device_with_shared_mock(test_descriptor(), true);
    let mut registry = DeviceRegistry::with_devices(vec![device]);
    registry
        .apply_document(&fixtures::uniform_static_document("test", "aabbcc"))
        .unwrap();
    assert!(registry.restore_states_of_devices().is_empty());

    let writes = mock.lock().unwrap().written_payloads();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0][4], 0x00);
}

#[test]
fn breathing_state_restores_breathe_command() {
    let (mock, mut device) = device_with_shared_mock(test_descriptor(), true);
    device.set_state(fixtures::breathing_state("00ff00", Some(2000), Some(50)));
    device.restore_state().unwrap();

    let writes = mock.lock().unwrap().written_payloads();
    assert_eq!(writes.len(), 1);
    assert_eq!(
        writes[0],
        hex::decode("11ff0c3a000200ff0007d0003200000000000000").unwrap()
    );
}

#[test]
fn absent_device_is_skipped_without_error() {
    let (mock, mut device) = device_with_shared_mock(test_descriptor(), false);
    device.set_state(fixtures::breathing_state("00ff00", None, None));
    device.restore_state().unwrap();
    assert!(mock.lock().unwrap().writes.is_empty());
}

#[test]
fn restore_disconnects_even_when_a_resend_fails() {
    // The recorded state asks for a cycle the descriptor no longer
    // supports, so the resend fails after connect.
    let mut descriptor = test_descriptor();
    descriptor.can_cycle = false;
    let (mock, mut device) = device_with_shared_mock(descriptor, true);
    device.set_state({
        let mut s = glowctl::state::DeviceState::new();
        s.set_cycling(Some(4000), None);
        s
    });
    assert!(device.restore_state().is_err());
    let backend = mock.lock().unwrap();
    assert_eq!(backend.open_calls, 1);
    assert_eq!(backend.close_calls, 1);
}

#[test]
fn bulk_restore_reports_failures_but_continues() {
    let mut bad_descriptor = test_descriptor();
    bad_descriptor.can_cycle = false;
    let (_, mut bad_device) = device_with_shared_mock(bad_descriptor, true);
    bad_device.set_state({
        let mut s = glowctl::state::DeviceState::new();
        s.set_cycling(None, None);
        s
    });

    let (good_mock, mut good_device) = device_with_shared_mock(test_descriptor(), true);
    good_device.set_state(fixtures::breathing_state("112233", None, None));

    let mut registry = DeviceRegistry::with_devices(vec![bad_device, good_device]);
    let failures = registry.restore_states_of_devices();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].device, "test");
    // The second device still got its resend.
    assert_eq!(good_mock.lock().unwrap().writes.len(), 1);
}

#[test]
fn reconnect_roundtrip_preserves_mode() {
    let (_, mut device) = device_with_shared_mock(test_descriptor(), true);
    device.connect().unwrap();
    device.send_breathe("8000ff", Some(12000), Some(80)).unwrap();
    device.disconnect();
    let doc = device.state().to_document();
    let reparsed = glowctl::state::DeviceState::from_document(&doc).unwrap();
    assert!(matches!(reparsed.mode(), Mode::Breathing { .. }));
    assert_eq!(&reparsed, device.state());
}
