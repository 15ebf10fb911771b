#[path = "../common/mod.rs"]
mod common;

use glowctl::state::Mode;
use glowctl::test_support::{device_with_shared_mock, test_descriptor};
use glowctl::Error;

#[test]
fn breathe_then_cycle_leaves_only_cycling() {
    let (_, mut device) = device_with_shared_mock(test_descriptor(), true);
    device.connect().unwrap();
    device.send_breathe("00ff00", Some(2000), None).unwrap();
    device.send_cycle(Some(4000), Some(50)).unwrap();
    device.disconnect();

    let doc = device.state().to_document();
    assert!(!doc.is_static);
    assert!(!doc.breathing);
    assert!(doc.cycling);
    assert_eq!(doc.speed, Some(4000));
    assert_eq!(doc.brightness, Some(50));
}

#[test]
fn breathe_encodes_defaults_for_absent_values() {
    let (mock, mut device) = device_with_shared_mock(test_descriptor(), true);
    device.connect().unwrap();
    device.send_breathe("8000ff", None, None).unwrap();

    let writes = mock.lock().unwrap().written_payloads();
    assert_eq!(
        writes[0],
        hex::decode("11ff0c3a00028000ff2af8006400000000000000").unwrap()
    );
}

#[test]
fn cycle_clamps_out_of_range_speed() {
    let (mock, mut device) = device_with_shared_mock(test_descriptor(), true);
    device.connect().unwrap();
    device.send_cycle(Some(1), Some(200)).unwrap();

    let writes = mock.lock().unwrap().written_payloads();
    // speed clamps up to 0x03e8, brightness down to 0x64
    assert_eq!(
        writes[0],
        hex::decode("11ff0c3a0003ffffff000003e864000000000000").unwrap()
    );
}

#[test]
fn unsupported_cycle_is_rejected_without_bytes() {
    let mut descriptor = test_descriptor();
    descriptor.can_cycle = false;
    let (mock, mut device) = device_with_shared_mock(descriptor, true);
    device.connect().unwrap();
    assert!(matches!(
        device.send_cycle(None, None),
        Err(Error::UnsupportedEffect("cycle"))
    ));
    assert!(mock.lock().unwrap().writes.is_empty());
    assert_eq!(*device.state().mode(), Mode::Off);
}

#[test]
fn breathing_state_records_resolved_brightness() {
    let (_, mut device) = device_with_shared_mock(test_descriptor(), true);
    device.connect().unwrap();
    device.send_breathe("123456", Some(3000), None).unwrap();
    match device.state().mode() {
        Mode::Breathing {
            speed, brightness, ..
        } => {
            assert_eq!(*speed, Some(3000));
            assert_eq!(*brightness, Some(0x64));
        }
        other => panic!("expected breathing, got {:?}", other),
    }
}
