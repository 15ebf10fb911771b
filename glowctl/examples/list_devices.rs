//! Lists the known device catalog and which entries are currently plugged in.
//!
//! Run with `--features usb` to actually probe the bus; without it every
//! device reports as absent.

use glowctl::controller::{Controller, LocalController};
use glowctl::device::registry::DeviceRegistry;

fn main() -> glowctl::Result<()> {
    env_logger::init();

    let registry = DeviceRegistry::new();
    println!("known devices:");
    for device in registry.known_devices() {
        let d = device.descriptor();
        println!(
            "  {} ({}) {:04x}:{:04x}",
            d.name, d.short_name, d.vendor_id, d.product_id
        );
    }

    let mut controller = LocalController::with_registry(registry);
    let present = controller.list_devices()?;
    println!("{} connected", present.len());
    for (short_name, name) in present {
        println!("  {} ({})", name, short_name);
    }
    Ok(())
}
