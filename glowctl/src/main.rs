// glowctl/src/main.rs

use std::fmt::Write as _;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, bail};
use clap::Parser;

use glowctl::controller::{Controller, LocalController, RemoteController};
use glowctl::device::models;
use glowctl::ipc::{GlowService, default_socket_path};

/// Changes the colors on some Logitech G-series devices.
#[derive(Parser, Debug)]
#[command(name = "glowctl", version, after_long_help = value_ranges_help())]
struct Cli {
    /// Select a device by short name (g203, g213)
    #[arg(short, long, value_name = "DEVICE")]
    device: Option<String>,

    /// Set one or more colors (RRGGBB hex)
    #[arg(short, long, value_name = "COLOR", num_args = 1..)]
    color: Vec<String>,

    /// Breathing animation: COLOR [SPEED [BRIGHTNESS]]
    #[arg(short, long, value_name = "ARG", num_args = 1..=3)]
    breathe: Vec<String>,

    /// Color cycle animation: SPEED [BRIGHTNESS]
    #[arg(short = 'x', long, value_name = "ARG", num_args = 1..=2)]
    cycle: Vec<String>,

    /// List known devices that are currently connected
    #[arg(short, long)]
    list: bool,

    /// File where device state is saved
    #[arg(long, value_name = "FILE")]
    state_file: Option<PathBuf>,

    /// Load device state from the state file and replay it
    #[arg(long)]
    load_state: bool,

    /// Save device state to the state file
    #[arg(long)]
    save_state: bool,

    /// Talk to a running glowctl service instead of local hardware
    #[arg(short = 'C', long)]
    client: bool,

    /// Run as a service exposing the IPC socket
    #[arg(long, conflicts_with = "client")]
    service: bool,

    /// Path of the IPC socket
    #[arg(long, value_name = "PATH")]
    socket: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(error) = run(cli) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let socket = cli.socket.clone().unwrap_or_else(default_socket_path);

    if cli.service {
        let service = GlowService::new(cli.state_file.clone());
        service.run(&socket)?;
        return Ok(());
    }

    let mut controller: Box<dyn Controller> = if cli.client {
        Box::new(
            RemoteController::connect(&socket)
                .with_context(|| format!("connecting to service at {}", socket.display()))?,
        )
    } else {
        Box::new(LocalController::new())
    };

    if cli.load_state {
        controller.load_state(cli.state_file.as_deref())?;
    }

    if cli.list {
        let devices = controller.list_devices()?;
        println!("{} devices:", devices.len());
        for (i, (short_name, name)) in devices.iter().enumerate() {
            println!("[{}] {} ({})", i + 1, name, short_name);
        }
    }

    if !cli.color.is_empty() {
        let device = require_device(&cli)?;
        controller.set_colors(device, &cli.color)?;
    }

    if !cli.breathe.is_empty() {
        let device = require_device(&cli)?;
        let color = &cli.breathe[0];
        let speed = parse_num(cli.breathe.get(1), "speed")?;
        let brightness = parse_num(cli.breathe.get(2), "brightness")?;
        controller.set_breathe(device, color, speed, brightness)?;
    }

    if !cli.cycle.is_empty() {
        let device = require_device(&cli)?;
        let speed = parse_num(cli.cycle.first(), "speed")?;
        let brightness = parse_num(cli.cycle.get(1), "brightness")?;
        controller.set_cycle(device, speed, brightness)?;
    }

    if cli.save_state {
        controller.save_state(cli.state_file.as_deref())?;
    }

    Ok(())
}

fn require_device(cli: &Cli) -> anyhow::Result<&str> {
    match cli.device.as_deref() {
        Some(device) => Ok(device),
        None => bail!("no device selected (use --device)"),
    }
}

fn parse_num<T: FromStr>(value: Option<&String>, what: &str) -> anyhow::Result<Option<T>> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse() {
            Ok(parsed) => Ok(Some(parsed)),
            Err(_) => bail!("invalid {what} '{raw}': expected a number"),
        },
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

fn value_ranges_help() -> String {
    let mut help =
        String::from("Colors are always given in hex RRGGBB format, e.g. ffb033.\n\nValue ranges per device:\n");
    for descriptor in models::known_descriptors() {
        let _ = writeln!(
            help,
            "  {} ({})",
            descriptor.name, descriptor.short_name
        );
        let _ = writeln!(
            help,
            "      color segments: {}",
            descriptor.max_color_fields.max(1)
        );
        let spec = descriptor.speed_spec;
        let _ = writeln!(
            help,
            "      speed: {} .. {} (default {})",
            spec.min, spec.max, spec.default
        );
        let spec = descriptor.bright_spec;
        let _ = writeln!(
            help,
            "      brightness: {} .. {} (default {})",
            spec.min, spec.max, spec.default
        );
    }
    help
}
