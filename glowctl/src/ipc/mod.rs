// glowctl/src/ipc/mod.rs

//! Inter-process channel between controllers and a device-owning service.

use std::env;
use std::path::PathBuf;

pub mod client;
pub mod codec;
pub mod messages;
pub mod service;

pub use client::IpcClient;
pub use messages::{Reply, Request};
pub use service::GlowService;

/// Default service socket location: the user runtime directory when
/// available, the system temp directory otherwise.
pub fn default_socket_path() -> PathBuf {
    let dir = env::var_os("XDG_RUNTIME_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(env::temp_dir);
    dir.join("glowctl.sock")
}
