use thiserror::Error;

/// Common error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    #[error("device not found: {0}")]
    DeviceNotFound(String),

    #[error("'{0}' is not a valid color (expected six hex digits, e.g. 'f0d3aa')")]
    InvalidColor(String),

    #[error("device does not support the {0} effect")]
    UnsupportedEffect(&'static str),

    #[error("invalid state filename '{0}': must end with '.gstate'")]
    InvalidStateFilename(String),

    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    #[error("no state file configured")]
    NoStateFile,

    #[error("device is not connected")]
    NotConnected,

    // USB 実装を後から有効化できるように optional dependency にしている
    #[cfg(feature = "usb")]
    #[error("usb error: {0}")]
    Usb(#[from] rusb::Error),

    #[error("usb backend unavailable (crate built without the `usb` feature)")]
    BackendUnavailable,

    #[error("malformed state document: {0}")]
    InvalidStateDocument(String),

    #[error("invalid hex in command template: {0}")]
    InvalidCommand(String),

    #[error("state codec error: {0}")]
    State(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ipc codec error: {0}")]
    Ipc(#[from] postcard::Error),

    #[error("ipc frame too large: {size} bytes (max {max})")]
    FrameTooLarge { size: usize, max: usize },

    #[error("remote error: {0}")]
    Remote(String),

    #[error("unexpected reply from service")]
    UnexpectedReply,
}

pub type Result<T> = std::result::Result<T, Error>;
