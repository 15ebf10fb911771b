// glowctl/src/ipc/client.rs

use std::os::unix::net::UnixStream;
use std::path::Path;

use log::debug;

use crate::ipc::codec::{read_frame, write_frame};
use crate::ipc::messages::{Reply, Request};
use crate::{Error, Result};

/// Blocking call/response client for a running glowctl service.
pub struct IpcClient {
    stream: UnixStream,
}

impl IpcClient {
    /// Connect to the service socket.
    pub fn connect(socket_path: &Path) -> Result<Self> {
        debug!("connecting to service at {}", socket_path.display());
        let stream = UnixStream::connect(socket_path)?;
        Ok(Self { stream })
    }

    /// Send one request and wait for its reply. A [`Reply::Error`] from the
    /// peer surfaces as [`Error::Remote`].
    pub fn call(&mut self, request: &Request) -> Result<Reply> {
        write_frame(&mut self.stream, request)?;
        let reply: Reply = read_frame(&mut self.stream)?;
        match reply {
            Reply::Error { message } => Err(Error::Remote(message)),
            other => Ok(other),
        }
    }
}
