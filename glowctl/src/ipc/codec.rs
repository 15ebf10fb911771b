// glowctl/src/ipc/codec.rs

//! Frame codec for the IPC channel.
//!
//! Messages are postcard-serialized and length-prefixed on the stream:
//!
//! ```text
//! [length: u32 (big-endian)][postcard-encoded message]
//! ```
//!
//! The length is capped so a corrupt prefix cannot trigger an unbounded
//! allocation.

use std::io::{Read, Write};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{Error, Result};

/// Maximum allowed frame size. State documents are small; anything beyond
/// this is a protocol violation.
pub const MAX_FRAME_SIZE: usize = 1024 * 1024;

/// Serialize `message` and write it as one length-prefixed frame.
pub fn write_frame<W: Write, T: Serialize>(writer: &mut W, message: &T) -> Result<()> {
    let bytes = postcard::to_allocvec(message)?;
    if bytes.len() > MAX_FRAME_SIZE {
        return Err(Error::FrameTooLarge {
            size: bytes.len(),
            max: MAX_FRAME_SIZE,
        });
    }
    writer.write_all(&(bytes.len() as u32).to_be_bytes())?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one length-prefixed frame and deserialize it.
pub fn read_frame<R: Read, T: DeserializeOwned>(reader: &mut R) -> Result<T> {
    let mut len_buf = [0u8; 4];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf) as usize;
    if len > MAX_FRAME_SIZE {
        return Err(Error::FrameTooLarge {
            size: len,
            max: MAX_FRAME_SIZE,
        });
    }
    let mut buf = vec![0u8; len];
    reader.read_exact(&mut buf)?;
    Ok(postcard::from_bytes(&buf)?)
}
