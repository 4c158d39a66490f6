//! Length-prefixed framing
//!
//! ```text
//! ┌──────────────────┬──────────────────────────┐
//! │ Length (4 bytes) │ Payload (variable)       │
//! │ Big-endian u32   │ Request or reply bytes   │
//! └──────────────────┴──────────────────────────┘
//! ```
//!
//! The length excludes the prefix itself. Payloads above
//! [`MAX_FRAME_LEN`] close the connection.

use crate::error::{Error, Result};
use std::io::{Read, Write};

/// Size of the length prefix
pub const LEN_PREFIX: usize = 4;

/// Maximum payload size (1MB)
pub const MAX_FRAME_LEN: usize = 1024 * 1024;

/// Write one frame and flush
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    if payload.len() > MAX_FRAME_LEN {
        return Err(Error::Protocol(format!(
            "Message too large: {} bytes",
            payload.len()
        )));
    }
    let len = payload.len() as u32;
    writer.write_all(&len.to_be_bytes()).map_err(Error::Transport)?;
    writer.write_all(payload).map_err(Error::Transport)?;
    writer.flush().map_err(Error::Transport)?;
    Ok(())
}

/// Read one frame, blocking until it is complete
pub fn read_frame<R: Read>(reader: &mut R) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; LEN_PREFIX];
    reader.read_exact(&mut len_buf).map_err(Error::Transport)?;

    let len = checked_len(len_buf)?;
    let mut payload = vec![0u8; len];
    reader.read_exact(&mut payload).map_err(Error::Transport)?;
    Ok(payload)
}

/// Remove one complete frame from the front of `inbox`, if one is there
///
/// Used by non-blocking readers that accumulate bytes as they arrive.
pub fn take_frame(inbox: &mut Vec<u8>) -> Result<Option<Vec<u8>>> {
    if inbox.len() < LEN_PREFIX {
        return Ok(None);
    }
    let len = checked_len([inbox[0], inbox[1], inbox[2], inbox[3]])?;
    if inbox.len() < LEN_PREFIX + len {
        return Ok(None);
    }
    let payload = inbox[LEN_PREFIX..LEN_PREFIX + len].to_vec();
    inbox.drain(..LEN_PREFIX + len);
    Ok(Some(payload))
}

/// True once `inbox` starts with a whole frame, or with a length prefix
/// that [`take_frame`] will reject. Non-blocking readers stop reading here,
/// which keeps a buffer below `LEN_PREFIX + MAX_FRAME_LEN` plus one read.
pub fn frame_ready(inbox: &[u8]) -> bool {
    if inbox.len() < LEN_PREFIX {
        return false;
    }
    let len = u32::from_be_bytes([inbox[0], inbox[1], inbox[2], inbox[3]]) as usize;
    len > MAX_FRAME_LEN || inbox.len() >= LEN_PREFIX + len
}

fn checked_len(prefix: [u8; LEN_PREFIX]) -> Result<usize> {
    let len = u32::from_be_bytes(prefix) as usize;
    if len > MAX_FRAME_LEN {
        return Err(Error::Protocol(format!("Message too large: {} bytes", len)));
    }
    Ok(len)
}
