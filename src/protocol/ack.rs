//! Single-byte acknowledgment sent back for every request

use crate::error::{Error, Result};

/// Reply byte for a request the launcher carried out
pub const ACK_OK: u8 = b'1';

/// Reply byte for a request that failed for any reason
pub const ACK_FAILED: u8 = b'0';

/// Outcome of one request, as seen by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acknowledgment {
    Ok,
    Failed,
}

impl Acknowledgment {
    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            Acknowledgment::Ok => ACK_OK,
            Acknowledgment::Failed => ACK_FAILED,
        }
    }

    /// Parse a complete reply payload.
    ///
    /// The payload must be exactly one byte equal to one of the two markers.
    /// Anything else is a protocol error rather than a silent success.
    pub fn from_reply(reply: &[u8]) -> Result<Self> {
        match reply {
            [ACK_OK] => Ok(Acknowledgment::Ok),
            [ACK_FAILED] => Ok(Acknowledgment::Failed),
            other => Err(Error::Protocol(format!("Unexpected reply: {:02x?}", other))),
        }
    }

    pub fn is_ok(self) -> bool {
        self == Acknowledgment::Ok
    }
}

impl<T, E> From<&std::result::Result<T, E>> for Acknowledgment {
    fn from(result: &std::result::Result<T, E>) -> Self {
        if result.is_ok() {
            Acknowledgment::Ok
        } else {
            Acknowledgment::Failed
        }
    }
}
