//! Wire schema for launcher requests and their acknowledgments

pub mod ack;
pub mod codec;
pub mod messages;

pub use ack::Acknowledgment;
pub use codec::{decode, encode};
pub use messages::{LauncherState, Motors, Request, RequestKind};
