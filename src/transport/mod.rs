//! Transport layer for the request/reply exchange
//!
//! Both roles sit behind traits so the server loop and the client can be
//! driven by in-memory transports in tests.

pub mod framing;
pub mod reply;
pub mod request;

pub use reply::{ReplySocket, ReplyTransport};
pub use request::{RequestSocket, RequestTransport};
