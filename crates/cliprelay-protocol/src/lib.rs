//! Wire protocol for cliprelay.
//!
//! This crate handles message serialisation/deserialisation (via bincode v2),
//! length-prefixed framing over any tokio byte stream, and the conversions
//! between [`ClipboardTransaction`](cliprelay_types::ClipboardTransaction)s
//! and the clipboard messages that carry them.

pub mod connection;
pub mod error;
pub mod transaction;
pub mod wire;

pub use connection::{MessageReceiver, MessageSender};
pub use error::ProtocolError;
