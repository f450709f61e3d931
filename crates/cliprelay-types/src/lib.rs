//! Shared types for cliprelay.
//!
//! This crate contains the clipboard data model shared across the cliprelay
//! workspace: typed content representations, the clipboard transaction that
//! groups them, and the protocol messages that carry transactions between a
//! viewer and a remote session.

pub mod clipboard;
pub mod message;
pub mod transaction;

pub use clipboard::{ClipboardContent, ClipboardFormat};
pub use message::{ClipboardMessage, ProtocolVersion, PROTOCOL_VERSION};
pub use transaction::{ClipboardTransaction, TransactionError, TransactionId, TransactionState};
