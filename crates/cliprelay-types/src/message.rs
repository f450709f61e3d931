//! Protocol message types.
//!
//! Messages are exchanged between the viewer and the remote session whenever
//! a clipboard transaction crosses the boundary. Every message names the
//! transaction it belongs to.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::clipboard::{ClipboardContent, ClipboardFormat};
use crate::transaction::TransactionId;

/// Current protocol version.
pub const PROTOCOL_VERSION: ProtocolVersion = ProtocolVersion { major: 0, minor: 1 };

/// Protocol version for compatibility negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct ProtocolVersion {
    pub major: u16,
    pub minor: u16,
}

impl std::fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Clipboard synchronisation messages (bidirectional, on demand).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ClipboardMessage {
    /// Advertise a transaction's formats, most preferred first.
    Offer {
        transaction: TransactionId,
        formats: Vec<ClipboardFormat>,
        /// Size in bytes (hint for the receiver).
        size_hint: u64,
    },

    /// Request some formats of an offered transaction.
    Request {
        transaction: TransactionId,
        formats: Vec<ClipboardFormat>,
    },

    /// Transaction content, in the producer's order.
    Data {
        transaction: TransactionId,
        contents: Vec<ClipboardContent>,
    },

    /// None of the requested formats are available.
    Empty { transaction: TransactionId },
}

impl ClipboardMessage {
    /// The transaction this message belongs to.
    pub fn transaction(&self) -> TransactionId {
        match self {
            Self::Offer { transaction, .. }
            | Self::Request { transaction, .. }
            | Self::Data { transaction, .. }
            | Self::Empty { transaction } => *transaction,
        }
    }

    /// Short name of the variant, for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Offer { .. } => "offer",
            Self::Request { .. } => "request",
            Self::Data { .. } => "data",
            Self::Empty { .. } => "empty",
        }
    }
}
