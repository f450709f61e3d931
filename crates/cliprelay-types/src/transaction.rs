//! Clipboard transactions.
//!
//! A [`ClipboardTransaction`] groups every representation of one clipboard
//! event. A producer adds representations most-preferred first; a consumer
//! reads them back in exactly that order and applies the first one it
//! understands. Reading the content finalizes the transaction, after which
//! [`ClipboardTransaction::add_content`] is rejected.

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::clipboard::{ClipboardContent, ClipboardFormat};

/// Identifier correlating one clipboard event across both ends of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
pub struct TransactionId(#[bincode(with_serde)] Uuid);

impl TransactionId {
    /// Generate a new random transaction ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a transaction ID from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID.
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TransactionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TransactionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionState {
    /// Accepting new content.
    Accumulating,
    /// Content has been read; no further additions.
    Finalized,
}

impl std::fmt::Display for TransactionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accumulating => write!(f, "Accumulating"),
            Self::Finalized => write!(f, "Finalized"),
        }
    }
}

/// Transaction misuse by a producer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum TransactionError {
    #[error("transaction {id} is closed: content has already been read")]
    Closed { id: TransactionId },
}

/// One atomic clipboard event.
///
/// Created by [`ClipboardTransaction::init`], or by
/// [`ClipboardTransaction::with_id`] on the receiving side of a session.
/// There is no `Default` impl.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardTransaction {
    id: TransactionId,
    contents: Vec<ClipboardContent>,
    state: TransactionState,
}

impl ClipboardTransaction {
    /// Start a fresh, empty transaction with a new ID.
    #[must_use]
    pub fn init() -> Self {
        Self::with_id(TransactionId::new())
    }

    /// Start a fresh, empty transaction that continues `id`.
    #[must_use]
    pub fn with_id(id: TransactionId) -> Self {
        Self {
            id,
            contents: Vec::new(),
            state: TransactionState::Accumulating,
        }
    }

    pub fn id(&self) -> TransactionId {
        self.id
    }

    pub fn state(&self) -> TransactionState {
        self.state
    }

    pub fn is_finalized(&self) -> bool {
        self.state == TransactionState::Finalized
    }

    /// Append a representation.
    ///
    /// Items with a format tag already present are kept, after the earlier
    /// ones.
    pub fn add_content(&mut self, content: ClipboardContent) -> Result<(), TransactionError> {
        if self.is_finalized() {
            return Err(TransactionError::Closed { id: self.id });
        }
        self.contents.push(content);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    /// Total payload size of all representations, in bytes.
    pub fn size(&self) -> usize {
        self.contents.iter().map(ClipboardContent::size).sum()
    }

    /// Close the transaction without reading it.
    pub fn finalize(&mut self) {
        self.state = TransactionState::Finalized;
    }

    /// Every representation in insertion order. Finalizes the transaction.
    pub fn content(&mut self) -> &[ClipboardContent] {
        self.finalize();
        &self.contents
    }

    /// Format tags in insertion order. Finalizes the transaction.
    pub fn formats(&mut self) -> Vec<ClipboardFormat> {
        self.content().iter().map(ClipboardContent::format).collect()
    }

    /// First representation, in insertion order, whose format is in
    /// `supported`. The order of `supported` does not matter. Finalizes the
    /// transaction.
    pub fn select(&mut self, supported: &[ClipboardFormat]) -> Option<&ClipboardContent> {
        self.content()
            .iter()
            .find(|content| supported.contains(&content.format()))
    }

    /// Take the representations out, consuming the transaction.
    pub fn into_content(self) -> Vec<ClipboardContent> {
        self.contents
    }
}
