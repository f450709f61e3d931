//! Conversions between clipboard transactions and protocol messages.
//!
//! The sending side turns a transaction into an `Offer` and answers
//! `Request`s with `Data`; the receiving side rebuilds a transaction from
//! `Data` by adding each item in the order it arrived.

use cliprelay_types::{ClipboardFormat, ClipboardMessage, ClipboardTransaction};
use tracing::debug;

use crate::error::ProtocolError;

/// Advertise the formats of `transaction`. Finalizes it.
pub fn offer(transaction: &mut ClipboardTransaction) -> ClipboardMessage {
    let size_hint = transaction.size() as u64;
    ClipboardMessage::Offer {
        transaction: transaction.id(),
        formats: transaction.formats(),
        size_hint,
    }
}

/// Move the whole content of `transaction` into a `Data` message.
pub fn data(transaction: ClipboardTransaction) -> ClipboardMessage {
    let id = transaction.id();
    ClipboardMessage::Data {
        transaction: id,
        contents: transaction.into_content(),
    }
}

/// Answer a request for `requested` formats.
///
/// Items keep the transaction's order, not the request's. Duplicates of a
/// requested format are all included. Finalizes `transaction`.
pub fn respond(
    transaction: &mut ClipboardTransaction,
    requested: &[ClipboardFormat],
) -> ClipboardMessage {
    let id = transaction.id();
    let contents: Vec<_> = transaction
        .content()
        .iter()
        .filter(|content| requested.contains(&content.format()))
        .cloned()
        .collect();

    debug!(
        transaction = %id,
        requested = requested.len(),
        matched = contents.len(),
        "answering clipboard request"
    );
    if contents.is_empty() {
        ClipboardMessage::Empty { transaction: id }
    } else {
        ClipboardMessage::Data {
            transaction: id,
            contents,
        }
    }
}

/// Rebuild a transaction from a received `Data` or `Empty` message.
pub fn into_transaction(message: ClipboardMessage) -> Result<ClipboardTransaction, ProtocolError> {
    match message {
        ClipboardMessage::Data {
            transaction: id,
            contents,
        } => {
            let mut transaction = ClipboardTransaction::with_id(id);
            for content in contents {
                transaction.add_content(content)?;
            }
            Ok(transaction)
        }
        ClipboardMessage::Empty { transaction } => Ok(ClipboardTransaction::with_id(transaction)),
        other => Err(ProtocolError::UnexpectedMessage(other.kind())),
    }
}
