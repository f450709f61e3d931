//! Protocol and wire errors.

use cliprelay_types::TransactionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("serialisation error: {0}")]
    Serialization(String),

    #[error("deserialisation error: {0}")]
    Deserialization(String),

    #[error("frame of {size} bytes exceeds maximum {max}")]
    FrameTooLarge { size: usize, max: u32 },

    #[error("stream closed unexpectedly")]
    StreamClosed,

    #[error("unexpected {0} message")]
    UnexpectedMessage(&'static str),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
