//! Platform clipboard access for cliprelay.
//!
//! Defines the [`ClipboardProvider`] trait through which platform clipboards
//! produce and consume [`ClipboardTransaction`]s. Backends: an in-memory
//! [`mock`] for tests, and [`system`] (arboard) behind the `system` feature.

use async_trait::async_trait;
use cliprelay_types::{ClipboardFormat, ClipboardTransaction};

pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
#[cfg(feature = "system")]
pub mod system;

pub use error::ClipboardError;

/// Platform clipboard access.
#[async_trait]
pub trait ClipboardProvider: Send + 'static {
    /// Read every representation currently on the clipboard into a fresh
    /// transaction, most preferred first.
    async fn read(&self) -> Result<ClipboardTransaction, ClipboardError>;

    /// Apply a transaction to the clipboard.
    ///
    /// Representations the platform does not understand are skipped. An empty
    /// transaction is a no-op.
    async fn write(&mut self, transaction: ClipboardTransaction) -> Result<(), ClipboardError>;

    /// List the formats currently available on the clipboard.
    async fn available_formats(&self) -> Result<Vec<ClipboardFormat>, ClipboardError>;

    /// Watch for clipboard changes, receiving one transaction per change.
    async fn watch(
        &mut self,
    ) -> Result<tokio::sync::mpsc::Receiver<ClipboardTransaction>, ClipboardError>;
}

/// Reject a transaction whose total payload exceeds `max` bytes.
pub fn check_size(transaction: &ClipboardTransaction, max: usize) -> Result<(), ClipboardError> {
    let size = transaction.size();
    if size > max {
        return Err(ClipboardError::TooLarge { size, max });
    }
    Ok(())
}

/// The desktop clipboard of this machine.
///
/// Fails with [`ClipboardError::Unavailable`] when built without the
/// `system` feature.
pub fn system_provider(max_size: usize) -> Result<Box<dyn ClipboardProvider>, ClipboardError> {
    #[cfg(feature = "system")]
    {
        Ok(Box::new(system::SystemClipboard::new(max_size)))
    }
    #[cfg(not(feature = "system"))]
    {
        let _ = max_size;
        Err(ClipboardError::Unavailable)
    }
}
