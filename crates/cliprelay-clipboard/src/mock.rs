//! Mock clipboard backend for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use cliprelay_types::{ClipboardContent, ClipboardFormat, ClipboardTransaction, TransactionId};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::ClipboardError;
use crate::{check_size, ClipboardProvider};

/// Recorded write for test observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedContent {
    pub transaction: TransactionId,
    pub content: ClipboardContent,
}

/// Shared state for observing what `MockClipboard` did.
#[derive(Debug, Default)]
struct MockClipboardState {
    /// Representations currently on the clipboard, most preferred first.
    current: Vec<ClipboardContent>,
    applied: Vec<AppliedContent>,
    watchers: Vec<mpsc::Sender<ClipboardTransaction>>,
}

/// Mock clipboard backend for testing.
///
/// Behaves like a platform that can hold a single representation: `write`
/// applies the first item of the transaction whose format is in the
/// supported set.
pub struct MockClipboard {
    supported: Vec<ClipboardFormat>,
    max_size: usize,
    state: Arc<Mutex<MockClipboardState>>,
}

impl MockClipboard {
    /// Create a mock clipboard that understands `supported` formats.
    pub fn new(supported: Vec<ClipboardFormat>, max_size: usize) -> Self {
        Self {
            supported,
            max_size,
            state: Arc::new(Mutex::new(MockClipboardState::default())),
        }
    }

    /// Get a clonable handle for driving and observing the clipboard from tests.
    pub fn handle(&self) -> MockClipboardHandle {
        MockClipboardHandle {
            state: Arc::clone(&self.state),
        }
    }
}

/// Clonable handle for `MockClipboard`.
///
/// Tests use this to simulate local copies and inspect applied writes.
#[derive(Clone)]
pub struct MockClipboardHandle {
    state: Arc<Mutex<MockClipboardState>>,
}

impl MockClipboardHandle {
    /// Simulate a local copy offering `contents`, most preferred first.
    ///
    /// Every watcher receives a fresh transaction.
    pub fn copy(&self, contents: Vec<ClipboardContent>) {
        let mut state = self.state.lock().unwrap();
        state.current = contents;
        let current = state.current.clone();
        state.watchers.retain(|watcher| {
            let mut transaction = ClipboardTransaction::init();
            for content in current.iter().cloned() {
                // A fresh transaction is never closed.
                let _ = transaction.add_content(content);
            }
            match watcher.try_send(transaction) {
                Ok(()) => true,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("clipboard watcher lagging, dropping change");
                    true
                }
                Err(mpsc::error::TrySendError::Closed(_)) => false,
            }
        });
    }

    /// Snapshot of the representations currently on the clipboard.
    pub fn current(&self) -> Vec<ClipboardContent> {
        self.state.lock().unwrap().current.clone()
    }

    /// Snapshot of every representation applied by `write`, oldest first.
    pub fn applied(&self) -> Vec<AppliedContent> {
        self.state.lock().unwrap().applied.clone()
    }
}

#[async_trait]
impl ClipboardProvider for MockClipboard {
    async fn read(&self) -> Result<ClipboardTransaction, ClipboardError> {
        let current = self.state.lock().unwrap().current.clone();
        let mut transaction = ClipboardTransaction::init();
        for content in current {
            transaction.add_content(content)?;
        }
        check_size(&transaction, self.max_size)?;
        debug!(
            transaction = %transaction.id(),
            items = transaction.len(),
            "read mock clipboard"
        );
        Ok(transaction)
    }

    async fn write(&mut self, mut transaction: ClipboardTransaction) -> Result<(), ClipboardError> {
        let id = transaction.id();
        if transaction.is_empty() {
            debug!(transaction = %id, "empty transaction, nothing to apply");
            return Ok(());
        }
        check_size(&transaction, self.max_size)?;

        let mut chosen = None;
        for content in transaction.content() {
            let format = content.format();
            if self.supported.contains(&format) {
                chosen = Some(content.clone());
                break;
            }
            debug!(transaction = %id, format = %format, "skipping unsupported representation");
        }
        let content = chosen.ok_or(ClipboardError::FormatUnavailable)?;

        debug!(transaction = %id, format = %content.format(), "applied to mock clipboard");
        let mut state = self.state.lock().unwrap();
        state.current = vec![content.clone()];
        state.applied.push(AppliedContent {
            transaction: id,
            content,
        });
        Ok(())
    }

    async fn available_formats(&self) -> Result<Vec<ClipboardFormat>, ClipboardError> {
        let state = self.state.lock().unwrap();
        Ok(state.current.iter().map(ClipboardContent::format).collect())
    }

    async fn watch(&mut self) -> Result<mpsc::Receiver<ClipboardTransaction>, ClipboardError> {
        let (tx, rx) = mpsc::channel(16);
        self.state.lock().unwrap().watchers.push(tx);
        Ok(rx)
    }
}
