//! Desktop clipboard backend built on arboard.
//!
//! Supports HTML, plain text and images (carried as PNG). arboard calls
//! block, so every operation runs on the blocking pool with a clipboard
//! handle opened for that call.
//!
//! On Linux the writing process owns the selection. `write` therefore keeps
//! serving the content until another application takes the clipboard over.

use std::borrow::Cow;
use std::io::Cursor;

use async_trait::async_trait;
use cliprelay_types::{ClipboardContent, ClipboardFormat, ClipboardTransaction};
use tokio::sync::mpsc;
use tracing::debug;

use crate::error::ClipboardError;
use crate::{check_size, ClipboardProvider};

const SUPPORTED: [ClipboardFormat; 3] = [
    ClipboardFormat::Html,
    ClipboardFormat::PlainText,
    ClipboardFormat::Png,
];

/// The clipboard of the local desktop session.
pub struct SystemClipboard {
    max_size: usize,
}

impl SystemClipboard {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

/// What a write puts on the desktop clipboard.
#[derive(Debug, PartialEq, Eq)]
enum Selection {
    Html { html: String, alt_text: Option<String> },
    Text(String),
    Image { width: usize, height: usize, rgba: Vec<u8> },
}

/// Pick the first representation the desktop clipboard can hold.
///
/// Plain text offered alongside HTML becomes its fallback.
fn plan_write(transaction: &mut ClipboardTransaction) -> Result<Selection, ClipboardError> {
    let content = transaction
        .select(&SUPPORTED)
        .cloned()
        .ok_or(ClipboardError::FormatUnavailable)?;

    match content {
        ClipboardContent::Html(html) => {
            let alt_text = transaction
                .select(&[ClipboardFormat::PlainText])
                .and_then(ClipboardContent::as_text)
                .map(str::to_string);
            Ok(Selection::Html { html, alt_text })
        }
        ClipboardContent::Text(text) => Ok(Selection::Text(text)),
        ClipboardContent::Png(png) => {
            let (width, height, rgba) = decode_png(&png)?;
            Ok(Selection::Image {
                width,
                height,
                rgba,
            })
        }
        _ => Err(ClipboardError::FormatUnavailable),
    }
}

fn image_error(err: image::ImageError) -> ClipboardError {
    ClipboardError::Other(anyhow::Error::new(err))
}

fn encode_png(width: usize, height: usize, rgba: Vec<u8>) -> Result<Vec<u8>, ClipboardError> {
    let width = u32::try_from(width).map_err(|e| ClipboardError::Other(e.into()))?;
    let height = u32::try_from(height).map_err(|e| ClipboardError::Other(e.into()))?;
    let image = image::RgbaImage::from_raw(width, height, rgba).ok_or_else(|| {
        ClipboardError::Other(anyhow::anyhow!(
            "image buffer does not match {width}x{height} RGBA"
        ))
    })?;

    let mut png = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
        .map_err(image_error)?;
    Ok(png)
}

fn decode_png(png: &[u8]) -> Result<(usize, usize, Vec<u8>), ClipboardError> {
    let image = image::load_from_memory_with_format(png, image::ImageFormat::Png)
        .map_err(image_error)?
        .to_rgba8();
    let (width, height) = image.dimensions();
    Ok((width as usize, height as usize, image.into_raw()))
}

fn map_error(err: arboard::Error) -> ClipboardError {
    match err {
        arboard::Error::ContentNotAvailable => ClipboardError::FormatUnavailable,
        arboard::Error::ClipboardNotSupported => ClipboardError::Unavailable,
        arboard::Error::ClipboardOccupied => ClipboardError::AccessDenied,
        other => ClipboardError::Other(anyhow::Error::new(other)),
    }
}

/// Treat "nothing in this format" as absent rather than an error.
fn optional<T>(result: Result<T, arboard::Error>) -> Result<Option<T>, ClipboardError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(map_error(e)),
    }
}

async fn blocking<T, F>(f: F) -> Result<T, ClipboardError>
where
    T: Send + 'static,
    F: FnOnce(&mut arboard::Clipboard) -> Result<T, ClipboardError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut clipboard = arboard::Clipboard::new().map_err(map_error)?;
        f(&mut clipboard)
    })
    .await
    .map_err(|e| ClipboardError::Other(anyhow::Error::new(e)))?
}

/// Every representation on the clipboard, most preferred first. A
/// representation that fails to convert is skipped.
fn read_all(clipboard: &mut arboard::Clipboard) -> Result<Vec<ClipboardContent>, ClipboardError> {
    let mut contents = Vec::new();

    if let Some(html) = optional(clipboard.get().html())? {
        contents.push(ClipboardContent::Html(html));
    }
    if let Some(text) = optional(clipboard.get_text())? {
        contents.push(ClipboardContent::Text(text));
    }
    if let Some(image) = optional(clipboard.get_image())? {
        match encode_png(image.width, image.height, image.bytes.into_owned()) {
            Ok(png) => contents.push(ClipboardContent::Png(png)),
            Err(e) => debug!(error = %e, "skipping unreadable clipboard image"),
        }
    }
    Ok(contents)
}

fn apply(clipboard: &mut arboard::Clipboard, selection: Selection) -> Result<(), ClipboardError> {
    let set = clipboard.set();
    #[cfg(target_os = "linux")]
    let set = {
        use arboard::SetExtLinux;
        set.wait()
    };

    let result = match selection {
        Selection::Html { html, alt_text } => set.html(html, alt_text),
        Selection::Text(text) => set.text(text),
        Selection::Image {
            width,
            height,
            rgba,
        } => set.image(arboard::ImageData {
            width,
            height,
            bytes: Cow::Owned(rgba),
        }),
    };
    result.map_err(map_error)
}

#[async_trait]
impl ClipboardProvider for SystemClipboard {
    async fn read(&self) -> Result<ClipboardTransaction, ClipboardError> {
        let contents = blocking(read_all).await?;
        let mut transaction = ClipboardTransaction::init();
        for content in contents {
            transaction.add_content(content)?;
        }
        check_size(&transaction, self.max_size)?;
        debug!(
            transaction = %transaction.id(),
            items = transaction.len(),
            "read system clipboard"
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

        let selection = plan_write(&mut transaction)?;
        debug!(transaction = %id, "writing system clipboard");
        blocking(move |clipboard| apply(clipboard, selection)).await
    }

    async fn available_formats(&self) -> Result<Vec<ClipboardFormat>, ClipboardError> {
        let contents = blocking(read_all).await?;
        Ok(contents.iter().map(ClipboardContent::format).collect())
    }

    async fn watch(&mut self) -> Result<mpsc::Receiver<ClipboardTransaction>, ClipboardError> {
        Err(ClipboardError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction(contents: Vec<ClipboardContent>) -> ClipboardTransaction {
        let mut tx = ClipboardTransaction::init();
        for content in contents {
            tx.add_content(content).unwrap();
        }
        tx
    }

    #[test]
    fn html_takes_plain_text_as_fallback() {
        let mut tx = transaction(vec![
            ClipboardContent::html("<b>hello</b>"),
            ClipboardContent::text("hello"),
        ]);
        assert_eq!(
            plan_write(&mut tx).unwrap(),
            Selection::Html {
                html: "<b>hello</b>".to_string(),
                alt_text: Some("hello".to_string()),
            }
        );
    }

    #[test]
    fn producer_order_decides() {
        let mut tx = transaction(vec![
            ClipboardContent::FileList(vec!["/tmp/a".into()]),
            ClipboardContent::text("hello"),
            ClipboardContent::html("<b>hello</b>"),
        ]);
        assert_eq!(
            plan_write(&mut tx).unwrap(),
            Selection::Text("hello".to_string())
        );
    }

    #[test]
    fn png_is_written_as_rgba() {
        let rgba = vec![255, 0, 0, 255, 0, 0, 255, 128];
        let png = encode_png(2, 1, rgba.clone()).unwrap();
        let mut tx = transaction(vec![ClipboardContent::Png(png)]);
        assert_eq!(
            plan_write(&mut tx).unwrap(),
            Selection::Image {
                width: 2,
                height: 1,
                rgba,
            }
        );
    }

    #[test]
    fn unsupported_only_is_unavailable() {
        let mut tx = transaction(vec![ClipboardContent::Bitmap(vec![0; 8])]);
        assert!(matches!(
            plan_write(&mut tx),
            Err(ClipboardError::FormatUnavailable)
        ));
    }

    #[test]
    fn corrupt_png_is_rejected() {
        let mut tx = transaction(vec![ClipboardContent::Png(vec![1, 2, 3])]);
        assert!(matches!(plan_write(&mut tx), Err(ClipboardError::Other(_))));
    }

    #[test]
    fn mismatched_image_buffer_is_rejected() {
        assert!(encode_png(4, 4, vec![0; 3]).is_err());
    }
}
