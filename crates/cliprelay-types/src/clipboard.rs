//! Clipboard content types.
//!
//! A [`ClipboardContent`] is one representation of a clipboard event. The
//! variant is the format tag and fixes the payload type, so consumers match on
//! it instead of comparing format strings.

use std::convert::Infallible;
use std::str::FromStr;

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Format tag of a clipboard representation.
///
/// Serialises as its canonical string (`text/plain`, `image/png`, ...), so it
/// reads naturally in configuration files.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Encode, Decode)]
#[serde(from = "String", into = "String")]
pub enum ClipboardFormat {
    /// Plain UTF-8 text.
    PlainText,
    /// HTML fragment.
    Html,
    /// Rich Text Format.
    RichText,
    /// PNG image data.
    Png,
    /// Device-independent bitmap.
    Bitmap,
    /// List of file paths.
    FileList,
    /// Any format this crate has no dedicated variant for. Parsed tags are
    /// lowercased, since MIME types compare case-insensitively.
    Other(String),
}

impl ClipboardFormat {
    /// Canonical string form of the tag.
    pub fn as_str(&self) -> &str {
        match self {
            Self::PlainText => "text/plain",
            Self::Html => "text/html",
            Self::RichText => "text/rtf",
            Self::Png => "image/png",
            Self::Bitmap => "image/bmp",
            Self::FileList => "file-list",
            Self::Other(name) => name,
        }
    }

    /// Whether payloads of this format are UTF-8 text.
    #[must_use]
    pub fn is_textual(&self) -> bool {
        matches!(self, Self::PlainText | Self::Html | Self::RichText)
    }
}

impl std::fmt::Display for ClipboardFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClipboardFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        let format = match tag.as_str() {
            "text/plain" | "text" | "utf8" | "utf8_string" => Self::PlainText,
            "text/html" | "html" => Self::Html,
            "text/rtf" | "application/rtf" | "rtf" => Self::RichText,
            "image/png" | "png" => Self::Png,
            "image/bmp" | "bmp" | "dib" => Self::Bitmap,
            "file-list" | "files" | "text/uri-list" => Self::FileList,
            _ => Self::Other(tag),
        };
        Ok(format)
    }
}

impl From<String> for ClipboardFormat {
    fn from(s: String) -> Self {
        match s.parse() {
            Ok(format) => format,
            Err(never) => match never {},
        }
    }
}

impl From<ClipboardFormat> for String {
    fn from(format: ClipboardFormat) -> Self {
        format.to_string()
    }
}

/// One typed representation of clipboard data.
///
/// Values are immutable once built: a transaction hands out shared
/// references, and consumers that need to keep an item clone it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum ClipboardContent {
    Text(String),
    Html(String),
    RichText(String),
    Png(Vec<u8>),
    Bitmap(Vec<u8>),
    FileList(Vec<String>),
    /// Opaque payload for a format without a dedicated variant.
    Other { format: String, data: Vec<u8> },
}

impl ClipboardContent {
    /// Create text clipboard content.
    #[must_use]
    pub fn text(s: &str) -> Self {
        Self::Text(s.to_string())
    }

    /// Create HTML clipboard content.
    #[must_use]
    pub fn html(s: &str) -> Self {
        Self::Html(s.to_string())
    }

    /// Build content for `format` from raw bytes.
    ///
    /// Textual formats must be valid UTF-8; file lists are newline-separated
    /// paths. Returns `None` if the bytes do not fit the format.
    #[must_use]
    pub fn from_bytes(format: ClipboardFormat, data: Vec<u8>) -> Option<Self> {
        let content = match format {
            ClipboardFormat::PlainText => Self::Text(String::from_utf8(data).ok()?),
            ClipboardFormat::Html => Self::Html(String::from_utf8(data).ok()?),
            ClipboardFormat::RichText => Self::RichText(String::from_utf8(data).ok()?),
            ClipboardFormat::Png => Self::Png(data),
            ClipboardFormat::Bitmap => Self::Bitmap(data),
            ClipboardFormat::FileList => {
                let list = String::from_utf8(data).ok()?;
                Self::FileList(
                    list.lines()
                        .filter(|line| !line.is_empty())
                        .map(str::to_string)
                        .collect(),
                )
            }
            ClipboardFormat::Other(format) => Self::Other { format, data },
        };
        Some(content)
    }

    /// The format tag of this representation.
    pub fn format(&self) -> ClipboardFormat {
        match self {
            Self::Text(_) => ClipboardFormat::PlainText,
            Self::Html(_) => ClipboardFormat::Html,
            Self::RichText(_) => ClipboardFormat::RichText,
            Self::Png(_) => ClipboardFormat::Png,
            Self::Bitmap(_) => ClipboardFormat::Bitmap,
            Self::FileList(_) => ClipboardFormat::FileList,
            Self::Other { format, .. } => ClipboardFormat::Other(format.to_ascii_lowercase()),
        }
    }

    /// Borrow the payload as text, for textual formats.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) | Self::Html(s) | Self::RichText(s) => Some(s),
            _ => None,
        }
    }

    /// Size of the payload in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Text(s) | Self::Html(s) | Self::RichText(s) => s.len(),
            Self::Png(data) | Self::Bitmap(data) | Self::Other { data, .. } => data.len(),
            // One separator per path.
            Self::FileList(paths) => paths.iter().map(|p| p.len() + 1).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_text_roundtrip() {
        let content = ClipboardContent::text("hello clipboard");
        let config = bincode::config::standard();
        let bytes = bincode::encode_to_vec(&content, config).unwrap();
        let (decoded, _): (ClipboardContent, _) =
            bincode::decode_from_slice(&bytes, config).unwrap();
        assert_eq!(content, decoded);
        assert_eq!(decoded.as_text(), Some("hello clipboard"));
    }

    #[test]
    fn png_has_no_text() {
        let content = ClipboardContent::Png(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A]);
        assert_eq!(content.format(), ClipboardFormat::Png);
        assert_eq!(content.as_text(), None);
    }

    #[test]
    fn clipboard_size() {
        assert_eq!(ClipboardContent::text("abc").size(), 3);
        assert_eq!(ClipboardContent::Bitmap(vec![0; 16]).size(), 16);
        let files = ClipboardContent::FileList(vec!["/a".into(), "/bc".into()]);
        assert_eq!(files.size(), 7);
    }

    #[test]
    fn format_tag_follows_variant() {
        let other = ClipboardContent::Other {
            format: "application/x-custom".to_string(),
            data: vec![1, 2, 3],
        };
        assert_eq!(
            other.format(),
            ClipboardFormat::Other("application/x-custom".to_string())
        );
        assert_eq!(ClipboardContent::html("<b>x</b>").format(), ClipboardFormat::Html);
    }

    #[test]
    fn parse_canonical_and_aliases() {
        assert_eq!("text/plain".parse::<ClipboardFormat>(), Ok(ClipboardFormat::PlainText));
        assert_eq!("HTML".parse::<ClipboardFormat>(), Ok(ClipboardFormat::Html));
        assert_eq!("files".parse::<ClipboardFormat>(), Ok(ClipboardFormat::FileList));
        assert_eq!(
            "application/x-thing".parse::<ClipboardFormat>(),
            Ok(ClipboardFormat::Other("application/x-thing".to_string()))
        );
    }

    #[test]
    fn other_tags_ignore_case() {
        let upper: ClipboardFormat = "Application/X-Foo".parse().unwrap();
        let lower: ClipboardFormat = "application/x-foo".parse().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(upper.as_str(), "application/x-foo");
        let from_config: ClipboardFormat = serde_json::from_str("\"APPLICATION/X-FOO\"").unwrap();
        assert_eq!(from_config, lower);

        let content = ClipboardContent::Other {
            format: "Application/X-Foo".to_string(),
            data: vec![0],
        };
        assert_eq!(content.format(), lower);
    }

    #[test]
    fn display_is_canonical() {
        for format in [
            ClipboardFormat::PlainText,
            ClipboardFormat::Html,
            ClipboardFormat::RichText,
            ClipboardFormat::Png,
            ClipboardFormat::Bitmap,
            ClipboardFormat::FileList,
        ] {
            assert_eq!(format.to_string().parse::<ClipboardFormat>(), Ok(format));
        }
    }

    #[test]
    fn format_serde_as_string() {
        let json = serde_json::to_string(&ClipboardFormat::Html).unwrap();
        assert_eq!(json, "\"text/html\"");
        let decoded: ClipboardFormat = serde_json::from_str("\"image/bmp\"").unwrap();
        assert_eq!(decoded, ClipboardFormat::Bitmap);
    }

    #[test]
    fn from_bytes_checks_payload() {
        assert_eq!(
            ClipboardContent::from_bytes(ClipboardFormat::PlainText, b"hi".to_vec()),
            Some(ClipboardContent::text("hi"))
        );
        assert_eq!(
            ClipboardContent::from_bytes(ClipboardFormat::Html, vec![0xff, 0xfe]),
            None
        );
        assert_eq!(
            ClipboardContent::from_bytes(ClipboardFormat::FileList, b"/a\n/b\n".to_vec()),
            Some(ClipboardContent::FileList(vec!["/a".into(), "/b".into()]))
        );
    }
}
