//! Supported media kinds, MIME sniffing and decode validation.

use image::ImageFormat;
use tracing::debug;

use crate::error::ReadmeError;

/// Fallback MIME type when the bytes match no known signature.
const OCTET_STREAM: &str = "application/octet-stream";

/// Image kinds the pipeline accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// WebP.
    WebP,
    /// JPEG.
    Jpeg,
    /// PNG.
    Png,
}

/// MIME prefix → kind. Matching is case-insensitive on the prefix so that
/// parameters like `; charset=binary` are tolerated.
const MIME_TABLE: &[(&str, MediaKind)] = &[
    ("image/webp", MediaKind::WebP),
    ("image/jpeg", MediaKind::Jpeg),
    ("image/png", MediaKind::Png),
];

impl MediaKind {
    /// Resolve a MIME type to a supported kind.
    ///
    /// # Errors
    ///
    /// Returns [`ReadmeError::UnsupportedType`] for anything outside the table.
    pub fn from_mime(mime: &str) -> Result<Self, ReadmeError> {
        let lowered = mime.trim().to_ascii_lowercase();
        MIME_TABLE
            .iter()
            .find(|(prefix, _)| lowered.starts_with(prefix))
            .map(|&(_, kind)| kind)
            .ok_or_else(|| ReadmeError::UnsupportedType(mime.to_string()))
    }

    /// File extension used when saving, without the dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::WebP => "webp",
            Self::Jpeg => "jpg",
            Self::Png => "png",
        }
    }

    /// Decoder format for this kind.
    #[must_use]
    pub const fn image_format(self) -> ImageFormat {
        match self {
            Self::WebP => ImageFormat::WebP,
            Self::Jpeg => ImageFormat::Jpeg,
            Self::Png => ImageFormat::Png,
        }
    }
}

/// Guess a MIME type from the leading bytes.
#[must_use]
pub fn sniff_mime(data: &[u8]) -> String {
    image::guess_format(data)
        .map_or_else(|_| OCTET_STREAM.to_string(), |format| format.to_mime_type().to_string())
}

/// Fully decode `data` as `mime` to prove it is a well-formed image.
///
/// The decoded pixels are dropped; only the verdict matters.
///
/// # Errors
///
/// Returns [`ReadmeError::UnsupportedType`] if `mime` is not webp, jpeg or
/// png, and [`ReadmeError::InvalidImage`] if the decoder rejects the bytes.
pub fn validate(data: &[u8], mime: &str) -> Result<MediaKind, ReadmeError> {
    let kind = MediaKind::from_mime(mime)?;
    let decoded = image::load_from_memory_with_format(data, kind.image_format())
        .map_err(|source| ReadmeError::InvalidImage { mime: mime.to_string(), source })?;
    debug!(width = decoded.width(), height = decoded.height(), ?kind, "image decoded");
    Ok(kind)
}
