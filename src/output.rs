//! Turning the fetched image into a reference, and writing output files.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use base64::Engine;
use serde::Deserialize;
use tracing::info;

use crate::error::ReadmeError;
use crate::fetch::FetchedImage;
use crate::media::MediaKind;

/// How the image ends up referenced from the README.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedMode {
    /// Base64 data URI of the original bytes.
    #[default]
    Inline,
    /// Raw bytes saved next to the README, referenced by relative path.
    File,
}

impl FromStr for EmbedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inline" => Ok(Self::Inline),
            "file" => Ok(Self::File),
            other => Err(format!("Unsupported embed mode '{other}'. Valid: inline, file")),
        }
    }
}

impl fmt::Display for EmbedMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Inline => "inline",
            Self::File => "file",
        })
    }
}

/// Where a file-mode image is saved.
#[derive(Debug, Clone)]
pub struct ImageTarget<'a> {
    /// Directory, relative to the working directory.
    pub dir: &'a str,
    /// File name without extension.
    pub name: &'a str,
}

impl ImageTarget<'_> {
    /// Relative path for `kind`, always with `/` separators.
    #[must_use]
    pub fn reference(&self, kind: MediaKind) -> String {
        let dir = self.dir.trim_end_matches('/');
        let file = format!("{}.{}", self.name, kind.extension());
        if dir.is_empty() {
            file
        } else {
            format!("{dir}/{file}")
        }
    }
}

/// Format the original bytes as a `data:` URI, no re-encoding.
#[must_use]
pub fn data_uri(data: &[u8], mime: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(data);
    format!("data:{mime};base64,{encoded}")
}

/// Produce the image reference for the template according to `mode`.
///
/// In file mode the image is written to disk before returning.
///
/// # Errors
///
/// Returns [`ReadmeError::Write`] if the image file cannot be written.
pub fn materialize(
    image: &FetchedImage,
    kind: MediaKind,
    mode: EmbedMode,
    target: &ImageTarget<'_>,
) -> Result<String, ReadmeError> {
    match mode {
        EmbedMode::Inline => Ok(data_uri(&image.data, &image.mime_type)),
        EmbedMode::File => {
            let reference = target.reference(kind);
            let path = PathBuf::from(&reference);
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .map_err(|source| ReadmeError::Write { path: parent.to_path_buf(), source })?;
            }
            write_atomic(&path, &image.data)?;
            info!(path = %path.display(), bytes = image.data.len(), "saved image");
            Ok(reference)
        }
    }
}

/// Overwrite the output document with `text`.
///
/// # Errors
///
/// Returns [`ReadmeError::Write`] on any I/O failure.
pub fn write_document(path: &Path, text: &str) -> Result<(), ReadmeError> {
    write_atomic(path, text.as_bytes())?;
    info!(path = %path.display(), bytes = text.len(), "wrote document");
    Ok(())
}

/// Write to a temporary sibling, then rename it over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> Result<(), ReadmeError> {
    let write_err = |source| ReadmeError::Write { path: path.to_path_buf(), source };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp =
        tempfile::Builder::new().prefix(".readme-collage-").tempfile_in(dir).map_err(write_err)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o644))
            .map_err(write_err)?;
    }
    tmp.write_all(data).map_err(write_err)?;
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|e| write_err(e.error))?;
    Ok(())
}
