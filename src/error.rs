//! Unified error type for readme-collage.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can abort a README refresh.
#[derive(Debug, Error)]
pub enum ReadmeError {
    /// The HTTP request could not be built (bad URL, bad header value).
    #[error("creating request: {0}")]
    Request(String),

    /// The request failed in flight, including the per-request timeout.
    #[error("making request: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with anything but 200 OK.
    #[error("unexpected status code: {0}")]
    Status(u16),

    /// The response body could not be read to the end.
    #[error("reading response body: {0}")]
    Body(#[source] reqwest::Error),

    /// The whole fetch took longer than the overall deadline.
    #[error("fetch exceeded the {0:?} deadline")]
    Deadline(Duration),

    /// A recorded transport failure served from a cassette.
    #[error("replayed failure: {0}")]
    Replay(String),

    /// The MIME type is not one of webp, jpeg, png.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),

    /// The payload failed to decode as its declared type.
    #[error("invalid image data for {mime}: {source}")]
    InvalidImage {
        /// MIME type the decoder was selected for.
        mime: String,
        /// Decoder error.
        #[source]
        source: image::ImageError,
    },

    /// An output file could not be written.
    #[error("writing {}: {source}", path.display())]
    Write {
        /// Target path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The template file could not be read.
    #[error("reading {}: {source}", path.display())]
    TemplateRead {
        /// Template path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The template has invalid syntax.
    #[error("parsing template: {0}")]
    TemplateParse(String),

    /// The template references something that cannot be rendered.
    #[error("executing template: {0}")]
    TemplateExecute(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Cassette could not be loaded or saved.
    #[error("Cassette error: {0}")]
    Cassette(String),

    /// A pipeline stage failed; `stage` names it.
    #[error("{stage}: {source}")]
    Stage {
        /// Stage description, e.g. `Failed to fetch image`.
        stage: &'static str,
        /// What went wrong inside the stage.
        #[source]
        source: Box<ReadmeError>,
    },
}

impl ReadmeError {
    /// Attribute this error to a pipeline stage.
    #[must_use]
    pub fn in_stage(self, stage: &'static str) -> Self {
        Self::Stage { stage, source: Box::new(self) }
    }
}
