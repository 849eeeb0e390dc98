//! Service context that bundles the port trait objects for a run.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::adapters::live::http::HttpImageSource;
use crate::adapters::recording::image_source::RecordingImageSource;
use crate::adapters::replaying::image_source::ReplayingImageSource;
use crate::cassette::config::load_cassette;
use crate::cassette::recorder::CassetteRecorder;
use crate::error::ReadmeError;
use crate::ports::ImageSource;

/// Where recordings are written, relative to the working directory.
///
/// Only `COLLAGE_REC` runs write here; a normal run leaves nothing but the
/// README and image behind.
const CASSETTE_DIR: &str = ".readme-collage/cassettes";

/// Bundles all port trait objects into a single context.
pub struct ServiceContext {
    /// Image source port.
    pub source: Box<dyn ImageSource>,
}

/// Handle to a recording session that must be finished after use.
pub struct RecordingSession {
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingSession {
    /// Finish the recording and write the cassette file to disk.
    ///
    /// The owning [`ServiceContext`] must be dropped first.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be written.
    pub fn finish(self) -> Result<PathBuf, ReadmeError> {
        let recorder = Arc::try_unwrap(self.recorder)
            .map_err(|_| ReadmeError::Cassette("recording adapter still has references".into()))?
            .into_inner()
            .map_err(|e| ReadmeError::Cassette(format!("recorder lock poisoned: {e}")))?;
        recorder
            .finish()
            .map_err(|e| ReadmeError::Cassette(format!("failed to write cassette: {e}")))
    }
}

impl ServiceContext {
    /// Create a live context.
    #[must_use]
    pub fn live() -> Self {
        Self { source: Box::new(HttpImageSource::new()) }
    }

    /// Create a recording context that wraps the live source with a recorder.
    ///
    /// Development aid: the cassette lands under `.readme-collage/cassettes/`,
    /// outside the tool's normal outputs.
    #[must_use]
    pub fn recording() -> (Self, RecordingSession) {
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
        let path = cassette_path(&timestamp);
        let recorder = Arc::new(Mutex::new(CassetteRecorder::new(
            path,
            format!("{timestamp}-image_source"),
        )));

        let source = RecordingImageSource::new(Self::live().source, Arc::clone(&recorder));
        (Self { source: Box::new(source) }, RecordingSession { recorder })
    }

    /// Create a replaying context from a cassette file.
    ///
    /// # Errors
    ///
    /// Returns an error if the cassette file cannot be loaded.
    pub fn replaying(path: &Path) -> Result<Self, ReadmeError> {
        let replayer = load_cassette(path).map_err(ReadmeError::Cassette)?;
        let source = ReplayingImageSource::new(Arc::new(Mutex::new(replayer)));
        Ok(Self { source: Box::new(source) })
    }
}

/// Cassette file for a recording started at `timestamp`.
fn cassette_path(timestamp: &str) -> PathBuf {
    PathBuf::from(CASSETTE_DIR).join(timestamp).join("image_source.cassette.yaml")
}
