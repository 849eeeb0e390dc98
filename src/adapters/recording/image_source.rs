//! Recording adapter for the `ImageSource` port.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::cassette::format::Outcome;
use crate::cassette::recorder::CassetteRecorder;
use crate::ports::image_source::{FetchFuture, FetchRequest, ImageSource};

/// Records every exchange while delegating to an inner implementation.
pub struct RecordingImageSource {
    inner: Box<dyn ImageSource>,
    recorder: Arc<Mutex<CassetteRecorder>>,
}

impl RecordingImageSource {
    /// Creates a new recording source wrapping the given implementation.
    pub fn new(inner: Box<dyn ImageSource>, recorder: Arc<Mutex<CassetteRecorder>>) -> Self {
        Self { inner, recorder }
    }
}

impl ImageSource for RecordingImageSource {
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let request = request.clone();
        let recorder = Arc::clone(&self.recorder);

        Box::pin(async move {
            let result = self.inner.get(&request).await;
            let outcome = match &result {
                Ok(response) => Outcome::Ok(response.clone()),
                Err(e) => Outcome::Err(e.to_string()),
            };
            match recorder.lock() {
                Ok(mut guard) => guard.record(&request.url, outcome),
                Err(_) => warn!(url = %request.url, "recorder lock poisoned, exchange dropped"),
            }
            result
        })
    }
}
