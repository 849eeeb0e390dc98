//! Replaying adapter for the `ImageSource` port.

use std::sync::{Arc, Mutex};

use tracing::warn;

use crate::cassette::format::Outcome;
use crate::cassette::replayer::CassetteReplayer;
use crate::error::ReadmeError;
use crate::ports::image_source::{FetchFuture, FetchRequest, ImageSource};

/// Serves recorded responses from a cassette instead of the network.
pub struct ReplayingImageSource {
    replayer: Arc<Mutex<CassetteReplayer>>,
}

impl ReplayingImageSource {
    /// Create a replaying source backed by the given replayer.
    #[must_use]
    pub fn new(replayer: Arc<Mutex<CassetteReplayer>>) -> Self {
        Self { replayer }
    }
}

impl ImageSource for ReplayingImageSource {
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let next = self
            .replayer
            .lock()
            .map_err(|e| format!("replayer lock poisoned: {e}"))
            .and_then(|mut guard| guard.next_interaction());
        let url = request.url.clone();

        Box::pin(async move {
            let interaction = next.map_err(ReadmeError::Cassette)?;
            if interaction.url != url {
                warn!(recorded = %interaction.url, requested = %url, "cassette URL differs from request");
            }
            match interaction.outcome {
                Outcome::Ok(response) => Ok(response),
                Outcome::Err(message) => Err(ReadmeError::Replay(message)),
            }
        })
    }
}
