//! On-disk cassette format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ports::RawResponse;

/// A recorded session of collage fetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable name, usually the recording timestamp.
    pub name: String,
    /// When the cassette was written.
    pub recorded_at: DateTime<Utc>,
    /// Recorded exchanges in the order they happened.
    pub interactions: Vec<Interaction>,
}

/// One recorded HTTP exchange.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the recording, starting at zero.
    pub seq: u64,
    /// URL that was requested.
    pub url: String,
    /// What the transport produced.
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub outcome: Outcome,
}

/// Result of a recorded exchange, serialized as `Ok:` / `Err:`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Outcome {
    /// The server answered (any status).
    Ok(RawResponse),
    /// The transport failed; the error message is kept.
    Err(String),
}
