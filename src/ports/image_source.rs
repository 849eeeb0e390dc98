//! Image source port: the HTTP boundary the collage is fetched across.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ReadmeError;

/// A single GET to issue against the collage service.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Fully built URL, query string included.
    pub url: String,
    /// Value of the `User-Agent` header.
    pub user_agent: String,
    /// Per-request timeout, shorter than the overall deadline.
    pub timeout: Duration,
}

/// What came back over the wire, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header, if the server sent one.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Response body (stored as base64 in cassettes).
    #[serde(with = "base64_bytes")]
    pub body: Vec<u8>,
}

/// Boxed future type returned by [`ImageSource::get`].
pub type FetchFuture<'a> =
    Pin<Box<dyn Future<Output = Result<RawResponse, ReadmeError>> + Send + 'a>>;

/// Performs the raw HTTP exchange for a [`FetchRequest`].
///
/// Implementations must not interpret the status code; that is the
/// fetcher's job so that every adapter shares the same rules.
pub trait ImageSource: Send + Sync {
    /// Issue the request and return the raw response.
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_>;
}

/// Serde helper for serializing `Vec<u8>` as base64 strings in cassettes.
mod base64_bytes {
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(data: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(data);
        serializer.serialize_str(&encoded)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(deserializer)?;
        base64::engine::general_purpose::STANDARD.decode(s.trim()).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_base64_in_yaml() {
        let response = RawResponse {
            status: 200,
            content_type: Some("image/png".into()),
            body: vec![0x89, 0x50, 0x4E, 0x47],
        };
        let yaml = serde_yaml::to_string(&response).unwrap();
        assert!(yaml.contains("iVBORw=="), "got: {yaml}");

        let back: RawResponse = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, response);
    }

    #[test]
    fn missing_content_type_is_none() {
        let back: RawResponse = serde_yaml::from_str("status: 404\nbody: ''\n").unwrap();
        assert_eq!(back.status, 404);
        assert!(back.content_type.is_none());
        assert!(back.body.is_empty());
    }
}
