//! Live adapter that fetches the collage over HTTP with reqwest.

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::debug;

use crate::error::ReadmeError;
use crate::ports::image_source::{FetchFuture, FetchRequest, ImageSource, RawResponse};

/// Live image source backed by a shared reqwest client.
pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    /// Create a new HTTP image source.
    #[must_use]
    pub fn new() -> Self {
        Self { client: Client::new() }
    }
}

impl Default for HttpImageSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageSource for HttpImageSource {
    fn get(&self, request: &FetchRequest) -> FetchFuture<'_> {
        let request = request.clone();
        Box::pin(async move {
            let http_request = self
                .client
                .get(&request.url)
                .header(USER_AGENT, &request.user_agent)
                .timeout(request.timeout)
                .build()
                .map_err(|e| ReadmeError::Request(e.to_string()))?;

            let response = self.client.execute(http_request).await.map_err(ReadmeError::Network)?;

            let status = response.status().as_u16();
            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            debug!(status, content_type = content_type.as_deref(), "response headers received");

            let body = response.bytes().await.map_err(ReadmeError::Body)?.to_vec();

            Ok(RawResponse { status, content_type, body })
        })
    }
}
