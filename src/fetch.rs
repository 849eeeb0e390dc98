//! Fetching the collage: deadline, status check and MIME resolution.

use std::time::Duration;

use tracing::debug;

use crate::error::ReadmeError;
use crate::media::sniff_mime;
use crate::ports::{FetchRequest, ImageSource};

/// Image bytes as fetched, with the MIME type they were served as.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    /// Raw, unmodified response body.
    pub data: Vec<u8>,
    /// `Content-Type` header, or a type sniffed from the bytes.
    pub mime_type: String,
}

/// Fetch the image through `source`, bounded by `deadline`.
///
/// # Errors
///
/// Returns [`ReadmeError::Deadline`] if the deadline passes first,
/// [`ReadmeError::Status`] for any status other than 200 OK, and whatever the
/// source reports for transport failures.
pub async fn fetch_image(
    source: &dyn ImageSource,
    request: &FetchRequest,
    deadline: Duration,
) -> Result<FetchedImage, ReadmeError> {
    let response = tokio::time::timeout(deadline, source.get(request))
        .await
        .map_err(|_| ReadmeError::Deadline(deadline))??;

    if response.status != 200 {
        return Err(ReadmeError::Status(response.status));
    }

    let mime_type = match response.content_type {
        Some(ct) if !ct.trim().is_empty() => ct.trim().to_string(),
        _ => {
            let sniffed = sniff_mime(&response.body);
            debug!(mime = %sniffed, "no content-type header, sniffed from body");
            sniffed
        }
    };
    debug!(bytes = response.body.len(), mime = %mime_type, "fetched image");

    Ok(FetchedImage { data: response.body, mime_type })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::image_source::{FetchFuture, RawResponse};

    struct StubSource {
        response: RawResponse,
        delay: Duration,
    }

    impl ImageSource for StubSource {
        fn get(&self, _request: &FetchRequest) -> FetchFuture<'_> {
            let response = self.response.clone();
            let delay = self.delay;
            Box::pin(async move {
                tokio::time::sleep(delay).await;
                Ok(response)
            })
        }
    }

    fn stub(status: u16, content_type: Option<&str>, body: &[u8]) -> StubSource {
        StubSource {
            response: RawResponse {
                status,
                content_type: content_type.map(str::to_string),
                body: body.to_vec(),
            },
            delay: Duration::ZERO,
        }
    }

    fn request() -> FetchRequest {
        FetchRequest {
            url: "https://songstitch.art/collage".into(),
            user_agent: "ua".into(),
            timeout: Duration::from_secs(1),
        }
    }

    const PNG_MAGIC: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];

    #[tokio::test]
    async fn header_mime_wins() {
        let source = stub(200, Some("image/jpeg"), PNG_MAGIC);
        let image = fetch_image(&source, &request(), Duration::from_secs(5)).await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, PNG_MAGIC);
    }

    #[tokio::test]
    async fn missing_header_falls_back_to_sniffing() {
        let source = stub(200, None, PNG_MAGIC);
        let image = fetch_image(&source, &request(), Duration::from_secs(5)).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn blank_header_falls_back_to_sniffing() {
        let source = stub(200, Some("  "), PNG_MAGIC);
        let image = fetch_image(&source, &request(), Duration::from_secs(5)).await.unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn non_success_status_is_fatal() {
        for status in [203, 206, 301, 404, 500] {
            let source = stub(status, Some("image/png"), PNG_MAGIC);
            let err = fetch_image(&source, &request(), Duration::from_secs(5)).await.unwrap_err();
            assert!(matches!(err, ReadmeError::Status(s) if s == status), "got {err}");
        }
    }

    #[tokio::test]
    async fn deadline_abandons_slow_source() {
        let mut source = stub(200, Some("image/png"), PNG_MAGIC);
        source.delay = Duration::from_secs(10);
        let err = fetch_image(&source, &request(), Duration::from_millis(50)).await.unwrap_err();
        assert!(matches!(err, ReadmeError::Deadline(_)), "got {err}");
    }
}
