//! Building the songstitch.art collage URL.

use reqwest::Url;

use crate::config::{CollageConfig, SourceConfig};
use crate::error::ReadmeError;

/// Collage endpoint.
const COLLAGE_ENDPOINT: &str = "https://songstitch.art/collage";

/// Build the collage URL from its parameters, in the order the service
/// documents them.
///
/// # Errors
///
/// Returns [`ReadmeError::Request`] if the endpoint cannot be parsed.
pub fn collage_url(collage: &CollageConfig) -> Result<Url, ReadmeError> {
    let mut url =
        Url::parse(COLLAGE_ENDPOINT).map_err(|e| ReadmeError::Request(e.to_string()))?;
    url.query_pairs_mut()
        .append_pair("username", &collage.username)
        .append_pair("method", &collage.method)
        .append_pair("period", &collage.period)
        .append_pair("artist", flag(collage.artist))
        .append_pair("album", flag(collage.album))
        .append_pair("playcount", flag(collage.playcount))
        .append_pair("rows", &collage.rows.to_string())
        .append_pair("columns", &collage.columns.to_string())
        .append_pair("fontsize", &collage.fontsize.to_string())
        .append_pair("textlocation", &collage.textlocation)
        .append_pair("webp", flag(collage.webp));
    Ok(url)
}

/// The configured URL override, or the URL built from `collage`.
///
/// # Errors
///
/// Returns [`ReadmeError::Request`] if the override is not a valid URL.
pub fn resolve_url(source: &SourceConfig, collage: &CollageConfig) -> Result<Url, ReadmeError> {
    match source.url.as_deref() {
        Some(raw) => {
            Url::parse(raw).map_err(|e| ReadmeError::Request(format!("invalid URL '{raw}': {e}")))
        }
        None => collage_url(collage),
    }
}

const fn flag(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}
