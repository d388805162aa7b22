use reqwest::Url;
use serde_json::Value;

use crate::error::{Error, Result};

pub(crate) fn parse_base_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    if parsed.cannot_be_a_base() {
        return Err(Error::InvalidUrl {
            url: url.to_string(),
            reason: "URL cannot carry a path".to_string(),
        });
    }
    Ok(parsed)
}

/// Appends `segments` to `base`, percent-encoding each one.
///
/// A `/` inside a segment is encoded, so a segment never adds path levels.
pub(crate) fn endpoint_url<I>(base: &Url, segments: I) -> Url
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut url = base.clone();
    // parse_base_url already rejected cannot-be-a-base URLs
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Empty body means "no data"; anything else must be JSON.
pub(crate) fn decode_body(text: &str) -> serde_json::Result<Option<Value>> {
    if text.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(text).map(Some)
}
