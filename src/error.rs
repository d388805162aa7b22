use thiserror::Error;

/// Errors returned by [`Client`](crate::Client).
///
/// An empty response body is not an error: accessors return `Ok(None)` for it.
/// The HTTP status code is never turned into an error either.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be resolved (missing key, unreadable rc file, ...).
    #[error(transparent)]
    Config(#[from] anyhow::Error),

    /// The configured base URL cannot have endpoint paths appended to it.
    #[error("invalid base URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client")]
    Build(#[source] reqwest::Error),

    /// Connect, DNS, TLS handshake or timeout failure, or the body could not be read.
    #[error("request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The body was not empty but is not valid JSON.
    #[error("failed to parse API JSON (url={url}, status={status})")]
    Parse {
        url: String,
        status: u16,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        // reqwest embeds the full URL, query string (and so the api key) included.
        Error::Transport {
            url: url.to_string(),
            source: source.without_url(),
        }
    }
}
