use reqwest::Url;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CACHE_CONTROL, HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::load_config;
use crate::error::{Error, Result};
use crate::util::{decode_body, endpoint_url, parse_base_url};

/// Base URL of the AEMET OpenData REST API.
pub const DEFAULT_URL: &str = "https://opendata.aemet.es/opendata/api";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const LIGHTNINGS_MAP: [&str; 3] = ["red", "rayos", "mapa"];
const TOWN: [&str; 2] = ["maestro", "municipio"];
const TOWNS: [&str; 2] = ["maestro", "municipios"];

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base API URL, normally [`DEFAULT_URL`].
    pub url: String,
    /// AEMET OpenData API key, sent as the `api_key` query parameter on every call.
    pub api_key: String,
    /// Timeout applied to each request.
    pub timeout: Duration,
    /// Whether to verify TLS certificates.
    pub verify: bool,
    /// Whether to log request paths and raw responses.
    pub debug: bool,
}

impl ClientConfig {
    /// Configuration with the default URL, a 10 second timeout and TLS verification on.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            verify: true,
            debug: false,
        }
    }
}

/// Blocking AEMET OpenData client.
///
/// Every accessor performs exactly one GET and returns the body as JSON, or `None`
/// when the body is empty. The HTTP status is not inspected: error payloads from the
/// API come back as JSON like any other response.
#[derive(Debug, Clone)]
pub struct Client {
    url: Url,
    api_key: String,
    timeout: Duration,
    verify: bool,
    debug: bool,

    http: HttpClient,
    // Only used while `verify` is false; built on first need.
    unverified: Option<HttpClient>,
}

impl Client {
    /// Creates a client for `api_key` with default settings.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(ClientConfig::new(api_key))
    }

    /// Creates a client using environment variables and/or `.aemetrc`.
    ///
    /// This is equivalent to `Client::load(None, None, None)`.
    pub fn from_env() -> Result<Self> {
        Self::load(None, None, None)
    }

    /// Creates a client using (in order of precedence):
    /// - explicit `url`/`key`/`verify` arguments
    /// - environment variables `AEMET_URL` / `AEMET_API_KEY`
    /// - config file from `AEMET_RC` or `.aemetrc`
    pub fn load(url: Option<String>, key: Option<String>, verify: Option<bool>) -> Result<Self> {
        let cfg = load_config(url, key, verify)?;
        Self::with_config(cfg)
    }

    pub fn with_config(cfg: ClientConfig) -> Result<Self> {
        let http = build_http(true)?;
        Self::with_http_client(cfg, http)
    }

    /// Creates a client that sends its requests through an existing HTTP client.
    ///
    /// `http` is used whenever TLS verification is enabled. Disabling verification
    /// switches to a separate client built by this crate, because certificate checks
    /// are fixed when a `reqwest` client is built.
    pub fn with_http_client(cfg: ClientConfig, http: HttpClient) -> Result<Self> {
        let url = parse_base_url(&cfg.url)?;
        let unverified = if cfg.verify {
            None
        } else {
            Some(build_http(false)?)
        };

        Ok(Self {
            url,
            api_key: cfg.api_key,
            timeout: cfg.timeout,
            verify: cfg.verify,
            debug: cfg.debug,
            http,
            unverified,
        })
    }

    /// Enables or disables request/response logging. Returns the new state.
    pub fn set_debug(&mut self, enabled: bool) -> bool {
        self.debug = enabled;
        self.debug
    }

    /// Enables or disables TLS certificate verification for subsequent requests.
    /// Returns the new state.
    ///
    /// Fails only if the unverified HTTP client cannot be built.
    pub fn set_tls_verify(&mut self, enabled: bool) -> Result<bool> {
        if !enabled && self.unverified.is_none() {
            self.unverified = Some(build_http(false)?);
        }
        self.verify = enabled;
        Ok(self.verify)
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn tls_verify(&self) -> bool {
        self.verify
    }

    /// Map of lightning strikes over the last hours.
    pub fn get_lightnings_map(&self) -> Result<Option<Value>> {
        self.get(&LIGHTNINGS_MAP)
    }

    /// Master data of a single town (`municipio`), e.g. `"28079"` for Madrid.
    ///
    /// `town_id` is sent as one percent-encoded path segment.
    pub fn get_town(&self, town_id: &str) -> Result<Option<Value>> {
        let [a, b] = TOWN;
        self.get(&[a, b, town_id])
    }

    /// Master data of every town.
    pub fn get_towns(&self) -> Result<Option<Value>> {
        self.get(&TOWNS)
    }

    /// Calls an arbitrary endpoint below the base URL, e.g. `"maestro/municipios"`.
    ///
    /// `path` is split on `/` and each segment is percent-encoded, so pass it unencoded.
    pub fn call_endpoint(&self, path: &str) -> Result<Option<Value>> {
        let segments: Vec<&str> = path.split('/').collect();
        self.get(&segments)
    }

    fn transport(&self) -> &HttpClient {
        match (self.verify, &self.unverified) {
            (false, Some(unverified)) => unverified,
            _ => &self.http,
        }
    }

    fn get(&self, segments: &[&str]) -> Result<Option<Value>> {
        let path = segments.join("/");
        let url = endpoint_url(&self.url, segments);

        if self.debug {
            debug!(path = %path, "api call");
        }

        let resp = self
            .transport()
            .get(url.as_str())
            .header(CACHE_CONTROL, "no-cache")
            .query(&[("api_key", self.api_key.as_str())])
            .timeout(self.timeout)
            .send()
            .map_err(|e| Error::transport(url.as_str(), e))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| Error::transport(url.as_str(), e))?;

        if self.debug {
            debug!(
                path = %path,
                status = status.as_u16(),
                response = %text,
                "api call response"
            );
        }

        decode_body(&text).map_err(|source| Error::Parse {
            url: url.to_string(),
            status: status.as_u16(),
            source,
        })
    }
}

fn build_http(verify: bool) -> Result<HttpClient> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(
        USER_AGENT,
        HeaderValue::from_str(&format!("aemet-opendata-rs/{}", env!("CARGO_PKG_VERSION")))
            .unwrap_or(HeaderValue::from_static("aemet-opendata-rs")),
    );

    let mut builder = HttpClient::builder()
        .default_headers(default_headers)
        .timeout(DEFAULT_TIMEOUT);

    if !verify {
        builder = builder.danger_accept_invalid_certs(true);
    }

    builder.build().map_err(Error::Build)
}
