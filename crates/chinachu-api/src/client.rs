// Chinachu API HTTP client
//
// Wraps `reqwest::Client` with URL construction and JSON decoding. The
// endpoint methods live in `endpoints.rs` as inherent methods so this
// module stays focused on transport mechanics.

use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// Maximum number of body bytes echoed back in a decode error message.
const BODY_PREVIEW_LEN: usize = 200;

/// Raw HTTP client for a Chinachu WUI instance.
///
/// Every request is a plain unauthenticated GET against
/// `http://{target}/api/{path}.json`. No retries happen here.
#[derive(Debug, Clone)]
pub struct ChinachuClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ChinachuClient {
    /// Create a client for a `host:port` target.
    pub fn new(target: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let base_url = base_url_for(target)?;
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The server base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}.json`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        self.base_url
            .join(&format!("api/{path}.json"))
            .map_err(|e| Error::InvalidTarget {
                target: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a GET request and decode the whole body as `T`.
    ///
    /// A non-2xx status is logged but not treated as a failure; only a
    /// transport error or a body that fails to decode is.
    pub(crate) async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, Error> {
        debug!("GET {}", url);

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(%status, url = %resp.url(), "non-success status, decoding body anyway");
        }

        let body = resp.text().await.map_err(Error::Transport)?;

        serde_json::from_str(&body).map_err(|e| {
            let preview = preview(&body);
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }
}

fn base_url_for(target: &str) -> Result<Url, Error> {
    let invalid = |reason: String| Error::InvalidTarget {
        target: target.to_owned(),
        reason,
    };

    if target.is_empty() || target.contains('/') {
        return Err(invalid("expected host:port".into()));
    }

    let url = Url::parse(&format!("http://{target}/")).map_err(|e| invalid(e.to_string()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host".into()));
    }
    Ok(url)
}

fn preview(body: &str) -> &str {
    let mut end = body.len().min(BODY_PREVIEW_LEN);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
