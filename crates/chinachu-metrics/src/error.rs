// ── Metrics error types ──
//
// A poll either completes or fails as a whole. Transport and decode
// failures carry the endpoint that broke the poll so the host log says
// which request to look at.

use std::path::PathBuf;

use thiserror::Error;

use crate::endpoint::Endpoint;

/// Unified error type for the metrics crate.
#[derive(Debug, Error)]
pub enum MetricsError {
    // ── Fetch errors ─────────────────────────────────────────────────
    #[error("Request to the {endpoint} endpoint failed: {source}")]
    Transport {
        endpoint: Endpoint,
        #[source]
        source: chinachu_api::Error,
    },

    #[error("Malformed {endpoint} response: {message}")]
    Decode { endpoint: Endpoint, message: String },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Invalid target: {0}")]
    InvalidTarget(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] chinachu_api::Error),

    #[error("At least one endpoint must be enabled")]
    EmptyEndpointSet,

    // ── Output errors ────────────────────────────────────────────────
    #[error("Tempfile {}: {source}", .path.display())]
    Tempfile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to encode plugin output: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to write plugin output: {0}")]
    Output(#[from] std::io::Error),
}

impl MetricsError {
    /// Attribute a client error to the endpoint that produced it.
    pub(crate) fn from_api(endpoint: Endpoint, err: chinachu_api::Error) -> Self {
        match err {
            chinachu_api::Error::Deserialization { message, .. } => {
                Self::Decode { endpoint, message }
            }
            chinachu_api::Error::InvalidTarget { target, reason } => {
                Self::InvalidTarget(format!("'{target}': {reason}"))
            }
            source @ chinachu_api::Error::Transport(_) => Self::Transport { endpoint, source },
        }
    }

    /// Classify a failure to construct the client: a bad target is a
    /// configuration mistake, anything else is a client setup failure.
    pub(crate) fn from_client_build(err: chinachu_api::Error) -> Self {
        match err {
            chinachu_api::Error::InvalidTarget { target, reason } => {
                Self::InvalidTarget(format!("'{target}': {reason}"))
            }
            other => Self::Client(other),
        }
    }

    /// Returns `true` for failures that abort a poll at runtime, as
    /// opposed to configuration mistakes.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Decode { .. })
    }
}
