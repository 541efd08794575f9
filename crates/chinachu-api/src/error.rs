use thiserror::Error;

/// Top-level error type for the `chinachu-api` crate.
///
/// A request either fails in transport (connection refused, DNS failure,
/// broken body stream) or returns a body that does not decode into the
/// expected shape. `chinachu-metrics` treats both as fatal for a poll.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The `host:port` target does not form a valid base URL.
    #[error("Invalid target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// Returns `true` if the request never produced a response body.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    /// Returns `true` if the server answered but the body was unusable.
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Deserialization { .. })
    }
}
