//! Plugin error types with miette diagnostics.
//!
//! Maps `MetricsError` variants into user-facing errors with actionable
//! help text. mackerel-agent logs stderr and skips the poll on a
//! non-zero exit.

use miette::Diagnostic;
use thiserror::Error;

use chinachu_metrics::MetricsError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const CONNECTION: i32 = 7;
    pub const INVALID_RESPONSE: i32 = 8;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Fetch ────────────────────────────────────────────────────────
    #[error("Could not reach Chinachu {endpoint} endpoint at {target}")]
    #[diagnostic(
        code(chinachu::connection_failed),
        help(
            "Check that chinachu-wui is running and listening on {target}.\n\
             Override with --host / --port."
        )
    )]
    ConnectionFailed {
        target: String,
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Chinachu {endpoint} endpoint returned an unusable body")]
    #[diagnostic(
        code(chinachu::invalid_response),
        help("{message}\nThe target may not be a Chinachu WUI, or the API changed.")
    )]
    InvalidResponse { endpoint: String, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(chinachu::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(code(chinachu::config))]
    Config(Box<figment::Error>),

    #[error("{0}")]
    #[diagnostic(code(chinachu::output))]
    Output(String),

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::InvalidResponse { .. } => exit_code::INVALID_RESPONSE,
            Self::Validation { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }

    /// Attach the polled target to a metrics error.
    pub fn from_metrics(err: MetricsError, target: &str) -> Self {
        match err {
            MetricsError::Transport { endpoint, source } => Self::ConnectionFailed {
                target: target.to_owned(),
                endpoint: endpoint.to_string(),
                source: Box::new(source),
            },
            MetricsError::Decode { endpoint, message } => Self::InvalidResponse {
                endpoint: endpoint.to_string(),
                message,
            },
            MetricsError::InvalidTarget(reason) => Self::Validation {
                field: "target".into(),
                reason,
            },
            MetricsError::EmptyEndpointSet => Self::Validation {
                field: "endpoints".into(),
                reason: "at least one endpoint must be enabled".into(),
            },
            MetricsError::Output(e) => Self::Io(e),
            other => Self::Output(other.to_string()),
        }
    }
}
