//! Plugin configuration: TOML file, `CHINACHU_*` environment, and CLI
//! flag overrides, resolved into the settings a poll needs.
//!
//! Precedence: flag > env > file > built-in default.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use chinachu_metrics::{Endpoint, EndpointSet, default_tempfile_path};

use crate::cli::Cli;
use crate::error::CliError;

const ENV_PREFIX: &str = "CHINACHU_";
const ENV_KEYS: [&str; 4] = ["host", "port", "tempfile", "metric_key_prefix"];

// ── TOML config struct ───────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// chinachu-wui hostname or address.
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Where diff state is kept between runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tempfile: Option<PathBuf>,

    #[serde(default = "default_prefix")]
    pub metric_key_prefix: String,

    #[serde(default = "default_endpoints")]
    pub endpoints: Vec<Endpoint>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            tempfile: None,
            metric_key_prefix: default_prefix(),
            endpoints: default_endpoints(),
        }
    }
}

fn default_host() -> String {
    "localhost".into()
}
fn default_port() -> u16 {
    10772
}
fn default_prefix() -> String {
    chinachu_metrics::output::DEFAULT_PREFIX.into()
}
fn default_endpoints() -> Vec<Endpoint> {
    Endpoint::ALL.to_vec()
}

/// Everything a single plugin run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `host:port` of the status API.
    pub target: String,
    pub tempfile: PathBuf,
    pub metric_key_prefix: String,
    pub endpoints: EndpointSet,
}

// ── Config file path ─────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("", "", "mackerel-plugin-chinachu").map_or_else(
        || PathBuf::from("mackerel-plugin-chinachu.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

// ── Loading ──────────────────────────────────────────────────────────

/// Load defaults, then the TOML file (if present), then the environment.
pub fn load_config(path: &Path) -> Result<Config, CliError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).only(&ENV_KEYS));

    Ok(figment.extract()?)
}

/// Apply CLI flags on top of the loaded config.
pub fn resolve(cli: &Cli) -> Result<Settings, CliError> {
    let path = cli.config.clone().unwrap_or_else(config_path);
    let config = load_config(&path)?;
    resolve_with(cli, config)
}

pub fn resolve_with(cli: &Cli, config: Config) -> Result<Settings, CliError> {
    let host = cli.host.clone().unwrap_or(config.host);
    let host = host.trim();
    if host.is_empty() {
        return Err(CliError::Validation {
            field: "host".into(),
            reason: "must not be empty".into(),
        });
    }
    let port = cli.port.unwrap_or(config.port);

    let endpoints = match &cli.endpoints {
        Some(names) => names
            .iter()
            .map(|n| n.parse::<Endpoint>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| CliError::Validation {
                field: "endpoints".into(),
                reason: e.to_string(),
            })?,
        None => config.endpoints,
    };
    let endpoints = EndpointSet::new(endpoints).map_err(|e| CliError::Validation {
        field: "endpoints".into(),
        reason: e.to_string(),
    })?;

    let tempfile = cli
        .tempfile
        .clone()
        .or(config.tempfile)
        .unwrap_or_else(default_tempfile_path);

    Ok(Settings {
        target: target(host, port),
        tempfile,
        metric_key_prefix: cli
            .metric_key_prefix
            .clone()
            .unwrap_or(config.metric_key_prefix),
        endpoints,
    })
}

/// `host:port`, bracketing bare IPv6 literals.
fn target(host: &str, port: u16) -> String {
    if host.contains(':') && !host.starts_with('[') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}
