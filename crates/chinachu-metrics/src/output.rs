// ── Host plugin protocol ──
//
// mackerel-agent runs the plugin once per interval and reads stdout:
//
//   {prefix}.{group}.{Metric}\t{value}\t{epoch}
//
// With `MACKEREL_AGENT_PLUGIN_META` set it instead expects the marker
// line followed by the graph definitions as JSON. Each successful poll
// leaves its values in the tempfile; diff metrics are reported as a
// per-minute rate against the values found there.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::error::MetricsError;
use crate::graph::GraphDefinition;
use crate::metric_set::MetricSet;

pub const META_ENV: &str = "MACKEREL_AGENT_PLUGIN_META";
pub const META_HEADER: &str = "# mackerel-agent-plugin";
pub const DEFAULT_PREFIX: &str = "chinachu";

const WORKDIR_ENV: &str = "MACKEREL_PLUGIN_WORKDIR";
const TEMPFILE_NAME: &str = "mackerel-plugin-chinachu";

/// Previous values older than this are not used for a diff.
const MAX_DIFF_WINDOW_SECS: i64 = 600;

/// Default tempfile path: `$MACKEREL_PLUGIN_WORKDIR` or the system temp dir.
pub fn default_tempfile_path() -> PathBuf {
    tempfile_path_in(std::env::var_os(WORKDIR_ENV))
}

fn tempfile_path_in(workdir: Option<OsString>) -> PathBuf {
    workdir
        .filter(|d| !d.is_empty())
        .map_or_else(std::env::temp_dir, PathBuf::from)
        .join(TEMPFILE_NAME)
}

// ── Tempfile snapshot ────────────────────────────────────────────────

/// Values recorded by the previous poll, keyed by `{group}.{Metric}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "_lastTime")]
    pub last_time: i64,
    #[serde(flatten)]
    pub values: BTreeMap<String, u64>,
}

impl Snapshot {
    /// Read the snapshot. A missing file means "first run".
    pub fn load(path: &Path) -> Result<Option<Self>, MetricsError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(MetricsError::Tempfile {
                    path: path.to_owned(),
                    source,
                });
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                // Unreadable state counts as a first run.
                warn!(path = %path.display(), error = %e, "ignoring unreadable tempfile");
                Ok(None)
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), MetricsError> {
        let body = serde_json::to_string(self)?;
        std::fs::write(path, body).map_err(|source| MetricsError::Tempfile {
            path: path.to_owned(),
            source,
        })
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Renders graph definitions and metric values for the host.
#[derive(Debug, Clone)]
pub struct PluginOutput {
    prefix: String,
    tempfile: PathBuf,
}

impl PluginOutput {
    pub fn new(prefix: impl Into<String>, tempfile: PathBuf) -> Self {
        let prefix = prefix.into();
        let prefix = if prefix.is_empty() {
            DEFAULT_PREFIX.to_owned()
        } else {
            prefix
        };
        Self { prefix, tempfile }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn tempfile(&self) -> &Path {
        &self.tempfile
    }

    /// Metadata block: marker line plus the graph definitions as JSON.
    pub fn render_definitions(
        &self,
        graphs: &[&GraphDefinition],
    ) -> Result<String, MetricsError> {
        let label_prefix = title_case(&self.prefix);
        let mut defs = serde_json::Map::new();

        for graph in graphs {
            let metrics: Vec<_> = graph
                .metrics
                .iter()
                .map(|m| {
                    json!({
                        "name": m.name,
                        "label": m.label,
                        "diff": m.diff,
                        "type": m.value_type,
                    })
                })
                .collect();
            defs.insert(
                format!("{}.{}", self.prefix, graph.key),
                json!({
                    "label": format!("{label_prefix} {}", graph.label),
                    "unit": graph.unit,
                    "metrics": metrics,
                }),
            );
        }

        let body = serde_json::to_string(&json!({ "graphs": defs }))?;
        Ok(format!("{META_HEADER}\n{body}\n"))
    }

    /// Value lines for one poll.
    ///
    /// Metrics without a value in `metrics` are skipped, as are diff
    /// metrics with no usable previous value.
    pub fn render_values(
        &self,
        graphs: &[&GraphDefinition],
        metrics: &MetricSet,
        now: DateTime<Utc>,
        previous: Option<&Snapshot>,
    ) -> String {
        let epoch = now.timestamp();
        let mut out = String::new();

        for graph in graphs {
            for def in graph.metrics {
                let Some(value) = metrics.get(def.name) else {
                    continue;
                };
                let key = format!("{}.{}.{}", self.prefix, graph.key, def.name);

                if def.diff {
                    let state_key = format!("{}.{}", graph.key, def.name);
                    match per_minute_rate(value, &state_key, epoch, previous) {
                        Some(rate) => {
                            let _ = writeln!(out, "{key}\t{rate:.6}\t{epoch}");
                        }
                        None => debug!(metric = %key, "no previous value, skipping diff"),
                    }
                } else {
                    let _ = writeln!(out, "{key}\t{value}\t{epoch}");
                }
            }
        }

        out
    }

    /// Snapshot of this poll's values for the next run.
    pub fn snapshot(
        &self,
        graphs: &[&GraphDefinition],
        metrics: &MetricSet,
        now: DateTime<Utc>,
    ) -> Snapshot {
        let values = graphs
            .iter()
            .flat_map(|g| g.metrics.iter().map(move |m| (g.key, m)))
            .filter_map(|(key, m)| {
                metrics
                    .get(m.name)
                    .map(|v| (format!("{key}.{}", m.name), v))
            })
            .collect();
        Snapshot {
            last_time: now.timestamp(),
            values,
        }
    }
}

fn per_minute_rate(value: u64, key: &str, now: i64, previous: Option<&Snapshot>) -> Option<f64> {
    let previous = previous?;
    let last = *previous.values.get(key)?;

    let elapsed = now - previous.last_time;
    if elapsed <= 0 || elapsed > MAX_DIFF_WINDOW_SECS {
        debug!(key, elapsed, "previous value outside diff window");
        return None;
    }
    // Counter reset.
    if value < last {
        return None;
    }

    #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
    let rate = (value - last) as f64 * 60.0 / elapsed as f64;
    Some(rate)
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
