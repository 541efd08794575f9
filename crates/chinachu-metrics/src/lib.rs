//! Metric collection for a Chinachu recording server.
//!
//! Sits between `chinachu-api` and the plugin binary:
//!
//! - **[`StatusFetcher`]** — polls the enabled endpoints sequentially and
//!   maps the responses into a flat [`MetricSet`]. A poll yields either a
//!   complete set or an error; nothing partial is reported.
//!
//! - **[`EndpointSet`]** — capability table naming the endpoints a
//!   deployment polls. It drives both the requests and the graph groups.
//!
//! - **Graph definitions** ([`graph`]) — static label/unit/diff metadata,
//!   filtered by the endpoint set.
//!
//! - **[`Plugin`]** / **[`PluginOutput`]** — the mackerel-agent plugin
//!   protocol: metadata JSON, tab-separated value lines, and per-minute
//!   diffs backed by a tempfile.

pub mod endpoint;
pub mod error;
pub mod fetcher;
pub mod graph;
pub mod metric_set;
pub mod output;
pub mod plugin;

pub use endpoint::{Endpoint, EndpointSet, UnknownEndpoint};
pub use error::MetricsError;
pub use fetcher::{StatusFetcher, bool_to_int};
pub use graph::{GraphDefinition, MetricDef, graph_definitions};
pub use metric_set::{MetricSet, names};
pub use output::{META_ENV, PluginOutput, Snapshot, default_tempfile_path};
pub use plugin::Plugin;
