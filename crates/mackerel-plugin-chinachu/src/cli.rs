//! Clap derive structures for the plugin binary.
//!
//! Only depends on clap so `build.rs` can include it for man page
//! generation.

use std::path::PathBuf;

use clap::Parser;

/// mackerel-plugin-chinachu -- Chinachu metrics for mackerel-agent
#[derive(Debug, Parser)]
#[command(
    name = "mackerel-plugin-chinachu",
    version,
    about = "Report Chinachu recording server metrics to mackerel-agent",
    long_about = "Polls the Chinachu WUI status API and prints metrics in the\n\
        mackerel-agent plugin format. Set MACKEREL_AGENT_PLUGIN_META=1 to\n\
        print the graph definitions instead."
)]
pub struct Cli {
    /// chinachu-wui hostname
    #[arg(long)]
    pub host: Option<String>,

    /// chinachu-wui port
    #[arg(long)]
    pub port: Option<u16>,

    /// Temp file name
    #[arg(long)]
    pub tempfile: Option<PathBuf>,

    /// Metric key prefix
    #[arg(long)]
    pub metric_key_prefix: Option<String>,

    /// Endpoints to poll (comma separated: status,recorded,recording,rules,reserves)
    #[arg(long, value_delimiter = ',')]
    pub endpoints: Option<Vec<String>>,

    /// Config file (defaults to the platform config directory)
    #[arg(long, env = "CHINACHU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    pub verbose: u8,
}
