mod cli;
mod config;
mod error;

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use chinachu_api::TransportConfig;
use chinachu_metrics::{META_ENV, Plugin, PluginOutput, StatusFetcher};

use crate::cli::Cli;
use crate::error::CliError;

const USER_AGENT: &str = concat!("mackerel-plugin-chinachu/", env!("CARGO_PKG_VERSION"));

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr; stdout belongs to the agent protocol.
fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = config::resolve(&cli)?;
    tracing::debug!(?settings, "resolved settings");

    let transport = TransportConfig::default().with_user_agent(USER_AGENT);
    let target = settings.target.clone();
    let fetcher = StatusFetcher::connect(&target, &transport, settings.endpoints)
        .map_err(|e| CliError::from_metrics(e, &target))?;
    let plugin = Plugin::new(
        fetcher,
        PluginOutput::new(settings.metric_key_prefix, settings.tempfile),
    );

    let mut buf = Vec::new();
    if wants_definitions() {
        plugin
            .write_definitions(&mut buf)
            .map_err(|e| CliError::from_metrics(e, &target))?;
    } else {
        plugin
            .write_values(&mut buf)
            .await
            .map_err(|e| CliError::from_metrics(e, &target))?;
    }

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&buf)?;
    stdout.flush()?;
    Ok(())
}

fn wants_definitions() -> bool {
    std::env::var_os(META_ENV).is_some_and(|v| !v.is_empty())
}
