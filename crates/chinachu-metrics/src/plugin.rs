// ── Plugin facade ──
//
// Glues the fetcher to the host output: one call per agent invocation.

use std::io::Write;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::error::MetricsError;
use crate::fetcher::StatusFetcher;
use crate::graph::{GraphDefinition, graph_definitions};
use crate::output::{PluginOutput, Snapshot};

/// A configured plugin: what to poll and how to report it.
#[derive(Debug, Clone)]
pub struct Plugin {
    fetcher: StatusFetcher,
    output: PluginOutput,
}

impl Plugin {
    pub fn new(fetcher: StatusFetcher, output: PluginOutput) -> Self {
        Self { fetcher, output }
    }

    pub fn fetcher(&self) -> &StatusFetcher {
        &self.fetcher
    }

    /// Graph groups for the enabled endpoints.
    pub fn graph_definitions(&self) -> Vec<&'static GraphDefinition> {
        graph_definitions(self.fetcher.endpoints())
    }

    /// Write the metadata block the agent requests on startup.
    pub fn write_definitions(&self, out: &mut impl Write) -> Result<(), MetricsError> {
        let text = self.output.render_definitions(&self.graph_definitions())?;
        out.write_all(text.as_bytes())?;
        Ok(())
    }

    /// Poll once and write the value lines.
    ///
    /// The tempfile is rewritten after every successful poll. Nothing is
    /// written, to `out` or the tempfile, when the poll fails.
    pub async fn write_values(&self, out: &mut (impl Write + Send)) -> Result<(), MetricsError> {
        let graphs = self.graph_definitions();
        let metrics = self.fetcher.fetch().await?;
        let now = Utc::now();
        let tempfile = self.output.tempfile();

        let previous = Snapshot::load(tempfile).unwrap_or_else(|e| {
            warn!(error = %e, "ignoring previous values");
            None
        });

        let text = self
            .output
            .render_values(&graphs, &metrics, now, previous.as_ref());

        self.output.snapshot(&graphs, &metrics, now).save(tempfile)?;
        debug!(path = %tempfile.display(), "saved values");

        out.write_all(text.as_bytes())?;
        info!(metrics = metrics.len(), "reported metrics");
        Ok(())
    }
}
