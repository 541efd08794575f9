// ── Status fetcher ──
//
// One linear fetch → decode → map pass per poll. Endpoints are requested
// sequentially in `Endpoint` order; the first failure aborts the poll and
// nothing partial is returned.

use chinachu_api::{ChinachuClient, Status, TransportConfig};
use tracing::{debug, instrument};

use crate::endpoint::{Endpoint, EndpointSet};
use crate::error::MetricsError;
use crate::metric_set::{MetricSet, names};

/// `true → 1`, `false → 0`.
pub fn bool_to_int(flag: bool) -> u64 {
    u64::from(flag)
}

/// Polls a Chinachu WUI and maps the responses into a [`MetricSet`].
///
/// Holds no state between polls beyond the client and the enabled
/// endpoint table, so repeated fetches against an unchanged server yield
/// identical results.
#[derive(Debug, Clone)]
pub struct StatusFetcher {
    client: ChinachuClient,
    endpoints: EndpointSet,
}

impl StatusFetcher {
    pub fn new(client: ChinachuClient, endpoints: EndpointSet) -> Self {
        Self { client, endpoints }
    }

    /// Build a fetcher for a `host:port` target.
    pub fn connect(
        target: &str,
        transport: &TransportConfig,
        endpoints: EndpointSet,
    ) -> Result<Self, MetricsError> {
        let client =
            ChinachuClient::new(target, transport).map_err(MetricsError::from_client_build)?;
        Ok(Self::new(client, endpoints))
    }

    pub fn endpoints(&self) -> &EndpointSet {
        &self.endpoints
    }

    /// Run one poll.
    #[instrument(skip(self), fields(target = %self.client.base_url()))]
    pub async fn fetch(&self) -> Result<MetricSet, MetricsError> {
        let mut metrics = MetricSet::default();

        for endpoint in self.endpoints.iter() {
            let fail = |e: chinachu_api::Error| MetricsError::from_api(endpoint, e);
            let counted = match endpoint {
                Endpoint::Status => {
                    let status = self.client.status().await.map_err(fail)?;
                    record_status(&mut metrics, &status);
                    continue;
                }
                Endpoint::Recorded => names::RECORDED_COUNT,
                Endpoint::Recording => names::RECORDING_COUNT,
                Endpoint::Rules => names::RULES_COUNT,
                Endpoint::Reserves => names::RESERVES_COUNT,
            };
            // List entries are counted, never decoded.
            let len = self.client.list_len(endpoint.path()).await.map_err(fail)?;
            metrics.insert(counted, count(len));
        }

        debug!(metrics = metrics.len(), "poll complete");
        Ok(metrics)
    }
}

fn record_status(metrics: &mut MetricSet, status: &Status) {
    metrics.insert(names::CONNECTED_COUNT, status.connected_count);
    metrics.insert(names::PREVIEWER, bool_to_int(status.feature.previewer));
    metrics.insert(names::STREAMER, bool_to_int(status.feature.streamer));
    metrics.insert(names::FILER, bool_to_int(status.feature.filer));
    metrics.insert(names::CONFIGURATOR, bool_to_int(status.feature.configurator));
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}
