//! Static graph definitions.
//!
//! Six metric groups, one per endpoint plus the feature flags from the
//! status endpoint. Which groups a plugin reports is derived from the
//! enabled [`EndpointSet`].

use serde::Serialize;

use crate::endpoint::{Endpoint, EndpointSet};
use crate::metric_set::names;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Integer,
}

/// Wire type the host should use when storing a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    Uint32,
}

/// One metric inside a graph group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDef {
    pub name: &'static str,
    pub label: &'static str,
    /// Report the per-minute delta instead of the raw value.
    pub diff: bool,
    pub value_type: ValueType,
}

/// A graph group as shown by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphDefinition {
    /// Key suffix under the metric key prefix, e.g. `feature`.
    pub key: &'static str,
    pub label: &'static str,
    pub unit: Unit,
    pub metrics: &'static [MetricDef],
    /// Endpoint that supplies this group's values.
    pub source: Endpoint,
}

const fn gauge(name: &'static str, label: &'static str) -> MetricDef {
    MetricDef {
        name,
        label,
        diff: false,
        value_type: ValueType::Uint32,
    }
}

static GRAPHS: [GraphDefinition; 6] = [
    GraphDefinition {
        key: "connected_count",
        label: "Connected Count",
        unit: Unit::Integer,
        metrics: &[gauge(names::CONNECTED_COUNT, "Count")],
        source: Endpoint::Status,
    },
    GraphDefinition {
        key: "feature",
        label: "Feature",
        unit: Unit::Integer,
        metrics: &[
            gauge(names::PREVIEWER, "Previewer"),
            gauge(names::STREAMER, "Streamer"),
            gauge(names::FILER, "Filer"),
            gauge(names::CONFIGURATOR, "Configurator"),
        ],
        source: Endpoint::Status,
    },
    GraphDefinition {
        key: "recorded",
        label: "Recorded",
        unit: Unit::Integer,
        metrics: &[gauge(names::RECORDED_COUNT, "Count")],
        source: Endpoint::Recorded,
    },
    GraphDefinition {
        key: "recording",
        label: "Recording",
        unit: Unit::Integer,
        metrics: &[gauge(names::RECORDING_COUNT, "Count")],
        source: Endpoint::Recording,
    },
    GraphDefinition {
        key: "rules",
        label: "Rules",
        unit: Unit::Integer,
        metrics: &[gauge(names::RULES_COUNT, "Count")],
        source: Endpoint::Rules,
    },
    GraphDefinition {
        key: "reserves",
        label: "Reserves",
        unit: Unit::Integer,
        metrics: &[gauge(names::RESERVES_COUNT, "Count")],
        source: Endpoint::Reserves,
    },
];

/// Graph groups reported for the enabled endpoints, in table order.
pub fn graph_definitions(endpoints: &EndpointSet) -> Vec<&'static GraphDefinition> {
    GRAPHS
        .iter()
        .filter(|g| endpoints.contains(g.source))
        .collect()
}
