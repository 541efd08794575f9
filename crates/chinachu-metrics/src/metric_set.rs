use std::collections::BTreeMap;

use serde::Serialize;

/// Fixed metric names reported to the host.
pub mod names {
    pub const CONNECTED_COUNT: &str = "ConnectedCount";
    pub const PREVIEWER: &str = "Previewer";
    pub const STREAMER: &str = "Streamer";
    pub const FILER: &str = "Filer";
    pub const CONFIGURATOR: &str = "Configurator";
    pub const RECORDED_COUNT: &str = "RecordedCount";
    pub const RECORDING_COUNT: &str = "RecordingCount";
    pub const RULES_COUNT: &str = "RulesCount";
    pub const RESERVES_COUNT: &str = "ReservesCount";
}

/// Flat metric name → value output of one poll.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MetricSet {
    values: BTreeMap<&'static str, u64>,
}

impl MetricSet {
    pub fn insert(&mut self, name: &'static str, value: u64) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: &str) -> Option<u64> {
        self.values.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.values.iter().map(|(name, value)| (*name, *value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
