//! Endpoint capability table.
//!
//! Which API endpoints a deployment polls is configuration, not code: an
//! [`EndpointSet`] decides both the requests a fetch makes and the graph
//! groups reported to the host.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::MetricsError;

/// One JSON endpoint of the Chinachu WUI.
///
/// Declaration order is the request order of a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endpoint {
    Status,
    Recorded,
    Recording,
    Rules,
    Reserves,
}

impl Endpoint {
    pub const ALL: [Self; 5] = [
        Self::Status,
        Self::Recorded,
        Self::Recording,
        Self::Rules,
        Self::Reserves,
    ];

    /// Path segment under `/api/`, without the `.json` suffix.
    pub fn path(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Recorded => "recorded",
            Self::Recording => "recording",
            Self::Rules => "rules",
            Self::Reserves => "reserves",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown endpoint '{0}' (expected one of: status, recorded, recording, rules, reserves)")]
pub struct UnknownEndpoint(pub String);

impl FromStr for Endpoint {
    type Err = UnknownEndpoint;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|e| e.path() == wanted)
            .ok_or_else(|| UnknownEndpoint(s.to_owned()))
    }
}

/// Non-empty, ordered set of enabled endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointSet(BTreeSet<Endpoint>);

impl EndpointSet {
    /// Build a set from any list of endpoints. Duplicates collapse.
    pub fn new(endpoints: impl IntoIterator<Item = Endpoint>) -> Result<Self, MetricsError> {
        let set: BTreeSet<Endpoint> = endpoints.into_iter().collect();
        if set.is_empty() {
            return Err(MetricsError::EmptyEndpointSet);
        }
        Ok(Self(set))
    }

    /// Status only: connection count and feature flags.
    pub fn status_only() -> Self {
        Self(BTreeSet::from([Endpoint::Status]))
    }

    /// Status plus the recorded-program count.
    pub fn with_recorded() -> Self {
        Self(BTreeSet::from([Endpoint::Status, Endpoint::Recorded]))
    }

    /// Every known endpoint.
    pub fn all() -> Self {
        Self(Endpoint::ALL.into_iter().collect())
    }

    pub fn contains(&self, endpoint: Endpoint) -> bool {
        self.0.contains(&endpoint)
    }

    /// Enabled endpoints in request order.
    pub fn iter(&self) -> impl Iterator<Item = Endpoint> + '_ {
        self.0.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for EndpointSet {
    fn default() -> Self {
        Self::all()
    }
}
