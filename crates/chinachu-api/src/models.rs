// Chinachu API response types
//
// Models for the WUI's JSON API. Fields use `#[serde(default)]` liberally:
// the server omits keys across releases, and the plugin only needs a few
// scalars and the length of each list.

use serde::{Deserialize, Deserializer, Serialize};

/// Missing and `null` both read as the zero value.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ── Status ───────────────────────────────────────────────────────────

/// Server status from `/api/status.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    #[serde(default, deserialize_with = "null_as_default")]
    pub connected_count: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub feature: Feature,
    #[serde(default)]
    pub system: Option<SystemInfo>,
    #[serde(default)]
    pub operator: Option<ProcessStatus>,
    #[serde(default)]
    pub wui: Option<ProcessStatus>,
}

/// Optional capabilities the WUI has enabled.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub previewer: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub streamer: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filer: bool,
    #[serde(default, deserialize_with = "null_as_default")]
    pub configurator: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub core: Option<u32>,
}

/// Liveness of the operator or WUI daemon. `pid` is `null` when stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessStatus {
    #[serde(default)]
    pub alive: bool,
    #[serde(default)]
    pub pid: Option<i64>,
}

// ── Programs ─────────────────────────────────────────────────────────

/// A program entry as returned by `recorded`, `recording` and `reserves`.
///
/// Metric collection only counts these (see `ChinachuClient::list_len`);
/// the typed form is for callers that want the entries themselves.
///
/// Only the common identifying fields are modelled; everything else
/// (tuner, command, flags, ...) lands in `extra`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub full_title: Option<String>,
    #[serde(default)]
    pub sub_title: Option<String>,
    #[serde(default)]
    pub episode: Option<i64>,
    /// Start time, epoch milliseconds.
    #[serde(default)]
    pub start: Option<i64>,
    /// End time, epoch milliseconds.
    #[serde(default)]
    pub end: Option<i64>,
    #[serde(default)]
    pub seconds: Option<i64>,
    #[serde(default)]
    pub channel: Option<Channel>,
    #[serde(default)]
    pub is_conflict: Option<bool>,
    /// Path of the recorded file on the server, if any.
    #[serde(default)]
    pub recorded: Option<String>,
    /// Catch-all for undocumented fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    #[serde(default, rename = "type")]
    pub channel_type: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub sid: Option<i64>,
    #[serde(default)]
    pub nid: Option<i64>,
    #[serde(default)]
    pub has_logo_data: Option<bool>,
    #[serde(default)]
    pub n: Option<i64>,
}

// ── Rules ────────────────────────────────────────────────────────────

/// An automatic recording rule from `/api/rules.json`.
///
/// Rules use snake_case keys, unlike the program objects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rule {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(default)]
    pub ignore_flags: Vec<String>,
    #[serde(default)]
    pub hour: Option<HourRange>,
    #[serde(default)]
    pub reserve_titles: Vec<String>,
    #[serde(default)]
    pub recorded_format: Option<String>,
    #[serde(default, rename = "isDisabled")]
    pub is_disabled: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HourRange {
    pub start: u32,
    pub end: u32,
}
