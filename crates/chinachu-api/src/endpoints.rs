// Chinachu REST endpoints
//
// https://github.com/Chinachu/Chinachu/wiki/REST-API

use serde::de::IgnoredAny;
use tracing::debug;

use crate::client::ChinachuClient;
use crate::error::Error;
use crate::models::{Program, Rule, Status};

impl ChinachuClient {
    /// Get server status.
    ///
    /// `GET /api/status.json`
    pub async fn status(&self) -> Result<Status, Error> {
        let url = self.api_url("status")?;
        debug!("fetching status");
        self.get(url).await
    }

    /// List recorded programs.
    ///
    /// `GET /api/recorded.json`
    pub async fn recorded(&self) -> Result<Vec<Program>, Error> {
        let url = self.api_url("recorded")?;
        debug!("fetching recorded programs");
        self.get(url).await
    }

    /// List programs currently being recorded.
    ///
    /// `GET /api/recording.json`
    pub async fn recording(&self) -> Result<Vec<Program>, Error> {
        let url = self.api_url("recording")?;
        debug!("fetching recording programs");
        self.get(url).await
    }

    /// List automatic recording rules.
    ///
    /// `GET /api/rules.json`
    pub async fn rules(&self) -> Result<Vec<Rule>, Error> {
        let url = self.api_url("rules")?;
        debug!("fetching rules");
        self.get(url).await
    }

    /// List reserved programs.
    ///
    /// `GET /api/reserves.json`
    pub async fn reserves(&self) -> Result<Vec<Program>, Error> {
        let url = self.api_url("reserves")?;
        debug!("fetching reserves");
        self.get(url).await
    }

    /// Number of entries in a list endpoint, without decoding the entries.
    ///
    /// `GET /api/{path}.json`. A `null` body counts as an empty list.
    pub async fn list_len(&self, path: &str) -> Result<usize, Error> {
        let url = self.api_url(path)?;
        debug!(path, "counting list entries");
        let items: Option<Vec<IgnoredAny>> = self.get(url).await?;
        Ok(items.map_or(0, |items| items.len()))
    }
}
