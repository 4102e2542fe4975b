//! EU Clinical Trials Register (CTIS) gateway, best effort.
//!
//! The CTIS public API is thinly documented and changes without notice, so
//! any non-success status is treated as "no results" rather than a failure.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::info;

use medroute_types::TrialRecord;

use crate::error::{Result, SourceError};

const DEFAULT_BASE_URL: &str = "https://euclinicaltrials.eu/ctis-public-api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct EuCtr {
    client: reqwest::Client,
    base_url: String,
}

impl EuCtr {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<TrialRecord>> {
        let url = format!("{}/search", self.base_url);
        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("searchCriteria.query", query),
                ("searchCriteria.pageSize", &max_results.to_string()),
            ])
            .send()
            .await
            .map_err(SourceError::from_reqwest)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !response.status().is_success() {
            info!(
                code = response.status().as_u16(),
                elapsed_ms,
                "eu ctr unavailable, treating as empty"
            );
            return Ok(Vec::new());
        }

        let body: Value = response.json().await.map_err(SourceError::from_reqwest)?;
        let trials = body["data"]
            .as_array()
            .or_else(|| body["results"].as_array())
            .cloned()
            .unwrap_or_default();
        info!(results = trials.len(), elapsed_ms, "eu ctr search ok");

        Ok(trials.iter().take(max_results).map(parse_trial).collect())
    }
}

impl Default for EuCtr {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_trial(t: &Value) -> TrialRecord {
    let id = t["ctNumber"]
        .as_str()
        .or_else(|| t["id"].as_str())
        .unwrap_or_default()
        .to_string();
    TrialRecord {
        trial_id: id,
        title: t["ctTitle"]
            .as_str()
            .or_else(|| t["title"].as_str())
            .unwrap_or_default()
            .to_string(),
        status: t["ctStatus"]
            .as_str()
            .or_else(|| t["status"].as_str())
            .unwrap_or_default()
            .to_string(),
        phase: t["trialPhase"].as_str().unwrap_or_default().to_string(),
        source_registry: "EU CTR".to_string(),
        ..TrialRecord::default()
    }
}
