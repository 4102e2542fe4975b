//! WHO ICTRP gateway stub.
//!
//! The WHO registry platform has no stable public API. The gateway is kept
//! so the trial fan-out stays provider-count-agnostic; it always reports
//! zero records.

use tracing::info;

use medroute_types::TrialRecord;

use crate::error::Result;

#[derive(Debug, Default)]
pub struct WhoIctrp;

impl WhoIctrp {
    pub fn new() -> Self {
        Self
    }

    pub async fn search(&self, query: &str, _max_results: usize) -> Result<Vec<TrialRecord>> {
        info!(query, "who ictrp skipped, no stable api");
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_empty() {
        let trials = WhoIctrp::new().search("anything", 10).await.unwrap();
        assert!(trials.is_empty());
    }
}
