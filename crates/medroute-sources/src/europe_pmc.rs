//! Europe PMC REST gateway.
//!
//! Docs: <https://europepmc.org/RestfulWebService>

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{info, warn};

use medroute_types::ArticleRecord;

use crate::error::{Result, SourceError};

const DEFAULT_BASE_URL: &str = "https://www.ebi.ac.uk/europepmc/webservices/rest";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct EuropePmc {
    client: reqwest::Client,
    base_url: String,
}

impl EuropePmc {
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

    pub async fn search(&self, query: &str, max_results: usize) -> Result<Vec<ArticleRecord>> {
        let start = Instant::now();
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[
                ("query", query),
                ("resultType", "core"),
                ("pageSize", &max_results.min(25).to_string()),
                ("format", "json"),
                ("sort", "RELEVANCE"),
            ])
            .send()
            .await
            .map_err(SourceError::from_reqwest)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            warn!(code, elapsed_ms, "europe pmc search failed");
            return Err(SourceError::Status { code });
        }

        let body: Value = response.json().await.map_err(SourceError::from_reqwest)?;
        let results = body["resultList"]["result"]
            .as_array()
            .cloned()
            .unwrap_or_default();
        info!(results = results.len(), elapsed_ms, "europe pmc search ok");
        Ok(results.iter().map(parse_result).collect())
    }
}

impl Default for EuropePmc {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_result(r: &Value) -> ArticleRecord {
    let pmid = r["pmid"].as_str().unwrap_or_default().to_string();
    // pubYear arrives as either a string or a number depending on the record.
    let year = r["pubYear"]
        .as_str()
        .and_then(|y| y.parse::<i32>().ok())
        .or_else(|| r["pubYear"].as_i64().map(|y| y as i32));

    ArticleRecord {
        article_id: pmid.clone(),
        title: r["title"].as_str().unwrap_or_default().to_string(),
        abstract_summary: r["abstractText"].as_str().unwrap_or_default().to_string(),
        journal: r["journalTitle"].as_str().unwrap_or_default().to_string(),
        year,
        doi: r["doi"].as_str().unwrap_or_default().to_string(),
        relevance_note: String::new(),
        source_url: if pmid.is_empty() {
            String::new()
        } else {
            format!("https://europepmc.org/article/MED/{pmid}")
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn parses_core_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("resultType", "core"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultList": {"result": [{
                    "pmid": "37700001",
                    "title": "Gut microbiome and immunotherapy response",
                    "abstractText": "We examined...",
                    "journalTitle": "Nature Medicine",
                    "pubYear": "2024",
                    "doi": "10.1038/s41591-024-0001-1"
                }]}
            })))
            .mount(&server)
            .await;

        let articles = EuropePmc::with_base_url(server.uri()).search("microbiome", 10).await.unwrap();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].article_id, "37700001");
        assert_eq!(articles[0].year, Some(2024));
        assert_eq!(
            articles[0].source_url,
            "https://europepmc.org/article/MED/37700001"
        );
    }

    #[tokio::test]
    async fn numeric_pub_year_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultList": {"result": [{"pmid": "1", "title": "t", "pubYear": 2023}]}
            })))
            .mount(&server)
            .await;

        let articles = EuropePmc::with_base_url(server.uri()).search("q", 10).await.unwrap();
        assert_eq!(articles[0].year, Some(2023));
    }

    #[tokio::test]
    async fn page_size_is_capped_at_twenty_five() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("pageSize", "25"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "resultList": {"result": []}
            })))
            .mount(&server)
            .await;

        assert!(EuropePmc::with_base_url(server.uri()).search("q", 100).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failure_is_a_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let err = EuropePmc::with_base_url(server.uri()).search("q", 10).await.unwrap_err();
        assert!(matches!(err, SourceError::Status { code: 502 }));
    }
}
