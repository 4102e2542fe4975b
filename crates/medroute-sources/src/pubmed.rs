//! PubMed E-utilities gateway (esearch + esummary).
//!
//! Docs: <https://www.ncbi.nlm.nih.gov/books/NBK25500/>
//!
//! Two JSON calls: esearch resolves the query to PMIDs, esummary resolves
//! the PMIDs to article metadata. An NCBI API key, when configured, raises
//! the rate limit and rides along on both calls.

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{info, warn};

use medroute_types::ArticleRecord;

use crate::error::{Result, SourceError};

const DEFAULT_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub struct PubMed {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl PubMed {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub async fn search(
        &self,
        query: &str,
        max_results: usize,
        years_back: u32,
        pub_types: &[String],
    ) -> Result<Vec<ArticleRecord>> {
        let pmids = self.esearch(query, max_results, years_back, pub_types).await?;
        if pmids.is_empty() {
            return Ok(Vec::new());
        }
        self.esummary(&pmids).await
    }

    async fn esearch(
        &self,
        query: &str,
        max_results: usize,
        years_back: u32,
        pub_types: &[String],
    ) -> Result<Vec<String>> {
        let full_query = if pub_types.is_empty() {
            query.to_string()
        } else {
            let type_filter = pub_types
                .iter()
                .map(|t| format!("\"{t}\"[pt]"))
                .collect::<Vec<_>>()
                .join(" OR ");
            format!("({query}) AND ({type_filter})")
        };

        let mut params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("term".to_string(), full_query),
            ("retmax".to_string(), max_results.to_string()),
            ("sort".to_string(), "relevance".to_string()),
            ("datetype".to_string(), "pdat".to_string()),
            ("reldate".to_string(), (years_back * 365).to_string()),
            ("retmode".to_string(), "json".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }

        let start = Instant::now();
        let response = self
            .client
            .get(format!("{}/esearch.fcgi", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(SourceError::from_reqwest)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            warn!(code, elapsed_ms, "pubmed esearch failed");
            return Err(SourceError::Status { code });
        }

        let body: Value = response.json().await.map_err(SourceError::from_reqwest)?;
        let pmids: Vec<String> = body["esearchresult"]["idlist"]
            .as_array()
            .map(|ids| {
                ids.iter()
                    .filter_map(Value::as_str)
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        info!(pmids = pmids.len(), elapsed_ms, "pubmed esearch ok");
        Ok(pmids)
    }

    async fn esummary(&self, pmids: &[String]) -> Result<Vec<ArticleRecord>> {
        let mut params = vec![
            ("db".to_string(), "pubmed".to_string()),
            ("id".to_string(), pmids.join(",")),
            ("retmode".to_string(), "json".to_string()),
        ];
        if let Some(key) = &self.api_key {
            params.push(("api_key".to_string(), key.clone()));
        }

        let start = Instant::now();
        let response = self
            .client
            .get(format!("{}/esummary.fcgi", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(SourceError::from_reqwest)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        if !response.status().is_success() {
            let code = response.status().as_u16();
            warn!(code, elapsed_ms, "pubmed esummary failed");
            return Err(SourceError::Status { code });
        }

        let body: Value = response.json().await.map_err(SourceError::from_reqwest)?;
        let result = &body["result"];
        let articles: Vec<ArticleRecord> = pmids
            .iter()
            .filter_map(|pmid| {
                let doc = &result[pmid.as_str()];
                doc.is_object().then(|| parse_summary(pmid, doc))
            })
            .collect();
        info!(articles = articles.len(), elapsed_ms, "pubmed esummary ok");
        Ok(articles)
    }
}

fn parse_summary(pmid: &str, doc: &Value) -> ArticleRecord {
    let doi = doc["articleids"]
        .as_array()
        .and_then(|ids| {
            ids.iter()
                .find(|id| id["idtype"].as_str() == Some("doi"))
                .and_then(|id| id["value"].as_str())
        })
        .unwrap_or_default()
        .to_string();

    // pubdate is e.g. "2024 Mar 5"; the year is the leading token.
    let year = doc["pubdate"]
        .as_str()
        .and_then(|d| d.split_whitespace().next())
        .and_then(|y| y.parse::<i32>().ok());

    ArticleRecord {
        article_id: pmid.to_string(),
        title: doc["title"].as_str().unwrap_or_default().to_string(),
        abstract_summary: String::new(),
        journal: doc["fulljournalname"]
            .as_str()
            .or_else(|| doc["source"].as_str())
            .unwrap_or_default()
            .to_string(),
        year,
        doi,
        relevance_note: String::new(),
        source_url: format!("https://pubmed.ncbi.nlm.nih.gov/{pmid}/"),
    }
}
