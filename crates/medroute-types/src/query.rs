//! The normalized query bundle produced by term normalization.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical multi-field search bundle. Built once per pipeline run by the
/// normalizer and treated as immutable by every downstream stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryBundle {
    /// The user's raw input, unmodified.
    pub original_query: String,

    /// Primary English search term.
    pub primary_term: String,

    /// Alternate English phrasings of the primary term.
    #[serde(default)]
    pub alternate_terms: Vec<String>,

    /// Controlled-vocabulary codes (MeSH headings, ICD-10).
    #[serde(default)]
    pub controlled_codes: Vec<String>,

    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Provider-specific query strings, keyed by provider name
    /// ("clinicaltrials", "pubmed", "general").
    #[serde(default)]
    pub provider_queries: HashMap<String, String>,
}

impl QueryBundle {
    /// Trivial bundle used when normalization fails: every provider searches
    /// the raw input text. This is the availability floor of a pipeline.
    pub fn fallback(raw: &str) -> Self {
        let mut provider_queries = HashMap::new();
        for provider in ["clinicaltrials", "pubmed", "general"] {
            provider_queries.insert(provider.to_string(), raw.to_string());
        }
        Self {
            original_query: raw.to_string(),
            primary_term: raw.to_string(),
            alternate_terms: vec![raw.to_string()],
            controlled_codes: Vec::new(),
            synonyms: Vec::new(),
            provider_queries,
        }
    }

    /// The query string for a provider, falling back to the primary term.
    pub fn query_for(&self, provider: &str) -> &str {
        self.provider_queries
            .get(provider)
            .map(String::as_str)
            .unwrap_or(&self.primary_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_uses_raw_text_everywhere() {
        let bundle = QueryBundle::fallback("ფილტვის კიბო");
        assert_eq!(bundle.primary_term, "ფილტვის კიბო");
        assert_eq!(bundle.query_for("clinicaltrials"), "ფილტვის კიბო");
        assert_eq!(bundle.query_for("pubmed"), "ფილტვის კიბო");
    }

    #[test]
    fn query_for_unknown_provider_falls_back_to_primary() {
        let bundle = QueryBundle {
            primary_term: "lung cancer".into(),
            ..QueryBundle::default()
        };
        assert_eq!(bundle.query_for("nonexistent"), "lung cancer");
    }

    #[test]
    fn query_for_prefers_provider_entry() {
        let mut bundle = QueryBundle::fallback("x");
        bundle
            .provider_queries
            .insert("pubmed".into(), "lung neoplasms[MeSH]".into());
        assert_eq!(bundle.query_for("pubmed"), "lung neoplasms[MeSH]");
    }
}
