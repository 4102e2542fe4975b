//! The final response document sent to the frontend.
//!
//! Field names on the wire follow what the frontend already consumes
//! (`nextSteps`, `isDemo`), so renames are pinned with serde attributes.

use serde::{Deserialize, Serialize};

/// A single result item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub phase: String,
}

/// Tabular side-by-side comparison. Every row must have exactly as many
/// cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonTable {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<Vec<String>>,
}

impl ComparisonTable {
    /// True when every row length matches the header length.
    pub fn is_well_formed(&self) -> bool {
        self.rows.iter().all(|row| row.len() == self.headers.len())
    }
}

/// A tip or next-step entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TipItem {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub icon: String,
}

/// One section of a formal report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSection {
    #[serde(default)]
    pub heading: String,
    #[serde(default)]
    pub content: String,
}

/// The response document. Invariant: `disclaimer` is never empty on any
/// path leaving the system (the compliance guard enforces this).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub meta: String,
    #[serde(default)]
    pub items: Vec<ResultItem>,
    #[serde(default)]
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonTable>,
    #[serde(default)]
    pub tips: Vec<TipItem>,
    #[serde(default, rename = "nextSteps")]
    pub next_steps: Vec<TipItem>,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<ReportSection>,
    #[serde(default)]
    pub disclaimer: String,
    #[serde(default, rename = "isDemo")]
    pub is_demo: bool,
}

impl SearchResponse {
    /// A response with only an error message and the disclaimer.
    pub fn error(meta: impl Into<String>, disclaimer: impl Into<String>) -> Self {
        Self {
            meta: meta.into(),
            disclaimer: disclaimer.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names_are_frontend_compatible() {
        let resp = SearchResponse {
            next_steps: vec![TipItem {
                text: "see a doctor".into(),
                icon: "".into(),
            }],
            ..SearchResponse::default()
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("nextSteps").is_some());
        assert!(json.get("isDemo").is_some());
        assert!(json.get("next_steps").is_none());
    }

    #[test]
    fn comparison_well_formedness() {
        let ok = ComparisonTable {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into(), "2".into()]],
        };
        assert!(ok.is_well_formed());
        let bad = ComparisonTable {
            headers: vec!["a".into(), "b".into()],
            rows: vec![vec!["1".into()]],
        };
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn error_response_has_no_items() {
        let resp = SearchResponse::error("შეცდომა.", "⚕️ disclaimer");
        assert!(resp.items.is_empty());
        assert!(!resp.disclaimer.is_empty());
    }

    #[test]
    fn response_roundtrip() {
        let resp = SearchResponse {
            meta: "ok".into(),
            items: vec![ResultItem {
                title: "t".into(),
                rating: Some(80.0),
                ..ResultItem::default()
            }],
            disclaimer: "d".into(),
            ..SearchResponse::default()
        };
        let json = serde_json::to_string(&resp).unwrap();
        let parsed: SearchResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(resp, parsed);
    }
}
