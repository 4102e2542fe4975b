//! The common candidate envelope used by the aggregator/scorer.
//!
//! Trials and articles are heterogeneous; the aggregator works on a uniform
//! wrapper carrying the domain identifier, the kind tag, and the full record
//! as an opaque JSON payload.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::records::{ArticleRecord, TrialRecord};

/// The kind of a scored candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateKind {
    Trial,
    Article,
}

/// One candidate in the common scoring envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Natural identifier from the provider (NCT number, PMID). Never
    /// synthesized; empty ids never reach the aggregator.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: CandidateKind,
    /// The full normalized record.
    pub data: serde_json::Value,
}

impl Candidate {
    /// Wrap a trial record. Serialization of a well-formed record cannot
    /// fail, so the payload conversion is infallible here.
    pub fn from_trial(trial: &TrialRecord) -> Self {
        Self {
            id: trial.trial_id.clone(),
            kind: CandidateKind::Trial,
            data: serde_json::to_value(trial).unwrap_or_default(),
        }
    }

    pub fn from_article(article: &ArticleRecord) -> Self {
        Self {
            id: article.article_id.clone(),
            kind: CandidateKind::Article,
            data: serde_json::to_value(article).unwrap_or_default(),
        }
    }
}

/// A candidate with its relevance score. Immutable once produced by the
/// aggregator; consumed exclusively by a report stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub candidate: Candidate,
    /// Relevance in `[0, 100]`.
    pub score: f64,
    #[serde(default)]
    pub score_breakdown: HashMap<String, f64>,
    /// Auxiliary geography-accessibility score.
    #[serde(default)]
    pub accessibility_index: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trial_candidate_carries_id_and_kind() {
        let trial = TrialRecord {
            trial_id: "NCT00000001".into(),
            title: "Some trial".into(),
            ..TrialRecord::default()
        };
        let cand = Candidate::from_trial(&trial);
        assert_eq!(cand.id, "NCT00000001");
        assert_eq!(cand.kind, CandidateKind::Trial);
        assert_eq!(cand.data["title"], "Some trial");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let cand = Candidate {
            id: "123".into(),
            kind: CandidateKind::Article,
            data: serde_json::Value::Null,
        };
        let json = serde_json::to_value(&cand).unwrap();
        assert_eq!(json["type"], "article");
    }
}
