//! Relevance scoring for merged trial and article candidates.
//!
//! Primary strategy asks the fast model to score brief projections of up to
//! 30 candidates. Any failure abandons the model strategy entirely and
//! falls back to deterministic rules, so a half-scored list never ships.

use std::collections::HashMap;

use chrono::Datelike;
use serde_json::{json, Value};
use tracing::{info, warn};

use medroute_llm::{GenerationService, ModelTier, PromptStore};
use medroute_types::{Candidate, CandidateKind, ScoredCandidate};

use crate::prompt_defaults;

/// Location bonus for candidates reachable from Georgia.
pub const ACCESSIBILITY_BONUS: [(&str, f64); 18] = [
    ("türkiye", 20.0),
    ("turkey", 20.0),
    ("israel", 15.0),
    ("germany", 10.0),
    ("united states", 5.0),
    ("usa", 5.0),
    ("france", 8.0),
    ("spain", 8.0),
    ("italy", 8.0),
    ("netherlands", 8.0),
    ("austria", 8.0),
    ("belgium", 8.0),
    ("czech republic", 8.0),
    ("poland", 8.0),
    ("hungary", 8.0),
    ("greece", 8.0),
    ("portugal", 8.0),
    ("sweden", 8.0),
];

const SCORING_BATCH_LIMIT: usize = 30;
const DEFAULT_SCORE: f64 = 50.0;

pub struct Aggregator<'a> {
    generation: &'a GenerationService,
    prompts: &'a PromptStore,
}

impl<'a> Aggregator<'a> {
    pub fn new(generation: &'a GenerationService, prompts: &'a PromptStore) -> Self {
        Self { generation, prompts }
    }

    /// Score candidates and return them sorted by descending relevance.
    pub async fn score(&self, candidates: Vec<Candidate>, query: &str) -> Vec<ScoredCandidate> {
        if candidates.is_empty() {
            warn!("aggregator has nothing to score");
            return Vec::new();
        }

        if let Some(scored) = self.model_score(&candidates, query).await {
            info!(items = scored.len(), "model-scored candidates");
            return scored;
        }

        let current_year = chrono::Utc::now().year();
        let scored = rule_score_all(candidates, current_year);
        info!(items = scored.len(), "rule-scored candidates");
        scored
    }

    async fn model_score(
        &self,
        candidates: &[Candidate],
        query: &str,
    ) -> Option<Vec<ScoredCandidate>> {
        let system = self
            .prompts
            .load_or("aggregator_scorer", prompt_defaults::AGGREGATOR_SCORER);

        let briefs: Vec<Value> = candidates
            .iter()
            .take(SCORING_BATCH_LIMIT)
            .map(brief_projection)
            .collect();
        let user_message = format!(
            "Query: {query}\n\nItems to score ({}):\n{}",
            briefs.len(),
            serde_json::to_string_pretty(&briefs).unwrap_or_default()
        );

        let reply = self
            .generation
            .generate_json(ModelTier::Fast, &system, &user_message, 3000)
            .await?;
        let scored_results = reply.get("scored_results")?.as_array()?;

        let mut by_id: HashMap<&str, &Value> = HashMap::new();
        for entry in scored_results {
            if let Some(id) = entry["id"].as_str() {
                by_id.insert(id, entry);
            }
        }

        let mut scored: Vec<ScoredCandidate> = candidates
            .iter()
            .map(|candidate| {
                let entry = by_id.get(candidate.id.as_str());
                let score = entry
                    .and_then(|e| e["score"].as_f64())
                    .unwrap_or(DEFAULT_SCORE)
                    .clamp(0.0, 100.0);
                let score_breakdown = entry
                    .and_then(|e| e["score_breakdown"].as_object())
                    .map(|m| {
                        m.iter()
                            .filter_map(|(k, v)| v.as_f64().map(|f| (k.clone(), f)))
                            .collect()
                    })
                    .unwrap_or_default();
                let accessibility_index = entry
                    .and_then(|e| e["accessibility_index"].as_f64())
                    .unwrap_or(0.0);
                ScoredCandidate {
                    candidate: candidate.clone(),
                    score,
                    score_breakdown,
                    accessibility_index,
                }
            })
            .collect();
        sort_descending(&mut scored);
        Some(scored)
    }
}

/// Deterministic scoring of one candidate.
///
/// Base 50. Trials: recruiting +20 (not-yet-recruiting +10), phase III +15
/// (phase II +10), plus the bonus of the first accessible location. Articles:
/// current-year +10, previous-year +5. Clamped to [0, 100].
pub fn rule_score(candidate: &Candidate, current_year: i32) -> f64 {
    let mut score = DEFAULT_SCORE;
    let data = &candidate.data;

    match candidate.kind {
        CandidateKind::Trial => {
            let status = data["status"].as_str().unwrap_or_default().to_uppercase();
            if status.contains("RECRUITING") && !status.contains("NOT") {
                score += 20.0;
            } else if status.contains("NOT_YET") {
                score += 10.0;
            }

            let phase = data["phase"].as_str().unwrap_or_default().to_uppercase();
            if phase.contains("III") || phase.contains('3') {
                score += 15.0;
            } else if phase.contains("II") || phase.contains('2') {
                score += 10.0;
            }

            if let Some(locations) = data["locations"].as_array() {
                for loc in locations {
                    let country = loc["country"].as_str().unwrap_or_default().to_lowercase();
                    if let Some((_, bonus)) =
                        ACCESSIBILITY_BONUS.iter().find(|(name, _)| *name == country)
                    {
                        score += bonus;
                        break;
                    }
                }
            }
        }
        CandidateKind::Article => {
            if let Some(year) = data["year"].as_i64() {
                let year = year as i32;
                if year >= current_year {
                    score += 10.0;
                } else if year == current_year - 1 {
                    score += 5.0;
                }
            }
        }
    }

    score.clamp(0.0, 100.0)
}

/// Rule-score a whole batch and sort it.
pub fn rule_score_all(candidates: Vec<Candidate>, current_year: i32) -> Vec<ScoredCandidate> {
    let mut scored: Vec<ScoredCandidate> = candidates
        .into_iter()
        .map(|candidate| {
            let score = rule_score(&candidate, current_year);
            ScoredCandidate {
                candidate,
                score,
                score_breakdown: HashMap::new(),
                accessibility_index: 0.0,
            }
        })
        .collect();
    sort_descending(&mut scored);
    scored
}

/// Stable descending sort, so equal scores keep their arrival order.
fn sort_descending(scored: &mut [ScoredCandidate]) {
    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
}

/// Compact projection of a candidate for the scoring prompt.
fn brief_projection(candidate: &Candidate) -> Value {
    let data = &candidate.data;
    let title: String = data["title"]
        .as_str()
        .unwrap_or_default()
        .chars()
        .take(200)
        .collect();
    match candidate.kind {
        CandidateKind::Trial => {
            let countries: Vec<&str> = data["locations"]
                .as_array()
                .map(|locs| {
                    locs.iter()
                        .take(5)
                        .filter_map(|l| l["country"].as_str())
                        .collect()
                })
                .unwrap_or_default();
            json!({
                "id": candidate.id,
                "type": "trial",
                "title": title,
                "phase": data["phase"].as_str().unwrap_or_default(),
                "status": data["status"].as_str().unwrap_or_default(),
                "countries": countries,
                "sponsor": data["sponsor"].as_str().unwrap_or_default(),
            })
        }
        CandidateKind::Article => json!({
            "id": candidate.id,
            "type": "article",
            "title": title,
            "journal": data["journal"].as_str().unwrap_or_default(),
            "year": data["year"],
        }),
    }
}
