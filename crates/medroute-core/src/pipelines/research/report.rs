//! Research report synthesis.
//!
//! Deep model first, fast model with a reduced token budget second, and a
//! deterministic Georgian renderer as the floor. The floor never fails, so
//! every pipeline run that reaches this stage produces a document.

use serde_json::{json, Value};
use tracing::warn;

use medroute_llm::ModelTier;
use medroute_types::{CandidateKind, ResultItem, ScoredCandidate, SearchResponse};

use crate::localization::DISCLAIMER_RESEARCH;
use crate::pipelines::{response_from_reply, truncate_chars};
use crate::prompt_defaults;
use crate::router::Services;

const TOP_RESULTS: usize = 10;

pub async fn generate(
    services: &Services,
    scored: &[ScoredCandidate],
    field_summary: &str,
    original_query: &str,
) -> SearchResponse {
    let system = services
        .prompts
        .load_or("research_report", prompt_defaults::RESEARCH_REPORT);

    let total_trials = scored
        .iter()
        .filter(|s| s.candidate.kind == CandidateKind::Trial)
        .count();
    let report_data = json!({
        "query": original_query,
        "total_trials": total_trials,
        "total_articles": scored.len() - total_trials,
        "top_results": prepare_results(scored),
        "field_summary": field_summary,
    });
    let user_message = serde_json::to_string_pretty(&report_data).unwrap_or_default();
    let default_meta = "კვლევების ძიების შედეგები";

    for (tier, max_tokens) in [(ModelTier::Deep, 4000), (ModelTier::Fast, 3000)] {
        if let Some(reply) = services
            .generation
            .generate_json(tier, &system, &user_message, max_tokens)
            .await
        {
            if let Some(response) =
                response_from_reply(&reply, default_meta, DISCLAIMER_RESEARCH)
            {
                return response;
            }
        }
        warn!(?tier, "research report tier produced no usable document");
    }

    render_fallback(scored, original_query)
}

/// Trim candidates down to what the report prompt needs.
fn prepare_results(scored: &[ScoredCandidate]) -> Vec<Value> {
    scored
        .iter()
        .take(TOP_RESULTS)
        .map(|s| {
            let data = &s.candidate.data;
            match s.candidate.kind {
                CandidateKind::Trial => json!({
                    "id": s.candidate.id,
                    "type": "trial",
                    "score": s.score,
                    "accessibility_index": s.accessibility_index,
                    "title": data["title"],
                    "phase": data["phase"],
                    "status": data["status"],
                    "sponsor": data["sponsor"],
                    "url": data["url"],
                    "locations": data["locations"].as_array().map(|l| &l[..l.len().min(5)]),
                    "interventions": data["interventions"].as_array().map(|i| &i[..i.len().min(3)]),
                    "eligibility": data["eligibility"],
                }),
                CandidateKind::Article => json!({
                    "id": s.candidate.id,
                    "type": "article",
                    "score": s.score,
                    "title": data["title"],
                    "abstract_summary": truncate_chars(
                        data["abstract_summary"].as_str().unwrap_or_default(), 300),
                    "journal": data["journal"],
                    "year": data["year"],
                    "doi": data["doi"],
                    "relevance_note": data["relevance_note"],
                }),
            }
        })
        .collect()
}

/// Deterministic Georgian rendering of the top scored candidates.
pub(crate) fn render_fallback(scored: &[ScoredCandidate], query: &str) -> SearchResponse {
    let items: Vec<ResultItem> = scored
        .iter()
        .take(TOP_RESULTS)
        .map(|s| {
            let data = &s.candidate.data;
            match s.candidate.kind {
                CandidateKind::Trial => {
                    let locations = data["locations"]
                        .as_array()
                        .map(|locs| {
                            locs.iter()
                                .take(3)
                                .map(|l| {
                                    format!(
                                        "{} ({})",
                                        l["country"].as_str().unwrap_or_default(),
                                        l["facility"].as_str().unwrap_or_default()
                                    )
                                })
                                .collect::<Vec<_>>()
                                .join(", ")
                        })
                        .unwrap_or_default();
                    let phase = data["phase"].as_str().unwrap_or_default();
                    let status = data["status"].as_str().unwrap_or_default();
                    ResultItem {
                        title: data["title"].as_str().unwrap_or_default().to_string(),
                        source: format!("ClinicalTrials.gov | {phase}"),
                        body: format!(
                            "**სტატუსი:** {status}\n**ლოკაცია:** {locations}\n**სპონსორი:** {}",
                            data["sponsor"].as_str().unwrap_or_default()
                        ),
                        tags: vec![phase.to_string(), status.to_string()],
                        url: data["url"].as_str().unwrap_or_default().to_string(),
                        phase: phase.to_string(),
                        ..ResultItem::default()
                    }
                }
                CandidateKind::Article => ResultItem {
                    title: data["title"].as_str().unwrap_or_default().to_string(),
                    source: data["journal"].as_str().unwrap_or_default().to_string(),
                    body: truncate_chars(
                        data["abstract_summary"].as_str().unwrap_or_default(),
                        500,
                    ),
                    tags: vec![
                        "სტატია".to_string(),
                        data["year"]
                            .as_i64()
                            .map(|y| y.to_string())
                            .unwrap_or_default(),
                    ],
                    url: data["source_url"].as_str().unwrap_or_default().to_string(),
                    ..ResultItem::default()
                },
            }
        })
        .collect();

    SearchResponse {
        meta: format!("ნაპოვნია {} შედეგი: {query}", items.len()),
        items,
        disclaimer: DISCLAIMER_RESEARCH.to_string(),
        ..SearchResponse::default()
    }
}
