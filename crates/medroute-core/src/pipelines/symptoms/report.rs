//! Navigator report synthesis for the symptom pipeline.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::warn;

use medroute_llm::ModelTier;
use medroute_types::{
    DifferentialResult, ParsedSymptoms, ResultItem, ScoredCandidate, SearchResponse, TipItem,
};

use crate::localization::DISCLAIMER_SYMPTOMS;
use crate::pipelines::{response_from_reply, truncate_chars};
use crate::prompt_defaults;
use crate::router::Services;

const FALLBACK_DIRECTIONS: usize = 5;

pub async fn generate(
    services: &Services,
    parsed: &ParsedSymptoms,
    differential: &DifferentialResult,
    matched: &HashMap<String, Vec<ScoredCandidate>>,
) -> SearchResponse {
    let system = services
        .prompts
        .load_or("navigator_report", prompt_defaults::NAVIGATOR_REPORT);

    let report_data = json!({
        "extracted_symptoms": parsed.extracted_symptoms,
        "patient_context": parsed.patient_context,
        "red_flags": parsed.red_flags,
        "research_directions": differential.research_directions,
        "recommended_specialists": differential.recommended_specialists,
        "recommended_tests": differential.recommended_tests,
        "medication_interaction_note": differential.medication_interaction_note,
        "matched_research": prepare_matched(matched),
    });
    let user_message = serde_json::to_string_pretty(&report_data).unwrap_or_default();
    let default_meta = "სიმპტომების ნავიგაციის შედეგები";

    for (tier, max_tokens) in [(ModelTier::Deep, 4000), (ModelTier::Fast, 3000)] {
        if let Some(reply) = services
            .generation
            .generate_json(tier, &system, &user_message, max_tokens)
            .await
        {
            if let Some(response) =
                response_from_reply(&reply, default_meta, DISCLAIMER_SYMPTOMS)
            {
                return response;
            }
        }
        warn!(?tier, "navigator report tier produced no usable document");
    }

    render_fallback(parsed, differential)
}

/// Compact projection of the matched candidates for the prompt.
fn prepare_matched(matched: &HashMap<String, Vec<ScoredCandidate>>) -> Vec<Value> {
    matched
        .iter()
        .map(|(condition, scored)| {
            let entries: Vec<Value> = scored
                .iter()
                .map(|s| {
                    json!({
                        "id": s.candidate.id,
                        "type": s.candidate.kind,
                        "score": s.score,
                        "title": s.candidate.data["title"],
                        "url": s.candidate.data["url"],
                    })
                })
                .collect();
            json!({"condition": condition, "results": entries})
        })
        .collect()
}

/// Deterministic Georgian rendering of the differential output.
pub(crate) fn render_fallback(
    parsed: &ParsedSymptoms,
    differential: &DifferentialResult,
) -> SearchResponse {
    let mut items = Vec::new();

    let symptom_list: Vec<&str> = parsed
        .extracted_symptoms
        .iter()
        .map(|s| if s.ka.is_empty() { s.en.as_str() } else { s.ka.as_str() })
        .collect();
    items.push(ResultItem {
        title: "აღწერილი სიმპტომები".to_string(),
        source: "მედგზური".to_string(),
        body: symptom_list.join(", "),
        tags: parsed.red_flags.clone(),
        ..ResultItem::default()
    });

    for direction in differential
        .research_directions
        .iter()
        .take(FALLBACK_DIRECTIONS)
    {
        let title = if direction.condition_ka.is_empty() {
            direction.condition.clone()
        } else {
            direction.condition_ka.clone()
        };
        let mut tags = vec![direction.confidence.clone()];
        if direction.is_rare_disease {
            tags.push("იშვიათი დაავადება".to_string());
        }
        items.push(ResultItem {
            title,
            source: "კვლევის მიმართულება".to_string(),
            body: truncate_chars(&direction.relevance_explanation, 400),
            tags,
            ..ResultItem::default()
        });
    }

    if !differential.recommended_specialists.is_empty() {
        items.push(ResultItem {
            title: "რეკომენდებული სპეციალისტები".to_string(),
            source: "მედგზური".to_string(),
            body: differential.recommended_specialists.join(", "),
            ..ResultItem::default()
        });
    }

    let next_steps = differential
        .recommended_tests
        .iter()
        .map(|test| TipItem {
            text: test.clone(),
            icon: String::new(),
        })
        .collect();

    SearchResponse {
        meta: "სიმპტომების ნავიგაციის შედეგები".to_string(),
        items,
        summary: differential.medication_interaction_note.clone(),
        next_steps,
        disclaimer: DISCLAIMER_SYMPTOMS.to_string(),
        ..SearchResponse::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medroute_types::{ParsedSymptom, ResearchDirection};

    fn sample_parsed() -> ParsedSymptoms {
        ParsedSymptoms {
            extracted_symptoms: vec![
                ParsedSymptom {
                    ka: "თავის ტკივილი".into(),
                    en: "headache".into(),
                    ..ParsedSymptom::default()
                },
                ParsedSymptom {
                    ka: String::new(),
                    en: "nausea".into(),
                    ..ParsedSymptom::default()
                },
            ],
            red_flags: vec!["sudden onset".into()],
            ..ParsedSymptoms::default()
        }
    }

    fn sample_differential() -> DifferentialResult {
        DifferentialResult {
            research_directions: vec![ResearchDirection {
                condition: "migraine".into(),
                condition_ka: "შაკიკი".into(),
                relevance_explanation: "matches headache pattern".into(),
                confidence: "likely".into(),
                is_rare_disease: false,
                ..ResearchDirection::default()
            }],
            recommended_specialists: vec!["ნევროლოგი".into()],
            recommended_tests: vec!["MRI".into()],
            ..DifferentialResult::default()
        }
    }

    #[test]
    fn fallback_lists_symptoms_directions_and_specialists() {
        let resp = render_fallback(&sample_parsed(), &sample_differential());
        assert_eq!(resp.items.len(), 3);
        assert_eq!(resp.items[0].body, "თავის ტკივილი, nausea");
        assert_eq!(resp.items[1].title, "შაკიკი");
        assert_eq!(resp.items[1].tags, vec!["likely"]);
        assert_eq!(resp.items[2].body, "ნევროლოგი");
        assert_eq!(resp.next_steps.len(), 1);
        assert_eq!(resp.disclaimer, DISCLAIMER_SYMPTOMS);
    }

    #[test]
    fn fallback_marks_rare_diseases() {
        let mut differential = sample_differential();
        differential.research_directions[0].is_rare_disease = true;
        let resp = render_fallback(&sample_parsed(), &differential);
        assert!(resp.items[1]
            .tags
            .contains(&"იშვიათი დაავადება".to_string()));
    }
}
