//! Term normalization: Georgian or English free text into an English
//! search bundle.

use serde_json::Value;
use tracing::{info, warn};

use medroute_llm::ModelTier;
use medroute_types::{QueryBundle, ResearchInput};

use crate::prompt_defaults;
use crate::router::Services;

/// Normalize the diagnosis into a query bundle. Never errors: any model
/// failure degrades to a bundle that searches the raw input everywhere.
pub async fn normalize(services: &Services, inp: &ResearchInput) -> QueryBundle {
    let system = services
        .prompts
        .load_or("term_normalizer", prompt_defaults::TERM_NORMALIZER);
    let user_message = format!(
        "Query: {}\nAge group: {}\nStudy type: {}\nContext: {}\nGeography: {}",
        inp.diagnosis, inp.age_group, inp.study_type, inp.additional_context, inp.geography
    );

    match services
        .generation
        .generate_json(ModelTier::Fast, &system, &user_message, 1500)
        .await
    {
        Some(reply) => {
            let bundle = bundle_from_reply(&reply, &inp.diagnosis);
            info!(primary = %bundle.primary_term, "normalized query terms");
            bundle
        }
        None => {
            warn!("term normalization failed, searching raw input");
            QueryBundle::fallback(&inp.diagnosis)
        }
    }
}

pub(crate) fn bundle_from_reply(
    reply: &serde_json::Map<String, Value>,
    raw_query: &str,
) -> QueryBundle {
    let primary_term = reply
        .get("primary_term")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .unwrap_or(raw_query)
        .to_string();

    let mut bundle = QueryBundle {
        original_query: raw_query.to_string(),
        primary_term,
        alternate_terms: string_list(reply.get("alternate_terms")),
        controlled_codes: string_list(reply.get("controlled_codes")),
        synonyms: string_list(reply.get("synonyms")),
        provider_queries: reply
            .get("provider_queries")
            .and_then(Value::as_object)
            .map(|m| {
                m.iter()
                    .filter_map(|(k, v)| v.as_str().map(|q| (k.clone(), q.to_string())))
                    .collect()
            })
            .unwrap_or_default(),
    };
    if bundle.provider_queries.is_empty() {
        for provider in ["clinicaltrials", "pubmed", "general"] {
            bundle
                .provider_queries
                .insert(provider.to_string(), bundle.primary_term.clone());
        }
    }
    bundle
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
