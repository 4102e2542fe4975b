//! The three request pipelines.

pub mod clinics;
pub mod research;
pub mod symptoms;

use serde_json::{Map, Value};

use medroute_types::{ComparisonTable, ResultItem, SearchResponse, TipItem};

/// Parse a model reply into a response document.
///
/// Returns `None` when the reply carries no items, which sends the caller
/// to its next fallback tier.
pub(crate) fn response_from_reply(
    reply: &Map<String, Value>,
    default_meta: &str,
    default_disclaimer: &str,
) -> Option<SearchResponse> {
    let items: Vec<ResultItem> = reply
        .get("items")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    if items.is_empty() {
        return None;
    }

    let comparison: Option<ComparisonTable> = reply
        .get("comparison")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .filter(|table: &ComparisonTable| !table.headers.is_empty() && table.is_well_formed());

    Some(SearchResponse {
        meta: reply
            .get("meta")
            .and_then(Value::as_str)
            .unwrap_or(default_meta)
            .to_string(),
        items,
        summary: reply
            .get("summary")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        comparison,
        tips: tip_list(reply.get("tips")),
        next_steps: tip_list(reply.get("nextSteps")),
        disclaimer: reply
            .get("disclaimer")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .unwrap_or(default_disclaimer)
            .to_string(),
        ..SearchResponse::default()
    })
}

fn tip_list(value: Option<&Value>) -> Vec<TipItem> {
    value
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

/// Truncate to a character count without splitting a code point.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
