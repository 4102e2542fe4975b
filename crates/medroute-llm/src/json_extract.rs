//! Extraction of a JSON object from free-form model output.
//!
//! Models are asked for pure JSON but routinely wrap it in prose or code
//! fences. Three strategies run in order:
//!
//! 1. the contents of the first ```json / ``` fenced block,
//! 2. the whole trimmed text,
//! 3. the first balanced `{ ... }` span that parses, tracked with
//!    string/escape state and restarted past spans that do not.
//!
//! Only top-level objects qualify; arrays and scalars are rejected.

use serde_json::{Map, Value};

/// Extract the first JSON object found in `text`, or `None`.
pub fn extract_json(text: &str) -> Option<Map<String, Value>> {
    if let Some(fenced) = fenced_block(text) {
        if let Some(obj) = parse_object(fenced) {
            return Some(obj);
        }
    }
    if let Some(obj) = parse_object(text.trim()) {
        return Some(obj);
    }
    balanced_object(text)
}

fn parse_object(candidate: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// Contents of the first ``` fenced block, with an optional `json` tag.
fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_ticks = &text[open + 3..];
    // Skip a language tag on the fence line.
    let body_start = after_ticks.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_ticks[body_start..];
    let close = body.find("```")?;
    Some(body[..close].trim())
}

/// First balanced `{...}` span that parses as an object.
///
/// A span that never balances, or balances but fails to parse, does not end
/// the scan: the search resumes at the next `{` so one garbage fragment
/// cannot hide a valid object later in the reply.
fn balanced_object(text: &str) -> Option<Map<String, Value>> {
    let mut search_from = 0;
    while let Some(found) = text[search_from..].find('{') {
        let start = search_from + found;
        match balanced_span(&text[start..]) {
            Some(span) => {
                if let Some(obj) = parse_object(span) {
                    return Some(obj);
                }
                search_from = start + span.len();
            }
            None => search_from = start + 1,
        }
    }
    None
}

/// Balanced top-level `{...}` prefix of `text`, respecting strings and
/// escapes. `text` must start at a `{`.
fn balanced_span(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escape_next = false;
    for (offset, ch) in text.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[..offset + ch.len_utf8()]);
                }
            }
            _ => {}
        }
    }
    None
}
