//! Typed pipeline inputs, parsed permissively from the untyped payload.
//!
//! Two generations of the frontend send different field names (camelCase vs
//! snake_case, and some outright renames). The parsers here accept both and
//! normalize "string or list" fields into a single canonical form at the
//! boundary, so nothing downstream ever branches on runtime shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Input to the research pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchInput {
    pub diagnosis: String,
    pub age_group: String,
    pub study_type: String,
    pub additional_context: String,
    /// Comma-joined named geographies, or "worldwide".
    pub geography: String,
}

impl ResearchInput {
    /// Parse from an untyped payload, accepting both field-name conventions.
    pub fn from_value(data: &Value) -> Self {
        Self {
            diagnosis: str_field(data, &["diagnosis"]),
            age_group: str_field_or(data, &["ageGroup", "age_group"], "any"),
            study_type: str_field_or(data, &["researchType", "study_type"], "all"),
            additional_context: str_field(data, &["context", "additional_context"]),
            geography: geography_field(data),
        }
    }
}

/// Input to the symptom-navigation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymptomsInput {
    pub symptoms_text: String,
    pub age: Option<u32>,
    pub sex: String,
    pub existing_diagnoses: String,
    pub current_medications: String,
}

impl SymptomsInput {
    pub fn from_value(data: &Value) -> Self {
        Self {
            symptoms_text: str_field(data, &["symptoms", "symptoms_text"]),
            age: data.get("age").and_then(Value::as_u64).map(|a| a as u32),
            sex: str_field(data, &["sex"]),
            existing_diagnoses: str_field(data, &["existingConditions", "existing_diagnoses"]),
            current_medications: str_field(data, &["medications", "current_medications"]),
        }
    }
}

/// Input to the clinic-search pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicInput {
    pub diagnosis_or_treatment: String,
    pub preferred_countries: Vec<String>,
    pub budget_range: String,
    pub language_preference: String,
    pub additional_requirements: String,
}

impl ClinicInput {
    pub fn from_value(data: &Value) -> Self {
        Self {
            diagnosis_or_treatment: str_field(data, &["diagnosis", "diagnosis_or_treatment"]),
            preferred_countries: string_or_list(data, &["countries", "preferred_countries"]),
            budget_range: str_field_or(data, &["budget", "budget_range"], "no_preference"),
            language_preference: str_field_or(data, &["language", "language_preference"], "any"),
            additional_requirements: str_field(data, &["notes", "additional_requirements"]),
        }
    }
}

/// First non-missing string value among `keys`, else empty.
fn str_field(data: &Value, keys: &[&str]) -> String {
    for key in keys {
        if let Some(s) = data.get(key).and_then(Value::as_str) {
            return s.to_string();
        }
    }
    String::new()
}

/// Like [`str_field`] but falls back to `default` when absent or empty.
fn str_field_or(data: &Value, keys: &[&str], default: &str) -> String {
    let value = str_field(data, keys);
    if value.is_empty() {
        default.to_string()
    } else {
        value
    }
}

/// Accepts a native list or a comma-joined string; always yields a list of
/// trimmed, non-empty entries.
fn string_or_list(data: &Value, keys: &[&str]) -> Vec<String> {
    for key in keys {
        match data.get(key) {
            Some(Value::Array(items)) => {
                return items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect();
            }
            Some(Value::String(s)) => {
                return s
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
            }
            _ => {}
        }
    }
    Vec::new()
}

/// Geography arrives under `regions` or `geography`, as a list or a string.
/// Canonical form is a comma-joined string; empty inputs become "worldwide".
fn geography_field(data: &Value) -> String {
    for key in ["regions", "geography"] {
        match data.get(key) {
            Some(Value::Array(items)) => {
                let joined: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                return if joined.is_empty() {
                    "worldwide".to_string()
                } else {
                    joined.join(",")
                };
            }
            Some(Value::String(s)) if !s.is_empty() => return s.clone(),
            _ => {}
        }
    }
    "worldwide".to_string()
}
