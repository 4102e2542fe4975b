//! Structured outputs of the symptom-navigation stages.

use serde::{Deserialize, Serialize};

/// One extracted symptom, in Georgian, English, and medical terminology.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSymptom {
    #[serde(default)]
    pub ka: String,
    #[serde(default)]
    pub en: String,
    #[serde(default)]
    pub medical: String,
    #[serde(default = "unknown")]
    pub severity: String,
}

fn unknown() -> String {
    "unknown".to_string()
}

/// Patient context extracted alongside the symptoms.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientContext {
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub sex: String,
    #[serde(default)]
    pub comorbidities: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
}

/// Full output of the symptom parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedSymptoms {
    #[serde(default)]
    pub extracted_symptoms: Vec<ParsedSymptom>,
    #[serde(default)]
    pub patient_context: PatientContext,
    #[serde(default)]
    pub possible_medication_side_effects: Vec<serde_json::Value>,
    /// Warning signs that warrant urgent in-person care. Logged and surfaced
    /// in the report; never changes control flow.
    #[serde(default)]
    pub red_flags: Vec<String>,
}

/// One research direction suggested by the differential stage. Explicitly a
/// direction for further reading, never a diagnosis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResearchDirection {
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub condition_ka: String,
    #[serde(default)]
    pub relevance_explanation: String,
    #[serde(default)]
    pub matching_symptoms: Vec<String>,
    #[serde(default = "possible")]
    pub confidence: String,
    #[serde(default)]
    pub is_rare_disease: bool,
    #[serde(default)]
    pub orphanet_code: Option<String>,
}

fn possible() -> String {
    "possible".to_string()
}

/// Full output of the differential stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DifferentialResult {
    #[serde(default)]
    pub research_directions: Vec<ResearchDirection>,
    #[serde(default)]
    pub medication_interaction_note: String,
    #[serde(default)]
    pub recommended_specialists: Vec<String>,
    #[serde(default)]
    pub recommended_tests: Vec<String>,
    #[serde(default)]
    pub disclaimer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parsed_symptom_defaults_severity() {
        let sym: ParsedSymptom = serde_json::from_str(r#"{"ka": "თავის ტკივილი"}"#).unwrap();
        assert_eq!(sym.severity, "unknown");
    }

    #[test]
    fn direction_defaults_confidence() {
        let dir: ResearchDirection =
            serde_json::from_str(r#"{"condition": "migraine"}"#).unwrap();
        assert_eq!(dir.confidence, "possible");
        assert!(!dir.is_rare_disease);
    }

    #[test]
    fn differential_from_partial_json() {
        let diff: DifferentialResult = serde_json::from_str(
            r#"{"research_directions": [{"condition": "anemia"}], "recommended_specialists": ["hematologist"]}"#,
        )
        .unwrap();
        assert_eq!(diff.research_directions.len(), 1);
        assert_eq!(diff.recommended_specialists, vec!["hematologist"]);
        assert!(diff.recommended_tests.is_empty());
    }
}
