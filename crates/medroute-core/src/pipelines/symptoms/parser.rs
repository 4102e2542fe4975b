//! Symptom extraction from free-text Georgian descriptions.

use serde_json::Value;
use tracing::{info, warn};

use medroute_llm::ModelTier;
use medroute_types::{ParsedSymptom, ParsedSymptoms, PatientContext, SymptomsInput};

use crate::prompt_defaults;
use crate::router::Services;

/// Parse symptoms into structure. Never errors: a model failure yields a
/// minimal bundle carrying the raw text as a single symptom.
pub async fn parse(services: &Services, inp: &SymptomsInput) -> ParsedSymptoms {
    let system = services
        .prompts
        .load_or("symptom_parser", prompt_defaults::SYMPTOM_PARSER);
    let user_message = format!(
        "Symptom description: {}\nAge: {}\nSex: {}\nExisting diagnoses: {}\nCurrent medications: {}",
        inp.symptoms_text,
        inp.age.map(|a| a.to_string()).unwrap_or_else(|| "not specified".to_string()),
        non_empty_or(&inp.sex, "not specified"),
        non_empty_or(&inp.existing_diagnoses, "none"),
        non_empty_or(&inp.current_medications, "none"),
    );

    if let Some(reply) = services
        .generation
        .generate_json(ModelTier::Fast, &system, &user_message, 2000)
        .await
    {
        if let Ok(parsed) =
            serde_json::from_value::<ParsedSymptoms>(Value::Object(reply.clone()))
        {
            if !parsed.extracted_symptoms.is_empty() {
                info!(symptoms = parsed.extracted_symptoms.len(), "symptoms parsed");
                return parsed;
            }
        }
    }

    warn!("symptom parsing failed, using minimal bundle");
    minimal_bundle(inp)
}

fn minimal_bundle(inp: &SymptomsInput) -> ParsedSymptoms {
    ParsedSymptoms {
        extracted_symptoms: vec![ParsedSymptom {
            ka: inp.symptoms_text.clone(),
            en: inp.symptoms_text.clone(),
            medical: String::new(),
            severity: "unknown".to_string(),
        }],
        patient_context: PatientContext {
            age: inp.age,
            sex: inp.sex.clone(),
            comorbidities: non_empty_vec(&inp.existing_diagnoses),
            medications: non_empty_vec(&inp.current_medications),
        },
        ..ParsedSymptoms::default()
    }
}

fn non_empty_or<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.is_empty() { default } else { value }
}

fn non_empty_vec(value: &str) -> Vec<String> {
    if value.is_empty() {
        Vec::new()
    } else {
        vec![value.to_string()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_bundle_carries_raw_text_and_context() {
        let inp = SymptomsInput {
            symptoms_text: "თავის ტკივილი და გულისრევა".into(),
            age: Some(34),
            sex: "f".into(),
            existing_diagnoses: "მიგრენი".into(),
            current_medications: String::new(),
        };
        let parsed = minimal_bundle(&inp);
        assert_eq!(parsed.extracted_symptoms.len(), 1);
        assert_eq!(parsed.extracted_symptoms[0].ka, inp.symptoms_text);
        assert_eq!(parsed.extracted_symptoms[0].severity, "unknown");
        assert_eq!(parsed.patient_context.age, Some(34));
        assert_eq!(parsed.patient_context.comorbidities, vec!["მიგრენი"]);
        assert!(parsed.patient_context.medications.is_empty());
        assert!(parsed.red_flags.is_empty());
    }
}
