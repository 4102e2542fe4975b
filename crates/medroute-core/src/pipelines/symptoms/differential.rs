//! Differential analysis: research directions, never diagnoses.

use serde_json::Value;
use tracing::{info, warn};

use medroute_llm::ModelTier;
use medroute_types::{DifferentialResult, ParsedSymptoms};

use crate::localization::DISCLAIMER_NOT_DIAGNOSIS;
use crate::prompt_defaults;
use crate::router::Services;

/// Analyze parsed symptoms into research directions. Deep model first,
/// fast model second; when both fail the result carries no directions and
/// the fixed informational disclaimer.
pub async fn analyze(services: &Services, parsed: &ParsedSymptoms) -> DifferentialResult {
    let system = services
        .prompts
        .load_or("differential_analysis", prompt_defaults::DIFFERENTIAL);
    let user_message = build_user_message(parsed);

    for (tier, max_tokens) in [(ModelTier::Deep, 3000), (ModelTier::Fast, 2500)] {
        if let Some(reply) = services
            .generation
            .generate_json(tier, &system, &user_message, max_tokens)
            .await
        {
            if let Ok(result) =
                serde_json::from_value::<DifferentialResult>(Value::Object(reply))
            {
                if !result.research_directions.is_empty() {
                    info!(
                        directions = result.research_directions.len(),
                        "differential analysis complete"
                    );
                    return result;
                }
            }
        }
        warn!(?tier, "differential tier produced no directions");
    }

    DifferentialResult {
        disclaimer: DISCLAIMER_NOT_DIAGNOSIS.to_string(),
        ..DifferentialResult::default()
    }
}

fn build_user_message(parsed: &ParsedSymptoms) -> String {
    let symptoms: Vec<String> = parsed
        .extracted_symptoms
        .iter()
        .map(|s| format!("- {} ({})", s.ka, s.en))
        .collect();
    let ctx = &parsed.patient_context;
    format!(
        "Extracted symptoms:\n{}\n\nPatient context:\n- Age: {}\n- Sex: {}\n- Comorbidities: {}\n- Medications: {}\n\nSide effects identified:\n{}",
        symptoms.join("\n"),
        ctx.age.map(|a| a.to_string()).unwrap_or_else(|| "unknown".to_string()),
        if ctx.sex.is_empty() { "unknown" } else { &ctx.sex },
        join_or_none(&ctx.comorbidities),
        join_or_none(&ctx.medications),
        serde_json::to_string(&parsed.possible_medication_side_effects).unwrap_or_default(),
    )
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}
