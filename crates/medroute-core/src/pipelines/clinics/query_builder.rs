//! Query building for the clinic search.

use tracing::{info, warn};

use medroute_llm::ModelTier;
use medroute_types::{ClinicInput, QueryBundle};

use crate::pipelines::research::normalizer::bundle_from_reply;
use crate::prompt_defaults;
use crate::router::Services;

/// Normalize the treatment request into a query bundle. Never errors.
pub async fn build(services: &Services, inp: &ClinicInput) -> QueryBundle {
    let system = services
        .prompts
        .load_or("clinic_query_builder", prompt_defaults::CLINIC_QUERY_BUILDER);
    let countries = if inp.preferred_countries.is_empty() {
        "worldwide".to_string()
    } else {
        inp.preferred_countries.join(", ")
    };
    let user_message = format!(
        "Diagnosis/Treatment: {}\nPreferred countries: {}\nBudget: {}\nLanguage: {}\nRequirements: {}",
        inp.diagnosis_or_treatment,
        countries,
        inp.budget_range,
        inp.language_preference,
        inp.additional_requirements
    );

    match services
        .generation
        .generate_json(ModelTier::Fast, &system, &user_message, 1000)
        .await
    {
        Some(reply) => {
            let bundle = bundle_from_reply(&reply, &inp.diagnosis_or_treatment);
            info!(primary = %bundle.primary_term, "clinic query built");
            bundle
        }
        None => {
            warn!("clinic query building failed, searching raw input");
            QueryBundle::fallback(&inp.diagnosis_or_treatment)
        }
    }
}
