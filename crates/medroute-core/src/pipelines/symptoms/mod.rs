//! Symptom navigation pipeline: parse free text, derive research
//! directions, match each direction to live research, report.
//!
//! Every model response here is framed as a research direction, never a
//! diagnosis, and the report carries the informational disclaimer on all
//! paths.

pub mod differential;
pub mod matcher;
pub mod parser;
pub mod report;

use tracing::{info, warn};

use medroute_types::{SearchResponse, SymptomsInput};

use crate::localization::{DISCLAIMER_SYMPTOMS, ERR_SYMPTOM_ANALYSIS};
use crate::router::Services;

pub async fn execute(services: &Services, inp: &SymptomsInput) -> SearchResponse {
    info!(chars = inp.symptoms_text.chars().count(), "symptom pipeline start");

    let parsed = parser::parse(services, inp).await;
    if parsed.extracted_symptoms.is_empty() {
        warn!("no symptoms extracted");
        return SearchResponse::error(ERR_SYMPTOM_ANALYSIS, DISCLAIMER_SYMPTOMS);
    }
    if !parsed.red_flags.is_empty() {
        warn!(red_flags = ?parsed.red_flags, "red flag symptoms present");
    }

    let differential = differential::analyze(services, &parsed).await;
    let matched = matcher::match_directions(services, &differential.research_directions).await;

    let response = report::generate(services, &parsed, &differential, &matched).await;
    info!(
        directions = differential.research_directions.len(),
        items = response.items.len(),
        "symptom pipeline complete"
    );
    response
}
