//! Clinic search pipeline: build queries, find facilities through trial
//! activity, rate them, estimate costs, report.

pub mod cost;
pub mod finder;
pub mod query_builder;
pub mod rating;
pub mod report;

use tracing::info;

use medroute_types::{ClinicInput, SearchResponse};

use crate::localization::{DISCLAIMER_CLINICS, ERR_NO_CLINICS};
use crate::router::Services;

pub async fn execute(services: &Services, inp: &ClinicInput) -> SearchResponse {
    info!(treatment = %inp.diagnosis_or_treatment, "clinic pipeline start");

    let bundle = query_builder::build(services, inp).await;
    let facilities = finder::find(services, &bundle, &inp.preferred_countries).await;
    if facilities.is_empty() {
        return SearchResponse::error(ERR_NO_CLINICS, DISCLAIMER_CLINICS);
    }

    // Cost estimation consumes the rated list, so it stays sequential.
    let rated = rating::rate(services, facilities, &bundle.primary_term).await;
    let costs = cost::estimate(&rated);

    let response =
        report::generate(services, &rated, &costs, &inp.diagnosis_or_treatment).await;
    info!(items = response.items.len(), "clinic pipeline complete");
    response
}
