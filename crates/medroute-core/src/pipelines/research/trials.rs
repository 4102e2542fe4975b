//! Trial search across the three registries.

use futures::future::FutureExt;
use tracing::info;

use medroute_sources::{collect_named, TrialSearchParams};
use medroute_types::{QueryBundle, TrialRecord};

use crate::dedup::dedup_trials;
use crate::router::Services;

/// Search all registries in parallel and merge the results. A failed
/// registry contributes zero trials.
pub async fn search_trials(
    services: &Services,
    bundle: &QueryBundle,
    age_group: &str,
    geography: &str,
    study_type: &str,
    max_results: usize,
) -> Vec<TrialRecord> {
    let params = TrialSearchParams {
        query: bundle.query_for("clinicaltrials").to_string(),
        age_group: age_group.to_string(),
        geography: geography.to_string(),
        study_type: study_type.to_string(),
        status: "recruiting".to_string(),
        max_results,
    };

    let trials = collect_named(vec![
        (
            "clinicaltrials.gov",
            services.clinical_trials.search(&params).boxed(),
        ),
        (
            "eu-ctr",
            services.eu_ctr.search(&bundle.primary_term, 10).boxed(),
        ),
        (
            "who-ictrp",
            services.who_ictrp.search(&bundle.primary_term, 10).boxed(),
        ),
    ])
    .await;

    let raw = trials.len();
    let deduped = dedup_trials(trials);
    info!(raw, deduped = deduped.len(), "registry fan-out complete");
    deduped
}
