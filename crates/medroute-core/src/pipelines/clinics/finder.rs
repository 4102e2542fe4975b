//! Facility discovery via active clinical trials.
//!
//! Facilities running trials for a condition are, in practice, the centers
//! with current expertise in it. The finder searches the registry and
//! aggregates trial locations into a ranked facility list.

use tracing::{info, warn};

use medroute_sources::TrialSearchParams;
use medroute_types::{FacilityRecord, QueryBundle};

use crate::dedup::collect_facilities;
use crate::router::Services;

pub async fn find(
    services: &Services,
    bundle: &QueryBundle,
    preferred_countries: &[String],
) -> Vec<FacilityRecord> {
    let geography = if preferred_countries.is_empty() {
        "worldwide".to_string()
    } else {
        preferred_countries.join(",")
    };

    let params = TrialSearchParams {
        query: bundle.query_for("clinicaltrials").to_string(),
        geography,
        max_results: 30,
        ..TrialSearchParams::new("")
    };

    let trials = match services.clinical_trials.search(&params).await {
        Ok(trials) => trials,
        Err(err) => {
            warn!(error = %err, "trial search for facilities failed");
            return Vec::new();
        }
    };

    let facilities = collect_facilities(&trials);
    info!(
        facilities = facilities.len(),
        trials = trials.len(),
        "facility extraction complete"
    );
    facilities
}
