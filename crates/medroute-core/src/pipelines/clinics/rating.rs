//! Facility rating: accreditation, research output, trial activity.

use futures::future::join_all;
use tracing::info;

use medroute_types::{FacilityRecord, RatedFacility};

use crate::router::Services;

/// Known JCI-accredited facilities, matched by substring against the
/// facility name. A partial list covering the main medical-tourism
/// destinations; absence here means "unknown", not "not accredited".
pub const JCI_ACCREDITED: [&str; 18] = [
    "memorial",
    "anadolu",
    "acibadem",
    "medicana",
    "liv hospital",
    "sheba",
    "hadassah",
    "sourasky",
    "charité",
    "charite",
    "university hospital heidelberg",
    "mayo clinic",
    "johns hopkins",
    "md anderson",
    "cleveland clinic",
    "memorial sloan",
    "bumrungrad",
    "apollo",
];

/// Facilities beyond this rank get the heuristic rating only, to keep the
/// PubMed fan-out within rate limits.
const DETAILED_RATING_CAP: usize = 10;
const MAX_SCORE: f64 = 100.0;

pub async fn rate(
    services: &Services,
    facilities: Vec<FacilityRecord>,
    condition: &str,
) -> Vec<RatedFacility> {
    if facilities.is_empty() {
        return Vec::new();
    }

    let (detailed, remainder): (Vec<_>, Vec<_>) = {
        let mut facilities = facilities;
        let rest = facilities.split_off(facilities.len().min(DETAILED_RATING_CAP));
        (facilities, rest)
    };

    let tasks = detailed
        .into_iter()
        .map(|facility| rate_single(services, facility, condition));
    let mut rated: Vec<RatedFacility> = join_all(tasks).await;

    rated.extend(remainder.into_iter().map(heuristic_rating));
    info!(facilities = rated.len(), "facility rating complete");
    rated
}

async fn rate_single(
    services: &Services,
    facility: FacilityRecord,
    condition: &str,
) -> RatedFacility {
    let jci = is_jci_accredited(&facility.name);

    // Research output of the facility on this condition.
    let query = format!("\"{}\"[Affiliation] AND {condition}", facility.name);
    let publication_count = services
        .pubmed
        .search(&query, 5, 5, &[])
        .await
        .map(|articles| articles.len() as u32)
        .unwrap_or(0);

    let score = detailed_score(&facility, jci, publication_count);
    RatedFacility {
        facility: FacilityRecord {
            jci_accredited: Some(jci),
            ..facility
        },
        rating_score: score,
        publication_count,
        ..RatedFacility::default()
    }
}

/// Rating without any API calls, used past the cap and on per-item failure.
pub fn heuristic_rating(facility: FacilityRecord) -> RatedFacility {
    let jci = is_jci_accredited(&facility.name);
    let score = 50.0
        + if jci { 10.0 } else { 0.0 }
        + (facility.active_trials_count as f64 * 5.0).min(20.0);
    RatedFacility {
        facility: FacilityRecord {
            jci_accredited: Some(jci),
            ..facility
        },
        rating_score: score.min(MAX_SCORE),
        ..RatedFacility::default()
    }
}

fn detailed_score(facility: &FacilityRecord, jci: bool, publication_count: u32) -> f64 {
    let mut score = 40.0;
    if jci {
        score += 15.0;
    }
    score += (publication_count as f64 * 5.0).min(20.0);
    score += (facility.active_trials_count as f64 * 5.0).min(25.0);
    score.min(MAX_SCORE)
}

pub fn is_jci_accredited(name: &str) -> bool {
    let name = name.to_lowercase();
    JCI_ACCREDITED.iter().any(|known| name.contains(known))
}
