//! Research search pipeline: normalize terms, search registries and
//! literature in parallel, score, report.

pub mod literature;
pub mod normalizer;
pub mod report;
pub mod trials;

use tracing::{info, warn};

use medroute_types::{Candidate, ResearchInput, SearchResponse};

use crate::localization::{DISCLAIMER_DEFAULT, ERR_NO_RESEARCH_RESULTS};
use crate::router::Services;
use crate::scoring::Aggregator;

pub async fn execute(services: &Services, inp: &ResearchInput) -> SearchResponse {
    info!(diagnosis = %inp.diagnosis, geography = %inp.geography, "research pipeline start");

    let bundle = normalizer::normalize(services, inp).await;

    let (trials, literature) = tokio::join!(
        trials::search_trials(
            services,
            &bundle,
            &inp.age_group,
            &inp.geography,
            &inp.study_type,
            20,
        ),
        literature::search_literature(services, &bundle, &inp.diagnosis, 20),
    );

    if trials.is_empty() && literature.articles.is_empty() {
        warn!("research pipeline found nothing");
        return SearchResponse::error(ERR_NO_RESEARCH_RESULTS, DISCLAIMER_DEFAULT);
    }

    let mut candidates: Vec<Candidate> = trials.iter().map(Candidate::from_trial).collect();
    candidates.extend(literature.articles.iter().map(Candidate::from_article));
    // Model-curated articles may arrive without an id; those cannot be
    // scored by reference and are dropped here.
    candidates.retain(|c| !c.id.is_empty());

    let scored = Aggregator::new(&services.generation, &services.prompts)
        .score(candidates, &inp.diagnosis)
        .await;

    let response =
        report::generate(services, &scored, &literature.field_summary, &inp.diagnosis).await;
    info!(items = response.items.len(), "research pipeline complete");
    response
}
