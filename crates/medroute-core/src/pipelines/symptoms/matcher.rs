//! Research matching: runs a condition-scoped research search for each
//! suggested direction.

use std::collections::HashMap;

use futures::future::join_all;
use tracing::info;

use medroute_types::{ResearchDirection, ResearchInput, ScoredCandidate};

use crate::pipelines::research::{literature, normalizer, trials};
use crate::router::Services;
use crate::scoring::Aggregator;

/// Directions beyond this rank are not searched, to bound the fan-out.
const DIRECTION_LIMIT: usize = 3;
/// Top results kept per direction.
const RESULTS_PER_DIRECTION: usize = 5;

pub async fn match_directions(
    services: &Services,
    directions: &[ResearchDirection],
) -> HashMap<String, Vec<ScoredCandidate>> {
    if directions.is_empty() {
        return HashMap::new();
    }

    let top: Vec<&ResearchDirection> = directions
        .iter()
        .filter(|d| !d.condition.is_empty())
        .take(DIRECTION_LIMIT)
        .collect();

    let tasks = top.iter().map(|d| match_single(services, d));
    let results = join_all(tasks).await;

    top.iter()
        .zip(results)
        .map(|(direction, scored)| {
            info!(
                condition = %direction.condition,
                results = scored.len(),
                "direction matched"
            );
            (direction.condition.clone(), scored)
        })
        .collect()
}

async fn match_single(
    services: &Services,
    direction: &ResearchDirection,
) -> Vec<ScoredCandidate> {
    let inp = ResearchInput {
        diagnosis: direction.condition.clone(),
        age_group: "any".to_string(),
        study_type: "all".to_string(),
        additional_context: String::new(),
        geography: "worldwide".to_string(),
    };

    let bundle = normalizer::normalize(services, &inp).await;
    let (found_trials, found_literature) = tokio::join!(
        trials::search_trials(services, &bundle, "any", "worldwide", "all", 10),
        literature::search_literature(services, &bundle, &direction.condition, 5),
    );

    let mut candidates: Vec<_> = found_trials
        .iter()
        .map(medroute_types::Candidate::from_trial)
        .collect();
    candidates.extend(
        found_literature
            .articles
            .iter()
            .map(medroute_types::Candidate::from_article),
    );
    candidates.retain(|c| !c.id.is_empty());

    let mut scored = Aggregator::new(&services.generation, &services.prompts)
        .score(candidates, &direction.condition)
        .await;
    scored.truncate(RESULTS_PER_DIRECTION);
    scored
}
