//! Identifier-based deduplication and facility aggregation.
//!
//! Duplicates are detected by natural identifier only (NCT number, PMID).
//! Records without an identifier are dropped: they cannot be deduplicated
//! and would reappear on every merge.

use std::collections::HashSet;

use medroute_types::{FacilityRecord, TrialRecord};

const FACILITY_CAP: usize = 20;

/// Keep the first occurrence per trial id, drop duplicates and id-less rows.
pub fn dedup_trials(trials: Vec<TrialRecord>) -> Vec<TrialRecord> {
    let mut seen = HashSet::new();
    trials
        .into_iter()
        .filter(|t| !t.trial_id.is_empty() && seen.insert(t.trial_id.clone()))
        .collect()
}

/// Keep the first occurrence per article id, drop duplicates and id-less rows.
pub fn dedup_articles(
    articles: Vec<medroute_types::ArticleRecord>,
) -> Vec<medroute_types::ArticleRecord> {
    let mut seen = HashSet::new();
    articles
        .into_iter()
        .filter(|a| !a.article_id.is_empty() && seen.insert(a.article_id.clone()))
        .collect()
}

/// Aggregate trial locations into facilities.
///
/// Merge key is `name|country`; the first occurrence keeps its contact
/// details, later occurrences only increment `active_trials_count`. Records
/// missing either key component are dropped. The output is sorted by trial
/// count descending and capped.
pub fn collect_facilities(trials: &[TrialRecord]) -> Vec<FacilityRecord> {
    let mut facilities: Vec<FacilityRecord> = Vec::new();

    for trial in trials {
        for loc in &trial.locations {
            if loc.facility.is_empty() || loc.country.is_empty() {
                continue;
            }
            let key = format!("{}|{}", loc.facility, loc.country);
            if let Some(existing) = facilities.iter_mut().find(|f| f.merge_key() == key) {
                existing.active_trials_count += 1;
                continue;
            }
            facilities.push(FacilityRecord {
                name: loc.facility.clone(),
                country: loc.country.clone(),
                city: loc.city.clone(),
                contact_email: loc.contact_email.clone(),
                active_trials_count: 1,
                source_url: trial.url.clone(),
                ..FacilityRecord::default()
            });
        }
    }

    facilities.sort_by(|a, b| b.active_trials_count.cmp(&a.active_trials_count));
    facilities.truncate(FACILITY_CAP);
    facilities
}

#[cfg(test)]
mod tests {
    use super::*;
    use medroute_types::{ArticleRecord, TrialLocation};

    fn trial(id: &str) -> TrialRecord {
        TrialRecord {
            trial_id: id.into(),
            ..TrialRecord::default()
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let mut first = trial("NCT1");
        first.title = "first".into();
        let mut second = trial("NCT1");
        second.title = "second".into();
        let deduped = dedup_trials(vec![first, second, trial("NCT2")]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].title, "first");
    }

    #[test]
    fn idless_trials_are_dropped() {
        let deduped = dedup_trials(vec![trial(""), trial(""), trial("NCT1")]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].trial_id, "NCT1");
    }

    #[test]
    fn dedup_articles_by_pmid() {
        let article = |id: &str| ArticleRecord {
            article_id: id.into(),
            ..ArticleRecord::default()
        };
        let deduped = dedup_articles(vec![article("1"), article("1"), article(""), article("2")]);
        assert_eq!(deduped.len(), 2);
    }

    fn trial_at(id: &str, facility: &str, country: &str) -> TrialRecord {
        TrialRecord {
            trial_id: id.into(),
            url: format!("https://clinicaltrials.gov/study/{id}"),
            locations: vec![TrialLocation {
                facility: facility.into(),
                country: country.into(),
                city: "City".into(),
                ..TrialLocation::default()
            }],
            ..TrialRecord::default()
        }
    }

    #[test]
    fn facilities_merge_and_count() {
        let trials = vec![
            trial_at("NCT1", "Acibadem", "Türkiye"),
            trial_at("NCT2", "Acibadem", "Türkiye"),
            trial_at("NCT3", "Sheba", "Israel"),
        ];
        let facilities = collect_facilities(&trials);
        assert_eq!(facilities.len(), 2);
        // Sorted by trial count descending.
        assert_eq!(facilities[0].name, "Acibadem");
        assert_eq!(facilities[0].active_trials_count, 2);
        assert_eq!(facilities[1].active_trials_count, 1);
    }

    #[test]
    fn same_name_different_country_stays_separate() {
        let trials = vec![
            trial_at("NCT1", "University Hospital", "Germany"),
            trial_at("NCT2", "University Hospital", "Austria"),
        ];
        assert_eq!(collect_facilities(&trials).len(), 2);
    }

    #[test]
    fn incomplete_locations_are_dropped() {
        let trials = vec![trial_at("NCT1", "", "Germany"), trial_at("NCT2", "X", "")];
        assert!(collect_facilities(&trials).is_empty());
    }

    #[test]
    fn facility_list_is_capped() {
        let trials: Vec<TrialRecord> = (0..30)
            .map(|i| trial_at(&format!("NCT{i}"), &format!("Clinic {i}"), "Germany"))
            .collect();
        assert_eq!(collect_facilities(&trials).len(), FACILITY_CAP);
    }
}
