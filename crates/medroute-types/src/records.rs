//! Provider result records: trials, articles, and care facilities.

use serde::{Deserialize, Serialize};

/// One location of a clinical trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialLocation {
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub facility: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_email: String,
}

/// Eligibility summary for a trial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrialEligibility {
    #[serde(default = "not_available")]
    pub min_age: String,
    #[serde(default = "not_available")]
    pub max_age: String,
    #[serde(default = "all_sexes")]
    pub sex: String,
}

fn not_available() -> String {
    "N/A".to_string()
}

fn all_sexes() -> String {
    "All".to_string()
}

impl Default for TrialEligibility {
    fn default() -> Self {
        Self {
            min_age: not_available(),
            max_age: not_available(),
            sex: all_sexes(),
        }
    }
}

/// One intervention arm of a trial.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialIntervention {
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}

/// Start/completion dates of a trial, as the registry reports them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialDates {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub estimated_completion: String,
}

/// A single clinical trial, normalized across registries.
///
/// `trial_id` is the registry's natural identifier (NCT number, CT number).
/// Records without one are ineligible for deduplication and get dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub phase: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub interventions: Vec<TrialIntervention>,
    #[serde(default)]
    pub locations: Vec<TrialLocation>,
    #[serde(default)]
    pub eligibility: TrialEligibility,
    #[serde(default)]
    pub dates: TrialDates,
    #[serde(default)]
    pub sponsor: String,
    #[serde(default)]
    pub enrollment: Option<u64>,
    #[serde(default)]
    pub source_registry: String,
    #[serde(default)]
    pub url: String,
}

/// A single literature article, normalized across databases.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub article_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub abstract_summary: String,
    #[serde(default)]
    pub journal: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub doi: String,
    #[serde(default)]
    pub relevance_note: String,
    #[serde(default)]
    pub source_url: String,
}

/// A care facility, aggregated from the locations of active trials.
///
/// The dedup key is `name|country`; duplicates increment
/// `active_trials_count`, which later feeds into the rating score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub active_trials_count: u32,
    #[serde(default)]
    pub jci_accredited: Option<bool>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub source_url: String,
}

impl FacilityRecord {
    /// Dedup/merge key. Empty when either component is missing, which makes
    /// the record ineligible for aggregation.
    pub fn merge_key(&self) -> String {
        if self.name.is_empty() || self.country.is_empty() {
            String::new()
        } else {
            format!("{}|{}", self.name, self.country)
        }
    }
}

/// A facility enriched with rating data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatedFacility {
    #[serde(flatten)]
    pub facility: FacilityRecord,
    pub rating_score: f64,
    #[serde(default)]
    pub publication_count: u32,
    #[serde(default)]
    pub ranking_source: String,
    #[serde(default)]
    pub ranking_position: String,
}

/// Cost estimate for treatment at one facility.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityCost {
    pub facility_name: String,
    #[serde(default)]
    pub estimated_treatment_cost: String,
    #[serde(default)]
    pub visa_required: Option<bool>,
    #[serde(default)]
    pub estimated_flight_cost: String,
    #[serde(default)]
    pub estimated_living_cost: String,
    #[serde(default)]
    pub total_estimated_cost: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facility_merge_key() {
        let fac = FacilityRecord {
            name: "Acibadem".into(),
            country: "Türkiye".into(),
            ..FacilityRecord::default()
        };
        assert_eq!(fac.merge_key(), "Acibadem|Türkiye");
    }

    #[test]
    fn facility_merge_key_empty_when_incomplete() {
        let no_country = FacilityRecord {
            name: "Acibadem".into(),
            ..FacilityRecord::default()
        };
        assert!(no_country.merge_key().is_empty());
        let no_name = FacilityRecord {
            country: "Türkiye".into(),
            ..FacilityRecord::default()
        };
        assert!(no_name.merge_key().is_empty());
    }

    #[test]
    fn trial_record_deserializes_sparse_json() {
        let trial: TrialRecord =
            serde_json::from_str(r#"{"trial_id": "NCT01234567"}"#).unwrap();
        assert_eq!(trial.trial_id, "NCT01234567");
        assert_eq!(trial.eligibility.min_age, "N/A");
        assert_eq!(trial.eligibility.sex, "All");
        assert!(trial.locations.is_empty());
    }

    #[test]
    fn rated_facility_flattens() {
        let rated = RatedFacility {
            facility: FacilityRecord {
                name: "Sheba".into(),
                country: "Israel".into(),
                active_trials_count: 3,
                ..FacilityRecord::default()
            },
            rating_score: 75.0,
            publication_count: 4,
            ..RatedFacility::default()
        };
        let json = serde_json::to_value(&rated).unwrap();
        // Facility fields are flattened to the top level on the wire.
        assert_eq!(json["name"], "Sheba");
        assert_eq!(json["rating_score"], 75.0);
    }
}
