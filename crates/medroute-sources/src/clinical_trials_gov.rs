//! ClinicalTrials.gov API v2 gateway.
//!
//! Docs: <https://clinicaltrials.gov/data-api/api>

use std::time::{Duration, Instant};

use serde_json::Value;
use tracing::{info, warn};

use medroute_types::{
    TrialDates, TrialEligibility, TrialIntervention, TrialLocation, TrialRecord,
};

use crate::error::{Result, SourceError};
use crate::geography::build_location_filter;

const DEFAULT_BASE_URL: &str = "https://clinicaltrials.gov/api/v2";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const STUDY_FIELDS: &str = "NCTId,BriefTitle,OfficialTitle,OverallStatus,Phase,\
Condition,InterventionName,InterventionType,\
LocationCountry,LocationCity,LocationFacility,\
LocationContactName,LocationContactEMail,\
EligibilityCriteria,MinimumAge,MaximumAge,Gender,\
StartDate,CompletionDate,LeadSponsorName,\
EnrollmentCount,StudyType";

/// Search parameters for the studies endpoint.
#[derive(Debug, Clone)]
pub struct TrialSearchParams {
    pub query: String,
    pub age_group: String,
    pub geography: String,
    pub study_type: String,
    pub status: String,
    pub max_results: usize,
}

impl TrialSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            age_group: "any".into(),
            geography: "worldwide".into(),
            study_type: "all".into(),
            status: "recruiting".into(),
            max_results: 20,
        }
    }
}

pub struct ClinicalTrialsGov {
    client: reqwest::Client,
    base_url: String,
}

impl ClinicalTrialsGov {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
        }
    }

    pub async fn search(&self, params: &TrialSearchParams) -> Result<Vec<TrialRecord>> {
        let query_pairs = build_query_pairs(params);
        let url = format!("{}/studies", self.base_url);

        let start = Instant::now();
        let response = self
            .client
            .get(&url)
            .query(&query_pairs)
            .send()
            .await
            .map_err(SourceError::from_reqwest)?;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        let code = response.status().as_u16();
        if !response.status().is_success() {
            warn!(
                code,
                elapsed_ms,
                query = truncate(&params.query, 80),
                "clinicaltrials.gov search failed"
            );
            return Err(SourceError::Status { code });
        }

        let body: Value = response.json().await.map_err(SourceError::from_reqwest)?;
        let studies = body["studies"].as_array().cloned().unwrap_or_default();
        info!(
            results = studies.len(),
            elapsed_ms,
            query = truncate(&params.query, 80),
            "clinicaltrials.gov search ok"
        );
        Ok(studies.iter().map(parse_study).collect())
    }
}

impl Default for ClinicalTrialsGov {
    fn default() -> Self {
        Self::new()
    }
}

fn build_query_pairs(params: &TrialSearchParams) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("query.cond".to_string(), params.query.clone()),
        ("pageSize".to_string(), params.max_results.min(50).to_string()),
        ("format".to_string(), "json".to_string()),
        ("fields".to_string(), STUDY_FIELDS.to_string()),
    ];

    let status_filter = match params.status.as_str() {
        "all" => "RECRUITING,NOT_YET_RECRUITING,ACTIVE_NOT_RECRUITING,COMPLETED",
        "completed" => "COMPLETED",
        _ => "RECRUITING,NOT_YET_RECRUITING",
    };
    pairs.push(("filter.overallStatus".to_string(), status_filter.to_string()));

    let location_filter = build_location_filter(&params.geography);
    if !location_filter.is_empty() {
        pairs.push(("query.locn".to_string(), location_filter));
    }

    let type_filter = match params.study_type.as_str() {
        "interventional" => Some("INTERVENTIONAL"),
        "observational" => Some("OBSERVATIONAL"),
        "expanded_access" => Some("EXPANDED_ACCESS"),
        _ => None,
    };
    if let Some(kind) = type_filter {
        pairs.push(("filter.studyType".to_string(), kind.to_string()));
    }

    pairs
}

/// Map one API v2 study document into the normalized trial record.
fn parse_study(study: &Value) -> TrialRecord {
    let proto = &study["protocolSection"];
    let ident = &proto["identificationModule"];
    let status_mod = &proto["statusModule"];
    let design = &proto["designModule"];
    let eligibility = &proto["eligibilityModule"];
    let contacts = &proto["contactsLocationsModule"];

    let nct_id = str_of(&ident["nctId"]);

    let locations = contacts["locations"]
        .as_array()
        .map(|locs| {
            locs.iter()
                .map(|loc| TrialLocation {
                    country: str_of(&loc["country"]),
                    city: str_of(&loc["city"]),
                    facility: str_of(&loc["facility"]),
                    contact_name: str_of(&loc["contacts"][0]["name"]),
                    contact_email: str_of(&loc["contacts"][0]["email"]),
                })
                .collect()
        })
        .unwrap_or_default();

    let interventions = proto["armsInterventionsModule"]["interventions"]
        .as_array()
        .map(|arms| {
            arms.iter()
                .map(|arm| TrialIntervention {
                    kind: str_of(&arm["type"]),
                    name: str_of(&arm["name"]),
                })
                .collect()
        })
        .unwrap_or_default();

    let title = match ident["briefTitle"].as_str() {
        Some(brief) if !brief.is_empty() => brief.to_string(),
        _ => str_of(&ident["officialTitle"]),
    };

    let phases = design["phases"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        })
        .unwrap_or_default();

    TrialRecord {
        trial_id: nct_id.clone(),
        title,
        phase: phases,
        status: str_of(&status_mod["overallStatus"]),
        conditions: proto["conditionsModule"]["conditions"]
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_str).map(String::from).collect())
            .unwrap_or_default(),
        interventions,
        locations,
        eligibility: TrialEligibility {
            min_age: str_or(&eligibility["minimumAge"], "N/A"),
            max_age: str_or(&eligibility["maximumAge"], "N/A"),
            sex: str_or(&eligibility["sex"], "All"),
        },
        dates: TrialDates {
            start: str_of(&status_mod["startDateStruct"]["date"]),
            estimated_completion: str_of(&status_mod["completionDateStruct"]["date"]),
        },
        sponsor: str_of(&proto["sponsorCollaboratorsModule"]["leadSponsor"]["name"]),
        enrollment: design["enrollmentInfo"]["count"].as_u64(),
        source_registry: "ClinicalTrials.gov".to_string(),
        url: if nct_id.is_empty() {
            String::new()
        } else {
            format!("https://clinicaltrials.gov/study/{nct_id}")
        },
    }
}

fn str_of(value: &Value) -> String {
    value.as_str().unwrap_or_default().to_string()
}

fn str_or(value: &Value, default: &str) -> String {
    match value.as_str() {
        Some(text) if !text.is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

fn truncate(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
