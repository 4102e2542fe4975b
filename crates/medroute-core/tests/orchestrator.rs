//! End-to-end routing tests over mocked upstreams.
//!
//! The generation model here always times out, which forces every pipeline
//! through its deterministic path: raw-term search bundles, rule-based
//! scoring, and rendered fallback reports. HTTP upstreams are wiremock
//! servers, one per gateway.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use medroute_core::{CacheService, HistorySink, Orchestrator, Services, Settings};
use medroute_llm::{
    GenerateRequest, GenerationModel, GenerationService, ModelError, PromptStore,
};
use medroute_sources::{ClinicalTrialsGov, EuCtr, EuropePmc, PubMed, WhoIctrp};
use medroute_types::{PipelineType, SearchRequest};

struct TimeoutModel;

#[async_trait]
impl GenerationModel for TimeoutModel {
    fn name(&self) -> &str {
        "timeout"
    }

    async fn generate(&self, _request: &GenerateRequest) -> medroute_llm::Result<String> {
        Err(ModelError::Timeout)
    }
}

struct Upstreams {
    ctgov: MockServer,
    euctr: MockServer,
    pubmed: MockServer,
    epmc: MockServer,
}

async fn mock_upstreams() -> Upstreams {
    let ctgov = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/studies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "studies": [{
                "protocolSection": {
                    "identificationModule": {
                        "nctId": "NCT00000001",
                        "briefTitle": "CAR-T for refractory melanoma"
                    },
                    "statusModule": {"overallStatus": "RECRUITING"},
                    "designModule": {"phases": ["PHASE3"], "enrollmentInfo": {"count": 120}},
                    "contactsLocationsModule": {
                        "locations": [{
                            "country": "Türkiye",
                            "city": "Istanbul",
                            "facility": "Memorial Hospital"
                        }]
                    },
                    "sponsorCollaboratorsModule": {"leadSponsor": {"name": "Memorial"}}
                }
            }]
        })))
        .mount(&ctgov)
        .await;

    let euctr = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&euctr)
        .await;

    let pubmed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"idlist": ["38000001"]}
        })))
        .mount(&pubmed)
        .await;
    Mock::given(method("GET"))
        .and(path("/esummary.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "result": {
                "uids": ["38000001"],
                "38000001": {
                    "title": "Adoptive cell therapy outcomes in melanoma",
                    "fulljournalname": "Journal of Clinical Oncology",
                    "pubdate": "2026 Mar 2",
                    "articleids": [{"idtype": "pubmed", "value": "38000001"}]
                }
            }
        })))
        .mount(&pubmed)
        .await;

    let epmc = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultList": {"result": []}
        })))
        .mount(&epmc)
        .await;

    Upstreams {
        ctgov,
        euctr,
        pubmed,
        epmc,
    }
}

fn orchestrator(upstreams: &Upstreams) -> Orchestrator {
    let services = Services {
        generation: GenerationService::new(Box::new(TimeoutModel), "fast-1", "deep-1"),
        prompts: PromptStore::new("prompts"),
        clinical_trials: ClinicalTrialsGov::with_base_url(upstreams.ctgov.uri()),
        eu_ctr: EuCtr::with_base_url(upstreams.euctr.uri()),
        who_ictrp: WhoIctrp::new(),
        pubmed: PubMed::with_base_url(upstreams.pubmed.uri(), None),
        europe_pmc: EuropePmc::with_base_url(upstreams.epmc.uri()),
    };
    Orchestrator::new(services, CacheService::new(&Settings::default(), None))
}

fn request(tab: &str, data: serde_json::Value) -> SearchRequest {
    serde_json::from_value(json!({"source_tab": tab, "data": data})).unwrap()
}

#[tokio::test]
async fn research_search_runs_deterministically_when_the_model_is_down() {
    let upstreams = mock_upstreams().await;
    let orch = orchestrator(&upstreams);

    let resp = orch
        .route(&request("research_search", json!({"diagnosis": "melanoma"})))
        .await;

    assert!(!resp.items.is_empty());
    assert!(!resp.disclaimer.is_empty());
    // Trial from the registry and article from PubMed both survive.
    let titles: Vec<&str> = resp.items.iter().map(|i| i.title.as_str()).collect();
    assert!(titles.iter().any(|t| t.contains("CAR-T")));
    assert!(titles.iter().any(|t| t.contains("Adoptive cell therapy")));
    // Recruiting phase-III trial in Türkiye outscores the article.
    assert!(titles[0].contains("CAR-T"));
}

#[tokio::test]
async fn identical_requests_are_served_from_cache() {
    let upstreams = mock_upstreams().await;
    let orch = orchestrator(&upstreams);

    let req = request("research_search", json!({"diagnosis": "melanoma"}));
    let first = orch.route(&req).await;
    let requests_after_first = upstreams.ctgov.received_requests().await.unwrap().len();
    let second = orch.route(&req).await;
    let requests_after_second = upstreams.ctgov.received_requests().await.unwrap().len();

    assert_eq!(first, second);
    assert_eq!(requests_after_first, requests_after_second);
}

#[tokio::test]
async fn key_order_does_not_split_the_cache() {
    let upstreams = mock_upstreams().await;
    let orch = orchestrator(&upstreams);

    orch.route(&request(
        "research_search",
        json!({"diagnosis": "melanoma", "geography": "worldwide"}),
    ))
    .await;
    let after_first = upstreams.ctgov.received_requests().await.unwrap().len();
    orch.route(&request(
        "research_search",
        json!({"geography": "worldwide", "diagnosis": "melanoma"}),
    ))
    .await;
    let after_second = upstreams.ctgov.received_requests().await.unwrap().len();

    assert_eq!(after_first, after_second);
}

#[tokio::test]
async fn clinic_search_rates_facilities_from_trial_activity() {
    let upstreams = mock_upstreams().await;
    let orch = orchestrator(&upstreams);

    let resp = orch
        .route(&request(
            "clinic_search",
            json!({"diagnosis_or_treatment": "melanoma immunotherapy"}),
        ))
        .await;

    assert!(!resp.items.is_empty());
    assert!(resp.items[0].title.contains("Memorial Hospital"));
    // Memorial is on the JCI list and runs a recruiting trial, so the
    // rating lands well above the base.
    assert!(resp.items[0].rating.unwrap_or(0.0) > 50.0);
    assert!(!resp.disclaimer.is_empty());
}

#[tokio::test]
async fn symptom_navigation_degrades_to_parsed_text_only() {
    let upstreams = mock_upstreams().await;
    let orch = orchestrator(&upstreams);

    let resp = orch
        .route(&request(
            "symptom_navigation",
            json!({"symptoms": "მაქვს თავის ტკივილი და გულისრევა"}),
        ))
        .await;

    // Parser fallback carries the raw text as one symptom; no directions
    // means no research matching, but the report still renders.
    assert!(!resp.items.is_empty());
    assert!(resp.disclaimer.contains("დიაგნოზი"));
}

struct CountingModel {
    calls: Arc<AtomicUsize>,
}

#[async_trait]
impl GenerationModel for CountingModel {
    fn name(&self) -> &str {
        "counting"
    }

    async fn generate(&self, _request: &GenerateRequest) -> medroute_llm::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ModelError::Timeout)
    }
}

#[tokio::test]
async fn empty_sources_short_circuit_without_a_report_call() {
    let ctgov = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/studies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"studies": []})))
        .mount(&ctgov)
        .await;
    let euctr = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .mount(&euctr)
        .await;
    let pubmed = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/esearch.fcgi"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "esearchresult": {"idlist": []}
        })))
        .mount(&pubmed)
        .await;
    let epmc = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "resultList": {"result": []}
        })))
        .mount(&epmc)
        .await;

    let calls = Arc::new(AtomicUsize::new(0));
    let services = Services {
        generation: GenerationService::new(
            Box::new(CountingModel {
                calls: calls.clone(),
            }),
            "fast-1",
            "deep-1",
        ),
        prompts: PromptStore::new("prompts"),
        clinical_trials: ClinicalTrialsGov::with_base_url(ctgov.uri()),
        eu_ctr: EuCtr::with_base_url(euctr.uri()),
        who_ictrp: WhoIctrp::new(),
        pubmed: PubMed::with_base_url(pubmed.uri(), None),
        europe_pmc: EuropePmc::with_base_url(epmc.uri()),
    };
    let orch = Orchestrator::new(services, CacheService::new(&Settings::default(), None));

    let resp = orch
        .route(&request("research_search", json!({"diagnosis": "melanoma"})))
        .await;

    assert_eq!(resp.meta, medroute_core::localization::ERR_NO_RESEARCH_RESULTS);
    assert!(resp.items.is_empty());
    assert!(!resp.disclaimer.is_empty());
    // With nothing found, only the term normalizer spoke to the model; no
    // scoring or report call followed.
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

struct RecordingSink {
    calls: AtomicUsize,
}

#[async_trait]
impl HistorySink for RecordingSink {
    async fn record(&self, pipeline: PipelineType, query: &str, _result_count: usize) {
        assert_eq!(pipeline, PipelineType::ResearchSearch);
        assert_eq!(query, "melanoma");
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn history_is_recorded_without_blocking_the_response() {
    let upstreams = mock_upstreams().await;
    let sink = Arc::new(RecordingSink {
        calls: AtomicUsize::new(0),
    });
    let orch = orchestrator(&upstreams).with_history(sink.clone());

    orch.route(&request("research_search", json!({"diagnosis": "melanoma"})))
        .await;

    for _ in 0..20 {
        if sink.calls.load(Ordering::SeqCst) == 1 {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }
    assert_eq!(sink.calls.load(Ordering::SeqCst), 1);
}
