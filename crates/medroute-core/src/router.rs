//! The request router and the service bundle behind it.
//!
//! [`Orchestrator::route`] is the single entry point: it resolves the
//! pipeline, consults the cache, validates the input, runs the pipeline,
//! passes the result through the compliance guard, writes the cache, and
//! fires the history record. Report generation bypasses the cache -- the
//! input is a full prior search result and keying on it buys nothing.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use medroute_llm::{
    GenerationModel, GenerationService, ModelTier, PromptStore, DEFAULT_REPORT_PROMPT,
};
use medroute_sources::{ClinicalTrialsGov, EuCtr, EuropePmc, PubMed, WhoIctrp};
use medroute_types::{
    ClinicInput, PipelineType, ReportSection, ResearchInput, SearchRequest, SearchResponse,
    SymptomsInput,
};

use crate::cache::{make_key, CacheService};
use crate::compliance;
use crate::history::{record_detached, HistorySink, NoopSink};
use crate::localization::{
    DISCLAIMER_CLINICS, DISCLAIMER_DEFAULT, DISCLAIMER_REPORT, DISCLAIMER_SYMPTOMS,
    ERR_MISSING_DIAGNOSIS, ERR_MISSING_SEARCH_RESULT, ERR_MISSING_SYMPTOMS,
    ERR_MISSING_TREATMENT, ERR_REPORT_GENERATION, ERR_UNKNOWN_TYPE,
};
use crate::pipelines::{self, truncate_chars};
use crate::settings::Settings;

/// Longest history query recorded for free-text inputs.
const HISTORY_QUERY_CHARS: usize = 120;
/// Search results longer than this are clipped before entering the report
/// prompt.
const REPORT_INPUT_CHARS: usize = 12_000;

/// Everything the pipelines call out to: the generation service, the
/// prompt store, and one gateway per upstream.
pub struct Services {
    pub generation: GenerationService,
    pub prompts: PromptStore,
    pub clinical_trials: ClinicalTrialsGov,
    pub eu_ctr: EuCtr,
    pub who_ictrp: WhoIctrp,
    pub pubmed: PubMed,
    pub europe_pmc: EuropePmc,
}

impl Services {
    /// Wire the standard production gateways around the given model.
    pub fn from_settings(
        settings: &Settings,
        model: Box<dyn GenerationModel + Send + Sync>,
    ) -> Self {
        Self {
            generation: GenerationService::new(
                model,
                settings.fast_model.clone(),
                settings.deep_model.clone(),
            ),
            prompts: PromptStore::new(&settings.prompt_dir),
            clinical_trials: ClinicalTrialsGov::new(),
            eu_ctr: EuCtr::new(),
            who_ictrp: WhoIctrp::new(),
            pubmed: PubMed::new(settings.ncbi_api_key.clone()),
            europe_pmc: EuropePmc::new(),
        }
    }
}

pub struct Orchestrator {
    services: Services,
    cache: CacheService,
    history: Arc<dyn HistorySink>,
}

impl Orchestrator {
    pub fn new(services: Services, cache: CacheService) -> Self {
        Self {
            services,
            cache,
            history: Arc::new(NoopSink),
        }
    }

    pub fn with_history(mut self, sink: Arc<dyn HistorySink>) -> Self {
        self.history = sink;
        self
    }

    /// Route one request to its pipeline and return the response document.
    ///
    /// Never errors: every failure path collapses into a Georgian error
    /// response with a disclaimer attached.
    pub async fn route(&self, request: &SearchRequest) -> SearchResponse {
        let Some(pipeline) = request.pipeline_type() else {
            warn!(tab = ?request.source_tab, legacy = ?request.request_type, "unknown request type");
            return SearchResponse::error(ERR_UNKNOWN_TYPE, DISCLAIMER_DEFAULT);
        };
        let data = request.data.clone().unwrap_or_else(|| Value::Object(Map::new()));
        info!(pipeline = %pipeline, "request routed");

        if pipeline == PipelineType::ReportGeneration {
            return compliance::validate(self.generate_report(&data).await);
        }

        let cache_key = make_key(pipeline, &data);
        if let Some(cached) = self.cache.get(&cache_key).await {
            if let Ok(response) = serde_json::from_str::<SearchResponse>(&cached) {
                return response;
            }
            warn!(pipeline = %pipeline, "cached entry undeserializable, ignoring");
        }

        let (response, history_query) = match pipeline {
            PipelineType::ResearchSearch => {
                let inp = ResearchInput::from_value(&data);
                if inp.diagnosis.trim().is_empty() {
                    return SearchResponse::error(ERR_MISSING_DIAGNOSIS, DISCLAIMER_DEFAULT);
                }
                let query = inp.diagnosis.clone();
                (pipelines::research::execute(&self.services, &inp).await, query)
            }
            PipelineType::SymptomNavigation => {
                let inp = SymptomsInput::from_value(&data);
                if inp.symptoms_text.trim().is_empty() {
                    return SearchResponse::error(ERR_MISSING_SYMPTOMS, DISCLAIMER_SYMPTOMS);
                }
                let query = truncate_chars(&inp.symptoms_text, HISTORY_QUERY_CHARS);
                (pipelines::symptoms::execute(&self.services, &inp).await, query)
            }
            PipelineType::ClinicSearch => {
                let inp = ClinicInput::from_value(&data);
                if inp.diagnosis_or_treatment.trim().is_empty() {
                    return SearchResponse::error(ERR_MISSING_TREATMENT, DISCLAIMER_CLINICS);
                }
                let query = inp.diagnosis_or_treatment.clone();
                (pipelines::clinics::execute(&self.services, &inp).await, query)
            }
            PipelineType::ReportGeneration => unreachable!("handled above"),
        };

        let response = compliance::validate(response);

        if !response.items.is_empty() {
            if let Ok(serialized) = serde_json::to_string(&response) {
                self.cache
                    .set(&cache_key, serialized, self.cache.ttl_for(pipeline))
                    .await;
            }
        }
        record_detached(
            self.history.clone(),
            pipeline,
            history_query,
            response.items.len(),
        );
        response
    }

    /// Structure an existing search result into a formal report document.
    async fn generate_report(&self, data: &Value) -> SearchResponse {
        let report_type = data
            .get("reportType")
            .or_else(|| data.get("report_type"))
            .and_then(Value::as_str)
            .unwrap_or("summary")
            .to_string();
        let search_result = data
            .get("searchResult")
            .or_else(|| data.get("search_result"))
            .filter(|v| !result_is_empty(v));
        let Some(search_result) = search_result else {
            return SearchResponse::error(ERR_MISSING_SEARCH_RESULT, DISCLAIMER_REPORT);
        };

        let system = self.services.prompts.load_or("report", DEFAULT_REPORT_PROMPT);
        let payload = json!({
            "report_type": report_type,
            "search_result": search_result,
        });
        let user_message = truncate_chars(
            &serde_json::to_string_pretty(&payload).unwrap_or_default(),
            REPORT_INPUT_CHARS,
        );

        for (tier, max_tokens) in [(ModelTier::Deep, 4000), (ModelTier::Fast, 3000)] {
            if let Some(reply) = self
                .services
                .generation
                .generate_json(tier, &system, &user_message, max_tokens)
                .await
            {
                if let Some(report) = report_from_reply(&reply) {
                    return report;
                }
            }
            warn!(?tier, "report tier produced no usable document");
        }

        render_report_fallback(&report_type, search_result)
    }
}

/// True for null, empty-object, and empty-string results.
fn result_is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn report_from_reply(reply: &Map<String, Value>) -> Option<SearchResponse> {
    let sections: Vec<ReportSection> = reply
        .get("sections")
        .cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default();
    if sections.is_empty() {
        return None;
    }
    Some(SearchResponse {
        title: reply
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or("სამედიცინო ანგარიში")
            .to_string(),
        sections,
        disclaimer: reply
            .get("disclaimer")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .unwrap_or(DISCLAIMER_REPORT)
            .to_string(),
        ..SearchResponse::default()
    })
}

/// Deterministic report from a prior search result when both model tiers
/// fail.
fn render_report_fallback(report_type: &str, search_result: &Value) -> SearchResponse {
    let prior: SearchResponse =
        serde_json::from_value(search_result.clone()).unwrap_or_default();
    if prior.items.is_empty() && prior.summary.is_empty() {
        return SearchResponse::error(ERR_REPORT_GENERATION, DISCLAIMER_REPORT);
    }

    let intro = match report_type {
        "doctor" => "ეს ანგარიში მომზადდა ექიმთან კონსულტაციისთვის.".to_string(),
        _ => "ეს ანგარიში აჯამებს ძიების შედეგებს.".to_string(),
    };

    let mut overview_lines = Vec::new();
    if !prior.summary.is_empty() {
        overview_lines.push(prior.summary.clone());
    }
    for item in prior.items.iter().take(10) {
        if item.body.is_empty() {
            overview_lines.push(format!("• {}", item.title));
        } else {
            overview_lines.push(format!("• {} — {}", item.title, truncate_chars(&item.body, 200)));
        }
    }

    let recommendations: Vec<String> = prior
        .next_steps
        .iter()
        .chain(prior.tips.iter())
        .map(|tip| format!("• {}", tip.text))
        .collect();
    let recommendations = if recommendations.is_empty() {
        "გაესაუბრეთ თქვენს ექიმს ამ შედეგების შესახებ.".to_string()
    } else {
        recommendations.join("\n")
    };

    SearchResponse {
        title: "სამედიცინო ანგარიში".to_string(),
        sections: vec![
            ReportSection {
                heading: "შესავალი".to_string(),
                content: intro,
            },
            ReportSection {
                heading: "მიმოხილვა".to_string(),
                content: overview_lines.join("\n"),
            },
            ReportSection {
                heading: "რეკომენდაციები".to_string(),
                content: recommendations,
            },
        ],
        disclaimer: DISCLAIMER_REPORT.to_string(),
        ..SearchResponse::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medroute_llm::{GenerateRequest, ModelError};
    use serde_json::json;

    struct ScriptedModel {
        reply: Option<String>,
    }

    #[async_trait]
    impl GenerationModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _request: &GenerateRequest) -> medroute_llm::Result<String> {
            match &self.reply {
                Some(text) => Ok(text.clone()),
                None => Err(ModelError::Timeout),
            }
        }
    }

    fn orchestrator(reply: Option<String>) -> Orchestrator {
        let settings = Settings::default();
        let services = Services::from_settings(&settings, Box::new(ScriptedModel { reply }));
        Orchestrator::new(services, CacheService::new(&settings, None))
    }

    fn request(tab: &str, data: Value) -> SearchRequest {
        serde_json::from_value(json!({"source_tab": tab, "data": data})).unwrap()
    }

    #[tokio::test]
    async fn unknown_type_yields_error_response() {
        let orch = orchestrator(None);
        let resp = orch
            .route(&request("weather_forecast", json!({})))
            .await;
        assert_eq!(resp.meta, ERR_UNKNOWN_TYPE);
        assert!(resp.items.is_empty());
        assert!(!resp.disclaimer.is_empty());
    }

    #[tokio::test]
    async fn missing_diagnosis_is_rejected_before_dispatch() {
        let orch = orchestrator(None);
        let resp = orch
            .route(&request("research_search", json!({"diagnosis": "  "})))
            .await;
        assert_eq!(resp.meta, ERR_MISSING_DIAGNOSIS);
    }

    #[tokio::test]
    async fn missing_symptoms_is_rejected_before_dispatch() {
        let orch = orchestrator(None);
        let resp = orch.route(&request("symptom_navigation", json!({}))).await;
        assert_eq!(resp.meta, ERR_MISSING_SYMPTOMS);
        assert_eq!(resp.disclaimer, DISCLAIMER_SYMPTOMS);
    }

    #[tokio::test]
    async fn report_without_search_result_is_rejected() {
        let orch = orchestrator(None);
        let resp = orch
            .route(&request("report_generation", json!({"reportType": "doctor"})))
            .await;
        assert_eq!(resp.meta, ERR_MISSING_SEARCH_RESULT);
    }

    #[tokio::test]
    async fn report_accepts_snake_case_keys() {
        let reply = json!({
            "title": "ანგარიში",
            "sections": [{"heading": "შესავალი", "content": "ტექსტი"}]
        })
        .to_string();
        let orch = orchestrator(Some(reply));
        let resp = orch
            .route(&request(
                "report_generation",
                json!({"report_type": "summary", "search_result": {"items": [{"title": "t"}]}}),
            ))
            .await;
        assert_eq!(resp.title, "ანგარიში");
        assert_eq!(resp.sections.len(), 1);
        assert_eq!(resp.disclaimer, DISCLAIMER_REPORT);
    }

    #[tokio::test]
    async fn report_falls_back_to_deterministic_sections() {
        let orch = orchestrator(None);
        let resp = orch
            .route(&request(
                "report_generation",
                json!({
                    "reportType": "doctor",
                    "searchResult": {
                        "items": [{"title": "Trial NCT1", "body": "phase III"}],
                        "summary": "ერთი კვლევა მოიძებნა.",
                        "nextSteps": [{"text": "მიმართეთ ონკოლოგს", "icon": ""}]
                    }
                }),
            ))
            .await;
        assert_eq!(resp.sections.len(), 3);
        assert_eq!(resp.sections[0].heading, "შესავალი");
        assert!(resp.sections[1].content.contains("Trial NCT1"));
        assert!(resp.sections[2].content.contains("მიმართეთ ონკოლოგს"));
        assert_eq!(resp.disclaimer, DISCLAIMER_REPORT);
    }

    #[test]
    fn empty_search_results_are_detected() {
        assert!(result_is_empty(&Value::Null));
        assert!(result_is_empty(&json!({})));
        assert!(result_is_empty(&json!("  ")));
        assert!(!result_is_empty(&json!({"items": []})));
    }
}
