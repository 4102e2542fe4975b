//! Inbound request envelope and pipeline classification.
//!
//! The frontend has shipped two request shapes over time: the legacy
//! `{type, data}` form and the current `{source_tab, data}` form. Both are
//! accepted; `source_tab` wins when both are present.

use serde::{Deserialize, Serialize};

/// The pipeline a request is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PipelineType {
    /// Pipeline A -- clinical-trial and literature research search.
    ResearchSearch,
    /// Pipeline B -- symptom navigation (research directions, not diagnoses).
    SymptomNavigation,
    /// Pipeline C -- clinic/facility search with rating and cost enrichment.
    ClinicSearch,
    /// Formats an existing search result into a formal report.
    ReportGeneration,
}

impl PipelineType {
    /// Stable string identifier, used for cache keys and logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            PipelineType::ResearchSearch => "research_search",
            PipelineType::SymptomNavigation => "symptom_navigation",
            PipelineType::ClinicSearch => "clinic_search",
            PipelineType::ReportGeneration => "report_generation",
        }
    }

    /// Parse a `source_tab` value.
    pub fn from_tab(tab: &str) -> Option<Self> {
        match tab {
            "research_search" => Some(PipelineType::ResearchSearch),
            "symptom_navigation" => Some(PipelineType::SymptomNavigation),
            "clinic_search" => Some(PipelineType::ClinicSearch),
            "report_generation" => Some(PipelineType::ReportGeneration),
            _ => None,
        }
    }

    /// Parse a legacy `type` value.
    pub fn from_legacy(ty: &str) -> Option<Self> {
        match ty {
            "research" => Some(PipelineType::ResearchSearch),
            "symptoms" => Some(PipelineType::SymptomNavigation),
            "clinics" => Some(PipelineType::ClinicSearch),
            "report" => Some(PipelineType::ReportGeneration),
            _ => None,
        }
    }
}

impl std::fmt::Display for PipelineType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inbound search request. Accepts both the legacy and the current format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    /// Legacy request type ("research", "symptoms", "clinics").
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub request_type: Option<String>,

    /// Current pipeline selector ("research_search", ...). Takes priority
    /// over `type` when both are present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tab: Option<String>,

    /// Untyped pipeline payload.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl SearchRequest {
    /// Resolve the target pipeline. Returns `None` for unknown/absent types.
    pub fn pipeline_type(&self) -> Option<PipelineType> {
        if let Some(tab) = &self.source_tab {
            return PipelineType::from_tab(tab);
        }
        self.request_type
            .as_deref()
            .and_then(PipelineType::from_legacy)
    }
}
