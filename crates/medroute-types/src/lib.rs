//! Shared data model for the medroute search orchestrator.
//!
//! Everything that crosses a pipeline boundary lives here:
//!
//! - [`SearchRequest`] / [`SearchResponse`] -- the wire envelopes
//! - [`ResearchInput`], [`SymptomsInput`], [`ClinicInput`] -- typed pipeline
//!   inputs parsed permissively from the untyped request payload
//! - [`QueryBundle`] -- the normalized search-term bundle
//! - candidate records ([`TrialRecord`], [`ArticleRecord`],
//!   [`FacilityRecord`]) and their scored/enriched wrappers
//!
//! This crate is a plain data crate with no I/O and no async.

pub mod candidate;
pub mod input;
pub mod query;
pub mod records;
pub mod request;
pub mod response;
pub mod symptoms;

pub use candidate::{Candidate, CandidateKind, ScoredCandidate};
pub use input::{ClinicInput, ResearchInput, SymptomsInput};
pub use query::QueryBundle;
pub use records::{
    ArticleRecord, FacilityCost, FacilityRecord, RatedFacility, TrialDates, TrialEligibility,
    TrialIntervention, TrialLocation, TrialRecord,
};
pub use request::{PipelineType, SearchRequest};
pub use response::{ComparisonTable, ReportSection, ResultItem, SearchResponse, TipItem};
pub use symptoms::{
    DifferentialResult, ParsedSymptom, ParsedSymptoms, PatientContext, ResearchDirection,
};
