//! The medroute orchestration core.
//!
//! Ties the generation-model service and the source gateways into three
//! request pipelines (research search, symptom navigation, clinic search)
//! behind a single router, with caching, relevance scoring, compliance
//! guarding, and a search-history seam.

pub mod cache;
pub mod compliance;
pub mod dedup;
pub mod history;
pub mod localization;
pub mod pipelines;
pub mod prompt_defaults;
pub mod router;
pub mod scoring;
pub mod settings;

pub use cache::{CacheService, CacheStore, MemoryCache};
pub use history::{HistorySink, NoopSink};
pub use router::{Orchestrator, Services};
pub use settings::Settings;
