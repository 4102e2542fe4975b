//! Gateways to the external trial registries and literature databases.
//!
//! Each gateway wraps one upstream HTTP API and normalizes its payload into
//! the shared record types. Gateways fail with [`SourceError`]; the fan-out
//! collector turns any branch failure into zero records so one slow or broken
//! upstream never takes a whole pipeline down.

pub mod clinical_trials_gov;
pub mod error;
pub mod eu_ctr;
pub mod europe_pmc;
pub mod fanout;
pub mod geography;
pub mod pubmed;
pub mod who_ictrp;

pub use clinical_trials_gov::{ClinicalTrialsGov, TrialSearchParams};
pub use error::{Result, SourceError};
pub use eu_ctr::EuCtr;
pub use europe_pmc::EuropePmc;
pub use fanout::collect_named;
pub use geography::build_location_filter;
pub use pubmed::PubMed;
pub use who_ictrp::WhoIctrp;
