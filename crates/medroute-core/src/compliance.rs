//! Output compliance guard.
//!
//! Runs on every response leaving the router: injects the default Georgian
//! disclaimer when a pipeline produced none, and scans item text for
//! diagnosis or prescription phrasing. Matches are logged for review, not
//! mutated; the guard must never silently rewrite medical content.

use regex::RegexSet;
use std::sync::OnceLock;
use tracing::{info, warn};

use medroute_types::SearchResponse;

use crate::localization::DISCLAIMER_DEFAULT;

const DIAGNOSIS_PATTERNS: [&str; 4] = [
    r"(?i)თქვენ გაქვთ .+ დაავადება",
    r"(?i)თქვენი დიაგნოზია",
    r"(?i)you have .+ disease",
    r"(?i)your diagnosis is",
];

const PRESCRIPTION_PATTERNS: [&str; 4] = [
    r"(?i)მიიღეთ .+ წამალი",
    r"(?i)დანიშნეთ .+ მგ",
    r"(?i)take .+ medication",
    r"(?i)prescribe",
];

fn diagnosis_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| RegexSet::new(DIAGNOSIS_PATTERNS).expect("static patterns compile"))
}

fn prescription_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| RegexSet::new(PRESCRIPTION_PATTERNS).expect("static patterns compile"))
}

/// Validate and normalize a response before it leaves the system.
pub fn validate(mut response: SearchResponse) -> SearchResponse {
    if response.disclaimer.is_empty() {
        response.disclaimer = DISCLAIMER_DEFAULT.to_string();
        info!("compliance: injected missing disclaimer");
    }

    for item in &response.items {
        check_text(&item.body, &item.title);
        check_text(&item.title, &item.title);
    }

    response
}

fn check_text(text: &str, context: &str) {
    if text.is_empty() {
        return;
    }
    let context: String = context.chars().take(50).collect();
    if diagnosis_set().is_match(text) {
        warn!(item = %context, "compliance: possible diagnosis phrasing");
    }
    if prescription_set().is_match(text) {
        warn!(item = %context, "compliance: possible prescription phrasing");
    }
}
