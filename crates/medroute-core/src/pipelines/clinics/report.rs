//! Clinic comparison report synthesis.

use std::collections::HashMap;

use serde_json::{json, Value};
use tracing::warn;

use medroute_llm::ModelTier;
use medroute_types::{
    ComparisonTable, FacilityCost, RatedFacility, ResultItem, SearchResponse,
};

use crate::localization::DISCLAIMER_CLINICS;
use crate::pipelines::response_from_reply;
use crate::prompt_defaults;
use crate::router::Services;

const TOP_CLINICS: usize = 10;

pub async fn generate(
    services: &Services,
    rated: &[RatedFacility],
    costs: &[FacilityCost],
    original_query: &str,
) -> SearchResponse {
    let system = services
        .prompts
        .load_or("clinic_report", prompt_defaults::CLINIC_REPORT);

    let cost_map: HashMap<&str, &FacilityCost> = costs
        .iter()
        .map(|c| (c.facility_name.as_str(), c))
        .collect();
    let clinics: Vec<Value> = rated
        .iter()
        .map(|r| {
            let mut entry = serde_json::to_value(r).unwrap_or_default();
            if let Some(cost) = cost_map.get(r.facility.name.as_str()) {
                entry["cost_info"] = serde_json::to_value(cost).unwrap_or_default();
            }
            entry
        })
        .collect();
    let user_message = serde_json::to_string_pretty(&json!({
        "query": original_query,
        "clinics": clinics,
    }))
    .unwrap_or_default();
    let default_meta = "კლინიკების ძიების შედეგები";

    for (tier, max_tokens) in [(ModelTier::Deep, 4000), (ModelTier::Fast, 3000)] {
        if let Some(reply) = services
            .generation
            .generate_json(tier, &system, &user_message, max_tokens)
            .await
        {
            if let Some(response) = response_from_reply(&reply, default_meta, DISCLAIMER_CLINICS) {
                return response;
            }
        }
        warn!(?tier, "clinic report tier produced no usable document");
    }

    render_fallback(rated, costs, original_query)
}

/// Deterministic comparison built straight from the rated list.
pub(crate) fn render_fallback(
    rated: &[RatedFacility],
    costs: &[FacilityCost],
    query: &str,
) -> SearchResponse {
    let cost_map: HashMap<&str, &FacilityCost> = costs
        .iter()
        .map(|c| (c.facility_name.as_str(), c))
        .collect();

    let mut items = Vec::new();
    let mut rows = Vec::new();
    for rated_clinic in rated.iter().take(TOP_CLINICS) {
        let facility = &rated_clinic.facility;
        let cost = cost_map.get(facility.name.as_str());
        let visa_text = match cost.and_then(|c| c.visa_required) {
            Some(false) => "არა",
            _ => "კი",
        };
        let flight = cost
            .map(|c| c.estimated_flight_cost.as_str())
            .unwrap_or("N/A");
        let jci_text = match facility.jci_accredited {
            Some(true) => "დიახ",
            _ => "ინფორმაცია არ არის",
        };

        items.push(ResultItem {
            title: facility.name.clone(),
            source: format!("{}, {}", facility.country, facility.city),
            body: format!(
                "**აქტიური კვლევები:** {}\n**რეიტინგი:** {:.0}/100\n**JCI:** {jci_text}\n**ვიზა:** {visa_text}\n**ავიაბილეთი:** {flight}",
                facility.active_trials_count, rated_clinic.rating_score
            ),
            tags: vec![
                facility.country.clone(),
                format!("კვლევები: {}", facility.active_trials_count),
            ],
            url: facility.source_url.clone(),
            rating: Some(rated_clinic.rating_score),
            ..ResultItem::default()
        });
        rows.push(vec![
            facility.name.clone(),
            facility.country.clone(),
            facility.active_trials_count.to_string(),
            format!("{:.0}", rated_clinic.rating_score),
            visa_text.to_string(),
        ]);
    }

    let comparison = (!rows.is_empty()).then(|| ComparisonTable {
        headers: vec![
            "კლინიკა".to_string(),
            "ქვეყანა".to_string(),
            "კვლევები".to_string(),
            "ქულა".to_string(),
            "ვიზა".to_string(),
        ],
        rows,
    });

    SearchResponse {
        meta: format!("ნაპოვნია {} კლინიკა: {query}", items.len()),
        items,
        comparison,
        disclaimer: DISCLAIMER_CLINICS.to_string(),
        ..SearchResponse::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medroute_types::FacilityRecord;

    fn rated(name: &str, country: &str, trials: u32, score: f64) -> RatedFacility {
        RatedFacility {
            facility: FacilityRecord {
                name: name.into(),
                country: country.into(),
                city: "City".into(),
                active_trials_count: trials,
                jci_accredited: Some(true),
                ..FacilityRecord::default()
            },
            rating_score: score,
            ..RatedFacility::default()
        }
    }

    fn cost(name: &str, visa: bool) -> FacilityCost {
        FacilityCost {
            facility_name: name.into(),
            visa_required: Some(visa),
            estimated_flight_cost: "€80-200".into(),
            ..FacilityCost::default()
        }
    }

    #[test]
    fn fallback_builds_well_formed_comparison() {
        let resp = render_fallback(
            &[rated("Acibadem", "Türkiye", 4, 80.0), rated("Sheba", "Israel", 2, 75.0)],
            &[cost("Acibadem", false)],
            "oncology",
        );
        assert_eq!(resp.items.len(), 2);
        let table = resp.comparison.unwrap();
        assert!(table.is_well_formed());
        assert_eq!(table.rows.len(), 2);
        // Turkey row is visa-free, the costless row defaults to visa "კი".
        assert_eq!(table.rows[0][4], "არა");
        assert_eq!(table.rows[1][4], "კი");
    }

    #[test]
    fn fallback_caps_item_count() {
        let rated_list: Vec<RatedFacility> = (0..15)
            .map(|i| rated(&format!("Clinic {i}"), "Germany", 1, 60.0))
            .collect();
        let resp = render_fallback(&rated_list, &[], "q");
        assert_eq!(resp.items.len(), TOP_CLINICS);
    }

    #[test]
    fn items_carry_rating() {
        let resp = render_fallback(&[rated("Sheba", "Israel", 2, 75.0)], &[], "q");
        assert_eq!(resp.items[0].rating, Some(75.0));
    }
}
