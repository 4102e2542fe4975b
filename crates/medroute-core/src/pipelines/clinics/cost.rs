//! Travel and treatment cost estimation for patients departing from Georgia.
//!
//! Runs after rating because the estimates attach to the rated list; the
//! figures themselves come from a static per-country benchmark table.

use tracing::info;

use medroute_types::{FacilityCost, RatedFacility};

struct CountryBenchmark {
    country: &'static str,
    visa_required: bool,
    flight_cost: &'static str,
    living_cost_per_day: &'static str,
}

const COUNTRY_BENCHMARKS: [CountryBenchmark; 8] = [
    CountryBenchmark {
        country: "germany",
        visa_required: true,
        flight_cost: "€200-400",
        living_cost_per_day: "€80-150",
    },
    CountryBenchmark {
        country: "türkiye",
        visa_required: false,
        flight_cost: "€80-200",
        living_cost_per_day: "€30-60",
    },
    CountryBenchmark {
        country: "turkey",
        visa_required: false,
        flight_cost: "€80-200",
        living_cost_per_day: "€30-60",
    },
    CountryBenchmark {
        country: "israel",
        visa_required: true,
        flight_cost: "€150-350",
        living_cost_per_day: "€100-180",
    },
    CountryBenchmark {
        country: "united states",
        visa_required: true,
        flight_cost: "€500-1200",
        living_cost_per_day: "€120-250",
    },
    CountryBenchmark {
        country: "spain",
        visa_required: true,
        flight_cost: "€150-350",
        living_cost_per_day: "€60-120",
    },
    CountryBenchmark {
        country: "india",
        visa_required: true,
        flight_cost: "€300-600",
        living_cost_per_day: "€20-50",
    },
    CountryBenchmark {
        country: "japan",
        visa_required: true,
        flight_cost: "€500-1000",
        living_cost_per_day: "€100-200",
    },
];

const DEFAULT_BENCHMARK: CountryBenchmark = CountryBenchmark {
    country: "",
    visa_required: true,
    flight_cost: "€200-500",
    living_cost_per_day: "€60-120",
};

const TREATMENT_COST_NOTE: &str =
    "კონკრეტული შეფასებისთვის საჭიროა კლინიკასთან კონსულტაცია";
const TOTAL_COST_NOTE: &str = "ინდივიდუალური";

pub fn estimate(facilities: &[RatedFacility]) -> Vec<FacilityCost> {
    let costs: Vec<FacilityCost> = facilities.iter().map(estimate_single).collect();
    info!(facilities = costs.len(), "cost estimation complete");
    costs
}

fn estimate_single(rated: &RatedFacility) -> FacilityCost {
    let country = rated.facility.country.to_lowercase();
    let benchmark = COUNTRY_BENCHMARKS
        .iter()
        .find(|b| b.country == country)
        .unwrap_or(&DEFAULT_BENCHMARK);

    FacilityCost {
        facility_name: rated.facility.name.clone(),
        estimated_treatment_cost: TREATMENT_COST_NOTE.to_string(),
        visa_required: Some(benchmark.visa_required),
        estimated_flight_cost: benchmark.flight_cost.to_string(),
        estimated_living_cost: format!("{} / დღეში", benchmark.living_cost_per_day),
        total_estimated_cost: TOTAL_COST_NOTE.to_string(),
    }
}
