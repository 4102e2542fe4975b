//! Named-geography to country-list mapping for registry location filters.

/// Canonical country name for each named geography token.
pub const GEOGRAPHY_MAP: [(&str, &str); 7] = [
    ("usa", "United States"),
    ("turkey", "Türkiye"),
    ("israel", "Israel"),
    ("germany", "Germany"),
    ("spain", "Spain"),
    ("india", "India"),
    ("japan", "Japan"),
];

/// EU member states used when a query names the region as a whole.
pub const EU_COUNTRIES: [&str; 27] = [
    "Austria",
    "Belgium",
    "Bulgaria",
    "Croatia",
    "Cyprus",
    "Czech Republic",
    "Denmark",
    "Estonia",
    "Finland",
    "France",
    "Germany",
    "Greece",
    "Hungary",
    "Ireland",
    "Italy",
    "Latvia",
    "Lithuania",
    "Luxembourg",
    "Malta",
    "Netherlands",
    "Poland",
    "Portugal",
    "Romania",
    "Slovakia",
    "Slovenia",
    "Spain",
    "Sweden",
];

/// Expand a comma-separated geography string into a registry location filter.
///
/// `worldwide` (or empty) means no filter. `europe`/`eu` expand to the EU
/// country list. Unrecognized tokens are silently ignored rather than
/// rejected, so a half-garbled geography still narrows where it can.
pub fn build_location_filter(geography: &str) -> String {
    if geography.is_empty() || geography == "worldwide" {
        return String::new();
    }

    let mut countries: Vec<&str> = Vec::new();
    for token in geography.split(',') {
        let token = token.trim().to_lowercase();
        if token == "worldwide" {
            return String::new();
        }
        if token == "europe" || token == "eu" {
            for country in EU_COUNTRIES {
                if !countries.contains(&country) {
                    countries.push(country);
                }
            }
            continue;
        }
        if let Some((_, country)) = GEOGRAPHY_MAP.iter().find(|(key, _)| *key == token) {
            if !countries.contains(country) {
                countries.push(country);
            }
        }
    }
    countries.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worldwide_means_no_filter() {
        assert_eq!(build_location_filter("worldwide"), "");
        assert_eq!(build_location_filter(""), "");
    }

    #[test]
    fn worldwide_token_anywhere_disables_the_filter() {
        assert_eq!(build_location_filter("turkey, worldwide"), "");
    }

    #[test]
    fn named_countries_map_to_canonical_names() {
        assert_eq!(build_location_filter("usa"), "United States");
        assert_eq!(build_location_filter("turkey, israel"), "Türkiye,Israel");
    }

    #[test]
    fn europe_expands_to_eu_countries() {
        let filter = build_location_filter("europe");
        assert!(filter.contains("Germany"));
        assert!(filter.contains("Sweden"));
        assert_eq!(filter.split(',').count(), EU_COUNTRIES.len());
    }

    #[test]
    fn eu_plus_member_does_not_duplicate() {
        let filter = build_location_filter("eu, germany");
        assert_eq!(filter.matches("Germany").count(), 1);
    }

    #[test]
    fn unknown_tokens_are_ignored() {
        assert_eq!(build_location_filter("atlantis, israel"), "Israel");
        assert_eq!(build_location_filter("atlantis"), "");
    }
}
