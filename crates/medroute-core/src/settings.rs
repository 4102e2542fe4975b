//! Environment-driven configuration.

use std::env;

/// Runtime settings, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Anthropic API key. Empty means generation is not configured and every
    /// model-assisted stage runs on its deterministic fallback.
    pub anthropic_api_key: String,
    /// Model for normalization, scoring, and summarization calls.
    pub fast_model: String,
    /// Model for report synthesis and differential reasoning.
    pub deep_model: String,
    /// Optional NCBI key for the PubMed gateway.
    pub ncbi_api_key: Option<String>,
    pub llm_timeout_secs: u64,
    pub llm_max_retries: u32,
    /// Cache TTLs in seconds, per pipeline type.
    pub cache_ttl_trials: u64,
    pub cache_ttl_literature: u64,
    pub cache_ttl_clinics: u64,
    /// Directory of prompt template overrides.
    pub prompt_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            anthropic_api_key: String::new(),
            fast_model: "claude-sonnet-4-20250514".to_string(),
            deep_model: "claude-opus-4-20250514".to_string(),
            ncbi_api_key: None,
            llm_timeout_secs: 60,
            llm_max_retries: 1,
            cache_ttl_trials: 86_400,
            cache_ttl_literature: 604_800,
            cache_ttl_clinics: 2_592_000,
            prompt_dir: "prompts".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the environment, falling back to defaults for
    /// anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            anthropic_api_key: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            fast_model: env_or("MEDROUTE_FAST_MODEL", &defaults.fast_model),
            deep_model: env_or("MEDROUTE_DEEP_MODEL", &defaults.deep_model),
            ncbi_api_key: env::var("NCBI_API_KEY").ok().filter(|k| !k.is_empty()),
            llm_timeout_secs: env_parse("MEDROUTE_LLM_TIMEOUT_SECS", defaults.llm_timeout_secs),
            llm_max_retries: env_parse("MEDROUTE_LLM_MAX_RETRIES", defaults.llm_max_retries),
            cache_ttl_trials: env_parse("MEDROUTE_CACHE_TTL_TRIALS", defaults.cache_ttl_trials),
            cache_ttl_literature: env_parse(
                "MEDROUTE_CACHE_TTL_LITERATURE",
                defaults.cache_ttl_literature,
            ),
            cache_ttl_clinics: env_parse("MEDROUTE_CACHE_TTL_CLINICS", defaults.cache_ttl_clinics),
            prompt_dir: env_or("MEDROUTE_PROMPT_DIR", &defaults.prompt_dir),
        }
    }

    pub fn is_generation_configured(&self) -> bool {
        !self.anthropic_api_key.is_empty()
    }
}

fn env_or(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(value) if !value.is_empty() => value,
        _ => default.to_string(),
    }
}

fn env_parse<T: std::str::FromStr + Copy>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();
        assert_eq!(settings.llm_timeout_secs, 60);
        assert_eq!(settings.llm_max_retries, 1);
        assert_eq!(settings.cache_ttl_trials, 86_400);
        assert_eq!(settings.cache_ttl_literature, 604_800);
        assert_eq!(settings.cache_ttl_clinics, 2_592_000);
        assert!(!settings.is_generation_configured());
    }
}
