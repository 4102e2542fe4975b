//! High-level generation service shared by all pipelines.
//!
//! Holds one model transport and two model ids: a fast model for cheap
//! normalization and scoring calls, and a deep model for report synthesis
//! and differential reasoning.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::Result;
use crate::json_extract::extract_json;
use crate::model::{GenerateRequest, GenerationModel};

/// Which model a call should target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelTier {
    /// Cheap, low-latency model for normalization and scoring.
    Fast,
    /// Larger model for report synthesis and clinical reasoning.
    Deep,
}

pub struct GenerationService {
    model: Box<dyn GenerationModel + Send + Sync>,
    fast_model: String,
    deep_model: String,
}

impl GenerationService {
    pub fn new(
        model: Box<dyn GenerationModel + Send + Sync>,
        fast_model: impl Into<String>,
        deep_model: impl Into<String>,
    ) -> Self {
        Self {
            model,
            fast_model: fast_model.into(),
            deep_model: deep_model.into(),
        }
    }

    pub fn model_id(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast_model,
            ModelTier::Deep => &self.deep_model,
        }
    }

    /// Raw text generation against the selected tier.
    pub async fn generate(
        &self,
        tier: ModelTier,
        system: &str,
        user_message: &str,
        max_tokens: u32,
    ) -> Result<String> {
        let request = GenerateRequest::new(self.model_id(tier), system, user_message, max_tokens);
        self.model.generate(&request).await
    }

    /// Generation that expects a JSON object back.
    ///
    /// Returns `None` when the call fails or the reply carries no parseable
    /// object; callers fall back to their deterministic path.
    pub async fn generate_json(
        &self,
        tier: ModelTier,
        system: &str,
        user_message: &str,
        max_tokens: u32,
    ) -> Option<Map<String, Value>> {
        match self.generate(tier, system, user_message, max_tokens).await {
            Ok(text) => {
                let parsed = extract_json(&text);
                if parsed.is_none() {
                    warn!(
                        model = self.model_id(tier),
                        reply_len = text.len(),
                        "model reply carried no JSON object"
                    );
                }
                parsed
            }
            Err(err) => {
                warn!(model = self.model_id(tier), error = %err, "generation failed");
                None
            }
        }
    }
}
