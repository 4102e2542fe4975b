//! Generation-model service for medroute.
//!
//! # Architecture
//!
//! - [`GenerationModel`] trait defines the text-generation interface
//! - [`AnthropicClient`] implements it over the Anthropic Messages API
//! - [`RetryPolicy`] wraps any model with a fixed-count retry for the
//!   retryable status codes (429/500/502/503); timeouts are terminal
//! - [`GenerationService`] selects between the fast and deep model tiers
//!   and adds JSON-object extraction on top of raw generation
//! - [`PromptStore`] loads named prompt resources from disk
//!
//! Pipelines depend only on [`GenerationService`]; tests substitute a mock
//! [`GenerationModel`].

pub mod error;
pub mod json_extract;
pub mod model;
pub mod prompts;
pub mod retry;
pub mod service;

pub use error::{ModelError, Result};
pub use json_extract::extract_json;
pub use model::{AnthropicClient, AnthropicConfig, GenerateRequest, GenerationModel};
pub use prompts::{PromptError, PromptStore, DEFAULT_REPORT_PROMPT};
pub use retry::{is_retryable, RetryConfig, RetryPolicy};
pub use service::{GenerationService, ModelTier};
