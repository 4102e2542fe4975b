//! Result caching with a pluggable external backend and an in-memory floor.
//!
//! Keys are derived from the pipeline type plus the canonicalized input
//! payload, so identical requests hit the same entry regardless of JSON
//! object key order. There is no single-flight: concurrent identical
//! requests may each run the pipeline and the last writer wins.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use medroute_types::PipelineType;

use crate::settings::Settings;

const KEY_PREFIX: &str = "mr:";
const MEMORY_CAPACITY: usize = 256;

/// External cache backend seam (a Redis client in a full deployment).
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

/// In-process TTL cache. Expiry happens on read; writes prune expired
/// entries opportunistically and evict the oldest deadline at capacity.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some((deadline, value)) if *deadline > Instant::now() => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: &str, value: String, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        entries.retain(|_, (deadline, _)| *deadline > now);
        if entries.len() >= MEMORY_CAPACITY {
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, (deadline, _))| *deadline)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(key.to_string(), (now + ttl, value));
    }
}

/// Read-through cache: external backend first, memory floor always.
pub struct CacheService {
    external: Option<Box<dyn CacheStore>>,
    memory: MemoryCache,
    ttl_trials: Duration,
    ttl_literature: Duration,
    ttl_clinics: Duration,
}

impl CacheService {
    pub fn new(settings: &Settings, external: Option<Box<dyn CacheStore>>) -> Self {
        Self {
            external,
            memory: MemoryCache::new(),
            ttl_trials: Duration::from_secs(settings.cache_ttl_trials),
            ttl_literature: Duration::from_secs(settings.cache_ttl_literature),
            ttl_clinics: Duration::from_secs(settings.cache_ttl_clinics),
        }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        if let Some(external) = &self.external {
            if let Some(value) = external.get(key).await {
                info!(key = &key[..key.len().min(20)], "cache hit (external)");
                return Some(value);
            }
        }
        let value = self.memory.get(key);
        if value.is_some() {
            info!(key = &key[..key.len().min(20)], "cache hit (memory)");
        }
        value
    }

    pub async fn set(&self, key: &str, value: String, ttl: Duration) {
        if let Some(external) = &self.external {
            external.set(key, value.clone(), ttl).await;
            debug!(key = &key[..key.len().min(20)], ttl_secs = ttl.as_secs(), "cache set (external)");
        }
        self.memory.set(key, value, ttl);
    }

    /// Per-pipeline TTL. Report generation is never cached, so any TTL it
    /// resolves to is moot; it maps to the trials TTL for completeness.
    pub fn ttl_for(&self, pipeline: PipelineType) -> Duration {
        match pipeline {
            PipelineType::ResearchSearch => self.ttl_literature,
            PipelineType::SymptomNavigation => self.ttl_trials,
            PipelineType::ClinicSearch => self.ttl_clinics,
            PipelineType::ReportGeneration => self.ttl_trials,
        }
    }
}

/// Deterministic cache key: `"mr:" + first 32 hex of sha256(type:canonical)`.
pub fn make_key(pipeline: PipelineType, input: &Value) -> String {
    let canonical = canonical_json(input);
    let content = format!("{}:{}", pipeline.as_str(), canonical);
    let digest = Sha256::digest(content.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{b:02x}")).collect();
    format!("{KEY_PREFIX}{}", &hex[..32])
}

/// Serialize with object keys sorted recursively; array order is preserved.
fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| {
                    format!(
                        "{}:{}",
                        serde_json::to_string(k).unwrap_or_default(),
                        canonical_json(&map[k])
                    )
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let rendered: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", rendered.join(","))
        }
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}
