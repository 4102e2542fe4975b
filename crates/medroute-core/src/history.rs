//! Search-history seam.
//!
//! Recording is fire-and-forget: the router spawns the write and never
//! waits for it, so a slow or broken history backend cannot delay a
//! response. The default sink does nothing.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use medroute_types::PipelineType;

#[async_trait]
pub trait HistorySink: Send + Sync {
    async fn record(&self, pipeline: PipelineType, query: &str, result_count: usize);
}

#[derive(Debug, Default)]
pub struct NoopSink;

#[async_trait]
impl HistorySink for NoopSink {
    async fn record(&self, pipeline: PipelineType, _query: &str, result_count: usize) {
        debug!(pipeline = pipeline.as_str(), result_count, "history record skipped (noop sink)");
    }
}

/// Spawn a history write without blocking the caller.
pub fn record_detached(
    sink: Arc<dyn HistorySink>,
    pipeline: PipelineType,
    query: String,
    result_count: usize,
) {
    tokio::spawn(async move {
        sink.record(pipeline, &query, result_count).await;
    });
}
