use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use uuid::Uuid;
use worker_runtime_sdk::service::{ScopeContext, ScopedService, ScopedServiceFactory};

/// Stock unit of work: mints an id and logs it.
pub struct ScopedWriter;

impl ScopedWriter {
    pub fn new() -> Self {
        Self
    }

    /// Produces a fresh identifier and logs it with the current time.
    pub fn record(&self) -> Uuid {
        let id = Uuid::new_v4();
        tracing::info!("ScopedWriter {} - {}", id, Local::now());
        id
    }
}

impl Default for ScopedWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ScopedService for ScopedWriter {
    async fn write(&self) {
        self.record();
    }
}

pub struct ScopedWriterFactory;

impl ScopedServiceFactory for ScopedWriterFactory {
    fn create(&self, _ctx: &ScopeContext) -> anyhow::Result<Arc<dyn ScopedService>> {
        Ok(Arc::new(ScopedWriter::new()))
    }
}
