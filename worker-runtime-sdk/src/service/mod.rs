use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use uuid::Uuid;

#[cfg(test)]
mod tests;

/// Identity of the scope a service instance is being created for.
#[derive(Debug, Clone)]
pub struct ScopeContext {
    pub scope_id: Uuid,
    pub created_at: DateTime<Local>,
}

impl ScopeContext {
    pub fn new() -> Self {
        Self {
            scope_id: Uuid::new_v4(),
            created_at: Local::now(),
        }
    }
}

impl Default for ScopeContext {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("No scoped service registered for: {0}")]
    NotRegistered(String),

    #[error("Failed to construct scoped service '{name}': {source}")]
    Construction {
        name: String,
        #[source]
        source: anyhow::Error,
    },
}

/// The unit of work resolved once per scope.
#[async_trait]
pub trait ScopedService: Send + Sync {
    async fn write(&self);
}

/// Builds a fresh [`ScopedService`] for a scope.
pub trait ScopedServiceFactory: Send + Sync {
    fn create(&self, ctx: &ScopeContext) -> anyhow::Result<Arc<dyn ScopedService>>;
}

impl<F> ScopedServiceFactory for F
where
    F: Fn(&ScopeContext) -> anyhow::Result<Arc<dyn ScopedService>> + Send + Sync,
{
    fn create(&self, ctx: &ScopeContext) -> anyhow::Result<Arc<dyn ScopedService>> {
        self(ctx)
    }
}
