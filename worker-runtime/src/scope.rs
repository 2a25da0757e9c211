use std::{collections::HashMap, sync::Arc};

use uuid::Uuid;
use worker_runtime_sdk::service::{ResolveError, ScopeContext, ScopedService};

use crate::ServiceProvider;

/// A bounded lifetime in which each registered service is created at most once.
/// Everything the scope created is released when it is dropped.
pub struct ServiceScope {
    provider: Arc<ServiceProvider>,
    context: ScopeContext,
    instances: HashMap<String, Arc<dyn ScopedService>>,
}

impl ServiceScope {
    pub(crate) fn new(provider: Arc<ServiceProvider>) -> Self {
        let context = ScopeContext::new();
        tracing::trace!(scope_id = %context.scope_id, "Scope created.");

        Self {
            provider,
            context,
            instances: HashMap::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.context.scope_id
    }

    pub fn get_required_service(&mut self, name: &str) -> Result<Arc<dyn ScopedService>, ResolveError> {
        if let Some(existing) = self.instances.get(name) {
            return Ok(existing.clone());
        }

        let factory = self.provider
            .factory(name)
            .ok_or_else(|| ResolveError::NotRegistered(name.to_string()))?;

        let service = factory
            .create(&self.context)
            .map_err(|source| ResolveError::Construction {
                name: name.to_string(),
                source,
            })?;

        self.instances.insert(name.to_string(), service.clone());

        Ok(service)
    }
}

impl Drop for ServiceScope {
    fn drop(&mut self) {
        tracing::debug!(
            scope_id = %self.context.scope_id,
            instances = self.instances.len(),
            "Scope disposed."
        );

        self.instances.clear();
    }
}
