mod scope;
pub mod services;
mod version;


use std::{collections::HashMap, sync::Arc};

use services::scoped_writer::ScopedWriterFactory;
use worker_runtime_sdk::service::ScopedServiceFactory;

pub use scope::ServiceScope;
pub use version::get_version_string;

/// Name the stock [`services::scoped_writer::ScopedWriter`] is registered under.
pub const SCOPED_WRITER: &str = "scoped-writer";

pub struct ServiceProviderBuilder {
    factories: HashMap<String, Arc<dyn ScopedServiceFactory>>,
}

impl ServiceProviderBuilder {
    pub fn new() -> Self {
        let mut factories: HashMap<String, Arc<dyn ScopedServiceFactory>> = HashMap::new();
        factories.insert(SCOPED_WRITER.to_string(), Arc::new(ScopedWriterFactory));

        Self { factories }
    }

    /// Registers a scoped factory, replacing any previous one with the same name.
    pub fn register_scoped(
        &mut self,
        name: &str,
        factory: Arc<dyn ScopedServiceFactory>,
    ) -> &mut Self
    {
        if self.factories.insert(name.to_string(), factory).is_some() {
            tracing::debug!("Replaced scoped service registration: {}", name);
        }

        self
    }

    pub fn build(self) -> ServiceProvider {
        ServiceProvider {
            factories: self.factories,
        }
    }
}

impl Default for ServiceProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ServiceProvider {
    factories: HashMap<String, Arc<dyn ScopedServiceFactory>>,
}

impl ServiceProvider {
    pub fn create_scope(self: &Arc<Self>) -> ServiceScope {
        ServiceScope::new(self.clone())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub(crate) fn factory(&self, name: &str) -> Option<&Arc<dyn ScopedServiceFactory>> {
        self.factories.get(name)
    }
}
