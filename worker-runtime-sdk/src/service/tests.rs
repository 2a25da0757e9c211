use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;

use crate::service::{ResolveError, ScopeContext, ScopedService, ScopedServiceFactory};

struct Counter {
    hits: Arc<AtomicUsize>,
}

#[async_trait]
impl ScopedService for Counter {
    async fn write(&self) {
        self.hits.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_scope_context_ids_are_unique() {
    let a = ScopeContext::new();
    let b = ScopeContext::new();

    assert_ne!(a.scope_id, b.scope_id);
    assert!(b.created_at >= a.created_at);
}

#[tokio::test]
async fn test_closure_acts_as_factory() {
    let hits = Arc::new(AtomicUsize::new(0));
    let factory_hits = hits.clone();

    let factory = move |_: &ScopeContext| -> anyhow::Result<Arc<dyn ScopedService>> {
        Ok(Arc::new(Counter { hits: factory_hits.clone() }))
    };

    let service = factory.create(&ScopeContext::new()).unwrap();
    service.write().await;
    service.write().await;

    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_resolve_error_messages() {
    let err = ResolveError::NotRegistered("missing".to_string());
    assert_eq!(err.to_string(), "No scoped service registered for: missing");

    let err = ResolveError::Construction {
        name: "broken".to_string(),
        source: anyhow::anyhow!("boom"),
    };
    assert_eq!(err.to_string(), "Failed to construct scoped service 'broken': boom");
}
