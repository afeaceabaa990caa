//! Facade support: memoized accessor slots and the reset chain between facade levels.

use crate::state::Provider;
use crate::transport::Headers;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;

type Slot = Arc<OnceCell<Arc<dyn Any + Send + Sync>>>;

/// Accessor slots of one facade level. Slots start empty, are filled on first access and
/// cleared together by [`ProviderRegistry::reset`], which then resets the parent level.
pub struct ProviderRegistry {
    name: &'static str,
    slots: Mutex<HashMap<(&'static str, TypeId), Slot>>,
    parent: Option<Arc<ProviderRegistry>>,
}

impl ProviderRegistry {
    pub fn root(name: &'static str) -> Arc<Self> {
        Arc::new(ProviderRegistry {
            name,
            slots: Mutex::new(HashMap::new()),
            parent: None,
        })
    }

    pub fn with_parent(name: &'static str, parent: Arc<ProviderRegistry>) -> Arc<Self> {
        Arc::new(ProviderRegistry {
            name,
            slots: Mutex::new(HashMap::new()),
            parent: Some(parent),
        })
    }

    /// Return the instance stored under `key`, constructing it on first access. Concurrent
    /// first callers share one construction.
    pub async fn get_or_init<T, F, Fut>(&self, key: &'static str, init: F) -> Arc<T>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.entry((key, TypeId::of::<T>())).or_default().clone()
        };
        let value = slot
            .get_or_init(|| async move { Arc::new(init().await) as Arc<dyn Any + Send + Sync> })
            .await
            .clone();
        match value.downcast::<T>() {
            Ok(v) => v,
            Err(_) => unreachable!("slot {} of {} is keyed by its type", key, self.name),
        }
    }

    #[cfg(test)]
    fn is_populated(&self, key: &'static str) -> bool {
        let slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
        slots
            .iter()
            .any(|((k, _), slot)| *k == key && slot.initialized())
    }

    /// Clear this level, then every ancestor level.
    pub fn reset(&self) {
        {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            slots.clear();
        }
        tracing::debug!(facade = %self.name, "providers cleared");
        if let Some(parent) = &self.parent {
            parent.reset();
        }
    }
}

/// Root of every generated facade.
pub trait DatabaseFacade: Send + Sync {
    fn provider(&self) -> &Provider;

    /// Headers every request accessor built by this facade sends by default.
    fn default_headers(&self) -> Option<&Headers> {
        self.provider().default_headers()
    }

    /// Drop memoized accessors. Provider-mode facades memoize nothing.
    fn clear_providers(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counter(usize);

    #[tokio::test]
    async fn memoizes_until_reset() {
        let registry = ProviderRegistry::root("IBaseDatabase");
        let built = AtomicUsize::new(0);
        let make = || async { Counter(built.fetch_add(1, Ordering::SeqCst)) };
        let a = registry.get_or_init("items", make).await;
        let b = registry.get_or_init("items", make).await;
        assert!(Arc::ptr_eq(&a, &b));
        assert!(registry.is_populated("items"));
        registry.reset();
        assert!(!registry.is_populated("items"));
        let c = registry.get_or_init("items", make).await;
        assert!(!Arc::ptr_eq(&a, &c));
        assert_eq!(c.0, 1);
    }

    #[tokio::test]
    async fn reset_propagates_to_ancestors() {
        let base = ProviderRegistry::root("IBaseDatabase");
        let app = ProviderRegistry::with_parent("IAppDatabase", base.clone());
        base.get_or_init("base_items", || async { Counter(0) }).await;
        app.get_or_init("app_items", || async { Counter(0) }).await;
        app.reset();
        assert!(!base.is_populated("base_items"));
        assert!(!app.is_populated("app_items"));
    }

    #[tokio::test]
    async fn parent_reset_leaves_child() {
        let base = ProviderRegistry::root("IBaseDatabase");
        let app = ProviderRegistry::with_parent("IAppDatabase", base.clone());
        app.get_or_init("app_items", || async { Counter(0) }).await;
        base.reset();
        assert!(app.is_populated("app_items"));
    }
}
