//! Name → component registries.
//!
//! One registry per capability kind, populated before the runtime starts
//! serving and read-only afterwards, which keeps lookups lock-free on the
//! hot path.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{ApiError, Capability};

/// An immutable mapping from store name to component instance.
pub struct Registry<T: ?Sized> {
    capability: Capability,
    components: HashMap<String, Arc<T>>,
}

impl<T: ?Sized> Registry<T> {
    pub fn new(capability: Capability) -> Self {
        Self {
            capability,
            components: HashMap::new(),
        }
    }

    /// Register a component. Later registrations win on duplicate names,
    /// matching last-one-wins configuration merging.
    pub fn insert(&mut self, name: impl Into<String>, component: Arc<T>) {
        self.components.insert(name.into(), component);
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Fail with `FAILED_PRECONDITION` when no component is configured.
    pub fn ensure_configured(&self) -> Result<(), ApiError> {
        if self.components.is_empty() {
            return Err(ApiError::NotConfigured {
                capability: self.capability,
            });
        }
        Ok(())
    }

    /// Look the name up without the precondition check, failing with
    /// `INVALID_ARGUMENT` on a miss.
    pub fn lookup(&self, name: &str) -> Result<Arc<T>, ApiError> {
        self.components
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::UnknownStore {
                capability: self.capability,
                name: name.to_string(),
            })
    }

    /// Precondition check followed by lookup; the standard dispatch entry.
    pub fn get(&self, name: &str) -> Result<Arc<T>, ApiError> {
        self.ensure_configured()?;
        self.lookup(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    trait Named: std::fmt::Debug + Send + Sync {
        fn name(&self) -> &str;
    }

    #[derive(Debug)]
    struct Fixed(&'static str);

    impl Named for Fixed {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn empty_registry_is_a_failed_precondition() {
        let registry: Registry<dyn Named> = Registry::new(Capability::Lock);
        let err = registry.get("any").unwrap_err();
        assert_eq!(err.code(), ErrorCode::FailedPrecondition);
    }

    #[test]
    fn unknown_name_is_an_invalid_argument_naming_the_store() {
        let mut registry: Registry<dyn Named> = Registry::new(Capability::Lock);
        registry.insert("etcd", Arc::new(Fixed("etcd")));
        let err = registry.get("zookeeper").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
        assert!(err.to_string().contains("zookeeper"));
    }

    #[test]
    fn lookup_skips_the_precondition_check() {
        let registry: Registry<dyn Named> = Registry::new(Capability::PubSub);
        let err = registry.lookup("p").unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidArgument);
    }

    #[test]
    fn known_name_resolves() {
        let mut registry: Registry<dyn Named> = Registry::new(Capability::State);
        registry.insert("redis", Arc::new(Fixed("redis")));
        assert_eq!(registry.get("redis").unwrap().name(), "redis");
    }
}
