//! Identity → coordinator logger registry.

use std::sync::Arc;

use dashmap::DashMap;

use crate::identity::Identity;
use crate::logger::CoordinatorLogger;
use crate::observability::metrics;

/// Registry of the coordinator's loggers.
///
/// Cloning shares the same map. Entries are never removed; they live as long
/// as the last clone.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    inner: Arc<DashMap<Identity, Arc<CoordinatorLogger>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a logger under its identity. Returns the logger it replaced.
    pub fn register(&self, logger: Arc<CoordinatorLogger>) -> Option<Arc<CoordinatorLogger>> {
        let identity = logger.identity().clone();
        let leaves = logger.leaves().len();
        let previous = self.inner.insert(identity.clone(), logger);

        if previous.is_some() {
            tracing::debug!(identity = %identity, "Replacing registered logger");
        } else {
            tracing::debug!(identity = %identity, leaves, "Logger registered");
        }
        metrics::record_logger_registered();
        previous
    }

    pub fn get(&self, identity: &Identity) -> Option<Arc<CoordinatorLogger>> {
        self.inner.get(identity).map(|entry| Arc::clone(entry.value()))
    }

    pub fn contains(&self, identity: &Identity) -> bool {
        self.inner.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Registered identities, sorted.
    pub fn identities(&self) -> Vec<Identity> {
        let mut ids: Vec<_> = self.inner.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialize::SafeSerializer;
    use crate::spec::LoggerSpec;
    use crate::transport::StandardTransports;
    use serde_json::json;

    fn logger(value: serde_json::Value) -> Arc<CoordinatorLogger> {
        let spec: LoggerSpec = serde_json::from_value(value).unwrap();
        Arc::new(CoordinatorLogger::build(&spec, &StandardTransports::new(), &SafeSerializer::default()).unwrap())
    }

    #[test]
    fn register_and_lookup() {
        let registry = Registry::new();
        let a = logger(json!(["memory"]));
        assert!(registry.register(Arc::clone(&a)).is_none());
        assert!(registry.contains(a.identity()));
        assert_eq!(registry.len(), 1);
        assert!(Arc::ptr_eq(&registry.get(a.identity()).unwrap(), &a));
    }

    #[test]
    fn same_identity_replaces_entry() {
        let registry = Registry::new();
        let first = logger(json!(["memory"]));
        let second = logger(json!(["memory"]));
        registry.register(Arc::clone(&first));
        let replaced = registry.register(Arc::clone(&second)).unwrap();
        assert!(Arc::ptr_eq(&replaced, &first));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn identities_are_sorted() {
        let registry = Registry::new();
        let a = logger(json!(["memory"]));
        let b = logger(json!(["memory", "memory"]));
        registry.register(Arc::clone(&a));
        registry.register(Arc::clone(&b));

        let mut expected = vec![a.identity().clone(), b.identity().clone()];
        expected.sort();
        assert_eq!(registry.identities(), expected);
    }

    #[test]
    fn independent_registries_do_not_share_entries() {
        let one = Registry::new();
        let two = Registry::new();
        one.register(logger(json!(["memory"])));
        assert!(two.is_empty());
        assert_eq!(one.clone().len(), 1);
    }
}
