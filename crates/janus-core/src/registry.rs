//! Registered extension sets, sorted by execution order.

use std::sync::Arc;

use crate::listener::GroupOperationListener;
use crate::resolver::GroupResolver;

/// The listeners and resolvers participating in group operations.
///
/// Registration happens once, at construction: both sets are stable-
/// sorted by `execution_order_id` here, so equal order values keep
/// their registration order and dispatch never re-sorts. Re-ordering is
/// a reconfiguration event: build a new registry.
#[derive(Default)]
pub struct ExtensionRegistry {
    listeners: Vec<Arc<dyn GroupOperationListener>>,
    resolvers: Vec<Arc<dyn GroupResolver>>,
}

impl ExtensionRegistry {
    pub fn new(
        mut listeners: Vec<Arc<dyn GroupOperationListener>>,
        mut resolvers: Vec<Arc<dyn GroupResolver>>,
    ) -> Self {
        listeners.sort_by_key(|l| l.execution_order_id());
        resolvers.sort_by_key(|r| r.execution_order_id());
        Self {
            listeners,
            resolvers,
        }
    }

    /// A registry with no extensions; every operation goes straight to
    /// the underlying directory.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Listeners in execution order.
    pub fn listeners(&self) -> &[Arc<dyn GroupOperationListener>] {
        &self.listeners
    }

    /// All registered resolvers in execution order, including disabled
    /// ones. The enabled flag is checked at dispatch time, immediately
    /// before each call.
    pub fn resolvers(&self) -> &[Arc<dyn GroupResolver>] {
        &self.resolvers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ordered(i32);

    impl GroupOperationListener for Ordered {
        fn execution_order_id(&self) -> i32 {
            self.0
        }
    }

    #[test]
    fn listeners_sorted_ascending_by_execution_order() {
        let registry = ExtensionRegistry::new(
            vec![Arc::new(Ordered(30)), Arc::new(Ordered(10)), Arc::new(Ordered(20))],
            Vec::new(),
        );
        let orders: Vec<i32> = registry
            .listeners()
            .iter()
            .map(|l| l.execution_order_id())
            .collect();
        assert_eq!(orders, vec![10, 20, 30]);
    }
}
