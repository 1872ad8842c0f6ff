//! Deferred service definitions
//!
//! A [`Service`] bundles the body that builds a value with the flags that
//! steer resolution. Flags belong to the identity of the service, so every
//! clone of a handle observes the same flags.

use super::entry::Value;
use super::Container;
use crate::error::Result;
use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use uuid::Uuid;

type ServiceBody = dyn Fn(&Container) -> Result<Value> + Send + Sync;

/// Stable identity of a service definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ServiceId(Uuid);

impl ServiceId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct ServiceInner {
    id: ServiceId,
    body: Box<ServiceBody>,
    factory: AtomicBool,
    protected: AtomicBool,
}

/// A lazily evaluated service, invoked with the container that resolves it
#[derive(Clone)]
pub struct Service {
    inner: Arc<ServiceInner>,
}

impl Service {
    /// Build a service from a closure producing a typed value
    pub fn new<T, F>(body: F) -> Self
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        Self::from_fn(move |c| body(c).map(|v| Arc::new(v) as Value))
    }

    /// Build a service from a closure that already yields an erased value
    pub fn from_fn<F>(body: F) -> Self
    where
        F: Fn(&Container) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(ServiceInner {
                id: ServiceId::new(),
                body: Box::new(body),
                factory: AtomicBool::new(false),
                protected: AtomicBool::new(false),
            }),
        }
    }

    pub fn id(&self) -> ServiceId {
        self.inner.id
    }

    /// Run the body. Bypasses memoization and flags entirely.
    pub fn call(&self, container: &Container) -> Result<Value> {
        (self.inner.body)(container)
    }

    /// Never memoize results of this service
    pub fn mark_factory(&self) -> &Self {
        self.inner.factory.store(true, Ordering::Relaxed);
        self
    }

    /// Hand this service back unevaluated on resolution
    pub fn mark_protected(&self) -> &Self {
        self.inner.protected.store(true, Ordering::Relaxed);
        self
    }

    pub fn is_factory(&self) -> bool {
        self.inner.factory.load(Ordering::Relaxed)
    }

    pub fn is_protected(&self) -> bool {
        self.inner.protected.load(Ordering::Relaxed)
    }
}

impl PartialEq for Service {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Service {}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("id", &self.id())
            .field("factory", &self.is_factory())
            .field("protected", &self.is_protected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answer() -> Service {
        Service::new(|_| Ok(42_i32))
    }

    #[test]
    fn test_same_body_distinct_identity() {
        let a = answer();
        let b = answer();
        assert_ne!(a.id(), b.id());

        a.mark_factory();
        assert!(a.is_factory());
        assert!(!b.is_factory());
    }

    #[test]
    fn test_flags_shared_between_clones() {
        let a = answer();
        let b = a.clone();
        assert_eq!(a, b);

        b.mark_protected();
        assert!(a.is_protected());
        assert!(!a.is_factory());
    }

    #[test]
    fn test_call_runs_body() {
        let c = Container::new();
        let value = answer().call(&c).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&42));
    }
}
