//! Keyed service container
//!
//! Holds parameters and lazily built services under string keys:
//! - parameters are returned as stored
//! - services are built on first resolution and memoized
//! - factory services are rebuilt on every resolution
//! - protected services are handed back unevaluated
//!
//! The container takes no locks. It is `Send` but not `Sync`; callers that
//! share one across threads wrap it in a mutex of their choice.

pub mod entry;
pub mod extend;
pub mod provider;
pub mod service;

pub use entry::{Entry, Value};
pub use extend::Extender;
pub use provider::ServiceProvider;
pub use service::{Service, ServiceId};

use crate::error::{ContainerError, Result};
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// A memoized result, tagged with the service that produced it
struct Instance {
    service: ServiceId,
    value: Value,
}

/// Resolution counters. Atomics, though a `Cell` would do for this `!Sync` container.
#[derive(Default)]
struct InnerStats {
    total_resolutions: AtomicUsize,
    cache_hits: AtomicUsize,
    invocations: AtomicUsize,
}

/// The service container
#[derive(Default)]
pub struct Container {
    items: RefCell<HashMap<String, Entry>>,
    instances: RefCell<HashMap<String, Instance>>,
    stats: InnerStats,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container seeded with entries
    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, Entry)>,
        K: Into<String>,
    {
        let items = values
            .into_iter()
            .map(|(key, entry)| (key.into(), entry))
            .collect();
        Self {
            items: RefCell::new(items),
            ..Self::default()
        }
    }

    /// Resolve `key`.
    ///
    /// Parameters come back as stored. Services are invoked with this
    /// container unless protected, and their result is memoized unless they
    /// are factories. Errors from the service body are returned untouched.
    pub fn get(&self, key: &str) -> Result<Value> {
        self.stats.total_resolutions.fetch_add(1, Ordering::Relaxed);

        let service = match self.raw(key)? {
            Entry::Value(value) => {
                trace!(key, "resolved parameter");
                return Ok(value);
            }
            Entry::Service(service) => service,
        };

        if service.is_protected() {
            trace!(key, service = %service.id(), "resolved protected service");
            return Ok(Arc::new(service) as Value);
        }

        if let Some(value) = self.memoized(key, service.id()) {
            self.stats.cache_hits.fetch_add(1, Ordering::Relaxed);
            trace!(key, service = %service.id(), "resolved memoized instance");
            return Ok(value);
        }

        // no borrow may be held here: the body can call back into the container
        self.stats.invocations.fetch_add(1, Ordering::Relaxed);
        trace!(key, service = %service.id(), factory = service.is_factory(), "invoking service");
        let value = service.call(self)?;

        if !service.is_factory() {
            self.instances.borrow_mut().insert(
                key.to_string(),
                Instance {
                    service: service.id(),
                    value: value.clone(),
                },
            );
        }
        Ok(value)
    }

    /// Like [`Container::get`] but panics when resolution fails
    pub fn must_get(&self, key: &str) -> Value {
        self.get(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Resolve `key` and downcast the result to `T`
    pub fn get_as<T>(&self, key: &str) -> Result<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        self.get(key)?
            .downcast::<T>()
            .map_err(|_| ContainerError::TypeMismatch {
                key: key.to_string(),
                expected: std::any::type_name::<T>(),
            })
    }

    /// Insert or overwrite the entry for `key`, dropping any memoized instance
    pub fn set(&self, key: impl Into<String>, entry: impl Into<Entry>) {
        let key = key.into();
        let entry = entry.into();
        debug!(key = %key, service = entry.is_service(), "setting entry");

        self.instances.borrow_mut().remove(&key);
        self.items.borrow_mut().insert(key, entry);
    }

    /// Store a plain parameter
    pub fn set_value<T>(&self, key: impl Into<String>, value: T)
    where
        T: Any + Send + Sync,
    {
        self.set(key, Entry::value(value));
    }

    /// Store a service built from `body`
    pub fn set_service<T, F>(&self, key: impl Into<String>, body: F)
    where
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
        T: Any + Send + Sync,
    {
        self.set(key, Service::new(body));
    }

    pub fn has(&self, key: &str) -> bool {
        self.items.borrow().contains_key(key)
    }

    /// All defined keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.items.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// The entry for `key` as stored, never invoked
    pub fn raw(&self, key: &str) -> Result<Entry> {
        self.items
            .borrow()
            .get(key)
            .cloned()
            .ok_or_else(|| ContainerError::not_defined(key))
    }

    /// Like [`Container::raw`] but panics on a missing key
    pub fn must_raw(&self, key: &str) -> Entry {
        self.raw(key).unwrap_or_else(|err| panic!("{err}"))
    }

    /// Mark `service` so its results are never memoized
    pub fn factory(&self, service: Service) -> Service {
        debug!(service = %service.id(), "marking factory");
        service.mark_factory();
        service
    }

    /// Mark `service` so resolution returns it unevaluated
    pub fn protect(&self, service: Service) -> Service {
        debug!(service = %service.id(), "marking protected");
        service.mark_protected();
        service
    }

    /// Let `provider` install its configuration
    pub fn register<P>(&self, provider: &P)
    where
        P: ServiceProvider + ?Sized,
    {
        debug!(provider = std::any::type_name::<P>(), "registering provider");
        provider.register(self);
    }

    /// Snapshot of resolution counters
    pub fn stats(&self) -> ContainerStats {
        ContainerStats {
            total_resolutions: self.stats.total_resolutions.load(Ordering::Relaxed),
            cache_hits: self.stats.cache_hits.load(Ordering::Relaxed),
            invocations: self.stats.invocations.load(Ordering::Relaxed),
        }
    }

    fn memoized(&self, key: &str, service: ServiceId) -> Option<Value> {
        self.instances
            .borrow()
            .get(key)
            .filter(|instance| instance.service == service)
            .map(|instance| instance.value.clone())
    }
}

/// Resolution statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerStats {
    /// Every call to `get`, including failed ones
    pub total_resolutions: usize,
    /// Resolutions answered from a memoized instance
    pub cache_hits: usize,
    /// Service bodies invoked by the container
    pub invocations: usize,
}

impl ContainerStats {
    /// Share of service resolutions served from memoized instances
    pub fn hit_rate(&self) -> f64 {
        let served = self.cache_hits + self.invocations;
        if served == 0 {
            0.0
        } else {
            self.cache_hits as f64 / served as f64
        }
    }
}

/// Resolve a key and downcast it in one step
#[macro_export]
macro_rules! get_as {
    ($container:expr, $key:expr, $type:ty) => {
        $container.get_as::<$type>($key)
    };
}
