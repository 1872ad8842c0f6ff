//! Extension of existing service definitions

use super::entry::{Entry, Value};
use super::service::Service;
use super::Container;
use crate::error::{ContainerError, Result};
use std::any::Any;
use std::sync::Arc;
use tracing::debug;

/// Wraps the result of a prior service definition
pub trait Extender: Send + Sync + 'static {
    fn extend(&self, prior: Value, container: &Container) -> Result<Value>;
}

impl<F> Extender for F
where
    F: Fn(Value, &Container) -> Result<Value> + Send + Sync + 'static,
{
    fn extend(&self, prior: Value, container: &Container) -> Result<Value> {
        self(prior, container)
    }
}

impl Container {
    /// Replace the service under `key` with one that feeds the original
    /// result through `extender`.
    ///
    /// The replacement has a fresh identity: factory and protected flags of
    /// the original do not carry over.
    pub fn extend<E>(&self, key: &str, extender: E) -> Result<()>
    where
        E: Extender,
    {
        let original = match self.raw(key)? {
            Entry::Service(service) => service,
            Entry::Value(_) => return Err(ContainerError::not_a_service(key)),
        };

        let extended = Service::from_fn(move |c| {
            let inner = original.call(c)?;
            extender.extend(inner, c)
        });
        debug!(key, service = %extended.id(), "extending service");

        self.set(key, extended);
        Ok(())
    }

    /// Typed form of [`Container::extend`]
    pub fn extend_as<T, U, F>(&self, key: &str, extender: F) -> Result<()>
    where
        T: Any + Send + Sync,
        U: Any + Send + Sync,
        F: Fn(Arc<T>, &Container) -> Result<U> + Send + Sync + 'static,
    {
        let owned_key = key.to_string();
        self.extend(key, move |prior: Value, c: &Container| {
            let prior = prior.downcast::<T>().map_err(|_| ContainerError::TypeMismatch {
                key: owned_key.clone(),
                expected: std::any::type_name::<T>(),
            })?;
            extender(prior, c).map(|v| Arc::new(v) as Value)
        })
    }

    /// Like [`Container::extend`] but panics on a missing or plain entry
    pub fn must_extend<E>(&self, key: &str, extender: E)
    where
        E: Extender,
    {
        if let Err(err) = self.extend(key, extender) {
            panic!("{err}");
        }
    }
}
