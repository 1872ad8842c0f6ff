//! Raw entries stored under container keys

use super::service::Service;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// An opaque resolved value. Callers downcast it to the concrete type.
pub type Value = Arc<dyn Any + Send + Sync>;

/// What a key holds before resolution
#[derive(Clone)]
pub enum Entry {
    /// Parameter returned as-is by every read
    Value(Value),
    /// Deferred computation interpreted by resolution
    Service(Service),
}

impl Entry {
    /// Store any value as a plain parameter, including functions and closures.
    /// A [`Service`] stays a service.
    pub fn value<T>(value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        if let Some(service) = (&value as &dyn Any).downcast_ref::<Service>() {
            return Entry::Service(service.clone());
        }
        Entry::Value(Arc::new(value))
    }

    pub fn is_service(&self) -> bool {
        matches!(self, Entry::Service(_))
    }

    pub fn as_service(&self) -> Option<&Service> {
        match self {
            Entry::Service(service) => Some(service),
            Entry::Value(_) => None,
        }
    }

    /// The stored parameter, if this entry is not a service
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Value(value) => Some(value),
            Entry::Service(_) => None,
        }
    }
}

impl From<Service> for Entry {
    fn from(service: Service) -> Self {
        Entry::Service(service)
    }
}

/// A resolved protected service goes back in as the same service
impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        match value.downcast_ref::<Service>() {
            Some(service) => Entry::Service(service.clone()),
            None => Entry::Value(value),
        }
    }
}

impl fmt::Debug for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Value(_) => f.write_str("Value(..)"),
            Entry::Service(service) => f.debug_tuple("Service").field(service).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_functions_stored_as_values_are_not_services() {
        let entry = Entry::value(|| 19_i32);
        assert!(!entry.is_service());
        assert!(entry.as_value().is_some());

        let entry = Entry::value(19_i32);
        assert!(entry.as_service().is_none());
    }

    #[test]
    fn test_service_given_as_value_stays_service() {
        let service = Service::new(|_| Ok(19_i32));
        let entry = Entry::value(service.clone());
        assert_eq!(entry.as_service(), Some(&service));

        let erased: Value = Arc::new(service.clone());
        let entry = Entry::from(erased);
        assert_eq!(entry.as_service(), Some(&service));
    }

    #[test]
    fn test_service_conversion() {
        let service = Service::new(|_| Ok("xpto"));
        let entry: Entry = service.clone().into();
        assert!(entry.is_service());
        assert_eq!(entry.as_service(), Some(&service));
    }
}
