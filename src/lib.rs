//! A keyed service container.
//!
//! Parameters and lazily built services live side by side under string
//! keys. Services are memoized on first resolution unless marked as
//! factories, protected services are handed back without being invoked, and
//! any service can be wrapped later through [`Container::extend`].
//!
//! ```
//! use servicebox::{Container, ContainerError};
//! use std::sync::Arc;
//!
//! let c = Container::new();
//! c.set_value("one", 1_i32);
//! c.set_service("age", |_| Ok(19_i32));
//! c.extend_as("age", |age: Arc<i32>, c: &Container| {
//!     Ok::<_, ContainerError>(*age + *c.get_as::<i32>("one")?)
//! })?;
//!
//! assert_eq!(*c.get_as::<i32>("age")?, 20);
//! # Ok::<(), ContainerError>(())
//! ```

pub mod container;
pub mod error;
pub mod params;

pub use container::{
    Container, ContainerStats, Entry, Extender, Service, ServiceId, ServiceProvider, Value,
};
pub use error::{BoxError, ContainerError, Result};
