//! Service providers
//!
//! A provider groups related `set`/`extend` calls so configuration can be
//! split across modules and installed with one `register` call.

use super::Container;

/// Installs configuration into a container
pub trait ServiceProvider {
    fn register(&self, container: &Container);
}

/// Plain functions and closures act as providers
impl<F> ServiceProvider for F
where
    F: Fn(&Container),
{
    fn register(&self, container: &Container) {
        self(container)
    }
}
