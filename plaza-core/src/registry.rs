use std::collections::HashMap;
use std::sync::Arc;

use crate::PlazaService;

/// A simple registry that maps service names to PlazaService instances.
///
/// Named services are the backbone of Plaza: every collection is a
/// service that can be called from any host (CLI, jobs, HTTP, etc.).
pub struct PlazaServiceRegistry<R, P = ()> {
    services: HashMap<String, Arc<dyn PlazaService<R, P>>>,
}

impl<R, P> PlazaServiceRegistry<R, P> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    /// Register a service under a given name.
    pub fn register<S>(&mut self, name: S, service: Arc<dyn PlazaService<R, P>>)
    where
        S: Into<String>,
    {
        self.services.insert(name.into(), service);
    }

    /// Look up a service by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn PlazaService<R, P>>> {
        self.services.get(name)
    }
}

impl<R, P> Default for PlazaServiceRegistry<R, P> {
    fn default() -> Self {
        Self::new()
    }
}
