//! The service map: a read-only lookup from subgraph name to the
//! `DataSource` that serves it, shareable across concurrent requests.

use std::collections::HashMap;
use std::sync::Arc;

use super::common::DataSource;

pub struct ServiceMap<C> {
    services: HashMap<String, Arc<dyn DataSource<C>>>,
}

impl<C> ServiceMap<C> {
    pub fn new() -> Self {
        Self {
            services: HashMap::new(),
        }
    }

    pub fn insert(&mut self, name: impl Into<String>, source: Arc<dyn DataSource<C>>) {
        self.services.insert(name.into(), source);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn DataSource<C>>> {
        self.services.get(name)
    }
}

impl<C> Default for ServiceMap<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> FromIterator<(String, Arc<dyn DataSource<C>>)> for ServiceMap<C> {
    fn from_iter<I: IntoIterator<Item = (String, Arc<dyn DataSource<C>>)>>(iter: I) -> Self {
        Self {
            services: iter.into_iter().collect(),
        }
    }
}
