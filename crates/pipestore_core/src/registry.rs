//! Registry lookup used to resolve weak references on load.
//!
//! # Invariants
//! - Lookups never cache across calls on the caller side; every
//!   `from_model` resolves through the registry again.
//! - Registering an id twice replaces the previous live instance.

use crate::model::data_source::DataSource;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Resolves a data-source id to a live instance, or `None` when absent.
pub trait DataSourceLookup: Send + Sync {
    fn get(&self, id: &str) -> Option<Arc<DataSource>>;
}

/// In-memory owner of live data-source instances.
#[derive(Default)]
pub struct DataSourceRegistry {
    entries: RwLock<BTreeMap<String, Arc<DataSource>>>,
}

impl DataSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) one data source and returns the shared handle.
    pub fn set(&self, data_source: DataSource) -> Arc<DataSource> {
        let shared = Arc::new(data_source);
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(shared.id.clone(), Arc::clone(&shared));
        shared
    }

    pub fn remove(&self, id: &str) -> Option<Arc<DataSource>> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns sorted registered ids.
    pub fn ids(&self) -> Vec<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect()
    }
}

impl DataSourceLookup for DataSourceRegistry {
    fn get(&self, id: &str) -> Option<Arc<DataSource>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }
}
