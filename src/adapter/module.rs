//! A loaded set of adapter functions

use super::function::AdapterFunction;
use super::validate::ValidationError;
use std::collections::HashMap;
use std::sync::Arc;

/// All adapters of one module, with their export names resolved.
///
/// Adapters are held behind `Arc` so instances and concurrent callers can share
/// them without copying.
#[derive(Debug, Clone, Default)]
pub struct AdapterModule {
    pub name: Option<String>,
    adapters: Vec<Arc<AdapterFunction>>,
    exports: HashMap<String, usize>,
}

impl AdapterModule {
    pub fn new(name: Option<String>) -> Self {
        AdapterModule {
            name,
            ..Default::default()
        }
    }

    /// Add an adapter, registering its export name if it has one.
    ///
    /// # Errors
    /// If another adapter already uses the same export name.
    pub fn add(&mut self, adapter: AdapterFunction) -> Result<usize, ValidationError> {
        let idx = self.adapters.len();
        if let Some(name) = adapter.name() {
            if self.exports.contains_key(name) {
                return Err(ValidationError::DuplicateExport(name.to_string()));
            }
            self.exports.insert(name.to_string(), idx);
        }
        self.adapters.push(Arc::new(adapter));
        Ok(idx)
    }

    pub fn adapters(&self) -> &[Arc<AdapterFunction>] {
        &self.adapters
    }

    /// Look up an exported adapter by name.
    pub fn export(&self, name: &str) -> Option<&Arc<AdapterFunction>> {
        self.exports.get(name).map(|&idx| &self.adapters[idx])
    }

    /// Export names in definition order.
    pub fn export_names(&self) -> Vec<&str> {
        self.adapters.iter().filter_map(|a| a.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}
