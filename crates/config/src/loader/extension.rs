//! Extension points of the loader.
//!
//! Responsibilities:
//! - `ConfigProcessor`: handler for elements bound to a foreign namespace.
//! - `ProcessorRegistry`: namespace-URI to processor map, built once at startup.
//! - `PropertyProcessor`: hook that may rewrite a property value before it is stored.
//!
//! Does NOT handle:
//! - Discovering processors; the host registers them explicitly.
//!
//! Invariants:
//! - The registry is read-only during a load.
//! - A processor consumes at most the element it was handed; content it leaves
//!   unread is skipped by the loader.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::context::LoadContext;
use super::error::ConfigError;
use crate::xml::XmlReader;

/// Handler for config elements in a namespace other than the framework's.
pub trait ConfigProcessor: Send + Sync {
    /// Namespace URI whose elements this processor handles.
    fn namespace_uri(&self) -> &str;

    /// Process the element under the cursor.
    fn process_element(
        &self,
        context: &mut LoadContext<'_>,
        reader: &mut XmlReader,
    ) -> Result<(), ConfigError>;
}

/// Extension processors keyed by namespace URI.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: HashMap<String, Arc<dyn ConfigProcessor>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a processor under its namespace URI, replacing any previous one.
    pub fn register<P: ConfigProcessor + 'static>(mut self, processor: P) -> Self {
        let namespace = processor.namespace_uri().to_string();
        if self
            .processors
            .insert(namespace.clone(), Arc::new(processor))
            .is_some()
        {
            tracing::warn!("Config processor for namespace '{}' replaced", namespace);
        }
        self
    }

    pub fn get(&self, namespace: &str) -> Option<&Arc<dyn ConfigProcessor>> {
        self.processors.get(namespace)
    }

    pub fn is_empty(&self) -> bool {
        self.processors.is_empty()
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut namespaces: Vec<_> = self.processors.keys().collect();
        namespaces.sort();
        f.debug_struct("ProcessorRegistry")
            .field("namespaces", &namespaces)
            .finish()
    }
}

/// Hook that may replace a property value before it is stored.
pub trait PropertyProcessor: Send + Sync {
    /// Return `Some(new_value)` to replace `value`, `None` to keep it.
    fn process(&self, key: &str, value: &str) -> Option<String>;
}

impl<F> PropertyProcessor for F
where
    F: Fn(&str, &str) -> Option<String> + Send + Sync,
{
    fn process(&self, key: &str, value: &str) -> Option<String> {
        self(key, value)
    }
}
