//! Events emitted by state transitions for external observers.

use serde::{Deserialize, Serialize};

/// A typed event with string attributes.
///
/// Events are collected on the apply [`Context`](crate::Context) and drained
/// by the host at block boundaries for delivery to external collaborators
/// (indexers, price caches, relayers).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event kind, e.g. `resolve`.
    pub kind: String,
    /// Ordered key-value attributes.
    pub attributes: Vec<(String, String)>,
}

impl Event {
    /// Creates an event with no attributes.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    /// Appends an attribute.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Value of the first attribute with the given key.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
