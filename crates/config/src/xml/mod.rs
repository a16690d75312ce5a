//! Streaming XML cursor used by the loader.
//!
//! Responsibilities:
//! - Expose a pull cursor over one document: current event, advance, skip a
//!   subtree, read element text, iterate immediate children.
//! - Resolve element namespaces while streaming.
//!
//! Does NOT handle:
//! - Placeholder substitution (the loader resolves the raw values it reads).
//! - Building a document tree; content is never held beyond the current event.
//!
//! Invariants:
//! - Empty elements (`<a/>`) produce a start event followed by an end event.
//! - Comments, processing instructions and whitespace-only text are never surfaced.

mod reader;

pub use reader::XmlReader;

/// An element start tag, owned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    position: u64,
}

impl XmlElement {
    /// Namespace URI the element is bound to, `None` when unqualified.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Raw (unresolved) attribute value by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Byte offset just past the start tag; stable across reads of the same document.
    pub fn position(&self) -> u64 {
        self.position
    }
}

/// The event under the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    /// Nothing has been read yet.
    StartDocument,
    Start(XmlElement),
    End,
    Text(String),
    Eof,
}
