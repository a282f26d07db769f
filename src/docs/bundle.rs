use serde::{Deserialize, Serialize};

/// Named documents in insertion order.
///
/// Inserting an existing key replaces its text but keeps its position, so
/// index pages list documents in the order they were first generated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedDocs {
    entries: Vec<(String, String)>,
}

impl OrderedDocs {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the document for `key`
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let key = key.into();
        let text = text.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = text,
            None => self.entries.push((key, text)),
        }
    }

    /// Text stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, text)| text.as_str())
    }

    /// Keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// `(key, text)` pairs in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t.as_str()))
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when there are no documents
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OrderedDocs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut docs = Self::new();
        for (k, v) in iter {
            docs.insert(k, v);
        }
        docs
    }
}

/// Every document generated for one run.
///
/// Keys of the map-valued sections are display names and source paths as
/// produced; the publisher sanitizes them when writing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentationBundle {
    /// Top-level README
    pub main_readme: String,
    /// `docs/installation.md`
    pub installation_guide: String,
    /// `docs/scaling.md`
    pub scaling_guide: String,
    /// `docs/troubleshooting.md`
    pub troubleshooting_guide: String,
    /// Workflow name to document
    pub workflow_docs: OrderedDocs,
    /// Output file type to document
    pub output_docs: OrderedDocs,
    /// Source path to document
    pub code_docs: OrderedDocs,
}

impl DocumentationBundle {
    /// Total number of markdown documents, index pages excluded
    pub fn document_count(&self) -> usize {
        4 + self.workflow_docs.len() + self.output_docs.len() + self.code_docs.len()
    }
}
