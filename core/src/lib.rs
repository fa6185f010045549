pub mod documents;
pub mod engine;
pub mod error;
pub mod scoring;
pub mod store;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub use documents::{DocumentLoader, FileEnumerator, FsDocumentLoader, ParseMode, WalkDirEnumerator};
pub use engine::{IndexReport, SearchEngine};
pub use error::EngineError;
pub use store::{IndexStore, StoreError, DEFAULT_INDEX_FILE};

/// Occurrence count of each term within a single document.
pub type TermCounts = HashMap<String, u32>;

/// The persisted corpus: document key (its source path) to that document's term counts.
///
/// Serialized as a plain two-level JSON object, e.g. `{"files/a.xml": {"CAT": 2}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorpusIndex {
    pub docs: HashMap<String, TermCounts>,
}

impl CorpusIndex {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, doc: impl Into<String>, counts: TermCounts) {
        self.docs.insert(doc.into(), counts);
    }

    pub fn get(&self, doc: &str) -> Option<&TermCounts> { self.docs.get(doc) }

    pub fn len(&self) -> usize { self.docs.len() }

    pub fn is_empty(&self) -> bool { self.docs.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TermCounts)> { self.docs.iter() }

    /// Number of distinct terms across all documents.
    pub fn vocabulary_size(&self) -> usize {
        let mut terms: Vec<&str> = self.docs.values().flat_map(|c| c.keys().map(String::as_str)).collect();
        terms.sort_unstable();
        terms.dedup();
        terms.len()
    }
}

impl FromIterator<(String, TermCounts)> for CorpusIndex {
    fn from_iter<I: IntoIterator<Item = (String, TermCounts)>>(iter: I) -> Self {
        Self { docs: iter.into_iter().collect() }
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    pub doc: String,
    pub score: f32,
}
