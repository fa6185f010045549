use crate::documents::{DocumentLoader, FileEnumerator, FsDocumentLoader, ParseMode, WalkDirEnumerator};
use crate::error::EngineError;
use crate::scoring::{document_frequency, idf_from_df, term_frequencies, DocumentStats};
use crate::store::IndexStore;
use crate::tokenizer::tokenize;
use crate::{CorpusIndex, SearchHit, TermCounts};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Outcome of a full index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexReport {
    pub num_docs: usize,
    /// Documents that failed to load and were indexed as empty.
    pub unreadable_docs: usize,
    /// Documents left out because their path cannot serve as a key.
    pub skipped_docs: usize,
    pub num_terms: usize,
    pub index_path: PathBuf,
}

/// Builds the corpus index from a directory tree and ranks documents against queries.
///
/// Build and query share nothing in memory; every search reloads the persisted index.
#[derive(Debug, Clone)]
pub struct SearchEngine<E = WalkDirEnumerator, L = FsDocumentLoader> {
    store: IndexStore,
    enumerator: E,
    loader: L,
    mode: ParseMode,
}

impl SearchEngine {
    /// Engine over the local filesystem persisting to `store`.
    pub fn new(store: IndexStore, mode: ParseMode) -> Self {
        Self::with_collaborators(store, WalkDirEnumerator, FsDocumentLoader, mode)
    }
}

impl<E: FileEnumerator, L: DocumentLoader> SearchEngine<E, L> {
    pub fn with_collaborators(store: IndexStore, enumerator: E, loader: L, mode: ParseMode) -> Self {
        Self { store, enumerator, loader, mode }
    }

    pub fn store(&self) -> &IndexStore { &self.store }

    /// Rebuild the whole index from the files under `root` and persist it.
    ///
    /// An invalid root or an unreadable document degrades (to zero documents or an
    /// empty term map respectively); only a failure to persist is returned.
    pub fn index<P: AsRef<Path>>(&self, root: P) -> Result<IndexReport, EngineError> {
        let root = root.as_ref();
        tracing::info!(root = %root.display(), mode = ?self.mode, "indexing");

        let files = match self.enumerator.list_files(root) {
            Ok(files) => files,
            Err(err) => {
                tracing::warn!(error = %err, "indexing zero documents");
                Vec::new()
            }
        };

        let mut corpus = CorpusIndex::new();
        let mut unreadable_docs = 0;
        let mut skipped_docs = 0;
        for path in files {
            // Lossy conversion could map two paths to one key.
            let Some(key) = path.to_str().map(str::to_owned) else {
                tracing::warn!(path = %path.display(), "skipping document whose path is not valid UTF-8");
                skipped_docs += 1;
                continue;
            };
            let counts = match self.loader.load(&path, self.mode) {
                Ok(text) => term_frequencies(&tokenize(&text)),
                Err(err) => {
                    tracing::warn!(error = %err, "document indexed as empty");
                    unreadable_docs += 1;
                    TermCounts::new()
                }
            };
            corpus.insert(key, counts);
        }

        self.store.save(&corpus).map_err(EngineError::Persist)?;

        let report = IndexReport {
            num_docs: corpus.len(),
            unreadable_docs,
            skipped_docs,
            num_terms: corpus.vocabulary_size(),
            index_path: self.store.path().to_path_buf(),
        };
        tracing::info!(num_docs = report.num_docs, num_terms = report.num_terms, unreadable_docs, skipped_docs, "index build complete");
        Ok(report)
    }

    /// Score every indexed document against `query`, best first.
    ///
    /// Equal scores are ordered by ascending document key.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let corpus = match self.store.try_load() {
            Ok(corpus) => corpus,
            Err(err) => {
                let err = EngineError::IndexUnavailable(err);
                tracing::warn!(error = %err, "searching an empty corpus");
                CorpusIndex::new()
            }
        };
        rank(&tokenize(query), &corpus)
    }

    /// [`search`](Self::search) truncated to the best `k` hits.
    pub fn search_top(&self, query: &str, k: usize) -> Vec<SearchHit> {
        let mut hits = self.search(query);
        hits.truncate(k);
        hits
    }
}

/// Rank all documents of `corpus` by their score for the query tokens.
pub fn rank<S: AsRef<str>>(query: &[S], corpus: &CorpusIndex) -> Vec<SearchHit> {
    let num_docs = corpus.len();
    let mut idfs: HashMap<&str, f32> = HashMap::new();
    for term in query {
        let term = term.as_ref();
        if !idfs.contains_key(term) {
            idfs.insert(term, idf_from_df(num_docs, document_frequency(term, corpus)));
        }
    }

    let mut hits: Vec<SearchHit> = corpus
        .iter()
        .map(|(doc, counts)| {
            let stats = DocumentStats::new(counts);
            let score = query.iter().map(|t| stats.tf(t.as_ref()) * idfs[t.as_ref()]).sum();
            SearchHit { doc: doc.clone(), score }
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.doc.cmp(&b.doc))
    });
    hits
}
