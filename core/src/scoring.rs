//! Term frequency, inverse document frequency, and TF-IDF ranking scores.
//!
//! Both denominators are floored at 1: an empty document has tf 0 everywhere, and
//! a term absent from the corpus gets `log10(N)` rather than an infinite idf.

use crate::{CorpusIndex, TermCounts};

/// Count occurrences of each distinct token.
pub fn term_frequencies<S: AsRef<str>>(tokens: &[S]) -> TermCounts {
    let mut counts = TermCounts::new();
    for token in tokens {
        *counts.entry(token.as_ref().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Total number of tokens a document held.
pub fn document_length(counts: &TermCounts) -> u64 {
    counts.values().map(|&c| u64::from(c)).sum()
}

pub fn tf(term: &str, counts: &TermCounts) -> f32 {
    match counts.get(term) {
        Some(&count) => count as f32 / document_length(counts).max(1) as f32,
        None => 0.0,
    }
}

/// Number of documents in the corpus containing `term`.
pub fn document_frequency(term: &str, corpus: &CorpusIndex) -> usize {
    corpus.iter().filter(|(_, counts)| counts.contains_key(term)).count()
}

/// `log10(num_docs / max(1, df))`.
#[inline]
pub fn idf_from_df(num_docs: usize, df: usize) -> f32 {
    (num_docs as f32 / df.max(1) as f32).log10()
}

pub fn idf(term: &str, corpus: &CorpusIndex) -> f32 {
    idf_from_df(corpus.len(), document_frequency(term, corpus))
}

pub fn tf_idf(term: &str, counts: &TermCounts, corpus: &CorpusIndex) -> f32 {
    tf(term, counts) * idf(term, corpus)
}

/// Sum of tf-idf over every query token, duplicates included.
pub fn score<S: AsRef<str>>(query: &[S], counts: &TermCounts, corpus: &CorpusIndex) -> f32 {
    query.iter().map(|t| tf_idf(t.as_ref(), counts, corpus)).sum()
}

/// A document's counts with its length computed once.
#[derive(Debug, Clone, Copy)]
pub struct DocumentStats<'a> {
    pub counts: &'a TermCounts,
    pub length: u64,
}

impl<'a> DocumentStats<'a> {
    pub fn new(counts: &'a TermCounts) -> Self {
        Self { counts, length: document_length(counts) }
    }

    /// Same value as [`tf`], without re-summing the document.
    pub fn tf(&self, term: &str) -> f32 {
        match self.counts.get(term) {
            Some(&count) => count as f32 / self.length.max(1) as f32,
            None => 0.0,
        }
    }
}
