//! Inverted index construction.
//!
//! Maps every lowercased whitespace-delimited token of `title content source` to the
//! set of document positions containing it. No stemming, no stop words, and
//! punctuation stays attached to its token (`"fox."` and `"fox"` are different keys).
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **POSTINGS_UNIQUE**: a position appears at most once per token
//! 2. **POSTINGS_SORTED**: each posting set iterates in ascending position order
//! 3. **NON_EMPTY**: every token has at least one posting
//! 4. **POSTINGS_IN_BOUNDS**: every position is `< total_docs`
//!
//! The index is an accelerator. The evaluator must produce the same results with
//! or without it, so [`InvertedIndex::candidates`] only ever narrows to a superset
//! of the true matches.

use crate::types::Document;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// Token -> document positions.
#[derive(Debug, Clone, Default)]
pub struct InvertedIndex {
    pub terms: HashMap<String, BTreeSet<usize>>,
    pub total_docs: usize,
}

/// Tokenize the indexed text of one document.
///
/// Lowercase first, then split: the keys are lowercase tokens, not tokens that
/// happened to be lowercase.
pub fn tokenize(doc: &Document) -> Vec<String> {
    doc.indexed_text()
        .to_lowercase()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Build an inverted index from documents.
///
/// Creates a map from tokens to posting sets, enabling O(1) token lookup.
pub fn build_inverted_index(docs: &[Arc<Document>]) -> InvertedIndex {
    let mut terms: HashMap<String, BTreeSet<usize>> = HashMap::new();

    for (doc_id, doc) in docs.iter().enumerate() {
        for token in tokenize(doc) {
            // INVARIANT: POSTINGS_UNIQUE (set insert is idempotent)
            terms.entry(token).or_default().insert(doc_id);
        }
    }

    let index = InvertedIndex {
        terms,
        total_docs: docs.len(),
    };
    tracing::debug!(
        docs = index.total_docs,
        tokens = index.terms.len(),
        "built inverted index"
    );
    index
}

/// Build an inverted index using parallel map-reduce.
///
/// 1. **Map phase**: parallel tokenization (one task per document)
/// 2. **Reduce phase**: merge per-document token sets into the global index
///
/// Produces exactly the same index as [`build_inverted_index`].
#[cfg(feature = "parallel")]
pub fn build_inverted_index_parallel(docs: &[Arc<Document>]) -> InvertedIndex {
    // MAP PHASE: parallel tokenization
    let per_doc: Vec<(usize, Vec<String>)> = docs
        .par_iter()
        .enumerate()
        .map(|(doc_id, doc)| {
            let mut tokens = tokenize(doc);
            tokens.sort_unstable();
            tokens.dedup();
            (doc_id, tokens)
        })
        .collect();

    // REDUCE PHASE: sequential merge keeps posting sets deterministic
    let mut terms: HashMap<String, BTreeSet<usize>> = HashMap::new();
    for (doc_id, tokens) in per_doc {
        for token in tokens {
            terms.entry(token).or_default().insert(doc_id);
        }
    }

    let index = InvertedIndex {
        terms,
        total_docs: docs.len(),
    };
    tracing::debug!(
        docs = index.total_docs,
        tokens = index.terms.len(),
        "built inverted index (parallel)"
    );
    index
}

impl InvertedIndex {
    /// Number of distinct tokens.
    pub fn token_count(&self) -> usize {
        self.terms.len()
    }

    /// Positions of documents containing exactly this token (lowercased first).
    pub fn lookup(&self, token: &str) -> Vec<usize> {
        self.terms
            .get(&token.to_lowercase())
            .map(|postings| postings.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Positions of documents with a token containing `fragment` as a substring.
    ///
    /// `fragment` must already be lowercase and free of whitespace.
    fn containing(&self, fragment: &str) -> BTreeSet<usize> {
        self.terms
            .iter()
            .filter(|(token, _)| token.contains(fragment))
            .flat_map(|(_, postings)| postings.iter().copied())
            .collect()
    }

    /// Candidate positions for a query whose every piece must occur somewhere.
    ///
    /// A whitespace-free piece that occurs in a document's title or content lies
    /// inside one whitespace-delimited token of it, so the intersection over pieces
    /// of "documents with a token containing the piece" is a superset of the real
    /// matches. That only holds when lowercasing is plain ASCII folding on both
    /// sides: Unicode case folding and `to_lowercase` disagree on a handful of
    /// characters (long s, Kelvin sign, final sigma). Returns `None` when pruning
    /// would not be exact, and the caller scans everything.
    pub fn candidates(&self, pieces: &[&str], corpus_is_ascii: bool) -> Option<BTreeSet<usize>> {
        if !corpus_is_ascii || pieces.is_empty() || !pieces.iter().all(|p| p.is_ascii()) {
            return None;
        }

        let mut acc: Option<BTreeSet<usize>> = None;
        for piece in pieces {
            let found = self.containing(&piece.to_ascii_lowercase());
            let next = match acc {
                None => found,
                Some(prev) => prev.intersection(&found).copied().collect(),
            };
            if next.is_empty() {
                return Some(next);
            }
            acc = Some(next);
        }
        acc
    }
}
