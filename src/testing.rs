//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation.

#![doc(hidden)]

use crate::config::Config;
use crate::context::SearchContext;
use crate::store::DocumentStore;
use crate::types::Document;

/// Create a document with a synthetic source.
pub fn make_doc(title: &str, content: &str) -> Document {
    Document::new(title, content, format!("Source {}", title))
}

/// The two-document corpus used in most examples.
pub fn fox_corpus() -> Vec<Document> {
    vec![
        Document::new("A", "the quick fox", "S1"),
        Document::new("B", "the slow fox", "S2"),
    ]
}

/// Four documents with distinct relevance for "fox": B(3), D(2), A(1), C(1).
pub fn ranking_corpus() -> Vec<Document> {
    vec![
        make_doc("A", "a fox"),
        make_doc("B", "fox fox fox"),
        make_doc("C", "one fox here"),
        make_doc("D", "fox and fox"),
    ]
}

/// Build a context over `docs` with default configuration.
pub fn context_of(docs: Vec<Document>) -> SearchContext {
    SearchContext::new(DocumentStore::from_documents(docs), Config::default())
}
