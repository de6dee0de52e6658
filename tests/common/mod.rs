//! Shared test utilities and fixtures.

#![allow(dead_code)]

use docket::{Config, Document, DocumentStore, FileSource, SearchContext, SearchOptions};

// Re-export canonical test utilities from docket::testing
pub use docket::testing::{context_of, fox_corpus, make_doc, ranking_corpus};

/// The court-document fixture shipped with the repo.
pub const FIXTURE: &str = "data/fixtures/documents.json";

/// Number of documents in the fixture.
pub const FIXTURE_DOCS: usize = 5;

/// Load the fixture strictly; tests should fail loudly if it is broken.
pub fn fixture_store() -> DocumentStore {
    DocumentStore::from_path(FIXTURE.as_ref()).expect("fixture should parse")
}

/// Context over the fixture with default configuration.
pub fn fixture_context() -> SearchContext {
    let (ctx, warning) = SearchContext::load(&FileSource::new(FIXTURE), Config::default());
    assert!(warning.is_none(), "fixture failed to load: {:?}", warning);
    ctx
}

pub fn ci() -> SearchOptions {
    SearchOptions {
        case_insensitive: true,
        exact_match: false,
    }
}

pub fn cs() -> SearchOptions {
    SearchOptions {
        case_insensitive: false,
        exact_match: false,
    }
}

pub fn phrase() -> SearchOptions {
    SearchOptions {
        case_insensitive: true,
        exact_match: true,
    }
}

/// Titles of results, in rank order.
pub fn titles(results: &[docket::SearchResult]) -> Vec<String> {
    results.iter().map(|r| r.document.title.clone()).collect()
}

/// Build documents from `(title, content)` pairs.
pub fn docs(items: &[(&str, &str)]) -> Vec<Document> {
    items.iter().map(|(t, c)| make_doc(t, c)).collect()
}
