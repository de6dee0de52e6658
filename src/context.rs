// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search context: one load's store, its index, and the configuration.
//!
//! Everything that used to be ambient page state lives here and is passed
//! explicitly. A context is immutable once built; reloading builds a new one.

use serde::Serialize;

use crate::chat;
use crate::config::{Config, SearchOptions};
use crate::error::{LoadError, QueryError};
use crate::excerpt::{self, Html, Markup};
#[cfg(feature = "parallel")]
use crate::inverted::build_inverted_index_parallel;
use crate::inverted::{build_inverted_index, InvertedIndex};
use crate::search::{search_positions, Query};
use crate::store::{self, DocumentSource, DocumentStore};
use crate::types::SearchResult;

/// Above this many documents the index is built with the parallel map-reduce.
#[cfg(feature = "parallel")]
const PARALLEL_INDEX_THRESHOLD: usize = 100;

/// Store + index + config for one load.
#[derive(Debug, Clone, Default)]
pub struct SearchContext {
    store: DocumentStore,
    index: InvertedIndex,
    config: Config,
}

/// Counts shown in the page header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStats {
    pub documents: usize,
    pub tokens: usize,
    /// Characters of content across all documents.
    pub total_chars: usize,
    /// `total_chars / documents`, rounded down; zero for an empty store.
    pub average_chars: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl StoreStats {
    /// Header text for the last-updated slot.
    pub fn last_updated_label(&self) -> &str {
        self.last_updated.as_deref().unwrap_or("No data loaded")
    }
}

impl SearchContext {
    /// Build the index for `store`. Runs synchronously after every load.
    pub fn new(store: DocumentStore, config: Config) -> Self {
        #[cfg(feature = "parallel")]
        let index = if store.len() >= PARALLEL_INDEX_THRESHOLD {
            build_inverted_index_parallel(store.documents())
        } else {
            build_inverted_index(store.documents())
        };
        #[cfg(not(feature = "parallel"))]
        let index = build_inverted_index(store.documents());

        Self {
            store,
            index,
            config,
        }
    }

    /// Load from `source`, failing soft: on error the context is empty.
    pub fn load(source: &dyn DocumentSource, config: Config) -> (Self, Option<LoadError>) {
        let loaded = store::load(source);
        (Self::new(loaded.store, config), loaded.warning)
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> StoreStats {
        let total_chars = self.store.total_chars();
        StoreStats {
            documents: self.store.len(),
            tokens: self.index.token_count(),
            total_chars,
            average_chars: total_chars.checked_div(self.store.len()).unwrap_or(0),
            last_updated: self.store.last_updated().map(str::to_string),
        }
    }

    /// Validate `raw` and search with `options`.
    pub fn search(&self, raw: &str, options: SearchOptions) -> Result<Vec<SearchResult>, QueryError> {
        let query = Query::parse(raw, options)?;
        Ok(self.run(&query))
    }

    /// Evaluate an already-validated query.
    ///
    /// Prunes with the inverted index when that is exact, otherwise scans every
    /// document. Either way the result equals [`crate::search::search`].
    pub fn run(&self, query: &Query) -> Vec<SearchResult> {
        let docs = self.store.documents();

        let pieces = query.pieces();
        let positions: Vec<usize> = match self.index.candidates(&pieces, self.store.is_ascii()) {
            Some(candidates) => candidates.into_iter().collect(),
            None => (0..docs.len()).collect(),
        };

        let results = search_positions(docs, &positions, query);
        tracing::debug!(
            query = query.text(),
            mode = ?query.mode(),
            scanned = positions.len(),
            results = results.len(),
            "search complete"
        );
        results
    }

    /// Excerpt for a result, windowed around its first match, as HTML.
    pub fn excerpt(&self, result: &SearchResult, query: &str) -> String {
        self.excerpt_with(result, query, &Html)
    }

    pub fn excerpt_with<M: Markup + ?Sized>(&self, result: &SearchResult, query: &str, markup: &M) -> String {
        excerpt::excerpt(
            &result.document.content,
            query,
            result.anchor(),
            &self.config.excerpt,
            markup,
        )
    }

    /// Context block for the chat relay, built from a fresh search for `message`.
    pub fn context_block(&self, message: &str) -> String {
        chat::context_block(self, message, &self.config.context)
    }
}
