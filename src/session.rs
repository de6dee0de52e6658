// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The search session: what the page holds between events.
//!
//! A session owns the current [`SearchContext`] and the most recently published
//! result set. Searches run in two steps so the caller may run the CPU-bound part
//! wherever it likes (a worker, a delayed timer, another thread):
//!
//! ```text
//! begin(query) ──▶ PendingSearch ──run()──▶ CompletedSearch ──publish()──▶ latest
//!     │ generation = n                                          │ accepted iff n is
//!     ▼                                                         ▼ still the newest
//! ```
//!
//! **Last-started-wins.** Every `begin` takes a new generation number. A completed
//! search is published only if no search started after it and no reload happened
//! since, so a slow stale search can never replace a newer one's output.
//!
//! Reload is wholesale: a new context replaces the old one. In-flight searches keep
//! their `Arc` of the old context and finish safely, but can no longer publish.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::chat::ExplainRequest;
use crate::config::{Config, SearchOptions};
use crate::context::SearchContext;
use crate::error::{ChatError, LoadError, QueryError};
use crate::excerpt::Markup;
use crate::search::Query;
use crate::store::DocumentSource;
use crate::types::SearchResult;

/// A validated search bound to a context snapshot, not yet evaluated.
#[derive(Debug, Clone)]
pub struct PendingSearch {
    generation: u64,
    query: Query,
    context: Arc<SearchContext>,
}

impl PendingSearch {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Evaluate. Pure with respect to the session: nothing is published yet.
    pub fn run(self) -> CompletedSearch {
        let results = self.context.run(&self.query);
        CompletedSearch {
            generation: self.generation,
            query: self.query,
            results,
        }
    }
}

/// An evaluated search waiting to be published.
#[derive(Debug, Clone)]
pub struct CompletedSearch {
    pub generation: u64,
    pub query: Query,
    pub results: Vec<SearchResult>,
}

impl CompletedSearch {
    /// The stats line above the results.
    pub fn summary<M: Markup + ?Sized>(&self, markup: &M) -> String {
        summary_line(self.results.len(), self.query.text(), markup)
    }
}

/// Current context plus the latest published result set.
#[derive(Debug)]
pub struct SearchSession {
    context: RwLock<Arc<SearchContext>>,
    latest: RwLock<Option<Arc<CompletedSearch>>>,
    /// Highest generation handed out by `begin` or consumed by `reload`.
    started: AtomicU64,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SearchContext::default())
    }
}

impl SearchSession {
    pub fn new(context: SearchContext) -> Self {
        Self {
            context: RwLock::new(Arc::new(context)),
            latest: RwLock::new(None),
            started: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current context.
    pub fn context(&self) -> Arc<SearchContext> {
        Arc::clone(&self.context.read())
    }

    /// Validate `raw` and reserve a generation for it.
    ///
    /// Empty queries are rejected before the store is checked, so an empty query on
    /// an empty store reports the query.
    pub fn begin(&self, raw: &str, options: SearchOptions) -> Result<PendingSearch, QueryError> {
        let query = Query::parse(raw, options)?;

        // Snapshot and generation under one read lock; reload bumps the
        // generation under the write lock.
        let slot = self.context.read();
        if slot.store().is_empty() {
            return Err(QueryError::NoDocuments);
        }
        let context = Arc::clone(&slot);
        let generation = self.started.fetch_add(1, Ordering::SeqCst) + 1;
        drop(slot);

        Ok(PendingSearch {
            generation,
            query,
            context,
        })
    }

    /// Publish `completed` if it is still the newest search.
    ///
    /// Returns the published set, or `None` when a newer search or a reload
    /// superseded it. The caller simply doesn't render a rejected search.
    pub fn publish(&self, completed: CompletedSearch) -> Option<Arc<CompletedSearch>> {
        let mut latest = self.latest.write();
        if completed.generation != self.started.load(Ordering::SeqCst) {
            tracing::debug!(
                generation = completed.generation,
                newest = self.started.load(Ordering::SeqCst),
                "discarding superseded search"
            );
            return None;
        }
        let completed = Arc::new(completed);
        *latest = Some(Arc::clone(&completed));
        Some(completed)
    }

    /// `begin`, `run` and `publish` in one call, for callers without a worker.
    pub fn search(&self, raw: &str, options: SearchOptions) -> Result<Option<Arc<CompletedSearch>>, QueryError> {
        let pending = self.begin(raw, options)?;
        Ok(self.publish(pending.run()))
    }

    /// The latest published result set.
    pub fn current(&self) -> Option<Arc<CompletedSearch>> {
        self.latest.read().clone()
    }

    /// A result of the latest published set, by its rank position.
    pub fn result(&self, position: usize) -> Option<SearchResult> {
        self.latest
            .read()
            .as_ref()
            .and_then(|completed| completed.results.get(position).cloned())
    }

    /// Explain request for a result of the latest published set.
    pub fn explain_request(&self, position: usize) -> Result<ExplainRequest, ChatError> {
        self.result(position)
            .map(|result| ExplainRequest::for_document(&result.document))
            .ok_or(ChatError::NoSuchResult(position))
    }

    /// Replace the context with a fresh load of `source`.
    ///
    /// Failing soft like the first load: on error the session holds an empty store
    /// and the error is returned as a warning. Either way the published results and
    /// every in-flight search are invalidated.
    pub fn reload(&self, source: &dyn DocumentSource) -> Option<LoadError> {
        let config: Config = self.context.read().config().clone();
        let (context, warning) = SearchContext::load(source, config);

        let mut latest = self.latest.write();
        let mut slot = self.context.write();
        *slot = Arc::new(context);
        self.started.fetch_add(1, Ordering::SeqCst);
        drop(slot);
        *latest = None;
        warning
    }

    /// Generation of the newest search started (or reload performed).
    pub fn latest_generation(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }
}

/// `Found N document(s) matching "<query>"`, or the no-results line.
///
/// The query passes through `markup` so the HTML rendering is neutralized.
pub fn summary_line<M: Markup + ?Sized>(count: usize, query: &str, markup: &M) -> String {
    let mut out = String::new();
    if count == 0 {
        out.push_str("No results found for \"");
    } else {
        out.push_str(&format!(
            "Found {} document{} matching \"",
            count,
            if count == 1 { "" } else { "s" }
        ));
    }
    markup.push_literal(&mut out, query);
    out.push('"');
    out
}

/// `1 match`, `N matches`.
pub fn match_label(relevance: usize) -> String {
    format!("{} match{}", relevance, if relevance == 1 { "" } else { "es" })
}
