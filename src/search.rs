// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Query evaluation and ranking.
//!
//! Two mutually exclusive match modes:
//!
//! - **Exact phrase**: the trimmed query is one literal. Every non-overlapping
//!   occurrence in `content` is a match; the title is not searched.
//! - **All terms**: the query splits on whitespace. A document qualifies when every
//!   term occurs in its content *or* its title (terms may be satisfied by different
//!   fields). Its matches are then every occurrence of every term in `content`,
//!   concatenated per term in query order.
//!
//! Relevance is the raw match count. Results sort by relevance descending with a
//! stable sort, so equal relevance keeps store order.
//!
//! Query text is never syntax. Each term or phrase is escaped and compiled as a
//! literal, with Unicode case folding when the search is case-insensitive.
//!
//! # INVARIANTS
//!
//! 1. **NO_ZERO_RELEVANCE**: a result always has at least one match
//! 2. **RANK_MONOTONE**: relevance is non-increasing across the result sequence
//! 3. **RANK_STABLE**: equal relevance preserves store order
//! 4. **OFFSETS_IN_CONTENT**: every match offset is a character offset inside `content`

use crate::config::SearchOptions;
use crate::contracts::check_results_well_formed;
use crate::error::QueryError;
use crate::types::{DocId, Document, SearchResult};
use crate::utils::{byte_offsets_to_chars, split_terms};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use regex::{Regex, RegexBuilder};
use std::sync::Arc;

/// Below this many documents the parallel scan is not worth its overhead.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 256;

/// Which matching rule a query uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    ExactPhrase,
    AllTerms,
}

/// One compiled literal: a term in all-terms mode, or the whole phrase.
#[derive(Debug, Clone)]
struct Literal {
    pattern: Regex,
}

impl Literal {
    fn compile(text: &str, case_insensitive: bool) -> Result<Self, QueryError> {
        let pattern = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(case_insensitive)
            .build()?;
        Ok(Self { pattern })
    }

    #[inline]
    fn occurs_in(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// Character offsets of every non-overlapping occurrence, left to right.
    fn offsets_in(&self, text: &str) -> Vec<usize> {
        byte_offsets_to_chars(text, self.pattern.find_iter(text).map(|m| m.start()))
    }
}

/// A validated, compiled query.
///
/// Construction is the validation step: an empty or whitespace-only query never
/// becomes a `Query`, so the evaluator never sees one.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    options: SearchOptions,
    literals: Vec<Literal>,
}

impl Query {
    /// Trim, validate and compile a query.
    pub fn parse(raw: &str, options: SearchOptions) -> Result<Self, QueryError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(QueryError::Empty);
        }

        let literals = if options.exact_match {
            vec![Literal::compile(text, options.case_insensitive)?]
        } else {
            split_terms(text)
                .into_iter()
                .map(|term| Literal::compile(term, options.case_insensitive))
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Self {
            text: text.to_string(),
            options,
            literals,
        })
    }

    /// The trimmed query text.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    pub fn mode(&self) -> MatchMode {
        if self.options.exact_match {
            MatchMode::ExactPhrase
        } else {
            MatchMode::AllTerms
        }
    }

    /// Whitespace-free pieces that must each occur in any matching document.
    ///
    /// In all-terms mode these are the terms; for a phrase, its words.
    pub fn pieces(&self) -> Vec<&str> {
        split_terms(&self.text)
    }

    /// Match offsets for one document, or `None` if it does not qualify.
    fn evaluate(&self, doc: &Document) -> Option<Vec<usize>> {
        let matches = match self.mode() {
            MatchMode::ExactPhrase => self.literals[0].offsets_in(&doc.content),
            MatchMode::AllTerms => {
                let qualifies = self
                    .literals
                    .iter()
                    .all(|lit| lit.occurs_in(&doc.content) || lit.occurs_in(&doc.title));
                if !qualifies {
                    return None;
                }
                self.literals
                    .iter()
                    .flat_map(|lit| lit.offsets_in(&doc.content))
                    .collect()
            }
        };

        // INVARIANT: NO_ZERO_RELEVANCE
        // A title-only match qualifies the document but records no content offsets.
        if matches.is_empty() {
            None
        } else {
            Some(matches)
        }
    }
}

fn evaluate_at(docs: &[Arc<Document>], position: usize, query: &Query) -> Option<SearchResult> {
    let doc = docs.get(position)?;
    let matches = query.evaluate(doc)?;
    let doc_id = DocId::new(position, docs.len())?;
    Some(SearchResult::new(doc_id, Arc::clone(doc), matches))
}

/// Evaluate a query against the documents at `positions` (ascending), then rank.
///
/// Positions must be ascending so that the stable sort preserves store order.
pub(crate) fn search_positions(
    docs: &[Arc<Document>],
    positions: &[usize],
    query: &Query,
) -> Vec<SearchResult> {
    #[cfg(feature = "parallel")]
    let mut results: Vec<SearchResult> = if positions.len() >= PARALLEL_THRESHOLD {
        positions
            .par_iter()
            .filter_map(|&pos| evaluate_at(docs, pos, query))
            .collect()
    } else {
        positions
            .iter()
            .filter_map(|&pos| evaluate_at(docs, pos, query))
            .collect()
    };

    #[cfg(not(feature = "parallel"))]
    let mut results: Vec<SearchResult> = positions
        .iter()
        .filter_map(|&pos| evaluate_at(docs, pos, query))
        .collect();

    rank(&mut results);
    check_results_well_formed(&results);
    results
}

/// Full scan: evaluate a query against every document and rank the matches.
///
/// This is the reference evaluator. [`crate::SearchContext::search`] may prune with
/// the inverted index first, but must return exactly what this returns.
pub fn search(docs: &[Arc<Document>], query: &Query) -> Vec<SearchResult> {
    let positions: Vec<usize> = (0..docs.len()).collect();
    search_positions(docs, &positions, query)
}

/// Sort by relevance descending.
///
/// INVARIANT: RANK_STABLE. `sort_by` is stable; input is in store order.
fn rank(results: &mut [SearchResult]) {
    results.sort_by(|a, b| b.relevance.cmp(&a.relevance));
}
