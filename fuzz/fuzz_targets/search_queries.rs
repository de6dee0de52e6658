// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for query parsing and evaluation.
//!
//! Throws arbitrary queries at arbitrary small document sets and checks that the
//! indexed search never panics and always agrees with the full scan.

#![no_main]

use arbitrary::Arbitrary;
use docket::{search, Config, Document, DocumentStore, Query, SearchContext, SearchOptions};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct SearchInput {
    query: String,
    contents: Vec<(String, String)>,
    case_insensitive: bool,
    exact_match: bool,
}

fuzz_target!(|input: SearchInput| {
    // Cap sizes to avoid timeouts
    let query: String = input.query.chars().take(64).collect();
    let docs: Vec<Document> = input
        .contents
        .iter()
        .take(8)
        .enumerate()
        .map(|(i, (title, content))| {
            let title: String = title.chars().take(32).collect();
            let content: String = content.chars().take(512).collect();
            Document::new(title, content, format!("Doc {}", i))
        })
        .collect();

    let options = SearchOptions {
        case_insensitive: input.case_insensitive,
        exact_match: input.exact_match,
    };
    let Ok(parsed) = Query::parse(&query, options) else {
        return;
    };

    let ctx = SearchContext::new(DocumentStore::from_documents(docs), Config::default());
    let pruned = ctx.run(&parsed);
    let full = search(ctx.store().documents(), &parsed);

    // INVARIANT 1: pruning never changes the answer
    assert_eq!(pruned.len(), full.len());
    for (a, b) in pruned.iter().zip(&full) {
        assert_eq!(a.document.title, b.document.title);
        assert_eq!(a.matches, b.matches);
    }

    for result in &pruned {
        // INVARIANT 2: relevance is the number of recorded offsets
        assert_eq!(result.relevance, result.matches.len());

        // INVARIANT 3: every offset is inside the content
        let len = result.document.content.chars().count();
        assert!(result.matches.iter().all(|&m| m < len));

        // INVARIANT 4: excerpts render for every result
        let _ = ctx.excerpt(result, &query);
    }

    // INVARIANT 5: ranked by relevance, descending
    for pair in pruned.windows(2) {
        assert!(pair[0].relevance >= pair[1].relevance);
    }
});
