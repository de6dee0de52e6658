//! Evaluator invariants: relevance, ordering, offsets, mode relationships.

use super::common::context_of;
use docket::{Document, Query, SearchOptions};
use proptest::prelude::*;

/// Words from a small vocabulary so queries actually hit.
fn word() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["fox", "Fox", "dog", "seal", "sealed", "the", "é", "a.b", "x"])
        .prop_map(str::to_string)
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..12).prop_map(|w| w.join(" "))
}

fn corpus() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec((text(), text()), 0..12).prop_map(|items| {
        items
            .into_iter()
            .enumerate()
            .map(|(i, (title, content))| Document::new(title, content, format!("S{i}")))
            .collect()
    })
}

fn query() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 1..4).prop_map(|w| w.join(" "))
}

fn options() -> impl Strategy<Value = SearchOptions> {
    (any::<bool>(), any::<bool>()).prop_map(|(case_insensitive, exact_match)| SearchOptions {
        case_insensitive,
        exact_match,
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every result has relevance = match count > 0 and offsets inside content.
    #[test]
    fn prop_results_well_formed(docs in corpus(), q in query(), opts in options()) {
        let ctx = context_of(docs);
        for r in ctx.search(&q, opts).unwrap() {
            prop_assert!(r.relevance > 0);
            prop_assert_eq!(r.relevance, r.matches.len());
            let len = r.document.content.chars().count();
            prop_assert!(r.matches.iter().all(|&m| m < len));
        }
    }

    /// Relevance never increases; ties are in store order.
    #[test]
    fn prop_ranking_monotone_and_stable(docs in corpus(), q in query(), opts in options()) {
        let ctx = context_of(docs);
        let results = ctx.search(&q, opts).unwrap();
        for pair in results.windows(2) {
            prop_assert!(pair[0].relevance >= pair[1].relevance);
            if pair[0].relevance == pair[1].relevance {
                prop_assert!(pair[0].doc_id < pair[1].doc_id);
            }
        }
    }

    /// Searching is a pure function of the store and query.
    #[test]
    fn prop_deterministic(docs in corpus(), q in query(), opts in options()) {
        let ctx = context_of(docs);
        prop_assert_eq!(ctx.search(&q, opts).unwrap(), ctx.search(&q, opts).unwrap());
    }

    /// A case-sensitive hit is always a case-insensitive hit.
    #[test]
    fn prop_case_insensitive_is_superset(docs in corpus(), q in query(), exact_match in any::<bool>()) {
        let ctx = context_of(docs);
        let sensitive = ctx.search(&q, SearchOptions { case_insensitive: false, exact_match }).unwrap();
        let insensitive = ctx.search(&q, SearchOptions { case_insensitive: true, exact_match }).unwrap();
        for r in &sensitive {
            prop_assert!(insensitive.iter().any(|i| i.doc_id == r.doc_id));
        }
    }

    /// Exact-phrase hits are all-terms hits: every word of the phrase occurs.
    #[test]
    fn prop_phrase_hits_are_all_terms_hits(docs in corpus(), q in query(), case_insensitive in any::<bool>()) {
        let ctx = context_of(docs);
        let phrase = ctx.search(&q, SearchOptions { case_insensitive, exact_match: true }).unwrap();
        let terms = ctx.search(&q, SearchOptions { case_insensitive, exact_match: false }).unwrap();
        for r in &phrase {
            prop_assert!(terms.iter().any(|t| t.doc_id == r.doc_id));
        }
    }

    /// Surrounding whitespace never changes the outcome.
    #[test]
    fn prop_trim_invariant(docs in corpus(), q in query(), opts in options()) {
        let ctx = context_of(docs);
        let padded = format!("  {q}\t ");
        prop_assert_eq!(ctx.search(&q, opts).unwrap(), ctx.search(&padded, opts).unwrap());
    }

    /// Whitespace-only queries never reach the evaluator.
    #[test]
    fn prop_blank_queries_rejected(ws in "[ \t\n]{0,6}", opts in options()) {
        prop_assert!(Query::parse(&ws, opts).is_err());
    }
}
