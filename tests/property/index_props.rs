//! Inverted index properties, with the full scan as oracle.
//!
//! The index only ever prunes. Whatever it does, the results of
//! `SearchContext::run` must equal the unpruned `docket::search`.

use super::common::context_of;
use docket::{build_inverted_index, tokenize, Document, Query, SearchOptions};
use proptest::prelude::*;
use std::sync::Arc;

fn word() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z]{1,5}",
        prop::sample::select(vec!["fox.", "Fox", "s", "\u{17F}", "\u{212A}", "ΣΑΣ", "ς", "k"])
            .prop_map(str::to_string),
    ]
}

fn text() -> impl Strategy<Value = String> {
    prop::collection::vec(word(), 0..10).prop_map(|w| w.join(" "))
}

fn corpus() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec((text(), text()), 0..10).prop_map(|items| {
        items
            .into_iter()
            .map(|(title, content)| Document::new(title, content, "src"))
            .collect()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Pruned search equals the full scan for every flag combination.
    #[test]
    fn prop_pruned_equals_full_scan(
        docs in corpus(),
        q in prop::collection::vec(word(), 1..3).prop_map(|w| w.join(" ")),
        case_insensitive in any::<bool>(),
        exact_match in any::<bool>(),
    ) {
        let ctx = context_of(docs);
        let query = Query::parse(&q, SearchOptions { case_insensitive, exact_match }).unwrap();
        prop_assert_eq!(ctx.run(&query), docket::search(ctx.store().documents(), &query));
    }

    /// Every token of every document is indexed under that document.
    #[test]
    fn prop_index_complete(docs in corpus()) {
        let docs: Vec<Arc<Document>> = docs.into_iter().map(Arc::new).collect();
        let index = build_inverted_index(&docs);
        for (position, doc) in docs.iter().enumerate() {
            for token in tokenize(doc) {
                prop_assert!(index.terms[&token].contains(&position));
            }
        }
        for postings in index.terms.values() {
            prop_assert!(!postings.is_empty());
            prop_assert!(postings.iter().all(|&p| p < index.total_docs));
        }
    }

    /// The parallel build produces the same index as the sequential one.
    #[cfg(feature = "parallel")]
    #[test]
    fn prop_parallel_build_matches(docs in corpus()) {
        let docs: Vec<Arc<Document>> = docs.into_iter().map(Arc::new).collect();
        let sequential = build_inverted_index(&docs);
        let parallel = docket::build_inverted_index_parallel(&docs);
        prop_assert_eq!(sequential.terms, parallel.terms);
        prop_assert_eq!(sequential.total_docs, parallel.total_docs);
    }
}
