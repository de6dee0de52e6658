//! Ranking: relevance descending, ties in store order.

use super::common::*;

#[test]
fn relevance_descending() {
    let ctx = context_of(ranking_corpus());
    let results = ctx.search("fox", ci()).unwrap();
    assert_eq!(titles(&results), vec!["B", "D", "A", "C"]);
    let relevance: Vec<usize> = results.iter().map(|r| r.relevance).collect();
    assert_eq!(relevance, vec![3, 2, 1, 1]);
}

#[test]
fn ties_keep_store_order() {
    let ctx = fixture_context();
    let results = ctx.search("exhibits", ci()).unwrap();
    assert_eq!(titles(&results), vec!["Motion to Seal", "Order"]);
    assert_eq!(results[0].relevance, results[1].relevance);
    assert!(results[0].doc_id < results[1].doc_id);
}

#[test]
fn relevance_is_match_count() {
    let ctx = fixture_context();
    for r in ctx.search("the", ci()).unwrap() {
        assert_eq!(r.relevance, r.matches.len());
        assert!(r.relevance > 0);
    }
}

#[test]
fn many_ties_across_parallel_threshold() {
    // Enough documents to take the parallel path when it is enabled.
    let docs: Vec<_> = (0..600)
        .map(|i| make_doc(&format!("D{i}"), if i % 3 == 0 { "fox fox" } else { "fox" }))
        .collect();
    let ctx = context_of(docs);
    let results = ctx.search("fox", ci()).unwrap();
    assert_eq!(results.len(), 600);
    assert!(results[..200].iter().all(|r| r.relevance == 2));
    for pair in results.windows(2) {
        if pair[0].relevance == pair[1].relevance {
            assert!(pair[0].doc_id < pair[1].doc_id);
        }
    }
}
