//! Match semantics against the court-document fixture.
//!
//! Expected offsets are character offsets into `content`, per term in query order.

use super::common::*;
use docket::{Query, QueryError};

#[test]
fn all_terms_records_every_occurrence() {
    let ctx = fixture_context();
    let results = ctx.search("flight", ci()).unwrap();
    assert_eq!(titles(&results), vec!["Deposition Transcript"]);
    assert_eq!(results[0].matches, vec![25, 56, 87]);
    assert_eq!(results[0].relevance, 3);
}

#[test]
fn title_only_match_is_not_a_result() {
    let ctx = fixture_context();
    // "Flight Logs" qualifies on its title but has no content occurrence
    assert!(ctx.search("logs", ci()).unwrap().is_empty());
    assert!(ctx.search("flight logs", ci()).unwrap().is_empty());
}

#[test]
fn substring_matches_count() {
    let ctx = fixture_context();
    let results = ctx.search("seal", ci()).unwrap();
    assert_eq!(titles(&results), vec!["Order", "Motion to Seal"]);
    // "seal", "sealed", "unsealed"
    assert_eq!(results[0].matches, vec![14, 69, 111]);
    assert_eq!(results[1].matches, vec![19]);
}

#[test]
fn multi_term_offsets_concatenate_per_term() {
    let ctx = fixture_context();
    let results = ctx.search("seal exhibits", ci()).unwrap();
    assert_eq!(results[0].document.title, "Order");
    assert_eq!(results[0].matches, vec![14, 69, 111, 39, 94]);
    assert_eq!(results[1].matches, vec![19, 24, 50]);
}

#[test]
fn exact_phrase_searches_content_only() {
    let ctx = fixture_context();
    let results = ctx.search("Motion to Seal", phrase()).unwrap();
    assert_eq!(titles(&results), vec!["Order"]);
    assert_eq!(results[0].matches, vec![4]);
}

#[test]
fn case_sensitive_flag() {
    let ctx = fixture_context();
    assert_eq!(titles(&ctx.search("GRANTED", cs()).unwrap()), vec!["Order"]);
    assert!(ctx.search("granted", cs()).unwrap().is_empty());
    assert_eq!(ctx.search("granted", ci()).unwrap().len(), 1);
}

#[test]
fn no_results_for_absent_term() {
    let ctx = fixture_context();
    assert!(ctx.search("smith", ci()).unwrap().is_empty());
}

#[test]
fn empty_query_is_rejected_before_evaluation() {
    let ctx = fixture_context();
    assert!(matches!(ctx.search("", ci()), Err(QueryError::Empty)));
    assert!(matches!(ctx.search("  \t ", phrase()), Err(QueryError::Empty)));
}

#[test]
fn full_scan_equals_context_search() {
    let ctx = fixture_context();
    for q in ["the", "exhibit", "seal exhibits", "6 & 7", "<redacted>", "Q."] {
        for options in [ci(), cs(), phrase()] {
            let query = Query::parse(q, options).unwrap();
            assert_eq!(
                ctx.run(&query),
                docket::search(ctx.store().documents(), &query),
                "{q:?} {options:?}"
            );
        }
    }
}
