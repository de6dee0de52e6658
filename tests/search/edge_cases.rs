//! Edge cases: metacharacters, Unicode, empty stores, odd documents.

use super::common::*;
use docket::{Document, DocumentStore, SearchContext};

#[test]
fn regex_metacharacters_are_literal() {
    let ctx = fixture_context();
    let results = ctx.search("6 & 7", phrase()).unwrap();
    assert_eq!(titles(&results), vec!["Order"]);
    assert_eq!(ctx.search("<redacted>", ci()).unwrap().len(), 1);
    assert!(ctx.search("(a|b)*", ci()).unwrap().is_empty());
    assert!(ctx.search(".", phrase()).unwrap().len() >= 4);
}

#[test]
fn empty_store_gives_no_results() {
    let ctx = SearchContext::default();
    assert!(ctx.search("anything", ci()).unwrap().is_empty());
}

#[test]
fn missing_content_loads_as_empty() {
    let store = DocumentStore::from_json(
        r#"{"documents": [{"title": "fox"}, {"title": "B", "content": null, "source": 7}]}"#,
    )
    .unwrap();
    assert_eq!(store.get(0).unwrap().content, "");
    assert_eq!(store.get(1).unwrap().source, "7");

    let ctx = SearchContext::new(store, Default::default());
    assert!(ctx.search("fox", ci()).unwrap().is_empty());
}

#[test]
fn unicode_offsets_are_characters() {
    let ctx = context_of(vec![Document::new("Ä", "Zürich – Genève, then the fox", "S")]);
    let results = ctx.search("fox", ci()).unwrap();
    assert_eq!(results[0].matches, vec![26]);
}

#[test]
fn unicode_case_folding() {
    let ctx = context_of(vec![Document::new("A", "ÉTÉ été", "S")]);
    assert_eq!(ctx.search("été", ci()).unwrap()[0].relevance, 2);
    assert_eq!(ctx.search("été", cs()).unwrap()[0].relevance, 1);
}

#[test]
fn duplicate_terms_double_offsets() {
    let ctx = context_of(fox_corpus());
    let results = ctx.search("fox fox", ci()).unwrap();
    assert_eq!(results[0].matches, vec![10, 10]);
    assert_eq!(results[0].relevance, 2);
}

#[test]
fn non_ascii_store_skips_pruning_but_agrees() {
    // The Kelvin sign folds to 'k' under Unicode case folding.
    let ctx = context_of(vec![Document::new("A", "\u{212A}ILN", "S"), Document::new("B", "kiln", "S")]);
    assert!(!ctx.store().is_ascii());
    assert_eq!(ctx.search("kiln", ci()).unwrap().len(), 2);
}
