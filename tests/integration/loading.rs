//! Loading documents from files, fail-soft.

use super::common::*;
use docket::{Config, FileSource, LoadError, SearchContext, SearchOptions};
use std::io::Write;

#[test]
fn fixture_loads_with_metadata() {
    let store = fixture_store();
    assert_eq!(store.len(), FIXTURE_DOCS);
    assert_eq!(store.last_updated(), Some("2024-01-15"));
    let deposition = store.get(1).unwrap();
    assert_eq!(deposition.page.as_deref(), Some("12"));
    assert_eq!(store.get(4).unwrap().filename.as_deref(), Some("logs.pdf"));
}

#[test]
fn library_and_sources() {
    let store = fixture_store();
    let library = store.library();
    assert_eq!(library.len(), FIXTURE_DOCS);
    assert_eq!(library[4].number, 5);
    assert_eq!(library[4].source, "Unknown source");
    assert_eq!(library[0].date.as_deref(), Some("2015-09-21"));

    let cases: Vec<(String, usize)> = store
        .by_source()
        .into_iter()
        .map(|g| (g.case, g.count))
        .collect();
    assert_eq!(
        cases,
        vec![
            ("Giuffre v. Maxwell".to_string(), 4),
            ("Unknown".to_string(), 1),
        ]
    );
}

#[test]
fn stats_report_counts() {
    let stats = fixture_context().stats();
    assert_eq!(stats.documents, FIXTURE_DOCS);
    assert_eq!(stats.last_updated_label(), "2024-01-15");
    assert!(stats.tokens > 0);
    assert_eq!(stats.total_chars, 470);
    assert_eq!(stats.average_chars, 94);
}

#[test]
fn temp_file_round_trip() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"documents": [{{"title": "Memo", "content": "a sealed memo", "source": "S"}}]}}"#
    )
    .unwrap();

    let (ctx, warning) = SearchContext::load(&FileSource::new(file.path()), Config::default());
    assert!(warning.is_none());
    assert_eq!(ctx.search("memo", SearchOptions::default()).unwrap().len(), 1);
    assert_eq!(ctx.stats().last_updated_label(), "No data loaded");
}

#[test]
fn malformed_file_gives_empty_store() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "<!DOCTYPE html><p>Not Found</p>").unwrap();

    let (ctx, warning) = SearchContext::load(&FileSource::new(file.path()), Config::default());
    assert!(matches!(warning, Some(LoadError::Json(_))));
    assert!(ctx.store().is_empty());
    assert!(ctx.search("found", SearchOptions::default()).unwrap().is_empty());
}

#[test]
fn missing_file_gives_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("documents.json");
    let (ctx, warning) = SearchContext::load(&FileSource::new(&path), Config::default());
    assert!(matches!(warning, Some(LoadError::Io { .. })));
    assert_eq!(ctx.stats().documents, 0);
}

#[test]
fn config_file_changes_excerpt_window() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"excerpt": {{"before": 4, "length": 12}}, "minLatencyMs": 300}}"#).unwrap();
    let config = Config::from_path(file.path()).unwrap();
    assert_eq!(config.excerpt.before, 4);
    assert_eq!(config.context.max_documents, 5);
    assert_eq!(config.min_latency_ms, 300);

    let ctx = SearchContext::new(fixture_store(), config);
    let results = ctx.search("granted", SearchOptions::default()).unwrap();
    assert_eq!(ctx.excerpt(&results[0], "granted"), "... is <mark>GRANTED</mark> ...");
}
