//! Session behavior over the fixture: publishing order, reloads, status lines.

use std::sync::Arc;
use std::thread;

use super::common::*;
use docket::{
    summary_line, ChatError, Html, JsonSource, Plain, QueryError, SearchContext, SearchSession,
};

fn fixture_session() -> SearchSession {
    SearchSession::new(fixture_context())
}

#[test]
fn newest_search_wins_even_when_it_finishes_first() {
    let session = fixture_session();
    let slow = session.begin("seal", ci()).unwrap();
    let fast = session.begin("flight", ci()).unwrap();

    let published = session.publish(fast.run()).unwrap();
    assert_eq!(titles(&published.results), vec!["Deposition Transcript"]);

    assert!(session.publish(slow.run()).is_none());
    assert_eq!(session.current().unwrap().query.text(), "flight");
}

#[test]
fn stale_search_cannot_overwrite_after_newer_publishes() {
    let session = fixture_session();
    let first = session.begin("exhibits", ci()).unwrap();
    let second = session.begin("motion to seal", phrase()).unwrap();
    let second = session.publish(second.run()).unwrap();
    assert_eq!(second.results[0].matches, vec![4]);

    assert!(session.publish(first.run()).is_none());
    assert_eq!(session.current().unwrap().generation, second.generation);
}

#[test]
fn concurrent_searches_publish_only_the_newest() {
    let session = Arc::new(fixture_session());
    let queries = ["seal", "exhibits", "flight", "order", "the"];
    let pending: Vec<_> = queries
        .iter()
        .map(|q| session.begin(q, ci()).unwrap())
        .collect();
    let newest = pending.last().unwrap().generation();

    let handles: Vec<_> = pending
        .into_iter()
        .map(|search| {
            let session = Arc::clone(&session);
            thread::spawn(move || session.publish(search.run()).is_some())
        })
        .collect();
    let accepted = handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .filter(|accepted| *accepted)
        .count();

    assert_eq!(accepted, 1);
    assert_eq!(session.current().unwrap().generation, newest);
    assert_eq!(session.current().unwrap().query.text(), "the");
}

#[test]
fn reload_invalidates_results_and_in_flight_searches() {
    let session = fixture_session();
    session.search("seal", ci()).unwrap();
    let in_flight = session.begin("flight", ci()).unwrap();

    let replacement = r#"{"documents": [{"title": "Notice", "content": "Flight records follow.", "source": "Doc 7"}]}"#;
    assert!(session.reload(&JsonSource::new(replacement)).is_none());
    assert!(session.current().is_none());

    // The old search still runs against its snapshot, but may not publish.
    let completed = in_flight.run();
    assert_eq!(completed.results.len(), 1);
    assert!(session.publish(completed).is_none());

    let fresh = session.search("flight", ci()).unwrap().unwrap();
    assert_eq!(titles(&fresh.results), vec!["Notice"]);
    assert_eq!(fresh.results[0].matches, vec![0]);
}

#[test]
fn failed_reload_leaves_session_empty() {
    let session = fixture_session();
    session.search("seal", ci()).unwrap();

    let warning = session.reload(&JsonSource::new("{ not json"));
    assert!(warning.is_some());
    assert!(session.context().store().is_empty());
    assert!(session.current().is_none());
    assert!(matches!(
        session.begin("seal", ci()),
        Err(QueryError::NoDocuments)
    ));
}

#[test]
fn empty_query_is_reported_before_empty_store() {
    let session = SearchSession::new(SearchContext::default());
    assert!(matches!(session.begin("   ", ci()), Err(QueryError::Empty)));
    assert!(matches!(session.begin("seal", ci()), Err(QueryError::NoDocuments)));
    assert_eq!(session.latest_generation(), 0);
}

#[test]
fn explain_uses_latest_published_ranking() {
    let session = fixture_session();
    session.search("exhibits", ci()).unwrap();

    let request = session.explain_request(1).unwrap();
    assert!(request.message.contains("\n\nDocument: Order\nContent: The motion to seal"));
    assert!(matches!(
        session.explain_request(2),
        Err(ChatError::NoSuchResult(2))
    ));
}

#[test]
fn summary_lines() {
    let session = fixture_session();
    let completed = session.search("seal exhibits", ci()).unwrap().unwrap();
    assert_eq!(
        completed.summary(&Plain),
        "Found 2 documents matching \"seal exhibits\""
    );

    let none = session.search("subpoena", ci()).unwrap().unwrap();
    assert_eq!(none.summary(&Plain), "No results found for \"subpoena\"");

    assert_eq!(
        summary_line(1, "<redacted>", &Html),
        "Found 1 document matching \"&lt;redacted&gt;\""
    );
}

#[test]
fn search_racing_a_reload_never_publishes_the_replaced_store() {
    use std::sync::Barrier;

    const OLD: &str = r#"{"documents": [{"title": "OLD", "content": "fox", "source": "S"}]}"#;
    const NEW: &str = r#"{"documents": [{"title": "NEW", "content": "fox", "source": "S"}]}"#;

    for _ in 0..2_000 {
        let (ctx, _) = SearchContext::load(&JsonSource::new(OLD), docket::Config::default());
        let session = Arc::new(SearchSession::new(ctx));
        let barrier = Arc::new(Barrier::new(2));

        let reloader = {
            let session = Arc::clone(&session);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                session.reload(&JsonSource::new(NEW))
            })
        };

        barrier.wait();
        let pending = session.begin("fox", ci()).unwrap();
        assert!(reloader.join().unwrap().is_none());

        if let Some(published) = session.publish(pending.run()) {
            assert_eq!(titles(&published.results), vec!["NEW"]);
        }
        if let Some(current) = session.current() {
            assert_eq!(titles(&current.results), vec!["NEW"]);
        }
    }
}
