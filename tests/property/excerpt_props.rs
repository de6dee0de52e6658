//! Excerpt invariants: window bounds, balanced markers, neutralized text.

use docket::excerpt::{excerpt, highlight_spans, window, Html, Plain};
use docket::ExcerptConfig;
use proptest::prelude::*;

fn content() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["fox", "<b>", "&amp;", "Zürich", "\"q\"", "mark", "é", " ", "\n"]),
        0..200,
    )
    .prop_map(|parts| parts.concat())
}

fn query() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec!["fox", "b", "amp", "mark", "<mark>", "zü", "q", "é", "ox f"]),
        1..3,
    )
    .prop_map(|w| w.join(" "))
}

/// Remove the markers we emit, then decode the entities we emit.
fn unescape(html: &str) -> String {
    html.replace("<mark>", "")
        .replace("</mark>", "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// The window lies inside the content and is at most `length` long.
    #[test]
    fn prop_window_bounds(c in content(), anchor in 0usize..2000) {
        let config = ExcerptConfig::default();
        let w = window(&c, anchor, &config);
        let len = c.chars().count();
        prop_assert!(w.start <= w.end && w.end <= len);
        prop_assert!(w.end - w.start <= config.length);
        prop_assert_eq!(w.text.chars().count(), w.end - w.start);
        prop_assert_eq!(w.truncated_start, w.start > 0);
        prop_assert_eq!(w.truncated_end, w.end < len);
    }

    /// Highlight spans are sorted, non-overlapping and on char boundaries.
    #[test]
    fn prop_spans_disjoint(c in content(), q in query()) {
        let spans = highlight_spans(&c, &q);
        for span in &spans {
            prop_assert!(span.start < span.end);
            prop_assert!(c.is_char_boundary(span.start) && c.is_char_boundary(span.end));
        }
        for pair in spans.windows(2) {
            prop_assert!(pair[0].end <= pair[1].start);
        }
    }

    /// Markers are balanced and never nested.
    #[test]
    fn prop_markers_balanced(c in content(), q in query(), anchor in 0usize..400) {
        let out = excerpt(&c, &q, anchor, &ExcerptConfig::default(), &Html);
        let mut open = false;
        let mut rest = out.as_str();
        while let Some(i) = rest.find('<') {
            rest = &rest[i..];
            if rest.starts_with("<mark>") {
                prop_assert!(!open, "nested <mark> in {out:?}");
                open = true;
                rest = &rest[6..];
            } else if rest.starts_with("</mark>") {
                prop_assert!(open, "unbalanced </mark> in {out:?}");
                open = false;
                rest = &rest[7..];
            } else {
                prop_assert!(false, "raw '<' leaked into {out:?}");
            }
        }
        prop_assert!(!open);
    }

    /// Stripping markers and decoding entities gives back the plain excerpt.
    #[test]
    fn prop_html_round_trips_to_plain(c in content(), q in query(), anchor in 0usize..400) {
        let config = ExcerptConfig::default();
        let html = excerpt(&c, &q, anchor, &config, &Html);
        let plain = excerpt(&c, &q, anchor, &config, &Plain);
        prop_assert_eq!(unescape(&html), plain);
    }
}
