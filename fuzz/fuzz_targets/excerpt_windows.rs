// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for excerpt windows and highlighting.
//!
//! Any anchor, any window size, any query: the excerpt must cut on character
//! boundaries, never nest markers and never leak raw markup into HTML output.

#![no_main]

use arbitrary::Arbitrary;
use docket::excerpt::{excerpt, highlight_spans, window, Plain};
use docket::{ExcerptConfig, Html};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct ExcerptInput {
    content: String,
    query: String,
    anchor: u16,
    before: u8,
    length: u16,
}

fuzz_target!(|input: ExcerptInput| {
    let content: String = input.content.chars().take(2048).collect();
    let query: String = input.query.chars().take(64).collect();
    let config = ExcerptConfig {
        before: input.before as usize,
        length: input.length as usize,
    };
    let anchor = input.anchor as usize;

    // INVARIANT 1: the window is a slice of the content within bounds
    let cut = window(&content, anchor, &config);
    let len = content.chars().count();
    assert!(cut.start <= cut.end && cut.end <= len);
    assert_eq!(cut.text.chars().count(), cut.end - cut.start);

    // INVARIANT 2: spans are sorted, disjoint and on character boundaries
    let spans = highlight_spans(cut.text, &query);
    for span in &spans {
        assert!(cut.text.is_char_boundary(span.start));
        assert!(cut.text.is_char_boundary(span.end));
    }
    for pair in spans.windows(2) {
        assert!(pair[0].end <= pair[1].start);
    }

    // INVARIANT 3: plain rendering is the window text plus ellipses
    let plain = excerpt(&content, &query, anchor, &config, &Plain);
    assert!(plain.contains(cut.text));

    // INVARIANT 4: HTML output never carries a raw '<' except our markers
    let html = excerpt(&content, &query, anchor, &config, &Html);
    let stripped = html.replace("<mark>", "").replace("</mark>", "");
    assert!(!stripped.contains('<'));
    assert_eq!(html.matches("<mark>").count(), html.matches("</mark>").count());
});
