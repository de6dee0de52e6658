// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Excerpts with highlighted query terms.
//!
//! Two passes, never string surgery on already-marked-up text:
//!
//! 1. **Locate**: cut a character window around the anchor, then find every
//!    case-insensitive occurrence of every query term *in the raw window*.
//!    Overlapping spans are merged so markers can never nest or cross.
//! 2. **Emit**: walk the window once, neutralizing literal text and wrapping the
//!    located spans in highlight markers. Markers are emitted by us, so they are
//!    never escaped, and escaped text is never searched, so entities like `&amp;`
//!    can't be highlighted into garbage.
//!
//! The [`Markup`] trait decides what "neutralize" and "highlight" mean: HTML for
//! the browser page, ANSI colors for the terminal.

use std::ops::Range;

use regex::RegexBuilder;

use crate::config::ExcerptConfig;
use crate::contracts::check_window_bounds;
use crate::utils::{char_len, char_to_byte, push_escaped_html, split_terms};

/// Marker prepended/appended when the window cuts the content.
pub const ELLIPSIS: &str = "...";

/// How literal text is neutralized and how highlights are delimited.
pub trait Markup {
    /// Append `text` to `out`, neutralized for the target medium.
    fn push_literal(&self, out: &mut String, text: &str);

    fn open(&self) -> &str;

    fn close(&self) -> &str;
}

/// HTML output: entities for metacharacters, `<mark>` for highlights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Html;

impl Markup for Html {
    fn push_literal(&self, out: &mut String, text: &str) {
        push_escaped_html(out, text);
    }

    fn open(&self) -> &str {
        "<mark>"
    }

    fn close(&self) -> &str {
        "</mark>"
    }
}

impl Html {
    /// Neutralize a user-visible message (errors, stats lines, notices).
    pub fn notice(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        push_escaped_html(&mut out, text);
        out
    }

    /// Full document body for the "read full document" view.
    pub fn full_text(content: &str) -> String {
        Self::notice(content).replace('\n', "<br>")
    }
}

/// Text as-is with no markers, for contexts that render nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Markup for Plain {
    fn push_literal(&self, out: &mut String, text: &str) {
        out.push_str(text);
    }

    fn open(&self) -> &str {
        ""
    }

    fn close(&self) -> &str {
        ""
    }
}

/// A character window of a document's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window<'a> {
    /// First character of the window.
    pub start: usize,
    /// One past the last character.
    pub end: usize,
    pub text: &'a str,
    pub truncated_start: bool,
    pub truncated_end: bool,
}

/// Cut the window: `start = max(0, anchor - before)`, `end = min(len, start + length)`.
///
/// An anchor past the end of the content clamps to the end rather than panicking.
pub fn window<'a>(content: &'a str, anchor: usize, config: &ExcerptConfig) -> Window<'a> {
    let len = char_len(content);
    let start = anchor.saturating_sub(config.before).min(len);
    let end = start.saturating_add(config.length).min(len);
    check_window_bounds(start, end, len);

    let from = char_to_byte(content, start);
    let to = char_to_byte(content, end);
    Window {
        start,
        end,
        text: &content[from..to],
        truncated_start: start > 0,
        truncated_end: end < len,
    }
}

/// Byte ranges of `text` to highlight for `query`, sorted, overlaps merged.
///
/// Every whitespace-delimited term of the lowercased query counts, matched
/// case-insensitively. Adjacent spans stay separate; only overlapping ones merge.
pub fn highlight_spans(text: &str, query: &str) -> Vec<Range<usize>> {
    let lowered = query.to_lowercase();
    let mut terms = split_terms(&lowered);
    terms.sort_unstable();
    terms.dedup();

    let mut spans: Vec<Range<usize>> = Vec::new();
    for term in terms {
        let pattern = match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::debug!(term, error = %err, "skipping unhighlightable term");
                continue;
            }
        };
        spans.extend(pattern.find_iter(text).map(|m| m.range()));
    }

    spans.sort_unstable_by_key(|span| (span.start, span.end));

    let mut merged: Vec<Range<usize>> = Vec::with_capacity(spans.len());
    for span in spans {
        match merged.last_mut() {
            Some(last) if span.start < last.end => last.end = last.end.max(span.end),
            _ => merged.push(span),
        }
    }
    merged
}

/// Emit a window with its spans highlighted.
pub fn render<M: Markup + ?Sized>(window: &Window<'_>, spans: &[Range<usize>], markup: &M) -> String {
    let mut out = String::with_capacity(window.text.len() + 2 * ELLIPSIS.len());
    if window.truncated_start {
        out.push_str(ELLIPSIS);
    }

    let mut cursor = 0;
    for span in spans {
        markup.push_literal(&mut out, &window.text[cursor..span.start]);
        out.push_str(markup.open());
        markup.push_literal(&mut out, &window.text[span.clone()]);
        out.push_str(markup.close());
        cursor = span.end;
    }
    markup.push_literal(&mut out, &window.text[cursor..]);

    if window.truncated_end {
        out.push_str(ELLIPSIS);
    }
    out
}

/// Window `content` around `anchor` and highlight the terms of `query`.
pub fn excerpt<M: Markup + ?Sized>(
    content: &str,
    query: &str,
    anchor: usize,
    config: &ExcerptConfig,
    markup: &M,
) -> String {
    let window = window(content, anchor, config);
    let spans = highlight_spans(window.text, query);
    render(&window, &spans, markup)
}
