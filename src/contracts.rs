//! Runtime contracts for the search pipeline.
//!
//! Debug-mode assertions for the properties the rest of the crate relies on:
//!
//! 1. Are **zero-cost in release builds** (use `debug_assert!`)
//! 2. Provide **early failure detection** during development
//!
//! # INVARIANTS (DO NOT REMOVE THESE CHECKS)
//!
//! | Contract Function            | Property                                     |
//! |------------------------------|----------------------------------------------|
//! | `check_results_well_formed`  | relevance = match count > 0, offsets in text |
//! | `check_ranking`              | non-increasing relevance, stable ties        |
//! | `check_window_bounds`        | `start <= end <= len(content)`                |

use crate::types::SearchResult;

// ============================================================================
// RESULT CONTRACTS
// ============================================================================

/// Check every result and the ordering of the sequence.
///
/// # Panics (debug builds only)
/// Panics if a result has no matches, a relevance that differs from its match
/// count, an offset outside its content, or if ranking is violated.
#[inline]
pub fn check_results_well_formed(results: &[SearchResult]) {
    #[cfg(debug_assertions)]
    {
        for r in results {
            // INVARIANT: NO_ZERO_RELEVANCE
            debug_assert!(!r.matches.is_empty(), "result {:?} has no matches", r.doc_id);
            debug_assert_eq!(
                r.relevance,
                r.matches.len(),
                "relevance must equal match count for {:?}",
                r.doc_id
            );

            // INVARIANT: OFFSETS_IN_CONTENT
            let len = r.document.content.chars().count();
            debug_assert!(
                r.matches.iter().all(|&m| m < len),
                "match offset out of bounds for {:?} (len {})",
                r.doc_id,
                len
            );
        }
        check_ranking(results);
    }
    #[cfg(not(debug_assertions))]
    let _ = results;
}

/// Check that relevance never increases and ties keep store order.
#[inline]
pub fn check_ranking(results: &[SearchResult]) {
    for pair in results.windows(2) {
        // INVARIANT: RANK_MONOTONE
        debug_assert!(
            pair[0].relevance >= pair[1].relevance,
            "ranking not monotone: {} before {}",
            pair[0].relevance,
            pair[1].relevance
        );
        // INVARIANT: RANK_STABLE
        if pair[0].relevance == pair[1].relevance {
            debug_assert!(
                pair[0].doc_id < pair[1].doc_id,
                "tie between {:?} and {:?} out of store order",
                pair[0].doc_id,
                pair[1].doc_id
            );
        }
    }
}

// ============================================================================
// EXCERPT CONTRACTS
// ============================================================================

/// Check that an excerpt window lies inside its content.
#[inline]
pub fn check_window_bounds(start: usize, end: usize, len: usize) {
    // INVARIANT: WINDOW_IN_BOUNDS
    debug_assert!(
        start <= end && end <= len,
        "excerpt window [{}, {}) outside content of length {}",
        start,
        end,
        len
    );
}
