// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Tunables, all with defaults.
//!
//! Everything here deserializes with `#[serde(default)]`, so the browser can pass
//! `{ exactMatch: true }` and get sensible values for the rest.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::LoadError;

/// The two independent search flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Fold case on both query and text (default: true)
    pub case_insensitive: bool,
    /// Treat the whole query as one literal phrase (default: false)
    pub exact_match: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_insensitive: true,
            exact_match: false,
        }
    }
}

impl SearchOptions {
    /// Options used when the chat feature re-runs the evaluator for context.
    pub const CHAT_CONTEXT: SearchOptions = SearchOptions {
        case_insensitive: true,
        exact_match: false,
    };
}

/// Search flags as the page sends them: any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOptionsPatch {
    pub case_insensitive: Option<bool>,
    pub exact_match: Option<bool>,
}

impl SearchOptionsPatch {
    /// Fill the missing fields from `base`.
    pub fn over(self, base: SearchOptions) -> SearchOptions {
        SearchOptions {
            case_insensitive: self.case_insensitive.unwrap_or(base.case_insensitive),
            exact_match: self.exact_match.unwrap_or(base.exact_match),
        }
    }
}

/// Excerpt window, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExcerptConfig {
    /// Characters kept before the anchor (default: 100)
    pub before: usize,
    /// Total window length (default: 300)
    pub length: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            before: 100,
            length: 300,
        }
    }
}

/// Size bounds of the chat context block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContextConfig {
    /// Top-ranked documents included (default: 5)
    pub max_documents: usize,
    /// Leading characters of each document's content (default: 500)
    pub max_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            max_documents: 5,
            max_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub search: SearchOptions,
    pub excerpt: ExcerptConfig,
    pub context: ContextConfig,
    /// Cosmetic floor on how long a search appears to take, in milliseconds.
    /// Zero disables it.
    pub min_latency_ms: u64,
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&raw)
    }

    pub fn min_latency(&self) -> Duration {
        Duration::from_millis(self.min_latency_ms)
    }
}
