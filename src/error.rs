// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Error types.
//!
//! Three independent failure domains, kept apart so one can't leak into another:
//! loading the document set, validating a query, and talking to the chat relay.
//! None of them is fatal to the engine. A load failure leaves an empty store, a bad
//! query produces an inline message, and a chat failure stays inside the chat panel.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// Why the document source could not be turned into a store.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid documents JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document source unavailable: {0}")]
    Unavailable(String),
}

/// A query rejected before evaluation.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,

    #[error("query could not be compiled: {0}")]
    Pattern(#[from] regex::Error),

    /// Raised by [`crate::session::SearchSession`] only; the evaluator itself
    /// returns no results for an empty store.
    #[error("no documents loaded")]
    NoDocuments,
}

/// A failed exchange with the chat relay.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("relay error ({status}): {message}")]
    Relay { status: u16, message: String },

    #[error("malformed relay response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("relay response contained no completion")]
    EmptyCompletion,

    #[error("no search result at position {0}")]
    NoSuchResult(usize),
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error(transparent)]
    Chat(#[from] ChatError),

    #[error("could not serialize output: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("could not write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl QueryError {
    /// Inline message for the search box.
    pub fn user_message(&self) -> &'static str {
        match self {
            QueryError::Empty => "Please enter a search term.",
            QueryError::Pattern(_) => "That search term is too long to search for.",
            QueryError::NoDocuments => {
                "No documents loaded. Please add documents.json file with official Epstein files."
            }
        }
    }
}

impl ChatError {
    /// Inline message for the chat panel. Relay messages are passed through so the
    /// user can see e.g. a missing API key; callers neutralize them before display.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Relay { message, .. } => format!("Error: {}", message),
            ChatError::Malformed(_) | ChatError::EmptyCompletion => {
                "AI explanation unavailable. The AI service may be down or you may need to add an API key to the backend.".to_string()
            }
            ChatError::NoSuchResult(_) => "That search result is no longer available.".to_string(),
        }
    }
}
