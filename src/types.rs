// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The building blocks of a document set and its search results.
//!
//! A [`Document`] is what the static JSON source gives us. A [`SearchResult`] is a
//! document plus the character offsets where the query matched. Documents are
//! addressed by their position in the loaded sequence, so [`DocId`] is nothing more
//! than that position with a type around it.
//!
//! # Invariants
//!
//! - **Document**: `content` is always a string. Missing or `null` fields load as
//!   empty strings; a document never fails to load because a field is absent.
//!
//! - **SearchResult**: `relevance == matches.len()` and `matches` is non-empty.
//!   A document with zero matches is excluded, never returned with relevance 0.
//!
//! - **Offsets**: every entry of `matches` is a character (Unicode scalar) offset
//!   into `content`, strictly less than `content.chars().count()`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

// =============================================================================
// NEWTYPES
// =============================================================================

/// Position of a document in the loaded sequence.
///
/// Stable for the lifetime of one load. A reload replaces the whole store, so a
/// `DocId` from a previous load means nothing afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct DocId(pub u32);

impl DocId {
    /// Create a new DocId, validating it's within bounds.
    #[inline]
    pub fn new(id: usize, num_docs: usize) -> Option<Self> {
        if id < num_docs {
            u32::try_from(id).ok().map(DocId)
        } else {
            None
        }
    }

    /// Convert to usize for array indexing.
    #[inline]
    pub fn as_usize(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for DocId {
    fn from(id: u32) -> Self {
        DocId(id)
    }
}

impl From<DocId> for usize {
    fn from(id: DocId) -> Self {
        id.0 as usize
    }
}

// =============================================================================
// DOCUMENT TYPES
// =============================================================================

/// One document of the static set.
///
/// `title`, `content` and `source` are searched or displayed; `date`, `page` and
/// `filename` are display-only. The scraped sources this comes from are not
/// consistent about types (page numbers show up as JSON numbers), so the optional
/// fields accept any scalar and keep its text form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default, deserialize_with = "text_or_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub content: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
}

impl Document {
    /// Build a document from the three searched fields.
    pub fn new(title: impl Into<String>, content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            source: source.into(),
            ..Self::default()
        }
    }

    /// Text fed to the inverted index: title, content and source joined by spaces.
    pub fn indexed_text(&self) -> String {
        format!("{} {} {}", self.title, self.content, self.source)
    }
}

/// The JSON shape of the static document source.
///
/// ```json
/// { "documents": [ { "title": "...", "content": "...", "source": "..." } ],
///   "lastUpdated": "2025-01-03" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSet {
    #[serde(default, deserialize_with = "documents_or_empty")]
    pub documents: Vec<Document>,
    #[serde(default, deserialize_with = "optional_text", skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

/// A document that matched a query, with where it matched.
///
/// Serializes flat: the document fields sit next to `docId`, `matches` and
/// `relevance`, which is the shape the browser page renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub doc_id: DocId,
    #[serde(flatten)]
    pub document: Arc<Document>,
    /// Character offsets into `content`, in order of discovery (not sorted).
    pub matches: Vec<usize>,
    /// Number of entries in `matches`.
    pub relevance: usize,
}

impl SearchResult {
    pub(crate) fn new(doc_id: DocId, document: Arc<Document>, matches: Vec<usize>) -> Self {
        let relevance = matches.len();
        Self {
            doc_id,
            document,
            matches,
            relevance,
        }
    }

    /// Offset the excerpt is windowed around: the first discovered match.
    #[inline]
    pub fn anchor(&self) -> usize {
        self.matches.first().copied().unwrap_or(0)
    }
}

// =============================================================================
// LENIENT FIELD DECODING
// =============================================================================

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

fn optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(scalar_text(Value::deserialize(deserializer)?))
}

fn documents_or_empty<'de, D>(deserializer: D) -> Result<Vec<Document>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Document>>::deserialize(deserializer)?.unwrap_or_default())
}
