// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The document store and its loader.
//!
//! The store is an ordered, read-only sequence of documents built from one load of
//! the static source. Nothing mutates it in place: a reload builds a new store and
//! the old one is dropped once nobody holds it.
//!
//! Loading fails soft. A missing file, an unreachable source or malformed JSON
//! produce an empty store plus a warning, never an error the caller has to handle
//! before the page is usable.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::LoadError;
use crate::types::{Document, DocumentSet};

/// Separates the case name from the entry in a document's `source`.
pub const SOURCE_SEPARATOR: &str = " - ";

/// Where the documents JSON comes from.
pub trait DocumentSource {
    /// Fetch the raw JSON text.
    fn fetch(&self) -> Result<String, LoadError>;

    /// Human-readable name for log lines.
    fn describe(&self) -> String;
}

/// A documents file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self) -> Result<String, LoadError> {
        std::fs::read_to_string(&self.path).map_err(|source| LoadError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// JSON text already in memory (the browser fetched it for us).
#[derive(Debug, Clone)]
pub struct JsonSource {
    json: String,
}

impl JsonSource {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl DocumentSource for JsonSource {
    fn fetch(&self) -> Result<String, LoadError> {
        Ok(self.json.clone())
    }

    fn describe(&self) -> String {
        "inline documents".to_string()
    }
}

/// Ordered, immutable documents from one load.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    docs: Vec<Arc<Document>>,
    last_updated: Option<String>,
    /// Every searched field is pure ASCII. Lets the index prune candidates.
    ascii: bool,
}

/// Outcome of a fail-soft load: always a store, sometimes a warning.
#[derive(Debug)]
pub struct Loaded {
    pub store: DocumentStore,
    pub warning: Option<LoadError>,
}

impl DocumentStore {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_set(set: DocumentSet) -> Self {
        let ascii = set
            .documents
            .iter()
            .all(|d| d.title.is_ascii() && d.content.is_ascii() && d.source.is_ascii());
        Self {
            docs: set.documents.into_iter().map(Arc::new).collect(),
            last_updated: set.last_updated,
            ascii,
        }
    }

    pub fn from_documents(documents: Vec<Document>) -> Self {
        Self::from_set(DocumentSet {
            documents,
            last_updated: None,
        })
    }

    /// Strict parse; use [`load`] for the fail-soft path.
    pub fn from_json(json: &str) -> Result<Self, LoadError> {
        let set: DocumentSet = serde_json::from_str(json)?;
        Ok(Self::from_set(set))
    }

    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        Self::from_json(&FileSource::new(path).fetch()?)
    }

    pub fn documents(&self) -> &[Arc<Document>] {
        &self.docs
    }

    pub fn get(&self, position: usize) -> Option<&Arc<Document>> {
        self.docs.get(position)
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn last_updated(&self) -> Option<&str> {
        self.last_updated.as_deref()
    }

    pub fn is_ascii(&self) -> bool {
        self.ascii
    }

    /// Every document with its display fields.
    pub fn library(&self) -> Vec<LibraryEntry> {
        self.docs
            .iter()
            .enumerate()
            .map(|(i, doc)| LibraryEntry {
                number: i + 1,
                title: non_empty_or(&doc.title, "Untitled Document"),
                source: non_empty_or(&doc.source, "Unknown source"),
                date: doc.date.clone(),
            })
            .collect()
    }

    /// Document counts per case, largest first.
    ///
    /// The case is the part of `source` before `" - "` (`"Giuffre v. Maxwell -
    /// Entry #1"` -> `"Giuffre v. Maxwell"`); a source without that separator counts
    /// as `Unknown`. Equal counts keep first-seen order.
    pub fn by_source(&self) -> Vec<SourceGroup> {
        let mut groups: Vec<SourceGroup> = Vec::new();
        for doc in &self.docs {
            let case = case_name(&doc.source);
            match groups.iter_mut().find(|g| g.case == case) {
                Some(group) => group.count += 1,
                None => groups.push(SourceGroup {
                    case: case.to_string(),
                    count: 1,
                }),
            }
        }
        groups.sort_by(|a, b| b.count.cmp(&a.count));
        groups
    }

    /// Characters of content across the whole store.
    pub fn total_chars(&self) -> usize {
        self.docs.iter().map(|doc| doc.content.chars().count()).sum()
    }
}

/// Case name of a `"<case> - Entry #<n>"` source.
pub fn case_name(source: &str) -> &str {
    match source.split_once(SOURCE_SEPARATOR) {
        Some((case, _)) => case,
        None => "Unknown",
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// One line of the document library panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryEntry {
    /// 1-based position in the store.
    pub number: usize,
    pub title: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Number of documents filed under one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceGroup {
    pub case: String,
    pub count: usize,
}

/// Load a store from a source, failing soft.
///
/// On any failure the store is empty and the error is both logged at `warn` and
/// returned as `warning`, so the caller can show a "no documents" state.
pub fn load(source: &dyn DocumentSource) -> Loaded {
    let parsed = source.fetch().and_then(|json| DocumentStore::from_json(&json));
    match parsed {
        Ok(store) => {
            tracing::info!(
                source = %source.describe(),
                documents = store.len(),
                last_updated = store.last_updated().unwrap_or("unknown"),
                "loaded documents"
            );
            Loaded {
                store,
                warning: None,
            }
        }
        Err(err) => {
            tracing::warn!(source = %source.describe(), error = %err, "could not load documents");
            Loaded {
                store: DocumentStore::empty(),
                warning: Some(err),
            }
        }
    }
}
