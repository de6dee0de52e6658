// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Assemble a `documents.json` from a directory of extracted court filings.
//!
//! Input is one `.txt` file per filing, as written by `pdftotext`: pages are
//! separated by form feeds. File names follow `<Case>_<Entry>_<Description>.txt`:
//!
//! ```text
//! Giuffre v. Maxwell_1_Complaint.txt
//!   title    = "Complaint"
//!   source   = "Giuffre v. Maxwell - Entry #1"
//!   content  = "--- Page 1 ---\n...\n--- Page 2 ---\n..."
//!   date     = "Various", page = "Multiple", filename = the input file name
//! ```
//!
//! A file with no text on any page (a scanned PDF without OCR, say) is reported as
//! failed and left out, as is one that isn't valid UTF-8.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::{Error, LoadError};
use crate::store::SOURCE_SEPARATOR;
use crate::types::{Document, DocumentSet};

/// Extension of the extracted-text files picked up from the input directory.
pub const TEXT_EXTENSION: &str = "txt";

/// `pdftotext` page separator.
const PAGE_BREAK: char = '\u{c}';

/// Metadata parsed out of a filing's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingName {
    pub case: String,
    pub entry: String,
    pub description: String,
}

impl FilingName {
    /// Split `<Case>_<Entry>_<Description>` on the first two underscores.
    ///
    /// Missing parts fall back to `N/A` and `Document`; the description keeps any
    /// further underscores.
    pub fn parse(stem: &str) -> Self {
        let mut parts = stem.splitn(3, '_');
        let case = parts.next().filter(|p| !p.is_empty()).unwrap_or("Unknown Case");
        let entry = parts.next().unwrap_or("N/A");
        let description = parts.next().unwrap_or("Document");
        Self {
            case: case.to_string(),
            entry: entry.to_string(),
            description: description.to_string(),
        }
    }

    /// `"<case> - Entry #<entry>"`.
    pub fn source(&self) -> String {
        format!("{}{}Entry #{}", self.case, SOURCE_SEPARATOR, self.entry)
    }
}

/// Join page texts with `--- Page N ---` markers, numbering every page but
/// skipping the blank ones.
pub fn paginate(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 32);
    for (i, page) in text.split(PAGE_BREAK).enumerate() {
        let page = page.trim();
        if page.is_empty() {
            continue;
        }
        out.push_str(&format!("\n--- Page {} ---\n{}", i + 1, page));
    }
    out.trim().to_string()
}

/// Build the document for one extracted file, or `None` if it has no text.
pub fn filing_document(file_name: &str, text: &str) -> Option<Document> {
    let content = paginate(text);
    if content.is_empty() {
        return None;
    }
    let stem = file_name
        .strip_suffix(&format!(".{}", TEXT_EXTENSION))
        .unwrap_or(file_name);
    let name = FilingName::parse(stem);

    let mut doc = Document::new(name.description.clone(), content, name.source());
    doc.date = Some("Various".to_string());
    doc.page = Some("Multiple".to_string());
    doc.filename = Some(file_name.to_string());
    Some(doc)
}

/// `lastUpdated` text for `date`.
pub fn stamp(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `lastUpdated` text for today, local time.
pub fn today() -> String {
    stamp(Local::now().date_naive())
}

/// A built document set plus the files that produced nothing.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub set: DocumentSet,
    pub failed: Vec<String>,
}

fn text_files(dir: &Path) -> Result<Vec<PathBuf>, LoadError> {
    let io = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io)? {
        let path = entry.map_err(io)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == TEXT_EXTENSION) {
            files.push(path);
        }
    }
    // read_dir order is unspecified
    files.sort();
    Ok(files)
}

fn read_filing(path: &Path) -> Result<Document, String> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(file = %file_name, error = %err, "could not read extracted text");
            return Err(file_name);
        }
    };
    match filing_document(&file_name, &text) {
        Some(doc) => {
            tracing::debug!(file = %file_name, chars = doc.content.chars().count(), "extracted");
            Ok(doc)
        }
        None => {
            tracing::warn!(file = %file_name, "no text extracted");
            Err(file_name)
        }
    }
}

/// Build a document set from every `.txt` file in `dir`, in file name order.
pub fn build_document_set(dir: &Path, last_updated: String) -> Result<BuildReport, LoadError> {
    let files = text_files(dir)?;

    #[cfg(feature = "parallel")]
    let outcomes: Vec<Result<Document, String>> = files.par_iter().map(|p| read_filing(p)).collect();
    #[cfg(not(feature = "parallel"))]
    let outcomes: Vec<Result<Document, String>> = files.iter().map(|p| read_filing(p)).collect();

    let mut report = BuildReport::default();
    for outcome in outcomes {
        match outcome {
            Ok(doc) => report.set.documents.push(doc),
            Err(file_name) => report.failed.push(file_name),
        }
    }
    report.set.last_updated = Some(last_updated);

    tracing::info!(
        dir = %dir.display(),
        documents = report.set.documents.len(),
        failed = report.failed.len(),
        "built document set"
    );
    Ok(report)
}

/// Write `set` as pretty-printed JSON.
pub fn write_document_set(set: &DocumentSet, path: &Path) -> Result<(), Error> {
    let json = serde_json::to_string_pretty(set).map_err(Error::Serialize)?;
    fs::write(path, json).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })
}
