// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the docket command-line interface.
//!
//! Every subcommand reads a documents JSON file (the same file the page fetches)
//! and loads it fail-soft: a missing or malformed file gives an empty store and a
//! warning, exactly like the page. `search` and `explain` go through a search
//! session, `context` and `chat` build the relay payloads without sending them.
//! `build` goes the other way and writes a documents file from extracted filings.

pub mod display;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "docket",
    about = "Keyword and phrase search over a static court-document set",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// JSON config file (excerpt window, context limits, latency floor)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search a documents file and print highlighted excerpts
    Search {
        /// Path to documents JSON
        file: PathBuf,

        /// Search query
        query: String,

        /// Match the whole query as one phrase
        #[arg(short, long)]
        exact: bool,

        /// Match case exactly
        #[arg(short = 's', long)]
        case_sensitive: bool,

        /// Maximum number of results to print (all are ranked)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show store statistics, sources and the document library
    Inspect {
        /// Path to documents JSON
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Look up a token in the inverted index
    Lookup {
        /// Path to documents JSON
        file: PathBuf,

        /// Token (lowercased before lookup)
        token: String,
    },

    /// Print the chat context block for a message
    Context {
        /// Path to documents JSON
        file: PathBuf,

        /// Chat message
        message: String,
    },

    /// Build the chat relay request for a message
    Chat {
        /// Path to documents JSON
        file: PathBuf,

        /// Chat message
        message: String,

        /// Print the relay's upstream completion body instead
        #[arg(long, value_enum)]
        upstream: Option<RelayKind>,

        /// Parse a saved relay reply and print the answer
        #[arg(long)]
        reply: Option<PathBuf>,

        /// HTTP status of the saved reply
        #[arg(long, default_value = "200")]
        status: u16,
    },

    /// Build the explain request for one search result
    Explain {
        /// Path to documents JSON
        file: PathBuf,

        /// Search query
        query: String,

        /// 1-based rank of the result to explain
        #[arg(short, long, default_value = "1")]
        rank: usize,
    },

    /// Build a documents JSON from a directory of extracted filings
    ///
    /// Reads `<Case>_<Entry>_<Description>.txt` files (pdftotext output, pages
    /// separated by form feeds).
    Build {
        /// Directory of extracted .txt filings
        dir: PathBuf,

        /// Output path
        #[arg(short, long, default_value = "documents.json")]
        output: PathBuf,

        /// lastUpdated stamp as YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<chrono::NaiveDate>,
    },
}

/// Which relay deployment to emulate.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum RelayKind {
    /// Long-running server: strict prompt injected, temperature 0.1
    Server,
    /// Serverless function: messages forwarded as-is, temperature 0.3
    Serverless,
}
