//! Keyword and phrase search over a static document set, with highlighted
//! excerpts and a context builder for an AI chat relay.
//!
//! The whole document set is loaded once from a JSON source, indexed, and then
//! searched in memory. There is no persistence and no network: the chat relay is a
//! separate endpoint, and this crate only builds the payloads it consumes.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  store.rs   │────▶│ inverted.rs  │────▶│  search.rs   │
//! │ (load, fail │     │ (token ->    │     │ (Query, two  │
//! │  soft)      │     │  positions)  │     │  match modes)│
//! └─────────────┘     └──────────────┘     └──────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────────────────────────────────────────────┐
//! │                    context.rs                        │
//! │  SearchContext: store + index + config, passed       │
//! │  explicitly instead of living in globals             │
//! └─────────────────────────────────────────────────────┘
//!        │                   │                    │
//!        ▼                   ▼                    ▼
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ excerpt.rs  │     │  session.rs  │     │   chat.rs    │
//! │ (window +   │     │ (generations,│     │ (context     │
//! │  highlight) │     │  publishing) │     │  block, wire)│
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use docket::{SearchContext, SearchOptions, store::JsonSource, Config};
//!
//! let json = r#"{"documents": [
//!     {"title": "A", "content": "the quick fox", "source": "S1"},
//!     {"title": "B", "content": "the slow fox", "source": "S2"}
//! ]}"#;
//! let (ctx, warning) = SearchContext::load(&JsonSource::new(json), Config::default());
//! assert!(warning.is_none());
//!
//! let results = ctx.search("quick fox", SearchOptions::default()).unwrap();
//! assert_eq!(results.len(), 1);
//! assert_eq!(results[0].matches, vec![4, 10]);
//! assert_eq!(ctx.excerpt(&results[0], "quick fox"), "the <mark>quick</mark> <mark>fox</mark>");
//! ```

// Module declarations
#[cfg(feature = "cli")]
pub mod build;
pub mod chat;
pub mod config;
mod context;
pub mod contracts;
mod error;
pub mod excerpt;
mod inverted;
mod search;
mod session;
pub mod store;
pub mod testing;
mod types;
mod utils;

#[cfg(any(feature = "wasm", feature = "wasm-single-threaded"))]
mod wasm;

// Re-exports for public API
pub use chat::{ChatMessage, ChatRequest, Conversation, ExplainRequest, RelayConfig, Role};
pub use config::{Config, ContextConfig, ExcerptConfig, SearchOptions, SearchOptionsPatch};
pub use context::{SearchContext, StoreStats};
pub use error::{ChatError, Error, LoadError, QueryError, Result};
pub use excerpt::{Html, Markup, Plain};
pub use inverted::{build_inverted_index, tokenize, InvertedIndex};
#[cfg(feature = "parallel")]
pub use inverted::build_inverted_index_parallel;
pub use search::{search, MatchMode, Query};
pub use session::{match_label, summary_line, CompletedSearch, PendingSearch, SearchSession};
pub use store::{DocumentSource, DocumentStore, FileSource, JsonSource};
pub use types::{DocId, Document, DocumentSet, SearchResult};
pub use utils::escape_html;

#[cfg(feature = "wasm")]
pub use wasm::init_thread_pool;
