//! WebAssembly bindings for the document search page.
//!
//! `DocketSearcher` is the page's whole engine: it owns the search session and the
//! chat conversation. The page fetches `documents.json` itself and hands the text
//! over; everything after that (index, search, excerpts, context block, relay
//! bodies) happens here.
//!
//! All strings returned for display are already neutralized HTML.

use crate::chat::{self, Conversation};
use crate::config::{Config, SearchOptionsPatch};
use crate::context::SearchContext;
use crate::excerpt::Html;
use crate::session::{match_label, SearchSession};
use crate::store::JsonSource;
use crate::types::SearchResult;
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[cfg(feature = "wasm")]
pub use wasm_bindgen_rayon::init_thread_pool;

/// One rendered result card.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResultCard {
    /// Rank position, used for `explain_request`.
    index: usize,
    title: String,
    source: String,
    date: Option<String>,
    relevance: usize,
    match_label: String,
    excerpt: String,
    full_text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchOutput {
    generation: u64,
    summary: String,
    results: Vec<ResultCard>,
}

fn card(ctx: &SearchContext, index: usize, result: &SearchResult, query: &str) -> ResultCard {
    let doc = &result.document;
    ResultCard {
        index,
        title: Html::notice(&doc.title),
        source: Html::notice(&doc.source),
        date: doc.date.as_deref().map(Html::notice),
        relevance: result.relevance,
        match_label: match_label(result.relevance),
        excerpt: ctx.excerpt(result, query),
        full_text: Html::full_text(&doc.content),
    }
}

fn js_error(message: impl AsRef<str>) -> JsValue {
    JsValue::from_str(message.as_ref())
}

/// WASM-accessible search engine for one page.
#[wasm_bindgen]
pub struct DocketSearcher {
    session: SearchSession,
    conversation: Conversation,
    config: Config,
}

#[wasm_bindgen]
impl DocketSearcher {
    /// Create an empty searcher. `config` is an optional partial `Config` object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: Option<JsValue>) -> Result<DocketSearcher, JsValue> {
        let config: Config = match config {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                from_value(value).map_err(|e| js_error(e.to_string()))?
            }
            _ => Config::default(),
        };
        Ok(DocketSearcher {
            session: SearchSession::new(SearchContext::new(Default::default(), config.clone())),
            conversation: Conversation::new(),
            config,
        })
    }

    /// Load the documents JSON text. Never throws: returns a warning message on
    /// failure, in which case the searcher holds an empty store.
    #[wasm_bindgen]
    pub fn load(&self, json: &str) -> Option<String> {
        self.session
            .reload(&JsonSource::new(json))
            .map(|warning| warning.to_string())
    }

    /// Search and publish. Throws the inline validation message for an empty query
    /// or an empty store.
    ///
    /// `options` is an optional `{ caseInsensitive, exactMatch }` object; a missing
    /// object or field falls back to the configured search options.
    #[wasm_bindgen]
    pub fn search(&self, query: &str, options: Option<JsValue>) -> Result<JsValue, JsValue> {
        let patch: SearchOptionsPatch = match options {
            Some(value) if !value.is_undefined() && !value.is_null() => {
                from_value(value).map_err(|e| js_error(e.to_string()))?
            }
            _ => SearchOptionsPatch::default(),
        };
        let options = patch.over(self.config.search);

        let ctx = self.session.context();
        let published = self
            .session
            .search(query, options)
            .map_err(|e| js_error(e.user_message()))?;
        let Some(completed) = published else {
            return Ok(JsValue::NULL);
        };

        let output = SearchOutput {
            generation: completed.generation,
            summary: completed.summary(&Html),
            results: completed
                .results
                .iter()
                .enumerate()
                .map(|(i, r)| card(&ctx, i, r, completed.query.text()))
                .collect(),
        };
        to_value(&output).map_err(|e| e.to_string().into())
    }

    /// JSON body for the explain endpoint, for a result of the latest search.
    #[wasm_bindgen]
    pub fn explain_request(&self, index: usize) -> Result<String, JsValue> {
        let request = self
            .session
            .explain_request(index)
            .map_err(|e| js_error(e.user_message()))?;
        serde_json::to_string(&request).map_err(|e| js_error(e.to_string()))
    }

    /// Text of an explain reply, as HTML with line breaks.
    #[wasm_bindgen]
    pub fn explain_response(&self, status: u16, body: &str) -> Result<String, JsValue> {
        chat::parse_explain_response(status, body)
            .map(|text| Html::full_text(&text))
            .map_err(|e| js_error(Html::notice(&e.user_message())))
    }

    /// Record a chat message and return the JSON body for the chat endpoint, or
    /// `undefined` for a blank message.
    #[wasm_bindgen]
    pub fn ask(&mut self, message: &str) -> Result<Option<String>, JsValue> {
        let ctx = self.session.context();
        match self.conversation.ask(&ctx, message) {
            Some(request) => serde_json::to_string(&request)
                .map(Some)
                .map_err(|e| js_error(e.to_string())),
            None => Ok(None),
        }
    }

    /// Consume the chat endpoint's reply. Throws the inline error message on failure.
    #[wasm_bindgen]
    pub fn receive(&mut self, status: u16, body: &str) -> Result<String, JsValue> {
        self.conversation
            .receive(status, body)
            .map_err(|e| js_error(Html::notice(&e.user_message())))
    }

    #[wasm_bindgen]
    pub fn context_block(&self, message: &str) -> String {
        self.session.context().context_block(message)
    }

    #[wasm_bindgen]
    pub fn library(&self) -> Result<JsValue, JsValue> {
        to_value(&self.session.context().store().library()).map_err(|e| e.to_string().into())
    }

    #[wasm_bindgen]
    pub fn by_source(&self) -> Result<JsValue, JsValue> {
        to_value(&self.session.context().store().by_source()).map_err(|e| e.to_string().into())
    }

    #[wasm_bindgen]
    pub fn stats(&self) -> Result<JsValue, JsValue> {
        to_value(&self.session.context().stats()).map_err(|e| e.to_string().into())
    }

    /// Cosmetic delay the page should apply before rendering results.
    #[wasm_bindgen]
    pub fn min_latency_ms(&self) -> u64 {
        self.config.min_latency_ms
    }

    #[wasm_bindgen]
    pub fn latest_generation(&self) -> u64 {
        self.session.latest_generation()
    }
}
