// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Chat relay payloads and the context block that grounds them.
//!
//! The engine never talks to a language model itself. It produces:
//!
//! - the **context block**: top-ranked documents for the user's message, each
//!   truncated, in the fixed `[source] title\n<content>...\n\n` layout;
//! - the **request bodies** the page POSTs to the relay (`{"messages": [...]}` for
//!   chat, `{"message": "..."}` for explaining one result);
//! - the **upstream body** the relay forwards to the completion API.
//!
//! These are integration contracts with a deployed endpoint, so field names, field
//! order and prompt text are fixed. Serialize with `serde_json::to_string` and
//! they match what the page has always sent.

use serde::{Deserialize, Serialize};

use crate::config::{ContextConfig, SearchOptions};
use crate::context::SearchContext;
use crate::error::ChatError;
use crate::search::Query;
use crate::types::Document;
use crate::utils::truncate_chars;

pub const CONTEXT_HEADER: &str = "Relevant documents found:\n\n";
pub const NO_DOCUMENTS_LOADED: &str = "No documents loaded yet.";
pub const NO_RELEVANT_DOCUMENTS: &str = "No relevant documents found for this query.";

/// Characters of a document's content sent with an explain request.
pub const EXPLAIN_MAX_CHARS: usize = 2000;

const CHAT_SYSTEM_PROMPT: &str = concat!(
    "You are an AI assistant helping users understand official Epstein court documents. \n",
    "                \n",
    "CRITICAL RULES:\n",
    "1. ONLY provide information based on the actual documents in the database\n",
    "2. NEVER speculate or make assumptions\n",
    "3. ALWAYS cite the specific document source (case number, entry number, page)\n",
    "4. If information is not in the documents, say so clearly\n",
    "5. Be factual, objective, and careful with sensitive information\n",
    "6. Remind users that these are official court records, not verified facts\n",
    "\n",
    "Context from documents:\n",
);

const RELAY_SYSTEM_PROMPT: &str = "You are a STRICTLY FACTUAL assistant for PEDOPEDIA, an official court documents database. CRITICAL RULES:
1. ONLY answer questions using information EXPLICITLY found in the provided court documents
2. NEVER speculate, infer, or use outside knowledge
3. ALWAYS cite the specific document name and page when making ANY claim
4. If information is NOT in the documents, say \"This information is not found in the available court documents\"
5. Maintain complete neutrality and objectivity - present only what the documents state
6. Quote exact text from documents when possible
7. Never express opinions or make judgments beyond what documents explicitly state
8. If asked about something not in documents, respond: \"I can only answer based on the official court documents in this database. That information is not available in the current document set.\"

Your purpose is to help users find FACTUAL INFORMATION from OFFICIAL COURT RECORDS - nothing more.";

const EXPLAIN_PROMPT: &str = "Explain this court document in simple, layman's terms. What does it mean? What's important? Be concise and clear:";

// =============================================================================
// CONTEXT BLOCK
// =============================================================================

/// Build the context block for `message`.
///
/// Re-runs the evaluator case-insensitively in all-terms mode, keeps the top
/// `max_documents` results and the first `max_chars` characters of each.
/// Read-only: the store and index are untouched.
pub fn context_block(ctx: &SearchContext, message: &str, limits: &ContextConfig) -> String {
    if ctx.store().is_empty() {
        return NO_DOCUMENTS_LOADED.to_string();
    }

    let results = match Query::parse(message, SearchOptions::CHAT_CONTEXT) {
        Ok(query) => ctx.run(&query),
        Err(_) => Vec::new(),
    };
    if results.is_empty() {
        return NO_RELEVANT_DOCUMENTS.to_string();
    }

    let mut block = String::from(CONTEXT_HEADER);
    for result in results.iter().take(limits.max_documents) {
        let doc = &result.document;
        block.push_str(&format!(
            "[{}] {}\n{}...\n\n",
            doc.source,
            doc.title,
            truncate_chars(&doc.content, limits.max_chars)
        ));
    }
    block
}

/// System prompt sent by the page, with the context block appended.
pub fn system_prompt(context: &str) -> String {
    format!("{}{}", CHAT_SYSTEM_PROMPT, context)
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Page -> relay chat body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
}

/// Page -> relay explain body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplainRequest {
    pub message: String,
}

impl ExplainRequest {
    pub fn for_document(doc: &Document) -> Self {
        Self {
            message: format!(
                "{}\n\nDocument: {}\nContent: {}",
                EXPLAIN_PROMPT,
                doc.title,
                truncate_chars(&doc.content, EXPLAIN_MAX_CHARS)
            ),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct ExplainResponse {
    response: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RelayErrorBody {
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct CompletionMessage {
    content: Option<String>,
}

fn check_status(status: u16, body: &str) -> Result<(), ChatError> {
    if (200..300).contains(&status) {
        return Ok(());
    }
    let message = serde_json::from_str::<RelayErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("API Error: {}", status));
    Err(ChatError::Relay { status, message })
}

/// Text of the first completion choice in a relay chat reply.
pub fn parse_chat_response(status: u16, body: &str) -> Result<String, ChatError> {
    check_status(status, body)?;
    let completion: Completion = serde_json::from_str(body)?;
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or(ChatError::EmptyCompletion)
}

/// Text of a relay explain reply.
pub fn parse_explain_response(status: u16, body: &str) -> Result<String, ChatError> {
    check_status(status, body)?;
    let reply: ExplainResponse = serde_json::from_str(body)?;
    reply.response.ok_or(ChatError::EmptyCompletion)
}

// =============================================================================
// CONVERSATION
// =============================================================================

/// User and assistant turns of one chat panel.
///
/// The user turn is recorded before the request goes out. A failed exchange
/// leaves it there with no assistant reply; the user retries by asking again.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    history: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    /// Record `message` and build the relay request, or `None` for a blank message.
    pub fn ask(&mut self, ctx: &SearchContext, message: &str) -> Option<ChatRequest> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }
        self.history.push(ChatMessage::new(Role::User, message));

        let context = ctx.context_block(message);
        let mut messages = Vec::with_capacity(self.history.len() + 1);
        messages.push(ChatMessage::new(Role::System, system_prompt(&context)));
        messages.extend(self.history.iter().cloned());
        Some(ChatRequest { messages })
    }

    /// Consume the relay's reply; on success the answer joins the history.
    pub fn receive(&mut self, status: u16, body: &str) -> Result<String, ChatError> {
        match parse_chat_response(status, body) {
            Ok(answer) => {
                self.history.push(ChatMessage::new(Role::Assistant, answer.clone()));
                Ok(answer)
            }
            Err(err) => {
                tracing::warn!(error = %err, "chat exchange failed");
                Err(err)
            }
        }
    }
}

// =============================================================================
// RELAY UPSTREAM
// =============================================================================

/// Relay -> completion API body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpstreamRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub max_tokens: u32,
}

/// How the relay rewrites a forwarded chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayConfig {
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Prepended as a system message when set.
    pub system_prompt: Option<String>,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::server()
    }
}

impl RelayConfig {
    /// The long-running server relay.
    pub fn server() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.1,
            max_tokens: 1500,
            system_prompt: Some(RELAY_SYSTEM_PROMPT.to_string()),
        }
    }

    /// The serverless-function relay: forwards messages unchanged.
    pub fn serverless() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.3,
            max_tokens: 1000,
            system_prompt: None,
        }
    }

    pub fn upstream_request(&self, forwarded: Vec<ChatMessage>) -> UpstreamRequest {
        let mut messages = Vec::with_capacity(forwarded.len() + 1);
        if let Some(prompt) = &self.system_prompt {
            messages.push(ChatMessage::new(Role::System, prompt.clone()));
        }
        messages.extend(forwarded);
        UpstreamRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}
