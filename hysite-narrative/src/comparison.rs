//! Conversational comparison of previously generated site reports.

use std::sync::PoisonError;

use hysite_core::{ChatCompletion, ChatMessage};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{ConversationStore, ConversationStoreConfig};

/// A previously generated site report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    /// Display name of the report.
    pub name: String,
    /// Narrative summary of the report.
    pub summary: String,
}

/// A question about a set of reports, asked on behalf of one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonRequest {
    /// Reports that seed a new conversation.
    pub reports: Vec<Report>,
    /// The user's question.
    #[serde(rename = "user_question")]
    pub question: String,
    /// Key identifying the user's conversation.
    #[serde(rename = "user_email")]
    pub user_key: String,
}

/// The assistant's answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReply {
    /// Reply text, or an explanation of why none could be produced.
    pub reply: String,
}

/// Requests rejected before any completion is attempted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    /// A required field was empty.
    #[error("missing required parameter: {field}")]
    MissingField {
        /// Name of the empty field.
        field: &'static str,
    },
}

/// Render the report-analyst system prompt for `reports`.
#[must_use]
pub fn comparison_prompt(reports: &[Report]) -> String {
    let listing: String = reports
        .iter()
        .map(|report| format!("- {}: {}\n", report.name, report.summary))
        .collect();
    format!(
        "You are an expert report analysis assistant.\n\
Here are the reports you must always use for answering:\n\n\
{listing}\n\
Instructions:\n\
- Compare reports when asked.\n\
- Be factual, grounded, and structured.\n\
- Format with Key Findings, Comparisons, Recommendations.\n\
- If a question is unrelated to these reports, politely decline.\n"
    )
}

/// Answers questions about reports while remembering each user's history.
#[derive(Debug)]
pub struct ReportComparator<C> {
    client: C,
    store: ConversationStore,
}

impl<C: ChatCompletion> ReportComparator<C> {
    /// Build a comparator with a default conversation store.
    pub fn new(client: C) -> Self {
        Self::with_store(client, ConversationStore::new(ConversationStoreConfig::default()))
    }

    /// Build a comparator over an explicit store.
    pub const fn with_store(client: C, store: ConversationStore) -> Self {
        Self { client, store }
    }

    /// Conversation store backing this comparator.
    pub const fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Answer `request.question` in the context of the user's conversation.
    ///
    /// The first request for a key seeds its conversation from
    /// `request.reports`; later report lists for the same key are ignored until
    /// the conversation expires. Concurrent requests for one key are
    /// serialised. A completion failure is reported in the reply text and the
    /// unanswered question is removed from the history.
    ///
    /// # Errors
    /// Returns [`ComparisonError::MissingField`] when the reports, question or
    /// user key are empty.
    pub fn compare(&self, request: &ComparisonRequest) -> Result<ComparisonReply, ComparisonError> {
        if request.reports.is_empty() {
            return Err(ComparisonError::MissingField { field: "reports" });
        }
        if request.question.trim().is_empty() {
            return Err(ComparisonError::MissingField {
                field: "user_question",
            });
        }
        if request.user_key.trim().is_empty() {
            return Err(ComparisonError::MissingField {
                field: "user_email",
            });
        }

        let conversation = self
            .store
            .conversation(&request.user_key, || comparison_prompt(&request.reports));
        let mut history = conversation
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        history.push(ChatMessage::user(request.question.clone()));

        let reply = match self.client.complete(history.messages()) {
            Ok(answer) => {
                history.push(ChatMessage::assistant(answer.clone()));
                answer
            }
            Err(err) => {
                log::warn!("report comparison failed for {}: {err}", request.user_key);
                history.discard_pending_user();
                format!("Report comparison failed: {err}")
            }
        };
        Ok(ComparisonReply { reply })
    }
}
