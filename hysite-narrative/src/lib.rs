//! Narrative summaries and report comparison for scored sites.
//!
//! Both features sit on top of a [`ChatCompletion`](hysite_core::ChatCompletion)
//! backend and are supplementary to scoring: [`NarrativeWriter`] turns backend
//! failures into explanatory text, and [`ReportComparator`] reports failures in
//! its reply while keeping each user's history consistent.

#![forbid(unsafe_code)]

mod comparison;
mod conversation;
mod summary;

pub use comparison::{
    ComparisonError, ComparisonReply, ComparisonRequest, Report, ReportComparator,
    comparison_prompt,
};
pub use conversation::{
    Conversation, ConversationStore, ConversationStoreConfig, DEFAULT_CONVERSATION_TTL,
    DEFAULT_MAX_CONVERSATIONS, DEFAULT_MAX_MESSAGES,
};
pub use summary::{NarrativeWriter, render_context};
