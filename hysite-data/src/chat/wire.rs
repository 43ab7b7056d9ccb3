//! OpenAI-compatible chat completion wire types.

use hysite_core::ChatMessage;
use serde::{Deserialize, Serialize};

/// Request body for `POST {base}/chat/completions`.
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    /// Model identifier.
    pub model: &'a str,
    /// Conversation so far, oldest first.
    pub messages: &'a [ChatMessage],
}

/// Response body of a chat completion.
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    /// Candidate completions; only the first is used.
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One candidate completion.
#[derive(Debug, Deserialize)]
pub struct Choice {
    /// The generated assistant message.
    pub message: ChoiceMessage,
}

/// The assistant message within a [`Choice`].
#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    /// Generated text; providers send `null` for tool-only replies.
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, if any non-blank text was returned.
    #[must_use]
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn serialises_roles_in_lowercase() {
        let messages = [ChatMessage::system("be brief"), ChatMessage::user("hi")];
        let body = serde_json::to_value(CompletionRequest {
            model: "llama3-8b-8192",
            messages: &messages,
        })
        .expect("request should serialise");
        assert_eq!(
            body,
            serde_json::json!({
                "model": "llama3-8b-8192",
                "messages": [
                    {"role": "system", "content": "be brief"},
                    {"role": "user", "content": "hi"}
                ]
            })
        );
    }

    #[rstest]
    fn extracts_first_choice() {
        let response: CompletionResponse = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"Site A wins."}},{"index":1,"message":{"role":"assistant","content":"ignored"}}]}"#,
        )
        .expect("response should deserialise");
        assert_eq!(response.into_content().as_deref(), Some("Site A wins."));
    }

    #[rstest]
    #[case(r#"{"choices":[]}"#)]
    #[case(r#"{}"#)]
    #[case(r#"{"choices":[{"message":{"role":"assistant","content":null}}]}"#)]
    #[case(r#"{"choices":[{"message":{"role":"assistant","content":"  "}}]}"#)]
    fn empty_replies_have_no_content(#[case] raw: &str) {
        let response: CompletionResponse =
            serde_json::from_str(raw).expect("response should deserialise");
        assert_eq!(response.into_content(), None);
    }
}
