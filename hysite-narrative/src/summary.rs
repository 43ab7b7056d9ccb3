//! Narrative summaries of a scored site.

use hysite_core::{ChatCompletion, ChatMessage, CompletionError, NarrativeContext, NarrativeSource};

const ANALYST_PROMPT: &str = "You are an expert analyst. \
Given the factors (infrastructure and proximity, environment and land, economy and policy drivers) \
with weights and user preferences, generate a concise, structured summary and also give advice \
based on the recommendation request. Keep it balanced and grounded in provided context.";

/// Render the scores and request into the prompt body sent to the model.
#[must_use]
pub fn render_context(context: &NarrativeContext) -> String {
    let scores = &context.scores;
    let weights = &context.weights;
    format!(
        "average of scores from all factors (without user selected weights):\n{baseline}\n\n\
our ai system's recommended score:\n{model}\n\n\
Infrastructure and proximity factors based score (weight (user selected): {w_infra}):\n{infra}\n\n\
Environmental and land Factors based score (weight (user selected): {w_env}):\n{env}\n\n\
Economic and policy drivers Factor based score (weight (user selected): {w_econ}):\n{econ}\n\n\
overall aggregated score (considering user selected weights for different factors):\n{weighted}\n\n\
recommendation request:\n{description}\n",
        baseline = context.baseline_score,
        model = context.model_score,
        w_infra = weights.infrastructure,
        infra = scores.infrastructure,
        w_env = weights.environmental,
        env = scores.environmental,
        w_econ = weights.economic,
        econ = scores.economic,
        weighted = context.user_weighted_score,
        description = context.description,
    )
}

/// Writes site summaries through a chat completion backend.
///
/// Failures never propagate; they are rendered as an explanatory sentence in
/// place of the summary.
#[derive(Debug, Clone)]
pub struct NarrativeWriter<C> {
    client: C,
}

impl<C: ChatCompletion> NarrativeWriter<C> {
    /// Wrap a completion client.
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    /// Request a summary, surfacing the backend error.
    ///
    /// # Errors
    /// Returns the [`CompletionError`] reported by the backend.
    pub fn try_narrate(&self, context: &NarrativeContext) -> Result<String, CompletionError> {
        let messages = [
            ChatMessage::system(ANALYST_PROMPT),
            ChatMessage::user(render_context(context)),
        ];
        self.client.complete(&messages)
    }
}

impl<C: ChatCompletion> NarrativeSource for NarrativeWriter<C> {
    fn narrate(&self, context: &NarrativeContext) -> String {
        match self.try_narrate(context) {
            Ok(summary) => summary,
            Err(err @ CompletionError::MissingCredential { .. }) => {
                log::warn!("narrative skipped: {err}");
                format!("AI Summary unavailable: {err}")
            }
            Err(err) => {
                log::warn!("narrative generation failed: {err}");
                format!("AI Summary generation failed: {err}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hysite_core::test_support::ScriptedCompletion;
    use hysite_core::{CategoryWeights, ChatRole, FactorScores};
    use rstest::{fixture, rstest};

    #[fixture]
    fn context() -> NarrativeContext {
        NarrativeContext {
            scores: FactorScores::new(0.6, 0.3, 0.45),
            weights: CategoryWeights::new(2.0, 1.0, 0.5),
            baseline_score: 0.45,
            model_score: 0.52,
            user_weighted_score: 0.5,
            description: "Electrolyser near the port".to_owned(),
        }
    }

    #[rstest]
    fn context_lists_scores_weights_and_request(context: NarrativeContext) {
        let rendered = render_context(&context);
        assert!(rendered.contains("(weight (user selected): 2):\n0.6"));
        assert!(rendered.contains("(weight (user selected): 0.5):\n0.45"));
        assert!(rendered.contains("our ai system's recommended score:\n0.52"));
        assert!(rendered.ends_with("recommendation request:\nElectrolyser near the port\n"));
    }

    #[rstest]
    fn sends_system_prompt_then_context(context: NarrativeContext) {
        let client = ScriptedCompletion::replying(["A balanced site."]);
        let writer = NarrativeWriter::new(&client);
        assert_eq!(writer.narrate(&context), "A balanced site.");
        let requests = client.requests();
        let roles: Vec<_> = requests[0].iter().map(|message| message.role).collect();
        assert_eq!(roles, vec![ChatRole::System, ChatRole::User]);
    }

    #[rstest]
    fn missing_credential_is_explained(context: NarrativeContext) {
        let client = ScriptedCompletion::failing(CompletionError::MissingCredential {
            variable: "GROQ_API_KEY".to_owned(),
        });
        let summary = NarrativeWriter::new(client).narrate(&context);
        assert_eq!(
            summary,
            "AI Summary unavailable: GROQ_API_KEY not found in environment variables"
        );
    }

    #[rstest]
    fn backend_failure_is_explained(context: NarrativeContext) {
        let client = ScriptedCompletion::failing(CompletionError::EmptyResponse);
        let summary = NarrativeWriter::new(client).narrate(&context);
        assert_eq!(
            summary,
            "AI Summary generation failed: chat completion returned no content"
        );
    }
}
