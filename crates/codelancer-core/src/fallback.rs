//! Answers questions the FAQ catalog can't, by asking a language model.

use std::sync::Arc;

use crate::ai::LanguageModel;

/// Reply used whenever the language model can't produce an answer
pub const APOLOGY: &str =
    "Sorry, I don't have an answer for that right now. Please check our FAQ or contact us!";

/// Wrap a visitor's question with the assistant's persona and reply instructions
pub fn build_prompt(question: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str("You are the friendly assistant for thecodelancer, a team that helps ");
    prompt.push_str("B.Tech and M.Tech computer science students with final year projects, ");
    prompt.push_str("IEEE documentation, research paper writing, publication support and mentoring.\n\n");

    prompt.push_str("Visitor question: ");
    prompt.push_str(question.trim());

    prompt.push_str("\n\nReply in a concise, professional tone (two or three sentences). ");
    prompt.push_str("If the question is unrelated to our services, say so politely and ");
    prompt.push_str("suggest using the contact form.");

    prompt
}

/// Fallback for unmatched questions. Never fails; errors become [`APOLOGY`].
#[derive(Clone, Default)]
pub struct FallbackResponder {
    model: Option<Arc<dyn LanguageModel>>,
}

impl FallbackResponder {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model: Some(model) }
    }

    /// A responder with no model configured; always apologizes
    pub fn disabled() -> Self {
        Self { model: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.model.is_some()
    }

    /// One attempt, no retry, no caching.
    pub async fn respond(&self, question: &str) -> String {
        let Some(model) = &self.model else {
            tracing::warn!("no language model configured, replying with apology");
            return APOLOGY.to_string();
        };

        let prompt = build_prompt(question);
        match model.generate(&prompt).await {
            Ok(answer) => {
                let answer = answer.trim();
                if answer.is_empty() {
                    tracing::warn!("language model returned an empty answer");
                    APOLOGY.to_string()
                } else {
                    answer.to_string()
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "fallback answer failed");
                APOLOGY.to_string()
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedModel;
    use super::*;
    use crate::error::ResponderError;

    #[test]
    fn test_prompt_wraps_question() {
        let prompt = build_prompt("  Do you build IoT projects?  ");
        assert!(prompt.contains("thecodelancer"));
        assert!(prompt.contains("Visitor question: Do you build IoT projects?\n"));
        assert!(prompt.contains("concise, professional"));
    }

    #[tokio::test]
    async fn test_success_is_trimmed() {
        let model = ScriptedModel::answering("\n  Yes, we do IoT projects.  \n");
        let responder = FallbackResponder::new(model.clone());

        assert_eq!(responder.respond("iot?").await, "Yes, we do IoT projects.");
        assert_eq!(model.call_count(), 1);
        assert!(model.prompts.lock().unwrap()[0].contains("iot?"));
    }

    #[tokio::test]
    async fn test_failure_apologizes_after_single_attempt() {
        let model = ScriptedModel::failing(ResponderError::Status(500));
        let responder = FallbackResponder::new(model.clone());

        assert_eq!(responder.respond("anything").await, APOLOGY);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_malformed_apologizes() {
        let model = ScriptedModel::failing(ResponderError::Malformed("no text".to_string()));
        let responder = FallbackResponder::new(model);

        assert_eq!(responder.respond("anything").await, APOLOGY);
    }

    #[tokio::test]
    async fn test_blank_answer_apologizes() {
        let responder = FallbackResponder::new(ScriptedModel::answering("   "));
        assert_eq!(responder.respond("anything").await, APOLOGY);
    }

    #[tokio::test]
    async fn test_no_caching_between_identical_questions() {
        let model = ScriptedModel::answering("fresh");
        let responder = FallbackResponder::new(model.clone());

        responder.respond("same question").await;
        responder.respond("same question").await;
        assert_eq!(model.call_count(), 2);
    }

    #[tokio::test]
    async fn test_disabled_apologizes() {
        let responder = FallbackResponder::disabled();
        assert!(!responder.is_enabled());
        assert_eq!(responder.respond("anything").await, APOLOGY);
    }
}
