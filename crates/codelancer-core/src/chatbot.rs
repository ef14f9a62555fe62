//! The chat widget's behaviour: FAQ lookup first, language model second,
//! every answer appended to a conversation owned by one widget instance.

use std::time::Duration;

use crate::faq::FaqList;
use crate::fallback::FallbackResponder;
use crate::state::{ChatEvent, Conversation, Message};

/// Resolves a question to an answer. Cheap to clone into a background task.
#[derive(Clone)]
pub struct Responder {
    faqs: FaqList,
    fallback: FallbackResponder,
    typing_delay: Duration,
}

impl Responder {
    pub fn new(faqs: FaqList, fallback: FallbackResponder) -> Self {
        Self {
            faqs,
            fallback,
            typing_delay: Duration::ZERO,
        }
    }

    /// Pause before canned answers so they don't appear instantly
    pub fn with_typing_delay(mut self, delay: Duration) -> Self {
        self.typing_delay = delay;
        self
    }

    pub fn faqs(&self) -> &FaqList {
        &self.faqs
    }

    pub async fn respond(&self, question: &str) -> String {
        if let Some(entry) = self.faqs.find(question) {
            tracing::debug!(question = %entry.question, "FAQ match");
            if !self.typing_delay.is_zero() {
                tokio::time::sleep(self.typing_delay).await;
            }
            return entry.answer.clone();
        }

        tracing::debug!("no FAQ match, asking language model");
        self.fallback.respond(question).await
    }
}

/// A submitted question whose answer hasn't been delivered yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingReply {
    pub epoch: u64,
    pub question: String,
}

pub struct ChatBot {
    responder: Responder,
    conversation: Conversation,
}

impl ChatBot {
    pub fn new(responder: Responder) -> Self {
        Self {
            responder,
            conversation: Conversation::new(),
        }
    }

    pub fn responder(&self) -> &Responder {
        &self.responder
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn is_awaiting(&self) -> bool {
        self.conversation.is_awaiting()
    }

    fn transition(&mut self, event: ChatEvent) {
        let conversation = std::mem::take(&mut self.conversation);
        self.conversation = conversation.apply(event);
    }

    /// Append the user's message and hand back what needs answering.
    ///
    /// Returns `None` when the text is blank or an answer is already pending.
    pub fn submit(&mut self, text: &str) -> Option<PendingReply> {
        if self.conversation.is_awaiting() {
            return None;
        }
        self.transition(ChatEvent::Submit(text.to_string()));
        self.conversation
            .pending_question()
            .map(|(epoch, question)| PendingReply {
                epoch,
                question: question.to_string(),
            })
    }

    /// Append the answer for `reply`. Returns false if it arrived after a reset.
    pub fn deliver(&mut self, reply: &PendingReply, answer: String) -> bool {
        let before = self.conversation.messages().len();
        self.transition(ChatEvent::Answer {
            epoch: reply.epoch,
            text: answer,
        });
        let delivered = self.conversation.messages().len() > before;
        if !delivered {
            tracing::debug!(epoch = reply.epoch, "discarding stale answer");
        }
        delivered
    }

    pub fn reset(&mut self) {
        self.transition(ChatEvent::Reset);
    }

    /// Submit and wait for the answer in one go
    pub async fn ask(&mut self, text: &str) -> Option<String> {
        let reply = self.submit(text)?;
        let answer = self.responder.respond(&reply.question).await;
        self.deliver(&reply, answer.clone());
        Some(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::GeminiClient;
    use crate::error::ResponderError;
    use crate::fallback::testing::ScriptedModel;
    use crate::fallback::APOLOGY;
    use crate::state::{Sender, GREETING};
    use std::sync::Arc;

    fn bot_with(fallback: FallbackResponder) -> ChatBot {
        ChatBot::new(Responder::new(FaqList::default(), fallback))
    }

    #[tokio::test]
    async fn test_exact_faq_answer() {
        let model = ScriptedModel::answering("should not be used");
        let mut bot = bot_with(FallbackResponder::new(model.clone()));

        let answer = bot.ask("How do I start my project?").await.unwrap();
        assert_eq!(
            answer,
            "Click the 'Start Your Project' button or contact us via the contact form."
        );
        assert_eq!(bot.messages().len(), 3);
        assert_eq!(bot.messages()[2], Message::bot(&answer));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn test_partial_question_answer() {
        let mut bot = bot_with(FallbackResponder::disabled());
        let answer = bot.ask("can you help with IEEE papers").await.unwrap();
        assert_eq!(
            answer,
            "Yes, we provide support for IEEE standard documentation and publication."
        );
    }

    #[tokio::test]
    async fn test_unmatched_question_network_failure() {
        let addr = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap();
        let client = GeminiClient::new("test-key").with_base_url(&format!("http://{}", addr));
        let mut bot = bot_with(FallbackResponder::new(Arc::new(client)));

        let answer = bot.ask("What's the weather today?").await.unwrap();
        assert_eq!(answer, APOLOGY);
        assert_eq!(bot.messages().last(), Some(&Message::bot(APOLOGY)));
        assert!(!bot.is_awaiting());
    }

    #[tokio::test]
    async fn test_unmatched_question_single_attempt() {
        let model = ScriptedModel::failing(ResponderError::Status(502));
        let mut bot = bot_with(FallbackResponder::new(model.clone()));

        assert_eq!(bot.ask("What's the weather today?").await.unwrap(), APOLOGY);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unmatched_question_uses_model_answer() {
        let model = ScriptedModel::answering("It's sunny in Vijayawada.");
        let mut bot = bot_with(FallbackResponder::new(model.clone()));

        let answer = bot.ask("What's the weather today?").await.unwrap();
        assert_eq!(answer, "It's sunny in Vijayawada.");
        assert!(model.prompts.lock().unwrap()[0].contains("What's the weather today?"));
    }

    #[tokio::test]
    async fn test_reset_after_exchanges() {
        let mut bot = bot_with(FallbackResponder::disabled());
        bot.ask("What services do you offer?").await;
        bot.ask("Where are you located?").await;
        assert_eq!(bot.messages().len(), 5);

        bot.reset();
        assert_eq!(bot.messages(), &[Message::bot(GREETING)]);
        assert!(bot.conversation().shows_shortcuts());
    }

    #[tokio::test]
    async fn test_blank_submit_leaves_transcript() {
        let mut bot = bot_with(FallbackResponder::disabled());
        assert!(bot.ask("   ").await.is_none());
        assert!(bot.submit("").is_none());
        assert_eq!(bot.messages().len(), 1);
    }

    #[test]
    fn test_second_submit_while_awaiting_is_noop() {
        let mut bot = bot_with(FallbackResponder::disabled());
        let reply = bot.submit("first").unwrap();
        assert!(bot.submit("second").is_none());
        assert_eq!(bot.messages().len(), 2);

        assert!(bot.deliver(&reply, "answer".to_string()));
        assert_eq!(bot.messages().len(), 3);
        assert!(bot.submit("second").is_some());
    }

    #[test]
    fn test_answer_after_reset_is_discarded() {
        let mut bot = bot_with(FallbackResponder::disabled());
        let stale = bot.submit("slow question").unwrap();
        bot.reset();

        let fresh = bot.submit("new question").unwrap();
        assert!(!bot.deliver(&stale, "late answer".to_string()));
        assert_eq!(bot.messages().len(), 2);
        assert_eq!(bot.messages()[1].sender, Sender::User);

        assert!(bot.deliver(&fresh, "on time".to_string()));
        assert_eq!(bot.messages().last(), Some(&Message::bot("on time")));
    }

    #[tokio::test]
    async fn test_typing_delay_applies_to_faq_answers() {
        let responder = Responder::new(FaqList::default(), FallbackResponder::disabled())
            .with_typing_delay(Duration::from_millis(50));

        let started = tokio::time::Instant::now();
        let answer = responder.respond("Do you offer mentoring?").await;
        assert!(answer.starts_with("Yes, we provide mentoring"));
        assert!(started.elapsed() >= Duration::from_millis(50));
    }
}
