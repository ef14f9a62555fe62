//! UI-agnostic conversation state
//!
//! The transcript and its pending-answer flag are advanced by a pure
//! `(Conversation, ChatEvent) -> Conversation` transition, so any front-end
//! (TUI, web, tests) can drive the same state machine and render it however
//! it likes.

use serde::{Deserialize, Serialize};

/// Greeting every conversation starts from
pub const GREETING: &str =
    "Hi! How can I help you today? Please select a question below or type your own.";

/// A chat message in the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn user(text: &str) -> Self {
        Self {
            sender: Sender::User,
            text: text.to_string(),
        }
    }

    pub fn bot(text: &str) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.to_string(),
        }
    }
}

/// Who sent a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// A user message is waiting for its answer
    Awaiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatEvent {
    Submit(String),
    /// An answer resolved for the question submitted in `epoch`
    Answer { epoch: u64, text: String },
    Reset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    messages: Vec<Message>,
    phase: Phase,
    // Bumped on every reset; answers carrying an older epoch are stale
    epoch: u64,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::bot(GREETING)],
            phase: Phase::Idle,
            epoch: 0,
        }
    }

    pub fn apply(mut self, event: ChatEvent) -> Self {
        match event {
            ChatEvent::Submit(text) => {
                if text.trim().is_empty() || self.phase == Phase::Awaiting {
                    return self;
                }
                self.messages.push(Message {
                    sender: Sender::User,
                    text,
                });
                self.phase = Phase::Awaiting;
            }
            ChatEvent::Answer { epoch, text } => {
                if self.phase != Phase::Awaiting || epoch != self.epoch {
                    return self;
                }
                self.messages.push(Message {
                    sender: Sender::Bot,
                    text,
                });
                self.phase = Phase::Idle;
            }
            ChatEvent::Reset => {
                self.messages.clear();
                self.messages.push(Message::bot(GREETING));
                self.phase = Phase::Idle;
                self.epoch = self.epoch.wrapping_add(1);
            }
        }
        self
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_awaiting(&self) -> bool {
        self.phase == Phase::Awaiting
    }

    /// The question waiting for an answer, with the epoch to answer it under
    pub fn pending_question(&self) -> Option<(u64, &str)> {
        if !self.is_awaiting() {
            return None;
        }
        self.messages
            .last()
            .filter(|m| m.sender == Sender::User)
            .map(|m| (self.epoch, m.text.as_str()))
    }

    /// Canned-question shortcuts are only offered on a fresh conversation
    pub fn shows_shortcuts(&self) -> bool {
        self.messages.len() == 1
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(text: &str) -> Conversation {
        Conversation::new().apply(ChatEvent::Submit(text.to_string()))
    }

    #[test]
    fn test_initial_state() {
        let conv = Conversation::new();
        assert_eq!(conv.messages(), &[Message::bot(GREETING)]);
        assert_eq!(conv.phase(), Phase::Idle);
        assert!(conv.shows_shortcuts());
        assert!(conv.pending_question().is_none());
    }

    #[test]
    fn test_submit_enters_awaiting() {
        let conv = submitted("Hello");
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.messages()[1], Message::user("Hello"));
        assert!(conv.is_awaiting());
        assert_eq!(conv.pending_question(), Some((0, "Hello")));
        assert!(!conv.shows_shortcuts());
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        for blank in ["", " ", "\t\n", "   \r\n  "] {
            let conv = Conversation::new().apply(ChatEvent::Submit(blank.to_string()));
            assert_eq!(conv, Conversation::new());
        }
    }

    #[test]
    fn test_submit_while_awaiting_is_ignored() {
        let conv = submitted("first").apply(ChatEvent::Submit("second".to_string()));
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.pending_question(), Some((0, "first")));
    }

    #[test]
    fn test_answer_returns_to_idle() {
        let conv = submitted("Hello").apply(ChatEvent::Answer {
            epoch: 0,
            text: "Hi!".to_string(),
        });
        assert_eq!(conv.messages().last(), Some(&Message::bot("Hi!")));
        assert_eq!(conv.phase(), Phase::Idle);
    }

    #[test]
    fn test_answer_while_idle_is_discarded() {
        let conv = Conversation::new().apply(ChatEvent::Answer {
            epoch: 0,
            text: "unsolicited".to_string(),
        });
        assert_eq!(conv, Conversation::new());
    }

    #[test]
    fn test_reset_from_any_state() {
        let idle = submitted("a")
            .apply(ChatEvent::Answer { epoch: 0, text: "b".to_string() })
            .apply(ChatEvent::Reset);
        assert_eq!(idle.messages(), &[Message::bot(GREETING)]);
        assert_eq!(idle.phase(), Phase::Idle);

        let awaiting = submitted("a").apply(ChatEvent::Reset);
        assert_eq!(awaiting.messages().len(), 1);
        assert!(!awaiting.is_awaiting());
    }

    #[test]
    fn test_late_answer_after_reset_is_discarded() {
        // Reset mid-flight, then ask something new before the old answer lands
        let conv = submitted("old question")
            .apply(ChatEvent::Reset)
            .apply(ChatEvent::Submit("new question".to_string()))
            .apply(ChatEvent::Answer { epoch: 0, text: "old answer".to_string() });

        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.pending_question(), Some((1, "new question")));

        let conv = conv.apply(ChatEvent::Answer { epoch: 1, text: "new answer".to_string() });
        assert_eq!(conv.messages().last(), Some(&Message::bot("new answer")));
    }

    #[test]
    fn test_sender_serializes_lowercase() {
        let json = serde_json::to_string(&Message::user("hi")).unwrap();
        assert_eq!(json, r#"{"sender":"user","text":"hi"}"#);
    }
}
