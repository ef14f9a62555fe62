pub mod ai;
pub mod chatbot;
pub mod config;
pub mod error;
pub mod fallback;
pub mod faq;
pub mod forms;
pub mod state;

// Re-export main types for convenience
pub use ai::{GeminiClient, LanguageModel};
pub use chatbot::{ChatBot, PendingReply, Responder};
pub use config::Config;
pub use error::{FaqError, FormError, ResponderError};
pub use fallback::{FallbackResponder, APOLOGY};
pub use faq::{FaqEntry, FaqList};
pub use forms::{ContactForm, FormClient, FormStatus, RegistrationForm, RegistrationWizard, WizardStep};
pub use state::{ChatEvent, Conversation, Message, Phase, Sender, GREETING};
