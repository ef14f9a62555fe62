pub mod gemini;

pub use gemini::GeminiClient;

use async_trait::async_trait;

use crate::error::ResponderError;

/// A text-generation backend the fallback responder can ask
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, ResponderError>;
}
