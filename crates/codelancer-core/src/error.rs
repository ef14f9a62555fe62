//! Error types for the assistant's external boundaries.

/// Failures talking to the generative-language service.
#[derive(Debug, thiserror::Error)]
pub enum ResponderError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("service returned status {0}")]
    Status(u16),
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Failures submitting the registration or contact form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} is not valid")]
    Invalid { field: &'static str },
    #[error("submission failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server rejected submission with status {0}")]
    Status(u16),
}

/// Failures loading a custom FAQ catalog.
#[derive(Debug, thiserror::Error)]
pub enum FaqError {
    #[error("could not read FAQ catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse FAQ catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("FAQ catalog is empty")]
    Empty,
    #[error("FAQ entry {0} has a blank question")]
    BlankQuestion(usize),
}
