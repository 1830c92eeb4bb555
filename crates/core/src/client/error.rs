use crate::domain::contract::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum FlowError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}{}", message_suffix(.message))]
    Server { status: u16, message: Option<String> },

    #[error("unexpected response: {detail}")]
    Decode { detail: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

fn message_suffix(message: &Option<String>) -> String {
    message.as_deref().map(|m| format!(": {m}")).unwrap_or_default()
}

impl FlowError {
    pub fn decode(detail: impl std::fmt::Display) -> Self {
        FlowError::Decode {
            detail: detail.to_string(),
        }
    }

    /// Text shown to the user. A server-supplied message wins, validation
    /// messages are shown as-is, everything else gets `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            FlowError::Server {
                message: Some(message),
                ..
            } => message.clone(),
            FlowError::Validation(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}
