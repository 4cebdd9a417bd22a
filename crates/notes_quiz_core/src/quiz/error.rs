//! Errors raised by the quiz generation pipeline.

use crate::ports::PortError;

/// A failure in one stage of quiz generation. Any of these aborts the whole call.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("invalid conversation: {0}")]
    InvalidConversation(String),

    #[error("content aggregation failed: no notes found")]
    NoContentFound,

    #[error("content aggregation failed: could not list notes: {0}")]
    NoteLookup(#[source] PortError),

    #[error("model invocation failed: {0}")]
    ModelCallFailed(#[source] PortError),

    #[error("response extraction failed: {0}")]
    MalformedResponse(String),

    #[error("response extraction failed: {0} field is required")]
    MissingRequiredField(&'static str),
}

impl QuizError {
    /// The pipeline stage that produced the error.
    pub fn stage(&self) -> &'static str {
        match self {
            QuizError::InvalidConversation(_) => "conversation",
            QuizError::NoContentFound | QuizError::NoteLookup(_) => "content",
            QuizError::ModelCallFailed(_) => "model",
            QuizError::MalformedResponse(_) | QuizError::MissingRequiredField(_) => "extraction",
        }
    }
}

pub type QuizResult<T> = Result<T, QuizError>;
