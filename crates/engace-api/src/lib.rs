//! Typed client for the EngAce language-learning backend.
//!
//! [`ApiClient`] wraps `reqwest` with the backend's conventions (base URL,
//! bearer token, `{data, message, status, success}` envelopes) and hands out
//! one service per feature area. [`RequestTracker`] keeps the
//! loading/error/result bookkeeping a front-end needs around each call.

mod client;
mod consultation;
mod dictionary;
mod envelope;
mod exercises;
mod request;
mod token;
mod writing;

pub use client::{ApiClient, ClientConfig, Payload, DEFAULT_API_URL};
pub use consultation::{ConsultationService, ConversationHistory, Message};
pub use dictionary::{
    DictionaryService, SearchHistoryItem, Sense, Translation, WordDefinition,
};
pub use envelope::{Acknowledgement, Envelope, IntoData};
pub use exercises::{
    Answers, ExerciseParams, ExerciseService, ExerciseSet, ExerciseType, Question,
    SubmissionResult, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT,
};
pub use request::{
    Notifier, RequestOptions, RequestTracker, SilentNotifier, TracingNotifier, ERROR_TITLE,
    SUCCESS_TITLE,
};
pub use token::TokenStore;
pub use writing::{
    Draft, DraftId, FeedbackSection, QuestionAnswer, Subsection, WritingFeedback,
    WritingService, WritingSubmission,
};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Rejected on the client before any request was sent.
    #[error("{0}")]
    Validation(String),
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("unexpected non-JSON response: {0}")]
    UnexpectedContent(String),
    #[error("failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error("token storage error: {0}")]
    Storage(#[source] std::io::Error),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Returns the trimmed value, or a validation error naming the field when blank.
pub fn require<'v>(field: &str, value: &'v str) -> Result<&'v str, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::Validation(format!("{field} must not be empty")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_trims_and_rejects_blank() {
        assert_eq!(require("word", "  cat ").unwrap(), "cat");
        let error = require("word", " \t\n").unwrap_err();
        assert!(matches!(error, ApiError::Validation(_)));
        assert_eq!(error.to_string(), "word must not be empty");
    }

    #[test]
    fn not_found_is_derived_from_status() {
        let error = ApiError::Status {
            status: 404,
            message: "Word not found".to_string(),
        };
        assert!(error.is_not_found());
        assert_eq!(error.to_string(), "Word not found");
        assert!(!ApiError::Validation("x".into()).is_not_found());
    }
}
