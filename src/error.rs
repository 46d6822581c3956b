//! Error types for the rapid-fire quiz engine
//!
//! Only session construction and configuration loading can fail. Events
//! dispatched to a running engine are either applied or ignored.

use thiserror::Error;

/// Main error type for the quiz engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuizError {
    #[error("Session has no questions")]
    NoQuestions,

    #[error("Invalid question {id}: {reason}")]
    InvalidQuestion { id: String, reason: String },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::DeserializationError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<QuizError> for pyo3::PyErr {
    fn from(err: QuizError) -> pyo3::PyErr {
        use pyo3::exceptions::PyValueError;

        match err {
            QuizError::NoQuestions => PyValueError::new_err("Session has no questions"),
            QuizError::InvalidQuestion { id, reason } => {
                PyValueError::new_err(format!("Invalid question {}: {}", id, reason))
            }
            QuizError::InvalidConfig(msg) => {
                PyValueError::new_err(format!("Invalid config: {}", msg))
            }
            QuizError::DeserializationError(msg) => {
                PyValueError::new_err(format!("Deserialization error: {}", msg))
            }
        }
    }
}

/// Result type alias for the quiz engine
pub type Result<T> = std::result::Result<T, QuizError>;
