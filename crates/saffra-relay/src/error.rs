//! # Relay Errors
//!
//! Everything that can go wrong once a form leaves the core.
//!
//! Details are for operators. Visitors only ever see one of two generic
//! messages via [`RelayError::user_message`]:
//!
//! ```text
//! ┌──────────────────────────┬──────────────────────────────────────────┐
//! │ Variant                  │ Visitor sees                             │
//! ├──────────────────────────┼──────────────────────────────────────────┤
//! │ Transport / Rejected /   │ RETRY_MESSAGE (+ contact details)        │
//! │ InvalidResponse          │                                          │
//! │ Config / Core            │ GENERIC_MESSAGE                          │
//! │ Invalid                  │ inline field errors (GENERIC_MESSAGE)    │
//! └──────────────────────────┴──────────────────────────────────────────┘
//! ```

use thiserror::Error;

use saffra_core::{CoreError, FieldErrors};

use crate::config::ConfigError;

/// Shown when the relay could not be reached or refused the submission.
pub const RETRY_MESSAGE: &str =
    "We couldn't send your message right now. Please try again in a moment or contact us directly.";

/// Shown for everything the visitor cannot fix by retrying.
pub const GENERIC_MESSAGE: &str = "Something went wrong. Please contact us directly.";

#[derive(Debug, Error)]
pub enum RelayError {
    /// Form failed validation; nothing was sent.
    #[error("Submission rejected by validation: {0}")]
    Invalid(FieldErrors),

    /// Misuse of the session, e.g. a double submit.
    #[error("Core error: {0}")]
    Core(CoreError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Connection, TLS or body decoding failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered, but not with success.
    #[error("Relay rejected the request (status {status}): {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: u16,
        message: Option<String>,
    },

    /// The endpoint answered with something we could not read.
    #[error("Invalid response from {endpoint}: {detail}")]
    InvalidResponse { endpoint: String, detail: String },
}

impl RelayError {
    /// Whether retrying the same submission could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RelayError::Transport(_) | RelayError::Rejected { .. } | RelayError::InvalidResponse { .. }
        )
    }

    /// The generic text shown to the visitor for this error.
    pub fn user_message(&self) -> &'static str {
        if self.is_retryable() {
            RETRY_MESSAGE
        } else {
            GENERIC_MESSAGE
        }
    }
}

impl From<CoreError> for RelayError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InvalidSubmission(errors) => RelayError::Invalid(errors),
            other => RelayError::Core(other),
        }
    }
}

pub type RelayResult<T> = Result<T, RelayError>;
