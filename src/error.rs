//! Error taxonomy for controller operations.
//!
//! Every failure of a generate/refine operation is caught at the operation boundary and
//! turned into one transient, user-facing message via [`OpError::user_message`].

use crate::model::Operation;
use thiserror::Error;

/// Local precondition failures. No request is issued when one of these occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter a company name")]
    EmptyCompanyName,
    #[error("Please describe what to change")]
    EmptyRefinement,
}

#[derive(Debug, Error)]
pub enum OpError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Non-2xx response. `message` is the backend's `error` field when present.
    #[error("backend returned HTTP {status}")]
    Backend {
        status: u16,
        message: Option<String>,
    },

    #[error("network error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl OpError {
    /// The single message shown to the user for this failure of `op`.
    pub fn user_message(&self, op: Operation) -> String {
        match self {
            OpError::Validation(v) => v.to_string(),
            OpError::Backend {
                message: Some(msg), ..
            } if !msg.is_empty() => msg.clone(),
            OpError::Backend { .. } => op.fallback_message().to_string(),
            OpError::Transport(_) | OpError::Malformed(_) => format!("{}: {self}", op.fallback_message()),
        }
    }
}

impl From<reqwest::Error> for OpError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            OpError::Malformed(e.to_string())
        } else {
            OpError::Transport(e.to_string())
        }
    }
}
