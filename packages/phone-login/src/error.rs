//! Error types for the login and dashboard views.

use thiserror::Error;

use crate::dashboard::DashboardState;
use crate::machine::LoginStep;

/// Failure reported by the identity backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The backend refused the request and said why.
    #[error("{message}")]
    Rejected {
        status: Option<u16>,
        message: String,
    },

    /// The backend refused the request without a usable message.
    #[error("Request rejected by identity backend")]
    Unexplained { status: Option<u16> },

    /// The backend could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with something we could not understand.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The locally persisted session could not be read or written.
    #[error("Session storage error: {0}")]
    Storage(String),
}

impl IdentityError {
    /// Message worth showing to the user, if the failure carries one.
    ///
    /// A rejection without a (non-blank) message yields `None` so callers can
    /// substitute their own wording.
    pub fn message(&self) -> Option<String> {
        match self {
            IdentityError::Rejected { message, .. } if !message.trim().is_empty() => {
                Some(message.clone())
            }
            IdentityError::Rejected { .. } | IdentityError::Unexplained { .. } => None,
            IdentityError::Network(_) | IdentityError::Decode(_) | IdentityError::Storage(_) => {
                Some(self.to_string())
            }
        }
    }

    /// Text shown to the user for this failure, never empty.
    ///
    /// Failures without a message of their own get the generic rejection text.
    pub fn user_message(&self) -> String {
        self.message()
            .unwrap_or_else(|| IdentityError::Unexplained { status: None }.to_string())
    }
}

/// Misuse of a view: an action that is not valid in the current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    #[error("Cannot {action} while in {step:?}")]
    InvalidTransition {
        action: &'static str,
        step: LoginStep,
    },

    #[error("Cannot {action} while the dashboard is {state:?}")]
    DashboardNotReady {
        action: &'static str,
        state: DashboardState,
    },

    #[error("Cannot {action} while a request is in flight")]
    Busy { action: &'static str },

    #[error("View has already been mounted")]
    AlreadyMounted,

    #[error("Cannot {action} before the view is mounted")]
    NotMounted { action: &'static str },
}

/// Result type alias using LoginError.
pub type LoginResult<T> = Result<T, LoginError>;
