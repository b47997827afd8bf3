//! Supabase Auth error types.

use serde_json::Value;
use thiserror::Error;

/// Keys GoTrue uses for the human-readable part of an error body, in the
/// order they are checked.
const MESSAGE_KEYS: [&str; 4] = ["msg", "message", "error_description", "error"];

#[derive(Error, Debug)]
pub enum SupabaseError {
    /// Non-2xx response that carried a message
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Non-2xx response with no usable message in the body
    #[error("Supabase returned HTTP {status}")]
    ApiWithoutMessage { status: u16 },

    /// HTTP request error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (file session store)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SupabaseError {
    /// Build an error from a rejected response body.
    pub fn from_response_body(status: u16, body: &str) -> Self {
        match extract_message(body) {
            Some(message) => SupabaseError::Api { status, message },
            None => SupabaseError::ApiWithoutMessage { status },
        }
    }

    /// True if the server answered and refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            SupabaseError::Api { .. } | SupabaseError::ApiWithoutMessage { .. }
        )
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Api { status, .. } | SupabaseError::ApiWithoutMessage { status } => {
                Some(*status)
            }
            SupabaseError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    MESSAGE_KEYS.iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    })
}

/// Result type alias using SupabaseError.
pub type SupabaseResult<T> = Result<T, SupabaseError>;
