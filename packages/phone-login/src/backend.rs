// Collaborator traits for the views.
//
// Infrastructure only: the views decide what to call and when, implementations
// decide how. Naming convention follows Base* for trait names.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::IdentityError;
use crate::navigation::Route;

/// A session held by the identity backend.
///
/// The views only ever check whether one exists; the fields are carried for
/// diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub expires_at: Option<DateTime<Utc>>,
}

// =============================================================================
// Identity Backend Trait (Infrastructure - OTP auth + sessions)
// =============================================================================

#[async_trait]
pub trait BaseIdentityBackend: Send + Sync {
    /// Current session, if any. No side effects.
    async fn get_session(&self) -> Result<Option<Session>, IdentityError>;

    /// Send a one-time code to a full (country-code prefixed) phone number.
    async fn send_otp(&self, phone_number: &str) -> Result<(), IdentityError>;

    /// Check a one-time code against the most recent one sent to the number.
    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), IdentityError>;

    /// Invalidate the current session.
    async fn sign_out(&self) -> Result<(), IdentityError>;
}

// =============================================================================
// Navigator Trait (Infrastructure - routing)
// =============================================================================

pub trait BaseNavigator: Send + Sync {
    fn navigate_to(&self, route: Route);
}
