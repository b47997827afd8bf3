// Production dependencies for the login app.
//
// The views only see `BaseIdentityBackend`; the Supabase client sits behind
// `SupabaseAdapter`.

use std::sync::Arc;

use async_trait::async_trait;
use phone_login::{BaseIdentityBackend, IdentityError, Session};
use supabase::{
    FileSessionStore, MemorySessionStore, SessionStore, SupabaseAuth, SupabaseError,
    SupabaseOptions,
};
use tracing::info;

use crate::config::Config;

// =============================================================================
// SupabaseAuth Adapter (implements BaseIdentityBackend trait)
// =============================================================================

/// Wrapper around SupabaseAuth that implements BaseIdentityBackend trait
pub struct SupabaseAdapter(pub Arc<SupabaseAuth>);

impl SupabaseAdapter {
    pub fn new(auth: Arc<SupabaseAuth>) -> Self {
        Self(auth)
    }
}

#[async_trait]
impl BaseIdentityBackend for SupabaseAdapter {
    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        let session = self.0.get_session().await.map_err(to_identity_error)?;
        Ok(session.map(|s| Session {
            user_id: s.user.id.to_string(),
            expires_at: s.expires_at,
        }))
    }

    async fn send_otp(&self, phone_number: &str) -> Result<(), IdentityError> {
        self.0
            .send_otp(phone_number)
            .await
            .map_err(to_identity_error)
    }

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), IdentityError> {
        self.0
            .verify_otp(phone_number, code)
            .await
            .map(|_| ())
            .map_err(to_identity_error)
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.0.sign_out().await.map_err(to_identity_error)
    }
}

pub fn to_identity_error(error: SupabaseError) -> IdentityError {
    match error {
        SupabaseError::Api { status, message } => IdentityError::Rejected {
            status: Some(status),
            message,
        },
        SupabaseError::ApiWithoutMessage { status } => IdentityError::Unexplained {
            status: Some(status),
        },
        SupabaseError::Http(e) if e.is_decode() => IdentityError::Decode(e.to_string()),
        SupabaseError::Http(e) => IdentityError::Network(e.to_string()),
        SupabaseError::Json(e) => IdentityError::Decode(e.to_string()),
        SupabaseError::Io(e) => IdentityError::Storage(e.to_string()),
    }
}

// =============================================================================
// AppDeps
// =============================================================================

/// Dependencies shared by every screen (using traits for testability)
#[derive(Clone)]
pub struct AppDeps {
    pub identity: Arc<dyn BaseIdentityBackend>,
}

impl AppDeps {
    pub fn new(identity: Arc<dyn BaseIdentityBackend>) -> Self {
        Self { identity }
    }

    /// Wire the Supabase client with the configured session store
    pub fn from_config(config: &Config) -> Self {
        let store: Arc<dyn SessionStore> = match &config.session_file {
            Some(path) => {
                info!(path = %path.display(), "Persisting session to file");
                Arc::new(FileSessionStore::new(path.clone()))
            }
            None => Arc::new(MemorySessionStore::new()),
        };

        let auth = SupabaseAuth::with_store(
            SupabaseOptions {
                url: config.supabase_url.clone(),
                anon_key: config.supabase_anon_key.clone(),
            },
            store,
        );

        Self::new(Arc::new(SupabaseAdapter::new(Arc::new(auth))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_keeps_backend_message() {
        let err = to_identity_error(SupabaseError::Api {
            status: 400,
            message: "Token has expired or is invalid".to_string(),
        });
        assert_eq!(
            err.message().as_deref(),
            Some("Token has expired or is invalid")
        );
    }

    #[test]
    fn test_rejection_without_message_has_no_message() {
        let err = to_identity_error(SupabaseError::ApiWithoutMessage { status: 403 });
        assert_eq!(err, IdentityError::Unexplained { status: Some(403) });
        assert_eq!(err.message(), None);
    }

    #[test]
    fn test_storage_failure_maps_to_storage_error() {
        let err = to_identity_error(SupabaseError::Io(std::io::Error::other("read-only")));
        assert!(matches!(err, IdentityError::Storage(_)));
    }

    #[tokio::test]
    async fn test_from_config_without_session_file_starts_signed_out() {
        let deps = AppDeps::from_config(&Config {
            supabase_url: "http://127.0.0.1:9".to_string(),
            supabase_anon_key: "anon".to_string(),
            session_file: None,
        });

        // No stored session, so no request is made
        assert_eq!(deps.identity.get_session().await.unwrap(), None);
    }
}
