// Supabase Auth (GoTrue) client for phone OTP sign-in.
//
// Covers the four calls a phone login needs: send a code, verify it, look up
// the current session (refreshing it when expired), and sign out. The session
// returned by a successful verification is kept in a `SessionStore`.

pub mod error;
pub mod models;
pub mod session_store;

use std::sync::Arc;

use chrono::{Duration, Utc};
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, info, warn};

pub use crate::error::{SupabaseError, SupabaseResult};
pub use crate::models::{SessionResponse, StoredSession, User};
pub use crate::session_store::{FileSessionStore, MemorySessionStore, SessionStore};

use crate::models::{OtpRequest, RefreshRequest, VerifyRequest};

/// Sessions expiring within this window are refreshed before use.
const EXPIRY_MARGIN_SECS: i64 = 10;

#[derive(Debug, Clone)]
pub struct SupabaseOptions {
    /// Project URL, e.g. `https://xyzcompany.supabase.co`
    pub url: String,
    /// Public anon key sent as `apikey` on every request
    pub anon_key: String,
}

pub struct SupabaseAuth {
    options: SupabaseOptions,
    http_client: Client,
    store: Arc<dyn SessionStore>,
}

impl SupabaseAuth {
    /// Client with an in-memory session store.
    pub fn new(options: SupabaseOptions) -> Self {
        Self::with_store(options, Arc::new(MemorySessionStore::new()))
    }

    pub fn with_store(options: SupabaseOptions, store: Arc<dyn SessionStore>) -> Self {
        Self {
            options,
            http_client: Client::new(),
            store,
        }
    }

    /// Ask the backend to text a one-time code to `phone`, creating the user
    /// if needed.
    pub async fn send_otp(&self, phone: &str) -> SupabaseResult<()> {
        let response = self
            .post("otp")
            .json(&OtpRequest {
                phone,
                create_user: true,
                channel: "sms",
            })
            .send()
            .await?;

        check_status(response, "Send OTP").await?;
        debug!("OTP requested");
        Ok(())
    }

    /// Exchange a code for a session and persist it.
    pub async fn verify_otp(&self, phone: &str, token: &str) -> SupabaseResult<StoredSession> {
        let response = self
            .post("verify")
            .json(&VerifyRequest {
                kind: "sms",
                phone,
                token,
            })
            .send()
            .await?;

        let data: SessionResponse = check_status(response, "Verify OTP").await?.json().await?;
        let session = StoredSession::from_response(data, Utc::now());
        self.store.save(&session)?;

        info!(user_id = %session.user.id, "Signed in with phone OTP");
        Ok(session)
    }

    /// Current session, if any.
    ///
    /// Only touches the network when the stored session is about to expire;
    /// if the backend refuses the refresh the local session is dropped.
    pub async fn get_session(&self) -> SupabaseResult<Option<StoredSession>> {
        let Some(session) = self.store.load()? else {
            return Ok(None);
        };

        if !session.expires_within(Duration::seconds(EXPIRY_MARGIN_SECS), Utc::now()) {
            return Ok(Some(session));
        }

        if session.refresh_token.is_empty() {
            warn!(user_id = %session.user.id, "Session expired without refresh token, clearing");
            self.store.clear()?;
            return Ok(None);
        }

        info!(user_id = %session.user.id, "Session expired, refreshing");
        match self.refresh(&session.refresh_token).await {
            Ok(refreshed) => {
                self.store.save(&refreshed)?;
                Ok(Some(refreshed))
            }
            Err(e) if e.is_rejection() => {
                warn!(error = %e, "Refresh rejected, clearing session");
                self.store.clear()?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// End the session on the server and forget it locally.
    ///
    /// The local session is removed even if the server call fails.
    pub async fn sign_out(&self) -> SupabaseResult<()> {
        let Some(session) = self.store.load()? else {
            debug!("Sign-out with no session");
            return Ok(());
        };

        let result = self.logout(&session.access_token).await;
        self.store.clear()?;

        match &result {
            Ok(()) => info!(user_id = %session.user.id, "Signed out"),
            Err(e) => warn!(user_id = %session.user.id, error = %e, "Server sign-out failed"),
        }
        result
    }

    async fn refresh(&self, refresh_token: &str) -> SupabaseResult<StoredSession> {
        let response = self
            .post("token?grant_type=refresh_token")
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let data: SessionResponse = check_status(response, "Token refresh").await?.json().await?;
        Ok(StoredSession::from_response(data, Utc::now()))
    }

    async fn logout(&self, access_token: &str) -> SupabaseResult<()> {
        let response = self.post("logout").bearer_auth(access_token).send().await?;
        check_status(response, "Sign out").await?;
        Ok(())
    }

    fn post(&self, path: &str) -> RequestBuilder {
        let url = format!(
            "{}/auth/v1/{}",
            self.options.url.trim_end_matches('/'),
            path
        );
        self.http_client
            .post(url)
            .header("apikey", &self.options.anon_key)
    }
}

async fn check_status(response: Response, operation: &str) -> SupabaseResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    warn!(status = %status, operation, "Supabase auth request rejected");
    Err(SupabaseError::from_response_body(status.as_u16(), &body))
}
