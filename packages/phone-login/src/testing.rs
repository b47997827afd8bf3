// Mock collaborators for testing views without a real identity backend.
//
// Available to this crate's unit tests and, with the `testing` feature, to
// downstream crates.

use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use crate::backend::{BaseIdentityBackend, BaseNavigator, Session};
use crate::error::IdentityError;
use crate::navigation::Route;

// =============================================================================
// Mock Identity Backend
// =============================================================================

/// A call received by the mock backend, with its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    GetSession,
    SendOtp { phone_number: String },
    VerifyOtp { phone_number: String, code: String },
    SignOut,
}

/// Identity backend with scripted failures and call recording.
///
/// Queued errors are consumed one per call; once a queue is empty the call
/// succeeds. A successful `verify_otp` creates a session and `sign_out`
/// removes it, so views that re-query see the change.
pub struct MockIdentityBackend {
    session: Arc<Mutex<Option<Session>>>,
    session_errors: Arc<Mutex<Vec<IdentityError>>>,
    send_otp_errors: Arc<Mutex<Vec<IdentityError>>>,
    verify_otp_errors: Arc<Mutex<Vec<IdentityError>>>,
    sign_out_errors: Arc<Mutex<Vec<IdentityError>>>,
    calls: Arc<Mutex<Vec<BackendCall>>>,
}

impl MockIdentityBackend {
    pub fn new() -> Self {
        Self {
            session: Arc::new(Mutex::new(None)),
            session_errors: Arc::new(Mutex::new(Vec::new())),
            send_otp_errors: Arc::new(Mutex::new(Vec::new())),
            verify_otp_errors: Arc::new(Mutex::new(Vec::new())),
            sign_out_errors: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Start with an existing session for `user_id`
    pub fn with_session(self, user_id: &str) -> Self {
        *self.session.lock().unwrap() = Some(Session {
            user_id: user_id.to_string(),
            expires_at: None,
        });
        self
    }

    pub fn with_session_error(self, error: IdentityError) -> Self {
        self.session_errors.lock().unwrap().push(error);
        self
    }

    pub fn with_send_otp_error(self, error: IdentityError) -> Self {
        self.send_otp_errors.lock().unwrap().push(error);
        self
    }

    pub fn with_verify_otp_error(self, error: IdentityError) -> Self {
        self.verify_otp_errors.lock().unwrap().push(error);
        self
    }

    pub fn with_sign_out_error(self, error: IdentityError) -> Self {
        self.sign_out_errors.lock().unwrap().push(error);
        self
    }

    /// Get all calls in the order they were made
    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Phone numbers passed to `send_otp`
    pub fn send_otp_calls(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                BackendCall::SendOtp { phone_number } => Some(phone_number.clone()),
                _ => None,
            })
            .collect()
    }

    /// (phone number, code) pairs passed to `verify_otp`
    pub fn verify_otp_calls(&self) -> Vec<(String, String)> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                BackendCall::VerifyOtp { phone_number, code } => {
                    Some((phone_number.clone(), code.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn has_session(&self) -> bool {
        self.session.lock().unwrap().is_some()
    }

    fn record(&self, call: BackendCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_error(queue: &Mutex<Vec<IdentityError>>) -> Option<IdentityError> {
        let mut queue = queue.lock().unwrap();
        if queue.is_empty() {
            None
        } else {
            Some(queue.remove(0))
        }
    }
}

impl Default for MockIdentityBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseIdentityBackend for MockIdentityBackend {
    async fn get_session(&self) -> Result<Option<Session>, IdentityError> {
        self.record(BackendCall::GetSession);
        if let Some(error) = Self::next_error(&self.session_errors) {
            return Err(error);
        }
        Ok(self.session.lock().unwrap().clone())
    }

    async fn send_otp(&self, phone_number: &str) -> Result<(), IdentityError> {
        self.record(BackendCall::SendOtp {
            phone_number: phone_number.to_string(),
        });
        match Self::next_error(&self.send_otp_errors) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn verify_otp(&self, phone_number: &str, code: &str) -> Result<(), IdentityError> {
        self.record(BackendCall::VerifyOtp {
            phone_number: phone_number.to_string(),
            code: code.to_string(),
        });
        if let Some(error) = Self::next_error(&self.verify_otp_errors) {
            return Err(error);
        }
        *self.session.lock().unwrap() = Some(Session {
            user_id: format!("user:{}", phone_number),
            expires_at: None,
        });
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), IdentityError> {
        self.record(BackendCall::SignOut);
        if let Some(error) = Self::next_error(&self.sign_out_errors) {
            return Err(error);
        }
        *self.session.lock().unwrap() = None;
        Ok(())
    }
}

// =============================================================================
// Recording Navigator
// =============================================================================

/// Navigator that remembers every route it was sent to
pub struct RecordingNavigator {
    routes: Arc<Mutex<Vec<Route>>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self {
            routes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }

    pub fn last_route(&self) -> Option<Route> {
        self.routes.lock().unwrap().last().copied()
    }
}

impl Default for RecordingNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl BaseNavigator for RecordingNavigator {
    fn navigate_to(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}
