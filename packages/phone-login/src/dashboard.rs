//! Dashboard view: session guard and sign-out.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{BaseIdentityBackend, BaseNavigator};
use crate::error::{LoginError, LoginResult};
use crate::navigation::Route;

pub const DASHBOARD_TITLE: &str = "Welcome to Dashboard";
pub const DASHBOARD_SUBTITLE: &str = "You are successfully logged in.";
pub const SIGN_OUT_LABEL: &str = "Logout";

/// What the dashboard is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    /// Session check not done yet; nothing rendered.
    Checking,
    /// No session: sent back to the login view; nothing rendered.
    Redirecting,
    /// Session present: welcome screen rendered.
    Ready,
    /// Signed out and sent back to the login view.
    SignedOut,
}

impl DashboardState {
    /// Only a ready dashboard renders its content.
    pub fn shows_content(&self) -> bool {
        matches!(self, DashboardState::Ready)
    }
}

pub struct DashboardView {
    backend: Arc<dyn BaseIdentityBackend>,
    navigator: Arc<dyn BaseNavigator>,
    state: DashboardState,
}

impl DashboardView {
    pub fn new(backend: Arc<dyn BaseIdentityBackend>, navigator: Arc<dyn BaseNavigator>) -> Self {
        Self {
            backend,
            navigator,
            state: DashboardState::Checking,
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    /// Entry action: no session means back to login.
    pub async fn mount(&mut self) -> LoginResult<DashboardState> {
        if self.state != DashboardState::Checking {
            return Err(LoginError::AlreadyMounted);
        }

        let has_session = match self.backend.get_session().await {
            Ok(session) => session.is_some(),
            Err(e) => {
                warn!(error = %e, "Session lookup failed, treating as signed out");
                false
            }
        };

        if has_session {
            debug!("Session present, showing dashboard");
            self.state = DashboardState::Ready;
        } else {
            info!("No session, redirecting to login");
            self.state = DashboardState::Redirecting;
            self.navigator.navigate_to(Route::Login);
        }

        Ok(self.state)
    }

    /// Sign out and go back to login, whether or not the backend agreed.
    pub async fn sign_out(&mut self) -> LoginResult<DashboardState> {
        if self.state != DashboardState::Ready {
            return Err(LoginError::DashboardNotReady {
                action: "sign out",
                state: self.state,
            });
        }

        match self.backend.sign_out().await {
            Ok(()) => info!("Signed out"),
            Err(e) => warn!(error = %e, "Sign-out failed, leaving dashboard anyway"),
        }

        self.state = DashboardState::SignedOut;
        self.navigator.navigate_to(Route::Login);
        Ok(self.state)
    }
}
