//! Login view: drives the login machine against the identity backend.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::backend::{BaseIdentityBackend, BaseNavigator};
use crate::config::LoginConfig;
use crate::error::{LoginError, LoginResult};
use crate::machine::{LoginCommand, LoginEvent, LoginMachine, LoginState, LoginStep};
use crate::phone::mask_phone_number;
use crate::redirect::ScheduledRedirect;

/// A mounted (or about to be mounted) login screen.
///
/// Dropping the view unmounts it and cancels any pending redirect.
pub struct LoginView {
    machine: LoginMachine,
    backend: Arc<dyn BaseIdentityBackend>,
    navigator: Arc<dyn BaseNavigator>,
    redirect: Option<ScheduledRedirect>,
    mounted: bool,
}

impl LoginView {
    pub fn new(backend: Arc<dyn BaseIdentityBackend>, navigator: Arc<dyn BaseNavigator>) -> Self {
        Self::with_config(LoginConfig::default(), backend, navigator)
    }

    pub fn with_config(
        config: LoginConfig,
        backend: Arc<dyn BaseIdentityBackend>,
        navigator: Arc<dyn BaseNavigator>,
    ) -> Self {
        Self {
            machine: LoginMachine::with_config(config),
            backend,
            navigator,
            redirect: None,
            mounted: false,
        }
    }

    pub fn state(&self) -> &LoginState {
        self.machine.state()
    }

    pub fn step(&self) -> LoginStep {
        self.machine.state().step
    }

    /// True while a redirect is scheduled and has not fired yet.
    pub fn redirect_pending(&self) -> bool {
        self.redirect
            .as_ref()
            .map(ScheduledRedirect::is_pending)
            .unwrap_or(false)
    }

    /// Entry action: look for an existing session.
    ///
    /// A failed lookup is treated as "no session".
    pub async fn mount(&mut self) -> LoginResult<LoginStep> {
        if self.mounted {
            return Err(LoginError::AlreadyMounted);
        }
        self.mounted = true;

        let event = match self.backend.get_session().await {
            Ok(Some(session)) => {
                info!(user_id = %session.user_id, "Existing session found, skipping login");
                LoginEvent::SessionFound
            }
            Ok(None) => {
                debug!("No existing session");
                LoginEvent::SessionMissing
            }
            Err(e) => {
                warn!(error = %e, "Session lookup failed, showing login");
                LoginEvent::SessionMissing
            }
        };

        self.dispatch(event).await?;
        Ok(self.step())
    }

    /// Replace the phone input; returns the sanitised value.
    pub fn set_phone_input(&mut self, raw: &str) -> LoginResult<&str> {
        self.expect_mounted("edit phone number")?;
        self.machine
            .decide(&LoginEvent::PhoneEdited(raw.to_string()))?;
        Ok(&self.machine.state().phone)
    }

    /// Replace the code input; returns the sanitised value.
    pub fn set_code_input(&mut self, raw: &str) -> LoginResult<&str> {
        self.expect_mounted("edit code")?;
        self.machine
            .decide(&LoginEvent::CodeEdited(raw.to_string()))?;
        Ok(&self.machine.state().code)
    }

    pub async fn submit_phone(&mut self) -> LoginResult<LoginStep> {
        self.expect_mounted("submit phone")?;
        self.dispatch(LoginEvent::PhoneSubmitted).await?;
        Ok(self.step())
    }

    pub async fn submit_code(&mut self) -> LoginResult<LoginStep> {
        self.expect_mounted("submit code")?;
        self.dispatch(LoginEvent::CodeSubmitted).await?;
        Ok(self.step())
    }

    /// Go back from code entry to phone entry, clearing both inputs.
    pub fn change_phone_number(&mut self) -> LoginResult<()> {
        self.expect_mounted("change phone number")?;
        self.machine.decide(&LoginEvent::ChangePhoneRequested)?;
        debug!("Login flow restarted");
        Ok(())
    }

    fn expect_mounted(&self, action: &'static str) -> LoginResult<()> {
        if !self.mounted {
            return Err(LoginError::NotMounted { action });
        }
        Ok(())
    }

    /// Apply an event and run every command it leads to.
    async fn dispatch(&mut self, event: LoginEvent) -> LoginResult<()> {
        let mut next = self.machine.decide(&event)?;
        while let Some(command) = next {
            next = self.execute(command).await?;
        }
        Ok(())
    }

    async fn execute(&mut self, command: LoginCommand) -> LoginResult<Option<LoginCommand>> {
        match command {
            LoginCommand::SendOtp { phone_number } => {
                let masked = mask_phone_number(&phone_number);
                let event = match self.backend.send_otp(&phone_number).await {
                    Ok(()) => {
                        info!(phone = %masked, "OTP sent");
                        LoginEvent::OtpSent
                    }
                    Err(e) => {
                        warn!(phone = %masked, error = %e, "Failed to send OTP");
                        LoginEvent::OtpSendFailed {
                            message: e.user_message(),
                        }
                    }
                };
                self.machine.decide(&event)
            }
            LoginCommand::VerifyOtp { phone_number, code } => {
                let masked = mask_phone_number(&phone_number);
                let event = match self.backend.verify_otp(&phone_number, &code).await {
                    Ok(()) => {
                        info!(phone = %masked, "OTP verified");
                        LoginEvent::OtpVerified
                    }
                    Err(e) => {
                        warn!(phone = %masked, error = %e, "OTP verification failed");
                        LoginEvent::OtpRejected {
                            message: e.message(),
                        }
                    }
                };
                self.machine.decide(&event)
            }
            LoginCommand::ScheduleRedirect { route, delay } => {
                self.redirect = Some(ScheduledRedirect::spawn(
                    self.navigator.clone(),
                    route,
                    delay,
                ));
                Ok(None)
            }
        }
    }
}
