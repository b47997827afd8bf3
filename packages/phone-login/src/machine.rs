//! Login view state machine.
//!
//! ## State Diagram
//!
//! ```text
//!                      SessionFound
//! ┌─────────────────┐ ─────────────────────► ┌──────────────────────┐
//! │   PhoneEntry    │ (initial)              │ AlreadyAuthenticated │ ──► /dashboard
//! └────────┬────────┘                        └──────────────────────┘
//!          │ PhoneSubmitted → OtpSent
//!          ▼          ▲
//! ┌─────────────────┐ │ ChangePhoneRequested
//! │    OtpEntry     │─┘
//! └────────┬────────┘
//!          │ CodeSubmitted → OtpVerified
//!          ▼
//! ┌─────────────────┐
//! │     Success     │ ──► /dashboard
//! └─────────────────┘
//! ```
//!
//! The machine is synchronous and does no IO. Submissions produce commands
//! (`SendOtp`, `VerifyOtp`) that the view executes; the outcome comes back as
//! another event. Terminal states produce a `ScheduleRedirect` command.

use std::time::Duration;

use crate::config::{
    LoginConfig, INCOMPLETE_CODE_MESSAGE, INVALID_CODE_FALLBACK, INVALID_PHONE_MESSAGE,
};
use crate::error::{LoginError, LoginResult};
use crate::navigation::Route;
use crate::phone::{digits_only, full_phone_number};

/// Which screen of the login flow is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoginStep {
    PhoneEntry,
    OtpEntry,
    Success,
    AlreadyAuthenticated,
}

impl LoginStep {
    /// Terminal steps navigate away and are never left.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoginStep::Success | LoginStep::AlreadyAuthenticated)
    }

    pub fn title(&self) -> &'static str {
        match self {
            LoginStep::PhoneEntry | LoginStep::AlreadyAuthenticated => "Welcome Back",
            LoginStep::OtpEntry => "Verify Identity",
            LoginStep::Success => "Success!",
        }
    }
}

/// Everything the login screen renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginState {
    pub step: LoginStep,
    /// National digits only, never more than the configured length.
    pub phone: String,
    /// Digits only, never more than the configured length.
    pub code: String,
    pub error: Option<String>,
    pub loading: bool,
}

impl Default for LoginState {
    fn default() -> Self {
        Self {
            step: LoginStep::PhoneEntry,
            phone: String::new(),
            code: String::new(),
            error: None,
            loading: false,
        }
    }
}

impl LoginState {
    pub fn subtitle(&self) -> String {
        match self.step {
            LoginStep::PhoneEntry => "Enter your phone number to continue".to_string(),
            LoginStep::AlreadyAuthenticated => "You are already logged in".to_string(),
            LoginStep::OtpEntry => format!("Enter the code sent to {}", self.phone),
            LoginStep::Success => "Redirecting to dashboard...".to_string(),
        }
    }
}

/// Login events - user actions and backend outcomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginEvent {
    /// Session check on mount found a session
    SessionFound,
    /// Session check on mount found nothing
    SessionMissing,

    PhoneEdited(String),
    CodeEdited(String),

    PhoneSubmitted,
    OtpSent,
    OtpSendFailed { message: String },

    CodeSubmitted,
    OtpVerified,
    /// Verification failed; `None` when the backend gave no reason
    OtpRejected { message: Option<String> },

    ChangePhoneRequested,
}

/// Login commands - IO the view must perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginCommand {
    SendOtp { phone_number: String },
    VerifyOtp { phone_number: String, code: String },
    ScheduleRedirect { route: Route, delay: Duration },
}

/// Login machine - applies events to the view state and decides on commands
#[derive(Debug, Clone)]
pub struct LoginMachine {
    config: LoginConfig,
    state: LoginState,
}

impl LoginMachine {
    pub fn new() -> Self {
        Self::with_config(LoginConfig::default())
    }

    pub fn with_config(config: LoginConfig) -> Self {
        Self {
            config,
            state: LoginState::default(),
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    pub fn config(&self) -> &LoginConfig {
        &self.config
    }

    /// Country-code prefixed phone number for backend calls.
    pub fn full_phone_number(&self) -> String {
        full_phone_number(&self.config.country_code, &self.state.phone)
    }

    pub fn decide(&mut self, event: &LoginEvent) -> LoginResult<Option<LoginCommand>> {
        match event {
            LoginEvent::SessionFound => {
                self.expect_step(LoginStep::PhoneEntry, "enter already-authenticated")?;
                self.state.step = LoginStep::AlreadyAuthenticated;
                Ok(Some(self.redirect_to_dashboard()))
            }
            LoginEvent::SessionMissing => {
                self.expect_step(LoginStep::PhoneEntry, "stay on phone entry")?;
                Ok(None)
            }

            LoginEvent::PhoneEdited(raw) => {
                self.expect_step(LoginStep::PhoneEntry, "edit phone number")?;
                self.expect_idle("edit phone number")?;
                self.state.phone = digits_only(raw, self.config.phone_digits);
                Ok(None)
            }
            LoginEvent::CodeEdited(raw) => {
                self.expect_step(LoginStep::OtpEntry, "edit code")?;
                self.expect_idle("edit code")?;
                self.state.code = digits_only(raw, self.config.otp_length);
                Ok(None)
            }

            LoginEvent::PhoneSubmitted => {
                self.expect_step(LoginStep::PhoneEntry, "submit phone")?;
                self.expect_idle("submit phone")?;
                self.state.error = None;

                if self.state.phone.len() < self.config.phone_digits {
                    self.state.error = Some(INVALID_PHONE_MESSAGE.to_string());
                    return Ok(None);
                }

                self.state.loading = true;
                Ok(Some(LoginCommand::SendOtp {
                    phone_number: self.full_phone_number(),
                }))
            }
            LoginEvent::OtpSent => {
                self.expect_step(LoginStep::PhoneEntry, "complete send-OTP")?;
                self.expect_in_flight("complete send-OTP")?;
                self.state.loading = false;
                self.state.step = LoginStep::OtpEntry;
                Ok(None)
            }
            LoginEvent::OtpSendFailed { message } => {
                self.expect_step(LoginStep::PhoneEntry, "fail send-OTP")?;
                self.expect_in_flight("fail send-OTP")?;
                self.state.loading = false;
                self.state.error = Some(message.clone());
                Ok(None)
            }

            LoginEvent::CodeSubmitted => {
                self.expect_step(LoginStep::OtpEntry, "submit code")?;
                self.expect_idle("submit code")?;
                self.state.error = None;

                if self.state.code.len() < self.config.otp_length {
                    self.state.error = Some(INCOMPLETE_CODE_MESSAGE.to_string());
                    return Ok(None);
                }

                self.state.loading = true;
                Ok(Some(LoginCommand::VerifyOtp {
                    phone_number: self.full_phone_number(),
                    code: self.state.code.clone(),
                }))
            }
            LoginEvent::OtpVerified => {
                self.expect_step(LoginStep::OtpEntry, "complete verification")?;
                self.expect_in_flight("complete verification")?;
                self.state.loading = false;
                self.state.step = LoginStep::Success;
                Ok(Some(self.redirect_to_dashboard()))
            }
            LoginEvent::OtpRejected { message } => {
                self.expect_step(LoginStep::OtpEntry, "fail verification")?;
                self.expect_in_flight("fail verification")?;
                self.state.loading = false;
                let message = message
                    .as_deref()
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .unwrap_or(INVALID_CODE_FALLBACK);
                self.state.error = Some(message.to_string());
                Ok(None)
            }

            LoginEvent::ChangePhoneRequested => {
                self.expect_step(LoginStep::OtpEntry, "change phone number")?;
                self.expect_idle("change phone number")?;
                // Full restart: the phone number goes too.
                self.state = LoginState::default();
                Ok(None)
            }
        }
    }

    fn redirect_to_dashboard(&self) -> LoginCommand {
        LoginCommand::ScheduleRedirect {
            route: Route::Dashboard,
            delay: self.config.redirect_delay,
        }
    }

    fn expect_step(&self, step: LoginStep, action: &'static str) -> LoginResult<()> {
        if self.state.step != step {
            return Err(LoginError::InvalidTransition {
                action,
                step: self.state.step,
            });
        }
        Ok(())
    }

    fn expect_idle(&self, action: &'static str) -> LoginResult<()> {
        if self.state.loading {
            return Err(LoginError::Busy { action });
        }
        Ok(())
    }

    fn expect_in_flight(&self, action: &'static str) -> LoginResult<()> {
        if !self.state.loading {
            return Err(LoginError::InvalidTransition {
                action,
                step: self.state.step,
            });
        }
        Ok(())
    }
}

impl Default for LoginMachine {
    fn default() -> Self {
        Self::new()
    }
}
