//! Fixed parameters of the login flow.
//!
//! The country code is not user-selectable; every phone number entered in the
//! login view is prefixed with it before it reaches the identity backend.

use std::time::Duration;

/// Country-code prefix applied to every phone number.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Number of national digits a phone number must have.
pub const PHONE_DIGITS: usize = 10;

/// Number of digits in a one-time code.
pub const OTP_LENGTH: usize = 6;

/// Delay between reaching a terminal login state and navigating away.
pub const REDIRECT_DELAY: Duration = Duration::from_millis(1500);

pub const INVALID_PHONE_MESSAGE: &str = "Please enter a valid phone number";
pub const INCOMPLETE_CODE_MESSAGE: &str = "Please enter the full 6-digit code";
pub const INVALID_CODE_FALLBACK: &str = "Invalid OTP";

/// Parameters for a login view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginConfig {
    pub country_code: String,
    pub phone_digits: usize,
    pub otp_length: usize,
    pub redirect_delay: Duration,
}

impl Default for LoginConfig {
    fn default() -> Self {
        Self {
            country_code: DEFAULT_COUNTRY_CODE.to_string(),
            phone_digits: PHONE_DIGITS,
            otp_length: OTP_LENGTH,
            redirect_delay: REDIRECT_DELAY,
        }
    }
}
