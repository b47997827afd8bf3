//! User input for the screens.

use anyhow::{Context, Result};
use async_trait::async_trait;
use dialoguer::{theme::ColorfulTheme, Input, Select};

/// What the user typed at the phone prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhoneInput {
    Submit(String),
    Quit,
}

/// What the user typed at the code prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeInput {
    Submit(String),
    ChangePhone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    SignOut,
    Quit,
}

#[async_trait]
pub trait Prompter: Send + Sync {
    async fn phone_number(&self, country_code: &str) -> Result<PhoneInput>;
    async fn otp_code(&self, otp_length: usize) -> Result<CodeInput>;
    async fn dashboard_action(&self, sign_out_label: &str) -> Result<DashboardAction>;
}

/// Interactive prompts on the controlling terminal.
///
/// dialoguer blocks, so every prompt runs on the blocking pool.
pub struct TerminalPrompter;

const QUIT_KEY: &str = "q";
const CHANGE_PHONE_KEY: &str = "c";

#[async_trait]
impl Prompter for TerminalPrompter {
    async fn phone_number(&self, country_code: &str) -> Result<PhoneInput> {
        let prompt = format!("Phone Number {} ({} to quit)", country_code, QUIT_KEY);
        let input = read_line(prompt).await?;

        if input.trim().eq_ignore_ascii_case(QUIT_KEY) {
            Ok(PhoneInput::Quit)
        } else {
            Ok(PhoneInput::Submit(input))
        }
    }

    async fn otp_code(&self, otp_length: usize) -> Result<CodeInput> {
        let prompt = format!(
            "{}-digit code ({} to change phone number)",
            otp_length, CHANGE_PHONE_KEY
        );
        let input = read_line(prompt).await?;

        if input.trim().eq_ignore_ascii_case(CHANGE_PHONE_KEY) {
            Ok(CodeInput::ChangePhone)
        } else {
            Ok(CodeInput::Submit(input))
        }
    }

    async fn dashboard_action(&self, sign_out_label: &str) -> Result<DashboardAction> {
        let items = vec![sign_out_label.to_string(), "Quit".to_string()];
        let selection = tokio::task::spawn_blocking(move || {
            Select::with_theme(&ColorfulTheme::default())
                .with_prompt("What would you like to do?")
                .items(&items)
                .default(0)
                .interact()
        })
        .await
        .context("Prompt task failed")??;

        Ok(match selection {
            0 => DashboardAction::SignOut,
            _ => DashboardAction::Quit,
        })
    }
}

async fn read_line(prompt: String) -> Result<String> {
    let input = tokio::task::spawn_blocking(move || {
        Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
    })
    .await
    .context("Prompt task failed")??;

    Ok(input)
}
