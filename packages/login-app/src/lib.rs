// Login App - terminal front-end for phone + OTP sign-in
//
// Wires the phone-login views to the Supabase auth client and renders them
// with interactive prompts.

pub mod config;
pub mod deps;
pub mod prompt;
pub mod router;
pub mod ui;

pub use config::Config;
pub use deps::{AppDeps, SupabaseAdapter};
pub use prompt::{CodeInput, DashboardAction, PhoneInput, Prompter, TerminalPrompter};
pub use router::{Router, ScreenExit};
