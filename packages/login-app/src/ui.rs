//! Terminal rendering for the two screens.

use colored::Colorize;
use console::Term;
use phone_login::dashboard::{DASHBOARD_SUBTITLE, DASHBOARD_TITLE};
use phone_login::{LoginState, LoginStep};

pub fn print_banner(term: &Term) -> std::io::Result<()> {
    term.clear_screen()?;
    println!(
        "{}",
        "╔════════════════════════════════════════╗".bright_cyan()
    );
    println!(
        "{}",
        "║              Phone Login               ║".bright_cyan()
    );
    println!(
        "{}",
        "╚════════════════════════════════════════╝".bright_cyan()
    );
    println!();
    Ok(())
}

pub fn render_login(state: &LoginState) {
    println!();
    println!("{}", state.step.title().bold());
    println!("{}", state.subtitle().dimmed());

    match state.step {
        LoginStep::Success => println!("{}", "Verifying credential...".bright_blue()),
        LoginStep::AlreadyAuthenticated => println!("{}", "Redirecting...".bright_blue()),
        _ => {}
    }

    if let Some(error) = &state.error {
        println!("{}", error.red());
    }
}

pub fn render_loading(message: &str) {
    println!("{}", message.yellow());
}

pub fn render_dashboard() {
    println!();
    println!("{}", DASHBOARD_TITLE.bright_green().bold());
    println!("{}", DASHBOARD_SUBTITLE);
}

pub fn render_goodbye() {
    println!("{}", "👋 Goodbye!".bright_blue());
}
