// Main entry point for the login app

use anyhow::{Context, Result};
use clap::Parser;
use console::Term;
use login_app::{ui, AppDeps, Config, Router, TerminalPrompter};
use phone_login::Route;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "login", about = "Sign in with your phone number")]
struct Cli {
    /// Route to open first (`/` or `/dashboard`)
    #[arg(default_value = "/")]
    path: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so they stay out of the prompts
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let start = Route::from_path(&cli.path)
        .with_context(|| format!("Unknown route: {}", cli.path))?;

    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    ui::print_banner(&Term::stdout())?;

    let mut router = Router::new(AppDeps::from_config(&config), TerminalPrompter);
    router.run(start).await?;

    ui::render_goodbye();
    Ok(())
}
