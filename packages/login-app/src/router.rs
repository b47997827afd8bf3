//! Route loop: mounts the view for the current route, runs it until it
//! navigates away (or the user quits), then unmounts it.

use std::sync::Arc;

use anyhow::{Context, Result};
use phone_login::dashboard::SIGN_OUT_LABEL;
use phone_login::{
    ChannelNavigator, DashboardView, LoginConfig, LoginStep, LoginView, Route,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::deps::AppDeps;
use crate::prompt::{CodeInput, DashboardAction, PhoneInput, Prompter};
use crate::ui;

/// How a screen ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenExit {
    Navigate(Route),
    Quit,
}

pub struct Router<P: Prompter> {
    deps: AppDeps,
    prompter: P,
    config: LoginConfig,
    navigator: Arc<ChannelNavigator>,
    routes: mpsc::UnboundedReceiver<Route>,
    history: Vec<Route>,
}

impl<P: Prompter> Router<P> {
    pub fn new(deps: AppDeps, prompter: P) -> Self {
        Self::with_config(deps, prompter, LoginConfig::default())
    }

    pub fn with_config(deps: AppDeps, prompter: P, config: LoginConfig) -> Self {
        let (navigator, routes) = ChannelNavigator::new();
        Self {
            deps,
            prompter,
            config,
            navigator: Arc::new(navigator),
            routes,
            history: Vec::new(),
        }
    }

    /// Every route mounted so far, in order
    pub fn history(&self) -> &[Route] {
        &self.history
    }

    /// Run from `start` until the user quits
    pub async fn run(&mut self, start: Route) -> Result<()> {
        let mut route = start;
        loop {
            info!(route = %route, "Mounting view");
            self.history.push(route);

            let exit = match route {
                Route::Login => self.run_login().await?,
                Route::Dashboard => self.run_dashboard().await?,
            };

            match exit {
                ScreenExit::Navigate(next) => route = next,
                ScreenExit::Quit => {
                    debug!("User quit");
                    return Ok(());
                }
            }
        }
    }

    async fn run_login(&mut self) -> Result<ScreenExit> {
        let mut view = LoginView::with_config(
            self.config.clone(),
            self.deps.identity.clone(),
            self.navigator.clone(),
        );
        view.mount().await?;

        loop {
            ui::render_login(view.state());

            match view.step() {
                LoginStep::PhoneEntry => {
                    match self.prompter.phone_number(&self.config.country_code).await? {
                        PhoneInput::Submit(raw) => {
                            view.set_phone_input(&raw)?;
                            ui::render_loading("Sending code...");
                            view.submit_phone().await?;
                        }
                        PhoneInput::Quit => return Ok(ScreenExit::Quit),
                    }
                }
                LoginStep::OtpEntry => match self.prompter.otp_code(self.config.otp_length).await? {
                    CodeInput::Submit(raw) => {
                        view.set_code_input(&raw)?;
                        ui::render_loading("Verifying...");
                        view.submit_code().await?;
                    }
                    CodeInput::ChangePhone => view.change_phone_number()?,
                },
                LoginStep::Success | LoginStep::AlreadyAuthenticated => {
                    // The scheduled redirect delivers the next route
                    let next = self.next_route().await?;
                    return Ok(ScreenExit::Navigate(next));
                }
            }
        }
    }

    async fn run_dashboard(&mut self) -> Result<ScreenExit> {
        let mut view = DashboardView::new(self.deps.identity.clone(), self.navigator.clone());

        if !view.mount().await?.shows_content() {
            let next = self.next_route().await?;
            return Ok(ScreenExit::Navigate(next));
        }

        ui::render_dashboard();
        match self.prompter.dashboard_action(SIGN_OUT_LABEL).await? {
            DashboardAction::SignOut => {
                view.sign_out().await?;
                let next = self.next_route().await?;
                Ok(ScreenExit::Navigate(next))
            }
            DashboardAction::Quit => Ok(ScreenExit::Quit),
        }
    }

    async fn next_route(&mut self) -> Result<Route> {
        self.routes
            .recv()
            .await
            .context("Navigator closed before a route was delivered")
    }
}
