//! Delayed navigation bound to the lifetime of a view.
//!
//! A `ScheduledRedirect` is owned by the view that scheduled it. Dropping the
//! view drops the redirect, which cancels it: a view that has been unmounted
//! never navigates.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::backend::BaseNavigator;
use crate::navigation::Route;

/// A pending navigation that fires after a delay unless cancelled first.
pub struct ScheduledRedirect {
    route: Route,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ScheduledRedirect {
    /// Schedule `route` on the current tokio runtime.
    pub fn spawn(navigator: Arc<dyn BaseNavigator>, route: Route, delay: Duration) -> Self {
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        debug!(route = %route, delay_ms = delay.as_millis() as u64, "Scheduling redirect");

        let handle = tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(route = %route, "Redirect cancelled");
                }
                _ = tokio::time::sleep(delay) => {
                    // Cancellation may race the timer; cancelled wins.
                    if !token.is_cancelled() {
                        navigator.navigate_to(route);
                    }
                }
            }
        });

        Self {
            route,
            cancel,
            handle,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// True until the redirect has fired or been cancelled.
    pub fn is_pending(&self) -> bool {
        !self.cancel.is_cancelled() && !self.handle.is_finished()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl Drop for ScheduledRedirect {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingNavigator;

    #[tokio::test(start_paused = true)]
    async fn test_redirect_fires_after_delay() {
        let navigator = Arc::new(RecordingNavigator::new());
        let redirect = ScheduledRedirect::spawn(
            navigator.clone(),
            Route::Dashboard,
            Duration::from_millis(1500),
        );

        tokio::time::sleep(Duration::from_millis(1499)).await;
        assert!(navigator.routes().is_empty());
        assert!(redirect.is_pending());

        tokio::time::sleep(Duration::from_millis(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(navigator.routes(), vec![Route::Dashboard]);
        assert_eq!(redirect.route(), Route::Dashboard);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_redirect_never_navigates() {
        let navigator = Arc::new(RecordingNavigator::new());
        let redirect =
            ScheduledRedirect::spawn(navigator.clone(), Route::Login, Duration::from_millis(1500));

        redirect.cancel();
        assert!(!redirect.is_pending());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(navigator.routes().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_redirect_never_navigates() {
        let navigator = Arc::new(RecordingNavigator::new());
        let redirect = ScheduledRedirect::spawn(
            navigator.clone(),
            Route::Dashboard,
            Duration::from_millis(1500),
        );

        tokio::time::sleep(Duration::from_millis(500)).await;
        drop(redirect);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(navigator.routes().is_empty());
    }
}
