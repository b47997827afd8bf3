//! Route definitions and a channel-backed navigator.

use std::fmt;

use tokio::sync::mpsc;
use tracing::debug;

use crate::backend::BaseNavigator;

/// All application routes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Phone + code login (`/`)
    Login,
    /// Post-login welcome screen (`/dashboard`)
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Dashboard => "/dashboard",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Some(Route::Login),
            "/dashboard" => Some(Route::Dashboard),
            _ => None,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigator that forwards route changes to whoever owns the receiver.
///
/// The receiving side is the router loop; it unmounts the current view and
/// mounts the one for the new route.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Route>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl BaseNavigator for ChannelNavigator {
    fn navigate_to(&self, route: Route) {
        debug!(route = %route, "Navigating");
        // Router gone means the app is shutting down.
        let _ = self.tx.send(route);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/");
        assert_eq!(Route::Dashboard.path(), "/dashboard");
    }

    #[test]
    fn test_route_from_path() {
        assert_eq!(Route::from_path("/"), Some(Route::Login));
        assert_eq!(Route::from_path(""), Some(Route::Login));
        assert_eq!(Route::from_path("/dashboard"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/dashboard/"), Some(Route::Dashboard));
        assert_eq!(Route::from_path("/admin"), None);
    }

    #[tokio::test]
    async fn test_channel_navigator_forwards_routes() {
        let (navigator, mut rx) = ChannelNavigator::new();
        navigator.navigate_to(Route::Dashboard);
        navigator.navigate_to(Route::Login);

        assert_eq!(rx.recv().await, Some(Route::Dashboard));
        assert_eq!(rx.recv().await, Some(Route::Login));
    }

    #[test]
    fn test_channel_navigator_ignores_closed_router() {
        let (navigator, rx) = ChannelNavigator::new();
        drop(rx);
        navigator.navigate_to(Route::Login);
    }
}
