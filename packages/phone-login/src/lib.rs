// Phone Login - view logic for phone + OTP sign-in
//
// A login view that walks a user from phone entry to a verified session, and
// a dashboard that only renders for signed-in users. Authentication itself is
// delegated to an identity backend behind `BaseIdentityBackend`; front-ends
// supply rendering and a `BaseNavigator`.

pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod login;
pub mod machine;
pub mod navigation;
pub mod phone;
pub mod redirect;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use backend::{BaseIdentityBackend, BaseNavigator, Session};
pub use config::LoginConfig;
pub use dashboard::{DashboardState, DashboardView};
pub use error::{IdentityError, LoginError, LoginResult};
pub use login::LoginView;
pub use machine::{LoginCommand, LoginEvent, LoginMachine, LoginState, LoginStep};
pub use navigation::{ChannelNavigator, Route};
