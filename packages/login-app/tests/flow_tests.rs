// End-to-end flows through the router with a mock identity backend and
// scripted user input.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use login_app::{AppDeps, CodeInput, DashboardAction, PhoneInput, Prompter, Router};
use phone_login::testing::{BackendCall, MockIdentityBackend};
use phone_login::{IdentityError, Route};

#[derive(Default)]
struct ScriptedPrompter {
    phones: Mutex<VecDeque<PhoneInput>>,
    codes: Mutex<VecDeque<CodeInput>>,
    actions: Mutex<VecDeque<DashboardAction>>,
}

impl ScriptedPrompter {
    fn phone(self, input: PhoneInput) -> Self {
        self.phones.lock().unwrap().push_back(input);
        self
    }

    fn code(self, input: CodeInput) -> Self {
        self.codes.lock().unwrap().push_back(input);
        self
    }

    fn action(self, action: DashboardAction) -> Self {
        self.actions.lock().unwrap().push_back(action);
        self
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn phone_number(&self, country_code: &str) -> Result<PhoneInput> {
        assert_eq!(country_code, "+91");
        self.phones
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no phone input scripted"))
    }

    async fn otp_code(&self, otp_length: usize) -> Result<CodeInput> {
        assert_eq!(otp_length, 6);
        self.codes
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no code input scripted"))
    }

    async fn dashboard_action(&self, sign_out_label: &str) -> Result<DashboardAction> {
        assert_eq!(sign_out_label, "Logout");
        self.actions
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| anyhow!("no dashboard action scripted"))
    }
}

fn submit_phone(raw: &str) -> PhoneInput {
    PhoneInput::Submit(raw.to_string())
}

fn submit_code(raw: &str) -> CodeInput {
    CodeInput::Submit(raw.to_string())
}

fn router(backend: &Arc<MockIdentityBackend>, prompter: ScriptedPrompter) -> Router<ScriptedPrompter> {
    Router::new(AppDeps::new(backend.clone()), prompter)
}

#[tokio::test(start_paused = true)]
async fn test_full_login_then_sign_out() {
    let backend = Arc::new(MockIdentityBackend::new());
    let prompter = ScriptedPrompter::default()
        .phone(submit_phone("98765abc4321"))
        .code(submit_code("123456"))
        .action(DashboardAction::SignOut)
        .phone(PhoneInput::Quit);
    let mut router = router(&backend, prompter);

    router.run(Route::Login).await.unwrap();

    assert_eq!(
        router.history(),
        &[Route::Login, Route::Dashboard, Route::Login]
    );
    assert_eq!(
        backend.calls(),
        vec![
            BackendCall::GetSession,
            BackendCall::SendOtp {
                phone_number: "+919876543210".to_string()
            },
            BackendCall::VerifyOtp {
                phone_number: "+919876543210".to_string(),
                code: "123456".to_string()
            },
            BackendCall::GetSession,
            BackendCall::SignOut,
            BackendCall::GetSession,
        ]
    );
    assert!(!backend.has_session());
}

#[tokio::test(start_paused = true)]
async fn test_existing_session_skips_login_form() {
    let backend = Arc::new(MockIdentityBackend::new().with_session("user-123"));
    let prompter = ScriptedPrompter::default().action(DashboardAction::Quit);
    let mut router = router(&backend, prompter);

    router.run(Route::Login).await.unwrap();

    assert_eq!(router.history(), &[Route::Login, Route::Dashboard]);
    assert!(backend.send_otp_calls().is_empty());
}

#[tokio::test]
async fn test_dashboard_without_session_returns_to_login() {
    let backend = Arc::new(MockIdentityBackend::new());
    let prompter = ScriptedPrompter::default().phone(PhoneInput::Quit);
    let mut router = router(&backend, prompter);

    router.run(Route::Dashboard).await.unwrap();

    assert_eq!(router.history(), &[Route::Dashboard, Route::Login]);
}

#[tokio::test]
async fn test_validation_and_rejection_keep_user_on_login() {
    let backend = Arc::new(MockIdentityBackend::new().with_verify_otp_error(
        IdentityError::Rejected {
            status: Some(403),
            message: "Token has expired or is invalid".to_string(),
        },
    ));
    let prompter = ScriptedPrompter::default()
        .phone(submit_phone("98765"))
        .phone(submit_phone("9876543210"))
        .code(submit_code("12"))
        .code(submit_code("000000"))
        .code(CodeInput::ChangePhone)
        .phone(PhoneInput::Quit);
    let mut router = router(&backend, prompter);

    router.run(Route::Login).await.unwrap();

    assert_eq!(router.history(), &[Route::Login]);
    assert_eq!(backend.send_otp_calls(), vec!["+919876543210".to_string()]);
    assert_eq!(
        backend.verify_otp_calls(),
        vec![("+919876543210".to_string(), "000000".to_string())]
    );
}

#[tokio::test]
async fn test_exhausted_script_surfaces_prompt_error() {
    let backend = Arc::new(MockIdentityBackend::new());
    let mut router = router(&backend, ScriptedPrompter::default());

    let err = router.run(Route::Login).await.unwrap_err();
    assert!(err.to_string().contains("no phone input scripted"));
}
