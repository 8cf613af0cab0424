pub mod controller;
pub mod gate;

use async_trait::async_trait;

use crate::domain::{AuthUser, KanbanError, Session};

pub use controller::{
    safe_next_path, AuthEvent, AuthSubscription, SessionController, SignInRedirect,
};
pub use gate::{GateDecision, SessionGate};

/// The remote auth collaborator.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Resolves the user behind an access token.
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, KanbanError>;

    /// URL of the OAuth provider's consent screen.
    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, KanbanError>;

    async fn exchange_code(&self, code: &str, code_verifier: &str)
        -> Result<Session, KanbanError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), KanbanError>;
}
