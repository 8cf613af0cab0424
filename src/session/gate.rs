use std::sync::Arc;

use super::AuthProvider;
use crate::domain::AuthUser;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Proceed {
        user: AuthUser,
        access_token: String,
    },
    Landing,
}

/// Runs before any protected view fetches. A failed lookup is treated the
/// same as no session.
#[derive(Clone)]
pub struct SessionGate {
    auth: Arc<dyn AuthProvider>,
}

impl SessionGate {
    pub fn new(auth: Arc<dyn AuthProvider>) -> Self {
        Self { auth }
    }

    pub async fn check(&self, access_token: Option<&str>) -> GateDecision {
        let Some(token) = access_token.filter(|t| !t.is_empty()) else {
            tracing::debug!("No session token, routing to landing");
            return GateDecision::Landing;
        };

        match self.auth.get_user(token).await {
            Ok(user) => GateDecision::Proceed {
                user,
                access_token: token.to_string(),
            },
            Err(e) => {
                tracing::debug!("Session lookup failed, routing to landing: {}", e);
                GateDecision::Landing
            }
        }
    }
}
