use std::sync::Arc;

use tokio::sync::broadcast;

use super::{AuthProvider, SessionGate};
use crate::auth::pkce::PkcePair;
use crate::domain::{KanbanError, Session};

const EVENT_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    SignedIn(Session),
    SignedOut,
}

/// A live subscription to auth events. Dropping it unsubscribes.
#[derive(Debug)]
pub struct AuthSubscription {
    rx: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    /// Waits for the next event. Returns `None` once the controller is gone.
    pub async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Auth subscription lagged, skipping events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Returns an already-delivered event without waiting.
    pub fn try_next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.try_recv() {
                Ok(event) => return Some(event),
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => return None,
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct SignInRedirect {
    /// Where to send the browser.
    pub url: String,
    /// Must come back with the callback to complete the exchange.
    pub verifier: String,
}

pub struct SessionController {
    auth: Arc<dyn AuthProvider>,
    provider: String,
    events: broadcast::Sender<AuthEvent>,
}

impl SessionController {
    pub fn new(auth: Arc<dyn AuthProvider>, provider: &str) -> Self {
        let (events, _rx) = broadcast::channel(EVENT_CAPACITY);

        Self {
            auth,
            provider: provider.to_string(),
            events,
        }
    }

    pub fn gate(&self) -> SessionGate {
        SessionGate::new(Arc::clone(&self.auth))
    }

    pub fn subscribe(&self) -> AuthSubscription {
        AuthSubscription {
            rx: self.events.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    pub fn begin_sign_in(
        &self,
        site_url: &str,
        next: Option<&str>,
    ) -> Result<SignInRedirect, KanbanError> {
        let pkce = PkcePair::generate();
        let callback = format!("{}/auth/callback", site_url.trim_end_matches('/'));
        let redirect_to: String = match next.and_then(safe_next_path) {
            Some(path) => reqwest::Url::parse_with_params(&callback, &[("next", path)])
                .map_err(|e| KanbanError::Internal(format!("Invalid site URL: {}", e)))?
                .into(),
            None => callback,
        };

        let url = self
            .auth
            .authorize_url(&self.provider, &redirect_to, &pkce.challenge)?;

        Ok(SignInRedirect {
            url,
            verifier: pkce.verifier,
        })
    }

    pub async fn complete_sign_in(
        &self,
        code: &str,
        verifier: &str,
    ) -> Result<Session, KanbanError> {
        let session = self.auth.exchange_code(code, verifier).await?;

        let _ = self.events.send(AuthEvent::SignedIn(session.clone()));

        Ok(session)
    }

    /// Ends the remote session. `SignedOut` is emitted even when the remote
    /// call fails, since the local session is dropped either way.
    pub async fn sign_out(&self, access_token: Option<&str>) -> Result<(), KanbanError> {
        let result = match access_token {
            Some(token) => self.auth.sign_out(token).await,
            None => Ok(()),
        };

        let _ = self.events.send(AuthEvent::SignedOut);
        result
    }
}

/// Accepts only same-site relative paths as post-login destinations.
///
/// Browsers strip tab, CR and LF while parsing a `Location`, so `/\t/host`
/// would become `//host`. Any control character rejects the path.
pub fn safe_next_path(next: &str) -> Option<&str> {
    let next = next.trim();
    if next.chars().any(|c| c.is_ascii_control()) {
        return None;
    }
    if next.starts_with('/') && !next.starts_with("//") && !next.contains('\\') {
        Some(next)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_next_path() {
        assert_eq!(safe_next_path("/board/abc"), Some("/board/abc"));
        assert_eq!(safe_next_path("/"), Some("/"));
        assert_eq!(safe_next_path("https://evil.example"), None);
        assert_eq!(safe_next_path("//evil.example"), None);
        assert_eq!(safe_next_path("/\\evil.example"), None);
        assert_eq!(safe_next_path("board"), None);
        assert_eq!(safe_next_path("/\t/evil.example"), None);
        assert_eq!(safe_next_path("/\n/evil.example"), None);
        assert_eq!(safe_next_path("/\r\n/evil.example"), None);
        assert_eq!(safe_next_path("/board/a\u{0}b"), None);
    }
}
