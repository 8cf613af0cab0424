use std::sync::Arc;

use crate::config::Config;
use crate::session::{SessionController, SessionGate};
use crate::stores::Backend;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub session: Arc<SessionController>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(backend: Arc<dyn Backend>, config: Arc<Config>) -> Self {
        let session = Arc::new(SessionController::new(
            backend.auth(),
            &config.oauth_provider,
        ));

        Self {
            backend,
            session,
            config,
        }
    }

    pub fn gate(&self) -> SessionGate {
        self.session.gate()
    }
}
