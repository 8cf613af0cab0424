use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{
    Backend, BoardStore, CardStore, ListStore, Stores, BOARDS_TABLE, CARDS_TABLE, LISTS_TABLE,
};
use crate::auth::pkce;
use crate::domain::{
    AuthUser, Board, Card, KanbanError, List, ListWithCards, NewBoard, NewCard, NewList, Session,
};
use crate::session::AuthProvider;

#[derive(Default)]
struct MemoryData {
    sessions: HashMap<String, AuthUser>,
    auth_codes: HashMap<String, (String, AuthUser)>,
    boards: Vec<Board>,
    lists: Vec<List>,
    cards: Vec<Card>,
    failing: HashSet<&'static str>,
}

impl MemoryData {
    fn owns_board(&self, user: &AuthUser, board_id: &str) -> bool {
        self.boards
            .iter()
            .any(|b| b.id == board_id && b.user_id == user.id)
    }

    fn owns_list(&self, user: &AuthUser, list_id: &str) -> bool {
        self.lists
            .iter()
            .any(|l| l.id == list_id && self.owns_board(user, &l.board_id))
    }
}

#[derive(Default)]
struct MemoryInner {
    data: Mutex<MemoryData>,
    table_requests: AtomicU64,
}

/// In-process stand-in for the hosted backend.
///
/// Rows are only visible to, and insertable by, the user that owns the
/// parent board, mirroring the row-level security policies of the real
/// tables. Every table call is counted, and individual tables can be made
/// to fail.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    inner: Arc<MemoryInner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn data(&self) -> MutexGuard<'_, MemoryData> {
        self.inner
            .data
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Registers a live session for `user` and returns its access token.
    pub fn sign_in_user(&self, user: AuthUser) -> String {
        let token = format!("mem-{}", Uuid::new_v4());
        self.data().sessions.insert(token.clone(), user);
        token
    }

    /// Issues an authorization code as the OAuth provider would after consent.
    pub fn issue_auth_code(&self, user: AuthUser, code_challenge: &str) -> String {
        let code = Uuid::new_v4().to_string();
        self.data()
            .auth_codes
            .insert(code.clone(), (code_challenge.to_string(), user));
        code
    }

    pub fn fail_table(&self, table: &'static str) {
        self.data().failing.insert(table);
    }

    pub fn restore_table(&self, table: &'static str) {
        self.data().failing.remove(table);
    }

    /// Number of table calls served so far, failed ones included.
    pub fn table_requests(&self) -> u64 {
        self.inner.table_requests.load(Ordering::SeqCst)
    }

    pub fn is_signed_in(&self, access_token: &str) -> bool {
        self.data().sessions.contains_key(access_token)
    }

    fn begin_table_call(&self, table: &'static str) -> Result<MutexGuard<'_, MemoryData>, KanbanError> {
        self.inner.table_requests.fetch_add(1, Ordering::SeqCst);
        let data = self.data();

        if data.failing.contains(table) {
            return Err(KanbanError::Remote {
                status: 503,
                message: format!("{} is unavailable", table),
            });
        }

        Ok(data)
    }
}

fn rls_violation(table: &str) -> KanbanError {
    KanbanError::Remote {
        status: 403,
        message: format!("new row violates row-level security policy for table \"{}\"", table),
    }
}

#[async_trait]
impl AuthProvider for MemoryBackend {
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, KanbanError> {
        self.data()
            .sessions
            .get(access_token)
            .cloned()
            .ok_or_else(|| KanbanError::Unauthorized("Session is not valid".into()))
    }

    fn authorize_url(
        &self,
        provider: &str,
        redirect_to: &str,
        code_challenge: &str,
    ) -> Result<String, KanbanError> {
        let url = reqwest::Url::parse_with_params(
            "memory://auth/authorize",
            &[
                ("provider", provider),
                ("redirect_to", redirect_to),
                ("code_challenge", code_challenge),
                ("code_challenge_method", "s256"),
            ],
        )
        .map_err(|e| KanbanError::Internal(format!("Invalid auth URL: {}", e)))?;

        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: &str,
    ) -> Result<Session, KanbanError> {
        let mut data = self.data();
        let (challenge, user) = data
            .auth_codes
            .remove(code)
            .ok_or_else(|| KanbanError::Unauthorized("Invalid or expired auth code".into()))?;

        if pkce::challenge_for(code_verifier) != challenge {
            return Err(KanbanError::Unauthorized("Code verifier does not match".into()));
        }

        let access_token = format!("mem-{}", Uuid::new_v4());
        data.sessions.insert(access_token.clone(), user.clone());

        Ok(Session {
            access_token,
            refresh_token: Uuid::new_v4().to_string(),
            expires_in: 3600,
            token_type: "bearer".into(),
            user,
        })
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), KanbanError> {
        self.data().sessions.remove(access_token);
        Ok(())
    }
}

impl Backend for MemoryBackend {
    fn auth(&self) -> Arc<dyn AuthProvider> {
        Arc::new(self.clone())
    }

    fn stores(&self, access_token: &str) -> Stores {
        let user = self.data().sessions.get(access_token).cloned();

        Stores::from_shared(Arc::new(MemoryStore {
            backend: self.clone(),
            user,
        }))
    }
}

/// Stores scoped to one session's user. `user` is `None` for unknown tokens,
/// which see nothing and may insert nothing.
pub struct MemoryStore {
    backend: MemoryBackend,
    user: Option<AuthUser>,
}

#[async_trait]
impl BoardStore for MemoryStore {
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Board>, KanbanError> {
        let data = self.backend.begin_table_call(BOARDS_TABLE)?;
        let Some(user) = &self.user else {
            return Ok(Vec::new());
        };

        // Newest insert first among equal timestamps.
        let mut boards: Vec<Board> = data
            .boards
            .iter()
            .rev()
            .filter(|b| b.user_id == owner_id && b.user_id == user.id)
            .cloned()
            .collect();
        boards.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(boards)
    }

    async fn get(&self, id: &str) -> Result<Board, KanbanError> {
        let data = self.backend.begin_table_call(BOARDS_TABLE)?;

        self.user
            .as_ref()
            .and_then(|user| {
                data.boards
                    .iter()
                    .find(|b| b.id == id && b.user_id == user.id)
            })
            .cloned()
            .ok_or_else(|| KanbanError::NotFound(format!("Board {} not found", id)))
    }

    async fn create(&self, board: &NewBoard) -> Result<Board, KanbanError> {
        let mut data = self.backend.begin_table_call(BOARDS_TABLE)?;

        match &self.user {
            Some(user) if user.id == board.user_id => {}
            _ => return Err(rls_violation(BOARDS_TABLE)),
        }

        let now = Utc::now();
        let row = Board {
            id: Uuid::new_v4().to_string(),
            title: board.title.clone(),
            description: board.description.clone(),
            user_id: board.user_id.clone(),
            color: board.color.clone(),
            created_at: now,
            updated_at: now,
        };
        data.boards.push(row.clone());

        Ok(row)
    }
}

#[async_trait]
impl ListStore for MemoryStore {
    async fn list_with_cards(&self, board_id: &str) -> Result<Vec<ListWithCards>, KanbanError> {
        let data = self.backend.begin_table_call(LISTS_TABLE)?;
        let Some(user) = &self.user else {
            return Ok(Vec::new());
        };
        if !data.owns_board(user, board_id) {
            return Ok(Vec::new());
        }

        let mut lists: Vec<ListWithCards> = data
            .lists
            .iter()
            .filter(|l| l.board_id == board_id)
            .map(|l| ListWithCards {
                list: l.clone(),
                cards: data
                    .cards
                    .iter()
                    .filter(|c| c.list_id == l.id)
                    .cloned()
                    .collect(),
            })
            .collect();

        lists.sort_by_key(|l| l.list.position);
        for list in &mut lists {
            list.sort_cards();
        }

        Ok(lists)
    }

    async fn create(&self, list: &NewList) -> Result<List, KanbanError> {
        let mut data = self.backend.begin_table_call(LISTS_TABLE)?;

        let allowed = self
            .user
            .as_ref()
            .is_some_and(|user| data.owns_board(user, &list.board_id));
        if !allowed {
            return Err(rls_violation(LISTS_TABLE));
        }

        let now = Utc::now();
        let row = List {
            id: Uuid::new_v4().to_string(),
            title: list.title.clone(),
            board_id: list.board_id.clone(),
            position: list.position,
            created_at: now,
            updated_at: now,
        };
        data.lists.push(row.clone());

        Ok(row)
    }
}

#[async_trait]
impl CardStore for MemoryStore {
    async fn create(&self, card: &NewCard) -> Result<Card, KanbanError> {
        let mut data = self.backend.begin_table_call(CARDS_TABLE)?;

        let allowed = self
            .user
            .as_ref()
            .is_some_and(|user| data.owns_list(user, &card.list_id));
        if !allowed {
            return Err(rls_violation(CARDS_TABLE));
        }

        let now = Utc::now();
        let row = Card {
            id: Uuid::new_v4().to_string(),
            title: card.title.clone(),
            description: None,
            list_id: card.list_id.clone(),
            position: card.position,
            created_at: now,
            updated_at: now,
        };
        data.cards.push(row.clone());

        Ok(row)
    }
}
