//! Typed access to the `boards`, `lists` and `cards` tables.
//!
//! Views only talk to these traits. `supabase` backs them with the hosted
//! REST API; `memory` is an in-process fake with the same row-level
//! security behaviour, used by tests.

pub mod memory;
pub mod supabase;

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Board, Card, KanbanError, List, ListWithCards, NewBoard, NewCard, NewList};
use crate::session::AuthProvider;

pub use memory::MemoryBackend;
pub use supabase::SupabaseBackend;

pub const BOARDS_TABLE: &str = "boards";
pub const LISTS_TABLE: &str = "lists";
pub const CARDS_TABLE: &str = "cards";

#[async_trait]
pub trait BoardStore: Send + Sync {
    /// Boards owned by `owner_id`, newest first.
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Board>, KanbanError>;

    async fn get(&self, id: &str) -> Result<Board, KanbanError>;

    async fn create(&self, board: &NewBoard) -> Result<Board, KanbanError>;
}

#[async_trait]
pub trait ListStore: Send + Sync {
    /// Lists of a board by `position`, each with its cards by `position`.
    async fn list_with_cards(&self, board_id: &str) -> Result<Vec<ListWithCards>, KanbanError>;

    async fn create(&self, list: &NewList) -> Result<List, KanbanError>;
}

#[async_trait]
pub trait CardStore: Send + Sync {
    async fn create(&self, card: &NewCard) -> Result<Card, KanbanError>;
}

/// The three stores bound to one user's session.
#[derive(Clone)]
pub struct Stores {
    pub boards: Arc<dyn BoardStore>,
    pub lists: Arc<dyn ListStore>,
    pub cards: Arc<dyn CardStore>,
}

impl Stores {
    pub fn from_shared<S>(store: Arc<S>) -> Self
    where
        S: BoardStore + ListStore + CardStore + 'static,
    {
        Self {
            boards: store.clone(),
            lists: store.clone(),
            cards: store,
        }
    }
}

/// Everything a request needs from the hosted service.
pub trait Backend: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthProvider>;

    /// Stores that act with the rights of the user owning `access_token`.
    fn stores(&self, access_token: &str) -> Stores;
}
