use std::sync::Arc;

use async_trait::async_trait;

use super::{
    Backend, BoardStore, CardStore, ListStore, Stores, BOARDS_TABLE, CARDS_TABLE, LISTS_TABLE,
};
use crate::domain::{Board, Card, KanbanError, List, ListWithCards, NewBoard, NewCard, NewList};
use crate::infrastructure::supabase::{RestClient, SupabaseClient};
use crate::session::AuthProvider;

pub struct SupabaseStore {
    rest: RestClient,
}

impl SupabaseStore {
    pub fn new(rest: RestClient) -> Self {
        Self { rest }
    }
}

#[async_trait]
impl BoardStore for SupabaseStore {
    async fn list_for_owner(&self, owner_id: &str) -> Result<Vec<Board>, KanbanError> {
        self.rest
            .table(BOARDS_TABLE)
            .select("*")
            .eq("user_id", owner_id)
            .order("created_at", false)
            .fetch_all()
            .await
    }

    async fn get(&self, id: &str) -> Result<Board, KanbanError> {
        self.rest
            .table(BOARDS_TABLE)
            .select("*")
            .eq("id", id)
            .fetch_single()
            .await
            .map_err(|e| match e {
                KanbanError::NotFound(_) => KanbanError::NotFound(format!("Board {} not found", id)),
                other => other,
            })
    }

    async fn create(&self, board: &NewBoard) -> Result<Board, KanbanError> {
        self.rest
            .table(BOARDS_TABLE)
            .select("*")
            .insert_single(board)
            .await
    }
}

#[async_trait]
impl ListStore for SupabaseStore {
    async fn list_with_cards(&self, board_id: &str) -> Result<Vec<ListWithCards>, KanbanError> {
        let mut lists: Vec<ListWithCards> = self
            .rest
            .table(LISTS_TABLE)
            .select("*,cards(*)")
            .eq("board_id", board_id)
            .order("position", true)
            .order_embedded(CARDS_TABLE, "position", true)
            .fetch_all()
            .await?;

        for list in &mut lists {
            list.sort_cards();
        }

        Ok(lists)
    }

    async fn create(&self, list: &NewList) -> Result<List, KanbanError> {
        self.rest
            .table(LISTS_TABLE)
            .select("*")
            .insert_single(list)
            .await
    }
}

#[async_trait]
impl CardStore for SupabaseStore {
    async fn create(&self, card: &NewCard) -> Result<Card, KanbanError> {
        self.rest
            .table(CARDS_TABLE)
            .select("*")
            .insert_single(card)
            .await
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseBackend {
    client: SupabaseClient,
}

impl SupabaseBackend {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

impl Backend for SupabaseBackend {
    fn auth(&self) -> Arc<dyn AuthProvider> {
        Arc::new(self.client.auth())
    }

    fn stores(&self, access_token: &str) -> Stores {
        Stores::from_shared(Arc::new(SupabaseStore::new(self.client.rest(access_token))))
    }
}
