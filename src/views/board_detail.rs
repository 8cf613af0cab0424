use super::{Alert, Route, SubmitOutcome, TitleForm, ViewState};
use crate::domain::{AuthUser, BoardWithLists, Card, KanbanError, List, ListWithCards, NewCard, NewList};
use crate::session::{GateDecision, SessionGate};
use crate::stores::{Backend, Stores};

/// One board with its columns. Any failure while loading, the session
/// check included, sends the user back to the board list.
pub struct BoardDetailView {
    state: ViewState,
    user: Option<AuthUser>,
    board: Option<BoardWithLists>,
    stores: Option<Stores>,
}

impl BoardDetailView {
    pub async fn mount(
        gate: &SessionGate,
        backend: &dyn Backend,
        access_token: Option<&str>,
        board_id: &str,
    ) -> Self {
        let mut view = Self {
            state: ViewState::Loading,
            user: None,
            board: None,
            stores: None,
        };

        match gate.check(access_token).await {
            GateDecision::Landing => view.state = ViewState::Redirect(Route::BoardList),
            GateDecision::Proceed { user, access_token } => {
                view.stores = Some(backend.stores(&access_token));
                view.user = Some(user);
                view.fetch_board(board_id).await;
            }
        }

        view
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn board(&self) -> Option<&BoardWithLists> {
        self.board.as_ref()
    }

    pub async fn fetch_board(&mut self, board_id: &str) {
        let Some(stores) = self.stores.clone() else {
            self.state = ViewState::Redirect(Route::BoardList);
            return;
        };

        match load_board(&stores, board_id).await {
            Ok(board) => {
                self.board = Some(board);
                self.state = ViewState::Ready;
            }
            Err(e) => {
                tracing::error!(board_id, "Error fetching board: {}", e);
                self.board = None;
                self.state = ViewState::Redirect(Route::BoardList);
            }
        }
    }

    /// Appends a list at the right end of the board.
    pub async fn create_list(&mut self, form: &mut TitleForm) -> SubmitOutcome<List> {
        if !form.can_submit() {
            return SubmitOutcome::Rejected;
        }
        let (Some(stores), Some(board)) = (self.stores.clone(), self.board.as_mut()) else {
            return SubmitOutcome::Rejected;
        };

        let new_list = NewList {
            title: form.trimmed(),
            board_id: board.board.id.clone(),
            position: board.lists.len() as i64,
        };

        form.set_submitting(true);
        let result = stores.lists.create(&new_list).await;
        form.set_submitting(false);

        match result {
            Ok(list) => {
                tracing::info!(list_id = list.id.as_str(), position = list.position, "List created");
                board.lists.push(ListWithCards::empty(list.clone()));
                form.reset();
                SubmitOutcome::Created(list)
            }
            Err(e) => {
                tracing::error!("Error creating list: {}", e);
                SubmitOutcome::Failed(Alert::new("Failed to create list. Please try again."))
            }
        }
    }

    /// Appends a card at the bottom of `list_id`. Unknown lists are ignored.
    pub async fn create_card(&mut self, list_id: &str, form: &mut TitleForm) -> SubmitOutcome<Card> {
        if !form.can_submit() {
            return SubmitOutcome::Rejected;
        }
        let (Some(stores), Some(board)) = (self.stores.clone(), self.board.as_mut()) else {
            return SubmitOutcome::Rejected;
        };
        let Some(position) = board.find_list(list_id).map(|l| l.cards.len() as i64) else {
            return SubmitOutcome::Rejected;
        };

        let new_card = NewCard {
            title: form.trimmed(),
            list_id: list_id.to_string(),
            position,
        };

        form.set_submitting(true);
        let result = stores.cards.create(&new_card).await;
        form.set_submitting(false);

        match result {
            Ok(card) => {
                tracing::info!(card_id = card.id.as_str(), position = card.position, "Card created");
                if let Some(list) = board.find_list_mut(list_id) {
                    list.cards.push(card.clone());
                }
                form.reset();
                SubmitOutcome::Created(card)
            }
            Err(e) => {
                tracing::error!("Error creating card: {}", e);
                SubmitOutcome::Failed(Alert::new("Failed to create card. Please try again."))
            }
        }
    }
}

async fn load_board(stores: &Stores, board_id: &str) -> Result<BoardWithLists, KanbanError> {
    let board = stores.boards.get(board_id).await?;
    let lists = stores.lists.list_with_cards(board_id).await?;

    Ok(BoardWithLists { board, lists })
}
