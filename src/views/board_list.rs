use super::{Alert, CreateBoardForm, Route, SubmitOutcome, ViewState};
use crate::domain::{AuthUser, Board};
use crate::session::{AuthEvent, GateDecision, SessionGate};
use crate::stores::{Backend, Stores};

/// The signed-in home page: the user's boards, newest first.
pub struct BoardListView {
    state: ViewState,
    user: Option<AuthUser>,
    boards: Vec<Board>,
    stores: Option<Stores>,
}

impl BoardListView {
    pub async fn mount(
        gate: &SessionGate,
        backend: &dyn Backend,
        access_token: Option<&str>,
    ) -> Self {
        let mut view = Self {
            state: ViewState::Loading,
            user: None,
            boards: Vec::new(),
            stores: None,
        };

        match gate.check(access_token).await {
            GateDecision::Landing => view.state = ViewState::Redirect(Route::Landing),
            GateDecision::Proceed { user, access_token } => {
                view.stores = Some(backend.stores(&access_token));
                view.user = Some(user);
                view.fetch_boards().await;
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

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    /// Fetch failures are logged and leave the collection empty.
    pub async fn fetch_boards(&mut self) {
        let (Some(stores), Some(user)) = (&self.stores, &self.user) else {
            self.state = ViewState::Redirect(Route::Landing);
            return;
        };

        match stores.boards.list_for_owner(&user.id).await {
            Ok(boards) => self.boards = boards,
            Err(e) => {
                tracing::error!(user_id = user.id.as_str(), "Error fetching boards: {}", e);
                self.boards.clear();
            }
        }

        self.state = ViewState::Ready;
    }

    pub async fn create_board(&mut self, form: &mut CreateBoardForm) -> SubmitOutcome<Board> {
        if !form.can_submit() {
            return SubmitOutcome::Rejected;
        }

        let (Some(stores), Some(user)) = (&self.stores, &self.user) else {
            return SubmitOutcome::Failed(Alert::new("You must be logged in to create a board"));
        };

        form.set_submitting(true);
        let result = stores.boards.create(&form.to_new_board(&user.id)).await;
        form.set_submitting(false);

        match result {
            Ok(board) => {
                tracing::info!(board_id = board.id.as_str(), "Board created");
                self.boards.insert(0, board.clone());
                form.reset();
                SubmitOutcome::Created(board)
            }
            Err(e) => {
                tracing::error!("Error creating board: {}", e);
                SubmitOutcome::Failed(Alert::new("Failed to create board. Please try again."))
            }
        }
    }

    /// Reacts to a sign-in or sign-out that happened while mounted.
    pub async fn on_auth_event(&mut self, event: AuthEvent, backend: &dyn Backend) {
        match event {
            AuthEvent::SignedIn(session) => {
                self.stores = Some(backend.stores(&session.access_token));
                self.user = Some(session.user);
                self.state = ViewState::Loading;
                self.fetch_boards().await;
            }
            AuthEvent::SignedOut => {
                self.stores = None;
                self.user = None;
                self.boards.clear();
                self.state = ViewState::Redirect(Route::Landing);
            }
        }
    }
}
