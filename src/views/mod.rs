//! Per-page controllers. A view is mounted once per page load, holds the
//! fetched rows in memory, and splices in rows returned by its writes.

pub mod board_detail;
pub mod board_list;
pub mod forms;

pub use board_detail::BoardDetailView;
pub use board_list::BoardListView;
pub use forms::{CreateBoardForm, TitleForm};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Landing,
    BoardList,
    Board(String),
    AuthCodeError,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            // The landing page and the board list share the root; which one
            // renders depends on the session.
            Route::Landing | Route::BoardList => "/".into(),
            Route::Board(id) => format!("/board/{id}"),
            Route::AuthCodeError => "/auth/auth-code-error".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Loading,
    Ready,
    Redirect(Route),
}

/// A blocking message shown to the user after a failed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
}

impl Alert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome<T> {
    Created(T),
    /// Refused locally, nothing was sent.
    Rejected,
    Failed(Alert),
}

impl<T> SubmitOutcome<T> {
    pub fn is_created(&self) -> bool {
        matches!(self, SubmitOutcome::Created(_))
    }

    pub fn alert(&self) -> Option<&Alert> {
        match self {
            SubmitOutcome::Failed(alert) => Some(alert),
            _ => None,
        }
    }
}
