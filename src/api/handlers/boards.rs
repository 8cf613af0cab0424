use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;

use crate::api::pages;
use crate::api::state::AppState;
use crate::auth::cookies;
use crate::domain::BoardColor;
use crate::views::{
    Alert, BoardDetailView, BoardListView, CreateBoardForm, Route, SubmitOutcome, TitleForm,
    ViewState,
};

#[derive(Debug, Deserialize)]
pub struct CreateBoardInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TitleInput {
    #[serde(default)]
    pub title: String,
}

fn redirect(route: &Route) -> Response {
    Redirect::to(&route.path()).into_response()
}

fn render_board_list(view: &BoardListView, form: &CreateBoardForm, alert: Option<&Alert>) -> Response {
    match (view.state(), view.user()) {
        (ViewState::Ready, Some(user)) => {
            Html(pages::board_list_page(user, view.boards(), form, alert)).into_response()
        }
        (ViewState::Redirect(route), _) => redirect(route),
        _ => redirect(&Route::Landing),
    }
}

/// `GET /`: the landing page for visitors, the board list for signed-in users.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let token = cookies::access_token(&headers);
    let view = BoardListView::mount(&state.gate(), state.backend.as_ref(), token.as_deref()).await;

    if view.state() == &ViewState::Redirect(Route::Landing) {
        return Html(pages::landing_page(&state.config.oauth_provider)).into_response();
    }

    render_board_list(&view, &CreateBoardForm::default(), None)
}

pub async fn create_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(input): Form<CreateBoardInput>,
) -> Response {
    let token = cookies::access_token(&headers);
    let mut view =
        BoardListView::mount(&state.gate(), state.backend.as_ref(), token.as_deref()).await;

    if view.state() != &ViewState::Ready {
        return render_board_list(&view, &CreateBoardForm::default(), None);
    }

    let color = BoardColor::parse_optional(input.color.as_deref());
    let mut form = CreateBoardForm::new(&input.title, &input.description, color);

    match view.create_board(&mut form).await {
        SubmitOutcome::Created(_) | SubmitOutcome::Rejected => redirect(&Route::BoardList),
        SubmitOutcome::Failed(alert) => render_board_list(&view, &form, Some(&alert)),
    }
}

async fn mount_board(state: &AppState, headers: &HeaderMap, board_id: &str) -> BoardDetailView {
    let token = cookies::access_token(headers);
    BoardDetailView::mount(
        &state.gate(),
        state.backend.as_ref(),
        token.as_deref(),
        board_id,
    )
    .await
}

fn render_board(
    view: &BoardDetailView,
    list_form: &TitleForm,
    card_draft: Option<(&str, &TitleForm)>,
    alert: Option<&Alert>,
) -> Response {
    match (view.state(), view.user(), view.board()) {
        (ViewState::Ready, Some(user), Some(board)) => Html(pages::board_detail_page(
            user, board, list_form, card_draft, alert,
        ))
        .into_response(),
        (ViewState::Redirect(route), _, _) => redirect(route),
        _ => redirect(&Route::BoardList),
    }
}

pub async fn show_board(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(board_id): Path<String>,
) -> Response {
    let view = mount_board(&state, &headers, &board_id).await;
    render_board(&view, &TitleForm::default(), None, None)
}

pub async fn create_list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(board_id): Path<String>,
    Form(input): Form<TitleInput>,
) -> Response {
    let mut view = mount_board(&state, &headers, &board_id).await;
    if view.state() != &ViewState::Ready {
        return render_board(&view, &TitleForm::default(), None, None);
    }

    let mut form = TitleForm::new(&input.title);
    match view.create_list(&mut form).await {
        SubmitOutcome::Created(_) | SubmitOutcome::Rejected => redirect(&Route::Board(board_id)),
        SubmitOutcome::Failed(alert) => render_board(&view, &form, None, Some(&alert)),
    }
}

pub async fn create_card(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path((board_id, list_id)): Path<(String, String)>,
    Form(input): Form<TitleInput>,
) -> Response {
    let mut view = mount_board(&state, &headers, &board_id).await;
    if view.state() != &ViewState::Ready {
        return render_board(&view, &TitleForm::default(), None, None);
    }

    let mut form = TitleForm::new(&input.title);
    match view.create_card(&list_id, &mut form).await {
        SubmitOutcome::Created(_) | SubmitOutcome::Rejected => redirect(&Route::Board(board_id)),
        SubmitOutcome::Failed(alert) => render_board(
            &view,
            &TitleForm::default(),
            Some((list_id.as_str(), &form)),
            Some(&alert),
        ),
    }
}
