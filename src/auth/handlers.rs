use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, Response},
};
use serde::Deserialize;

use crate::api::pages;
use crate::api::state::AppState;
use crate::auth::cookies;
use crate::domain::KanbanError;
use crate::session::safe_next_path;
use crate::views::Route;

#[derive(Debug, Default, Deserialize)]
pub struct SignInQuery {
    pub next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub next: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

fn redirect_with_cookies(location: &str, set_cookies: Vec<String>) -> Result<Response, KanbanError> {
    let mut builder = Response::builder()
        .status(StatusCode::SEE_OTHER)
        .header(header::LOCATION, location);

    for cookie in set_cookies {
        builder = builder.header(header::SET_COOKIE, cookie);
    }

    builder
        .body(Body::empty())
        .map_err(|e| KanbanError::Internal(format!("Failed to build redirect: {}", e)))
}

/// Starts the OAuth flow: stores the PKCE verifier and sends the browser to
/// the provider's consent screen.
pub async fn sign_in(
    State(state): State<AppState>,
    Query(query): Query<SignInQuery>,
) -> Result<Response, KanbanError> {
    let redirect = state
        .session
        .begin_sign_in(&state.config.site_url, query.next.as_deref())?;

    let verifier_cookie = cookies::build_token_cookie(
        cookies::PKCE_VERIFIER_COOKIE,
        &redirect.verifier,
        cookies::PKCE_VERIFIER_MAX_AGE_SECS,
        state.config.cookie_secure,
    );

    redirect_with_cookies(&redirect.url, vec![verifier_cookie])
}

pub async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, KanbanError> {
    let secure = state.config.cookie_secure;
    let clear_verifier = cookies::build_clear_cookie(cookies::PKCE_VERIFIER_COOKIE, secure);
    let error_path = Route::AuthCodeError.path();

    if let Some(error) = query.error.as_deref() {
        tracing::warn!(
            error,
            description = query.error_description.as_deref().unwrap_or_default(),
            "OAuth provider returned an error"
        );
        return redirect_with_cookies(&error_path, vec![clear_verifier]);
    }

    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        tracing::warn!("Auth callback without a code");
        return redirect_with_cookies(&error_path, vec![clear_verifier]);
    };

    let Some(verifier) = cookies::extract_cookie_value(&headers, cookies::PKCE_VERIFIER_COOKIE)
    else {
        tracing::warn!("Auth callback without a PKCE verifier cookie");
        return redirect_with_cookies(&error_path, vec![clear_verifier]);
    };

    let session = match state.session.complete_sign_in(code, &verifier).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Error exchanging auth code: {}", e);
            return redirect_with_cookies(&error_path, vec![clear_verifier]);
        }
    };

    let next = query
        .next
        .as_deref()
        .and_then(safe_next_path)
        .unwrap_or("/")
        .to_string();

    let access_cookie = cookies::build_token_cookie(
        cookies::ACCESS_TOKEN_COOKIE,
        &session.access_token,
        session.expires_in,
        secure,
    );
    let refresh_cookie = cookies::build_token_cookie(
        cookies::REFRESH_TOKEN_COOKIE,
        &session.refresh_token,
        cookies::REFRESH_TOKEN_MAX_AGE_SECS,
        secure,
    );

    redirect_with_cookies(&next, vec![access_cookie, refresh_cookie, clear_verifier])
}

/// Local cookies are cleared even when the remote sign-out fails.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, KanbanError> {
    let token = cookies::access_token(&headers);

    if let Err(e) = state.session.sign_out(token.as_deref()).await {
        tracing::warn!("Remote sign-out failed: {}", e);
    }

    let secure = state.config.cookie_secure;
    redirect_with_cookies(
        &Route::Landing.path(),
        vec![
            cookies::build_clear_cookie(cookies::ACCESS_TOKEN_COOKIE, secure),
            cookies::build_clear_cookie(cookies::REFRESH_TOKEN_COOKIE, secure),
        ],
    )
}

pub async fn auth_code_error() -> Html<String> {
    Html(pages::auth_code_error_page())
}
