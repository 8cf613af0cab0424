use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers;
use crate::api::state::AppState;
use crate::auth;
use crate::config::Config;

pub fn create_router(state: AppState, config: &Config) -> Router {
    let board_routes = Router::new()
        .route("/{id}", get(handlers::boards::show_board))
        .route("/{id}/lists", post(handlers::boards::create_list))
        .route(
            "/{id}/lists/{list_id}/cards",
            post(handlers::boards::create_card),
        );

    let auth_routes = Router::new()
        .route("/sign-in", get(auth::handlers::sign_in))
        .route("/callback", get(auth::handlers::callback))
        .route("/sign-out", post(auth::handlers::sign_out))
        .route("/auth-code-error", get(auth::handlers::auth_code_error));

    let app_routes = Router::new()
        .route("/", get(handlers::boards::index))
        .route("/boards", post(handlers::boards::create_board))
        .route("/health", get(handlers::health_check))
        .route("/health/live", get(handlers::liveness))
        .nest("/board", board_routes)
        .nest("/auth", auth_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    app_routes.fallback_service(ServeDir::new(&config.static_dir))
}
