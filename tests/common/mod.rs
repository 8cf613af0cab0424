#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use taskflow::api::{create_router, AppState};
use taskflow::config::Config;
use taskflow::domain::AuthUser;
use taskflow::stores::MemoryBackend;

pub fn user(id: &str) -> AuthUser {
    AuthUser {
        id: id.into(),
        email: Some(format!("{id}@example.com")),
    }
}

pub fn test_config() -> Config {
    Config {
        site_url: "http://localhost:3000".into(),
        ..Config::default()
    }
}

pub fn setup_state(config: Config) -> (AppState, MemoryBackend) {
    let backend = MemoryBackend::new();
    let state = AppState::new(Arc::new(backend.clone()), Arc::new(config));
    (state, backend)
}

pub fn setup_app() -> (Router, AppState, MemoryBackend) {
    let config = test_config();
    let (state, backend) = setup_state(config.clone());
    let app = create_router(state.clone(), &config);
    (app, state, backend)
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect()
    }

    /// Value of a cookie set by this response, `None` if it was not set.
    pub fn cookie(&self, name: &str) -> Option<String> {
        self.set_cookies().into_iter().find_map(|c| {
            let pair = c.split(';').next()?;
            let (n, v) = pair.split_once('=')?;
            (n == name).then(|| v.to_string())
        })
    }
}

pub async fn make_request(
    app: Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    form: Option<&str>,
) -> TestResponse {
    let mut request = Request::builder().uri(uri).method(method);

    if let Some(cookie) = cookie {
        request = request.header(header::COOKIE, cookie);
    }
    if form.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }

    let request = request
        .body(Body::from(form.unwrap_or_default().to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body: String::from_utf8(body.to_vec()).unwrap(),
    }
}
