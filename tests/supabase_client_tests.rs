use std::sync::{Arc, Mutex};

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use taskflow::domain::{KanbanError, NewBoard};
use taskflow::infrastructure::supabase::SupabaseClient;
use taskflow::session::AuthProvider;
use taskflow::stores::{Backend, SupabaseBackend};

const ANON_KEY: &str = "anon-key";
const USER_TOKEN: &str = "user-token";
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

#[derive(Debug, Clone)]
struct Recorded {
    method: Method,
    path: String,
    params: Vec<(String, String)>,
    headers: HeaderMap,
    body: String,
}

impl Recorded {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

type Log = Arc<Mutex<Vec<Recorded>>>;

fn board_json(id: &str, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": null,
        "user_id": "u1",
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z",
    })
}

async fn fake_backend(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
    body: String,
) -> Response {
    let recorded = Recorded {
        method: method.clone(),
        path: uri.path().to_string(),
        params,
        headers,
        body,
    };
    log.lock().unwrap().push(recorded.clone());

    match (method, recorded.path.as_str()) {
        (Method::GET, "/rest/v1/boards") => {
            if recorded.header("accept") == Some(SINGLE_OBJECT) {
                if recorded.param("id") == Some("eq.missing") {
                    return (
                        StatusCode::NOT_ACCEPTABLE,
                        Json(json!({
                            "code": "PGRST116",
                            "message": "JSON object requested, multiple (or no) rows returned",
                        })),
                    )
                        .into_response();
                }
                return Json(board_json("b1", "Roadmap")).into_response();
            }
            Json(json!([board_json("b2", "Newer"), board_json("b1", "Older")])).into_response()
        }
        (Method::POST, "/rest/v1/boards") => {
            let row: Value = serde_json::from_str(&recorded.body).unwrap_or_default();
            if row["title"] == "forbidden" {
                return (
                    StatusCode::FORBIDDEN,
                    Json(json!({
                        "code": "42501",
                        "message": "new row violates row-level security policy for table \"boards\"",
                    })),
                )
                    .into_response();
            }
            let mut created = board_json("b-new", row["title"].as_str().unwrap_or_default());
            created["color"] = row.get("color").cloned().unwrap_or(Value::Null);
            (StatusCode::CREATED, Json(created)).into_response()
        }
        (Method::GET, "/rest/v1/lists") => Json(json!([{
            "id": "l1",
            "title": "Todo",
            "board_id": "b1",
            "position": 0,
            "created_at": "2024-05-01T10:00:00Z",
            "updated_at": "2024-05-01T10:00:00Z",
            "cards": [
                {
                    "id": "c2", "title": "second", "list_id": "l1", "position": 1,
                    "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-01T10:00:00Z"
                },
                {
                    "id": "c1", "title": "first", "list_id": "l1", "position": 0,
                    "created_at": "2024-05-01T10:00:00Z", "updated_at": "2024-05-01T10:00:00Z"
                }
            ]
        }]))
        .into_response(),
        (Method::GET, "/auth/v1/user") => {
            let bearer = format!("Bearer {USER_TOKEN}");
            if recorded.header("authorization") == Some(bearer.as_str()) {
                Json(json!({"id": "u1", "email": "u1@example.com", "aud": "authenticated"}))
                    .into_response()
            } else {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({"code": 401, "msg": "invalid JWT"})),
                )
                    .into_response()
            }
        }
        (Method::POST, "/auth/v1/token") => {
            let body: Value = serde_json::from_str(&recorded.body).unwrap_or_default();
            if body["auth_code"] == "good-code" {
                Json(json!({
                    "access_token": USER_TOKEN,
                    "refresh_token": "refresh-1",
                    "expires_in": 3600,
                    "token_type": "bearer",
                    "user": {"id": "u1", "email": "u1@example.com"},
                }))
                .into_response()
            } else {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": "invalid_grant", "error_description": "invalid flow state"})),
                )
                    .into_response()
            }
        }
        (Method::POST, "/auth/v1/logout") => StatusCode::NO_CONTENT.into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_fake() -> (SupabaseClient, Log) {
    let log: Log = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new().fallback(fake_backend).with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = SupabaseClient::new(reqwest::Client::new(), &format!("http://{addr}"), ANON_KEY);
    (client, log)
}

fn last(log: &Log) -> Recorded {
    log.lock().unwrap().last().cloned().unwrap()
}

#[tokio::test]
async fn test_board_list_request_shape() {
    let (client, log) = spawn_fake().await;
    let stores = SupabaseBackend::new(client).stores(USER_TOKEN);

    let boards = stores.boards.list_for_owner("u1").await.unwrap();
    assert_eq!(boards.len(), 2);
    assert_eq!(boards[0].title, "Newer");
    assert!(boards[0].color.is_none());

    let request = last(&log);
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/rest/v1/boards");
    assert_eq!(request.header("apikey"), Some(ANON_KEY));
    assert_eq!(request.header("authorization"), Some("Bearer user-token"));
    assert_eq!(request.param("select"), Some("*"));
    assert_eq!(request.param("user_id"), Some("eq.u1"));
    assert_eq!(request.param("order"), Some("created_at.desc"));
}

#[tokio::test]
async fn test_single_board_miss_is_not_found() {
    let (client, log) = spawn_fake().await;
    let stores = SupabaseBackend::new(client).stores(USER_TOKEN);

    let board = stores.boards.get("b1").await.unwrap();
    assert_eq!(board.id, "b1");
    assert_eq!(last(&log).header("accept"), Some(SINGLE_OBJECT));

    let missing = stores.boards.get("missing").await;
    assert!(matches!(missing, Err(KanbanError::NotFound(msg)) if msg == "Board missing not found"));
}

#[tokio::test]
async fn test_lists_embed_cards_in_position_order() {
    let (client, log) = spawn_fake().await;
    let stores = SupabaseBackend::new(client).stores(USER_TOKEN);

    let lists = stores.lists.list_with_cards("b1").await.unwrap();
    assert_eq!(lists.len(), 1);
    let titles: Vec<&str> = lists[0].cards.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["first", "second"]);

    let request = last(&log);
    assert_eq!(request.param("select"), Some("*,cards(*)"));
    assert_eq!(request.param("board_id"), Some("eq.b1"));
    assert_eq!(request.param("order"), Some("position.asc"));
    assert_eq!(request.param("cards.order"), Some("position.asc"));
}

#[tokio::test]
async fn test_insert_asks_for_representation() {
    let (client, log) = spawn_fake().await;
    let stores = SupabaseBackend::new(client).stores(USER_TOKEN);

    let board = stores
        .boards
        .create(&NewBoard {
            title: "Sprint 1".into(),
            description: None,
            user_id: "u1".into(),
            color: None,
        })
        .await
        .unwrap();
    assert_eq!(board.title, "Sprint 1");

    let request = last(&log);
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.header("prefer"), Some("return=representation"));
    assert_eq!(request.header("accept"), Some(SINGLE_OBJECT));
    assert_eq!(
        request.header(header::CONTENT_TYPE.as_str()),
        Some("application/json")
    );

    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["title"], "Sprint 1");
    assert_eq!(body["user_id"], "u1");
    assert!(body.get("color").is_none());
}

#[tokio::test]
async fn test_insert_rejection_is_remote_error() {
    let (client, _log) = spawn_fake().await;
    let stores = SupabaseBackend::new(client).stores(USER_TOKEN);

    let result = stores
        .boards
        .create(&NewBoard {
            title: "forbidden".into(),
            description: None,
            user_id: "u1".into(),
            color: Some("info".into()),
        })
        .await;

    match result {
        Err(KanbanError::Remote { status, message }) => {
            assert_eq!(status, 403);
            assert!(message.contains("row-level security"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn test_get_user_and_rejected_token() {
    let (client, log) = spawn_fake().await;
    let auth = client.auth();

    let user = auth.get_user(USER_TOKEN).await.unwrap();
    assert_eq!(user.id, "u1");
    assert_eq!(user.email.as_deref(), Some("u1@example.com"));
    assert_eq!(last(&log).header("apikey"), Some(ANON_KEY));

    let rejected = auth.get_user("expired").await;
    assert!(matches!(rejected, Err(KanbanError::Unauthorized(_))));
}

#[tokio::test]
async fn test_code_exchange_and_sign_out() {
    let (client, log) = spawn_fake().await;
    let auth = client.auth();

    let session = auth.exchange_code("good-code", "verifier-1").await.unwrap();
    assert_eq!(session.access_token, USER_TOKEN);
    assert_eq!(session.expires_in, 3600);

    let request = last(&log);
    assert_eq!(request.path, "/auth/v1/token");
    assert_eq!(request.param("grant_type"), Some("pkce"));
    let body: Value = serde_json::from_str(&request.body).unwrap();
    assert_eq!(body["auth_code"], "good-code");
    assert_eq!(body["code_verifier"], "verifier-1");

    let failed = auth.exchange_code("bad-code", "verifier-1").await;
    assert!(matches!(
        failed,
        Err(KanbanError::Remote { status: 400, ref message }) if message == "invalid flow state"
    ));

    auth.sign_out(USER_TOKEN).await.unwrap();
    let request = last(&log);
    assert_eq!(request.path, "/auth/v1/logout");
    assert_eq!(request.header("authorization"), Some("Bearer user-token"));
}
