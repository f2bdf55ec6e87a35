use super::*;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

#[derive(Clone)]
struct ServerState {
    create_tx: Arc<Mutex<Option<oneshot::Sender<QrCodeUpsert>>>>,
}

async fn handle_list_for_user(Path(user_id): Path<i64>) -> Json<Value> {
    // Responses carry fields the client never consumes.
    Json(json!([
        {
            "id": user_id * 10,
            "data": format!("qr-{user_id}-a"),
            "imageUrl": "data:image/png;base64,AAAA",
            "size": "200x200",
            "colors": "#000000/#FFFFFF",
        },
        {
            "id": user_id * 10 + 1,
            "data": format!("qr-{user_id}-b"),
            "createdAt": "2023-05-15T14:30:00",
            "userId": user_id,
        },
    ]))
}

async fn handle_fetch(Path(id): Path<i64>) -> Result<Json<Value>, StatusCode> {
    if id == 42 {
        Ok(Json(json!({
            "id": 42,
            "data": "hello",
            "createdAt": "2023-05-15T14:30:00",
        })))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn handle_list_users() -> Json<Value> {
    Json(json!([
        {"id": 1, "name": "alice"},
        {"id": 2, "name": "bob"},
    ]))
}

async fn handle_create(
    State(state): State<ServerState>,
    Json(form): Json<QrCodeUpsert>,
) -> StatusCode {
    if let Some(tx) = state.create_tx.lock().await.take() {
        let _ = tx.send(form);
    }
    StatusCode::CREATED
}

async fn spawn_api_server() -> Result<(String, oneshot::Receiver<QrCodeUpsert>)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (tx, rx) = oneshot::channel();
    let state = ServerState {
        create_tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route("/api/qrcodes", post(handle_create))
        .route("/api/qrcodes/user/:user_id", get(handle_list_for_user))
        .route("/api/qrcodes/:id", get(handle_fetch))
        .route("/api/users", get(handle_list_users))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok((format!("http://{addr}"), rx))
}

#[tokio::test]
async fn list_for_user_drops_unconsumed_server_fields() {
    let (server_url, _rx) = spawn_api_server().await.expect("spawn server");
    let api = HttpQrApi::new(server_url);

    let records = api.list_for_user(UserId(3)).await.expect("list");

    assert_eq!(
        records,
        vec![
            QrCodeSummary {
                id: QrCodeId(30),
                data: "qr-3-a".to_string(),
            },
            QrCodeSummary {
                id: QrCodeId(31),
                data: "qr-3-b".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn fetch_decodes_a_single_record() {
    let (server_url, _rx) = spawn_api_server().await.expect("spawn server");
    let api = HttpQrApi::new(server_url);

    let record = api.fetch(QrCodeId(42)).await.expect("fetch");

    assert_eq!(record.id, QrCodeId(42));
    assert_eq!(record.data, "hello");
}

#[tokio::test]
async fn fetch_surfaces_error_statuses_as_failures() {
    let (server_url, _rx) = spawn_api_server().await.expect("spawn server");
    let api = HttpQrApi::new(server_url);

    assert!(api.fetch(QrCodeId(999)).await.is_err());
}

#[tokio::test]
async fn list_users_feeds_the_select_control() {
    let (server_url, _rx) = spawn_api_server().await.expect("spawn server");
    let api = HttpQrApi::new(server_url);

    let users = api.list_users().await.expect("list users");

    let names: Vec<&str> = users.iter().map(|user| user.name.as_str()).collect();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(users[0].id, UserId(1));
}

#[tokio::test]
async fn create_posts_form_fields_and_tolerates_trailing_slash_base() {
    let (server_url, payload_rx) = spawn_api_server().await.expect("spawn server");
    let api = HttpQrApi::new(format!("{server_url}/"));

    api.create(&QrCodeUpsert {
        data: "https://example.com".to_string(),
        user_ids: "1,2".to_string(),
    })
    .await
    .expect("create");

    let payload = payload_rx.await.expect("payload");
    assert_eq!(payload.data, "https://example.com");
    assert_eq!(payload.user_ids, "1,2");
}
