//! ApiClient against an in-process stub of the Agentica backend

#![cfg(feature = "native")]

use agentica::api::{ApiClient, Backend, FileUpload};
use agentica::model::{FileStatus, LoginRequest, RegisterRequest, Visibility};
use agentica::session::{SessionStore, KEY_ACCESS, KEY_REFRESH, KEY_USER};
use agentica::storage::{KeyValueStore, MemoryStore};
use agentica::ClientError;
use axum::{
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

const TOKEN: &str = "tok-1";

#[derive(Default)]
struct Stub {
    hits: Mutex<Vec<String>>,
    auth_headers: Mutex<Vec<Option<String>>>,
    uploads: Mutex<Vec<(String, String, usize)>>,
}

impl Stub {
    fn hit(&self, name: &str, headers: &HeaderMap) {
        self.hits.lock().unwrap().push(name.to_string());
        let auth = headers
            .get("authorization")
            .map(|v| v.to_str().unwrap_or_default().to_string());
        self.auth_headers.lock().unwrap().push(auth);
    }

    fn hits(&self, name: &str) -> usize {
        self.hits.lock().unwrap().iter().filter(|h| *h == name).count()
    }

    fn last_auth(&self) -> Option<String> {
        self.auth_headers.lock().unwrap().last().cloned().flatten()
    }

    fn authorized(headers: &HeaderMap) -> Result<(), (StatusCode, Json<Value>)> {
        let expected = format!("Bearer {}", TOKEN);
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(v) if v == expected => Ok(()),
            _ => Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"detail": "Given token not valid for any token type"})),
            )),
        }
    }
}

type Reply = (StatusCode, Json<Value>);

fn user_json(username: &str) -> Value {
    json!({
        "id": 1,
        "username": username,
        "email": format!("{}@example.com", username),
        "profile": {"photo": null, "address": "1 Main St", "phone": "+15550001111"}
    })
}

fn file_json(id: i64, filename: &str, status: &str, info: &str) -> Value {
    json!({
        "id": id,
        "filename": filename,
        "uploaded_at": "2025-03-01T10:15:30.123456Z",
        "status": status,
        "information_type": info,
        "information_type_display": info,
        "user": 1
    })
}

async fn login(State(stub): State<Arc<Stub>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    stub.hit("login", &headers);
    if body["password"] == "correct horse" {
        let username = body["username"].as_str().unwrap_or_default();
        (
            StatusCode::OK,
            Json(json!({"access": TOKEN, "refresh": "ref-1", "user": user_json(username)})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
    }
}

async fn register(State(stub): State<Arc<Stub>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    stub.hit("register", &headers);
    if !body["email"].as_str().unwrap_or_default().contains('@') {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"email": ["Enter a valid email address."]})),
        );
    }
    let username = body["username"].as_str().unwrap_or_default();
    (
        StatusCode::CREATED,
        Json(json!({"access": TOKEN, "refresh": "ref-1", "user": user_json(username)})),
    )
}

async fn me(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Result<Json<Value>, Reply> {
    stub.hit("me", &headers);
    Stub::authorized(&headers)?;
    Ok(Json(user_json("ana")))
}

async fn list_files(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Result<Json<Value>, Reply> {
    stub.hit("list_files", &headers);
    Stub::authorized(&headers)?;
    Ok(Json(json!([
        file_json(2, "b.txt", "Processed", "Private"),
        file_json(1, "a.pdf", "Not Processed", "Public"),
    ])))
}

async fn upload(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Reply, Reply> {
    stub.hit("upload", &headers);
    Stub::authorized(&headers)?;

    let mut filename = None;
    let mut size = 0;
    let mut info = String::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                filename = field.file_name().map(str::to_string);
                size = field.bytes().await.unwrap().len();
            }
            "information_type" => info = field.text().await.unwrap(),
            _ => {}
        }
    }

    let Some(filename) = filename else {
        return Err((StatusCode::BAD_REQUEST, Json(json!({"error": "No file uploaded."}))));
    };
    stub.uploads
        .lock()
        .unwrap()
        .push((filename.clone(), info.clone(), size));

    Ok((
        StatusCode::CREATED,
        Json(file_json(3, &filename, "Not Processed", &info)),
    ))
}

async fn process(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Value>, Reply> {
    stub.hit("process", &headers);
    Stub::authorized(&headers)?;
    if id == 7 {
        Ok(Json(json!({
            "message": "File processed with status Unsupported Format",
            "status": "Unsupported Format"
        })))
    } else {
        Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": "Processing failed: vector store unavailable"})),
        ))
    }
}

async fn delete_file(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Path(_id): Path<i64>,
) -> Result<StatusCode, Reply> {
    stub.hit("delete", &headers);
    Stub::authorized(&headers)?;
    Ok(StatusCode::NO_CONTENT)
}

async fn history(State(stub): State<Arc<Stub>>, headers: HeaderMap) -> Result<Json<Value>, Reply> {
    stub.hit("history", &headers);
    Stub::authorized(&headers)?;
    Ok(Json(json!([
        {"query": "q1", "answer": "a1"},
        {"query": "q2", "answer": "a2"}
    ])))
}

async fn private_chat(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, Reply> {
    stub.hit("private", &headers);
    Stub::authorized(&headers)?;
    Ok(Json(json!({
        "reply": format!("private: {}", body["message"].as_str().unwrap_or_default()),
        "sources": [{"source": "a.pdf", "content": "..."}],
        "history": []
    })))
}

async fn public_chat(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    stub.hit("public", &headers);
    match body["message"].as_str() {
        Some(m) if !m.is_empty() => (
            StatusCode::OK,
            Json(json!({"reply": format!("public: {}", m)})),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Message is required."})),
        ),
    }
}

async fn spawn_stub() -> (String, Arc<Stub>) {
    let stub = Arc::new(Stub::default());
    let app = Router::new()
        .route("/api/users/login/", post(login))
        .route("/api/users/register/", post(register))
        .route("/api/users/me/", get(me))
        .route("/api/chat/files/", get(list_files).post(upload))
        .route("/api/chat/files/:id/process/", post(process))
        .route("/api/chat/files/:id/", axum::routing::delete(delete_file))
        .route("/api/chat/chat/private/history/", get(history))
        .route("/api/chat/chat/private/", post(private_chat))
        .route("/api/chat/chat/public/", post(public_chat))
        .with_state(Arc::clone(&stub));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api", addr), stub)
}

fn client(base_url: &str) -> (ApiClient, Arc<SessionStore>, MemoryStore) {
    let storage = MemoryStore::new();
    let session = Arc::new(SessionStore::new(storage.clone()));
    session.hydrate();
    let client = ApiClient::new(base_url, Arc::clone(&session)).unwrap();
    (client, session, storage)
}

async fn logged_in(base_url: &str) -> (ApiClient, Arc<SessionStore>, MemoryStore) {
    let (client, session, storage) = client(base_url);
    let credentials = client
        .login(&LoginRequest {
            username: "ana".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap();
    session.login(&credentials).unwrap();
    (client, session, storage)
}

#[tokio::test]
async fn test_login_then_bearer_is_sent() {
    let (url, stub) = spawn_stub().await;
    let (client, session, storage) = logged_in(&url).await;

    assert!(session.is_authenticated());
    assert_eq!(storage.get(KEY_ACCESS).unwrap().as_deref(), Some(TOKEN));
    assert_eq!(storage.get(KEY_REFRESH).unwrap().as_deref(), Some("ref-1"));

    let user = client.me().await.unwrap();
    assert_eq!(user.username, "ana");
    assert_eq!(user.profile_completeness(), 66);
    assert_eq!(stub.last_auth().as_deref(), Some("Bearer tok-1"));
}

#[tokio::test]
async fn test_unauthorized_logs_out_once_without_retry() {
    let (url, stub) = spawn_stub().await;
    let (client, session, storage) = logged_in(&url).await;

    // Token the backend no longer accepts
    storage.set(KEY_ACCESS, "expired").unwrap();

    let err = client.me().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert!(!session.is_authenticated());
    assert_eq!(storage.removals(), 3);
    assert_eq!(storage.get(KEY_USER).unwrap(), None);
    assert_eq!(storage.get(KEY_ACCESS).unwrap(), None);
    assert_eq!(storage.get(KEY_REFRESH).unwrap(), None);
    assert_eq!(stub.hits("me"), 1);
}

#[tokio::test]
async fn test_header_sent_empty_without_token() {
    let (url, stub) = spawn_stub().await;
    let (client, _session, _storage) = client(&url);

    let err = client.list_files().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(stub.last_auth().as_deref(), Some(""));
}

#[tokio::test]
async fn test_bad_login_is_not_a_logout() {
    let (url, _stub) = spawn_stub().await;
    let (client, session, storage) = client(&url);

    let err = client
        .login(&LoginRequest {
            username: "ana".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "No active account found with the given credentials");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(!session.is_authenticated());
    assert_eq!(storage.removals(), 0);
}

#[tokio::test]
async fn test_register_field_errors() {
    let (url, _stub) = spawn_stub().await;
    let (client, _session, _storage) = client(&url);

    let err = client
        .register(&RegisterRequest {
            username: "bo".to_string(),
            email: "not-an-email".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "email: Enter a valid email address.");
    assert_eq!(err.status(), Some(400));
}

#[tokio::test]
async fn test_register_returns_user() {
    let (url, _stub) = spawn_stub().await;
    let (client, session, _storage) = client(&url);

    let credentials = client
        .register(&RegisterRequest {
            username: "bo".to_string(),
            email: "bo@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .await
        .unwrap();
    session.login(&credentials).unwrap();

    assert_eq!(session.user().unwrap().username, "bo");
}

#[tokio::test]
async fn test_files_list_and_upload() {
    let (url, stub) = spawn_stub().await;
    let (client, _session, _storage) = logged_in(&url).await;

    let files = client.list_files().await.unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].status, FileStatus::Processed);
    assert_eq!(files[1].information_type, Visibility::Public);

    let record = client
        .upload_file(FileUpload::new(
            "notes.pdf",
            b"%PDF-1.4 test".to_vec(),
            Visibility::Public,
        ))
        .await
        .unwrap();

    assert_eq!(record.filename, "notes.pdf");
    assert_eq!(record.information_type, Visibility::Public);
    assert_eq!(
        stub.uploads.lock().unwrap().clone(),
        vec![("notes.pdf".to_string(), "Public".to_string(), 13)]
    );
}

#[tokio::test]
async fn test_process_returns_server_status() {
    let (url, _stub) = spawn_stub().await;
    let (client, _session, _storage) = logged_in(&url).await;

    let response = client.process_file(7).await.unwrap();
    assert_eq!(response.status, FileStatus::UnsupportedFormat);

    let err = client.process_file(8).await.unwrap_err();
    assert_eq!(err.status(), Some(500));
    assert_eq!(err.to_string(), "Processing failed: vector store unavailable");
}

#[tokio::test]
async fn test_delete_no_content() {
    let (url, stub) = spawn_stub().await;
    let (client, _session, _storage) = logged_in(&url).await;

    client.delete_file(3).await.unwrap();
    assert_eq!(stub.hits("delete"), 1);
}

#[tokio::test]
async fn test_chat_endpoints() {
    let (url, stub) = spawn_stub().await;
    let (client, _session, _storage) = logged_in(&url).await;

    let history = client.private_history().await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].query, "q1");
    assert!(history[0].created_at.is_none());

    let reply = client.send_private("renewal terms?").await.unwrap();
    assert_eq!(reply.reply.as_deref(), Some("private: renewal terms?"));
    assert_eq!(reply.sources.len(), 1);

    let reply = client.send_public("hello").await.unwrap();
    assert_eq!(reply.reply.as_deref(), Some("public: hello"));
    assert_eq!(stub.last_auth(), None);

    let err = client.send_public("").await.unwrap_err();
    assert_eq!(err.to_string(), "Message is required.");
}

#[tokio::test]
async fn test_unreachable_backend_is_network_error() {
    let (client, session, _storage) = client("http://127.0.0.1:1/api");

    let err = client.send_public("hello").await.unwrap_err();

    assert!(matches!(err, ClientError::Network(_)));
    assert!(!session.is_authenticated());
}
