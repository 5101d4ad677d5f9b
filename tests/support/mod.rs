//! In-process stand-in for the expense API.
//!
//! Every request is recorded; responses are canned per `(method, path)`.
//! The server runs on its own thread with its own tokio runtime so the
//! blocking client under test can call it directly.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{mpsc, Arc, Mutex};
use uuid::Uuid;

use expense_desk::{ApiClient, Config, LocalStore, Session, User, UserRole};

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
struct Shared {
    routes: Arc<Mutex<HashMap<(String, String), (u16, String)>>>,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct FakeBackend {
    pub url: String,
    shared: Shared,
}

impl FakeBackend {
    pub fn start() -> Self {
        let shared = Shared::default();
        let app = Router::new().fallback(handle).with_state(shared.clone());
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                tx.send(listener.local_addr().unwrap()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        let addr = rx.recv().unwrap();
        Self {
            url: format!("http://{}", addr),
            shared,
        }
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.shared.routes.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.shared.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().unwrap()
    }

    pub fn config(&self) -> Config {
        Config::default().with_api_url(&self.url)
    }

    /// Session over a fresh in-memory store.
    pub fn session(&self) -> Session {
        let store = Arc::new(LocalStore::open_in_memory().unwrap());
        Session::new(ApiClient::new(&self.config(), store).unwrap())
    }

    /// Session whose store already holds a token for `user`.
    pub fn logged_in_session(&self, user: &User) -> Session {
        let session = self.session();
        session.store().save_session("test-token", user).unwrap();
        session
    }
}

async fn handle(
    State(shared): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    shared.requests.lock().unwrap().push(Recorded {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let canned = shared
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();

    match canned {
        Some((status, body)) => (
            StatusCode::from_u16(status).unwrap(),
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            [(header::CONTENT_TYPE, "application/json")],
            json!({ "message": "Not found" }).to_string(),
        )
            .into_response(),
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub fn test_user(role: UserRole) -> User {
    User {
        user_id: Uuid::new_v4(),
        email: "pat@example.com".to_string(),
        full_name: "Pat Doe".to_string(),
        role,
    }
}

pub fn user_json(user: &User) -> Value {
    json!({
        "userId": user.user_id,
        "email": user.email,
        "fullName": user.full_name,
        "role": user.role.name(),
    })
}

pub fn expense_json(id: Uuid, title: &str, amount: f64, status: &str) -> Value {
    json!({
        "id": id,
        "creatorId": Uuid::new_v4(),
        "creatorName": "Pat Doe",
        "title": title,
        "description": "",
        "amount": amount,
        "status": status,
        "expenseDate": "2024-03-01T00:00:00",
        "createdAt": "2024-03-02T10:15:00Z",
        "submittedAt": "2024-03-03T08:00:00Z",
        "attachmentUrls": [],
    })
}

pub fn page_json(items: Vec<Value>, total: u64, page: u32, page_size: u32) -> Value {
    json!({
        "items": items,
        "totalCount": total,
        "page": page,
        "pageSize": page_size,
    })
}
