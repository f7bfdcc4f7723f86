//! Shared helpers for client integration tests.
//!
//! [`start`] runs a fake Tashih backend on an ephemeral port. It answers
//! from canned responses keyed by method and path (relative to `/api/v1`)
//! and records every request it receives, so tests can assert both what
//! the client sent and that it sent nothing at all.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};

use tashih_client::{Session, SessionConfig, SharedApi, TashihGateway};

pub const API_PREFIX: &str = "/api/v1";

/// One request as seen by the fake backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path relative to `/api/v1`.
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    /// Parsed JSON body, `Null` when empty.
    pub body: Value,
}

#[derive(Default)]
pub struct FakeTashih {
    stubs: Mutex<HashMap<(String, String), (u16, String)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTashih {
    pub fn stub_json(&self, method: &str, path: &str, status: u16, body: Value) {
        self.stub_raw(method, path, status, &body.to_string());
    }

    pub fn stub_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.stubs
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), (status, body.to_string()));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Requests other than GET.
    pub fn writes(&self) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method != "GET")
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn handle(
    State(backend): State<Arc<FakeTashih>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri
        .path()
        .strip_prefix(API_PREFIX)
        .unwrap_or(uri.path())
        .to_string();
    let header = |name: axum::http::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    backend.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: header(AUTHORIZATION),
        content_type: header(CONTENT_TYPE),
        body: serde_json::from_slice(&body).unwrap_or(Value::Null),
    });

    let stub = backend
        .stubs
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();
    let (status, body) =
        stub.unwrap_or_else(|| (404, json!({"detail": "Not found."}).to_string()));

    (
        StatusCode::from_u16(status).unwrap(),
        [(CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

pub struct TestServer {
    pub backend: Arc<FakeTashih>,
    pub base_url: String,
}

/// Start the fake backend on `127.0.0.1:0`.
pub async fn start() -> TestServer {
    let backend = Arc::new(FakeTashih::default());
    let app = Router::new()
        .fallback(handle)
        .with_state(Arc::clone(&backend));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        backend,
        base_url: format!("http://{addr}{API_PREFIX}"),
    }
}

impl TestServer {
    pub fn gateway(&self, session: Arc<Session>) -> TashihGateway {
        TashihGateway::with_client(reqwest::Client::new(), &self.base_url, session)
    }

    pub fn api(&self, session: Arc<Session>) -> SharedApi {
        Arc::new(self.gateway(session))
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// An unexpired HS256 token for the given role and username.
pub fn token(role: &str, username: &str) -> String {
    let claims = json!({
        "id": 17,
        "email": format!("{username}@example.org"),
        "name": username,
        "role": role,
        "username": username,
        "exp": chrono::Utc::now().timestamp() + 3600,
    });
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .expect("token encoding should succeed")
}

pub fn session_for(role: &str, username: &str) -> Arc<Session> {
    Arc::new(Session::with_token(
        SessionConfig::default(),
        token(role, username),
    ))
}

pub fn anonymous_session() -> Arc<Session> {
    Arc::new(Session::new(SessionConfig::default()))
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn khass_json(id: &str, reviewer: Option<&str>) -> Value {
    let status_name = if reviewer.is_some() { "Verified" } else { "Pending" };
    json!({
        "id": id,
        "document": "d-1",
        "title": "Report on chapter 3",
        "content": "The chain of narration is sound.",
        "created_by": "author1",
        "created_at": "2026-03-01T08:00:00Z",
        "updated_at": "2026-03-01T08:00:00Z",
        "status": reviewer.map(|_| "v1"),
        "status_name": status_name,
        "reviewer": reviewer,
        "review_notes": reviewer.map(|_| "Checked against the manuscript"),
        "review_date": reviewer.map(|_| "2026-03-02T09:30:00Z"),
        "metadata": {},
        "document_title": "Kitab al-Tahara"
    })
}

pub fn jamai_review_json(id: &str, reviewer: &str, approved: bool, notes: &str) -> Value {
    json!({
        "id": id,
        "taqrir_jamai": "j-1",
        "reviewer": reviewer,
        "review_notes": notes,
        "review_date": "2026-03-04T10:00:00Z",
        "is_approved": approved
    })
}

pub fn jamai_json(id: &str, reviews: Vec<Value>) -> Value {
    json!({
        "id": id,
        "document": "d-1",
        "title": "Collective report",
        "content": "Summary of individual reports.",
        "taqrir_khass": ["k-1", "k-2"],
        "created_by": "admin",
        "created_at": "2026-03-03T08:00:00Z",
        "updated_at": "2026-03-03T08:00:00Z",
        "status": "pending",
        "status_name": "Pending",
        "metadata": {},
        "document_title": "Kitab al-Tahara",
        "reviews": reviews,
        "taqrir_khass_count": 2
    })
}

pub fn statuses_json() -> Value {
    json!([
        {"id": "v1", "name": "Verified", "is_final": true},
        {"id": "v2", "name": "In Review", "is_final": false}
    ])
}

pub fn statistics_json() -> Value {
    json!({
        "documents_awaiting_verification": 4,
        "documents_verified": 21,
        "documents_rejected": 3,
        "total_taqrir_khass": 57,
        "pending_taqrir_khass_reviews": 9,
        "completed_taqrir_khass_reviews": 48,
        "total_taqrir_jamai": 11,
        "taqrir_jamai_needing_review": 2
    })
}

pub fn documents_json() -> Value {
    json!([
        {
            "document_id": "d-1",
            "document_title": "Kitab al-Tahara",
            "verification_status": "awaiting_verification",
            "taqrir_khass_count": 2,
            "pending_reviews_count": 1,
            "completed_reviews_count": 1,
            "has_taqrir_jamai": true,
            "taqrir_jamai_count": 1,
            "created_at": "2026-02-01T00:00:00Z",
            "updated_at": "2026-03-01T00:00:00Z"
        },
        {
            "document_id": "d-2",
            "document_title": "Kitab al-Salat",
            "verification_status": "in_review",
            "taqrir_khass_count": 1,
            "pending_reviews_count": 1,
            "completed_reviews_count": 0,
            "has_taqrir_jamai": false,
            "taqrir_jamai_count": 0,
            "created_at": "2026-02-05T00:00:00Z",
            "updated_at": "2026-03-02T00:00:00Z"
        }
    ])
}

pub fn queue_json() -> Value {
    json!({
        "pending_taqrir_khass": [khass_json("k-1", None), khass_json("k-2", None)],
        "pending_taqrir_jamai": [jamai_json("j-1", vec![])]
    })
}

/// Stub the three dashboard endpoints with healthy responses.
pub fn stub_dashboard(backend: &FakeTashih) {
    backend.stub_json(
        "GET",
        "/tashih/dashboard/documents-awaiting-verification/",
        200,
        documents_json(),
    );
    backend.stub_json("GET", "/tashih/dashboard/my-review-queue/", 200, queue_json());
    backend.stub_json("GET", "/tashih/dashboard/statistics/", 200, statistics_json());
}
