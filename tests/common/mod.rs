//! In-process mock of the pet health backend.
//!
//! Collections are generic JSON arrays keyed by their first path segment.
//! Every request is recorded so tests can assert on payloads, headers and
//! on requests that must never be sent.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::{json, Map, Value};

pub const EMAIL: &str = "ana@example.com";
pub const PASSWORD: &str = "Secret123";
pub const ACCESS_TOKEN: &str = "token-1";
pub const REFRESH_TOKEN: &str = "refresh-1";
const OWNER: &str = "user-1";
const NOW: &str = "2025-01-15T10:00:00Z";

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct MockState {
    requests: Mutex<Vec<Recorded>>,
    collections: Mutex<HashMap<String, Vec<Value>>>,
    next_id: Mutex<u64>,
    /// Answer every request with 401
    pub reject_all: AtomicBool,
}

pub struct MockServer {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .layer(axum::extract::DefaultBodyLimit::disable())
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    /// Recorded requests with the given method and path.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Seeds a record straight into a collection.
    pub fn seed(&self, collection: &str, record: Value) {
        self.state
            .collections
            .lock()
            .unwrap()
            .entry(collection.to_string())
            .or_default()
            .push(record);
    }

    pub fn reject_all(&self, reject: bool) {
        self.state.reject_all.store(reject, Ordering::SeqCst);
    }
}

pub fn pet_json(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "species": "Cat",
        "breed": null,
        "owner_id": OWNER,
        "created_at": NOW,
        "updated_at": NOW,
    })
}

pub fn reminder_json(id: &str, title: &str, is_active: bool) -> Value {
    json!({
        "id": id,
        "owner_id": OWNER,
        "pet_id": "pet-1",
        "title": title,
        "event_time": "2025-06-01T08:00:00.000Z",
        "timezone": "UTC",
        "frequency": "monthly",
        "is_active": is_active,
        "notify_by_email": true,
        "notify_in_app": true,
        "created_at": NOW,
        "updated_at": NOW,
    })
}

fn error(status: StatusCode, detail: &str) -> Response {
    (status, Json(json!({ "detail": detail }))).into_response()
}

fn query_matches(record: &Value, query: Option<&str>) -> bool {
    let Some(query) = query else {
        return true;
    };
    query.split('&').filter(|p| !p.is_empty()).all(|pair| {
        let (key, wanted) = pair.split_once('=').unwrap_or((pair, ""));
        match record.get(key) {
            Some(Value::String(s)) => s == wanted,
            Some(other) => other.to_string() == wanted,
            None => false,
        }
    })
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body_json: Option<Value> = serde_json::from_slice(&body).ok();

    state.requests.lock().unwrap().push(Recorded {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        authorization: authorization.clone(),
        body: body_json.clone(),
    });

    if state.reject_all.load(Ordering::SeqCst) {
        return error(StatusCode::UNAUTHORIZED, "Could not validate credentials");
    }

    let bearer = format!("Bearer {}", ACCESS_TOKEN);
    let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();

    match (method, segments.as_slice()) {
        (Method::POST, ["auth", "login"]) => {
            let body = body_json.unwrap_or_default();
            if body["email"] == EMAIL && body["password"] == PASSWORD {
                Json(json!({
                    "access_token": ACCESS_TOKEN,
                    "refresh_token": REFRESH_TOKEN,
                    "token_type": "bearer",
                }))
                .into_response()
            } else {
                error(StatusCode::UNAUTHORIZED, "Incorrect email or password")
            }
        }
        (Method::POST, ["auth", "logout"]) => {
            Json(json!({ "message": "Logged out" })).into_response()
        }
        (Method::GET, ["auth", "me"]) => {
            if authorization.as_deref() == Some(bearer.as_str()) {
                Json(json!({
                    "id": OWNER,
                    "email": EMAIL,
                    "role": "user",
                    "created_at": NOW,
                }))
                .into_response()
            } else {
                error(StatusCode::UNAUTHORIZED, "Not authenticated")
            }
        }
        (Method::POST, ["images", "pets", pet_id, "profile"]) => Json(json!({
            "url": format!("https://cdn.example.com/pets/{}/profile.png", pet_id),
            "photo_id": "photo-1",
        }))
        .into_response(),

        (Method::GET, [collection]) => {
            let collections = state.collections.lock().unwrap();
            let items: Vec<Value> = collections
                .get(*collection)
                .map(|items| {
                    items
                        .iter()
                        .filter(|r| query_matches(r, uri.query()))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();
            Json(Value::Array(items)).into_response()
        }
        (Method::POST, [collection]) => {
            let mut record: Map<String, Value> = match body_json {
                Some(Value::Object(map)) => map,
                _ => return error(StatusCode::UNPROCESSABLE_ENTITY, "Body must be an object"),
            };
            let id = {
                let mut next = state.next_id.lock().unwrap();
                *next += 1;
                format!("{}-{}", collection, *next)
            };
            record.insert("id".to_string(), json!(id));
            record.entry("owner_id").or_insert(json!(OWNER));
            record.insert("created_at".to_string(), json!(NOW));
            record.insert("updated_at".to_string(), json!(NOW));
            let record = Value::Object(record);
            state
                .collections
                .lock()
                .unwrap()
                .entry(collection.to_string())
                .or_default()
                .push(record.clone());
            (StatusCode::CREATED, Json(record)).into_response()
        }
        (Method::GET, [collection, id]) => {
            let collections = state.collections.lock().unwrap();
            collections
                .get(*collection)
                .and_then(|items| items.iter().find(|r| r["id"] == *id))
                .map(|r| Json(r.clone()).into_response())
                .unwrap_or_else(|| error(StatusCode::NOT_FOUND, "Not found"))
        }
        (Method::PUT, [collection, id]) => {
            let mut collections = state.collections.lock().unwrap();
            let Some(record) = collections
                .get_mut(*collection)
                .and_then(|items| items.iter_mut().find(|r| r["id"] == *id))
            else {
                return error(StatusCode::NOT_FOUND, "Not found");
            };
            if let (Value::Object(target), Some(Value::Object(changes))) = (record, body_json) {
                for (key, value) in changes {
                    target.insert(key, value);
                }
                target.insert("updated_at".to_string(), json!("2025-01-16T10:00:00Z"));
                return Json(Value::Object(target.clone())).into_response();
            }
            error(StatusCode::UNPROCESSABLE_ENTITY, "Body must be an object")
        }
        (Method::DELETE, [collection, id]) => {
            let mut collections = state.collections.lock().unwrap();
            let Some(items) = collections.get_mut(*collection) else {
                return error(StatusCode::NOT_FOUND, "Not found");
            };
            let before = items.len();
            items.retain(|r| r["id"] != *id);
            if items.len() == before {
                return error(StatusCode::NOT_FOUND, "Not found");
            }
            StatusCode::NO_CONTENT.into_response()
        }
        _ => error(StatusCode::NOT_FOUND, "Not found"),
    }
}
