//! Shared test helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Json;
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tokio::sync::Notify;

use kyarafit_client::{HealthStatus, HttpPieceClient, PieceApi};
use kyarafit_core::config::{ApiConfig, StoreConfig};
use kyarafit_core::traits::{SessionProvider, StaticSession};
use kyarafit_core::types::{AccessToken, Page, PieceId, QueryCriteria};
use kyarafit_core::{AppError, AppResult};
use kyarafit_entity::{CreatePiece, Piece, UpdatePiece};
use kyarafit_store::PieceStore;

/// Token accepted by the fake backend.
pub const TOKEN: &str = "test-token";

/// A piece with fixed timestamps; `minute` orders pieces by creation.
pub fn piece(id: &str, name: &str, category: &str, minute: u32) -> Piece {
    let at = Utc
        .with_ymd_and_hms(2024, 1, 15, 10, minute, 0)
        .single()
        .expect("valid timestamp");
    Piece {
        id: PieceId::new(id),
        user_id: None,
        name: name.to_string(),
        description: None,
        image_url: None,
        thumbnail_url: None,
        category: Some(category.to_string()),
        tags: Vec::new(),
        source_link: None,
        purchase_date: None,
        price: None,
        created_at: at,
        updated_at: at,
    }
}

/// In-memory [`PieceApi`] whose list responses can be held back.
///
/// A list call snapshots its result when it is made, then waits on the
/// gate registered for its search term (if any) before answering. Release
/// gates in any order to force out-of-order arrival.
#[derive(Debug, Default)]
pub struct ScriptedApi {
    pieces: Mutex<Vec<Piece>>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    seen: Mutex<Vec<QueryCriteria>>,
    fail_list: Mutex<Option<AppError>>,
    fail_create: Mutex<Option<AppError>>,
    list_calls: AtomicUsize,
    create_calls: AtomicUsize,
}

impl ScriptedApi {
    pub fn with_pieces(pieces: Vec<Piece>) -> Arc<Self> {
        let api = Self::default();
        *api.pieces.lock().unwrap() = pieces;
        Arc::new(api)
    }

    /// Hold list calls searching for `search` (`""` for no search) until
    /// the returned gate is notified.
    pub fn gate(&self, search: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .unwrap()
            .insert(search.to_string(), gate.clone());
        gate
    }

    /// Fail the next list call with `err`.
    pub fn fail_next_list(&self, err: AppError) {
        *self.fail_list.lock().unwrap() = Some(err);
    }

    /// Fail the next create call with `err`.
    pub fn fail_next_create(&self, err: AppError) {
        *self.fail_create.lock().unwrap() = Some(err);
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    /// Criteria of every list call, in call order.
    pub fn seen(&self) -> Vec<QueryCriteria> {
        self.seen.lock().unwrap().clone()
    }

    /// Search terms of every list call, in call order.
    pub fn searches(&self) -> Vec<Option<String>> {
        self.seen().into_iter().map(|c| c.search).collect()
    }
}

#[async_trait]
impl PieceApi for ScriptedApi {
    async fn list(&self, _token: &AccessToken, criteria: &QueryCriteria) -> AppResult<Page<Piece>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(criteria.clone());

        let result = match self.fail_list.lock().unwrap().take() {
            Some(err) => Err(err),
            None => {
                let matching: Vec<Piece> = self
                    .pieces
                    .lock()
                    .unwrap()
                    .iter()
                    .filter(|p| p.matches(criteria))
                    .cloned()
                    .collect();
                let total = matching.len() as u64;
                let items = matching
                    .into_iter()
                    .skip(criteria.offset as usize)
                    .take(criteria.limit as usize)
                    .collect();
                Ok(Page::new(items, total, criteria.limit, criteria.offset))
            }
        };

        let key = criteria.search.clone().unwrap_or_default();
        let gate = self.gates.lock().unwrap().get(&key).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        result
    }

    async fn get(&self, _token: &AccessToken, id: &PieceId) -> AppResult<Piece> {
        self.pieces
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| AppError::not_found("piece not found (HTTP 404)"))
    }

    async fn create(&self, _token: &AccessToken, draft: &CreatePiece) -> AppResult<Piece> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(err) = self.fail_create.lock().unwrap().take() {
            return Err(err);
        }
        let now = Utc::now();
        let created = Piece {
            id: PieceId::new(format!("created-{n}")),
            user_id: None,
            name: draft.name.clone(),
            description: draft.description.clone(),
            image_url: draft.image_url.clone(),
            thumbnail_url: draft.thumbnail_url.clone(),
            category: draft.category.clone(),
            tags: draft.tags.clone(),
            source_link: draft.source_link.clone(),
            purchase_date: draft.purchase_date,
            price: draft.price,
            created_at: now,
            updated_at: now,
        };
        self.pieces.lock().unwrap().insert(0, created.clone());
        Ok(created)
    }

    async fn update(&self, _token: &AccessToken, id: &PieceId, patch: &UpdatePiece) -> AppResult<Piece> {
        let mut pieces = self.pieces.lock().unwrap();
        let piece = pieces
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| AppError::not_found("piece not found (HTTP 404)"))?;
        if let Some(name) = &patch.name {
            piece.name = name.clone();
        }
        if let Some(price) = patch.price {
            piece.price = Some(price);
        }
        Ok(piece.clone())
    }

    async fn delete(&self, _token: &AccessToken, id: &PieceId) -> AppResult<()> {
        self.pieces.lock().unwrap().retain(|p| &p.id != id);
        Ok(())
    }

    async fn list_categories(&self, _token: &AccessToken) -> AppResult<Vec<String>> {
        let mut categories: Vec<String> = Vec::new();
        for p in self.pieces.lock().unwrap().iter() {
            if let Some(c) = &p.category {
                if !categories.contains(c) {
                    categories.push(c.clone());
                }
            }
        }
        Ok(categories)
    }

    async fn health(&self) -> AppResult<HealthStatus> {
        Ok(HealthStatus {
            status: "ok".to_string(),
            service: Some("scripted".to_string()),
        })
    }
}

/// A store over `api` with a fixed session.
pub fn store(api: &Arc<ScriptedApi>, token: Option<&str>, config: StoreConfig) -> Arc<PieceStore> {
    let session: Arc<dyn SessionProvider> = Arc::new(StaticSession::from_token(token));
    store_with_session(api, session, config)
}

pub fn store_with_session(
    api: &Arc<ScriptedApi>,
    session: Arc<dyn SessionProvider>,
    config: StoreConfig,
) -> Arc<PieceStore> {
    let api: Arc<dyn PieceApi> = api.clone();
    Arc::new(PieceStore::new(api, session, config))
}

// ── Fake HTTP backend ──────────────────────────────────────────

/// State behind the fake backend.
#[derive(Debug, Clone, Default)]
pub struct Backend {
    pub pieces: Arc<Mutex<Vec<Value>>>,
    pub fail_next: Arc<Mutex<Option<StatusCode>>>,
    pub requests: Arc<AtomicUsize>,
}

/// A running fake backend.
pub struct TestServer {
    pub base_url: String,
    pub backend: Backend,
}

impl TestServer {
    /// Serve the fake backend on an ephemeral local port.
    pub async fn start(pieces: Vec<Value>) -> Self {
        let backend = Backend::default();
        *backend.pieces.lock().unwrap() = pieces;

        let app = Router::new()
            .route("/health", get(health))
            .route("/api/v1/pieces", get(list_pieces).post(create_piece))
            .route("/api/v1/pieces/categories", get(list_categories))
            .route(
                "/api/v1/pieces/{id}",
                get(get_piece).put(update_piece).delete(delete_piece),
            )
            .with_state(backend.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve");
        });

        Self {
            base_url: format!("http://{addr}"),
            backend,
        }
    }

    /// A client pointed at this server.
    pub fn client(&self) -> HttpPieceClient {
        HttpPieceClient::new(&ApiConfig {
            base_url: self.base_url.clone(),
            timeout_seconds: 5,
            ..ApiConfig::default()
        })
        .expect("client")
    }

    /// Answer the next request with `status` and an error body.
    pub fn fail_next(&self, status: StatusCode) {
        *self.backend.fail_next.lock().unwrap() = Some(status);
    }

    pub fn requests(&self) -> usize {
        self.backend.requests.load(Ordering::SeqCst)
    }
}

/// A piece as the backend serializes it.
pub fn piece_json(id: &str, name: &str, category: &str) -> Value {
    json!({
        "id": id,
        "user_id": "8d7f7a5c-1b7e-4a53-9a63-2f0f3c8e6a10",
        "name": name,
        "category": category,
        "tags": ["test"],
        "purchase_date": "2024-01-10T00:00:00Z",
        "price": 10.5,
        "created_at": "2024-01-15T10:30:00Z",
        "updated_at": "2024-01-15T10:30:00Z"
    })
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Count the request and apply the auth check and any forced failure.
fn gate(backend: &Backend, headers: Option<&HeaderMap>) -> Result<(), Response> {
    backend.requests.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = backend.fail_next.lock().unwrap().take() {
        return Err(error(status, "forced failure"));
    }
    if let Some(headers) = headers {
        let expected = format!("Bearer {TOKEN}");
        let authorized = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v == expected);
        if !authorized {
            return Err(error(StatusCode::UNAUTHORIZED, "invalid or expired token"));
        }
    }
    Ok(())
}

async fn health(State(backend): State<Backend>) -> Response {
    if let Err(resp) = gate(&backend, None) {
        return resp;
    }
    Json(json!({ "status": "ok", "service": "kyarafit-api" })).into_response()
}

async fn list_pieces(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if let Err(resp) = gate(&backend, Some(&headers)) {
        return resp;
    }
    let limit: usize = params.get("limit").and_then(|v| v.parse().ok()).unwrap_or(50);
    let offset: usize = params.get("offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let search = params.get("search").map(|s| s.to_lowercase());
    let category = params.get("category");

    let matching: Vec<Value> = backend
        .pieces
        .lock()
        .unwrap()
        .iter()
        .filter(|p| {
            search.as_ref().is_none_or(|s| {
                p["name"]
                    .as_str()
                    .is_some_and(|n| n.to_lowercase().contains(s.as_str()))
            })
        })
        .filter(|p| category.is_none_or(|c| p["category"].as_str() == Some(c.as_str())))
        .cloned()
        .collect();
    let total = matching.len();
    let page: Vec<Value> = matching.into_iter().skip(offset).take(limit).collect();

    // The backend sends `null` rather than an empty array.
    let pieces = if page.is_empty() { Value::Null } else { Value::Array(page) };
    Json(json!({
        "pieces": pieces,
        "total_count": total,
        "limit": limit,
        "offset": offset
    }))
    .into_response()
}

async fn create_piece(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = gate(&backend, Some(&headers)) {
        return resp;
    }
    let name = body["name"].as_str().unwrap_or_default().trim().to_string();
    if name.is_empty() {
        return error(StatusCode::BAD_REQUEST, "name is required");
    }

    let mut piece = body.clone();
    let id = uuid::Uuid::new_v4().to_string();
    piece["id"] = json!(id);
    piece["name"] = json!(name);
    piece["created_at"] = json!("2024-02-01T12:00:00Z");
    piece["updated_at"] = json!("2024-02-01T12:00:00Z");
    backend.pieces.lock().unwrap().insert(0, piece.clone());

    (
        StatusCode::CREATED,
        Json(json!({ "piece": piece, "message": "Piece created successfully" })),
    )
        .into_response()
}

async fn list_categories(State(backend): State<Backend>, headers: HeaderMap) -> Response {
    if let Err(resp) = gate(&backend, Some(&headers)) {
        return resp;
    }
    let categories: Vec<Value> = backend
        .pieces
        .lock()
        .unwrap()
        .iter()
        .map(|p| p["category"].clone())
        .collect();
    Json(json!({ "categories": categories })).into_response()
}

async fn get_piece(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = gate(&backend, Some(&headers)) {
        return resp;
    }
    let found = backend
        .pieces
        .lock()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id.as_str())
        .cloned();
    match found {
        // Single reads come back bare.
        Some(piece) => Json(piece).into_response(),
        None => error(StatusCode::NOT_FOUND, "piece not found"),
    }
}

async fn update_piece(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    if let Err(resp) = gate(&backend, Some(&headers)) {
        return resp;
    }
    let mut pieces = backend.pieces.lock().unwrap();
    let Some(piece) = pieces.iter_mut().find(|p| p["id"] == id.as_str()) else {
        return error(StatusCode::NOT_FOUND, "piece not found");
    };
    if let (Some(target), Some(patch)) = (piece.as_object_mut(), body.as_object()) {
        for (k, v) in patch {
            target.insert(k.clone(), v.clone());
        }
        target.insert("updated_at".to_string(), json!("2024-02-02T08:00:00Z"));
    }
    Json(json!({ "piece": piece.clone() })).into_response()
}

async fn delete_piece(
    State(backend): State<Backend>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if let Err(resp) = gate(&backend, Some(&headers)) {
        return resp;
    }
    let mut pieces = backend.pieces.lock().unwrap();
    let before = pieces.len();
    pieces.retain(|p| p["id"] != id.as_str());
    if pieces.len() == before {
        return error(StatusCode::NOT_FOUND, "piece not found");
    }
    StatusCode::NO_CONTENT.into_response()
}
