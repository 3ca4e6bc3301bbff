//! HTTP request handlers

use std::sync::Arc;
use std::net::SocketAddr;
use axum::{
    extract::{ConnectInfo, Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use super::state::{FirewallState, ListError};

/// Shared state for the HTTP server
#[derive(Clone)]
pub struct AppState {
    firewall: Arc<RwLock<FirewallState>>,
}

impl AppState {
    pub fn new(firewall: Arc<RwLock<FirewallState>>) -> Self {
        Self { firewall }
    }
}

type Reply = (StatusCode, Json<Value>);

fn message(code: StatusCode, message: &str) -> Reply {
    (code, Json(json!({ "message": message })))
}

fn list_error(e: ListError) -> Reply {
    match e {
        ListError::InvalidIp => message(StatusCode::BAD_REQUEST, "The ip is not valid"),
        ListError::NotFound => message(StatusCode::NOT_FOUND, "Not found"),
    }
}

/// Liveness check
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

/// Everything the admin panel shows, in one document
pub async fn status(State(state): State<AppState>) -> Json<FirewallState> {
    let firewall = state.firewall.read().await;
    Json(firewall.clone())
}

pub async fn blacklist(State(state): State<AppState>) -> Json<Value> {
    let firewall = state.firewall.read().await;
    Json(json!(firewall.blacklist))
}

pub async fn whitelist(State(state): State<AppState>) -> Json<Value> {
    let firewall = state.firewall.read().await;
    Json(json!(firewall.whitelist))
}

pub async fn refused(State(state): State<AppState>) -> Json<Value> {
    let firewall = state.firewall.read().await;
    Json(json!(firewall.refused))
}

pub async fn block(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let mut firewall = state.firewall.write().await;
    match firewall.block(&id) {
        Ok(()) => message(StatusCode::OK, "Ok"),
        Err(e) => list_error(e),
    }
}

pub async fn allow(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let mut firewall = state.firewall.write().await;
    match firewall.allow(&id) {
        Ok(()) => message(StatusCode::OK, "Ok"),
        Err(e) => list_error(e),
    }
}

pub async fn unblock(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let mut firewall = state.firewall.write().await;
    removed(firewall.unblock(&id))
}

pub async fn disallow(State(state): State<AppState>, Path(id): Path<String>) -> Reply {
    let mut firewall = state.firewall.write().await;
    removed(firewall.disallow(&id))
}

fn removed(result: Result<usize, ListError>) -> Reply {
    match result {
        Ok(count) => (
            StatusCode::OK,
            Json(json!({ "message": "The element was removed", "count": count })),
        ),
        Err(e) => list_error(e),
    }
}

/// Admission gate for the served content
///
/// Every request is counted as allowed or refused for its client address;
/// refused clients get a 403.
pub async fn admission(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let admitted = state.firewall.write().await.admit(addr.ip());
    if !admitted {
        return message(StatusCode::FORBIDDEN, "Forbidden").into_response();
    }
    next.run(request).await
}
