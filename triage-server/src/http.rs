//! Triage HTTP API
//!
//! Axum-based HTTP server exposing ticket analysis and the in-memory ticket
//! list. Each endpoint has a thin axum handler that delegates to an inner
//! function returning `(StatusCode, serde_json::Value)`; the inner functions
//! are tested directly.
//!
//! Endpoints:
//! - GET   /health: liveness, model and ticket count
//! - GET   /version: server version info
//! - POST  /analyze: analyze a new ticket submission
//! - GET   /tickets: list tickets, newest first
//! - POST  /tickets: promote an analysis into an Open ticket
//! - GET   /tickets/:id: fetch one ticket
//! - PATCH /tickets/:id/status: change a ticket's status
//! - GET   /dashboard: aggregate counts and queues

use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use triage_core::api::{TriageRequest, TriageResponse};
use triage_core::{NewTicketRequest, TicketAnalysis, TicketStatus};

use crate::router;
use crate::state::AppState;

/// Build the Axum router with all endpoints
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        .route("/analyze", post(analyze_handler))
        .route("/tickets", get(list_tickets_handler).post(create_ticket_handler))
        .route("/tickets/:id", get(get_ticket_handler))
        .route("/tickets/:id/status", patch(update_status_handler))
        .route("/dashboard", get(dashboard_handler))
        .with_state(state)
}

/// Start the HTTP server on the configured address.
/// Gracefully shuts down when the broadcast shutdown signal fires.
pub async fn start_http_server(
    state: Arc<AppState>,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    let addr = format!("{}:{}", state.config.http.host, state.config.http.port);

    let app = build_router(state);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Triage HTTP API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown.recv().await;
            tracing::info!("HTTP server shutting down...");
        })
        .await?;

    Ok(())
}

// ============================================================================
// Request / Response DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: TicketStatus,
}

/// Standard HTTP error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: String,
}

impl ErrorResponse {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            error: msg.into(),
            status: "error".to_string(),
        }
    }

    fn into_value(self) -> serde_json::Value {
        serde_json::json!({
            "error": self.error,
            "status": self.status,
        })
    }
}

// ============================================================================
// Inner (directly testable) functions
// ============================================================================

pub async fn health_inner(state: &AppState) -> (StatusCode, serde_json::Value) {
    (
        StatusCode::OK,
        serde_json::json!({
            "status": "healthy",
            "version": env!("CARGO_PKG_VERSION"),
            "model": state.analyzer.model(),
            "tickets": state.store.len().await,
        }),
    )
}

/// Inner version: returns version info (pure, no IO).
pub fn version_inner() -> serde_json::Value {
    serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "protocol": "triage/1",
    })
}

/// Inner analyze: rejects blank submissions, otherwise runs one analysis.
pub async fn analyze_inner(
    state: &AppState,
    ticket: NewTicketRequest,
) -> (StatusCode, serde_json::Value) {
    if ticket.customer_name.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("customerName is required").into_value(),
        );
    }
    if ticket.issue_description.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            ErrorResponse::new("issueDescription is required").into_value(),
        );
    }

    let response = router::handle_request(TriageRequest::Analyze { ticket }, state).await;
    to_http(response, StatusCode::OK, StatusCode::BAD_GATEWAY)
}

pub async fn list_tickets_inner(state: &AppState) -> (StatusCode, serde_json::Value) {
    let response = router::handle_request(TriageRequest::ListTickets, state).await;
    to_http(response, StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn create_ticket_inner(
    state: &AppState,
    analysis: TicketAnalysis,
) -> (StatusCode, serde_json::Value) {
    let response = router::handle_request(TriageRequest::CreateTicket { analysis }, state).await;
    to_http(response, StatusCode::CREATED, StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn get_ticket_inner(state: &AppState, id: String) -> (StatusCode, serde_json::Value) {
    let response = router::handle_request(TriageRequest::GetTicket { id }, state).await;
    to_http(response, StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn update_status_inner(
    state: &AppState,
    id: String,
    update: StatusUpdate,
) -> (StatusCode, serde_json::Value) {
    let request = TriageRequest::UpdateStatus {
        id,
        status: update.status,
    };
    let response = router::handle_request(request, state).await;
    to_http(response, StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR)
}

pub async fn dashboard_inner(state: &AppState) -> (StatusCode, serde_json::Value) {
    let response = router::handle_request(TriageRequest::Dashboard, state).await;
    to_http(response, StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR)
}

// ============================================================================
// Axum handler wrappers (thin: delegate to inner functions)
// ============================================================================

pub async fn health_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, body) = health_inner(&state).await;
    (status, Json(body))
}

pub async fn version_handler() -> impl IntoResponse {
    (StatusCode::OK, Json(version_inner()))
}

pub async fn analyze_handler(
    State(state): State<Arc<AppState>>,
    Json(ticket): Json<NewTicketRequest>,
) -> impl IntoResponse {
    let (status, body) = analyze_inner(&state, ticket).await;
    (status, Json(body))
}

pub async fn list_tickets_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, body) = list_tickets_inner(&state).await;
    (status, Json(body))
}

pub async fn create_ticket_handler(
    State(state): State<Arc<AppState>>,
    Json(analysis): Json<TicketAnalysis>,
) -> impl IntoResponse {
    let (status, body) = create_ticket_inner(&state, analysis).await;
    (status, Json(body))
}

pub async fn get_ticket_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let (status, body) = get_ticket_inner(&state, id).await;
    (status, Json(body))
}

pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> impl IntoResponse {
    let (status, body) = update_status_inner(&state, id, update).await;
    (status, Json(body))
}

pub async fn dashboard_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let (status, body) = dashboard_inner(&state).await;
    (status, Json(body))
}

// ============================================================================
// Helpers
// ============================================================================

/// Convert a `TriageResponse` into an HTTP body value, or an error string.
pub fn response_to_http(response: TriageResponse) -> std::result::Result<serde_json::Value, String> {
    if response.is_ok() {
        Ok(response.data.unwrap_or(serde_json::json!({})))
    } else {
        Err(response.error.unwrap_or_else(|| "unknown error".to_string()))
    }
}

/// Not-found responses always map to 404; other errors use `err_status`.
fn to_http(
    response: TriageResponse,
    ok_status: StatusCode,
    err_status: StatusCode,
) -> (StatusCode, serde_json::Value) {
    let err_status = if response.is_not_found() {
        StatusCode::NOT_FOUND
    } else {
        err_status
    };
    match response_to_http(response) {
        Ok(data) => (ok_status, data),
        Err(e) => (err_status, ErrorResponse::new(e).into_value()),
    }
}

// ============================================================================
// Unit Tests: call inner functions directly
// ============================================================================
