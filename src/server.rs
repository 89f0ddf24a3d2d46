use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use crate::bindings::{BindingInfo, Dashboard, Snapshot};
use crate::derive::{DropdownOption, dropdown_options};
use crate::error::DashboardError;
use crate::page;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Dashboard(#[from] DashboardError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Dashboard(DashboardError::IndexOutOfRange { .. }) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Dashboard(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "error": self.to_string(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Mutex<Dashboard>>,
    options: Arc<Vec<DropdownOption>>,
    bindings: Arc<Vec<BindingInfo>>,
    page: Arc<str>,
}

impl AppState {
    pub fn new(dashboard: Dashboard) -> Self {
        let options = dropdown_options(dashboard.dataset());
        let bindings = dashboard.registry().describe();
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            options: Arc::new(options),
            bindings: Arc::new(bindings),
            page: Arc::from(page::render_page()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectionRequest {
    pub index: i64,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    rows: usize,
    data_path: Option<String>,
    loaded_at: DateTime<Utc>,
    generation: u64,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/options", get(options))
        .route("/api/view", get(view))
        .route("/api/selection", post(select))
        .route("/api/bindings", get(bindings))
        .route("/api/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutdown requested");
    }
}

async fn index(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

async fn options(State(state): State<AppState>) -> Json<Vec<DropdownOption>> {
    Json(state.options.as_ref().clone())
}

async fn view(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.dashboard.lock().await.snapshot())
}

async fn select(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    let snapshot = state.dashboard.lock().await.select(req.index)?;
    Ok(Json(snapshot))
}

async fn bindings(State(state): State<AppState>) -> Json<Vec<BindingInfo>> {
    Json(state.bindings.as_ref().clone())
}

async fn health(State(state): State<AppState>) -> Json<Health> {
    let dashboard = state.dashboard.lock().await;
    let data = dashboard.dataset();
    Json(Health {
        status: "ok",
        rows: data.len(),
        data_path: data.source().map(|p| p.display().to_string()),
        loaded_at: data.loaded_at(),
        generation: dashboard.generation(),
    })
}
