//! Formulary HTTP API
//!
//! JSON API over the formula store and the evaluation engine. The engine is
//! stateless, so handlers call it directly; the store is the only shared
//! mutable state and sits behind a lock.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use formulary_engine::{evaluate, Bindings};
use formulary_store::{Formula, FormulaStore, StoreError};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

// Application state
struct AppState {
    store: RwLock<FormulaStore>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let state = Arc::new(AppState {
        store: RwLock::new(FormulaStore::with_examples()),
    });

    let addr: SocketAddr = std::env::var("FORMULARY_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:5000".to_string())
        .parse()
        .expect("FORMULARY_ADDR must be a socket address");

    info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app(state)).await.unwrap();
}

fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/formulas", get(list_formulas).post(create_formula))
        .route("/api/formulas/:id", delete(delete_formula))
        .route("/api/calculate", post(calculate))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Error payload: `{"error": message}` with a non-2xx status
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let status = match err {
            StoreError::DuplicateName(_) => StatusCode::CONFLICT,
            StoreError::NotFound => StatusCode::NOT_FOUND,
        };
        ApiError::new(status, err.to_string())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateFormulaRequest {
    name: String,
    formula_string: String,
    result_label: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CalculateRequest {
    formula_string: String,
    #[serde(default)]
    variables: Bindings,
}

async fn list_formulas(State(state): State<Arc<AppState>>) -> Json<Vec<Formula>> {
    let store = state.store.read().unwrap();
    Json(store.list().to_vec())
}

async fn create_formula(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateFormulaRequest>,
) -> Result<(StatusCode, Json<Formula>), ApiError> {
    if request.name.trim().is_empty()
        || request.formula_string.trim().is_empty()
        || request.result_label.trim().is_empty()
    {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, "Missing data"));
    }

    let mut store = state.store.write().unwrap();
    let formula = store.create(request.name, request.formula_string, request.result_label)?;

    info!(name = %formula.name, id = %formula.id, "formula created");
    Ok((StatusCode::CREATED, Json(formula)))
}

async fn delete_formula(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    // An unparseable id cannot name a stored formula
    let id = Uuid::parse_str(&id).map_err(|_| ApiError::from(StoreError::NotFound))?;

    let mut store = state.store.write().unwrap();
    store.delete(id)?;

    info!(%id, "formula deleted");
    Ok(Json(json!({ "message": "Formula deleted successfully" })))
}

async fn calculate(
    Json(request): Json<CalculateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if request.formula_string.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Missing formula string",
        ));
    }

    // Evaluation errors go back to the caller verbatim
    let result = evaluate(&request.formula_string, &request.variables)
        .map_err(|err| ApiError::new(StatusCode::BAD_REQUEST, err.to_string()))?;

    Ok(Json(json!({ "result": result })))
}
