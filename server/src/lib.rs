use anyhow::Result;
use axum::{async_trait, extract::{FromRequestParts, Query, State}, http::{request::Parts, HeaderValue, StatusCode}, routing::{get, post}, Json, Router};
use search_core::{IndexReport, IndexStore, ParseMode, SearchEngine, SearchHit};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Everything the router needs to know about where the corpus and index live.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub index_path: PathBuf,
    /// Directory re-indexed by `POST /index`.
    pub root: PathBuf,
    pub mode: ParseMode,
    /// Static assets served for any other path (`index.html` for `/`).
    pub static_dir: PathBuf,
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 5 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SearchEngine>,
    pub root: PathBuf,
    pub admin_token: Option<String>,
}

pub fn build_app(config: ServerConfig) -> Result<Router> {
    let engine = SearchEngine::new(IndexStore::new(&config.index_path), config.mode);
    let app_state = AppState { engine: Arc::new(engine), root: config.root, admin_token: config.admin_token };

    let cors = cors_from_env();

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler).post(search_body_handler))
        .route("/index", post(index_handler))
        .fallback_service(ServeDir::new(&config.static_dir))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

/// Origins from the comma-separated `CORS_ALLOW_ORIGIN`; any origin when unset or unparsable.
fn cors_from_env() -> CorsLayer {
    let origins: Vec<HeaderValue> = std::env::var("CORS_ALLOW_ORIGIN")
        .map(|val| val.split(',').filter_map(|s| s.trim().parse().ok()).collect())
        .unwrap_or_default();
    let allow = if origins.is_empty() { AllowOrigin::any() } else { AllowOrigin::list(origins) };
    CorsLayer::new().allow_origin(allow).allow_methods(Any).allow_headers(Any)
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    run_search(state, params.q, params.k).await.map(Json)
}

/// The query is the raw request body, as posted by the search form.
pub async fn search_body_handler(State(state): State<AppState>, body: String) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    run_search(state, body, default_k()).await.map(Json)
}

async fn run_search(state: AppState, query: String, k: usize) -> Result<SearchResponse, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let engine = state.engine.clone();
    let q = query.clone();
    // Every search reloads the index from disk.
    let mut hits = tokio::task::spawn_blocking(move || engine.search(&q))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    let total_hits = hits.len();
    hits.truncate(k.clamp(1, 100));
    let elapsed = start.elapsed();
    tracing::debug!(query = %query, total_hits, "search served");
    Ok(SearchResponse { query, took_s: elapsed.as_secs_f64(), total_hits, results: hits })
}

async fn index_handler(State(state): State<AppState>, _admin: AdminAuth) -> Result<Json<IndexReport>, (StatusCode, String)> {
    let engine = state.engine.clone();
    let root = state.root.clone();
    let report = tokio::task::spawn_blocking(move || engine.index(&root))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok(Json(report))
}

/// Proof that the request carried the configured `X-ADMIN-TOKEN`.
pub struct AdminAuth;

#[async_trait]
impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(required) = state.admin_token.as_deref() else {
            return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into()));
        };
        match parts.headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()) {
            Some(provided) if provided == required => Ok(AdminAuth),
            _ => Err((StatusCode::UNAUTHORIZED, "invalid admin token".into())),
        }
    }
}
