pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod storage;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post, put};
use axum::Router;
use serde_json::json;
use sqlx::PgPool;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

/// Shared application state, passed down explicitly to handlers.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

/// Build the router: two public product routes, three admin-gated ones,
/// static serving of the uploads area, and a health endpoint.
pub fn app(state: AppState) -> Router {
    let public = Router::new()
        .route("/products", get(handlers::public::products::list))
        .route("/products/:id", get(handlers::public::products::get));

    // route_layer ordering: jwt_auth runs first, then the role check
    let admin = Router::new()
        .route("/products", post(handlers::protected::products::create))
        .route(
            "/products/:id",
            put(handlers::protected::products::update)
                .delete(handlers::protected::products::remove),
        )
        .route_layer(axum::middleware::from_fn(middleware::require_admin))
        .route_layer(axum::middleware::from_fn(middleware::jwt_auth))
        .layer(DefaultBodyLimit::max(config::config().max_upload_bytes));

    Router::new()
        .route("/health", get(health))
        .merge(public)
        .merge(admin)
        .nest_service("/uploads", ServeDir::new(&config::config().upload_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match database::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "status": "degraded",
                "timestamp": now,
                "error": e.to_string()
            })),
        ),
    }
}
