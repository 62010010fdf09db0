use axum::{
    Json, Router,
    http::{StatusCode, Uri, header},
    response::IntoResponse,
    routing::get,
};

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod admin;
pub mod auth;
pub mod categories;
pub mod doc;
pub mod health;
pub mod pages;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .merge(products::router())
        .merge(categories::router())
        .merge(auth::router())
}

/// Every route of the service, bound to its state. Tower layers are added by the binary.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_redirect))
        .route("/health", get(health::health_check))
        .merge(pages::router())
        .merge(admin::router())
        .nest("/api", create_api_router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

pub async fn root_redirect() -> impl IntoResponse {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, "/products/")],
    )
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    let body = ApiResponse::success(
        "Not Found",
        serde_json::json!({ "path": uri.path() }),
        Some(Meta::empty()),
    );
    (StatusCode::NOT_FOUND, Json(body))
}
