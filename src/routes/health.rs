use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub database: String,
}

pub fn health_report(database_up: bool) -> HealthData {
    let (status, database) = if database_up {
        ("ok", "up")
    } else {
        ("degraded", "down")
    };
    HealthData {
        status: status.to_string(),
        database: database.to_string(),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthData>> {
    let database_up = match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => true,
        Err(err) => {
            tracing::warn!(error = %err, "database ping failed");
            false
        }
    };

    Json(ApiResponse::success(
        "Health check",
        health_report(database_up),
        Some(Meta::empty()),
    ))
}
