#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use product_catalog::{
    config::{AppConfig, SiteConfig},
    db::{create_pool, run_migrations},
    entity::users::ActiveModel as UserActive,
    routes::create_router,
    services::auth_service::{hash_password, issue_token},
    state::AppState,
};
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::ActiveModelTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

/// State against the test database, or `None` when no database is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run flow tests.");
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 5).await?;
    run_migrations(&pool).await?;

    let config = AppConfig {
        database_url,
        host: "127.0.0.1".into(),
        port: 0,
        max_connections: 5,
        jwt_secret: "test-secret".into(),
        jwt_ttl_hours: 1,
        site: SiteConfig::default(),
    };
    Ok(Some(AppState::new(pool, config)))
}

/// Suffix that keeps names unique across runs sharing one database.
pub fn unique(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

pub async fn create_user(state: &AppState, role: &str) -> anyhow::Result<String> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{}@example.com", Uuid::new_v4().simple())),
        password_hash: Set(hash_password("password123")?),
        role: Set(role.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    Ok(issue_token(&state.config, user.id, role)?)
}

pub fn app(state: &AppState) -> Router {
    create_router(state.clone())
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("request")
}

pub fn form_request(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn send(app: &Router, request: Request<Body>) -> anyhow::Result<Response<Body>> {
    Ok(app.clone().oneshot(request).await?)
}

pub async fn body_json(response: Response<Body>) -> anyhow::Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

pub async fn body_text(response: Response<Body>) -> anyhow::Result<String> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    Ok(String::from_utf8(bytes.to_vec())?)
}
