use serde_json::Value;
use uuid::Uuid;

use crate::{db::DbPool, error::AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditAction {
    ProductCreate,
    ProductUpdate,
    ProductDelete,
    ProductToggleFeatured,
    CategoryCreate,
    CategoryUpdate,
    CategoryDelete,
    UserRegister,
    UserLogin,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::ProductCreate => "product_create",
            AuditAction::ProductUpdate => "product_update",
            AuditAction::ProductDelete => "product_delete",
            AuditAction::ProductToggleFeatured => "product_toggle_featured",
            AuditAction::CategoryCreate => "category_create",
            AuditAction::CategoryUpdate => "category_update",
            AuditAction::CategoryDelete => "category_delete",
            AuditAction::UserRegister => "user_register",
            AuditAction::UserLogin => "user_login",
        }
    }

    pub fn resource(&self) -> &'static str {
        match self {
            AuditAction::ProductCreate
            | AuditAction::ProductUpdate
            | AuditAction::ProductDelete
            | AuditAction::ProductToggleFeatured => "products",
            AuditAction::CategoryCreate
            | AuditAction::CategoryUpdate
            | AuditAction::CategoryDelete => "categories",
            AuditAction::UserRegister | AuditAction::UserLogin => "users",
        }
    }
}

pub async fn log_audit(
    pool: &DbPool,
    user_id: Option<Uuid>,
    action: AuditAction,
    metadata: Option<Value>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO audit_logs (id, user_id, action, resource, metadata)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .bind(action.as_str())
    .bind(action.resource())
    .bind(metadata)
    .execute(pool)
    .await?;

    Ok(())
}

/// Write an audit row; a failure is logged and never fails the caller.
pub async fn record(pool: &DbPool, user_id: Option<Uuid>, action: AuditAction, metadata: Value) {
    if let Err(err) = log_audit(pool, user_id, action, Some(metadata)).await {
        tracing::warn!(error = %err, action = action.as_str(), "audit log failed");
    }
}
