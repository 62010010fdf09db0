use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{audit_logs, categories, products, users};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub role: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
}

/// Read view of a product; the category is nested in full.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "19.99")]
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_active: bool,
    pub is_featured: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuditEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<categories::Model> for Category {
    fn from(model: categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
        }
    }
}

impl Product {
    pub fn from_entity(model: products::Model, category: Option<categories::Model>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            category: category.map(Category::from),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
            is_active: model.is_active,
            is_featured: model.is_featured,
        }
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            password_hash: model.password_hash,
            created_at: model.created_at.with_timezone(&Utc),
            role: model.role,
        }
    }
}

impl From<audit_logs::Model> for AuditEntry {
    fn from(model: audit_logs::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            action: model.action,
            resource: model.resource,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
