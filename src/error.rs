use std::collections::BTreeMap;

use axum::{
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

use crate::response::{ApiResponse, Meta};

/// Field name to the messages raised against it.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldErrors),

    #[error("Authentication credentials were not provided or are invalid")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] DbErr),

    #[error("Template error")]
    Template(#[from] askama::Error),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// A validation error carrying a single message for one field.
    pub fn field(name: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        push_field_error(&mut errors, name, message);
        AppError::Validation(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Template(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub fn push_field_error(errors: &mut FieldErrors, name: &str, message: impl Into<String>) {
    errors
        .entry(name.to_string())
        .or_default()
        .push(message.into());
}

/// Flatten `validator` output into the field error map.
pub fn field_errors_from(errors: &ValidationErrors) -> FieldErrors {
    let mut out = FieldErrors::new();
    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            let message = error
                .message
                .as_ref()
                .map(|m| m.to_string())
                .unwrap_or_else(|| match error.code.as_ref() {
                    "length" => "Ensure this field has a valid length.".to_string(),
                    "range" => "Value out of range.".to_string(),
                    _ => format!("Invalid {field}."),
                });
            push_field_error(&mut out, field.as_ref(), message);
        }
    }
    out
}

/// True when the store rejected a write because a unique constraint was hit.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        }

        let message = self.to_string();
        let data = match self {
            AppError::Validation(errors) => serde_json::to_value(errors),
            other => serde_json::to_value(ErrorData {
                error: other.to_string(),
            }),
        }
        .unwrap_or(serde_json::Value::Null);

        let body = ApiResponse {
            message,
            data: Some(data),
            meta: Some(Meta::empty()),
        };

        if status == StatusCode::UNAUTHORIZED {
            return (
                status,
                [(header::WWW_AUTHENTICATE, "Bearer")],
                axum::Json(body),
            )
                .into_response();
        }
        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
