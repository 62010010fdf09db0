use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};
use password_hash::rand_core::OsRng;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter};
use uuid::Uuid;
use validator::Validate;

use crate::{
    audit::{self, AuditAction},
    config::AppConfig,
    dto::auth::{Claims, LoginRequest, LoginResponse, RegisterRequest},
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    error::{AppError, AppResult, field_errors_from, is_unique_violation},
    models::User,
    state::AppState,
};

pub const DEFAULT_ROLE: &str = "user";
const EMAIL_TAKEN: &str = "user with this email already exists.";

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))?
        .to_string();
    Ok(hash)
}

/// Sign a bearer token for the given user.
pub fn issue_token(config: &AppConfig, user_id: Uuid, role: &str) -> AppResult<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(config.jwt_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user_id.to_string(),
        role: role.to_string(),
        exp: expiration.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub async fn register_user(state: &AppState, payload: RegisterRequest) -> AppResult<User> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(field_errors_from(&e)))?;
    let RegisterRequest { email, password } = payload;
    let email = email.trim().to_lowercase();

    let exists = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::field("email", EMAIL_TAKEN));
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(hash_password(&password)?),
        role: Set(DEFAULT_ROLE.to_string()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await
    .map_err(|err| {
        if is_unique_violation(&err) {
            AppError::field("email", EMAIL_TAKEN)
        } else {
            AppError::OrmError(err)
        }
    })?;

    tracing::info!(user_id = %user.id, "user registered");
    audit::record(
        &state.pool,
        Some(user.id),
        AuditAction::UserRegister,
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(User::from(user))
}

pub async fn login_user(state: &AppState, payload: LoginRequest) -> AppResult<LoginResponse> {
    let LoginRequest { email, password } = payload;
    let user = Users::find()
        .filter(UserCol::Email.eq(email.trim().to_lowercase()))
        .one(&state.orm)
        .await?;

    let user = match user {
        Some(u) => u,
        None => return Err(AppError::BadRequest("Invalid email or password".into())),
    };

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;

    if Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_err()
    {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let token = issue_token(&state.config, user.id, &user.role)?;

    audit::record(
        &state.pool,
        Some(user.id),
        AuditAction::UserLogin,
        serde_json::json!({ "user_id": user.id }),
    )
    .await;

    Ok(LoginResponse { token })
}
