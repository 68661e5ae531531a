use crate::auth::JwtManager;
use crate::database::Repository;
use crate::utils::error::ApiError;
use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub username: String,
}

/// Admin login - POST /api/admin/login
pub async fn login_handler(
    Extension(repository): Extension<Arc<Repository>>,
    Extension(jwt): Extension<Arc<JwtManager>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if request.username.is_empty() || request.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }

    let admin = repository
        .find_admin_by_username(&request.username)
        .await
        .map_err(|e| ApiError::DatabaseError(e.to_string()))?
        .ok_or_else(|| {
            warn!("Login attempt for unknown admin: {}", request.username);
            ApiError::Unauthorized("Invalid credentials".to_string())
        })?;

    let parsed_hash = PasswordHash::new(&admin.password_hash)
        .map_err(|e| ApiError::InternalError(format!("Corrupt password hash: {}", e)))?;

    Argon2::default()
        .verify_password(request.password.as_bytes(), &parsed_hash)
        .map_err(|_| {
            warn!("Failed login for admin: {}", admin.username);
            ApiError::Unauthorized("Invalid credentials".to_string())
        })?;

    let access_token = jwt
        .generate_token(admin.id, &admin.username)
        .map_err(|e| ApiError::InternalError(e.to_string()))?;

    info!("Admin logged in: {}", admin.username);

    Ok(Json(LoginResponse {
        access_token,
        username: admin.username,
    }))
}
