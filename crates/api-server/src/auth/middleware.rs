use crate::auth::jwt::JwtManager;
use crate::utils::error::ApiError;
use axum::{
    extract::Request,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

/// Bearer-token guard for the admin mutation routes. Public read
/// endpoints never pass through here.
pub async fn admin_auth_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let jwt = request
        .extensions()
        .get::<Arc<JwtManager>>()
        .ok_or_else(|| ApiError::InternalError("JWT manager not configured".to_string()))?
        .clone();

    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".to_string()))?;

    let claims = jwt
        .validate_token(token)
        .map_err(|e| ApiError::Unauthorized(format!("Invalid token: {}", e)))?;

    debug!("Admin request authorized for {}", claims.username);

    Ok(next.run(request).await)
}
