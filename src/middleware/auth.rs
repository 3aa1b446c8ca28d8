use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use crate::auth::{Claims, ROLE_ADMIN, ROLE_CLIENT};
use crate::config;
use crate::error::ApiError;

/// Authenticated user context extracted from the bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: String,
    pub role: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.user_id,
            role: claims.role,
        }
    }
}

/// Bearer token middleware that validates tokens and attaches user context.
///
/// A pure gate: the only side effect is inserting `AuthUser` into the
/// request extensions for the role checks and handlers downstream.
pub async fn jwt_auth(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_token(&token).map_err(ApiError::unauthorized)?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}

/// Role gate for administrative routes.
pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(ROLE_ADMIN, request, next).await
}

/// Role gate for standard client routes.
pub async fn require_client(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(ROLE_CLIENT, request, next).await
}

async fn require_role(role: &str, request: Request, next: Next) -> Result<Response, ApiError> {
    // A missing extension means the auth stage never ran; fail closed
    // rather than assume anything about the caller.
    match request.extensions().get::<AuthUser>() {
        Some(user) if user.role == role => Ok(next.run(request).await),
        Some(_) => Err(ApiError::forbidden(format!("{} access required", role))),
        None => Err(ApiError::forbidden("role not established")),
    }
}

/// Extract the token from the Authorization header
fn extract_bearer_token(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get("authorization")
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty bearer token".to_string());
        }
        Ok(token.to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}

/// Verify signature, algorithm family and expiry, then decode the claims
fn validate_token(token: &str) -> Result<Claims, String> {
    let secret = &config::config().jwt_secret;

    if secret.is_empty() {
        return Err("JWT secret not configured".to_string());
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| format!("Invalid token: {}", e))?;

    Ok(token_data.claims)
}
