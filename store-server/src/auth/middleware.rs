//! Axum middleware for JWT authentication and admin authorization

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
    Extension,
};

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::utils::AppError;

/// Paths under `/api/` reachable without a token: the storefront surface
/// plus login and health.
fn is_public_api_route(path: &str) -> bool {
    path == "/api/auth/login"
        || path == "/api/health"
        || path == "/api/checkout"
        || path == "/api/catalog"
        || path.starts_with("/api/catalog/")
}

/// Require a valid `Authorization: Bearer <token>` header.
///
/// Skips OPTIONS (CORS preflight), non-API paths and the public routes.
/// On success, [`CurrentUser`] is inserted into request extensions.
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    if !path.starts_with("/api/") {
        return Ok(next.run(req).await);
    }
    if is_public_api_route(path) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            tracing::warn!(uri = %req.uri(), "Request without authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims)
                .map_err(|e| AppError::invalid_token(e.to_string()))?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(uri = %req.uri(), error = %e, "Token validation failed");
            match e {
                JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Require the authenticated user to hold the admin role
pub async fn require_admin(
    Extension(user): Extension<CurrentUser>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !user.is_admin() {
        tracing::warn!(username = %user.username, uri = %req.uri(), "Admin route denied");
        return Err(AppError::forbidden("Admin role required"));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_routes() {
        assert!(is_public_api_route("/api/auth/login"));
        assert!(is_public_api_route("/api/catalog"));
        assert!(is_public_api_route("/api/catalog/42"));
        assert!(is_public_api_route("/api/checkout"));
        assert!(!is_public_api_route("/api/products"));
        assert!(!is_public_api_route("/api/orders"));
    }
}
