use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::common::ApiError;
use crate::domains::auth::JwtService;

/// Authenticated admin information from a verified JWT
#[derive(Clone, Debug)]
pub struct AuthAdmin {
    pub admin_id: String,
    pub username: String,
}

/// JWT authentication middleware
///
/// Extracts the token from the Authorization header, verifies it, and adds
/// AuthAdmin to request extensions. If no token or an invalid token, the
/// request continues without AuthAdmin (public routes still work); admin
/// handlers require the extension via the `AuthAdmin` extractor.
pub async fn jwt_auth_middleware(
    jwt_service: Arc<JwtService>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let auth_admin = extract_auth_admin(&request, &jwt_service);

    if let Some(admin) = auth_admin {
        debug!("Authenticated admin: {}", admin.username);
        request.extensions_mut().insert(admin);
    } else {
        debug!("No valid authentication token");
    }

    next.run(request).await
}

/// Extract and verify the token from the request
fn extract_auth_admin(
    request: &axum::http::Request<axum::body::Body>,
    jwt_service: &JwtService,
) -> Option<AuthAdmin> {
    // Get Authorization header
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    // Extract token (handle both "Bearer <token>" and raw token)
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    // Verify token
    let claims = jwt_service.verify_token(token).ok()?;

    Some(AuthAdmin {
        admin_id: claims.sub,
        username: claims.username,
    })
}

/// Admin routes take `AuthAdmin` as an argument; requests without a verified
/// token are rejected with 401 before any handler logic runs.
#[async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthAdmin>()
            .cloned()
            .ok_or_else(ApiError::unauthorized)
    }
}
