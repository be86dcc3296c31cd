//! Admin route handlers: login and the moderation queue.

use axum::{
    extract::{Extension, Path},
    Json,
};
use tracing::{info, warn};

use crate::common::ApiError;
use crate::domains::listings::data::{
    ListingData, ListingResponse, LoginRequest, LoginResponse, RejectRequest,
};
use crate::domains::listings::models::ListingKind;
use crate::server::app::AppState;
use crate::server::middleware::AuthAdmin;

/// POST /admin/login
///
/// A missing account and a wrong password are indistinguishable to the
/// caller. No mutation happens here; the token is valid for 8 hours.
pub async fn login(
    Extension(state): Extension<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let account = state
        .deps
        .admins
        .find_by_username(&request.username)
        .await?;

    let account = match account {
        Some(account) if account.verify_password(&request.password) => account,
        _ => {
            warn!(username = %request.username, "Failed admin login attempt");
            return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
        }
    };

    let token = state
        .deps
        .jwt_service
        .create_token(&account.id, &account.username)?;
    info!(username = %account.username, "Admin logged in");

    Ok(Json(LoginResponse {
        token,
        username: account.username,
    }))
}

/// GET /admin/listings/{kind}/pending
pub async fn list_pending(
    _admin: AuthAdmin,
    Extension(state): Extension<AppState>,
    Path(kind): Path<ListingKind>,
) -> Result<Json<Vec<ListingData>>, ApiError> {
    let listings = state.store.list_pending(kind).await?;
    Ok(Json(listings.into_iter().map(ListingData::from).collect()))
}

/// PUT /admin/listings/{kind}/{id}/approve
pub async fn approve_listing(
    _admin: AuthAdmin,
    Extension(state): Extension<AppState>,
    Path((kind, id)): Path<(ListingKind, String)>,
) -> Result<Json<ListingResponse>, ApiError> {
    let listing = state.store.approve(kind, &id).await?;

    Ok(Json(ListingResponse {
        message: "Approved".to_string(),
        listing: listing.into(),
    }))
}

/// PATCH /admin/listings/{kind}/{id}/reject
pub async fn reject_listing(
    _admin: AuthAdmin,
    Extension(state): Extension<AppState>,
    Path((kind, id)): Path<(ListingKind, String)>,
    request: Option<Json<RejectRequest>>,
) -> Result<Json<ListingResponse>, ApiError> {
    let reason = request.and_then(|Json(body)| body.reason);
    let listing = state.store.reject(kind, &id, reason).await?;

    Ok(Json(ListingResponse {
        message: "Rejected".to_string(),
        listing: listing.into(),
    }))
}
