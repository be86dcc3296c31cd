//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::cors::{self, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::domains::listings::ListingStore;
use crate::kernel::ServerDeps;
use crate::server::middleware::jwt_auth_middleware;
use crate::server::routes::{
    approve_listing, change_status, create_listing, delete_listing, get_listing, health_handler,
    list_listings, list_pending, login, reject_listing, update_listing,
};

/// Uploaded images are held in memory before being forwarded to the media
/// store; cap the request body well above typical phone photos.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: Arc<ServerDeps>,
    pub store: Arc<ListingStore>,
}

/// Build the Axum application router
///
/// Explicitly constructed dependencies are injected here rather than read
/// from process-wide state, so tests can run the full router against
/// in-memory doubles.
pub fn build_app(deps: ServerDeps, allowed_origins: Vec<String>) -> Router {
    let deps = Arc::new(deps);
    let store = Arc::new(ListingStore::new(
        deps.listings.clone(),
        deps.media.clone(),
    ));

    let app_state = AppState {
        deps: deps.clone(),
        store,
    };

    // CORS configuration - any origin unless a list was configured
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new().allow_origin(cors::Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods([
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::PATCH,
    ])
    .allow_headers([AUTHORIZATION, CONTENT_TYPE]);

    // Clone jwt_service for middleware closure
    let jwt_service_for_middleware = deps.jwt_service.clone();

    Router::new()
        // Public listing surface
        .route("/listings/:kind", post(create_listing).get(list_listings))
        .route(
            "/listings/:kind/:id",
            get(get_listing).put(update_listing).delete(delete_listing),
        )
        .route("/listings/:kind/:id/status", patch(change_status))
        // Admin moderation surface
        .route("/admin/login", post(login))
        .route("/admin/listings/:kind/pending", get(list_pending))
        .route("/admin/listings/:kind/:id/approve", put(approve_listing))
        .route("/admin/listings/:kind/:id/reject", patch(reject_listing))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(middleware::from_fn(move |req, next| {
            jwt_auth_middleware(jwt_service_for_middleware.clone(), req, next)
        }))
        .layer(Extension(app_state))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
