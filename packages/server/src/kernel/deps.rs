//! Server dependencies (using traits for testability)
//!
//! This module provides the central dependency container constructed once at
//! startup and injected into the listing store and route handlers. All
//! external services use trait abstractions to enable testing with doubles.

use std::sync::Arc;

use crate::domains::auth::JwtService;
use crate::kernel::traits::{BaseAdminDirectory, BaseListingRepo, BaseMediaStore};

/// Server dependencies accessible to handlers
#[derive(Clone)]
pub struct ServerDeps {
    pub listings: Arc<dyn BaseListingRepo>,
    pub admins: Arc<dyn BaseAdminDirectory>,
    pub media: Arc<dyn BaseMediaStore>,
    pub jwt_service: Arc<JwtService>,
}

impl ServerDeps {
    pub fn new(
        listings: Arc<dyn BaseListingRepo>,
        admins: Arc<dyn BaseAdminDirectory>,
        media: Arc<dyn BaseMediaStore>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            listings,
            admins,
            media,
            jwt_service,
        }
    }
}
