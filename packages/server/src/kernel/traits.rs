// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic. Moderation rules
// live in the listings domain and use these traits.
//
// Naming convention: Base* for trait names (e.g., BaseMediaStore)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::auth::AdminAccount;
use crate::domains::listings::models::{Listing, ListingKind, ListingStatus};

// =============================================================================
// Media Store Trait (Infrastructure - third-party image host)
// =============================================================================

/// An asset stored on the media host. `public_id` is the handle needed to
/// delete the asset later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAsset {
    pub url: String,
    pub public_id: String,
}

#[async_trait]
pub trait BaseMediaStore: Send + Sync {
    /// Upload image bytes, returning the retrievable URL and deletion handle.
    async fn upload(&self, bytes: Vec<u8>, file_name: &str) -> Result<MediaAsset>;

    /// Delete a previously uploaded asset. Deleting an asset the host no
    /// longer knows about is not an error.
    async fn delete(&self, public_id: &str) -> Result<()>;
}

// =============================================================================
// Listing Repository Trait (Infrastructure - document store)
// =============================================================================

#[async_trait]
pub trait BaseListingRepo: Send + Sync {
    async fn insert(&self, kind: ListingKind, listing: &Listing) -> Result<()>;

    async fn find_by_id(&self, kind: ListingKind, id: &str) -> Result<Option<Listing>>;

    /// All listings with the given status, newest first.
    async fn find_by_status(
        &self,
        kind: ListingKind,
        status: ListingStatus,
    ) -> Result<Vec<Listing>>;

    /// Replace the stored document. Returns false if no document matched.
    async fn replace(&self, kind: ListingKind, listing: &Listing) -> Result<bool>;

    /// Returns false if no document matched.
    async fn delete_by_id(&self, kind: ListingKind, id: &str) -> Result<bool>;

    /// Connectivity check for the health endpoint.
    async fn ping(&self) -> Result<()>;
}

// =============================================================================
// Admin Directory Trait (Infrastructure - single-admin credential store)
// =============================================================================

#[async_trait]
pub trait BaseAdminDirectory: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>>;

    /// Used by the out-of-band seeding binary and by tests.
    async fn insert(&self, account: &AdminAccount) -> Result<()>;
}
