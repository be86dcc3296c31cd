//! The listing store: CRUD plus the constrained status-transition protocol,
//! with image side effects delegated to the media store.
//!
//! Rules enforced here:
//! - `status` and its two mirrored legacy booleans change only through the
//!   model's single transition path, regardless of which route invoked it.
//! - An image upload failure fails the whole operation with no partial write.
//! - Media deletions (on replace or record delete) are best-effort: logged
//!   and never fatal to the primary operation.

use std::sync::Arc;

use crate::common::ApiError;
use crate::domains::listings::models::{
    CreateListing, ImageRef, Listing, ListingKind, ListingPatch, ListingStatus,
};
use crate::kernel::{BaseListingRepo, BaseMediaStore};

const DEFAULT_REJECTION_REASON: &str = "Rejected by admin";

/// An image payload received from a multipart form, held in memory until it
/// is forwarded to the media store.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

pub struct ListingStore {
    listings: Arc<dyn BaseListingRepo>,
    media: Arc<dyn BaseMediaStore>,
}

impl ListingStore {
    pub fn new(listings: Arc<dyn BaseListingRepo>, media: Arc<dyn BaseMediaStore>) -> Self {
        Self { listings, media }
    }

    /// Submit a new listing. Starts out `pending`. If an image is attached it
    /// is uploaded first; on upload failure nothing is written.
    pub async fn create(
        &self,
        kind: ListingKind,
        input: CreateListing,
        image: Option<ImageUpload>,
    ) -> Result<Listing, ApiError> {
        let image_ref = match image {
            Some(upload) => Some(self.upload_image(upload).await?),
            None => None,
        };

        let listing = Listing::new(input, image_ref);
        self.listings.insert(kind, &listing).await?;
        tracing::info!(kind = %kind, id = %listing.id, "Listing submitted");
        Ok(listing)
    }

    /// Fetch by id regardless of status (detail pages are reachable directly,
    /// including by admins previewing pending items).
    pub async fn get(&self, kind: ListingKind, id: &str) -> Result<Listing, ApiError> {
        self.listings
            .find_by_id(kind, id)
            .await?
            .ok_or_else(|| not_found(kind))
    }

    /// Approved listings, newest first. This is the storefront query; nothing
    /// outside `approved` is ever returned.
    pub async fn list_public(&self, kind: ListingKind) -> Result<Vec<Listing>, ApiError> {
        Ok(self
            .listings
            .find_by_status(kind, ListingStatus::Approved)
            .await?)
    }

    /// Pending listings awaiting moderation, newest first.
    pub async fn list_pending(&self, kind: ListingKind) -> Result<Vec<Listing>, ApiError> {
        Ok(self
            .listings
            .find_by_status(kind, ListingStatus::Pending)
            .await?)
    }

    /// Approve a listing. Idempotent: approving an approved listing is a
    /// no-op success.
    pub async fn approve(&self, kind: ListingKind, id: &str) -> Result<Listing, ApiError> {
        self.transition(kind, id, ListingStatus::Approved, None)
            .await
    }

    /// Reject a listing with an optional reason.
    pub async fn reject(
        &self,
        kind: ListingKind,
        id: &str,
        reason: Option<String>,
    ) -> Result<Listing, ApiError> {
        let reason = reason.unwrap_or_else(|| DEFAULT_REJECTION_REASON.to_string());
        self.transition(kind, id, ListingStatus::Rejected, Some(reason))
            .await
    }

    /// General status transition used by the status route. The status string
    /// is validated against the kind's recognized values.
    pub async fn set_status(
        &self,
        kind: ListingKind,
        id: &str,
        status: &str,
        reason: Option<String>,
    ) -> Result<Listing, ApiError> {
        let status = ListingStatus::parse(kind, status)?;
        self.transition(kind, id, status, reason).await
    }

    /// Full edit. A new image is uploaded before the superseded asset is
    /// released, so an upload failure never leaves the listing imageless.
    pub async fn update(
        &self,
        kind: ListingKind,
        id: &str,
        patch: ListingPatch,
        new_image: Option<ImageUpload>,
    ) -> Result<Listing, ApiError> {
        let mut listing = self.get(kind, id).await?;

        if let Some(upload) = new_image {
            let replacement = self.upload_image(upload).await?;
            if let Some(old) = listing.image.take() {
                self.release_image(kind, id, &old).await;
            }
            listing.image = Some(replacement);
        }

        listing.apply_patch(patch);
        if !self.listings.replace(kind, &listing).await? {
            // Deleted between the read and the write
            return Err(not_found(kind));
        }
        tracing::info!(kind = %kind, id = %listing.id, status = %listing.status, "Listing updated");
        Ok(listing)
    }

    /// Hard delete. Any attached image is released first, best-effort: a
    /// media-store failure must not make the listing undeletable.
    pub async fn delete(&self, kind: ListingKind, id: &str) -> Result<(), ApiError> {
        let listing = self.get(kind, id).await?;

        if let Some(image) = &listing.image {
            self.release_image(kind, id, image).await;
        }

        if !self.listings.delete_by_id(kind, id).await? {
            return Err(not_found(kind));
        }
        tracing::info!(kind = %kind, id = %id, "Listing deleted");
        Ok(())
    }

    async fn transition(
        &self,
        kind: ListingKind,
        id: &str,
        status: ListingStatus,
        reason: Option<String>,
    ) -> Result<Listing, ApiError> {
        let mut listing = self.get(kind, id).await?;
        listing.apply_status(status, reason);
        if !self.listings.replace(kind, &listing).await? {
            return Err(not_found(kind));
        }
        tracing::info!(kind = %kind, id = %id, status = %status, "Listing status changed");
        Ok(listing)
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<ImageRef, ApiError> {
        let asset = self
            .media
            .upload(upload.bytes, &upload.file_name)
            .await
            .map_err(|error| ApiError::Upload(error.to_string()))?;
        Ok(ImageRef {
            url: asset.url,
            public_id: asset.public_id,
        })
    }

    async fn release_image(&self, kind: ListingKind, id: &str, image: &ImageRef) {
        if let Err(error) = self.media.delete(&image.public_id).await {
            tracing::warn!(
                kind = %kind,
                id = %id,
                public_id = %image.public_id,
                error = %error,
                "Failed to delete superseded media asset, continuing"
            );
        }
    }
}

fn not_found(kind: ListingKind) -> ApiError {
    ApiError::not_found(format!("{} not found", kind.label()))
}
