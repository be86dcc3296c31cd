//! MongoDB-backed implementations of the storage traits.

use anyhow::{Context, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Collection, Database};

use crate::domains::auth::AdminAccount;
use crate::domains::listings::models::{Listing, ListingKind, ListingStatus};
use crate::kernel::traits::{BaseAdminDirectory, BaseListingRepo};

const ADMIN_COLLECTION: &str = "admins";

/// Listing repository backed by one collection per kind
/// (`products`, `services`).
pub struct MongoListingRepo {
    db: Database,
}

impl MongoListingRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, kind: ListingKind) -> Collection<Listing> {
        self.db.collection(kind.collection_name())
    }
}

#[async_trait]
impl BaseListingRepo for MongoListingRepo {
    async fn insert(&self, kind: ListingKind, listing: &Listing) -> Result<()> {
        self.collection(kind)
            .insert_one(listing)
            .await
            .context("Failed to insert listing")?;
        Ok(())
    }

    async fn find_by_id(&self, kind: ListingKind, id: &str) -> Result<Option<Listing>> {
        self.collection(kind)
            .find_one(doc! { "_id": id })
            .await
            .context("Failed to fetch listing")
    }

    async fn find_by_status(
        &self,
        kind: ListingKind,
        status: ListingStatus,
    ) -> Result<Vec<Listing>> {
        let cursor = self
            .collection(kind)
            .find(doc! { "status": status.as_str() })
            .sort(doc! { "createdAt": -1 })
            .await
            .context("Failed to query listings")?;
        cursor
            .try_collect()
            .await
            .context("Failed to read listing cursor")
    }

    async fn replace(&self, kind: ListingKind, listing: &Listing) -> Result<bool> {
        let result = self
            .collection(kind)
            .replace_one(doc! { "_id": &listing.id }, listing)
            .await
            .context("Failed to update listing")?;
        Ok(result.matched_count > 0)
    }

    async fn delete_by_id(&self, kind: ListingKind, id: &str) -> Result<bool> {
        let result = self
            .collection(kind)
            .delete_one(doc! { "_id": id })
            .await
            .context("Failed to delete listing")?;
        Ok(result.deleted_count > 0)
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .context("Database ping failed")?;
        Ok(())
    }
}

/// Admin credential store backed by the `admins` collection.
pub struct MongoAdminDirectory {
    collection: Collection<AdminAccount>,
}

impl MongoAdminDirectory {
    pub fn new(db: Database) -> Self {
        Self {
            collection: db.collection(ADMIN_COLLECTION),
        }
    }
}

#[async_trait]
impl BaseAdminDirectory for MongoAdminDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>> {
        self.collection
            .find_one(doc! { "username": username })
            .await
            .context("Failed to fetch admin account")
    }

    async fn insert(&self, account: &AdminAccount) -> Result<()> {
        self.collection
            .insert_one(account)
            .await
            .context("Failed to insert admin account")?;
        Ok(())
    }
}
