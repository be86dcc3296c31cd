// TestDependencies - in-memory and mock implementations for testing
//
// Provides doubles for the storage and media traits that can be injected
// into ServerDeps for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domains::auth::AdminAccount;
use crate::domains::listings::models::{Listing, ListingKind, ListingStatus};

use super::{BaseAdminDirectory, BaseListingRepo, BaseMediaStore, MediaAsset};

// =============================================================================
// In-Memory Listing Repository
// =============================================================================

#[derive(Default)]
pub struct InMemoryListingRepo {
    listings: Mutex<HashMap<(ListingKind, String), Listing>>,
}

impl InMemoryListingRepo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored listings across both kinds.
    pub fn len(&self) -> usize {
        self.listings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl BaseListingRepo for InMemoryListingRepo {
    async fn insert(&self, kind: ListingKind, listing: &Listing) -> Result<()> {
        self.listings
            .lock()
            .unwrap()
            .insert((kind, listing.id.clone()), listing.clone());
        Ok(())
    }

    async fn find_by_id(&self, kind: ListingKind, id: &str) -> Result<Option<Listing>> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .get(&(kind, id.to_string()))
            .cloned())
    }

    async fn find_by_status(
        &self,
        kind: ListingKind,
        status: ListingStatus,
    ) -> Result<Vec<Listing>> {
        let mut matches: Vec<Listing> = self
            .listings
            .lock()
            .unwrap()
            .iter()
            .filter(|((k, _), listing)| *k == kind && listing.status == status)
            .map(|(_, listing)| listing.clone())
            .collect();
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(matches)
    }

    async fn replace(&self, kind: ListingKind, listing: &Listing) -> Result<bool> {
        let mut listings = self.listings.lock().unwrap();
        let key = (kind, listing.id.clone());
        if listings.contains_key(&key) {
            listings.insert(key, listing.clone());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn delete_by_id(&self, kind: ListingKind, id: &str) -> Result<bool> {
        Ok(self
            .listings
            .lock()
            .unwrap()
            .remove(&(kind, id.to_string()))
            .is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// In-Memory Admin Directory
// =============================================================================

#[derive(Default)]
pub struct InMemoryAdminDirectory {
    accounts: Mutex<HashMap<String, AdminAccount>>,
}

impl InMemoryAdminDirectory {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseAdminDirectory for InMemoryAdminDirectory {
    async fn find_by_username(&self, username: &str) -> Result<Option<AdminAccount>> {
        Ok(self.accounts.lock().unwrap().get(username).cloned())
    }

    async fn insert(&self, account: &AdminAccount) -> Result<()> {
        self.accounts
            .lock()
            .unwrap()
            .insert(account.username.clone(), account.clone());
        Ok(())
    }
}

// =============================================================================
// Mock Media Store
// =============================================================================

/// Media store double that records upload/delete calls and can be configured
/// to fail either operation.
pub struct MockMediaStore {
    upload_calls: Arc<Mutex<Vec<String>>>,
    delete_calls: Arc<Mutex<Vec<String>>>,
    fail_uploads: bool,
    fail_deletes: bool,
    next_id: Mutex<u32>,
}

impl MockMediaStore {
    pub fn new() -> Self {
        Self {
            upload_calls: Arc::new(Mutex::new(Vec::new())),
            delete_calls: Arc::new(Mutex::new(Vec::new())),
            fail_uploads: false,
            fail_deletes: false,
            next_id: Mutex::new(0),
        }
    }

    /// All subsequent uploads fail.
    pub fn failing_uploads() -> Self {
        Self {
            fail_uploads: true,
            ..Self::new()
        }
    }

    /// All subsequent deletes fail.
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Self::new()
        }
    }

    /// File names passed to upload, in call order.
    pub fn upload_calls(&self) -> Vec<String> {
        self.upload_calls.lock().unwrap().clone()
    }

    /// Public ids passed to delete, in call order.
    pub fn delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }
}

impl Default for MockMediaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BaseMediaStore for MockMediaStore {
    async fn upload(&self, _bytes: Vec<u8>, file_name: &str) -> Result<MediaAsset> {
        self.upload_calls.lock().unwrap().push(file_name.to_string());
        if self.fail_uploads {
            return Err(anyhow!("mock upload failure"));
        }
        let mut next_id = self.next_id.lock().unwrap();
        *next_id += 1;
        Ok(MediaAsset {
            url: format!("https://cdn.test/{}-{}", next_id, file_name),
            public_id: format!("college-marketplace/mock-{}", next_id),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(public_id.to_string());
        if self.fail_deletes {
            return Err(anyhow!("mock delete failure"));
        }
        Ok(())
    }
}
