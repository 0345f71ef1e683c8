use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::json_file::{load_document, save_document};
use crate::error::Result;

/// A claim that has been started but not yet proven by a signature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingVerification {
    /// Discord handle (`name#discriminator`) of the requester
    pub started_by_discord_handle: String,

    /// Server-issued nonce the requester has to sign
    pub challenge: String,

    /// On-chain account expected to have signed the challenge
    pub claimed_account_address: String,

    /// Membership id being claimed
    pub claimed_membership: String,

    pub created_at: DateTime<Utc>,
}

impl PendingVerification {
    pub fn new(
        discord_handle: &str,
        challenge: &str,
        claimed_account_address: &str,
        claimed_membership: &str,
    ) -> Self {
        Self {
            started_by_discord_handle: discord_handle.to_string(),
            challenge: challenge.to_string(),
            claimed_account_address: claimed_account_address.to_string(),
            claimed_membership: claimed_membership.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Storage for pending verifications, keyed by requester handle
#[async_trait]
pub trait PendingVerificationRepository: Send + Sync {
    async fn find_by_handle(&self, discord_handle: &str) -> Result<Option<PendingVerification>>;

    /// Insert, replacing any earlier pending verification of the same handle
    async fn upsert(&self, verification: PendingVerification) -> Result<()>;

    /// Returns whether a record was removed
    async fn delete_by_handle(&self, discord_handle: &str) -> Result<bool>;
}

/// On-disk layout of `pending_verifications.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PendingVerificationDocument {
    version: u32,
    last_updated: DateTime<Utc>,
    /// Discord handle -> pending verification
    verifications: HashMap<String, PendingVerification>,
}

impl Default for PendingVerificationDocument {
    fn default() -> Self {
        Self {
            version: 1,
            last_updated: Utc::now(),
            verifications: HashMap::new(),
        }
    }
}

/// JSON-file backed [`PendingVerificationRepository`]
pub struct JsonPendingVerificationStore {
    path: String,
    document: RwLock<PendingVerificationDocument>,
}

impl JsonPendingVerificationStore {
    /// Load the store from disk, starting empty if the file does not exist
    pub async fn open(path: &str) -> Result<Self> {
        let document = load_document(path).await?.unwrap_or_default();
        Ok(Self {
            path: path.to_string(),
            document: RwLock::new(document),
        })
    }

    pub async fn len(&self) -> usize {
        self.document.read().await.verifications.len()
    }
}

#[async_trait]
impl PendingVerificationRepository for JsonPendingVerificationStore {
    async fn find_by_handle(&self, discord_handle: &str) -> Result<Option<PendingVerification>> {
        let document = self.document.read().await;
        Ok(document.verifications.get(discord_handle).cloned())
    }

    async fn upsert(&self, verification: PendingVerification) -> Result<()> {
        let mut document = self.document.write().await;
        let handle = verification.started_by_discord_handle.clone();
        let previous = document.verifications.insert(handle.clone(), verification);
        let previous_updated = std::mem::replace(&mut document.last_updated, Utc::now());

        if let Err(e) = save_document(&self.path, &*document).await {
            // Keep memory in line with disk
            match previous {
                Some(previous) => document.verifications.insert(handle, previous),
                None => document.verifications.remove(&handle),
            };
            document.last_updated = previous_updated;
            return Err(e);
        }

        debug!("Stored pending verification for {}", handle);
        Ok(())
    }

    async fn delete_by_handle(&self, discord_handle: &str) -> Result<bool> {
        let mut document = self.document.write().await;
        let Some(removed) = document.verifications.remove(discord_handle) else {
            return Ok(false);
        };
        let previous_updated = std::mem::replace(&mut document.last_updated, Utc::now());

        if let Err(e) = save_document(&self.path, &*document).await {
            document
                .verifications
                .insert(discord_handle.to_string(), removed);
            document.last_updated = previous_updated;
            return Err(e);
        }

        debug!("Removed pending verification for {}", discord_handle);
        Ok(true)
    }
}

/// Shared pending verification repository type
pub type SharedPendingVerifications = Arc<dyn PendingVerificationRepository>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::json_file::test_dir;

    #[tokio::test]
    async fn test_upsert_find_delete() {
        let dir = test_dir();
        let path = dir.path().join("pending.json");
        let store = JsonPendingVerificationStore::open(path.to_str().unwrap())
            .await
            .unwrap();

        store
            .upsert(PendingVerification::new("alice#0001", "nonce", "j4Alice", "42"))
            .await
            .unwrap();

        let found = store.find_by_handle("alice#0001").await.unwrap().unwrap();
        assert_eq!(found.challenge, "nonce");
        assert_eq!(found.claimed_membership, "42");
        assert!(store.find_by_handle("bob#0002").await.unwrap().is_none());

        assert!(store.delete_by_handle("alice#0001").await.unwrap());
        assert!(!store.delete_by_handle("alice#0001").await.unwrap());
        assert!(store.find_by_handle("alice#0001").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_one_pending_verification_per_handle() {
        let dir = test_dir();
        let path = dir.path().join("pending.json");
        let store = JsonPendingVerificationStore::open(path.to_str().unwrap())
            .await
            .unwrap();

        store
            .upsert(PendingVerification::new("alice#0001", "first", "j4Alice", "42"))
            .await
            .unwrap();
        store
            .upsert(PendingVerification::new("alice#0001", "second", "j4Alice", "43"))
            .await
            .unwrap();

        assert_eq!(store.len().await, 1);
        let found = store.find_by_handle("alice#0001").await.unwrap().unwrap();
        assert_eq!(found.challenge, "second");
    }

    #[tokio::test]
    async fn test_survives_reopen() {
        let dir = test_dir();
        let path = dir.path().join("pending.json");
        let path = path.to_str().unwrap();

        {
            let store = JsonPendingVerificationStore::open(path).await.unwrap();
            store
                .upsert(PendingVerification::new("alice#0001", "nonce", "j4Alice", "42"))
                .await
                .unwrap();
        }

        let reopened = JsonPendingVerificationStore::open(path).await.unwrap();
        assert!(reopened.find_by_handle("alice#0001").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_save_is_rolled_back() {
        let dir = test_dir();
        // Parent directory does not exist, so every save fails
        let path = dir.path().join("missing").join("pending.json");
        let store = JsonPendingVerificationStore::open(path.to_str().unwrap())
            .await
            .unwrap();

        let result = store
            .upsert(PendingVerification::new("alice#0001", "nonce", "j4Alice", "42"))
            .await;

        assert!(result.is_err());
        assert_eq!(store.len().await, 0);
    }
}
