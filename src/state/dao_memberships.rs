use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::json_file::{load_document, save_document};
use crate::error::{BotError, Result};

/// Permanent binding of an on-chain membership to a Discord handle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaoMembership {
    pub membership: String,
    pub account_address: String,
    pub discord_handle: String,
    pub created_at: DateTime<Utc>,
}

impl DaoMembership {
    pub fn new(membership: &str, account_address: &str, discord_handle: &str) -> Self {
        Self {
            membership: membership.to_string(),
            account_address: account_address.to_string(),
            discord_handle: discord_handle.to_string(),
            created_at: Utc::now(),
        }
    }
}

/// Storage for membership bindings.
///
/// At most one binding exists per membership: `create` fails with
/// [`BotError::MembershipAlreadyClaimed`] instead of overwriting.
#[async_trait]
pub trait DaoMembershipRepository: Send + Sync {
    async fn find_by_membership(&self, membership: &str) -> Result<Option<DaoMembership>>;

    async fn create(&self, binding: DaoMembership) -> Result<DaoMembership>;
}

/// On-disk layout of `dao_memberships.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DaoMembershipDocument {
    version: u32,
    last_updated: DateTime<Utc>,
    /// Membership id -> binding
    memberships: HashMap<String, DaoMembership>,
}

impl Default for DaoMembershipDocument {
    fn default() -> Self {
        Self {
            version: 1,
            last_updated: Utc::now(),
            memberships: HashMap::new(),
        }
    }
}

/// JSON-file backed [`DaoMembershipRepository`]
pub struct JsonDaoMembershipStore {
    path: String,
    document: RwLock<DaoMembershipDocument>,
}

impl JsonDaoMembershipStore {
    /// Load the store from disk, starting empty if the file does not exist
    pub async fn open(path: &str) -> Result<Self> {
        let document = load_document(path).await?.unwrap_or_default();
        Ok(Self {
            path: path.to_string(),
            document: RwLock::new(document),
        })
    }

    pub async fn len(&self) -> usize {
        self.document.read().await.memberships.len()
    }
}

#[async_trait]
impl DaoMembershipRepository for JsonDaoMembershipStore {
    async fn find_by_membership(&self, membership: &str) -> Result<Option<DaoMembership>> {
        let document = self.document.read().await;
        Ok(document.memberships.get(membership).cloned())
    }

    async fn create(&self, binding: DaoMembership) -> Result<DaoMembership> {
        // Check and insert under one write lock
        let mut document = self.document.write().await;
        if let Some(existing) = document.memberships.get(&binding.membership) {
            return Err(BotError::MembershipAlreadyClaimed {
                membership: existing.membership.clone(),
                discord_handle: existing.discord_handle.clone(),
            });
        }

        document
            .memberships
            .insert(binding.membership.clone(), binding.clone());
        let previous_updated = std::mem::replace(&mut document.last_updated, Utc::now());

        if let Err(e) = save_document(&self.path, &*document).await {
            document.memberships.remove(&binding.membership);
            document.last_updated = previous_updated;
            return Err(e);
        }

        info!(
            "Bound membership {} to {}",
            binding.membership, binding.discord_handle
        );
        Ok(binding)
    }
}

/// Shared membership binding repository type
pub type SharedDaoMemberships = Arc<dyn DaoMembershipRepository>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::json_file::test_dir;

    #[tokio::test]
    async fn test_create_and_find() {
        let dir = test_dir();
        let path = dir.path().join("memberships.json");
        let store = JsonDaoMembershipStore::open(path.to_str().unwrap())
            .await
            .unwrap();

        let created = store
            .create(DaoMembership::new("42", "j4Alice", "alice#0001"))
            .await
            .unwrap();
        assert_eq!(created.discord_handle, "alice#0001");

        let found = store.find_by_membership("42").await.unwrap().unwrap();
        assert_eq!(found.account_address, "j4Alice");
        assert!(store.find_by_membership("43").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_second_binding_for_membership_is_rejected() {
        let dir = test_dir();
        let path = dir.path().join("memberships.json");
        let store = JsonDaoMembershipStore::open(path.to_str().unwrap())
            .await
            .unwrap();

        store
            .create(DaoMembership::new("42", "j4Alice", "alice#0001"))
            .await
            .unwrap();
        let second = store
            .create(DaoMembership::new("42", "j4Alice", "mallory#6666"))
            .await;

        match second {
            Err(BotError::MembershipAlreadyClaimed {
                membership,
                discord_handle,
            }) => {
                assert_eq!(membership, "42");
                assert_eq!(discord_handle, "alice#0001");
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_concurrent_creates_bind_once() {
        let dir = test_dir();
        let path = dir.path().join("memberships.json");
        let store = Arc::new(
            JsonDaoMembershipStore::open(path.to_str().unwrap())
                .await
                .unwrap(),
        );

        let attempts = (0..8).map(|i| {
            let store = store.clone();
            async move {
                store
                    .create(DaoMembership::new("42", "j4Alice", &format!("user#{:04}", i)))
                    .await
            }
        });
        let results = futures::future::join_all(attempts).await;

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_bindings_survive_reopen() {
        let dir = test_dir();
        let path = dir.path().join("memberships.json");
        let path = path.to_str().unwrap();

        {
            let store = JsonDaoMembershipStore::open(path).await.unwrap();
            store
                .create(DaoMembership::new("42", "j4Alice", "alice#0001"))
                .await
                .unwrap();
        }

        let reopened = JsonDaoMembershipStore::open(path).await.unwrap();
        assert!(reopened.find_by_membership("42").await.unwrap().is_some());
        assert!(reopened
            .create(DaoMembership::new("42", "j4Alice", "bob#0002"))
            .await
            .is_err());
    }
}
