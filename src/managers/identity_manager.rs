use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{BotError, Result};
use crate::identity::{verify_challenge, SIGNATURE_HEX_LEN};
use crate::messages;
use crate::querynode::types::Membership;
use crate::state::{
    DaoMembership, PendingVerification, SharedDaoMemberships, SharedPendingVerifications,
};

/// Terminal state of a `/solve` attempt
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimOutcome {
    /// Submitted signature has the wrong length; nothing was looked up
    MalformedSignature { length: usize },

    /// The requester has no claim in progress; nothing is replied
    NoPendingVerification,

    /// Signature does not prove control of the claimed account
    InvalidSignature,

    /// The membership is already bound to a Discord handle
    AlreadyClaimed {
        membership: String,
        claimed_by: String,
    },

    /// Binding written, pending verification removed
    Claimed(DaoMembership),

    /// Reading the stores failed
    LookupFailed,

    /// Writing the binding failed; the pending verification is kept
    BindFailed,
}

impl ClaimOutcome {
    /// The single reply for this outcome, if any
    pub fn reply(&self) -> Option<String> {
        match self {
            ClaimOutcome::MalformedSignature { length } => {
                Some(messages::signature_length_message(*length))
            }
            ClaimOutcome::NoPendingVerification => None,
            ClaimOutcome::InvalidSignature => Some(messages::invalid_signature_message()),
            ClaimOutcome::AlreadyClaimed { .. } => Some(messages::already_claimed_message()),
            ClaimOutcome::Claimed(binding) => {
                Some(messages::claim_success_message(&binding.membership))
            }
            ClaimOutcome::LookupFailed | ClaimOutcome::BindFailed => {
                Some(messages::try_again_message())
            }
        }
    }
}

/// Result of starting a claim with `/claim`
#[derive(Debug, Clone, PartialEq)]
pub enum StartClaimOutcome {
    /// A challenge was issued for the requester to sign
    ChallengeIssued(PendingVerification),

    AlreadyClaimed {
        membership: String,
        claimed_by: String,
    },
}

/// Runs the identity-claim handshake against the two record stores
pub struct IdentityManager {
    pending: SharedPendingVerifications,
    memberships: SharedDaoMemberships,
}

impl IdentityManager {
    pub fn new(pending: SharedPendingVerifications, memberships: SharedDaoMemberships) -> Self {
        Self {
            pending,
            memberships,
        }
    }

    /// Issue a fresh challenge for `membership`, replacing any earlier claim in
    /// progress for this handle
    pub async fn start_claim(
        &self,
        discord_handle: &str,
        membership: &Membership,
    ) -> Result<StartClaimOutcome> {
        if let Some(existing) = self.memberships.find_by_membership(&membership.id).await? {
            info!(
                "{} tried to claim '{}', already claimed by '{}'",
                discord_handle, existing.membership, existing.discord_handle
            );
            return Ok(StartClaimOutcome::AlreadyClaimed {
                membership: existing.membership,
                claimed_by: existing.discord_handle,
            });
        }

        let challenge = uuid::Uuid::new_v4().simple().to_string();
        let verification = PendingVerification::new(
            discord_handle,
            &challenge,
            &membership.controller_account,
            &membership.id,
        );
        self.pending.upsert(verification.clone()).await?;

        info!(
            "{} started claiming membership '{}' ({})",
            discord_handle, membership.id, membership.handle
        );
        Ok(StartClaimOutcome::ChallengeIssued(verification))
    }

    /// Complete a claim with the signed challenge.
    ///
    /// Steps run in order and stop at the first terminal state: length check,
    /// pending verification lookup, signature check, duplicate check, bind.
    pub async fn solve(&self, discord_handle: &str, signed_challenge: &str) -> ClaimOutcome {
        let length = signed_challenge.chars().count();
        if length != SIGNATURE_HEX_LEN {
            debug!(
                "{} sent a signed challenge of {} symbols",
                discord_handle, length
            );
            return ClaimOutcome::MalformedSignature { length };
        }

        let verification = match self.pending.find_by_handle(discord_handle).await {
            Ok(Some(verification)) => verification,
            Ok(None) => {
                debug!("No pending verification for {}", discord_handle);
                return ClaimOutcome::NoPendingVerification;
            }
            Err(e) => {
                error!("Failed to look up pending verification: {}", e);
                return ClaimOutcome::LookupFailed;
            }
        };

        debug!(
            "Verifying that challenge '{}' signature '{}' was signed by address '{}'",
            verification.challenge, signed_challenge, verification.claimed_account_address
        );
        let is_valid = match verify_challenge(
            &verification.challenge,
            signed_challenge,
            &verification.claimed_account_address,
        ) {
            Ok(is_valid) => is_valid,
            Err(e) => {
                warn!("Could not verify signature from {}: {}", discord_handle, e);
                false
            }
        };
        info!("Signature check for {}: {}", discord_handle, is_valid);
        if !is_valid {
            return ClaimOutcome::InvalidSignature;
        }

        match self
            .memberships
            .find_by_membership(&verification.claimed_membership)
            .await
        {
            Ok(Some(existing)) => {
                info!(
                    "Identity '{}' already claimed by '{}'",
                    existing.membership, existing.discord_handle
                );
                return ClaimOutcome::AlreadyClaimed {
                    membership: existing.membership,
                    claimed_by: existing.discord_handle,
                };
            }
            Ok(None) => {}
            Err(e) => {
                error!("Failed to look up existing binding: {}", e);
                return ClaimOutcome::LookupFailed;
            }
        }

        let binding = DaoMembership::new(
            &verification.claimed_membership,
            &verification.claimed_account_address,
            discord_handle,
        );
        let created = match self.memberships.create(binding).await {
            Ok(created) => created,
            Err(BotError::MembershipAlreadyClaimed {
                membership,
                discord_handle: claimed_by,
            }) => {
                info!(
                    "Identity '{}' was claimed by '{}' concurrently",
                    membership, claimed_by
                );
                return ClaimOutcome::AlreadyClaimed {
                    membership,
                    claimed_by,
                };
            }
            Err(e) => {
                error!("Creating record failed: {}", e);
                return ClaimOutcome::BindFailed;
            }
        };

        info!(
            "{} claimed identity '{}'",
            discord_handle, created.membership
        );

        if let Err(e) = self.pending.delete_by_handle(discord_handle).await {
            warn!(
                "Failed to remove pending verification for {}: {}",
                discord_handle, e
            );
        }

        ClaimOutcome::Claimed(created)
    }
}

/// Shared identity manager type
pub type SharedIdentityManager = Arc<IdentityManager>;

pub fn create_shared_identity_manager(
    pending: SharedPendingVerifications,
    memberships: SharedDaoMemberships,
) -> SharedIdentityManager {
    Arc::new(IdentityManager::new(pending, memberships))
}
