pub mod dao_memberships;
mod json_file;
pub mod pending_verifications;

pub use dao_memberships::{
    DaoMembership, DaoMembershipRepository, JsonDaoMembershipStore, SharedDaoMemberships,
};
pub use pending_verifications::{
    JsonPendingVerificationStore, PendingVerification, PendingVerificationRepository,
    SharedPendingVerifications,
};
