pub mod identity_manager;

pub use identity_manager::{create_shared_identity_manager, SharedIdentityManager};
