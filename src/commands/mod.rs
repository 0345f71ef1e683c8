pub mod council;
pub mod general;
pub mod identity;

pub use council::council;
pub use general::{help, ping};
pub use identity::{claim, solve};
