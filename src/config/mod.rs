pub mod bot;
pub mod retry;

pub use bot::BotConfig;
pub use retry::RetryConfig;
