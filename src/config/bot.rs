pub const DEFAULT_QUERY_NODE_URL: &str = "https://query.joystream.org/graphql";

/// Process-wide settings read from the environment at startup
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub discord_token: String,
    pub query_node_url: String,
    pub state_path: String,
    pub data_path: String,
}

impl BotConfig {
    pub fn from_env() -> crate::error::Result<Self> {
        let discord_token =
            std::env::var("DISCORD_TOKEN").map_err(|_| crate::error::BotError::ConfigValidation {
                message: "Missing DISCORD_TOKEN environment variable".to_string(),
            })?;
        let query_node_url = std::env::var("QUERY_NODE_URL")
            .unwrap_or_else(|_| DEFAULT_QUERY_NODE_URL.to_string());
        let state_path = std::env::var("STATE_PATH").unwrap_or_else(|_| "state".to_string());
        let data_path = std::env::var("DATA_PATH").unwrap_or_else(|_| "data".to_string());

        Ok(Self {
            discord_token,
            query_node_url,
            state_path,
            data_path,
        })
    }

    pub fn pending_verifications_path(&self) -> String {
        format!("{}/pending_verifications.json", self.state_path)
    }

    pub fn dao_memberships_path(&self) -> String {
        format!("{}/dao_memberships.json", self.state_path)
    }
}
