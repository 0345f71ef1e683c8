use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Retry policy for query node calls
/// Loaded from data/retry.json
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryConfig {
    /// Total attempts per call, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the second attempt
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Growth factor applied to the delay after every failed attempt
    #[serde(default = "default_multiplier")]
    pub multiplier: u32,

    /// Upper bound for a single delay
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

fn default_max_attempts() -> u32 {
    5
}

fn default_initial_backoff_ms() -> u64 {
    1000
}

fn default_multiplier() -> u32 {
    2
}

fn default_max_backoff_ms() -> u64 {
    4000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            multiplier: default_multiplier(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl RetryConfig {
    /// Load from a JSON file
    pub fn load_from_file(path: &str) -> crate::error::Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| crate::error::BotError::ConfigLoad {
                path: path.to_string(),
                source: e,
            })?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| crate::error::BotError::ConfigParse {
                path: path.to_string(),
                source: e,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `retry.json` from the data directory, falling back to defaults when absent,
    /// then apply `QUERY_NODE_MAX_ATTEMPTS` / `QUERY_NODE_BACKOFF_MS` overrides.
    pub fn load(data_path: &str) -> crate::error::Result<Self> {
        Self::load_with_env(data_path, |name| std::env::var(name).ok())
    }

    fn load_with_env<E>(data_path: &str, env: E) -> crate::error::Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let path = format!("{}/retry.json", data_path);
        let mut config = if std::path::Path::new(&path).exists() {
            Self::load_from_file(&path)?
        } else {
            Self::default()
        };

        let max_attempts = "QUERY_NODE_MAX_ATTEMPTS";
        if let Some(attempts) = parse_override(max_attempts, env(max_attempts))? {
            config.max_attempts = attempts;
        }
        let backoff_ms = "QUERY_NODE_BACKOFF_MS";
        if let Some(backoff) = parse_override(backoff_ms, env(backoff_ms))? {
            config.initial_backoff_ms = backoff;
            // Cap never sits below the first delay
            config.max_backoff_ms = config.max_backoff_ms.max(backoff);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> crate::error::Result<()> {
        if self.max_attempts == 0 {
            return Err(crate::error::BotError::ConfigValidation {
                message: "retry max_attempts must be at least 1".to_string(),
            });
        }
        if self.multiplier == 0 {
            return Err(crate::error::BotError::ConfigValidation {
                message: "retry multiplier must be at least 1".to_string(),
            });
        }
        if self.max_backoff_ms < self.initial_backoff_ms {
            return Err(crate::error::BotError::ConfigValidation {
                message: format!(
                    "retry max_backoff_ms ({}) must not be below initial_backoff_ms ({})",
                    self.max_backoff_ms, self.initial_backoff_ms
                ),
            });
        }
        Ok(())
    }

    /// Delay to wait after the given (1-based) failed attempt
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = (self.multiplier as u64).saturating_pow(attempt.saturating_sub(1));
        let delay = self
            .initial_backoff_ms
            .saturating_mul(factor)
            .min(self.max_backoff_ms);
        Duration::from_millis(delay)
    }
}

fn parse_override<T: std::str::FromStr>(
    name: &str,
    value: Option<String>,
) -> crate::error::Result<Option<T>> {
    match value {
        Some(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            crate::error::BotError::ConfigValidation {
                message: format!("{} must be a non-negative integer, got '{}'", name, value),
            }
        }),
        None => Ok(None),
    }
}
