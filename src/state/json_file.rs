//! Atomic JSON document persistence shared by the record stores

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{BotError, Result};

/// Load a JSON document, or `None` if the file does not exist yet
pub async fn load_document<T: DeserializeOwned>(path: &str) -> Result<Option<T>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| BotError::StateParse {
                path: path.to_string(),
                source: e,
            }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(BotError::StateLoad {
            path: path.to_string(),
            source: e,
        }),
    }
}

/// Save a JSON document atomically
pub async fn save_document<T: Serialize>(path: &str, document: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(document)?;

    // Write to temp file first, then rename for atomicity
    let temp_path = format!("{}.tmp", path);
    tokio::fs::write(&temp_path, &content)
        .await
        .map_err(|e| BotError::StateSave {
            path: path.to_string(),
            source: e,
        })?;

    tokio::fs::rename(&temp_path, path)
        .await
        .map_err(|e| BotError::StateSave {
            path: path.to_string(),
            source: e,
        })?;

    Ok(())
}

/// Scratch directory for store tests, removed when dropped
#[cfg(test)]
pub fn test_dir() -> tempfile::TempDir {
    tempfile::TempDir::new().unwrap()
}
