use std::path::Path;

use crate::memory::{MemoryStore, State};
use tracing::info;

/// Serialize the whole state to a JSON file. Used by the CLI so seed and
/// sweep runs operate on the same data set across invocations.
pub async fn save(store: &MemoryStore, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = store
        .read(|state| serde_json::to_string_pretty(state))
        .await
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    tokio::fs::write(path.as_ref(), json).await?;
    info!(path = %path.as_ref().display(), "state snapshot written");
    Ok(())
}

/// Load a snapshot into a fresh store. A missing file yields an empty
/// store so first runs need no setup step.
pub async fn load(path: impl AsRef<Path>) -> std::io::Result<MemoryStore> {
    let path = path.as_ref();
    if !path.exists() {
        info!(path = %path.display(), "no snapshot found, starting empty");
        return Ok(MemoryStore::new());
    }
    let json = tokio::fs::read_to_string(path).await?;
    let state: State = serde_json::from_str(&json)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    info!(path = %path.display(), "state snapshot loaded");
    Ok(MemoryStore::with_state(state))
}
