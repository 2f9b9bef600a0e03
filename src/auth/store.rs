//! Durable credential record.
//!
//! A restarted process reads this file back to avoid a needless
//! re-authentication while the persisted token is still within TTL.

use std::path::Path;

use anyhow::{Context, Result};
use tokio::fs;

use crate::auth::credential::Credential;

/// Read the persisted credential, if any. A missing file is not an error;
/// a corrupt file is treated as absent (the next refresh overwrites it).
pub async fn load(path: &Path) -> Result<Option<Credential>> {
    match fs::read(path).await {
        Ok(bytes) => Ok(serde_json::from_slice(&bytes).ok()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e).with_context(|| format!("reading token file {}", path.display())),
    }
}

/// Persist the credential atomically: write a sibling temp file, then
/// rename over the target so readers never observe a half-written record.
pub async fn save(path: &Path, credential: &Credential) -> Result<()> {
    let payload = serde_json::to_vec(credential)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &payload)
        .await
        .with_context(|| format!("writing token file {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .await
        .with_context(|| format!("replacing token file {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        let credential = Credential::new("secret-token".into(), 1_700_000_000);

        save(&path, &credential).await.unwrap();
        let loaded = load(&path).await.unwrap();
        assert_eq!(loaded, Some(credential));

        // the temp file must not linger after the rename
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("absent.json")).await.unwrap();
        assert_eq!(loaded, None);
    }

    #[tokio::test]
    async fn corrupt_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token.json");
        fs::write(&path, b"{ not json").await.unwrap();
        let loaded = load(&path).await.unwrap();
        assert_eq!(loaded, None);
    }
}
