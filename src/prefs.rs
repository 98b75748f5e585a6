//! Durable key-value store for the user's email and auth token.

use crate::error::MenuError;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Email and token pair; both empty until the token handshake completes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credential {
    pub email: String,
    pub token: String,
}

impl Credential {
    pub fn new(email: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            token: token.into(),
        }
    }

    /// True when both email and token are non-blank.
    pub fn is_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.token.trim().is_empty()
    }
}

pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot. Missing file or keys read as empty strings.
    pub async fn read(&self) -> Result<Credential, MenuError> {
        match fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Credential::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite both keys as one unit (write to .tmp then rename).
    pub async fn write_credential(&self, email: &str, token: &str) -> Result<(), MenuError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(&Credential::new(email, token))?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.path).await?;
        info!(email, "credential stored");
        Ok(())
    }

    /// Remove both keys. Clearing an absent credential is a no-op.
    pub async fn clear_credential(&self) -> Result<(), MenuError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                info!("credential cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no credential to clear");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("prefs.json"));
        let cred = store.read().await.unwrap();
        assert_eq!(cred, Credential::default());
        assert!(!cred.is_complete());
    }

    #[tokio::test]
    async fn missing_key_defaults_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"email":"a@b.c"}"#).unwrap();
        let cred = PreferenceStore::new(&path).read().await.unwrap();
        assert_eq!(cred.email, "a@b.c");
        assert_eq!(cred.token, "");
    }

    #[tokio::test]
    async fn write_overwrites_and_clear_removes_both() {
        let dir = tempfile::tempdir().unwrap();
        let store = PreferenceStore::new(dir.path().join("nested").join("prefs.json"));

        store.write_credential("a@b.c", "t1").await.unwrap();
        store.write_credential("x@y.z", "t2").await.unwrap();
        assert_eq!(store.read().await.unwrap(), Credential::new("x@y.z", "t2"));
        assert!(!store.path().with_extension("json.tmp").exists());

        store.clear_credential().await.unwrap();
        assert_eq!(store.read().await.unwrap(), Credential::default());
        store.clear_credential().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();
        let err = PreferenceStore::new(&path).read().await.unwrap_err();
        assert!(matches!(err, MenuError::Json(_)));
    }
}
