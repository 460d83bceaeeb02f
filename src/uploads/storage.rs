use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use uuid::Uuid;

use crate::config::{StorageBackendKind, StorageConfig};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {0}")]
    NotFound(String),

    #[error("storage I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("rejected object key '{0}'")]
    InvalidKey(String),
}

/// Where a stored object lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub url: String,
    pub size: u64,
}

/// Blob storage the upload flow depends on.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    async fn upload(&self, filename: &str, mimetype: &str, bytes: &[u8]) -> Result<StoredObject, StorageError>;

    async fn url(&self, key: &str) -> Result<String, StorageError>;

    async fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Recover the key of an object from a URL this backend issued
    fn key_for_url(&self, url: &str) -> Option<String>;
}

pub fn backend_from_config(config: &StorageConfig) -> Arc<dyn StorageBackend> {
    match config.backend {
        StorageBackendKind::Placeholder => Arc::new(ObjectUrlStorage::new()),
        StorageBackendKind::Filesystem => Arc::new(FilesystemStorage::new(
            config.root_dir.clone(),
            config.public_base_url.clone(),
        )),
    }
}

/// Stand-in backend: hands out transient `blob:` object URLs and keeps
/// nothing but a registry of what it issued.
#[derive(Debug, Default)]
pub struct ObjectUrlStorage {
    issued: Mutex<HashMap<String, u64>>,
}

const OBJECT_URL_PREFIX: &str = "blob:contractor-portal/";

impl ObjectUrlStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.issued.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl StorageBackend for ObjectUrlStorage {
    async fn upload(&self, filename: &str, mimetype: &str, bytes: &[u8]) -> Result<StoredObject, StorageError> {
        let key = Uuid::new_v4().to_string();
        let size = bytes.len() as u64;
        self.issued
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.clone(), size);
        tracing::debug!("issued object URL for {} ({}, {} bytes)", filename, mimetype, size);
        Ok(StoredObject {
            url: format!("{}{}", OBJECT_URL_PREFIX, key),
            key,
            size,
        })
    }

    async fn url(&self, key: &str) -> Result<String, StorageError> {
        let issued = self.issued.lock().unwrap_or_else(|e| e.into_inner());
        if issued.contains_key(key) {
            Ok(format!("{}{}", OBJECT_URL_PREFIX, key))
        } else {
            Err(StorageError::NotFound(key.to_string()))
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        // Revoking an unknown URL is harmless
        self.issued.lock().unwrap_or_else(|e| e.into_inner()).remove(key);
        Ok(())
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(OBJECT_URL_PREFIX).map(str::to_string)
    }
}

/// Files under a root directory, served from `public_base_url`.
///
/// Every upload gets its own object, even for identical bytes, so deleting
/// one record never takes another record's file with it.
#[derive(Debug, Clone)]
pub struct FilesystemStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FilesystemStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.root.join(key))
    }

    /// `{upload id}-{sha256}.{ext}`
    fn object_key(filename: &str, bytes: &[u8]) -> String {
        let digest = Sha256::digest(bytes);
        let ext = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| e.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        format!("{}-{:x}{}", Uuid::new_v4().simple(), digest, ext)
    }
}

#[async_trait]
impl StorageBackend for FilesystemStorage {
    async fn upload(&self, filename: &str, _mimetype: &str, bytes: &[u8]) -> Result<StoredObject, StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.clone(),
                source,
            })?;

        let key = Self::object_key(filename, bytes);
        let path = self.path_for(&key)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Io { path: path.clone(), source })?;

        tracing::info!("stored {} as {}", filename, key);
        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, key),
            key,
            size: bytes.len() as u64,
        })
    }

    async fn url(&self, key: &str) -> Result<String, StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::try_exists(&path).await {
            Ok(true) => Ok(format!("{}/{}", self.public_base_url, key)),
            Ok(false) => Err(StorageError::NotFound(key.to_string())),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    fn key_for_url(&self, url: &str) -> Option<String> {
        url.strip_prefix(&self.public_base_url)
            .and_then(|rest| rest.strip_prefix('/'))
            .map(str::to_string)
    }
}
