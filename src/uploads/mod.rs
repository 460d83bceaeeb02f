//! Attaching files to a job and removing them again.

pub mod storage;

pub use storage::{backend_from_config, FilesystemStorage, ObjectUrlStorage, StorageBackend, StorageError, StoredObject};

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::cache::CacheKey;
use crate::client::{ApiClient, ClientError};
use crate::models::{JobFile, NewFile};

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("no file selected")]
    NoFileSelected,

    #[error("could not read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Request(#[from] ClientError),
}

/// A file picked by the user, held in memory until uploaded
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub filename: String,
    pub mimetype: String,
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        let filename = filename.into();
        let mimetype = mime_guess::from_path(&filename)
            .first()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self {
            filename,
            mimetype,
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, UploadError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| UploadError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(filename, bytes))
    }
}

/// Synchronous yes/no prompt shown before destructive actions
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Cancelled,
}

/// Upload composer for one job's file list.
pub struct FileComposer {
    client: ApiClient,
    storage: Arc<dyn StorageBackend>,
    job_id: Uuid,
    selected: Option<SelectedFile>,
    label: String,
}

impl FileComposer {
    pub fn new(client: ApiClient, storage: Arc<dyn StorageBackend>, job_id: Uuid) -> Self {
        Self {
            client,
            storage,
            job_id,
            selected: None,
            label: String::new(),
        }
    }

    pub fn job_id(&self) -> Uuid {
        self.job_id
    }

    pub fn select(&mut self, file: SelectedFile) {
        self.selected = Some(file);
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = label.into();
    }

    pub fn selected(&self) -> Option<&SelectedFile> {
        self.selected.as_ref()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn can_upload(&self) -> bool {
        self.selected.is_some()
    }

    /// Current file list for the job (cached until a mutation invalidates it)
    pub async fn files(&self) -> Result<Vec<JobFile>, ClientError> {
        self.client.job_files(self.job_id).await
    }

    /// Store the selected file, record it, then reset the composer.
    ///
    /// On a failed create call the stored object is released again and the
    /// composer keeps its state so the user can retry.
    pub async fn upload(&mut self) -> Result<JobFile, UploadError> {
        let file = self.selected.as_ref().ok_or(UploadError::NoFileSelected)?;
        let stored = self.storage.upload(&file.filename, &file.mimetype, &file.bytes).await?;

        let label = self.label.trim();
        let new_file = NewFile {
            job_id: self.job_id,
            url: stored.url.clone(),
            filename: file.filename.clone(),
            label: (!label.is_empty()).then(|| label.to_string()),
            mimetype: file.mimetype.clone(),
            size: stored.size,
        };

        let created = match self.client.create_file(&new_file).await {
            Ok(created) => created,
            Err(e) => {
                if let Err(cleanup) = self.storage.delete(&stored.key).await {
                    tracing::warn!("could not release {} after failed upload: {}", stored.key, cleanup);
                }
                return Err(e.into());
            }
        };

        tracing::info!("uploaded {} to job {}", created.filename, self.job_id);
        self.client.cache().invalidate(&CacheKey::job_files(self.job_id));
        self.selected = None;
        self.label.clear();
        Ok(created)
    }

    /// Delete `file` after the user confirms. No optimistic removal.
    pub async fn delete(&self, file: &JobFile, confirm: &dyn Confirm) -> Result<DeleteOutcome, UploadError> {
        let prompt = format!("Delete \"{}\"? This cannot be undone.", file.label);
        if !confirm.confirm(&prompt) {
            return Ok(DeleteOutcome::Cancelled);
        }

        self.client.delete_file(file.id).await?;

        if let Some(key) = self.storage.key_for_url(&file.url) {
            if let Err(e) = self.storage.delete(&key).await {
                tracing::warn!("file {} deleted but storage cleanup failed: {}", file.id, e);
            }
        }

        tracing::info!("deleted file {} from job {}", file.id, file.job_id);
        self.client.cache().invalidate(&CacheKey::job_files(file.job_id));
        Ok(DeleteOutcome::Deleted)
    }
}
