use clap::Subcommand;
use serde_json::json;
use std::path::PathBuf;
use uuid::Uuid;

use crate::cli::utils::{confirm_on_terminal, format_size, output_empty_collection, output_json, output_success};
use crate::cli::OutputFormat;
use crate::client::ApiClient;
use crate::config::{self, StorageBackendKind};
use crate::uploads::{backend_from_config, DeleteOutcome, FileComposer, SelectedFile};

#[derive(Subcommand)]
pub enum FilesCommands {
    #[command(about = "List a job's files")]
    List {
        #[arg(help = "Job ID")]
        job: Uuid,
    },

    #[command(about = "Upload a file to a job")]
    Upload {
        #[arg(help = "Job ID")]
        job: Uuid,
        #[arg(help = "Path of the file to upload")]
        path: PathBuf,
        #[arg(long, help = "Display label (defaults to the filename)")]
        label: Option<String>,
    },

    #[command(about = "Delete a file from a job")]
    Delete {
        #[arg(help = "File ID")]
        id: Uuid,
        #[arg(long, help = "Job the file belongs to")]
        job: Uuid,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn composer(client: &ApiClient, job: Uuid) -> FileComposer {
    let storage_config = &config::config().storage;
    if storage_config.backend == StorageBackendKind::Filesystem {
        tracing::debug!(
            "writing uploads to {}; it must be the directory the server serves",
            storage_config.root_dir.display()
        );
    }
    let storage = backend_from_config(storage_config);
    FileComposer::new(client.clone(), storage, job)
}

pub async fn handle(cmd: FilesCommands, client: &ApiClient, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        FilesCommands::List { job } => {
            let files = composer(client, job).files().await?;
            if files.is_empty() {
                return output_empty_collection(output_format, "files", "No files attached to this job");
            }
            match output_format {
                OutputFormat::Json => output_json(&json!({ "files": files })),
                OutputFormat::Text => {
                    for file in &files {
                        println!(
                            "{}  {:<30} {:<24} {:>10}  {}",
                            file.id,
                            file.label,
                            file.mimetype,
                            format_size(file.size),
                            file.uploaded_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                    Ok(())
                }
            }
        }
        FilesCommands::Upload { job, path, label } => {
            let mut composer = composer(client, job);
            composer.select(SelectedFile::from_path(&path).await?);
            if let Some(label) = label {
                composer.set_label(label);
            }
            let file = composer.upload().await?;
            output_success(
                output_format,
                &format!("Uploaded {} ({})", file.label, format_size(file.size)),
                Some(json!(file)),
            )
        }
        FilesCommands::Delete { id, job, yes } => {
            let composer = composer(client, job);
            let files = composer.files().await?;
            let file = files
                .iter()
                .find(|f| f.id == id)
                .ok_or_else(|| anyhow::anyhow!("file {} is not attached to job {}", id, job))?;

            let outcome = if yes {
                composer.delete(file, &|_: &str| true).await?
            } else {
                composer.delete(file, &confirm_on_terminal).await?
            };

            match outcome {
                DeleteOutcome::Deleted => {
                    output_success(output_format, &format!("Deleted {}", file.label), Some(json!({ "id": id })))
                }
                DeleteOutcome::Cancelled => output_success(output_format, "Delete cancelled", None),
            }
        }
    }
}
