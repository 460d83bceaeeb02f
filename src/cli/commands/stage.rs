use serde_json::json;

use crate::cli::utils::output_json;
use crate::cli::OutputFormat;
use crate::models::{stage_label, stage_progress};

pub fn handle(stage: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let label = stage_label(stage);
    let progress = stage_progress(stage);

    match output_format {
        OutputFormat::Json => output_json(&json!({
            "stage": stage,
            "label": label,
            "progress": progress
        })),
        OutputFormat::Text => {
            println!("{} ({}%)", label, progress);
            Ok(())
        }
    }
}
