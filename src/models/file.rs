use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// File attached to a job (document or photo).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobFile {
    pub id: Uuid,
    pub job_id: Uuid,
    pub url: String,
    pub filename: String,
    pub label: String,
    pub mimetype: String,
    pub size: u64,
    #[serde(default = "Utc::now")]
    pub uploaded_at: DateTime<Utc>,
}

impl JobFile {
    pub fn is_image(&self) -> bool {
        self.mimetype.starts_with("image/")
    }
}

/// Body of `POST /api/files`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFile {
    pub job_id: Uuid,
    pub url: String,
    pub filename: String,
    #[serde(default)]
    pub label: Option<String>,
    pub mimetype: String,
    pub size: u64,
}

impl NewFile {
    /// Label to store; falls back to the filename when absent or blank
    pub fn resolved_label(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => self.filename.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_file(label: Option<&str>) -> NewFile {
        NewFile {
            job_id: Uuid::new_v4(),
            url: "blob:local/1".to_string(),
            filename: "site-plan.pdf".to_string(),
            label: label.map(str::to_string),
            mimetype: "application/pdf".to_string(),
            size: 1024,
        }
    }

    #[test]
    fn label_defaults_to_filename() {
        assert_eq!(new_file(None).resolved_label(), "site-plan.pdf");
        assert_eq!(new_file(Some("  ")).resolved_label(), "site-plan.pdf");
        assert_eq!(new_file(Some("Site plan rev B")).resolved_label(), "Site plan rev B");
    }
}
