use serde::{Deserialize, Serialize};

use crate::models::{Contact, Contract, Invoice, Job, JobFile, Quote};

/// Everything the portal shows for one token.
///
/// Each field may be absent; views fall back to placeholder text rather
/// than failing. Absent fields serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalPayload {
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub job: Option<Job>,
    #[serde(default)]
    pub files: Option<Vec<JobFile>>,
    #[serde(default)]
    pub invoices: Option<Vec<Invoice>>,
    #[serde(default)]
    pub contract: Option<Contract>,
    #[serde(default)]
    pub quote: Option<Quote>,
}

impl PortalPayload {
    pub fn files(&self) -> &[JobFile] {
        self.files.as_deref().unwrap_or(&[])
    }

    pub fn invoices(&self) -> &[Invoice] {
        self.invoices.as_deref().unwrap_or(&[])
    }

    pub fn photos(&self) -> impl Iterator<Item = &JobFile> {
        self.files().iter().filter(|f| f.is_image())
    }

    pub fn documents(&self) -> impl Iterator<Item = &JobFile> {
        self.files().iter().filter(|f| !f.is_image())
    }
}

/// Row of `GET /api/portal/jobs`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortalJobSummary {
    #[serde(flatten)]
    pub job: Job,
    pub stage_label: String,
    pub progress: u8,
}

impl From<Job> for PortalJobSummary {
    fn from(job: Job) -> Self {
        Self {
            stage_label: job.stage.label().to_string(),
            progress: job.stage.progress(),
            job,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobStage;
    use crate::testing;

    #[test]
    fn serialized_payload_has_exactly_six_fields() {
        let value = serde_json::to_value(PortalPayload::default()).unwrap();
        let mut keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["contact", "contract", "files", "invoices", "job", "quote"]);
        assert!(value.as_object().unwrap().values().all(|v| v.is_null()));
    }

    #[test]
    fn missing_fields_deserialize_as_absent() {
        let payload: PortalPayload = serde_json::from_str("{}").unwrap();
        assert_eq!(payload, PortalPayload::default());
        assert!(payload.files().is_empty());
        assert!(payload.invoices().is_empty());
    }

    #[test]
    fn photos_and_documents_split_by_mimetype() {
        let contact = testing::contact(None);
        let job = testing::job(contact.id, JobStage::InProgress);
        let payload = PortalPayload {
            files: Some(vec![
                testing::job_file(job.id, "framing.jpg", "image/jpeg"),
                testing::job_file(job.id, "permit.pdf", "application/pdf"),
            ]),
            ..Default::default()
        };
        assert_eq!(payload.photos().count(), 1);
        assert_eq!(payload.documents().next().unwrap().filename, "permit.pdf");
    }

    #[test]
    fn job_summary_flattens_job_fields() {
        let contact = testing::contact(None);
        let summary = PortalJobSummary::from(testing::job(contact.id, JobStage::Finishing));
        let value = serde_json::to_value(&summary).unwrap();
        assert_eq!(value["stage"], "finishing");
        assert_eq!(value["stage_label"], "Finishing");
        assert_eq!(value["progress"], 80);
    }
}
