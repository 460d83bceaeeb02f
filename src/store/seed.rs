use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::models::{Contact, Contract, Invoice, Job, JobFile, Message, Quote, QuoteItem};

/// Fixture records loaded into a fresh store (YAML)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub contacts: Vec<Contact>,
    #[serde(default)]
    pub jobs: Vec<Job>,
    #[serde(default)]
    pub files: Vec<JobFile>,
    #[serde(default)]
    pub invoices: Vec<Invoice>,
    #[serde(default)]
    pub quotes: Vec<SeedQuote>,
    #[serde(default)]
    pub contracts: Vec<Contract>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedQuote {
    #[serde(flatten)]
    pub quote: Quote,
    #[serde(default)]
    pub items: Vec<QuoteItem>,
}

impl SeedData {
    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read seed file {}: {}", path.display(), e))?;
        Self::from_yaml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStage, QuoteStatus};
    use crate::store::Store;

    const SEED: &str = r#"
contacts:
  - id: 6f1c1f7e-2d4b-4a51-9b0e-0c3a5e1d2f01
    name: Dana Whitfield
    email: dana@example.com
jobs:
  - id: 0b6a7a52-5d8e-4c1a-8f59-3e2b7c9d4a10
    contact_id: 6f1c1f7e-2d4b-4a51-9b0e-0c3a5e1d2f01
    title: Kitchen remodel
    stage: materials_ordered
    start_date: 2026-03-02
quotes:
  - id: 9d3e2c1b-7a6f-4e5d-8c9b-1a2b3c4d5e6f
    job_id: 0b6a7a52-5d8e-4c1a-8f59-3e2b7c9d4a10
    title: Kitchen remodel quote
    status: sent
    items:
      - id: 1e2d3c4b-5a69-4788-9a0b-c1d2e3f4a5b6
        description: Cabinets
        quantity: "1"
        unit_price: "6400.00"
"#;

    #[test]
    fn yaml_seed_parses() {
        let seed = SeedData::from_yaml(SEED).unwrap();
        assert_eq!(seed.jobs[0].stage, JobStage::MaterialsOrdered);
        assert_eq!(seed.quotes[0].quote.status, QuoteStatus::Sent);
        assert_eq!(seed.quotes[0].items.len(), 1);
        assert!(seed.files.is_empty());
    }

    #[test]
    fn dangling_reference_is_rejected() {
        let mut seed = SeedData::from_yaml(SEED).unwrap();
        seed.contacts.clear();
        assert!(Store::from_seed(seed).is_err());
    }
}
