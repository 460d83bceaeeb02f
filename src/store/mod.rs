//! In-memory records for the server of record.
//!
//! Everything lives for the life of the process; there is no persistence.

pub mod seed;

pub use seed::SeedData;

use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    looks_like_email, Contact, Contract, ContractStatus, Invoice, Job, JobFile, Message, MessageKind, NewFile,
    NewMessage, Quote, QuoteApproval, QuoteItem, QuoteStatus, TestEmailReceipt, UpdateQuote,
};
use crate::portal::PortalPayload;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("{0}")]
    Conflict(String),

    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },
}

impl StoreError {
    fn not_found(kind: &'static str, id: Uuid) -> Self {
        StoreError::NotFound { kind, id }
    }

    fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        StoreError::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Record counts reported by `/health`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub contacts: usize,
    pub jobs: usize,
    pub files: usize,
    pub quotes: usize,
    pub messages: usize,
}

#[derive(Debug, Default)]
struct Records {
    contacts: HashMap<Uuid, Contact>,
    jobs: HashMap<Uuid, Job>,
    files: HashMap<Uuid, JobFile>,
    invoices: HashMap<Uuid, Invoice>,
    quotes: HashMap<Uuid, Quote>,
    quote_items: HashMap<Uuid, Vec<QuoteItem>>,
    contracts: HashMap<Uuid, Contract>,
    messages: Vec<Message>,
    outbox: Vec<TestEmailReceipt>,
}

#[derive(Debug, Default)]
pub struct Store {
    records: RwLock<Records>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed data, checking that every reference resolves.
    pub fn from_seed(seed: SeedData) -> Result<Self, StoreError> {
        let mut records = Records::default();

        for contact in seed.contacts {
            records.contacts.insert(contact.id, contact);
        }
        for job in seed.jobs {
            if !records.contacts.contains_key(&job.contact_id) {
                return Err(StoreError::not_found("contact", job.contact_id));
            }
            records.jobs.insert(job.id, job);
        }
        for file in seed.files {
            Self::require_job(&records, file.job_id)?;
            records.files.insert(file.id, file);
        }
        for invoice in seed.invoices {
            Self::require_job(&records, invoice.job_id)?;
            records.invoices.insert(invoice.id, invoice);
        }
        for seeded in seed.quotes {
            Self::require_job(&records, seeded.quote.job_id)?;
            records.quote_items.insert(seeded.quote.id, seeded.items);
            records.quotes.insert(seeded.quote.id, seeded.quote);
        }
        for contract in seed.contracts {
            Self::require_job(&records, contract.job_id)?;
            if !records.quotes.contains_key(&contract.quote_id) {
                return Err(StoreError::not_found("quote", contract.quote_id));
            }
            records.contracts.insert(contract.id, contract);
        }
        for message in seed.messages {
            if !records.contacts.contains_key(&message.contact_id) {
                return Err(StoreError::not_found("contact", message.contact_id));
            }
            records.messages.push(message);
        }

        tracing::info!(
            "seeded store: {} contacts, {} jobs, {} files",
            records.contacts.len(),
            records.jobs.len(),
            records.files.len()
        );
        Ok(Self {
            records: RwLock::new(records),
        })
    }

    fn require_job(records: &Records, job_id: Uuid) -> Result<&Job, StoreError> {
        records.jobs.get(&job_id).ok_or_else(|| StoreError::not_found("job", job_id))
    }

    pub async fn stats(&self) -> StoreStats {
        let records = self.records.read().await;
        StoreStats {
            contacts: records.contacts.len(),
            jobs: records.jobs.len(),
            files: records.files.len(),
            quotes: records.quotes.len(),
            messages: records.messages.len(),
        }
    }

    // Contacts and jobs

    pub async fn insert_contact(&self, contact: Contact) {
        self.records.write().await.contacts.insert(contact.id, contact);
    }

    pub async fn insert_job(&self, job: Job) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        if !records.contacts.contains_key(&job.contact_id) {
            return Err(StoreError::not_found("contact", job.contact_id));
        }
        records.jobs.insert(job.id, job);
        Ok(())
    }

    pub async fn contact(&self, id: Uuid) -> Result<Contact, StoreError> {
        self.records
            .read()
            .await
            .contacts
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("contact", id))
    }

    pub async fn jobs_for_contact(&self, contact_id: Uuid) -> Vec<Job> {
        let records = self.records.read().await;
        let mut jobs: Vec<Job> = records
            .jobs
            .values()
            .filter(|j| j.contact_id == contact_id)
            .cloned()
            .collect();
        jobs.sort_by_key(|j| j.created_at);
        jobs
    }

    // Files

    pub async fn files_for_job(&self, job_id: Uuid) -> Result<Vec<JobFile>, StoreError> {
        let records = self.records.read().await;
        Self::require_job(&records, job_id)?;
        Ok(Self::job_files(&records, job_id))
    }

    fn job_files(records: &Records, job_id: Uuid) -> Vec<JobFile> {
        let mut files: Vec<JobFile> = records
            .files
            .values()
            .filter(|f| f.job_id == job_id)
            .cloned()
            .collect();
        // Newest first
        files.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
        files
    }

    pub async fn create_file(&self, new_file: NewFile) -> Result<JobFile, StoreError> {
        if new_file.filename.trim().is_empty() {
            return Err(StoreError::invalid("filename", "filename is required"));
        }
        if new_file.url.trim().is_empty() {
            return Err(StoreError::invalid("url", "url is required"));
        }

        let mut records = self.records.write().await;
        Self::require_job(&records, new_file.job_id)?;

        let file = JobFile {
            id: Uuid::new_v4(),
            job_id: new_file.job_id,
            label: new_file.resolved_label(),
            url: new_file.url,
            filename: new_file.filename,
            mimetype: new_file.mimetype,
            size: new_file.size,
            uploaded_at: Utc::now(),
        };
        records.files.insert(file.id, file.clone());
        Ok(file)
    }

    pub async fn delete_file(&self, id: Uuid) -> Result<JobFile, StoreError> {
        self.records
            .write()
            .await
            .files
            .remove(&id)
            .ok_or_else(|| StoreError::not_found("file", id))
    }

    // Messages

    /// All messages, newest first
    pub async fn messages(&self) -> Vec<Message> {
        let records = self.records.read().await;
        records.messages.iter().rev().cloned().collect()
    }

    pub async fn messages_for_contact(&self, contact_id: Uuid) -> Result<Vec<Message>, StoreError> {
        let records = self.records.read().await;
        if !records.contacts.contains_key(&contact_id) {
            return Err(StoreError::not_found("contact", contact_id));
        }
        Ok(records
            .messages
            .iter()
            .rev()
            .filter(|m| m.contact_id == contact_id)
            .cloned()
            .collect())
    }

    pub async fn create_message(&self, new_message: NewMessage) -> Result<Message, StoreError> {
        let body = new_message.body.trim();
        if body.is_empty() {
            return Err(StoreError::invalid("body", "Message body is required"));
        }

        let mut records = self.records.write().await;
        let contact = records
            .contacts
            .get(&new_message.contact_id)
            .ok_or_else(|| StoreError::not_found("contact", new_message.contact_id))?;

        let subject = match new_message.kind {
            MessageKind::Message => None,
            MessageKind::Email => {
                if contact.email_address().is_none() {
                    return Err(StoreError::invalid(
                        "contact_id",
                        format!("{} has no email address on file", contact.name),
                    ));
                }
                match new_message.subject.as_deref().map(str::trim) {
                    Some(s) if !s.is_empty() => Some(s.to_string()),
                    _ => return Err(StoreError::invalid("subject", "Subject is required")),
                }
            }
        };

        let message = Message {
            id: Uuid::new_v4(),
            contact_id: new_message.contact_id,
            direction: new_message.direction,
            kind: new_message.kind,
            subject,
            body: body.to_string(),
            created_at: Utc::now(),
        };
        records.messages.push(message.clone());
        Ok(message)
    }

    // Quotes

    pub async fn insert_quote(&self, quote: Quote, items: Vec<QuoteItem>) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        Self::require_job(&records, quote.job_id)?;
        records.quote_items.insert(quote.id, items);
        records.quotes.insert(quote.id, quote);
        Ok(())
    }

    pub async fn quote(&self, id: Uuid) -> Result<Quote, StoreError> {
        self.records
            .read()
            .await
            .quotes
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("quote", id))
    }

    pub async fn quote_items(&self, id: Uuid) -> Result<Vec<QuoteItem>, StoreError> {
        let records = self.records.read().await;
        if !records.quotes.contains_key(&id) {
            return Err(StoreError::not_found("quote", id));
        }
        Ok(records.quote_items.get(&id).cloned().unwrap_or_default())
    }

    pub async fn update_quote(&self, id: Uuid, update: UpdateQuote) -> Result<Quote, StoreError> {
        let mut records = self.records.write().await;
        let quote = records
            .quotes
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("quote", id))?;
        if quote.status != QuoteStatus::Draft {
            return Err(StoreError::Conflict(format!(
                "quote is {}; only drafts can be edited",
                quote.status.as_str()
            )));
        }
        if let Some(title) = update.title {
            if title.trim().is_empty() {
                return Err(StoreError::invalid("title", "title cannot be blank"));
            }
            quote.title = title;
        }
        let quote = quote.clone();
        if let Some(items) = update.items {
            records.quote_items.insert(id, items);
        }
        Ok(quote)
    }

    fn advance(quote: &mut Quote, target: QuoteStatus) -> Result<(), StoreError> {
        if !quote.status.can_transition_to(target) {
            return Err(StoreError::Conflict(format!(
                "quote is {}; cannot move to {}",
                quote.status.as_str(),
                target.as_str()
            )));
        }
        quote.status = target;
        Ok(())
    }

    pub async fn send_quote(&self, id: Uuid) -> Result<Quote, StoreError> {
        let mut records = self.records.write().await;
        let quote = records
            .quotes
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("quote", id))?;
        Self::advance(quote, QuoteStatus::Sent)?;
        quote.sent_at = Some(Utc::now());
        Ok(quote.clone())
    }

    /// Approve a sent quote and create its contract in one step
    pub async fn approve_quote(&self, id: Uuid, signer: &str) -> Result<QuoteApproval, StoreError> {
        let signer = signer.trim();
        if signer.is_empty() {
            return Err(StoreError::invalid("signer", "signer name is required"));
        }

        let mut records = self.records.write().await;
        let quote = records
            .quotes
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("quote", id))?;
        Self::advance(quote, QuoteStatus::Approved)?;
        let now = Utc::now();
        quote.approved_at = Some(now);
        quote.approved_by = Some(signer.to_string());
        let quote = quote.clone();

        let contract = Contract {
            id: Uuid::new_v4(),
            job_id: quote.job_id,
            quote_id: quote.id,
            status: ContractStatus::Pending,
            signed_by: None,
            signed_at: None,
            created_at: now,
        };
        records.contracts.insert(contract.id, contract.clone());

        Ok(QuoteApproval { quote, contract })
    }

    pub async fn insert_invoice(&self, invoice: Invoice) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        Self::require_job(&records, invoice.job_id)?;
        records.invoices.insert(invoice.id, invoice);
        Ok(())
    }

    // Portal

    /// Everything the portal shows for a contact's job.
    ///
    /// A job that belongs to someone else is left out along with everything
    /// attached to it.
    pub async fn portal_payload(&self, contact_id: Uuid, job_id: Uuid) -> PortalPayload {
        let records = self.records.read().await;

        let contact = records.contacts.get(&contact_id).cloned();
        let job = records
            .jobs
            .get(&job_id)
            .filter(|j| j.contact_id == contact_id)
            .cloned();
        let Some(job) = job else {
            return PortalPayload {
                contact,
                ..Default::default()
            };
        };

        let mut invoices: Vec<Invoice> = records
            .invoices
            .values()
            .filter(|i| i.job_id == job.id)
            .cloned()
            .collect();
        invoices.sort_by_key(|i| i.created_at);

        let contract = records
            .contracts
            .values()
            .filter(|c| c.job_id == job.id)
            .max_by_key(|c| c.created_at)
            .cloned();
        let quote = records
            .quotes
            .values()
            .filter(|q| q.job_id == job.id)
            .max_by_key(|q| q.created_at)
            .cloned();

        PortalPayload {
            contact,
            files: Some(Self::job_files(&records, job.id)),
            invoices: Some(invoices),
            contract,
            quote,
            job: Some(job),
        }
    }

    // Outbox

    pub async fn record_test_email(&self, to: &str) -> Result<TestEmailReceipt, StoreError> {
        let to = to.trim();
        if !looks_like_email(to) {
            return Err(StoreError::invalid("to", format!("'{}' is not an email address", to)));
        }
        let receipt = TestEmailReceipt {
            to: to.to_string(),
            subject: "Test email".to_string(),
            sent_at: Utc::now(),
        };
        self.records.write().await.outbox.push(receipt.clone());
        Ok(receipt)
    }

    pub async fn outbox(&self) -> Vec<TestEmailReceipt> {
        self.records.read().await.outbox.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{JobStage, MessageDirection};
    use crate::testing;

    async fn store_with_job(email: Option<&str>) -> (Store, Contact, Job) {
        let store = Store::new();
        let contact = testing::contact(email);
        let job = testing::job(contact.id, JobStage::Planning);
        store.insert_contact(contact.clone()).await;
        store.insert_job(job.clone()).await.unwrap();
        (store, contact, job)
    }

    fn draft_quote(job_id: Uuid) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            job_id,
            title: "Kitchen quote".to_string(),
            status: QuoteStatus::Draft,
            sent_at: None,
            approved_at: None,
            approved_by: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn file_label_falls_back_to_filename() {
        let (store, _, job) = store_with_job(None).await;
        let file = store
            .create_file(NewFile {
                job_id: job.id,
                url: "blob:x/1".to_string(),
                filename: "invoice-scan.pdf".to_string(),
                label: None,
                mimetype: "application/pdf".to_string(),
                size: 10,
            })
            .await
            .unwrap();
        assert_eq!(file.label, "invoice-scan.pdf");

        store.delete_file(file.id).await.unwrap();
        assert!(store.files_for_job(job.id).await.unwrap().is_empty());
        assert!(matches!(store.delete_file(file.id).await, Err(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn file_for_unknown_job_is_not_found() {
        let store = Store::new();
        let err = store
            .create_file(NewFile {
                job_id: Uuid::new_v4(),
                url: "blob:x/1".to_string(),
                filename: "a.pdf".to_string(),
                label: None,
                mimetype: "application/pdf".to_string(),
                size: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "job", .. }));
    }

    #[tokio::test]
    async fn email_rules_are_enforced() {
        let (store, contact, _) = store_with_job(None).await;
        let err = store
            .create_message(NewMessage {
                contact_id: contact.id,
                direction: MessageDirection::Outbound,
                kind: MessageKind::Email,
                subject: Some("Hi".to_string()),
                body: "Hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "contact_id", .. }));

        let (store, contact, _) = store_with_job(Some("dana@example.com")).await;
        let err = store
            .create_message(NewMessage {
                contact_id: contact.id,
                direction: MessageDirection::Outbound,
                kind: MessageKind::Email,
                subject: None,
                body: "Hello".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation { field: "subject", .. }));
    }

    #[tokio::test]
    async fn messages_are_listed_newest_first_per_contact() {
        let (store, contact, _) = store_with_job(None).await;
        let other = testing::contact(None);
        store.insert_contact(other.clone()).await;
        for (who, body) in [(contact.id, "first"), (other.id, "elsewhere"), (contact.id, "second")] {
            store
                .create_message(NewMessage {
                    contact_id: who,
                    direction: MessageDirection::Outbound,
                    kind: MessageKind::Message,
                    subject: None,
                    body: body.to_string(),
                })
                .await
                .unwrap();
        }

        let mine = store.messages_for_contact(contact.id).await.unwrap();
        let bodies: Vec<_> = mine.iter().map(|m| m.body.as_str()).collect();
        assert_eq!(bodies, vec!["second", "first"]);
        assert_eq!(store.messages().await.len(), 3);
    }

    #[tokio::test]
    async fn quote_moves_forward_and_approval_creates_contract() {
        let (store, contact, job) = store_with_job(None).await;
        let quote = draft_quote(job.id);
        store.insert_quote(quote.clone(), vec![]).await.unwrap();

        assert!(matches!(
            store.approve_quote(quote.id, "Dana").await,
            Err(StoreError::Conflict(_))
        ));
        let sent = store.send_quote(quote.id).await.unwrap();
        assert_eq!(sent.status, QuoteStatus::Sent);
        assert!(sent.sent_at.is_some());
        assert!(matches!(store.send_quote(quote.id).await, Err(StoreError::Conflict(_))));

        let approval = store.approve_quote(quote.id, "Dana Whitfield").await.unwrap();
        assert_eq!(approval.quote.approved_by.as_deref(), Some("Dana Whitfield"));
        assert_eq!(approval.contract.quote_id, quote.id);
        assert!(matches!(
            store.approve_quote(quote.id, "Dana").await,
            Err(StoreError::Conflict(_))
        ));

        let payload = store.portal_payload(contact.id, job.id).await;
        assert_eq!(payload.contract.map(|c| c.id), Some(approval.contract.id));
        assert_eq!(payload.quote.map(|q| q.status), Some(QuoteStatus::Approved));
    }

    #[tokio::test]
    async fn sent_quote_cannot_be_edited() {
        let (store, _, job) = store_with_job(None).await;
        let quote = draft_quote(job.id);
        store.insert_quote(quote.clone(), vec![]).await.unwrap();
        store.send_quote(quote.id).await.unwrap();

        let err = store.update_quote(quote.id, UpdateQuote::default()).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn portal_payload_hides_other_contacts_jobs() {
        let (store, _, job) = store_with_job(None).await;
        let stranger = testing::contact(None);
        store.insert_contact(stranger.clone()).await;

        let payload = store.portal_payload(stranger.id, job.id).await;
        assert!(payload.contact.is_some());
        assert!(payload.job.is_none());
        assert!(payload.files.is_none());
    }

    #[tokio::test]
    async fn test_email_needs_an_address() {
        let store = Store::new();
        assert!(store.record_test_email("nobody").await.is_err());
        store.record_test_email("office@example.com").await.unwrap();
        assert_eq!(store.outbox().await.len(), 1);
    }
}
