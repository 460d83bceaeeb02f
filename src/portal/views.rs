use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::gate::{PortalAccess, PortalSession};
use super::payload::PortalPayload;
use crate::models::{ContractStatus, InvoiceStatus, JobStage, QuoteStatus};

pub const HOME_LINK: &str = "/";

/// What a portal page renders once verification has settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum PortalPage {
    Denied { message: String, home_link: String },
    Ready(PortalView),
}

impl PortalPage {
    pub fn from_access(access: PortalAccess) -> Self {
        match access {
            PortalAccess::Granted(session) => PortalPage::Ready(PortalView::from_session(&session)),
            PortalAccess::Denied(reason) => PortalPage::Denied {
                message: reason.message().to_string(),
                home_link: HOME_LINK.to_string(),
            },
        }
    }

    pub fn view(&self) -> Option<&PortalView> {
        match self {
            PortalPage::Ready(view) => Some(view),
            PortalPage::Denied { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortalView {
    pub overview: Overview,
    pub timeline: Vec<TimelineStep>,
    pub documents: Vec<DocumentEntry>,
    pub photos: Vec<PhotoEntry>,
}

impl PortalView {
    pub fn from_session(session: &PortalSession) -> Self {
        Self::from_payload(session.payload())
    }

    pub fn from_payload(payload: &PortalPayload) -> Self {
        Self {
            overview: Overview::from_payload(payload),
            timeline: timeline(payload.job.as_ref().map(|j| j.stage)),
            documents: documents(payload),
            photos: payload
                .photos()
                .map(|f| PhotoEntry {
                    label: f.label.clone(),
                    url: f.url.clone(),
                    uploaded_at: f.uploaded_at,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub greeting: String,
    pub job_title: String,
    pub address: Option<String>,
    pub stage_label: Option<String>,
    pub progress: u8,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub contract_summary: String,
    pub quote_summary: String,
    pub outstanding_invoices: usize,
    pub outstanding_total: Decimal,
}

impl Overview {
    fn from_payload(payload: &PortalPayload) -> Self {
        let greeting = match &payload.contact {
            Some(contact) => format!("Welcome, {}", contact.name),
            None => "Welcome".to_string(),
        };
        let job = payload.job.as_ref();

        let contract_summary = match &payload.contract {
            None => "No contract yet".to_string(),
            Some(c) => match (c.status, c.signed_by.as_deref()) {
                (ContractStatus::Signed, Some(name)) => format!("Signed by {}", name),
                (ContractStatus::Signed, None) => "Signed".to_string(),
                (ContractStatus::Pending, _) => "Awaiting signature".to_string(),
            },
        };
        let quote_summary = match &payload.quote {
            None => "No quote yet".to_string(),
            Some(q) => match q.status {
                QuoteStatus::Draft => "Quote in preparation".to_string(),
                QuoteStatus::Sent => format!("{} is ready for your approval", q.title),
                QuoteStatus::Approved => format!("{} approved", q.title),
            },
        };

        let outstanding: Vec<_> = payload.invoices().iter().filter(|i| i.is_outstanding()).collect();

        Self {
            greeting,
            job_title: job.map(|j| j.title.clone()).unwrap_or_else(|| "No active job".to_string()),
            address: job.and_then(|j| j.address.clone()),
            stage_label: job.map(|j| j.stage.label().to_string()),
            progress: job.map(|j| j.progress()).unwrap_or(0),
            start_date: job.and_then(|j| j.start_date),
            end_date: job.and_then(|j| j.end_date),
            contract_summary,
            quote_summary,
            outstanding_invoices: outstanding.len(),
            outstanding_total: outstanding.iter().map(|i| i.amount).sum(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    Done,
    Current,
    Upcoming,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineStep {
    pub stage: JobStage,
    pub label: &'static str,
    pub state: StepState,
}

/// The five stages in order, relative to `current`. Without a job every step is upcoming.
pub fn timeline(current: Option<JobStage>) -> Vec<TimelineStep> {
    JobStage::ALL
        .iter()
        .map(|&stage| {
            let state = match current {
                Some(cur) if stage.position() < cur.position() => StepState::Done,
                // Complete has nothing after it, so it reads as done rather than in-flight
                Some(cur) if stage == cur && cur == JobStage::Complete => StepState::Done,
                Some(cur) if stage == cur => StepState::Current,
                _ => StepState::Upcoming,
            };
            TimelineStep {
                stage,
                label: stage.label(),
                state,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DocumentEntry {
    File {
        label: String,
        url: String,
        mimetype: String,
        size: u64,
        uploaded_at: DateTime<Utc>,
    },
    Quote {
        title: String,
        status: QuoteStatus,
    },
    Contract {
        status: ContractStatus,
        signed_by: Option<String>,
    },
    Invoice {
        number: String,
        status: InvoiceStatus,
        amount: Decimal,
        due_date: Option<NaiveDate>,
    },
}

fn documents(payload: &PortalPayload) -> Vec<DocumentEntry> {
    let mut docs = Vec::new();

    // Drafts are internal until sent
    if let Some(q) = payload.quote.as_ref().filter(|q| q.status != QuoteStatus::Draft) {
        docs.push(DocumentEntry::Quote {
            title: q.title.clone(),
            status: q.status,
        });
    }
    if let Some(c) = &payload.contract {
        docs.push(DocumentEntry::Contract {
            status: c.status,
            signed_by: c.signed_by.clone(),
        });
    }
    for invoice in payload.invoices().iter().filter(|i| i.status != InvoiceStatus::Draft) {
        docs.push(DocumentEntry::Invoice {
            number: invoice.number.clone(),
            status: invoice.status,
            amount: invoice.amount,
            due_date: invoice.due_date,
        });
    }
    for file in payload.documents() {
        docs.push(DocumentEntry::File {
            label: file.label.clone(),
            url: file.url.clone(),
            mimetype: file.mimetype.clone(),
            size: file.size,
            uploaded_at: file.uploaded_at,
        });
    }

    docs
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhotoEntry {
    pub label: String,
    pub url: String,
    pub uploaded_at: DateTime<Utc>,
}
