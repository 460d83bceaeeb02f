use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::contract::Contract;

/// Quote lifecycle. Moves forward only: draft, sent, approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Draft,
    Sent,
    Approved,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Approved => "approved",
        }
    }

    /// Only the immediate next status is reachable
    pub fn next(&self) -> Option<QuoteStatus> {
        match self {
            QuoteStatus::Draft => Some(QuoteStatus::Sent),
            QuoteStatus::Sent => Some(QuoteStatus::Approved),
            QuoteStatus::Approved => None,
        }
    }

    pub fn can_transition_to(&self, target: QuoteStatus) -> bool {
        self.next() == Some(target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub id: Uuid,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
}

impl QuoteItem {
    pub fn total(&self) -> Decimal {
        self.quantity * self.unit_price
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub job_id: Uuid,
    pub title: String,
    pub status: QuoteStatus,
    #[serde(default)]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub approved_by: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Quote {
    pub fn total(items: &[QuoteItem]) -> Decimal {
        items.iter().map(QuoteItem::total).sum()
    }
}

/// Body of `POST /api/quotes/:id`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateQuote {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<QuoteItem>>,
}

/// Body of `POST /api/quotes/:id/approve`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApproveQuote {
    pub signer: String,
}

/// Result of approving a quote: the approved quote and the contract it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteApproval {
    pub quote: Quote,
    pub contract: Contract,
}
