use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub job_id: Uuid,
    pub number: String,
    pub status: InvoiceStatus,
    pub amount: Decimal,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn is_outstanding(&self) -> bool {
        self.status == InvoiceStatus::Sent
    }
}
