//! Sending a quote to the client and recording their approval.

use futures::try_join;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::cache::CacheKey;
use crate::client::{ApiClient, ClientError};
use crate::models::{Quote, QuoteApproval, QuoteItem, QuoteStatus, UpdateQuote};

#[derive(Debug, Error)]
pub enum QuoteFlowError {
    #[error("quote is {from}; cannot move to {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("only draft quotes can be edited (quote is {0})")]
    NotEditable(&'static str),

    #[error("approval needs the signer's name")]
    MissingSigner,

    #[error(transparent)]
    Request(#[from] ClientError),
}

/// A quote with its line items
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteDetail {
    pub quote: Quote,
    pub items: Vec<QuoteItem>,
}

impl QuoteDetail {
    pub fn total(&self) -> Decimal {
        Quote::total(&self.items)
    }
}

pub struct QuoteFlow {
    client: ApiClient,
}

impl QuoteFlow {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn load(&self, quote_id: Uuid) -> Result<QuoteDetail, ClientError> {
        let (quote, items) = try_join!(self.client.quote(quote_id), self.client.quote_items(quote_id))?;
        Ok(QuoteDetail { quote, items })
    }

    pub async fn update(&self, quote: &Quote, update: &UpdateQuote) -> Result<Quote, QuoteFlowError> {
        if quote.status != QuoteStatus::Draft {
            return Err(QuoteFlowError::NotEditable(quote.status.as_str()));
        }
        let updated = self.client.update_quote(quote.id, update).await?;
        self.invalidate(quote.id);
        Ok(updated)
    }

    /// draft → sent
    pub async fn send(&self, quote: &Quote) -> Result<Quote, QuoteFlowError> {
        Self::check_transition(quote.status, QuoteStatus::Sent)?;
        let sent = self.client.send_quote(quote.id).await?;
        tracing::info!("quote {} sent", quote.id);
        self.invalidate(quote.id);
        Ok(sent)
    }

    /// sent → approved; the server creates the contract
    pub async fn approve(&self, quote: &Quote, signer: &str) -> Result<QuoteApproval, QuoteFlowError> {
        Self::check_transition(quote.status, QuoteStatus::Approved)?;
        let signer = signer.trim();
        if signer.is_empty() {
            return Err(QuoteFlowError::MissingSigner);
        }
        let approval = self.client.approve_quote(quote.id, signer).await?;
        tracing::info!("quote {} approved by {}, contract {}", quote.id, signer, approval.contract.id);
        self.invalidate(quote.id);
        Ok(approval)
    }

    fn check_transition(from: QuoteStatus, to: QuoteStatus) -> Result<(), QuoteFlowError> {
        if from.can_transition_to(to) {
            Ok(())
        } else {
            Err(QuoteFlowError::InvalidTransition {
                from: from.as_str(),
                to: to.as_str(),
            })
        }
    }

    fn invalidate(&self, quote_id: Uuid) {
        let cache = self.client.cache();
        cache.invalidate(&CacheKey::quote(quote_id));
        cache.invalidate(&CacheKey::quote_items(quote_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ResponseCache;
    use crate::client::Method;
    use crate::models::{Contract, ContractStatus};
    use crate::testing::MockTransport;
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;

    fn quote(status: QuoteStatus) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            job_id: Uuid::new_v4(),
            title: "Deck rebuild".to_string(),
            status,
            sent_at: None,
            approved_at: None,
            approved_by: None,
            created_at: Utc::now(),
        }
    }

    fn flow(mock: &Arc<MockTransport>) -> QuoteFlow {
        QuoteFlow::new(ApiClient::new(mock.clone(), Arc::new(ResponseCache::new())))
    }

    #[tokio::test]
    async fn approving_a_draft_is_rejected_locally() {
        let mock = Arc::new(MockTransport::new());
        let err = flow(&mock).approve(&quote(QuoteStatus::Draft), "Dana").await.unwrap_err();
        assert!(matches!(err, QuoteFlowError::InvalidTransition { from: "draft", to: "approved" }));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn resending_is_rejected_locally() {
        let mock = Arc::new(MockTransport::new());
        let err = flow(&mock).send(&quote(QuoteStatus::Sent)).await.unwrap_err();
        assert!(matches!(err, QuoteFlowError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn approval_returns_contract_and_invalidates_quote() {
        let mock = Arc::new(MockTransport::new());
        let q = quote(QuoteStatus::Sent);
        let mut approved = q.clone();
        approved.status = QuoteStatus::Approved;
        approved.approved_by = Some("Dana Whitfield".to_string());
        let contract = Contract {
            id: Uuid::new_v4(),
            job_id: q.job_id,
            quote_id: q.id,
            status: ContractStatus::Pending,
            signed_by: None,
            signed_at: None,
            created_at: Utc::now(),
        };
        mock.respond(
            Method::Post,
            &format!("/api/quotes/{}/approve", q.id),
            json!({"quote": approved, "contract": contract}),
        );
        let flow = flow(&mock);
        flow.client.cache().store(CacheKey::quote(q.id), &q);

        let approval = flow.approve(&q, " Dana Whitfield ").await.unwrap();
        assert_eq!(approval.contract.quote_id, q.id);
        assert_eq!(approval.quote.status, QuoteStatus::Approved);
        assert!(!flow.client.cache().contains(&CacheKey::quote(q.id)));

        let body = mock.calls()[0].body.clone().unwrap();
        assert_eq!(body["signer"], "Dana Whitfield");
    }

    #[tokio::test]
    async fn approval_needs_signer() {
        let mock = Arc::new(MockTransport::new());
        let err = flow(&mock).approve(&quote(QuoteStatus::Sent), "  ").await.unwrap_err();
        assert!(matches!(err, QuoteFlowError::MissingSigner));
    }

    #[tokio::test]
    async fn load_fetches_quote_and_items() {
        let mock = Arc::new(MockTransport::new());
        let q = quote(QuoteStatus::Draft);
        mock.respond(Method::Get, &format!("/api/quotes/{}", q.id), json!(q));
        mock.respond(
            Method::Get,
            &format!("/api/quotes/{}/items", q.id),
            json!([{"id": Uuid::new_v4(), "description": "Joists", "quantity": "4", "unit_price": "12.50"}]),
        );

        let detail = flow(&mock).load(q.id).await.unwrap();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.total(), Decimal::from(50));
    }

    #[tokio::test]
    async fn sent_quotes_are_not_editable() {
        let mock = Arc::new(MockTransport::new());
        let err = flow(&mock)
            .update(&quote(QuoteStatus::Sent), &UpdateQuote::default())
            .await
            .unwrap_err();
        assert!(matches!(err, QuoteFlowError::NotEditable("sent")));
    }
}
