mod common;

use anyhow::Result;
use reqwest::StatusCode;
use rust_decimal::Decimal;

use common::{DECK_QUOTE, KITCHEN_QUOTE};
use contractor_portal::models::{ContractStatus, QuoteStatus, UpdateQuote};
use contractor_portal::quotes::{QuoteFlow, QuoteFlowError};

#[tokio::test]
async fn draft_quote_goes_through_send_and_approve() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.client();
    let flow = QuoteFlow::new(client.clone());

    let detail = flow.load(common::id(DECK_QUOTE)).await?;
    assert_eq!(detail.quote.status, QuoteStatus::Draft);
    assert_eq!(detail.total(), Decimal::new(464000, 2));

    let renamed = flow
        .update(
            &detail.quote,
            &UpdateQuote {
                title: Some("Deck and railing quote".to_string()),
                items: None,
            },
        )
        .await?;
    assert_eq!(renamed.title, "Deck and railing quote");

    let sent = flow.send(&renamed).await?;
    assert_eq!(sent.status, QuoteStatus::Sent);
    assert!(sent.sent_at.is_some());

    let approval = flow.approve(&sent, "Dana Whitfield").await?;
    assert_eq!(approval.quote.status, QuoteStatus::Approved);
    assert_eq!(approval.quote.approved_by.as_deref(), Some("Dana Whitfield"));
    assert_eq!(approval.contract.quote_id, sent.id);
    assert_eq!(approval.contract.status, ContractStatus::Pending);

    // Invalidated after approval, so a fresh load sees the new status
    assert_eq!(flow.load(sent.id).await?.quote.status, QuoteStatus::Approved);
    Ok(())
}

#[tokio::test]
async fn approved_quote_cannot_move_again() -> Result<()> {
    let server = common::start_server().await?;
    let client = server.client();
    let flow = QuoteFlow::new(client.clone());

    let quote = client.quote(common::id(KITCHEN_QUOTE)).await?;
    assert!(matches!(
        flow.send(&quote).await,
        Err(QuoteFlowError::InvalidTransition { from: "approved", to: "sent" })
    ));
    assert!(matches!(
        flow.update(&quote, &UpdateQuote::default()).await,
        Err(QuoteFlowError::NotEditable("approved"))
    ));
    Ok(())
}

#[tokio::test]
async fn server_refuses_skipping_sent() -> Result<()> {
    let server = common::start_server().await?;

    let res = reqwest::Client::new()
        .post(server.url(&format!("/api/quotes/{}/approve", DECK_QUOTE)))
        .json(&serde_json::json!({ "signer": "Dana Whitfield" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "CONFLICT");
    Ok(())
}
