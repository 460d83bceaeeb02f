use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDirection {
    Inbound,
    Outbound,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Message,
    Email,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub contact_id: Uuid,
    pub direction: MessageDirection,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Only set for emails
    #[serde(default)]
    pub subject: Option<String>,
    pub body: String,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/messages`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMessage {
    pub contact_id: Uuid,
    pub direction: MessageDirection,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub body: String,
}

/// Body of `POST /api/test-email`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEmailRequest {
    pub to: String,
}

/// Outbox entry recorded for a test email
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestEmailReceipt {
    pub to: String,
    pub subject: String,
    #[serde(default = "Utc::now")]
    pub sent_at: DateTime<Utc>,
}

/// Loose shape check: one `@`, non-empty local part, dotted domain
pub fn looks_like_email(address: &str) -> bool {
    let address = address.trim();
    match address.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !address.contains(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape_check() {
        assert!(looks_like_email("owner@example.com"));
        assert!(looks_like_email("  site.office@build.co.uk "));
        assert!(!looks_like_email("owner@"));
        assert!(!looks_like_email("@example.com"));
        assert!(!looks_like_email("owner@example"));
        assert!(!looks_like_email("a@b@c.com"));
        assert!(!looks_like_email("my name@example.com"));
    }

    #[test]
    fn message_kind_serializes_as_type() {
        let msg = NewMessage {
            contact_id: uuid::Uuid::nil(),
            direction: MessageDirection::Outbound,
            kind: MessageKind::Email,
            subject: Some("Schedule".to_string()),
            body: "See you Monday".to_string(),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "email");
        assert_eq!(value["direction"], "outbound");
    }
}
