use futures::try_join;

use super::payload::{PortalJobSummary, PortalPayload};
use crate::client::{ApiClient, ClientError};
use crate::models::Contact;

/// Why a portal token was turned away. Every reason is terminal for the page.
#[derive(Debug, Clone, PartialEq)]
pub enum DenialReason {
    MissingToken,
    InvalidToken,
    /// The server could not be reached or failed; there is no retry
    Unavailable(String),
}

impl DenialReason {
    /// Text shown to the visitor
    pub fn message(&self) -> &str {
        match self {
            DenialReason::MissingToken => "This portal link is incomplete.",
            DenialReason::InvalidToken => "This portal link is invalid or has expired.",
            DenialReason::Unavailable(_) => "The portal is unavailable right now. Please try again later.",
        }
    }
}

/// A verified portal visit. Lives only as long as the page that opened it.
#[derive(Debug, Clone, PartialEq)]
pub struct PortalSession {
    token: String,
    payload: PortalPayload,
}

impl PortalSession {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn payload(&self) -> &PortalPayload {
        &self.payload
    }

    pub fn into_payload(self) -> PortalPayload {
        self.payload
    }

    /// The session's contact and all of that contact's jobs, fetched together.
    pub async fn contact_jobs(&self, client: &ApiClient) -> Result<(Contact, Vec<PortalJobSummary>), ClientError> {
        try_join!(client.portal_me(&self.token), client.portal_jobs(&self.token))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PortalAccess {
    Granted(PortalSession),
    Denied(DenialReason),
}

impl PortalAccess {
    pub fn is_granted(&self) -> bool {
        matches!(self, PortalAccess::Granted(_))
    }
}

pub struct PortalGate {
    client: ApiClient,
}

impl PortalGate {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// One verification per page mount; no retry and no refresh.
    pub async fn verify(&self, token: &str) -> PortalAccess {
        let token = token.trim();
        if token.is_empty() {
            return PortalAccess::Denied(DenialReason::MissingToken);
        }
        // Tokens are URL-safe base64 segments joined by dots
        if !token.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')) {
            tracing::warn!("rejecting malformed portal token");
            return PortalAccess::Denied(DenialReason::InvalidToken);
        }

        match self.client.verify_portal_token(token).await {
            Ok(payload) => PortalAccess::Granted(PortalSession {
                token: token.to_string(),
                payload,
            }),
            Err(err) => match err.status() {
                Some(400) | Some(401) | Some(403) | Some(404) => {
                    tracing::warn!("portal token rejected: {}", err);
                    PortalAccess::Denied(DenialReason::InvalidToken)
                }
                _ => PortalAccess::Denied(DenialReason::Unavailable(err.to_string())),
            },
        }
    }
}
