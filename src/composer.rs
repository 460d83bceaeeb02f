//! Drafting and sending messages and emails to a contact.

use thiserror::Error;

use crate::cache::CacheKey;
use crate::client::{ApiClient, ClientError};
use crate::models::{Contact, Message, MessageDirection, MessageKind, NewMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerMode {
    Message,
    Email,
}

#[derive(Debug, Error)]
pub enum ComposerError {
    #[error("Subject is required")]
    MissingSubject,

    #[error("Message body is required")]
    EmptyBody,

    #[error("{0} has no email address on file")]
    NoEmailAddress(String),

    #[error(transparent)]
    Request(#[from] ClientError),
}

impl ComposerError {
    /// Validation problems the user can fix by editing the draft
    pub fn is_validation(&self) -> bool {
        !matches!(self, ComposerError::Request(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Sent(Message),
    /// Nothing to send; no request was made
    Skipped,
}

/// A key press as seen by the composer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyPress {
    pub key: Key,
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Key {
    Enter,
    Escape,
    #[default]
    Other,
}

impl KeyPress {
    pub fn new(key: Key) -> Self {
        Self { key, ..Default::default() }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl+Enter, or Cmd+Enter on macOS
    pub fn is_submit(&self) -> bool {
        self.key == Key::Enter && (self.ctrl || self.meta)
    }
}

pub struct MessageComposer {
    client: ApiClient,
    contact: Contact,
    mode: Option<ComposerMode>,
    subject: String,
    body: String,
}

impl MessageComposer {
    pub fn new(client: ApiClient, contact: Contact) -> Self {
        Self {
            client,
            contact,
            mode: None,
            subject: String::new(),
            body: String::new(),
        }
    }

    pub fn contact(&self) -> &Contact {
        &self.contact
    }

    pub fn open(&mut self, mode: ComposerMode) {
        self.mode = Some(mode);
    }

    pub fn close(&mut self) {
        self.mode = None;
    }

    pub fn mode(&self) -> Option<ComposerMode> {
        self.mode
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Build the request for the active mode, or say why it can't be sent.
    ///
    /// `Ok(None)` means there is nothing to send: no dialog is open, or a
    /// plain message has an empty body.
    pub fn draft(&self) -> Result<Option<NewMessage>, ComposerError> {
        let body = self.body.trim();
        match self.mode {
            None => Ok(None),
            Some(ComposerMode::Message) => {
                if body.is_empty() {
                    return Ok(None);
                }
                Ok(Some(NewMessage {
                    contact_id: self.contact.id,
                    direction: MessageDirection::Outbound,
                    kind: MessageKind::Message,
                    subject: None,
                    body: body.to_string(),
                }))
            }
            Some(ComposerMode::Email) => {
                if self.contact.email_address().is_none() {
                    return Err(ComposerError::NoEmailAddress(self.contact.name.clone()));
                }
                let subject = self.subject.trim();
                if subject.is_empty() {
                    return Err(ComposerError::MissingSubject);
                }
                if body.is_empty() {
                    return Err(ComposerError::EmptyBody);
                }
                Ok(Some(NewMessage {
                    contact_id: self.contact.id,
                    direction: MessageDirection::Outbound,
                    kind: MessageKind::Email,
                    subject: Some(subject.to_string()),
                    body: body.to_string(),
                }))
            }
        }
    }

    pub async fn submit(&mut self) -> Result<SubmitOutcome, ComposerError> {
        let Some(draft) = self.draft()? else {
            return Ok(SubmitOutcome::Skipped);
        };

        let message = self.client.create_message(&draft).await?;
        tracing::info!("sent {:?} to contact {}", draft.kind, self.contact.id);

        let cache = self.client.cache();
        cache.invalidate(&CacheKey::contact_messages(self.contact.id));
        cache.invalidate(&CacheKey::messages());

        self.subject.clear();
        self.body.clear();
        Ok(SubmitOutcome::Sent(message))
    }

    /// Submit on Ctrl/Cmd+Enter. Returns `None` for every other key.
    pub async fn handle_key(&mut self, key: KeyPress) -> Option<Result<SubmitOutcome, ComposerError>> {
        if !key.is_submit() || self.mode.is_none() {
            return None;
        }
        Some(self.submit().await)
    }
}
