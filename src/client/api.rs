use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use super::error::ClientError;
use super::transport::{ApiRequest, HttpTransport, Transport};
use crate::cache::{CacheKey, ResponseCache};
use crate::config::ClientConfig;
use crate::models::{
    ApproveQuote, Contact, JobFile, Message, NewFile, NewMessage, Quote, QuoteApproval, QuoteItem,
    TestEmailReceipt, TestEmailRequest, UpdateQuote,
};
use crate::portal::{PortalJobSummary, PortalPayload};

/// Typed access to the REST endpoints.
///
/// Reads of cacheable resources go through the shared [`ResponseCache`];
/// mutations never touch the cache themselves, the flows that issue them
/// decide which keys to invalidate.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, cache: Arc<ResponseCache>) -> Self {
        Self { transport, cache }
    }

    /// HTTP client against `base_url` with its own cache
    pub fn http(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(base_url, timeout)?;
        Ok(Self::new(Arc::new(transport), Arc::new(ResponseCache::new())))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        Self::http(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        let method = request.method;
        let path = request.path.clone();
        let data = self.transport.send(request).await.map_err(|e| {
            tracing::error!("{} {} failed: {}", method, path, e);
            e
        })?;
        Ok(serde_json::from_value(data)?)
    }

    async fn get_cached<T: DeserializeOwned + Serialize>(&self, key: CacheKey) -> Result<T, ClientError> {
        if let Some(hit) = self.cache.read_as::<T>(&key) {
            return Ok(hit);
        }
        let value: T = self.send(ApiRequest::get(key.path())).await?;
        self.cache.store(key, &value);
        Ok(value)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: String, body: &B) -> Result<T, ClientError> {
        let body = serde_json::to_value(body)?;
        self.send(ApiRequest::post(path, body)).await
    }

    // Files

    pub async fn job_files(&self, job_id: Uuid) -> Result<Vec<JobFile>, ClientError> {
        self.get_cached(CacheKey::job_files(job_id)).await
    }

    pub async fn create_file(&self, file: &NewFile) -> Result<JobFile, ClientError> {
        self.post("/api/files".to_string(), file).await
    }

    pub async fn delete_file(&self, file_id: Uuid) -> Result<(), ClientError> {
        let _: Value = self.send(ApiRequest::delete(format!("/api/files/{}", file_id))).await?;
        Ok(())
    }

    // Contacts and messages

    pub async fn contact(&self, contact_id: Uuid) -> Result<Contact, ClientError> {
        self.get_cached(CacheKey::contact(contact_id)).await
    }

    pub async fn messages(&self) -> Result<Vec<Message>, ClientError> {
        self.get_cached(CacheKey::messages()).await
    }

    pub async fn contact_messages(&self, contact_id: Uuid) -> Result<Vec<Message>, ClientError> {
        self.get_cached(CacheKey::contact_messages(contact_id)).await
    }

    pub async fn create_message(&self, message: &NewMessage) -> Result<Message, ClientError> {
        self.post("/api/messages".to_string(), message).await
    }

    // Quotes

    pub async fn quote(&self, quote_id: Uuid) -> Result<Quote, ClientError> {
        self.get_cached(CacheKey::quote(quote_id)).await
    }

    pub async fn quote_items(&self, quote_id: Uuid) -> Result<Vec<QuoteItem>, ClientError> {
        self.get_cached(CacheKey::quote_items(quote_id)).await
    }

    pub async fn update_quote(&self, quote_id: Uuid, update: &UpdateQuote) -> Result<Quote, ClientError> {
        self.post(format!("/api/quotes/{}", quote_id), update).await
    }

    pub async fn send_quote(&self, quote_id: Uuid) -> Result<Quote, ClientError> {
        self.post(format!("/api/quotes/{}/send", quote_id), &Value::Null).await
    }

    pub async fn approve_quote(&self, quote_id: Uuid, signer: &str) -> Result<QuoteApproval, ClientError> {
        let body = ApproveQuote {
            signer: signer.to_string(),
        };
        self.post(format!("/api/quotes/{}/approve", quote_id), &body).await
    }

    // Portal

    /// One-shot token verification. Never cached: every page mount re-verifies.
    pub async fn verify_portal_token(&self, token: &str) -> Result<PortalPayload, ClientError> {
        self.send(ApiRequest::get(format!("/api/portal/verify/{}", token))).await
    }

    pub async fn portal_me(&self, token: &str) -> Result<Contact, ClientError> {
        self.send(ApiRequest::get("/api/portal/me").with_bearer(token)).await
    }

    pub async fn portal_jobs(&self, token: &str) -> Result<Vec<PortalJobSummary>, ClientError> {
        self.send(ApiRequest::get("/api/portal/jobs").with_bearer(token)).await
    }

    // Misc

    pub async fn send_test_email(&self, to: &str) -> Result<TestEmailReceipt, ClientError> {
        let body = TestEmailRequest { to: to.to_string() };
        self.post("/api/test-email".to_string(), &body).await
    }
}
