//! Test doubles for the client flows.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::{ApiRequest, ClientError, Method, Transport};
use crate::models::{Contact, Job, JobFile, JobStage};

/// Scripted transport that records every request it sees.
///
/// Unscripted routes answer 404.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), Result<Value, ClientError>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `data` (the envelope's data field)
    pub fn respond(&self, method: Method, path: &str, data: Value) {
        self.routes
            .lock()
            .unwrap()
            .insert((method, path.to_string()), Ok(data));
    }

    pub fn fail(&self, method: Method, path: &str, status: u16, message: &str) {
        self.routes.lock().unwrap().insert(
            (method, path.to_string()),
            Err(ClientError::request_failed(status, message, None)),
        );
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, method: Method, path: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.method == method && c.path == path)
            .count()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, ClientError> {
        let key = (request.method, request.path.clone());
        self.calls.lock().unwrap().push(request);
        match self.routes.lock().unwrap().get(&key) {
            Some(answer) => answer.clone(),
            None => Err(ClientError::request_failed(404, "not found", Some("NOT_FOUND".to_string()))),
        }
    }
}

pub fn contact(email: Option<&str>) -> Contact {
    Contact {
        id: uuid::Uuid::new_v4(),
        name: "Dana Whitfield".to_string(),
        email: email.map(str::to_string),
        phone: Some("555-0142".to_string()),
    }
}

pub fn job(contact_id: uuid::Uuid, stage: JobStage) -> Job {
    Job {
        id: uuid::Uuid::new_v4(),
        contact_id,
        title: "Kitchen remodel".to_string(),
        address: Some("14 Alder Lane".to_string()),
        stage,
        start_date: chrono::NaiveDate::from_ymd_opt(2026, 3, 2),
        end_date: None,
        created_at: chrono::Utc::now(),
    }
}

pub fn job_file(job_id: uuid::Uuid, filename: &str, mimetype: &str) -> JobFile {
    JobFile {
        id: uuid::Uuid::new_v4(),
        job_id,
        url: format!("blob:test/{}", filename),
        filename: filename.to_string(),
        label: filename.to_string(),
        mimetype: mimetype.to_string(),
        size: 2048,
        uploaded_at: chrono::Utc::now(),
    }
}
