#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use uuid::Uuid;

use contractor_portal::auth::{issue_portal_token, PortalClaims};
use contractor_portal::client::ApiClient;
use contractor_portal::config::AppConfig;
use contractor_portal::server::{self, AppState};
use contractor_portal::store::{SeedData, Store};

pub const SECRET: &str = "integration-test-secret";

// Ids from fixtures/demo.yaml
pub const DANA: &str = "6f1c1f7e-2d4b-4a51-9b0e-0c3a5e1d2f01";
pub const MARCUS: &str = "2a7b9c4d-1e3f-4a5b-8c6d-7e8f9a0b1c2d";
pub const KITCHEN_JOB: &str = "0b6a7a52-5d8e-4c1a-8f59-3e2b7c9d4a10";
pub const DECK_JOB: &str = "5c4d3e2f-1a0b-4c9d-8e7f-6a5b4c3d2e1f";
pub const BASEMENT_JOB: &str = "7e6f5a4b-3c2d-4e1f-9a8b-7c6d5e4f3a2b";
pub const KITCHEN_QUOTE: &str = "9d3e2c1b-7a6f-4e5d-8c9b-1a2b3c4d5e6f";
pub const DECK_QUOTE: &str = "4b5a6f7e-8d9c-4abb-8c3d-f4a5b6c7d8e9";

pub fn id(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("fixture id")
}

/// An in-process server seeded with the demo fixtures.
///
/// Each test gets its own server so mutations never leak between tests.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: AppState,
}

impl TestServer {
    async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::from_env();
        config.security.portal_token_secret = SECRET.to_string();
        config.api.enable_request_logging = false;

        let seed_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/demo.yaml");
        let store = Store::from_seed(SeedData::from_path(&seed_path)?)?;
        let state = AppState::new(store, config.security.clone());
        let app = server::app(state.clone(), &config);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind port {}", port))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { port, base_url, state })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Typed client with a fresh response cache
    pub fn client(&self) -> ApiClient {
        ApiClient::http(&self.base_url, Duration::from_secs(5)).expect("client")
    }

    pub fn token(&self, contact: &str, job: &str) -> String {
        let claims = PortalClaims::new(id(contact), id(job), 1);
        issue_portal_token(&claims, SECRET).expect("token")
    }
}

pub async fn start_server() -> Result<TestServer> {
    let server = TestServer::spawn().await?;
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}
