use contractor_portal::config;
use contractor_portal::server::{self, AppState};
use contractor_portal::store::{SeedData, Store};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up PORTAL_TOKEN_SECRET, PORTAL_SEED_FILE, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config();
    tracing::info!("Starting contractor portal in {:?} mode", config.environment);

    if config.security.portal_token_secret.is_empty() {
        if contractor_portal::is_production!() {
            anyhow::bail!("PORTAL_TOKEN_SECRET must be set in production");
        }
        tracing::warn!("PORTAL_TOKEN_SECRET is not set; portal links will be refused");
    }

    let store = match &config.api.seed_file {
        Some(path) => {
            let store = Store::from_seed(SeedData::from_path(path)?)?;
            tracing::info!("Loaded seed data from {}", path.display());
            store
        }
        None => Store::new(),
    };

    let state = AppState::new(store, config.security.clone());
    let app = server::app(state, config);

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {}: {}", bind_addr, e))?;

    tracing::info!("Contractor portal listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
