use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use url::Url;

use crate::config::{AppConfig, SecurityConfig, StorageBackendKind, StorageConfig};
use crate::handlers;
use crate::store::Store;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub security: Arc<SecurityConfig>,
}

impl AppState {
    pub fn new(store: Store, security: SecurityConfig) -> Self {
        Self {
            store: Arc::new(store),
            security: Arc::new(security),
        }
    }
}

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let api = &config.api;
    let mut router = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(file_routes())
        .merge(message_routes())
        .merge(quote_routes())
        .merge(portal_routes())
        .route("/api/test-email", post(handlers::email::test_email))
        .with_state(state.clone())
        .layer(DefaultBodyLimit::max(api.max_request_size_bytes));

    if let Some(mount) = upload_mount(&config.storage) {
        tracing::info!("serving {} at {}", config.storage.root_dir.display(), mount);
        router = router.nest_service(&mount, ServeDir::new(&config.storage.root_dir));
    }

    if state.security.enable_cors {
        router = router.layer(cors_layer(&state.security));
    }
    if api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }
    router
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!("ignoring invalid CORS origin '{}'", o);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
    }
}

/// Path under which filesystem uploads are served, taken from the public base URL
fn upload_mount(storage: &StorageConfig) -> Option<String> {
    if storage.backend != StorageBackendKind::Filesystem {
        return None;
    }
    let path = match Url::parse(&storage.public_base_url) {
        Ok(url) => url.path().trim_end_matches('/').to_string(),
        Err(e) => {
            tracing::warn!("invalid STORAGE_PUBLIC_BASE_URL '{}': {}", storage.public_base_url, e);
            return None;
        }
    };
    if path.is_empty() {
        tracing::warn!("STORAGE_PUBLIC_BASE_URL has no path; uploads are not served");
        return None;
    }
    Some(path)
}

fn file_routes() -> Router<AppState> {
    use axum::routing::delete;
    use handlers::files;

    Router::new()
        .route("/api/jobs/:id/files", get(files::list_for_job))
        .route("/api/files", post(files::create))
        .route("/api/files/:id", delete(files::delete))
}

fn message_routes() -> Router<AppState> {
    use handlers::{contacts, messages};

    Router::new()
        .route("/api/messages", get(messages::list).post(messages::create))
        .route("/api/contacts/:id", get(contacts::get))
        .route("/api/contacts/:id/messages", get(messages::list_for_contact))
}

fn quote_routes() -> Router<AppState> {
    use handlers::quotes;

    Router::new()
        .route("/api/quotes/:id", get(quotes::get).post(quotes::update))
        .route("/api/quotes/:id/items", get(quotes::items))
        .route("/api/quotes/:id/send", post(quotes::send))
        .route("/api/quotes/:id/approve", post(quotes::approve))
}

fn portal_routes() -> Router<AppState> {
    use handlers::portal;

    Router::new()
        .route("/api/portal/verify/:token", get(portal::verify))
        .route("/api/portal/me", get(portal::me))
        .route("/api/portal/jobs", get(portal::jobs))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Contractor Portal",
            "version": version,
            "endpoints": {
                "files": "/api/jobs/:id/files, /api/files[/:id]",
                "messages": "/api/messages, /api/contacts/:id/messages",
                "contacts": "/api/contacts/:id",
                "quotes": "/api/quotes/:id[/items|/send|/approve]",
                "portal": "/api/portal/verify/:token, /api/portal/me, /api/portal/jobs (portal token)",
                "email": "/api/test-email",
            }
        }
    }))
}

async fn health(State(state): State<AppState>) -> axum::response::Json<Value> {
    let now = chrono::Utc::now();
    let stats = state.store.stats().await;

    axum::response::Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": now,
            "store": stats
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::auth::{issue_portal_token, PortalClaims};
    use crate::models::JobStage;
    use crate::testing;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn test_app() -> (Router, AppState) {
        let mut config = AppConfig::from_env();
        config.security.portal_token_secret = "server-test-secret".to_string();
        let state = AppState::new(Store::new(), config.security.clone());
        (app(state.clone(), &config), state)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn bad_portal_token_is_401() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/portal/verify/not.a.token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "INVALID_PORTAL_TOKEN");
    }

    #[tokio::test]
    async fn valid_portal_token_returns_six_field_payload() {
        let (app, state) = test_app().await;
        let contact = testing::contact(Some("dana@example.com"));
        let job = testing::job(contact.id, JobStage::InProgress);
        state.store.insert_contact(contact.clone()).await;
        state.store.insert_job(job.clone()).await.unwrap();

        let claims = PortalClaims::new(contact.id, job.id, 1);
        let token = issue_portal_token(&claims, &state.security.portal_token_secret).unwrap();

        let response = app
            .oneshot(
                Request::builder()
                    .uri(format!("/api/portal/verify/{}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let data = body_json(response).await["data"].clone();
        let mut keys: Vec<_> = data.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["contact", "contract", "files", "invoices", "job", "quote"]);
        assert_eq!(data["job"]["stage"], "in_progress");
        assert!(data["contract"].is_null());
    }

    #[tokio::test]
    async fn portal_jobs_require_bearer() {
        let (app, _) = test_app().await;
        let response = app
            .oneshot(Request::builder().uri("/api/portal/jobs").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn filesystem_uploads_are_served_at_public_path() {
        let root = std::env::temp_dir().join(format!("portal-served-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(root.join("plan.pdf"), b"%PDF-plan").unwrap();

        let mut config = AppConfig::from_env();
        config.storage = StorageConfig {
            backend: StorageBackendKind::Filesystem,
            root_dir: root.clone(),
            public_base_url: "https://portal.example.com/files/uploads/".to_string(),
        };
        let state = AppState::new(Store::new(), config.security.clone());
        let response = app(state, &config)
            .oneshot(Request::builder().uri("/files/uploads/plan.pdf").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"%PDF-plan");
        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn placeholder_storage_mounts_nothing() {
        let mut storage = AppConfig::from_env().storage;
        storage.backend = StorageBackendKind::Placeholder;
        assert_eq!(upload_mount(&storage), None);

        storage.backend = StorageBackendKind::Filesystem;
        storage.public_base_url = "http://localhost:3000/uploads/".to_string();
        assert_eq!(upload_mount(&storage).as_deref(), Some("/uploads"));
        storage.public_base_url = "http://localhost:3000".to_string();
        assert_eq!(upload_mount(&storage), None);
    }
}
