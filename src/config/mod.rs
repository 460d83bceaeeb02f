use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub storage: StorageConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
    pub max_request_size_bytes: usize,
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub portal_token_secret: String,
    pub portal_token_expiry_hours: u64,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    /// Transient object URLs; nothing leaves the process
    Placeholder,
    /// Files under `root_dir`, served by the server at the path of
    /// `public_base_url`. Writers must share `root_dir` with the server.
    Filesystem,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackendKind,
    pub root_dir: PathBuf,
    pub public_base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // API overrides
        if let Ok(v) = env::var("PORTAL_API_PORT").or_else(|_| env::var("PORT")) {
            self.api.port = v.parse().unwrap_or(self.api.port);
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = v.parse().unwrap_or(self.api.max_request_size_bytes);
        }
        if let Ok(v) = env::var("PORTAL_SEED_FILE") {
            self.api.seed_file = Some(PathBuf::from(v));
        }

        // Security overrides
        if let Ok(v) = env::var("PORTAL_TOKEN_SECRET") {
            self.security.portal_token_secret = v;
        }
        if let Ok(v) = env::var("PORTAL_TOKEN_EXPIRY_HOURS") {
            self.security.portal_token_expiry_hours = v.parse().unwrap_or(self.security.portal_token_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Storage overrides
        if let Ok(v) = env::var("STORAGE_BACKEND") {
            match v.as_str() {
                "filesystem" | "fs" => self.storage.backend = StorageBackendKind::Filesystem,
                "placeholder" => self.storage.backend = StorageBackendKind::Placeholder,
                other => tracing::warn!("Unknown STORAGE_BACKEND '{}', keeping {:?}", other, self.storage.backend),
            }
        }
        if let Ok(v) = env::var("STORAGE_ROOT_DIR") {
            self.storage.root_dir = PathBuf::from(v);
        }
        if let Ok(v) = env::var("STORAGE_PUBLIC_BASE_URL") {
            self.storage.public_base_url = v;
        }

        // Client overrides
        if let Ok(v) = env::var("PORTAL_API_URL") {
            self.client.base_url = v;
        }
        if let Ok(v) = env::var("PORTAL_CLIENT_TIMEOUT_SECS") {
            self.client.timeout_secs = v.parse().unwrap_or(self.client.timeout_secs);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 25 * 1024 * 1024, // 25MB, photos
                seed_file: None,
            },
            security: SecurityConfig {
                portal_token_secret: "development-portal-secret".to_string(),
                portal_token_expiry_hours: 24 * 30,
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            storage: StorageConfig {
                backend: StorageBackendKind::Placeholder,
                root_dir: PathBuf::from("./uploads"),
                public_base_url: "http://localhost:3000/uploads".to_string(),
            },
            client: ClientConfig {
                base_url: "http://localhost:3000".to_string(),
                timeout_secs: 30,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                seed_file: None,
            },
            security: SecurityConfig {
                portal_token_secret: String::new(),
                portal_token_expiry_hours: 24 * 7,
                enable_cors: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            storage: StorageConfig {
                backend: StorageBackendKind::Filesystem,
                root_dir: PathBuf::from("/var/lib/contractor-portal/uploads"),
                public_base_url: "https://staging.example.com/uploads".to_string(),
            },
            client: ClientConfig {
                base_url: "https://staging.example.com".to_string(),
                timeout_secs: 30,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
                max_request_size_bytes: 10 * 1024 * 1024, // 10MB
                seed_file: None,
            },
            security: SecurityConfig {
                portal_token_secret: String::new(),
                portal_token_expiry_hours: 24 * 7,
                enable_cors: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            storage: StorageConfig {
                backend: StorageBackendKind::Filesystem,
                root_dir: PathBuf::from("/var/lib/contractor-portal/uploads"),
                public_base_url: "https://app.example.com/uploads".to_string(),
            },
            client: ClientConfig {
                base_url: "https://app.example.com".to_string(),
                timeout_secs: 15,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
