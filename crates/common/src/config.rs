//! Configuration management for the application.
//!
//! Settings are loaded from configuration files and environment variables into
//! a single [`AppConfig`].
//!
//! ## Example Configuration
//!
//! ```toml
//! [competition]
//! submissions_dir = "submissions"
//! allowed_extension = "csv"
//! max_users = 40
//! admin_username = "admin"
//! top_k = 10
//! evaluator = "total_score"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Metric columns averaged into the result of an upload when none are configured.
pub const DEFAULT_METRIC_KEYS: [&str; 5] = [
    "gpt_relevance",
    "gpt_groundedness",
    "gpt_similarity",
    "gpt_fluency",
    "ada_cosine_similarity",
];

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub competition: CompetitionConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,

    /// Serve Swagger UI at /swagger-ui
    #[serde(default = "default_true")]
    pub enable_swagger: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
            enable_swagger: true,
        }
    }
}

/// Competition rules and storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitionConfig {
    /// Root directory holding one subdirectory per participant
    #[serde(default = "default_submissions_dir")]
    pub submissions_dir: PathBuf,

    /// Extension uploads are stored with; `None` keeps them extensionless
    #[serde(default = "default_allowed_extension")]
    pub allowed_extension: Option<String>,

    /// Maximum number of participants; `None` for no limit
    #[serde(default)]
    pub max_users: Option<usize>,

    /// Privileged account: sees the full leaderboard and everyone's progress
    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    /// Leaderboard rows shown to non-admin viewers
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Evaluator variant used to score submissions
    #[serde(default = "default_evaluator")]
    pub evaluator: String,

    /// Metric columns averaged into an upload's result
    #[serde(default = "default_metric_keys")]
    pub metric_keys: Vec<String>,
}

impl Default for CompetitionConfig {
    fn default() -> Self {
        Self {
            submissions_dir: default_submissions_dir(),
            allowed_extension: default_allowed_extension(),
            max_users: None,
            admin_username: default_admin_username(),
            top_k: default_top_k(),
            evaluator: default_evaluator(),
            metric_keys: default_metric_keys(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret shared with the login provider for signing tokens
    pub jwt_secret: String,

    /// Token expiry duration in seconds
    #[serde(default = "default_token_expiry")]
    pub token_expiry_seconds: u64,
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Service name for tracing
    #[serde(default = "default_service_name")]
    pub service_name: String,

    /// Enable JSON logging format
    #[serde(default)]
    pub json_logging: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: default_service_name(),
            json_logging: false,
            log_level: default_log_level(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

fn default_submissions_dir() -> PathBuf {
    PathBuf::from("submissions")
}

fn default_allowed_extension() -> Option<String> {
    Some("csv".to_string())
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_top_k() -> usize {
    10
}

fn default_evaluator() -> String {
    "total_score".to_string()
}

fn default_metric_keys() -> Vec<String> {
    DEFAULT_METRIC_KEYS.iter().map(|key| key.to_string()).collect()
}

fn default_token_expiry() -> u64 {
    43200 // 12 hours
}

fn default_service_name() -> String {
    "challenge-leaderboard".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from environment variables and configuration files.
    ///
    /// The configuration is loaded in the following order (later sources override earlier ones):
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/{environment}.toml (if exists, where environment is from APP_ENV)
    /// 4. Environment variables (prefixed with APP_)
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use leaderboard_common::config::AppConfig;
    ///
    /// let config = AppConfig::load().expect("Failed to load configuration");
    /// println!("Submissions are stored in {}", config.competition.submissions_dir.display());
    /// ```
    pub fn load() -> Result<Self> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            // Example: APP_COMPETITION__TOP_K=5
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;

        Ok(app_config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("Server port must be greater than 0");
        }

        if self.server.request_timeout_seconds == 0 {
            anyhow::bail!("Request timeout must be greater than 0");
        }

        let competition = &self.competition;
        if competition.submissions_dir.as_os_str().is_empty() {
            anyhow::bail!("Submissions directory is required");
        }

        if let Some(ext) = &competition.allowed_extension {
            let ext = ext.trim_start_matches('.');
            if ext.eq_ignore_ascii_case("json") {
                anyhow::bail!("Allowed extension cannot be 'json': it is reserved for result files");
            }
            if ext.contains(|c| c == '/' || c == '\\') {
                anyhow::bail!("Allowed extension '{}' contains a path separator", ext);
            }
        }

        if competition.max_users == Some(0) {
            anyhow::bail!("max_users must be greater than 0 when set");
        }

        if competition.admin_username.trim().is_empty() {
            anyhow::bail!("Admin username is required");
        }

        if competition.metric_keys.is_empty() {
            anyhow::bail!("At least one metric key is required");
        }

        if self.auth.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret is required");
        }

        if self.auth.jwt_secret.len() < 32 {
            anyhow::bail!("JWT secret must be at least 32 characters long");
        }

        if self.auth.token_expiry_seconds == 0 {
            anyhow::bail!("Token expiry must be greater than 0");
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.telemetry.log_level.as_str()) {
            anyhow::bail!(
                "Invalid log level '{}'. Must be one of: {}",
                self.telemetry.log_level,
                valid_log_levels.join(", ")
            );
        }

        Ok(())
    }

    /// Get the token expiry as a Duration
    pub fn token_expiry(&self) -> Duration {
        Duration::from_secs(self.auth.token_expiry_seconds)
    }

    /// Get the request timeout as a Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_seconds)
    }

    /// Create a development configuration with sensible defaults
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                ..ServerConfig::default()
            },
            competition: CompetitionConfig::default(),
            auth: AuthConfig {
                jwt_secret: "development-secret-key-minimum-32-chars".to_string(),
                token_expiry_seconds: 86400, // 24 hours
            },
            telemetry: TelemetryConfig {
                log_level: "debug".to_string(),
                ..TelemetryConfig::default()
            },
        }
    }
}
