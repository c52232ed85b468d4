//! Application configuration module
//!
//! Provides the immutable [`AppConfig`] built once at startup, a builder for
//! it and the TOML file format it can be read from.
//!
//! Values are layered: defaults, then an optional TOML file, then whatever
//! the server loader applies from the environment. `build()` validates the
//! result.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

/// Deployment environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    #[default]
    Dev,
    Test,
    Prod,
}

impl AppEnvironment {
    pub const fn as_str(self) -> &'static str {
        match self {
            AppEnvironment::Dev => "dev",
            AppEnvironment::Test => "test",
            AppEnvironment::Prod => "prod",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            AppEnvironment::Dev => "Development environment",
            AppEnvironment::Test => "Testing environment",
            AppEnvironment::Prod => "Production environment",
        }
    }
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dev" => Ok(AppEnvironment::Dev),
            "test" => Ok(AppEnvironment::Test),
            "prod" => Ok(AppEnvironment::Prod),
            other => Err(ConfigError::invalid("environment", format!("unknown environment '{}'", other))),
        }
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// RS256 signing settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwtSettings {
    /// PEM-encoded RSA private key used to issue tokens
    pub private_key_path: PathBuf,
    /// PEM-encoded RSA public key used to verify tokens
    pub public_key_path: PathBuf,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            private_key_path: PathBuf::from("keys/private.pem"),
            public_key_path: PathBuf::from("keys/public.pem"),
            token_ttl: Duration::from_secs(30 * 60),
        }
    }
}

/// Task dispatcher settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSettings {
    /// Number of worker-pool threads running CPU-bound work concurrently
    pub worker_count: usize,
    /// Maximum number of worker-pool jobs waiting for a free worker.
    /// `None` queues without limit.
    pub max_queued: Option<usize>,
    /// Identifier candidates tried before giving up on a submission
    pub allocation_attempts: u32,
    /// Duration of the simulated I/O-bound work unit
    pub io_work_duration: Duration,
    /// Duration of the simulated CPU-bound work unit
    pub cpu_work_duration: Duration,
    /// Age after which an unread terminal record is dropped
    pub terminal_retention: Duration,
    /// How often the retention sweep runs
    pub retention_sweep_interval: Duration,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            worker_count: 4,
            max_queued: None,
            allocation_attempts: 3,
            io_work_duration: Duration::from_secs(10),
            cpu_work_duration: Duration::from_secs(10),
            terminal_retention: Duration::from_secs(60 * 60),
            retention_sweep_interval: Duration::from_secs(5 * 60),
        }
    }
}

/// WebSocket heartbeat settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeepaliveSettings {
    /// Silence after which a session is closed
    pub timeout: Duration,
    /// Upper bound on how long the session loop waits for a frame before
    /// re-checking the deadline
    pub poll_interval: Duration,
}

impl Default for KeepaliveSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub app_name: String,
    pub environment: AppEnvironment,
    pub server_port: u16,
    /// CORS origins; `*` allows any origin
    pub allowed_origins: Vec<String>,
    pub jwt: JwtSettings,
    pub tasks: TaskSettings,
    pub keepalive: KeepaliveSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: "taskbeat".to_string(),
            environment: AppEnvironment::default(),
            server_port: 3000,
            allowed_origins: vec!["*".to_string()],
            jwt: JwtSettings::default(),
            tasks: TaskSettings::default(),
            keepalive: KeepaliveSettings::default(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder seeded with defaults
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tasks.worker_count == 0 {
            return Err(ConfigError::invalid("tasks.worker_count", "must be at least 1"));
        }
        if self.tasks.allocation_attempts == 0 {
            return Err(ConfigError::invalid("tasks.allocation_attempts", "must be at least 1"));
        }
        if self.keepalive.poll_interval.is_zero() {
            return Err(ConfigError::invalid("keepalive.poll_interval", "must be positive"));
        }
        if self.keepalive.poll_interval > self.keepalive.timeout {
            return Err(ConfigError::invalid(
                "keepalive.poll_interval",
                "must not exceed keepalive.timeout",
            ));
        }
        if self.jwt.token_ttl.is_zero() {
            return Err(ConfigError::invalid("jwt.token_ttl", "must be positive"));
        }
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::MissingValue("allowed_origins"));
        }
        Ok(())
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.config.app_name = name.into();
        self
    }

    pub fn environment(mut self, environment: AppEnvironment) -> Self {
        self.config.environment = environment;
        self
    }

    pub fn server_port(mut self, port: u16) -> Self {
        self.config.server_port = port;
        self
    }

    /// Set CORS origins from a comma-separated list
    pub fn allowed_origins(mut self, origins: &str) -> Self {
        self.config.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();
        self
    }

    pub fn jwt_key_paths(mut self, private_key: impl Into<PathBuf>, public_key: impl Into<PathBuf>) -> Self {
        self.config.jwt.private_key_path = private_key.into();
        self.config.jwt.public_key_path = public_key.into();
        self
    }

    pub fn token_ttl(mut self, ttl: Duration) -> Self {
        self.config.jwt.token_ttl = ttl;
        self
    }

    pub fn worker_count(mut self, workers: usize) -> Self {
        self.config.tasks.worker_count = workers;
        self
    }

    pub fn max_queued(mut self, max_queued: Option<usize>) -> Self {
        self.config.tasks.max_queued = max_queued;
        self
    }

    pub fn allocation_attempts(mut self, attempts: u32) -> Self {
        self.config.tasks.allocation_attempts = attempts;
        self
    }

    /// Set the durations of the simulated I/O-bound and CPU-bound work units
    pub fn work_durations(mut self, io: Duration, cpu: Duration) -> Self {
        self.config.tasks.io_work_duration = io;
        self.config.tasks.cpu_work_duration = cpu;
        self
    }

    pub fn terminal_retention(mut self, retention: Duration, sweep_interval: Duration) -> Self {
        self.config.tasks.terminal_retention = retention;
        self.config.tasks.retention_sweep_interval = sweep_interval;
        self
    }

    pub fn keepalive(mut self, timeout: Duration, poll_interval: Duration) -> Self {
        self.config.keepalive.timeout = timeout;
        self.config.keepalive.poll_interval = poll_interval;
        self
    }

    /// Overlay values present in a TOML document
    pub fn apply_toml(mut self, text: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;
        file.apply(&mut self.config);
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// On-disk configuration; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    app_name: Option<String>,
    environment: Option<AppEnvironment>,
    server_port: Option<u16>,
    allowed_origins: Option<Vec<String>>,
    #[serde(default)]
    jwt: FileJwt,
    #[serde(default)]
    tasks: FileTasks,
    #[serde(default)]
    keepalive: FileKeepalive,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileJwt {
    private_key_path: Option<PathBuf>,
    public_key_path: Option<PathBuf>,
    token_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileTasks {
    worker_count: Option<usize>,
    max_queued: Option<usize>,
    allocation_attempts: Option<u32>,
    io_work_secs: Option<u64>,
    cpu_work_secs: Option<u64>,
    terminal_retention_secs: Option<u64>,
    retention_sweep_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileKeepalive {
    timeout_secs: Option<u64>,
    poll_interval_ms: Option<u64>,
}

impl FileConfig {
    fn apply(self, config: &mut AppConfig) {
        if let Some(name) = self.app_name {
            config.app_name = name;
        }
        if let Some(environment) = self.environment {
            config.environment = environment;
        }
        if let Some(port) = self.server_port {
            config.server_port = port;
        }
        if let Some(origins) = self.allowed_origins {
            config.allowed_origins = origins;
        }

        let jwt = &mut config.jwt;
        if let Some(path) = self.jwt.private_key_path {
            jwt.private_key_path = path;
        }
        if let Some(path) = self.jwt.public_key_path {
            jwt.public_key_path = path;
        }
        if let Some(secs) = self.jwt.token_ttl_secs {
            jwt.token_ttl = Duration::from_secs(secs);
        }

        let tasks = &mut config.tasks;
        if let Some(workers) = self.tasks.worker_count {
            tasks.worker_count = workers;
        }
        if self.tasks.max_queued.is_some() {
            tasks.max_queued = self.tasks.max_queued;
        }
        if let Some(attempts) = self.tasks.allocation_attempts {
            tasks.allocation_attempts = attempts;
        }
        if let Some(secs) = self.tasks.io_work_secs {
            tasks.io_work_duration = Duration::from_secs(secs);
        }
        if let Some(secs) = self.tasks.cpu_work_secs {
            tasks.cpu_work_duration = Duration::from_secs(secs);
        }
        if let Some(secs) = self.tasks.terminal_retention_secs {
            tasks.terminal_retention = Duration::from_secs(secs);
        }
        if let Some(secs) = self.tasks.retention_sweep_secs {
            tasks.retention_sweep_interval = Duration::from_secs(secs);
        }

        if let Some(secs) = self.keepalive.timeout_secs {
            config.keepalive.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = self.keepalive.poll_interval_ms {
            config.keepalive.poll_interval = Duration::from_millis(ms);
        }
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_reference_behavior() {
        let config = AppConfig::default();
        assert_eq!(config.tasks.worker_count, 4);
        assert_eq!(config.tasks.allocation_attempts, 3);
        assert_eq!(config.tasks.max_queued, None);
        assert_eq!(config.keepalive.timeout, Duration::from_secs(60));
        assert_eq!(config.keepalive.poll_interval, Duration::from_secs(1));
        assert_eq!(config.jwt.token_ttl, Duration::from_secs(1800));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_splits_origins() {
        let config = AppConfig::builder()
            .allowed_origins("http://a.test, http://b.test,,")
            .build()
            .unwrap();
        assert_eq!(config.allowed_origins, vec!["http://a.test", "http://b.test"]);
    }

    #[test]
    fn zero_workers_rejected() {
        let err = AppConfig::builder().worker_count(0).build().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "tasks.worker_count", .. }));
    }

    #[test]
    fn poll_interval_must_fit_in_timeout() {
        let err = AppConfig::builder()
            .keepalive(Duration::from_secs(1), Duration::from_secs(2))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field: "keepalive.poll_interval", .. }));
    }

    #[test]
    fn toml_overlay() {
        let text = r#"
            environment = "prod"
            server_port = 8080

            [tasks]
            worker_count = 8
            max_queued = 16

            [keepalive]
            timeout_secs = 30
            poll_interval_ms = 250
        "#;
        let config = AppConfig::builder().apply_toml(text).unwrap().build().unwrap();
        assert_eq!(config.environment, AppEnvironment::Prod);
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.tasks.worker_count, 8);
        assert_eq!(config.tasks.max_queued, Some(16));
        assert_eq!(config.keepalive.timeout, Duration::from_secs(30));
        assert_eq!(config.keepalive.poll_interval, Duration::from_millis(250));
        // untouched sections keep defaults
        assert_eq!(config.jwt, JwtSettings::default());
    }

    #[test]
    fn toml_unknown_field_is_an_error() {
        let result = AppConfig::builder().apply_toml("workers = 3");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn environment_parsing() {
        assert_eq!("PROD".parse::<AppEnvironment>().unwrap(), AppEnvironment::Prod);
        assert_eq!(AppEnvironment::Test.description(), "Testing environment");
        assert!("staging".parse::<AppEnvironment>().is_err());
    }
}
