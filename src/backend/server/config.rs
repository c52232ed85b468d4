/**
 * Server Configuration
 *
 * Builds the `AppConfig` the server starts with.
 *
 * # Configuration Sources
 *
 * In increasing precedence:
 * 1. Built-in defaults
 * 2. The TOML file named by `TASKBEAT_CONFIG`, if set
 * 3. Environment variables (a `.env` file is loaded by the binary first):
 *    - `APP_ENV` - `dev`, `test` or `prod`
 *    - `SERVER_PORT` - listen port
 *    - `ORIGIN` - comma-separated CORS origins, `*` for any
 *    - `JWT_PRIVATE_KEY_PATH`, `JWT_PUBLIC_KEY_PATH` - PEM key files
 *    - `WORKER_POOL_SIZE` - worker pool threads
 *    - `MAX_QUEUED_TASKS` - worker pool queue bound (`unbounded` or empty for none)
 *
 * # Error Handling
 *
 * Unlike optional services, a bad configuration value stops startup: every
 * parse or validation failure is returned as a `ConfigError`.
 */

use std::path::PathBuf;
use std::str::FromStr;

use crate::shared::{AppConfig, AppConfigBuilder, AppEnvironment, ConfigError};

/// Environment variable naming the optional TOML file
pub const CONFIG_FILE_VAR: &str = "TASKBEAT_CONFIG";

/// Load configuration from the process environment
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_with(|key| std::env::var(key).ok())
}

/// Load configuration using `lookup` in place of the process environment
pub fn load_config_with<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut builder = AppConfig::builder();

    if let Some(path) = lookup(CONFIG_FILE_VAR).filter(|p| !p.trim().is_empty()) {
        let path = PathBuf::from(path);
        let text = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
            path: path.clone(),
            source,
        })?;
        builder = builder.apply_toml(&text)?;
        tracing::info!("[Startup] Loaded configuration file {}", path.display());
    }

    let config = apply_env(builder, &lookup)?.build()?;
    tracing::info!(
        "[Startup] {} ({}) on port {} with {} workers",
        config.app_name,
        config.environment.description(),
        config.server_port,
        config.tasks.worker_count
    );
    Ok(config)
}

fn apply_env<F>(mut builder: AppConfigBuilder, lookup: &F) -> Result<AppConfigBuilder, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("APP_ENV") {
        builder = builder.environment(AppEnvironment::from_str(&value)?);
    }
    if let Some(value) = lookup("SERVER_PORT") {
        builder = builder.server_port(parse("SERVER_PORT", &value)?);
    }
    if let Some(value) = lookup("ORIGIN") {
        builder = builder.allowed_origins(&value);
    }

    let private_key = lookup("JWT_PRIVATE_KEY_PATH");
    let public_key = lookup("JWT_PUBLIC_KEY_PATH");
    if private_key.is_some() || public_key.is_some() {
        let defaults = AppConfig::default().jwt;
        builder = builder.jwt_key_paths(
            private_key.map(PathBuf::from).unwrap_or(defaults.private_key_path),
            public_key.map(PathBuf::from).unwrap_or(defaults.public_key_path),
        );
    }

    if let Some(value) = lookup("WORKER_POOL_SIZE") {
        builder = builder.worker_count(parse("WORKER_POOL_SIZE", &value)?);
    }
    if let Some(value) = lookup("MAX_QUEUED_TASKS") {
        let value = value.trim();
        let bound = if value.is_empty() || value.eq_ignore_ascii_case("unbounded") {
            None
        } else {
            Some(parse("MAX_QUEUED_TASKS", value)?)
        };
        builder = builder.max_queued(bound);
    }

    Ok(builder)
}

fn parse<T>(field: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::invalid(field, format!("'{}': {}", value, e)))
}
