//! Configuration loading from the process environment
//!
//! These tests mutate environment variables, so they run serially.

use pretty_assertions::assert_eq;
use serial_test::serial;
use std::io::Write;
use std::time::Duration;
use taskbeat::backend::server::config::{load_config, CONFIG_FILE_VAR};
use taskbeat::shared::{AppConfig, AppEnvironment};

const VARS: &[&str] = &[
    CONFIG_FILE_VAR,
    "APP_ENV",
    "SERVER_PORT",
    "ORIGIN",
    "JWT_PRIVATE_KEY_PATH",
    "JWT_PUBLIC_KEY_PATH",
    "WORKER_POOL_SIZE",
    "MAX_QUEUED_TASKS",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn empty_environment_gives_defaults() {
    clear_env();
    assert_eq!(load_config().unwrap(), AppConfig::default());
}

#[test]
#[serial]
fn reads_variables_and_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "app_name = \"taskbeat-ci\"\n[jwt]\ntoken_ttl_secs = 600").unwrap();

    std::env::set_var(CONFIG_FILE_VAR, file.path());
    std::env::set_var("APP_ENV", "test");
    std::env::set_var("WORKER_POOL_SIZE", "2");

    let config = load_config().unwrap();
    clear_env();

    assert_eq!(config.app_name, "taskbeat-ci");
    assert_eq!(config.environment, AppEnvironment::Test);
    assert_eq!(config.jwt.token_ttl, Duration::from_secs(600));
    assert_eq!(config.tasks.worker_count, 2);
}

#[test]
#[serial]
fn unknown_file_keys_are_rejected() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "database_url = \"postgres://\"").unwrap();
    std::env::set_var(CONFIG_FILE_VAR, file.path());

    let result = load_config();
    clear_env();
    assert!(result.is_err());
}
