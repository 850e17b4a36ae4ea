use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use microhabit_core::config::{AppConfig, LoadOptions};
use toml::Value;

pub fn run() -> String {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let fields = [
        (
            "database.url",
            redact_database_url(&config.database.url),
            source("database.url", &["MICROHABIT_DATABASE_URL"]),
        ),
        (
            "database.max_connections",
            config.database.max_connections.to_string(),
            source("database.max_connections", &["MICROHABIT_DATABASE_MAX_CONNECTIONS"]),
        ),
        (
            "database.timeout_secs",
            config.database.timeout_secs.to_string(),
            source("database.timeout_secs", &["MICROHABIT_DATABASE_TIMEOUT_SECS"]),
        ),
        (
            "storage.enabled",
            config.storage.enabled.to_string(),
            source("storage.enabled", &["MICROHABIT_STORAGE_ENABLED"]),
        ),
        (
            "server.bind_address",
            config.server.bind_address.clone(),
            source("server.bind_address", &["MICROHABIT_SERVER_BIND_ADDRESS"]),
        ),
        (
            "server.port",
            config.server.port.to_string(),
            source("server.port", &["MICROHABIT_SERVER_PORT", "PORT"]),
        ),
        (
            "server.graceful_shutdown_secs",
            config.server.graceful_shutdown_secs.to_string(),
            source(
                "server.graceful_shutdown_secs",
                &["MICROHABIT_SERVER_GRACEFUL_SHUTDOWN_SECS"],
            ),
        ),
        (
            "history.default_limit",
            config.history.default_limit.to_string(),
            source("history.default_limit", &["MICROHABIT_HISTORY_DEFAULT_LIMIT"]),
        ),
        (
            "history.max_limit",
            config.history.max_limit.to_string(),
            source("history.max_limit", &["MICROHABIT_HISTORY_MAX_LIMIT"]),
        ),
        (
            "logging.level",
            config.logging.level.clone(),
            source("logging.level", &["MICROHABIT_LOGGING_LEVEL", "MICROHABIT_LOG_LEVEL"]),
        ),
        (
            "logging.format",
            format!("{:?}", config.logging.format),
            source("logging.format", &["MICROHABIT_LOGGING_FORMAT", "MICROHABIT_LOG_FORMAT"]),
        ),
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(fields.iter().map(|(key, value, source)| render_line(key, value, source)));
    lines.join("\n")
}

fn detect_config_path() -> Option<PathBuf> {
    ["microhabit.toml", "config/microhabit.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(**key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: &str) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Hides query parameters, which may carry credentials for some drivers.
fn redact_database_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{base}?<redacted>"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_url_query_is_redacted() {
        assert_eq!(redact_database_url("sqlite://habits.db"), "sqlite://habits.db");
        assert_eq!(
            redact_database_url("sqlite://habits.db?mode=rwc"),
            "sqlite://habits.db?<redacted>"
        );
    }

    #[test]
    fn nested_key_paths_are_resolved() {
        let doc: Value = "[server]\nport = 8080\n".parse().expect("valid toml");
        assert!(contains_path(&doc, "server.port"));
        assert!(!contains_path(&doc, "server.bind_address"));
        assert!(!contains_path(&doc, "history.max_limit"));
    }
}
