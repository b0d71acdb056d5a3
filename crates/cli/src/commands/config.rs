use std::env;
use std::fs;
use std::path::Path;

use cadastro_core::config::{resolve_config_path, AppConfig, LoadOptions};
use toml::Value;

use crate::commands::CommandResult;

struct ConfigKey {
    path: &'static str,
    /// Checked in order; the first one set wins, matching the loader.
    env_keys: &'static [&'static str],
}

const KEYS: [ConfigKey; 8] = [
    ConfigKey { path: "database.url", env_keys: &["CADASTRO_DATABASE_URL"] },
    ConfigKey {
        path: "database.max_connections",
        env_keys: &["CADASTRO_DATABASE_MAX_CONNECTIONS"],
    },
    ConfigKey { path: "database.timeout_secs", env_keys: &["CADASTRO_DATABASE_TIMEOUT_SECS"] },
    ConfigKey { path: "server.bind_address", env_keys: &["CADASTRO_SERVER_BIND_ADDRESS"] },
    ConfigKey { path: "server.port", env_keys: &["CADASTRO_SERVER_PORT", "PORT"] },
    ConfigKey {
        path: "server.frontend_url",
        env_keys: &["CADASTRO_SERVER_FRONTEND_URL", "FRONTEND_URL"],
    },
    ConfigKey { path: "logging.level", env_keys: &["CADASTRO_LOGGING_LEVEL", "CADASTRO_LOG_LEVEL"] },
    ConfigKey {
        path: "logging.format",
        env_keys: &["CADASTRO_LOGGING_FORMAT", "CADASTRO_LOG_FORMAT"],
    },
];

pub fn run() -> CommandResult {
    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => config,
        Err(error) => {
            return CommandResult {
                exit_code: 2,
                output: format!("config validation failed: {error}"),
            };
        }
    };

    CommandResult { exit_code: 0, output: render(&config) }
}

fn render(config: &AppConfig) -> String {
    let config_file_path = resolve_config_path(None);
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    for key in &KEYS {
        lines.push(render_line(
            key.path,
            &value_of(config, key.path),
            field_source(key, config_file_doc.as_ref(), config_file_path.as_deref()),
        ));
    }

    lines.join("\n")
}

fn value_of(config: &AppConfig, path: &str) -> String {
    match path {
        "database.url" => config.database.url.clone(),
        "database.max_connections" => config.database.max_connections.to_string(),
        "database.timeout_secs" => config.database.timeout_secs.to_string(),
        "server.bind_address" => config.server.bind_address.clone(),
        "server.port" => config.server.port.to_string(),
        "server.frontend_url" => config.server.frontend_url.clone(),
        "logging.level" => config.logging.level.clone(),
        "logging.format" => format!("{:?}", config.logging.format).to_lowercase(),
        _ => "<unknown>".to_string(),
    }
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key: &ConfigKey,
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = key.env_keys.iter().find(|env_key| env::var_os(env_key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key.path) {
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

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}
