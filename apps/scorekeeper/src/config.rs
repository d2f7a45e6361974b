use std::{fs, path::Path};

use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "scorekeeper.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub store_timeout_ms: u64,
    pub max_connections: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/scorekeeper.db".into(),
            store_timeout_ms: 30_000,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    database_url: Option<String>,
    store_timeout_ms: Option<u64>,
    max_connections: Option<u32>,
}

pub fn load_settings(config_path: &Path) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    if config_path.exists() {
        let raw = fs::read_to_string(config_path)
            .with_context(|| format!("failed to read '{}'", config_path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", config_path.display()))?;
    }

    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;
    if let Some(v) = file_cfg.database_url {
        settings.database_url = v;
    }
    if let Some(v) = file_cfg.store_timeout_ms {
        settings.store_timeout_ms = v;
    }
    if let Some(v) = file_cfg.max_connections {
        settings.max_connections = v;
    }
    Ok(())
}

fn apply_env(settings: &mut Settings, var: impl Fn(&str) -> Option<String>) {
    if let Some(v) = var("SCOREKEEPER_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = var("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = var("APP__STORE_TIMEOUT_MS") {
        match v.parse::<u64>() {
            Ok(parsed) => settings.store_timeout_ms = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__STORE_TIMEOUT_MS"),
        }
    }

    if let Some(v) = var("APP__MAX_CONNECTIONS") {
        match v.parse::<u32>() {
            Ok(parsed) => settings.max_connections = parsed,
            Err(_) => tracing::warn!(value = %v, "ignoring invalid APP__MAX_CONNECTIONS"),
        }
    }
}

/// Turns a plain path or `sqlite:` path into a `sqlite://` url. Directories are
/// created by [`storage::Storage`] when the database is opened.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw = raw_database_url.trim();
    if raw.is_empty() {
        return Settings::default().database_url;
    }
    if raw.starts_with("sqlite::memory:") || raw.contains("://") {
        return raw.to_string();
    }

    let path = raw.strip_prefix("sqlite:").unwrap_or(raw);
    format!("sqlite://{}", path.replace('\\', "/"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
