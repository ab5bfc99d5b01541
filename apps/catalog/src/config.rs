use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use catalog_core::latency::{MAX_DELAY_MS, MIN_DELAY_MS};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub base_url: String,
    pub products_file: Option<PathBuf>,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub forward_logs: bool,
    pub rng_seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000".into(),
            products_file: None,
            min_delay_ms: MIN_DELAY_MS,
            max_delay_ms: MAX_DELAY_MS,
            forward_logs: true,
            rng_seed: None,
        }
    }
}

/// Defaults, then the config file, then the process environment.
///
/// An explicitly named config file must exist; the default `catalog.toml`
/// is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let settings = match config_path {
        Some(path) => read_config_file(path)?,
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            read_config_file(Path::new(DEFAULT_CONFIG_FILE))?
        }
        None => Settings::default(),
    };

    Ok(apply_env(settings, |key| std::env::var(key).ok()))
}

fn read_config_file(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse config file '{}'", path.display()))
}

fn apply_env(mut settings: Settings, var: impl Fn(&str) -> Option<String>) -> Settings {
    if let Some(v) = var("CATALOG_BASE_URL") {
        settings.base_url = v;
    }
    if let Some(v) = var("APP__BASE_URL") {
        settings.base_url = v;
    }

    if let Some(v) = var("APP__PRODUCTS_FILE") {
        settings.products_file = Some(PathBuf::from(v));
    }

    if let Some(parsed) = var("APP__MIN_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.min_delay_ms = parsed;
    }
    if let Some(parsed) = var("APP__MAX_DELAY_MS").and_then(|v| v.parse().ok()) {
        settings.max_delay_ms = parsed;
    }

    if let Some(v) = var("APP__FORWARD_LOGS") {
        settings.forward_logs = !matches!(
            v.trim().to_ascii_lowercase().as_str(),
            "0" | "false" | "no" | "off"
        );
    }

    if let Some(parsed) = var("APP__RNG_SEED").and_then(|v| v.parse().ok()) {
        settings.rng_seed = Some(parsed);
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
