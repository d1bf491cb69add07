use shared_types::{AppConfig, FeatureFlags, ServerSettings};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `config.toml` and store it in the global `OnceLock`.
/// Safe to call multiple times; only the first call has effect.
///
/// If the file is missing or unparseable, all flags default to `false`.
pub fn load_config() {
    CONFIG.get_or_init(|| match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => {
            let config = parse_config(&contents);
            tracing::info!(features = ?config.features, "Loaded {CONFIG_PATH}");
            config
        }
        Err(e) => {
            tracing::warn!("{CONFIG_PATH} not found ({e}); optional features disabled");
            AppConfig::default()
        }
    });
}

fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        tracing::warn!("Failed to parse {CONFIG_PATH}: {e}; optional features disabled");
        AppConfig::default()
    })
}

fn config() -> &'static AppConfig {
    static DEFAULT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(AppConfig::default))
}

/// Get the loaded feature flags. Returns all-false defaults if
/// `load_config()` hasn't been called yet.
pub fn feature_flags() -> &'static FeatureFlags {
    &config().features
}

pub fn server_settings() -> &'static ServerSettings {
    &config().server
}

/// Listen address: `BIND_ADDR` overrides the config file.
pub fn bind_addr() -> String {
    std::env::var("BIND_ADDR")
        .ok()
        .filter(|addr| !addr.is_empty())
        .unwrap_or_else(|| server_settings().bind_addr.clone())
}
