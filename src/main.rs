use std::sync::Arc;

use finch::api::HttpApi;
use finch::config::AppConfig;

/// Bundled config for packaged builds
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

fn load_dotenv() {
    // First try to load from a .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    // Fall back to the bundled config
    load_bundled_config();
}

fn load_bundled_config() {
    for line in BUNDLED_CONFIG.lines() {
        let line = line.trim();
        // Skip comments and empty lines
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        // Parse KEY=VALUE
        if let Some((key, value)) = line.split_once('=') {
            let key = key.trim();
            let value = value.trim();
            // Only set if not already set (allow env override)
            if std::env::var(key).is_err() {
                // SAFETY: We're setting env vars at startup before any threads are spawned
                unsafe {
                    std::env::set_var(key, value);
                }
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    load_dotenv();
    tracing_subscriber::fmt::init();

    let config = Arc::new(AppConfig::from_env());
    let api = Arc::new(HttpApi::new(&config.base_url)?);

    dioxus::LaunchBuilder::new()
        .with_context(config)
        .with_context(api)
        .launch(finch::ui::App);
    Ok(())
}
