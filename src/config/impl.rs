use std::sync::{Arc, OnceLock};

use super::StaticConfig;

static CONFIG: OnceLock<Arc<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks.
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get()
        .cloned()
        .expect("Config not initialized. Call init_config() first.")
}

/// Initialize the global configuration
///
/// Only the first call takes effect; later calls return the already
/// installed configuration.
///
/// # Examples
/// ```no_run
/// use geoinfo::config::{StaticConfig, init_config};
/// init_config(StaticConfig::load(None));
/// ```
pub fn init_config(config: StaticConfig) -> Arc<StaticConfig> {
    CONFIG.get_or_init(|| Arc::new(config)).clone()
}
