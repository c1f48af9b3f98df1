use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Path of the redb database file holding both collection keys.
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogConfig {
    /// Default tracing filter when RUST_LOG is not set.
    pub filter: String,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Coded defaults so the app runs without any config file.
            .set_default("storage.path", "stockpad.redb")?
            .set_default("log.filter", "stockpad=info")?
            // Optional configuration files, lowest to highest precedence.
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `STOCKPAD_STORAGE__PATH=/tmp/s.redb` overrides the path.
            .add_source(config::Environment::with_prefix("STOCKPAD").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
