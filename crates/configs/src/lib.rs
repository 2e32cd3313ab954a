//! Typed settings for bozor binaries.
//!
//! Layered sources, lowest priority first: built-in defaults, an optional
//! `config/default.toml` file, then environment variables prefixed with
//! `BOZOR` (e.g. `BOZOR__DATABASE__URL`). A `.env` file is honored via
//! dotenvy before the environment is read.

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub seed: SeedSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite URL, e.g. `sqlite:bozor.db` or `sqlite::memory:`.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    /// How many demo ads the seed tool creates.
    pub ads: u32,
}

impl Settings {
    pub fn load() -> Result<Self, SettingsError> {
        dotenvy::dotenv().ok();

        let settings: Settings = config::Config::builder()
            .set_default("database.url", "sqlite:bozor.db")?
            .set_default("seed.ads", 3)?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("BOZOR").separator("__"))
            .build()?
            .try_deserialize()?;

        tracing::debug!(url = %settings.database.url, "settings loaded");
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_any_source() {
        let settings = Settings::load().expect("defaults");
        assert_eq!(settings.database.url, "sqlite:bozor.db");
        assert_eq!(settings.seed.ads, 3);
    }
}
