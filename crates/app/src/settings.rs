//! Handles settings for the application.
//!
//! Sources, later ones winning: built-in defaults, `sharetab.toml` (or the
//! file passed with `--config`), then `SHARETAB__SECTION__KEY` environment
//! variables.
use std::path::Path;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Ledger {
    /// Balances at or below this many minor units count as settled.
    pub tolerance: i64,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub ledger: Ledger,
}

impl Settings {
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("sharetab").required(false),
        };

        Config::builder()
            .set_default("app.level", "info")?
            .set_default("ledger.tolerance", 0)?
            .add_source(file)
            .add_source(Environment::with_prefix("SHARETAB").separator("__"))
            .build()?
            .try_deserialize()
    }
}
