use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime settings.
///
/// Sources in increasing priority: built-in defaults, an optional `trivia.toml`
/// in the working directory, `TRIVIA_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Path of the SQLite database file, created when missing.
    pub db_path: String,
    /// Address the HTTP server binds to.
    pub address: String,
    pub run_migrations: bool,
    /// Log filter directive, e.g. `info,tower_http=debug`.
    pub log_level: String,
    /// Log span creation and closing with timings.
    pub span_events: bool,
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("db_path", "trivia.db")?
        .set_default("address", "0.0.0.0:8080")?
        .set_default("run_migrations", true)?
        .set_default("log_level", "info,tower_http=debug")?
        .set_default("span_events", false)
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        defaults()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::with_prefix("TRIVIA"))
            .build()?
            .try_deserialize()
    }
}
