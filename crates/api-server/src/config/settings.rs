use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub localization: LocalizationConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_max_size: u32,
    pub pool_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_expiry_seconds: u64,
    /// Optional bootstrap admin account, created at startup when both
    /// fields are present.
    pub bootstrap_username: Option<String>,
    pub bootstrap_password: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocalizationConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
}

impl Settings {
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("database.pool_max_size", 10)?
            .set_default("database.pool_timeout_seconds", 30)?
            .set_default("auth.token_expiry_seconds", 86400)?
            .set_default("localization.default_language", "pl")?
            .set_default(
                "localization.supported_languages",
                vec!["pl", "en", "de", "cs"],
            )?
            .add_source(File::with_name("config/settings").required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings)
    }
}
