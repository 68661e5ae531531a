pub mod settings;

pub use settings::{AuthConfig, DatabaseConfig, LocalizationConfig, ServerConfig, Settings};
