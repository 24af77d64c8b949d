use config::{Config, ConfigError, File};
use serde::Deserialize;

use super::Environment;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub logging: LoggingSettings,
    pub provider: ProviderSettings,
    pub storage: StorageSettings,
    pub extraction: ExtractionSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

/// Storage provider access. The credentials file holds either an OAuth user
/// token or a service account key.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    pub credentials_path: String,
    pub scope: String,
    pub api_base_url: String,
    pub token_url: String,
    pub page_size: u32,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    pub temp_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractionSettings {
    pub timeout_secs: u64,
}

impl Settings {
    /// Defaults, then `appsettings.base`, then `appsettings.{environment}`, then
    /// `APP_`-prefixed environment variables (`APP_SERVER__PORT=8080`).
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 5000_i64)?
            .set_default("logging.level", "info")?
            .set_default("logging.enable_json", false)?
            .set_default("provider.credentials_path", "token.json")?
            .set_default(
                "provider.scope",
                "https://www.googleapis.com/auth/drive.readonly",
            )?
            .set_default("provider.api_base_url", "https://www.googleapis.com")?
            .set_default("provider.token_url", "https://oauth2.googleapis.com/token")?
            .set_default("provider.page_size", 100_i64)?
            .set_default("provider.request_timeout_secs", 60_i64)?
            .set_default("storage.temp_dir", "/tmp")?
            .set_default("extraction.timeout_secs", 30_i64)?
            .add_source(File::with_name("appsettings.base").required(false))
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
