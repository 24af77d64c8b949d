mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment, UnknownEnvironment};
pub use settings::{
    ExtractionSettings, LoggingSettings, ProviderSettings, ServerSettings, Settings,
    StorageSettings,
};
