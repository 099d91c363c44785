mod environment;
mod settings;

pub use environment::{ENVIRONMENT_VAR, Environment, UnknownEnvironment};
pub use settings::{
    DatabaseSettings, LlmSettings, LoggingSettings, ServerSettings, Settings,
    StorageProviderSetting, StorageSettings, WorkerSettings,
};
