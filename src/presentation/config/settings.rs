use config::{Config, ConfigError, Environment as EnvironmentSource, File};
use serde::Deserialize;

use crate::application::services::FallbackPolicy;
use crate::domain::ExtractionLimits;

use super::Environment;

const API_KEY_FALLBACK_VARS: [&str; 3] = ["OPENAI_API_KEY", "OPENAI_APIKEY", "OPENAI_KEY"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub fallback: FallbackPolicy,
    pub engine: ExtractionLimits,
    pub storage: StorageSettings,
    pub database: Option<DatabaseSettings>,
    pub worker: WorkerSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// `.env`, then `appsettings.{Environment}.toml` (optional), then
    /// `APP__SECTION__KEY` environment variables.
    pub fn load() -> Result<(Self, Environment), ConfigError> {
        dotenvy::dotenv().ok();

        let environment =
            Environment::from_env().map_err(|e| ConfigError::Message(e.to_string()))?;

        let settings = Config::builder()
            .add_source(File::with_name(&environment.settings_file()).required(false))
            .add_source(
                EnvironmentSource::with_prefix("APP")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok((settings, environment))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub enabled: bool,
    /// `openai`, `azure` or `local`.
    pub provider: String,
    pub base_url: String,
    pub api_key: Option<String>,
    pub model: String,
    pub max_output_tokens: usize,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
            model: "gpt-4o-mini".to_string(),
            max_output_tokens: 64,
            timeout_secs: 30,
        }
    }
}

impl LlmSettings {
    /// Configured key, else the first non-empty of the usual OpenAI variables.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| {
                API_KEY_FALLBACK_VARS
                    .iter()
                    .filter_map(|var| std::env::var(var).ok())
                    .find(|k| !k.trim().is_empty())
            })
    }

    pub fn requires_api_key(&self) -> bool {
        !self.provider.eq_ignore_ascii_case("local")
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageProviderSetting {
    #[default]
    Local,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub provider: StorageProviderSetting,
    pub local_path: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            provider: StorageProviderSetting::Local,
            local_path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Connection attempts at startup before giving up.
    #[serde(default = "default_connect_attempts")]
    pub connect_attempts: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_attempts() -> u32 {
    6
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    pub enabled: bool,
    pub poll_interval_ms: u64,
    pub batch_size: usize,
    /// Shared secret expected in `x-worker-secret` on `/process-job`.
    pub secret: Option<String>,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            poll_interval_ms: 2000,
            batch_size: 5,
            secret: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: Option<String>,
    pub enable_json: bool,
}
