use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::error::TriageError;
use crate::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct TriageConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServiceConfig {
    pub log_level: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    pub name: String,
    pub base_url: String,
    pub timeout_seconds: u64,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_seconds: 30,
            api_key_env: "API_KEY".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub host: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StoreConfig {
    pub seed_demo_tickets: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            seed_demo_tickets: true,
        }
    }
}

impl TriageConfig {
    pub fn load(path: &str) -> Result<Self, TriageError> {
        let s = Config::builder()
            .add_source(File::with_name(path))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self, TriageError> {
        let s = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        Ok(s.try_deserialize()?)
    }

    /// Read the model API key from the configured environment variable.
    /// Missing or empty is a startup failure.
    pub fn api_key(&self) -> Result<String, TriageError> {
        read_credential(&self.model.api_key_env, |var| std::env::var(var).ok())
    }
}

/// Resolve a credential through `lookup`, rejecting absent or blank values.
pub fn read_credential<F>(var: &str, lookup: F) -> Result<String, TriageError>
where
    F: FnOnce(&str) -> Option<String>,
{
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(TriageError::MissingCredential {
            var: var.to_string(),
        }),
    }
}
