//! Backend configuration and per-session options.
//!
//! Everything here is read once at startup and then passed by reference.
//! There is no process-wide client.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;

/// Environment variable holding the backend credential.
pub const API_KEY_ENV_VAR: &str = "OPENAI_API_KEY";

const BASE_URL_ENV_VAR: &str = "OPENAI_BASE_URL";
const MODEL_ENV_VAR: &str = "COMMITAI_MODEL";
const TIMEOUT_ENV_VAR: &str = "COMMITAI_TIMEOUT";
const MAX_TOKENS_ENV_VAR: &str = "COMMITAI_MAX_TOKENS";

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Sampling temperature used for every completion request.
pub const TEMPERATURE: f32 = 0.25;

/// Connection settings for the completion backend.
#[derive(Clone)]
pub struct BackendConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl BackendConfig {
    /// Build a configuration with defaults for everything but the credential.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the configuration from the environment.
    ///
    /// `OPENAI_API_KEY` is required. `OPENAI_BASE_URL`, `COMMITAI_MODEL`,
    /// `COMMITAI_TIMEOUT` (seconds) and `COMMITAI_MAX_TOKENS` are optional;
    /// invalid numeric values log a warning and fall back to the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = match env::var(API_KEY_ENV_VAR) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => return Err(ConfigError::MissingCredential),
        };

        let mut config = Self::new(api_key);

        if let Some(url) = non_empty_var(BASE_URL_ENV_VAR) {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty_var(MODEL_ENV_VAR) {
            config.model = model;
        }
        config.timeout = Duration::from_secs(parse_var(TIMEOUT_ENV_VAR, DEFAULT_TIMEOUT_SECS));
        config.max_tokens = parse_var(MAX_TOKENS_ENV_VAR, DEFAULT_MAX_TOKENS);

        Ok(config)
    }

    /// Point the configuration at a different API root (used by tests and proxies).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_var<T>(name: &str, default: T) -> T
where
    T: FromStr + fmt::Display + Copy,
{
    match env::var(name) {
        Ok(v) if !v.is_empty() => match v.trim().parse::<T>() {
            Ok(parsed) => parsed,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", name, v, default);
                default
            }
        },
        _ => default,
    }
}

/// Options fixed for the lifetime of one interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Open the selected subject in the editor before committing.
    pub edit: bool,
    /// Ask for a yes/no confirmation before committing.
    pub confirmation: bool,
    /// Number of candidates to request from the backend.
    pub count: u8,
}

impl SessionOptions {
    pub const MIN_COUNT: u32 = 1;
    pub const MAX_COUNT: u32 = 5;

    pub fn new(edit: bool, confirmation: bool, count: u32) -> Result<Self, ConfigError> {
        if !(Self::MIN_COUNT..=Self::MAX_COUNT).contains(&count) {
            return Err(ConfigError::CountOutOfRange(count));
        }

        Ok(Self {
            edit,
            confirmation,
            count: count as u8,
        })
    }
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            edit: true,
            confirmation: true,
            count: 3,
        }
    }
}
