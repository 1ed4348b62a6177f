use dotenv::dotenv;
use std::env;
use std::time::Duration;

use crate::error::{Error, Result};

pub const PERENUAL_KEY_VAR: &str = "PERENUAL_API_KEY";
pub const OPENROUTER_KEY_VAR: &str = "OPENROUTER_API_KEY";

pub const DEFAULT_PERENUAL_BASE_URL: &str = "https://perenual.com/api";
pub const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_OPENROUTER_MODEL: &str = "meta-llama/llama-4-scout:free";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Settings shared by the lookup and identification clients.
///
/// Credentials are optional here; a client asked to work without its
/// credential fails that one operation with [`Error::MissingCredential`].
#[derive(Debug, Clone)]
pub struct Config {
    pub perenual_api_key: Option<String>,
    pub perenual_base_url: String,
    pub openrouter_api_key: Option<String>,
    pub openrouter_base_url: String,
    pub openrouter_model: String,
    pub request_timeout: Duration,
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            perenual_api_key: None,
            perenual_base_url: DEFAULT_PERENUAL_BASE_URL.to_string(),
            openrouter_api_key: None,
            openrouter_base_url: DEFAULT_OPENROUTER_BASE_URL.to_string(),
            openrouter_model: DEFAULT_OPENROUTER_MODEL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` (if any) and reads the two service credentials.
    pub fn from_env() -> Self {
        dotenv().ok();

        let config = Self {
            perenual_api_key: non_blank_var(PERENUAL_KEY_VAR),
            openrouter_api_key: non_blank_var(OPENROUTER_KEY_VAR),
            ..Self::default()
        };

        if config.perenual_api_key.is_none() {
            log::warn!("⚠️ {} not set, plant lookups will fail", PERENUAL_KEY_VAR);
        }
        if config.openrouter_api_key.is_none() {
            log::warn!("⚠️ {} not set, image identification will fail", OPENROUTER_KEY_VAR);
        }

        config
    }

    pub fn with_perenual(mut self, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.perenual_api_key = Some(api_key.into());
        self.perenual_base_url = base_url.into();
        self
    }

    pub fn with_openrouter(mut self, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.openrouter_api_key = Some(api_key.into());
        self.openrouter_base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.openrouter_model = model.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn perenual_key(&self) -> Result<&str> {
        self.perenual_api_key
            .as_deref()
            .ok_or(Error::MissingCredential(PERENUAL_KEY_VAR))
    }

    pub fn openrouter_key(&self) -> Result<&str> {
        self.openrouter_api_key
            .as_deref()
            .ok_or(Error::MissingCredential(OPENROUTER_KEY_VAR))
    }

    /// Builds a reqwest client bounded by `request_timeout`.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()
            .map_err(Error::ClientSetup)
    }
}

fn non_blank_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
