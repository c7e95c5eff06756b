use std::fmt;

use serde::Deserialize;

use crate::error::{Result, VidsumError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Github,
    Openrouter,
}

/// Credentials for one chat-completion provider as they appear in the
/// credentials file. Endpoint and model fall back to the provider defaults.
#[derive(Clone, Default, Deserialize)]
pub struct ProviderCredentials {
    #[serde(default, alias = "GITHUB_API_KEY", alias = "OPENROUTER_API_KEY")]
    pub api_key: Option<String>,
    #[serde(default, alias = "GITHUB_ENDPOINT", alias = "OPENROUTER_ENDPOINT")]
    pub endpoint: Option<String>,
    #[serde(default, alias = "GITHUB_MODEL", alias = "OPENROUTER_MODEL")]
    pub model: Option<String>,
}

impl fmt::Debug for ProviderCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderCredentials")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// A fully resolved provider: where to send requests and with which key.
#[derive(Clone)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_url: String,
    pub model: String,
    pub api_key: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl Provider {
    /// Priority order used when picking a provider.
    pub const CHAIN: [Provider; 2] = [Provider::Github, Provider::Openrouter];

    pub fn name(&self) -> &'static str {
        match self {
            Provider::Github => "GitHub Models",
            Provider::Openrouter => "OpenRouter",
        }
    }

    /// Prefix of the credential keys and environment variables
    pub fn env_prefix(&self) -> &'static str {
        match self {
            Provider::Github => "GITHUB",
            Provider::Openrouter => "OPENROUTER",
        }
    }

    pub fn default_api_url(&self) -> &'static str {
        match self {
            Provider::Github => "https://models.inference.ai.azure.com/chat/completions",
            Provider::Openrouter => "https://openrouter.ai/api/v1/chat/completions",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::Github => "gpt-4o-mini",
            Provider::Openrouter => "openai/gpt-4o-mini",
        }
    }

    /// Build a config from credentials, or `None` if no usable key is set
    pub fn configure(&self, credentials: &ProviderCredentials) -> Option<ProviderConfig> {
        let api_key = credentials
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())?;

        Some(ProviderConfig {
            provider: *self,
            api_url: non_empty(&credentials.endpoint)
                .unwrap_or(self.default_api_url())
                .to_string(),
            model: non_empty(&credentials.model)
                .unwrap_or(self.default_model())
                .to_string(),
            api_key: api_key.to_string(),
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Ordered list of candidate providers. The first one with a key wins;
/// the choice is made once and never re-evaluated per request.
#[derive(Debug, Clone)]
pub struct ProviderChain {
    entries: Vec<(Provider, ProviderCredentials)>,
}

impl ProviderChain {
    pub fn new(entries: Vec<(Provider, ProviderCredentials)>) -> Self {
        Self { entries }
    }

    pub fn resolve(&self) -> Result<ProviderConfig> {
        self.entries
            .iter()
            .find_map(|(provider, credentials)| provider.configure(credentials))
            .ok_or_else(|| VidsumError::MissingProvider {
                tried: self
                    .entries
                    .iter()
                    .map(|(provider, _)| format!("{}_API_KEY", provider.env_prefix()))
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
