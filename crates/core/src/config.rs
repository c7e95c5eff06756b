use std::{
    fmt,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use tracing::debug;

use crate::{
    error::{Result, VidsumError},
    provider::{Provider, ProviderChain, ProviderCredentials},
    sections::TimestampStrategy,
};

pub const CREDENTIALS_FILE: &str = "credentials.toml";

/// Process-wide settings. Loaded once at startup, validated, then shared
/// read-only with every pipeline component.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(rename = "GITHUB", default)]
    pub github: ProviderCredentials,
    #[serde(rename = "OPENROUTER", default)]
    pub openrouter: ProviderCredentials,
    #[serde(rename = "TRANSCRIPT", default)]
    pub transcript: TranscriptSettings,
    #[serde(rename = "TRANSLATION", default)]
    pub translation: TranslationSettings,
    #[serde(default)]
    pub pipeline: PipelineSettings,
}

#[derive(Clone, Default, Deserialize)]
pub struct TranscriptSettings {
    #[serde(default, alias = "TRANSCRIPT_ENDPOINT")]
    pub endpoint: Option<String>,
    #[serde(default, alias = "TRANSCRIPT_PASSWORD")]
    pub password: Option<String>,
}

#[derive(Clone, Default, Deserialize)]
pub struct TranslationSettings {
    #[serde(default, alias = "TRANSLATION_ENDPOINT")]
    pub endpoint: Option<String>,
    #[serde(default, alias = "TRANSLATION_API_KEY")]
    pub api_key: Option<String>,
}

impl fmt::Debug for TranscriptSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptSettings")
            .field("endpoint", &self.endpoint)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl fmt::Debug for TranslationSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationSettings")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    #[default]
    Interval,
    Placeholder,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub max_tokens: u32,
    pub timeout_seconds: u64,
    pub timestamp_strategy: TimestampMode,
    pub section_interval_seconds: u32,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_tokens: 1000,
            timeout_seconds: 30,
            timestamp_strategy: TimestampMode::Interval,
            section_interval_seconds: 30,
        }
    }
}

impl PipelineSettings {
    pub fn timestamps(&self) -> TimestampStrategy {
        match self.timestamp_strategy {
            TimestampMode::Interval => TimestampStrategy::Interval {
                seconds: self.section_interval_seconds,
            },
            TimestampMode::Placeholder => TimestampStrategy::Placeholder,
        }
    }
}

impl Settings {
    /// Load settings from a credentials file and the environment.
    ///
    /// An explicit `path` must exist. Without one, `./credentials.toml` and
    /// then `<config dir>/vidsum/credentials.toml` are tried; if neither
    /// exists the environment alone has to supply the required keys.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let source = match path {
            Some(path) if !path.exists() => {
                return Err(VidsumError::Config(format!(
                    "credentials file {} not found",
                    path.display()
                )));
            }
            Some(path) => Some(path.to_path_buf()),
            None => default_locations().into_iter().find(|p| p.exists()),
        };

        let mut settings = match &source {
            Some(path) => {
                debug!(path = %path.display(), "loading credentials file");
                Self::from_toml_str(&std::fs::read_to_string(path)?)?
            }
            None => {
                debug!("no credentials file found, using environment only");
                Self::default()
            }
        };

        settings.apply_env_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Override file values with environment-style lookups. Empty values
    /// are ignored so an exported-but-blank variable does not erase a key;
    /// numeric values that do not parse are a configuration error.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        for provider in Provider::CHAIN {
            let prefix = provider.env_prefix();
            let credentials = self.credentials_mut(provider);
            if let Some(value) = get(&format!("{prefix}_API_KEY")) {
                credentials.api_key = Some(value);
            }
            if let Some(value) = get(&format!("{prefix}_ENDPOINT")) {
                credentials.endpoint = Some(value);
            }
            if let Some(value) = get(&format!("{prefix}_MODEL")) {
                credentials.model = Some(value);
            }
        }

        if let Some(value) = get("TRANSCRIPT_ENDPOINT") {
            self.transcript.endpoint = Some(value);
        }
        if let Some(value) = get("TRANSCRIPT_PASSWORD") {
            self.transcript.password = Some(value);
        }
        if let Some(value) = get("TRANSLATION_ENDPOINT") {
            self.translation.endpoint = Some(value);
        }
        if let Some(value) = get("TRANSLATION_API_KEY") {
            self.translation.api_key = Some(value);
        }
        if let Some(value) = get("VIDSUM_MAX_TOKENS") {
            self.pipeline.max_tokens = parse_number("VIDSUM_MAX_TOKENS", &value)?;
        }
        if let Some(value) = get("VIDSUM_TIMEOUT_SECONDS") {
            self.pipeline.timeout_seconds = parse_number("VIDSUM_TIMEOUT_SECONDS", &value)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.provider_chain().resolve()?;

        if self.transcript_endpoint().is_none() {
            return Err(VidsumError::Config(
                "TRANSCRIPT_ENDPOINT must be set".to_string(),
            ));
        }
        if self.pipeline.max_tokens == 0 {
            return Err(VidsumError::Config(
                "pipeline.max_tokens must be > 0".to_string(),
            ));
        }
        if self.pipeline.timeout_seconds == 0 {
            return Err(VidsumError::Config(
                "pipeline.timeout_seconds must be > 0".to_string(),
            ));
        }
        if self.pipeline.section_interval_seconds == 0 {
            return Err(VidsumError::Config(
                "pipeline.section_interval_seconds must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn provider_chain(&self) -> ProviderChain {
        ProviderChain::new(
            Provider::CHAIN
                .into_iter()
                .map(|provider| (provider, self.credentials(provider).clone()))
                .collect(),
        )
    }

    pub fn credentials(&self, provider: Provider) -> &ProviderCredentials {
        match provider {
            Provider::Github => &self.github,
            Provider::Openrouter => &self.openrouter,
        }
    }

    fn credentials_mut(&mut self, provider: Provider) -> &mut ProviderCredentials {
        match provider {
            Provider::Github => &mut self.github,
            Provider::Openrouter => &mut self.openrouter,
        }
    }

    pub fn transcript_endpoint(&self) -> Option<&str> {
        trimmed(&self.transcript.endpoint)
    }

    pub fn translation_endpoint(&self) -> Option<&str> {
        trimmed(&self.translation.endpoint)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.pipeline.timeout_seconds)
    }

    /// The single HTTP client shared by every outbound call
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder().timeout(self.timeout()).build()?)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        VidsumError::Config(format!("{key} must be a whole number, got `{value}`"))
    })
}

fn trimmed(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn default_locations() -> Vec<PathBuf> {
    let mut locations = vec![PathBuf::from(CREDENTIALS_FILE)];
    if let Some(dir) = dirs::config_dir() {
        locations.push(dir.join("vidsum").join(CREDENTIALS_FILE));
    }
    locations
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    const FULL: &str = r#"
[GITHUB]
GITHUB_API_KEY = "gh-key"

[OPENROUTER]
OPENROUTER_API_KEY = "or-key"
OPENROUTER_MODEL = "anthropic/claude-3-haiku"

[TRANSCRIPT]
TRANSCRIPT_ENDPOINT = "https://transcripts.example.com/api"
TRANSCRIPT_PASSWORD = "hunter2"

[pipeline]
max_tokens = 600
timestamp_strategy = "placeholder"
"#;

    #[test]
    fn parses_upper_case_credential_sections() {
        let settings = Settings::from_toml_str(FULL).unwrap();
        assert_eq!(settings.github.api_key.as_deref(), Some("gh-key"));
        assert_eq!(
            settings.openrouter.model.as_deref(),
            Some("anthropic/claude-3-haiku")
        );
        assert_eq!(
            settings.transcript_endpoint(),
            Some("https://transcripts.example.com/api")
        );
        assert_eq!(settings.pipeline.max_tokens, 600);
        assert_eq!(settings.pipeline.timeout_seconds, 30);
        assert_eq!(settings.pipeline.timestamps(), TimestampStrategy::Placeholder);
        assert!(settings.translation_endpoint().is_none());
        settings.validate().unwrap();
    }

    #[test]
    fn environment_overrides_file_values() {
        let mut settings = Settings::from_toml_str(FULL).unwrap();
        let env: HashMap<&str, &str> = HashMap::from([
            ("GITHUB_API_KEY", "from-env"),
            ("GITHUB_MODEL", "gpt-4o"),
            ("TRANSCRIPT_PASSWORD", ""),
            ("VIDSUM_TIMEOUT_SECONDS", "12"),
        ]);
        settings
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(settings.github.api_key.as_deref(), Some("from-env"));
        assert_eq!(settings.github.model.as_deref(), Some("gpt-4o"));
        assert_eq!(settings.transcript.password.as_deref(), Some("hunter2"));
        assert_eq!(settings.timeout(), Duration::from_secs(12));
    }

    #[test]
    fn environment_alone_can_configure_everything() {
        let mut settings = Settings::default();
        let env: HashMap<&str, &str> = HashMap::from([
            ("OPENROUTER_API_KEY", "or-key"),
            ("TRANSCRIPT_ENDPOINT", "http://localhost:8080/transcript"),
        ]);
        settings
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        settings.validate().unwrap();
        let provider = settings.provider_chain().resolve().unwrap();
        assert_eq!(provider.provider, Provider::Openrouter);
    }

    #[test]
    fn malformed_numeric_overrides_are_rejected() {
        for (key, value) in [("VIDSUM_TIMEOUT_SECONDS", "30s"), ("VIDSUM_MAX_TOKENS", "-5")] {
            let mut settings = Settings::from_toml_str(FULL).unwrap();
            let result = settings.apply_env_overrides(|k| (k == key).then(|| value.to_string()));
            match result {
                Err(VidsumError::Config(message)) => {
                    assert!(message.contains(key), "`{message}` should name {key}");
                    assert!(message.contains(value));
                }
                other => panic!("expected Config error for {key}={value}, got {other:?}"),
            }
        }
    }

    #[test]
    fn validation_fails_fast_on_missing_pieces() {
        let no_provider = Settings::from_toml_str(
            "[TRANSCRIPT]\nTRANSCRIPT_ENDPOINT = \"http://x\"\n",
        )
        .unwrap();
        assert!(matches!(
            no_provider.validate(),
            Err(VidsumError::MissingProvider { .. })
        ));

        let no_transcript =
            Settings::from_toml_str("[GITHUB]\nGITHUB_API_KEY = \"k\"\n").unwrap();
        assert!(matches!(no_transcript.validate(), Err(VidsumError::Config(_))));

        let mut zero_tokens = Settings::from_toml_str(FULL).unwrap();
        zero_tokens.pipeline.max_tokens = 0;
        assert!(matches!(zero_tokens.validate(), Err(VidsumError::Config(_))));

        let mut zero_timeout = Settings::from_toml_str(FULL).unwrap();
        zero_timeout.pipeline.timeout_seconds = 0;
        assert!(matches!(zero_timeout.validate(), Err(VidsumError::Config(_))));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = Path::new("/definitely/not/here/credentials.toml");
        assert!(matches!(
            Settings::load(Some(missing)),
            Err(VidsumError::Config(_))
        ));
    }

    #[test]
    fn malformed_toml_is_reported() {
        assert!(matches!(
            Settings::from_toml_str("[GITHUB\nnope"),
            Err(VidsumError::TomlError(_))
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let settings = Settings::from_toml_str(FULL).unwrap();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("hunter2"));
        assert!(!debug.contains("gh-key"));
    }
}
