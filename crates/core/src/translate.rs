//! Best-effort translation of a finished summary.
//!
//! A translator never fails the pipeline: any provider error is logged and
//! the original text comes back unchanged.

use std::fmt;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    chat::ChatClient,
    error::{Result, VidsumError},
    language::display_name,
};

#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &'static str;

    /// Single attempt against the provider
    async fn try_translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String>;

    async fn translate(&self, text: &str, source_language: &str, target_language: &str) -> String {
        match self.try_translate(text, source_language, target_language).await {
            Ok(translated) => {
                info!(translator = self.name(), target_language, "summary translated");
                translated
            }
            Err(e) => {
                warn!(
                    translator = self.name(),
                    target_language,
                    error = %e,
                    "translation failed, keeping original text"
                );
                text.to_string()
            }
        }
    }
}

/// Translates through the same chat-completion provider as the summary.
pub struct ChatTranslator {
    chat: ChatClient,
}

impl ChatTranslator {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }
}

#[async_trait]
impl Translator for ChatTranslator {
    fn name(&self) -> &'static str {
        "chat"
    }

    async fn try_translate(&self, text: &str, _source_language: &str, target_language: &str) -> Result<String> {
        let prompt = format!(
            "Translate the following text to {}. Keep the paragraph structure and the `Title: body` layout. Reply with the translation only.",
            display_name(target_language)
        );
        self.chat
            .complete(&prompt, text)
            .await
            .map_err(|e| VidsumError::TranslationFailed {
                reason: e.to_string(),
            })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EndpointResponse {
    translated_text: String,
}

/// Translates through a dedicated text-translation endpoint.
pub struct EndpointTranslator {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl fmt::Debug for EndpointTranslator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointTranslator")
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl EndpointTranslator {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            api_key,
        }
    }
}

#[async_trait]
impl Translator for EndpointTranslator {
    fn name(&self) -> &'static str {
        "endpoint"
    }

    async fn try_translate(&self, text: &str, source_language: &str, target_language: &str) -> Result<String> {
        let mut request = self.http.post(&self.endpoint).json(&serde_json::json!({
            "q": text,
            "source": source_language,
            "target": target_language,
            "format": "text",
        }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(VidsumError::TranslationFailed {
                reason: format!("endpoint returned HTTP {status}"),
            });
        }

        let body: EndpointResponse = response.json().await?;
        if body.translated_text.trim().is_empty() {
            return Err(VidsumError::TranslationFailed {
                reason: "endpoint returned an empty translation".to_string(),
            });
        }
        Ok(body.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl Translator for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn try_translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String> {
            Err(VidsumError::TranslationFailed {
                reason: "boom".to_string(),
            })
        }
    }

    #[test]
    fn endpoint_debug_output_hides_key() {
        let translator = EndpointTranslator::new(
            reqwest::Client::new(),
            "http://localhost/translate",
            Some("tr-secret".to_string()),
        );
        assert!(!format!("{translator:?}").contains("tr-secret"));
    }

    #[tokio::test]
    async fn failures_return_the_original_text() {
        let text = "Intro: hello\n\nOutro: bye";
        assert_eq!(Failing.translate(text, "en", "zh-TW").await, text);
    }
}
