use tracing::debug;

use crate::provider::ProviderConfig;

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("HTTP error: {0}")]
    HttpError(reqwest::Error),

    #[error("{provider} returned HTTP {status}: {body}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid API response: {0}")]
    InvalidApiResponse(serde_json::Value),

    #[error("{provider} returned an empty completion")]
    EmptyCompletion { provider: &'static str },
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::HttpError(e.without_url())
    }
}

/// Minimal chat-completion client: one system turn, one user turn.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    provider: ProviderConfig,
    max_tokens: u32,
}

impl ChatClient {
    pub fn new(http: reqwest::Client, provider: ProviderConfig, max_tokens: u32) -> Self {
        Self {
            http,
            provider,
            max_tokens,
        }
    }

    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    pub async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String, ChatError> {
        let provider_name = self.provider.provider.name();
        debug!(
            provider = provider_name,
            model = %self.provider.model,
            max_tokens = self.max_tokens,
            "sending chat completion"
        );

        let response = self
            .http
            .post(&self.provider.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.provider.api_key))
            .json(&serde_json::json!({
                "model": self.provider.model,
                "messages": [
                    {
                        "role": "system",
                        "content": system_prompt,
                    },
                    {
                        "role": "user",
                        "content": user_prompt,
                    },
                ],
                "max_tokens": self.max_tokens,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Status {
                provider: provider_name,
                status,
                body,
            });
        }

        let response = response.json::<serde_json::Value>().await?;

        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ChatError::InvalidApiResponse(response.clone()))?
            .trim();

        if content.is_empty() {
            return Err(ChatError::EmptyCompletion {
                provider: provider_name,
            });
        }

        Ok(content.to_string())
    }
}
