use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    chat::ChatClient,
    error::{Result, VidsumError},
    provider::Provider,
    sections::Section,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetailLevel {
    #[default]
    Basic,
    Detailed,
    Concise,
    Fun,
}

impl DetailLevel {
    pub fn instruction(&self) -> &'static str {
        match self {
            DetailLevel::Basic => "Summarize the transcript as concise key points.",
            DetailLevel::Detailed => {
                "Summarize the transcript in depth, citing timestamps where the topic changes."
            }
            DetailLevel::Concise => "Give a brief overview of the transcript in a few sentences.",
            DetailLevel::Fun => {
                "Summarize the transcript with a playful tone, adding emphasis markers and emoji."
            }
        }
    }
}

/// Everything one summary call needs. Built once per invocation.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub transcript_text: String,
    pub detail_level: DetailLevel,
    /// Display name of the language the summary is written in. This is the
    /// transcript's language; translation to the requested language happens
    /// afterwards.
    pub output_language: String,
    pub provider: Provider,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryResult {
    pub raw_text: String,
    pub sections: Vec<Section>,
}

pub fn system_prompt(detail_level: DetailLevel, language: &str) -> String {
    format!(
        r#"You are a video summarizer. {instruction}

Write the entire summary in {language}.

Format the output as paragraphs separated by one blank line. Start every paragraph with a short section title followed by a colon, for example:
Introduction: what the video sets out to explain

Do not use markdown headings or bullet lists outside of these paragraphs."#,
        instruction = detail_level.instruction(),
        language = language,
    )
}

pub struct SummaryGenerator {
    chat: ChatClient,
}

impl SummaryGenerator {
    pub fn new(chat: ChatClient) -> Self {
        Self { chat }
    }

    pub fn provider(&self) -> Provider {
        self.chat.provider().provider
    }

    pub fn request(&self, transcript_text: String, detail_level: DetailLevel, output_language: &str) -> SummaryRequest {
        SummaryRequest {
            transcript_text,
            detail_level,
            output_language: output_language.to_string(),
            provider: self.provider(),
        }
    }

    /// Ask the provider for a summary of `text`. The transcript is sent
    /// verbatim as the user turn.
    pub async fn generate(&self, text: &str, detail_level: DetailLevel, language: &str) -> Result<String> {
        let prompt = system_prompt(detail_level, language);
        let summary = self
            .chat
            .complete(&prompt, text)
            .await
            .map_err(|e| VidsumError::GenerationFailed {
                reason: e.to_string(),
            })?;

        info!(
            provider = self.provider().name(),
            chars = summary.len(),
            "summary generated"
        );
        Ok(summary)
    }

    pub async fn generate_for(&self, request: &SummaryRequest) -> Result<String> {
        self.generate(
            &request.transcript_text,
            request.detail_level,
            &request.output_language,
        )
        .await
    }
}
