use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{Result, VidsumError};

pub const FALLBACK_LANGUAGE: &str = "en";
pub const NO_TRANSCRIPT_PLACEHOLDER: &str = "No transcript available.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub text: String,
    #[serde(rename = "start", default)]
    pub start_offset_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
    pub language: String,
}

impl Transcript {
    /// Segment texts in order, joined with single spaces
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|seg| seg.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Stand-in used when no transcript could be fetched in any language
    pub fn placeholder() -> Self {
        Self {
            segments: vec![TranscriptSegment {
                text: NO_TRANSCRIPT_PLACEHOLDER.to_string(),
                start_offset_seconds: 0.0,
            }],
            language: FALLBACK_LANGUAGE.to_string(),
        }
    }

    pub fn duration_seconds(&self) -> f64 {
        self.segments
            .last()
            .map(|s| s.start_offset_seconds)
            .unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    transcript: Vec<TranscriptSegment>,
}

/// Client for the external transcript provider.
#[derive(Clone)]
pub struct TranscriptFetcher {
    http: reqwest::Client,
    endpoint: String,
    password: Option<String>,
}

impl fmt::Debug for TranscriptFetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranscriptFetcher")
            .field("endpoint", &self.endpoint)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl TranscriptFetcher {
    pub fn new(http: reqwest::Client, endpoint: impl Into<String>, password: Option<String>) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            password,
        }
    }

    /// Fetch the transcript of `video_id` in `language_code`. Exactly one request.
    pub async fn fetch(&self, video_id: &str, language_code: &str) -> Result<Transcript> {
        let unavailable = |reason: String| VidsumError::TranscriptUnavailable {
            video_id: video_id.to_string(),
            language: language_code.to_string(),
            reason,
        };

        debug!(video_id, language_code, "requesting transcript");

        let mut query = vec![("video_id", video_id), ("language_code", language_code)];
        if let Some(password) = &self.password {
            query.push(("password", password.as_str()));
        }

        let response = self
            .http
            .get(&self.endpoint)
            .query(&query)
            .send()
            .await
            // The request URL carries the password; keep it out of the error.
            .map_err(|e| unavailable(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("provider returned HTTP {status}")));
        }

        let body: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("invalid transcript payload: {}", e.without_url())))?;

        if body.transcript.is_empty() {
            return Err(unavailable("provider returned no segments".to_string()));
        }

        Ok(Transcript {
            segments: body.transcript,
            language: language_code.to_string(),
        })
    }

    /// Fetch in the requested language, retrying once in English.
    ///
    /// When `language_code` already is English there is nothing different
    /// to retry with, so the first failure is returned as is.
    pub async fn fetch_with_fallback(&self, video_id: &str, language_code: &str) -> Result<Transcript> {
        match self.fetch(video_id, language_code).await {
            Ok(transcript) => Ok(transcript),
            Err(e) if language_code.eq_ignore_ascii_case(FALLBACK_LANGUAGE) => Err(e),
            Err(e) => {
                warn!(video_id, language_code, error = %e, "transcript missing, retrying in English");
                let transcript = self.fetch(video_id, FALLBACK_LANGUAGE).await?;
                info!(video_id, "using English transcript");
                Ok(transcript)
            }
        }
    }
}
