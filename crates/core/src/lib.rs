//! Vidsum Core Library
//!
//! Resolves a YouTube link to a transcript, asks a chat-completion provider
//! for a sectioned summary, translates it when needed, and renders the result.

pub mod chat;
pub mod config;
pub mod error;
pub mod format;
pub mod language;
pub mod pipeline;
pub mod provider;
pub mod sections;
pub mod summary;
pub mod transcript;
pub mod translate;
pub mod video;

// Re-export commonly used items at crate root
pub use chat::{ChatClient, ChatError};
pub use config::{PipelineSettings, Settings, TimestampMode};
pub use error::{Result, VidsumError};
pub use format::{
    escape_html, format_report_readable, format_timestamp, format_transcript_with_timestamps,
    render_html, save_html,
};
pub use language::SummaryLanguage;
pub use pipeline::{FetchedTranscript, Progress, Stage, SummarizeOptions, Summarizer, SummaryReport};
pub use provider::{Provider, ProviderChain, ProviderConfig, ProviderCredentials};
pub use sections::{Section, SectionExtractor, TimestampStrategy};
pub use summary::{DetailLevel, SummaryGenerator, SummaryRequest, SummaryResult};
pub use transcript::{Transcript, TranscriptFetcher, TranscriptSegment};
pub use translate::{ChatTranslator, EndpointTranslator, Translator};
pub use video::{VideoReference, resolve};
