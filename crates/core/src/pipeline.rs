use tracing::{info, warn};

use crate::{
    chat::ChatClient,
    config::Settings,
    error::{Result, VidsumError},
    language::{SummaryLanguage, display_name},
    sections::{Section, SectionExtractor},
    summary::{DetailLevel, SummaryGenerator, SummaryRequest, SummaryResult},
    transcript::{Transcript, TranscriptFetcher},
    translate::{ChatTranslator, EndpointTranslator, Translator},
    video::VideoReference,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SummarizeOptions {
    pub language: SummaryLanguage,
    pub detail_level: DetailLevel,
}

/// Transcript fetched for a video, or the placeholder if none was found.
#[derive(Debug, Clone)]
pub struct FetchedTranscript {
    pub transcript: Transcript,
    pub available: bool,
}

#[derive(Debug, Clone)]
pub struct SummaryReport {
    pub video: VideoReference,
    pub transcript: Transcript,
    pub transcript_available: bool,
    pub source_language: String,
    pub target_language: String,
    /// Summary as generated, before any translation
    pub original_text: String,
    /// True only if a translation actually replaced `original_text`
    pub translated: bool,
    pub summary: SummaryResult,
}

/// Network-bound steps of [`Summarizer::summarize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Transcript,
    Summary,
    Translation,
}

/// What `summarize_with` reports as it goes. `Started` always precedes the
/// matching `*Ready` event; translation events only fire when the languages
/// differ.
#[derive(Debug, Clone, Copy)]
pub enum Progress<'a> {
    Resolved { video_id: &'a str },
    Started(Stage),
    TranscriptReady {
        transcript: &'a Transcript,
        available: bool,
    },
    SummaryReady,
    TranslationReady { changed: bool },
}

/// The whole request pipeline: resolve → transcript → summary →
/// translation → sections. Every stage is also callable on its own.
pub struct Summarizer {
    fetcher: TranscriptFetcher,
    generator: SummaryGenerator,
    translator: Box<dyn Translator>,
    extractor: SectionExtractor,
}

impl Summarizer {
    pub fn new(
        fetcher: TranscriptFetcher,
        generator: SummaryGenerator,
        translator: Box<dyn Translator>,
        extractor: SectionExtractor,
    ) -> Self {
        Self {
            fetcher,
            generator,
            translator,
            extractor,
        }
    }

    /// Wire every component from validated settings. The chat provider is
    /// picked here, once, and reused for every call.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;

        let http = settings.http_client()?;
        let provider = settings.provider_chain().resolve()?;
        info!(provider = provider.provider.name(), model = %provider.model, "chat provider selected");

        let endpoint = settings
            .transcript_endpoint()
            .ok_or_else(|| VidsumError::Config("TRANSCRIPT_ENDPOINT must be set".to_string()))?;
        let fetcher = TranscriptFetcher::new(
            http.clone(),
            endpoint,
            settings.transcript.password.clone(),
        );

        let chat = ChatClient::new(http.clone(), provider, settings.pipeline.max_tokens);

        let translator: Box<dyn Translator> = match settings.translation_endpoint() {
            Some(endpoint) => Box::new(EndpointTranslator::new(
                http,
                endpoint,
                settings.translation.api_key.clone(),
            )),
            None => Box::new(ChatTranslator::new(chat.clone())),
        };

        Ok(Self::new(
            fetcher,
            SummaryGenerator::new(chat),
            translator,
            SectionExtractor::new(settings.pipeline.timestamps()),
        ))
    }

    pub fn generator(&self) -> &SummaryGenerator {
        &self.generator
    }

    pub fn translator_name(&self) -> &'static str {
        self.translator.name()
    }

    pub fn resolve(&self, url: &str) -> Result<VideoReference> {
        let reference = VideoReference::parse(url);
        reference.id()?;
        Ok(reference)
    }

    /// Fetch with English fallback; degrade to the placeholder rather than fail.
    pub async fn transcript(&self, video_id: &str, language_code: &str) -> FetchedTranscript {
        match self.fetcher.fetch_with_fallback(video_id, language_code).await {
            Ok(transcript) => FetchedTranscript {
                transcript,
                available: true,
            },
            Err(e) => {
                warn!(video_id, error = %e, "no transcript available, summarizing placeholder");
                FetchedTranscript {
                    transcript: Transcript::placeholder(),
                    available: false,
                }
            }
        }
    }

    /// The summary request for `transcript`, written in the transcript's
    /// own language.
    pub fn summary_request(&self, transcript: &Transcript, detail_level: DetailLevel) -> SummaryRequest {
        self.generator.request(
            transcript.full_text(),
            detail_level,
            &display_name(&transcript.language),
        )
    }

    pub async fn generate(&self, transcript: &Transcript, detail_level: DetailLevel) -> Result<String> {
        let request = self.summary_request(transcript, detail_level);
        self.generator.generate_for(&request).await
    }

    pub fn needs_translation(source_language: &str, target: SummaryLanguage) -> bool {
        !source_language.eq_ignore_ascii_case(target.code())
    }

    pub async fn translate(&self, text: &str, source_language: &str, target: SummaryLanguage) -> String {
        self.translator.translate(text, source_language, target.code()).await
    }

    pub fn sections(&self, summary_text: &str, video_id: &str) -> Vec<Section> {
        self.extractor.extract(summary_text, video_id)
    }

    /// Run the full pipeline for one user request.
    ///
    /// Only `InvalidReference` and `GenerationFailed` are returned as errors;
    /// missing transcripts and failed translations degrade instead.
    pub async fn summarize(&self, url: &str, options: &SummarizeOptions) -> Result<SummaryReport> {
        self.summarize_with(url, options, |_| {}).await
    }

    /// [`Summarizer::summarize`], reporting each stage to `on_progress`.
    pub async fn summarize_with<F>(
        &self,
        url: &str,
        options: &SummarizeOptions,
        mut on_progress: F,
    ) -> Result<SummaryReport>
    where
        F: FnMut(Progress<'_>),
    {
        let video = self.resolve(url)?;
        let video_id = video.id()?.to_string();
        on_progress(Progress::Resolved { video_id: &video_id });

        on_progress(Progress::Started(Stage::Transcript));
        let fetched = self.transcript(&video_id, options.language.code()).await;
        on_progress(Progress::TranscriptReady {
            transcript: &fetched.transcript,
            available: fetched.available,
        });
        let source_language = fetched.transcript.language.clone();

        on_progress(Progress::Started(Stage::Summary));
        let original_text = self.generate(&fetched.transcript, options.detail_level).await?;
        on_progress(Progress::SummaryReady);

        let final_text = if Self::needs_translation(&source_language, options.language) {
            on_progress(Progress::Started(Stage::Translation));
            let text = self
                .translate(&original_text, &source_language, options.language)
                .await;
            on_progress(Progress::TranslationReady {
                changed: text != original_text,
            });
            text
        } else {
            original_text.clone()
        };
        let translated = final_text != original_text;

        let sections = self.sections(&final_text, &video_id);
        info!(video_id = %video_id, sections = sections.len(), "summary ready");

        Ok(SummaryReport {
            video,
            transcript: fetched.transcript,
            transcript_available: fetched.available,
            source_language,
            target_language: options.language.code().to_string(),
            original_text,
            translated,
            summary: SummaryResult {
                raw_text: final_text,
                sections,
            },
        })
    }
}
