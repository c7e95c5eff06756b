use serde::Serialize;

use crate::{format::format_timestamp, video::watch_url};

pub const PLACEHOLDER_TIMESTAMP: &str = "00:00";

/// A titled fragment of a generated summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub timestamp: String,
    pub body: String,
    pub source_link: Option<String>,
}

/// How section timestamps are derived. Neither strategy reflects real
/// offsets in the video; they are approximate navigation aids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampStrategy {
    /// `seconds * index` for the n-th extracted section, linked into the video
    Interval { seconds: u32 },
    /// Always `00:00`, no link
    Placeholder,
}

impl Default for TimestampStrategy {
    fn default() -> Self {
        TimestampStrategy::Interval { seconds: 30 }
    }
}

impl TimestampStrategy {
    fn offset(&self, index: usize) -> Option<u64> {
        match self {
            TimestampStrategy::Interval { seconds } => Some(u64::from(*seconds) * index as u64),
            TimestampStrategy::Placeholder => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SectionExtractor {
    strategy: TimestampStrategy,
}

impl SectionExtractor {
    pub fn new(strategy: TimestampStrategy) -> Self {
        Self { strategy }
    }

    /// Split a summary into `Title: body` sections.
    ///
    /// Paragraphs are separated by a blank line. Only the first colon of a
    /// paragraph separates title from body; paragraphs without a colon (or
    /// with nothing before it) are skipped.
    pub fn extract(&self, summary_text: &str, video_id: &str) -> Vec<Section> {
        let normalized = summary_text.replace("\r\n", "\n");

        normalized
            .split("\n\n")
            .filter_map(|paragraph| {
                let (title, body) = paragraph.split_once(':')?;
                let title = title.trim();
                (!title.is_empty()).then(|| (title.to_string(), body.trim().to_string()))
            })
            .enumerate()
            .map(|(index, (title, body))| {
                let offset = self.strategy.offset(index);
                Section {
                    title,
                    timestamp: offset
                        .map(|secs| format_timestamp(secs as f64))
                        .unwrap_or_else(|| PLACEHOLDER_TIMESTAMP.to_string()),
                    body,
                    source_link: offset.map(|secs| format!("{}&t={}", watch_url(video_id), secs)),
                }
            })
            .collect()
    }
}
