use crate::error::{Result, VidsumError};

const WATCH_URL: &str = "https://www.youtube.com/watch?v=";

/// A user-supplied video link and the identifier extracted from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoReference {
    pub raw_url: String,
    pub video_id: Option<String>,
}

impl VideoReference {
    pub fn parse(url: &str) -> Self {
        Self {
            raw_url: url.to_string(),
            video_id: extract_video_id(url),
        }
    }

    /// The video id, or `InvalidReference` if none could be extracted
    pub fn id(&self) -> Result<&str> {
        self.video_id
            .as_deref()
            .ok_or_else(|| VidsumError::InvalidReference {
                url: self.raw_url.clone(),
            })
    }

    pub fn watch_url(&self) -> Option<String> {
        self.video_id.as_deref().map(watch_url)
    }
}

pub fn watch_url(video_id: &str) -> String {
    format!("{WATCH_URL}{video_id}")
}

/// Resolve a video link to its id.
///
/// Recognizes `...v=<id>[&...]` and `...youtu.be/<id>[?...]`. Anything else
/// is rejected rather than guessed at.
pub fn resolve(url: &str) -> Result<String> {
    extract_video_id(url).ok_or_else(|| VidsumError::InvalidReference {
        url: url.to_string(),
    })
}

fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();

    let id = if let Some((_, tail)) = url.rsplit_once("v=") {
        tail.split('&').next()
    } else if let Some((_, tail)) = url.rsplit_once("youtu.be/") {
        tail.split('?').next()
    } else {
        None
    }?;

    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_form_drops_trailing_parameters() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PLrAXtmRdnEQy&t=4").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(
            resolve("https://m.youtube.com/watch?feature=share&v=abc123").unwrap(),
            "abc123"
        );
    }

    #[test]
    fn short_link_form_drops_query() {
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            resolve("https://youtu.be/dQw4w9WgXcQ?t=30&si=xyz").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(resolve("  https://youtu.be/abc\n").unwrap(), "abc");
    }

    #[test]
    fn unrecognized_shapes_are_rejected() {
        for url in [
            "https://vimeo.com/12345",
            "https://www.youtube.com/channel/UC123",
            "",
            "https://www.youtube.com/watch?v=",
            "https://youtu.be/",
        ] {
            assert!(
                matches!(resolve(url), Err(VidsumError::InvalidReference { .. })),
                "{url} should be rejected"
            );
        }
    }

    #[test]
    fn reference_keeps_raw_url_and_builds_watch_link() {
        let reference = VideoReference::parse("https://youtu.be/abc?t=3");
        assert_eq!(reference.raw_url, "https://youtu.be/abc?t=3");
        assert_eq!(reference.id().unwrap(), "abc");
        assert_eq!(
            reference.watch_url().as_deref(),
            Some("https://www.youtube.com/watch?v=abc")
        );

        let bad = VideoReference::parse("not a link");
        assert!(bad.video_id.is_none());
        assert!(bad.id().is_err());
    }
}
