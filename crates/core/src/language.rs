use serde::{Deserialize, Serialize};

/// Output languages a summary can be produced in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SummaryLanguage {
    #[default]
    English,
    TraditionalChinese,
    SimplifiedChinese,
}

impl SummaryLanguage {
    pub const ALL: [SummaryLanguage; 3] = [
        SummaryLanguage::English,
        SummaryLanguage::TraditionalChinese,
        SummaryLanguage::SimplifiedChinese,
    ];

    /// Language code understood by the transcript and translation providers
    pub fn code(&self) -> &'static str {
        match self {
            SummaryLanguage::English => "en",
            SummaryLanguage::TraditionalChinese => "zh-TW",
            SummaryLanguage::SimplifiedChinese => "zh-CN",
        }
    }

    /// Human-readable name, used inside prompts
    pub fn name(&self) -> &'static str {
        match self {
            SummaryLanguage::English => "English",
            SummaryLanguage::TraditionalChinese => "Traditional Chinese",
            SummaryLanguage::SimplifiedChinese => "Simplified Chinese",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|lang| lang.code().eq_ignore_ascii_case(code))
    }
}

/// Prompt-friendly name for an arbitrary language code.
pub fn display_name(code: &str) -> String {
    SummaryLanguage::from_code(code)
        .map(|lang| lang.name().to_string())
        .unwrap_or_else(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_resolve_case_insensitively() {
        assert_eq!(
            SummaryLanguage::from_code("zh-tw"),
            Some(SummaryLanguage::TraditionalChinese)
        );
        assert_eq!(SummaryLanguage::from_code("EN"), Some(SummaryLanguage::English));
        assert_eq!(SummaryLanguage::from_code("fr"), None);
    }

    #[test]
    fn unknown_codes_keep_their_code_as_name() {
        assert_eq!(display_name("zh-CN"), "Simplified Chinese");
        assert_eq!(display_name("de"), "de");
    }
}
