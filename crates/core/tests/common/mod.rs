//! Shared fixtures for tests that run against a mockito server.

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use vidsum_core::Settings;

pub const TRANSCRIPT_PATH: &str = "/transcript";
pub const CHAT_PATH: &str = "/chat/completions";
pub const TRANSLATE_PATH: &str = "/translate";

/// Settings pointing every provider at the mock server
pub fn settings(server: &ServerGuard) -> Settings {
    let raw = format!(
        r#"
[GITHUB]
GITHUB_API_KEY = "gh-test-key"
GITHUB_ENDPOINT = "{url}{chat}"
GITHUB_MODEL = "gpt-4o-mini"

[TRANSCRIPT]
TRANSCRIPT_ENDPOINT = "{url}{transcript}"
TRANSCRIPT_PASSWORD = "s3cret"

[pipeline]
max_tokens = 700
timeout_seconds = 5
"#,
        url = server.url(),
        chat = CHAT_PATH,
        transcript = TRANSCRIPT_PATH,
    );
    Settings::from_toml_str(&raw).expect("test settings parse")
}

pub fn settings_with_translation_endpoint(server: &ServerGuard) -> Settings {
    let mut settings = settings(server);
    settings.translation.endpoint = Some(format!("{}{}", server.url(), TRANSLATE_PATH));
    settings
}

pub fn transcript_query(video_id: &str, language_code: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("video_id".into(), video_id.into()),
        Matcher::UrlEncoded("language_code".into(), language_code.into()),
        Matcher::UrlEncoded("password".into(), "s3cret".into()),
    ])
}

pub fn transcript_body(texts: &[&str]) -> String {
    let segments: Vec<_> = texts
        .iter()
        .enumerate()
        .map(|(i, text)| serde_json::json!({ "text": text, "start": i as f64 * 2.5 }))
        .collect();
    serde_json::json!({ "transcript": segments }).to_string()
}

pub fn completion_body(content: &str) -> String {
    serde_json::json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    })
    .to_string()
}

pub async fn mock_transcript(
    server: &mut ServerGuard,
    video_id: &str,
    language_code: &str,
    status: usize,
    body: &str,
) -> Mock {
    server
        .mock("GET", TRANSCRIPT_PATH)
        .match_query(transcript_query(video_id, language_code))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .expect(1)
        .create_async()
        .await
}
