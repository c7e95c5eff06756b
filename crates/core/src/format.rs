use std::path::Path;

use tokio::fs;

use crate::{error::Result, pipeline::SummaryReport, sections::Section, transcript::Transcript};

/// Format seconds as MM:SS, or HH:MM:SS from one hour on
pub fn format_timestamp(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    let (hours, mins, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{:02}:{:02}", mins, secs)
    }
}

/// Format transcript segments with timestamps
pub fn format_transcript_with_timestamps(transcript: &Transcript) -> String {
    transcript
        .segments
        .iter()
        .map(|seg| {
            format!(
                "[{}] {}",
                format_timestamp(seg.start_offset_seconds),
                seg.text.trim()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_section(section: &Section) -> String {
    let mut output = format!("### [{}] {}\n\n", section.timestamp, section.title);
    if !section.body.is_empty() {
        output.push_str(&format!("{}\n\n", section.body));
    }
    if let Some(link) = &section.source_link {
        output.push_str(&format!("<{}>\n\n", link));
    }
    output
}

/// Format a summary report as human-readable markdown
pub fn format_report_readable(report: &SummaryReport) -> String {
    let mut output = String::new();

    output.push_str("# Video Summary\n\n");
    output.push_str(&format!(
        "**Video:** {} | **Language:** {}",
        report.video.raw_url.trim(),
        report.target_language
    ));
    if report.translated {
        output.push_str(&format!(" (translated from {})", report.source_language));
    }
    output.push_str("\n\n");

    if !report.transcript_available {
        output.push_str("_No transcript was available; the summary is based on a placeholder._\n\n");
    }

    if report.summary.sections.is_empty() {
        output.push_str("## Summary\n\n");
        output.push_str(&report.summary.raw_text);
        output.push_str("\n\n");
    } else {
        output.push_str("## Sections\n\n");
        for section in &report.summary.sections {
            output.push_str(&format_section(section));
        }
    }

    output
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Minimal downloadable HTML document embedding the summary text
pub fn render_html(summary: &str) -> String {
    format!(
        "<html><body><h1>Video Summary</h1><p>{}</p></body></html>",
        escape_html(summary)
    )
}

/// Write the HTML export to a file
pub async fn save_html(summary: &str, path: &Path) -> Result<()> {
    fs::write(path, render_html(summary)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcript::TranscriptSegment;

    #[test]
    fn timestamps_are_minutes_and_seconds() {
        assert_eq!(format_timestamp(0.0), "00:00");
        assert_eq!(format_timestamp(75.9), "01:15");
        assert_eq!(format_timestamp(3_599.0), "59:59");
        assert_eq!(format_timestamp(3_600.0), "01:00:00");
        assert_eq!(format_timestamp(3_661.0), "01:01:01");
    }

    #[test]
    fn transcript_lines_carry_offsets() {
        let transcript = Transcript {
            segments: vec![
                TranscriptSegment {
                    text: " hello ".to_string(),
                    start_offset_seconds: 0.0,
                },
                TranscriptSegment {
                    text: "world".to_string(),
                    start_offset_seconds: 90.0,
                },
            ],
            language: "en".to_string(),
        };
        assert_eq!(
            format_transcript_with_timestamps(&transcript),
            "[00:00] hello\n[01:30] world"
        );
    }

    #[test]
    fn html_export_escapes_markup() {
        let html = render_html("Intro: <script>alert('x')</script> & \"more\"");
        assert_eq!(
            html,
            "<html><body><h1>Video Summary</h1><p>Intro: &lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;more&quot;</p></body></html>"
        );
    }

    #[tokio::test]
    async fn html_export_is_written_to_disk() {
        let path = std::env::temp_dir().join(format!("vidsum-export-{}.html", std::process::id()));
        save_html("plain", &path).await.unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("<p>plain</p>"));
        tokio::fs::remove_file(&path).await.unwrap();
    }
}
