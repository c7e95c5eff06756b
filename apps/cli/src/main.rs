use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use vidsum_core::{
    DetailLevel, Progress, Settings, Stage, SummarizeOptions, Summarizer, SummaryLanguage,
    TimestampMode, format_report_readable, format_transcript_with_timestamps, save_html,
};

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", secs / 60.0, secs % 60.0)
    }
}

/// CLI wrapper for SummaryLanguage (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliLanguage {
    #[default]
    En,
    ZhTw,
    ZhCn,
}

impl From<CliLanguage> for SummaryLanguage {
    fn from(cli: CliLanguage) -> Self {
        match cli {
            CliLanguage::En => SummaryLanguage::English,
            CliLanguage::ZhTw => SummaryLanguage::TraditionalChinese,
            CliLanguage::ZhCn => SummaryLanguage::SimplifiedChinese,
        }
    }
}

#[derive(Clone, Copy, Default, ValueEnum)]
enum CliDetail {
    #[default]
    Basic,
    Detailed,
    Concise,
    Fun,
}

impl From<CliDetail> for DetailLevel {
    fn from(cli: CliDetail) -> Self {
        match cli {
            CliDetail::Basic => DetailLevel::Basic,
            CliDetail::Detailed => DetailLevel::Detailed,
            CliDetail::Concise => DetailLevel::Concise,
            CliDetail::Fun => DetailLevel::Fun,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum CliTimestamps {
    Interval,
    Placeholder,
}

impl From<CliTimestamps> for TimestampMode {
    fn from(cli: CliTimestamps) -> Self {
        match cli {
            CliTimestamps::Interval => TimestampMode::Interval,
            CliTimestamps::Placeholder => TimestampMode::Placeholder,
        }
    }
}

#[derive(Parser)]
#[command(name = "vidsum")]
#[command(about = "Summarize YouTube videos from their transcripts with an LLM provider")]
struct Cli {
    /// Video URL (youtube.com/watch?v=... or youtu.be/...)
    url: String,

    /// Summary language
    #[arg(short, long, default_value = "en")]
    lang: CliLanguage,

    /// Summary detail level
    #[arg(short, long, default_value = "basic")]
    detail: CliDetail,

    /// Credentials file (defaults to ./credentials.toml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the summary as an HTML document to this path
    #[arg(long)]
    html: Option<PathBuf>,

    /// Print the fetched transcript before the summary
    #[arg(long)]
    show_transcript: bool,

    /// Token cap for each completion request
    #[arg(long)]
    max_tokens: Option<u32>,

    /// How section timestamps are derived
    #[arg(long)]
    timestamps: Option<CliTimestamps>,

    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long)]
    verbose: bool,
}

fn create_spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")
            .expect("static spinner template"),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| default_level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

/// Spinner and timing state driven by the pipeline's progress events
struct Steps<'a> {
    language: SummaryLanguage,
    detail_level: DetailLevel,
    summarizer: &'a Summarizer,
    show_transcript: bool,
    spinner: Option<ProgressBar>,
    step_start: Instant,
}

impl Steps<'_> {
    fn on_progress(&mut self, progress: Progress<'_>) {
        match progress {
            Progress::Resolved { video_id } => {
                println!(
                    "{} Video: {}",
                    style("✓").green().bold(),
                    style(video_id).yellow()
                );
            }
            Progress::Started(stage) => {
                self.step_start = Instant::now();
                self.spinner = Some(create_spinner(&self.stage_message(stage)));
            }
            Progress::TranscriptReady {
                transcript,
                available,
            } => {
                if available {
                    self.finish(format!(
                        "{} Transcript: {} segments, {} {}",
                        style("✓").green().bold(),
                        transcript.segments.len(),
                        style(&transcript.language).yellow(),
                        self.elapsed()
                    ));
                } else {
                    self.finish(format!(
                        "{} No transcript available, summarizing without one",
                        style("!").yellow().bold()
                    ));
                }

                if self.show_transcript && available {
                    println!("{}", style("─".repeat(60)).dim());
                    println!("{}", format_transcript_with_timestamps(transcript));
                    println!("{}", style("─".repeat(60)).dim());
                }
            }
            Progress::SummaryReady => {
                self.finish(format!(
                    "{} Summary generated ({}) {}",
                    style("✓").green().bold(),
                    self.summarizer.generator().provider().name(),
                    self.elapsed()
                ));
            }
            Progress::TranslationReady { changed } => {
                let mark = if changed {
                    style("✓").green().bold()
                } else {
                    style("!").yellow().bold()
                };
                self.finish(format!(
                    "{} Translated to {} {}",
                    mark,
                    self.language.name(),
                    self.elapsed()
                ));
            }
        }
    }

    fn stage_message(&self, stage: Stage) -> String {
        match stage {
            Stage::Transcript => format!("Fetching {} transcript...", self.language.code()),
            Stage::Summary => format!(
                "Generating {} summary with {}...",
                detail_level_name(self.detail_level),
                self.summarizer.generator().provider().name()
            ),
            Stage::Translation => format!(
                "Translating summary to {} ({})...",
                self.language.name(),
                self.summarizer.translator_name()
            ),
        }
    }

    fn elapsed(&self) -> String {
        style(format!("[{}]", format_duration(self.step_start.elapsed())))
            .dim()
            .to_string()
    }

    fn finish(&mut self, message: String) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(message);
        }
    }

    fn abandon(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = SummarizeOptions {
        language: cli.lang.into(),
        detail_level: cli.detail.into(),
    };

    // Load and validate configuration before touching the network
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(max_tokens) = cli.max_tokens {
        settings.pipeline.max_tokens = max_tokens;
    }
    if let Some(timestamps) = cli.timestamps {
        settings.pipeline.timestamp_strategy = timestamps.into();
    }
    let summarizer = Summarizer::from_settings(&settings)?;

    println!(
        "\n{}  {}\n",
        style("vidsum").cyan().bold(),
        style("Video Summarizer").dim()
    );

    let total_start = Instant::now();
    let mut steps = Steps {
        language: options.language,
        detail_level: options.detail_level,
        summarizer: &summarizer,
        show_transcript: cli.show_transcript,
        spinner: None,
        step_start: total_start,
    };

    let result = summarizer
        .summarize_with(&cli.url, &options, |progress| steps.on_progress(progress))
        .await;
    let report = match result {
        Ok(report) => report,
        Err(e) => {
            steps.abandon();
            return Err(e.into());
        }
    };

    println!(
        "\n{} {}\n",
        style("Total time:").dim(),
        style(format_duration(total_start.elapsed())).cyan().bold()
    );

    if let Some(path) = &cli.html {
        save_html(&report.summary.raw_text, path).await?;
        println!(
            "{} {}\n",
            style("Saved:").dim(),
            style(path.display()).cyan()
        );
    }

    println!("{}", style("─".repeat(60)).dim());

    if report.translated {
        println!("## Summary (original, {})\n", report.source_language);
        println!("{}\n", style(&report.original_text).dim());
    }

    // Human-readable output
    let readable = format_report_readable(&report);
    println!("{}", readable);

    Ok(())
}

fn detail_level_name(level: DetailLevel) -> &'static str {
    match level {
        DetailLevel::Basic => "basic",
        DetailLevel::Detailed => "detailed",
        DetailLevel::Concise => "concise",
        DetailLevel::Fun => "fun",
    }
}
