//! Output formatting and progress display

use crate::cli::args::{OutputFormat, VerbosityLevel};
use crate::core::report::{AnalysisOutcome, ChannelReport, VideoWithComments};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write;
use std::time::Duration;

/// Output formatter for pulse
pub struct OutputFormatter {
    verbosity: VerbosityLevel,
    format: OutputFormat,
    spinner: Option<ProgressBar>,
}

impl OutputFormatter {
    /// Create a new output formatter
    pub fn new(verbosity: VerbosityLevel, format: OutputFormat) -> Self {
        Self {
            verbosity,
            format,
            spinner: None,
        }
    }

    /// Show a spinner on stderr while a link is analyzed
    pub fn start_spinner(&mut self, link: &str) -> Option<ProgressBar> {
        if self.verbosity == VerbosityLevel::Quiet {
            return None;
        }

        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.set_message(format!("Analyzing {}", link));
        spinner.enable_steady_tick(Duration::from_millis(120));

        self.spinner = Some(spinner.clone());
        Some(spinner)
    }

    /// Clear the spinner
    pub fn finish_spinner(&self) {
        if let Some(spinner) = &self.spinner {
            spinner.finish_and_clear();
        }
    }

    /// Print the outcome of an analysis to stdout
    pub fn print_outcome(&self, outcome: &AnalysisOutcome) -> Result<(), serde_json::Error> {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
            OutputFormat::Summary => print!("{}", render_summary(outcome)),
        }
        Ok(())
    }

    /// Print success message
    pub fn success(&self, message: &str) {
        if self.verbosity != VerbosityLevel::Quiet {
            eprintln!("{} {}", "✔".green(), message);
        }
    }

    /// Print error message
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✘".red(), message);
    }

    /// Print debug message
    pub fn debug(&self, message: &str) {
        if self.verbosity == VerbosityLevel::Verbose {
            eprintln!("{} {}", "·".dimmed(), message);
        }
    }
}

/// Human-readable overview of an outcome
pub fn render_summary(outcome: &AnalysisOutcome) -> String {
    let mut out = String::new();
    match outcome {
        AnalysisOutcome::Channel(report) => render_channel(&mut out, report),
        AnalysisOutcome::Video(report) => {
            let video = &report.current_video_details;
            let _ = writeln!(out, "{} {}", "Video".bold(), video.title());
            let _ = writeln!(
                out,
                "  id {} | {} views | {} likes | {} comments",
                video.id,
                format_count(video.view_count()),
                format_count(video.like_count()),
                format_count(video.comment_count())
            );
            for thread in report.current_video_comments.iter().take(3) {
                let _ = writeln!(out, "  {} {}", thread.author().cyan(), first_line(thread.text()));
            }
            let _ = writeln!(out);

            match (&report.channel, &report.error) {
                (Some(channel), _) => render_channel(&mut out, channel),
                (None, Some(error)) => {
                    let _ = writeln!(out, "{} {}", "Channel unavailable:".yellow(), error);
                }
                (None, None) => {}
            }
        }
        AnalysisOutcome::Status { status } => {
            let _ = writeln!(out, "{}", status.yellow());
        }
        AnalysisOutcome::Error { error } => {
            let _ = writeln!(out, "{} {}", "Error:".red().bold(), error);
        }
    }
    out
}

fn render_channel(out: &mut String, report: &ChannelReport) {
    let channel = &report.channel_details;
    let _ = writeln!(out, "{} {}", "Channel".bold(), channel.title());
    let _ = writeln!(
        out,
        "  id {} | {} subscribers | {} videos | {} views",
        report.channel_id,
        format_count(channel.subscriber_count()),
        format_count(channel.video_count()),
        format_count(channel.view_count())
    );
    let _ = writeln!(out, "  {} uploads considered", report.all_videos_summary.len());

    render_window(out, "Most popular", &report.most_popular_videos);
    render_window(out, "Least popular", &report.least_popular_videos);
}

fn render_window(out: &mut String, heading: &str, videos: &[VideoWithComments]) {
    if videos.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", heading.green().bold());
    for (index, entry) in videos.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {:>2}. {} ({} views, {} comments fetched)",
            index + 1,
            entry.video.title(),
            format_count(entry.video.view_count()),
            entry.comments.len()
        );
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or("")
}

/// Format a count with thousands separators
fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut formatted = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            formatted.push(',');
        }
        formatted.push(c);
    }
    formatted
}
