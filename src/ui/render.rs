//! Spinner and preview card

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::core::events::EventSink;
use crate::types::{PipelineEvent, ResultRecord};

/// Shows each status message on a spinner; reports problems on stderr.
pub struct SpinnerSink {
    spinner: ProgressBar,
}

impl SpinnerSink {
    pub fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.magenta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        Self { spinner }
    }
}

impl Default for SpinnerSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for SpinnerSink {
    fn emit(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::Status {
                index,
                total,
                message,
            } => {
                if index == 0 {
                    self.spinner.enable_steady_tick(Duration::from_millis(100));
                }
                let counter = format!("[{}/{}]", index + 1, total);
                self.spinner.set_message(format!("{} {}", counter.dimmed(), message));
            }
            PipelineEvent::Completed(_) => self.spinner.finish_and_clear(),
            PipelineEvent::Rejected { message, .. } => {
                eprintln!("{} {}", "⚠️".yellow(), message.yellow());
            }
            PipelineEvent::Failed { message } => {
                self.spinner.finish_and_clear();
                eprintln!("{}", message.red());
            }
        }
    }
}

/// Preview card for a finished run
pub fn format_card(record: &ResultRecord) -> String {
    let info = &record.quality_info;
    let mut lines = vec![
        format!("🎬 {}", record.title.bold()),
        format!("👤 {} {}", "Creator:".dimmed(), record.author.cyan()),
        format!("📊 {} {}", "Quality:".dimmed(), info.name),
        format!("📏 {} {}", "Resolution:".dimmed(), info.resolution),
        format!("📦 {} {}", "File Size:".dimmed(), info.size),
        format!("⏱️ {} {}", "Duration:".dimmed(), record.duration),
        format!("🖼️ {} {}", "Thumbnail:".dimmed(), record.thumbnail),
        format!("✅ {} {}", "Status:".dimmed(), "Ready to download".green()),
        String::new(),
    ];
    lines.extend(record.downloads.iter().map(|link| format!("  {}", link.label)));
    lines.join("\n")
}
