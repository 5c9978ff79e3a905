//! An indicatif-backed progress sink for interactive runs.

use indicatif::{ProgressBar, ProgressStyle};

use biorec_import::ProgressSink;

/// Drives a terminal progress bar from the importer's phase messages.
///
/// The importer reports percentages in `0..=100`; the bar tracks them
/// directly. A hidden bar keeps redirected and `--no-progress` runs quiet.
pub struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    pub fn new(hidden: bool) -> Self {
        let bar = if hidden {
            ProgressBar::hidden()
        } else {
            ProgressBar::new(100)
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{wide_bar:.cyan/blue}] {pos:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        bar.set_style(style);
        Self { bar }
    }
}

impl ProgressSink for BarProgress {
    fn start(&mut self, label: &str) {
        self.bar.set_position(0);
        self.bar.set_message(label.to_string());
    }

    fn message(&mut self, label: &str, percent: Option<i32>) {
        if let Some(percent) = percent {
            self.bar.set_position(percent.clamp(0, 100) as u64);
        }
        self.bar.set_message(label.to_string());
    }

    fn end(&mut self, label: &str) {
        self.bar.finish_with_message(label.to_string());
    }
}
