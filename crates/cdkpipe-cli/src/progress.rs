//! Terminal spinner implementing the progress port.
//!
//! One spinner per labelled unit of work. The outcome line is printed to
//! stderr after the spinner is cleared, so it is visible whether or not
//! stderr is a terminal.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tracing::debug;

use cdkpipe_core::application::ports::ProgressReporter;

/// Spinner on stderr.
pub struct SpinnerReporter {
    bar: Mutex<Option<ProgressBar>>,
    no_color: bool,
}

impl SpinnerReporter {
    pub fn new(no_color: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            no_color,
        }
    }

    fn take_bar(&self) -> Option<ProgressBar> {
        self.bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    fn finish(&self, line: String) {
        if let Some(bar) = self.take_bar() {
            bar.finish_and_clear();
        }
        eprintln!("{line}");
    }
}

impl ProgressReporter for SpinnerReporter {
    fn started(&self, label: &str) {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.magenta} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
        );
        bar.set_message(label.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));

        let previous = self
            .bar
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(bar);
        if let Some(previous) = previous {
            previous.finish_and_clear();
        }
    }

    fn succeeded(&self, label: &str) {
        self.finish(success_line(label, self.no_color));
    }

    fn failed(&self, label: &str, error: &str) {
        debug!(step = label, error, "step failed");
        self.finish(failure_line(label, self.no_color));
    }

    fn detail(&self, text: &str) {
        let guard = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(bar) => bar.suspend(|| println!("{text}")),
            None => println!("{text}"),
        }
    }
}

fn success_line(label: &str, no_color: bool) -> String {
    if no_color {
        format!("\u{2713} {label}") // ✓
    } else {
        format!("{} {}", "\u{2713}".green().bold(), label)
    }
}

fn failure_line(label: &str, no_color: bool) -> String {
    if no_color {
        format!("\u{2717} {label}") // ✗
    } else {
        format!("{} {}", "\u{2717}".red().bold(), label.red())
    }
}
