//! Progress feedback while feeds are being fetched
//!
//! A spinner is drawn on stderr only when stderr is a terminal, so that piped
//! JSON on stdout is never interleaved with progress output.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Spinner shown while a command waits on the upstream feeds
#[derive(Debug)]
pub struct FetchSpinner {
    bar: Option<ProgressBar>,
}

impl FetchSpinner {
    /// Start a spinner with `message`
    ///
    /// Nothing is drawn when `enabled` is false or stderr is not a terminal.
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        if !enabled || !atty::is(atty::Stream::Stderr) {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            bar.set_style(style.tick_strings(&["◐", "◓", "◑", "◒"]));
        }
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(120));

        Self { bar: Some(bar) }
    }

    /// A spinner that never draws
    pub fn hidden() -> Self {
        Self { bar: None }
    }

    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }

    /// Replace the spinner message
    pub fn set_message(&self, message: impl Into<String>) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.into());
        }
    }

    /// Remove the spinner from the terminal
    pub fn finish(self) {
        if let Some(bar) = self.bar {
            bar.finish_and_clear();
        }
    }
}
