// SPDX-License-Identifier: GPL-3.0-or-later

use flacquer_application::DownloadProgress;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;

/// Renders download progress as a terminal byte bar.
///
/// Only one download runs at a time, so a single slot is enough; a new
/// `begin` replaces whatever bar a failed attempt may have left behind.
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }
}

impl Default for TerminalProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadProgress for TerminalProgress {
    fn begin(&self, filename: &str, total_bytes: u64) {
        let bar = ProgressBar::new(total_bytes);
        bar.set_style(
            ProgressStyle::with_template(
                "{msg}\n[{elapsed_precise}] {bar:40.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec})",
            )
            .expect("valid progress template")
            .progress_chars("##-"),
        );
        bar.set_message(filename.to_string());
        *self.bar.lock().unwrap() = Some(bar);
    }

    fn advance(&self, bytes: u64) {
        if let Some(bar) = self.bar.lock().unwrap().as_ref() {
            bar.inc(bytes);
        }
    }

    fn finish(&self) {
        if let Some(bar) = self.bar.lock().unwrap().take() {
            bar.finish();
        }
    }
}
