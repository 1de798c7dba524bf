//! Per-region spinner lines.
//!
//! On a terminal every region gets one line that ends with its row count.
//! Piped or under cron nothing is drawn and the log lines carry the progress.

use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const REGION_TEMPLATE: &str = "{spinner:.green} {prefix:>2.cyan.bold} {elapsed:>4} {wide_msg}";

/// Owns the `MultiProgress` that region lines and the log bridge share.
pub struct ProgressContext {
    multi: MultiProgress,
    is_tty: bool,
}

impl ProgressContext {
    /// Draw only when stderr is a terminal.
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            is_tty: std::io::stderr().is_terminal(),
        }
    }

    pub fn hidden() -> Self {
        Self {
            multi: MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
            is_tty: false,
        }
    }

    /// Spinner for one region, already showing "fetching...".
    ///
    /// The caller finishes it with the outcome (`finish_with_message` on
    /// success, `abandon_with_message` when the region aborts the run).
    pub fn region_line(&self, code: &str) -> ProgressBar {
        if !self.is_tty {
            return ProgressBar::hidden();
        }
        let pb = self.multi.add(ProgressBar::new_spinner());
        if let Ok(style) = ProgressStyle::with_template(REGION_TEMPLATE) {
            pb.set_style(style);
        }
        pb.set_prefix(code.to_string());
        pb.set_message("fetching...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn is_tty(&self) -> bool {
        self.is_tty
    }

    /// Handle for [`crate::init_logging`], so log lines print above the spinners.
    pub fn multi(&self) -> &MultiProgress {
        &self.multi
    }
}

impl Default for ProgressContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Format number with thousand separators.
pub fn fmt_num(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
