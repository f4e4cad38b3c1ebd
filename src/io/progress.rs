//! Progress display for leaf matching

use crate::io::configuration::PROGRESS_BAR_WIDTH;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::LazyLock;

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    let template = format!(
        "[{{elapsed_precise}}] {{msg}} [{{bar:{PROGRESS_BAR_WIDTH}.cyan/blue}}] {{pos}}/{{len}} ({{per_sec}})"
    );
    ProgressStyle::default_bar()
        .template(&template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

/// Counts matched leaves while workers run
///
/// Cloning shares the underlying bar, so a single instance can be ticked from
/// every rayon worker.
#[derive(Clone)]
pub struct MatchProgress {
    bar: ProgressBar,
}

impl MatchProgress {
    /// Create a progress display for `leaf_count` leaves
    ///
    /// A hidden display still counts, it just never draws.
    pub fn new(leaf_count: usize, visible: bool) -> Self {
        let bar = ProgressBar::with_draw_target(
            Some(leaf_count as u64),
            if visible {
                ProgressDrawTarget::stderr()
            } else {
                ProgressDrawTarget::hidden()
            },
        );
        bar.set_style(PROGRESS_STYLE.clone());
        bar.set_message("Gazing");
        Self { bar }
    }

    /// Record one matched leaf
    pub fn tick(&self) {
        self.bar.inc(1);
    }

    /// Leaves matched so far
    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Total leaves expected
    pub fn length(&self) -> Option<u64> {
        self.bar.length()
    }

    /// Remove the bar from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
