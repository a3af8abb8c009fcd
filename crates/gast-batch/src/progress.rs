//! Terminal progress display for batch runs.

use indicatif::{ProgressBar, ProgressStyle};

/// A progress bar over the files of one run. Hidden unless requested.
pub struct BatchProgress {
    bar: ProgressBar,
    failures: u64,
}

impl BatchProgress {
    pub fn new(total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {prefix:.bold} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .expect("valid template")
                .progress_chars("##-"),
        );
        bar.set_prefix("normalize");
        Self { bar, failures: 0 }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            failures: 0,
        }
    }

    /// Advance by one written result.
    pub fn tick(&mut self, failed: bool) {
        if failed {
            self.failures += 1;
            self.bar.set_message(format!("{} failed", self.failures));
        }
        self.bar.inc(1);
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
