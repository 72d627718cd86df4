//! Per-file progress bars for in-flight downloads.

use std::collections::HashMap;
use std::sync::Mutex;

use emudl_core::download::ProgressObserver;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};

const BAR_TEMPLATE: &str =
    "{msg:30!} [{bar:30.cyan/blue}] {bytes}/{total_bytes} {bytes_per_sec} {eta}";
const SPINNER_TEMPLATE: &str = "{spinner} {msg:30!} {bytes} {bytes_per_sec}";

/// One bar per job, drawn on stderr. Also the place to print status lines
/// while bars are active so they do not tear.
pub struct BarProgress {
    multi: MultiProgress,
    bars: Mutex<HashMap<usize, ProgressBar>>,
}

impl BarProgress {
    /// Creates bars drawn to stderr, or a silent sink when `visible` is false.
    #[must_use]
    pub fn new(visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
        }
    }

    /// Prints `line` to stdout above any active bars.
    pub fn println(&self, line: &str) {
        self.multi.suspend(|| println!("{line}"));
    }

    fn bar_for(total_bytes: Option<u64>) -> ProgressBar {
        match total_bytes {
            Some(total) => ProgressBar::new(total).with_style(
                ProgressStyle::with_template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("=> "),
            ),
            None => ProgressBar::new_spinner().with_style(
                ProgressStyle::with_template(SPINNER_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            ),
        }
    }

    fn with_bars<T>(&self, f: impl FnOnce(&mut HashMap<usize, ProgressBar>) -> T) -> T {
        let mut bars = self
            .bars
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut bars)
    }
}

impl ProgressObserver for BarProgress {
    fn started(&self, index: usize, file_name: &str, total_bytes: Option<u64>) {
        let bar = self.multi.add(Self::bar_for(total_bytes));
        bar.set_message(file_name.to_string());
        self.with_bars(|bars| bars.insert(index, bar));
    }

    fn advanced(&self, index: usize, bytes: u64) {
        self.with_bars(|bars| {
            if let Some(bar) = bars.get(&index) {
                bar.inc(bytes);
            }
        });
    }

    fn finished(&self, index: usize) {
        if let Some(bar) = self.with_bars(|bars| bars.remove(&index)) {
            bar.finish_and_clear();
            self.multi.remove(&bar);
        }
    }
}
