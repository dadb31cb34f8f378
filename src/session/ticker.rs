//! Rotating loading message.
//!
//! While an analysis is in flight the page cycles through a fixed list of
//! progress messages. The rotation is purely cosmetic and lives exactly as
//! long as its [`LoadingTicker`]: dropping the ticker aborts the background
//! task, so no periodic callback outlives the loading state.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

/// Shown in order, wrapping from the last back to the first.
pub const LOADING_MESSAGES: [&str; 5] = [
    "H2H ডাটা স্ক্যান করা হচ্ছে...",
    "দলের বর্তমান ফর্ম বিশ্লেষণ করা হচ্ছে...",
    "রেফারি এবং লিগ স্ট্যাটস যাচাই করা হচ্ছে...",
    "xG এবং ট্যাকটিকাল মডেলে ইনপুট দেওয়া হচ্ছে...",
    "চূড়ান্ত প্রেডিকশন জেনারেট করা হচ্ছে...",
];

/// Default rotation period.
pub const DEFAULT_ROTATE_INTERVAL: Duration = Duration::from_millis(2500);

/// Scoped handle on the rotation task.
pub struct LoadingTicker {
    step: Arc<AtomicUsize>,
    handle: JoinHandle<()>,
}

impl LoadingTicker {
    /// Start rotating from the first message. Must be called inside a tokio runtime.
    pub fn start(period: Duration) -> Self {
        let step = Arc::new(AtomicUsize::new(0));
        let task_step = Arc::clone(&step);
        let handle = tokio::spawn(async move {
            // First advance happens one full period after start.
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let _ = task_step.fetch_update(Ordering::Relaxed, Ordering::Relaxed, |s| {
                    Some((s + 1) % LOADING_MESSAGES.len())
                });
            }
        });
        LoadingTicker { step, handle }
    }

    pub fn step(&self) -> usize {
        self.step.load(Ordering::Relaxed)
    }

    pub fn message(&self) -> &'static str {
        LOADING_MESSAGES[self.step()]
    }

    /// Whether the rotation task is still scheduled.
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for LoadingTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
