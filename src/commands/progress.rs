//! Spinner shown on stderr while GitHub requests are outstanding.

use crate::transport::{Transport, TransportError};
use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use core::time::Duration;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use url::Url;

#[derive(Debug)]
struct SpinnerState {
    start_time: Instant,
    delay: Duration,
    visible: AtomicBool,
    issued: AtomicU64,
    completed: AtomicU64,
}

/// A request-counting spinner that stays hidden for the first `delay`.
///
/// Quick evaluations (for example when everything is cached) finish without any flicker.
#[derive(Debug, Clone)]
pub struct Progress {
    bar: ProgressBar,
    state: Arc<SpinnerState>,
    enabled: bool,
}

impl Progress {
    #[must_use]
    pub fn new(delay: Duration, enabled: bool) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{prefix:>12.bold.cyan} {spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_prefix("Evaluating");

        Self {
            bar,
            state: Arc::new(SpinnerState {
                start_time: Instant::now(),
                delay,
                visible: AtomicBool::new(false),
                issued: AtomicU64::new(0),
                completed: AtomicU64::new(0),
            }),
            enabled,
        }
    }

    /// Show the spinner if it is enabled and the delay has elapsed.
    fn ensure_visible(&self) {
        if self.enabled && !self.state.visible.load(Ordering::Relaxed) && self.state.start_time.elapsed() >= self.state.delay {
            self.state.visible.store(true, Ordering::Relaxed);
            self.bar.set_draw_target(ProgressDrawTarget::stderr_with_hz(10));
            self.bar.enable_steady_tick(Duration::from_millis(100));
        }
    }

    pub fn request_issued(&self) {
        let _ = self.state.issued.fetch_add(1, Ordering::Relaxed);
        self.update();
    }

    pub fn request_completed(&self) {
        let _ = self.state.completed.fetch_add(1, Ordering::Relaxed);
        self.update();
    }

    /// `(completed, issued)` request counts.
    #[must_use]
    pub fn counts(&self) -> (u64, u64) {
        (self.state.completed.load(Ordering::Relaxed), self.state.issued.load(Ordering::Relaxed))
    }

    fn update(&self) {
        self.ensure_visible();
        let (completed, issued) = self.counts();
        self.bar.set_message(format!("{completed}/{issued} GitHub requests"));
    }

    pub fn finish_and_clear(&self) {
        if self.state.visible.load(Ordering::Relaxed) {
            self.bar.finish_and_clear();
        }
    }
}

/// Transport decorator that reports each request to a [`Progress`].
#[derive(Debug)]
pub struct TrackedTransport<T> {
    inner: T,
    progress: Progress,
}

impl<T> TrackedTransport<T> {
    #[must_use]
    pub const fn new(inner: T, progress: Progress) -> Self {
        Self { inner, progress }
    }
}

impl<T: Transport> Transport for TrackedTransport<T> {
    async fn fetch(&self, url: &Url) -> Result<Value, TransportError> {
        self.progress.request_issued();
        let result = self.inner.fetch(url).await;
        self.progress.request_completed();
        result
    }
}
