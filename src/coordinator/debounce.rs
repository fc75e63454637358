//! Debounces rapid-fire document changes before triggering a reconversion
//! (spec.md §5: "edits are debounced... default 1000ms"). Wraps
//! `tokio::time::sleep` the way the teacher's `watch` module wraps
//! `notify`'s raw filesystem events behind its own timer abstraction,
//! rather than exposing the tokio primitive directly to callers.

use std::time::Duration;

/// Default debounce delay (spec.md §5).
pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

/// A single-shot debounce timer. Each call to `fire` replaces whatever the
/// caller was previously waiting on — callers are expected to restart the
/// returned future on every new edit and only act once it resolves.
#[derive(Debug, Default, Clone, Copy)]
pub struct Debouncer {
    delay: Option<Duration>,
}

impl Debouncer {
    pub fn new() -> Self {
        Self { delay: None }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self { delay: Some(delay) }
    }

    fn delay(&self) -> Duration {
        self.delay.unwrap_or(DEFAULT_DELAY)
    }

    /// Returns a future that resolves after this debouncer's delay. Callers
    /// hold a handle (e.g. a `tokio::select!` arm) and cancel it by dropping
    /// the future when a newer edit arrives.
    pub fn fire(&self, delay: Duration) -> impl std::future::Future<Output = ()> {
        tokio::time::sleep(delay)
    }

    /// Convenience entry point using this debouncer's configured delay.
    pub fn fire_default(&self) -> impl std::future::Future<Output = ()> {
        tokio::time::sleep(self.delay())
    }
}
