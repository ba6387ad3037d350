use std::time::Duration;

use tokio::time::{sleep_until, Instant};
use tracing::debug;

/// Trailing-edge debounce for window width changes.
///
/// Height-only changes never schedule anything. Each new width restarts the
/// quiet period and only the most recent width is delivered.
#[derive(Debug, Clone)]
pub struct ResizeDebouncer {
    delay: Duration,
    last_width: f64,
    pending: Option<(f64, Instant)>,
}

impl ResizeDebouncer {
    pub fn new(delay: Duration, initial_width: f64) -> Self {
        Self {
            delay,
            last_width: initial_width,
            pending: None,
        }
    }

    pub fn width(&self) -> f64 {
        self.last_width
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|(_, deadline)| deadline)
    }

    /// Records a resize. Returns whether a relayout is now scheduled.
    pub fn observe(&mut self, width: f64, now: Instant) -> bool {
        if width == self.last_width {
            return false;
        }
        self.last_width = width;
        self.pending = Some((width, now + self.delay));
        true
    }

    /// Delivers the pending width once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<f64> {
        match self.pending {
            Some((width, deadline)) if now >= deadline => {
                self.pending = None;
                debug!(width, "Resize settled");
                Some(width)
            }
            _ => None,
        }
    }

    /// Waits out the quiet period. Returns `None` when nothing is pending.
    pub async fn settle(&mut self) -> Option<f64> {
        let deadline = self.deadline()?;
        sleep_until(deadline).await;
        self.poll(Instant::now())
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_height_only_changes_ignored() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(350), 1200.0);
        assert!(!debouncer.observe(1200.0, Instant::now()));
        assert_eq!(debouncer.settle().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_last_width_wins() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(350), 1200.0);
        let start = Instant::now();
        assert!(debouncer.observe(1000.0, start));
        tokio::time::advance(Duration::from_millis(200)).await;
        assert!(debouncer.observe(900.0, Instant::now()));

        // The first deadline has passed but was replaced
        tokio::time::advance(Duration::from_millis(200)).await;
        assert_eq!(debouncer.poll(Instant::now()), None);

        assert_eq!(debouncer.settle().await, Some(900.0));
        assert_eq!(Instant::now() - start, Duration::from_millis(550));
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let mut debouncer = ResizeDebouncer::new(Duration::from_millis(350), 800.0);
        debouncer.observe(640.0, Instant::now());
        debouncer.cancel();
        assert_eq!(debouncer.settle().await, None);
        assert_eq!(debouncer.width(), 640.0);
    }
}
