use std::time::{Duration, Instant};

/// Default quiescence window between the first edit of a burst and the recomputation.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(500);

/// Fixed-window throttle for classification runs.
///
/// The first notification of a burst arms a one-shot deadline; later
/// notifications neither reset nor extend it. Once the deadline has been
/// consumed by [`DebounceScheduler::fire`], the next notification arms a fresh
/// window. The host drives time by passing `now` and polling at
/// [`DebounceScheduler::deadline`].
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    window: Duration,
    deadline: Option<Instant>,
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl DebounceScheduler {
    /// Scheduler with the given quiescence window.
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Quiescence window.
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Record a buffer mutation. Returns `true` if this call armed the timer.
    pub fn notify(&mut self, now: Instant) -> bool {
        if self.deadline.is_some() {
            return false;
        }
        self.deadline = Some(now + self.window);
        true
    }

    /// Whether a recomputation is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// When the pending recomputation is due.
    #[must_use]
    pub const fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left until the pending recomputation is due, zero if overdue.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consume the deadline if it has passed. Returns `true` when a run is due.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Drop any pending recomputation.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Duration = Duration::from_millis(500);

    #[test]
    fn first_notification_arms_the_window() {
        let start = Instant::now();
        let mut scheduler = DebounceScheduler::new(WINDOW);

        assert!(!scheduler.is_pending());
        assert!(scheduler.notify(start));
        assert_eq!(scheduler.deadline(), Some(start + WINDOW));
    }

    #[test]
    fn later_notifications_do_not_extend_the_deadline() {
        let start = Instant::now();
        let mut scheduler = DebounceScheduler::new(WINDOW);

        scheduler.notify(start);
        assert!(!scheduler.notify(start + Duration::from_millis(200)));
        assert!(!scheduler.notify(start + Duration::from_millis(499)));

        assert_eq!(scheduler.deadline(), Some(start + WINDOW));
        assert!(scheduler.fire(start + WINDOW));
    }

    #[test]
    fn fire_waits_for_the_deadline() {
        let start = Instant::now();
        let mut scheduler = DebounceScheduler::new(WINDOW);

        assert!(!scheduler.fire(start + WINDOW));
        scheduler.notify(start);
        assert!(!scheduler.fire(start + Duration::from_millis(100)));
        assert_eq!(
            scheduler.remaining(start + Duration::from_millis(100)),
            Some(Duration::from_millis(400))
        );
        assert!(scheduler.fire(start + Duration::from_millis(600)));
        assert!(!scheduler.is_pending());
        assert!(!scheduler.fire(start + Duration::from_millis(700)));
    }

    #[test]
    fn notification_after_firing_arms_a_fresh_window() {
        let start = Instant::now();
        let mut scheduler = DebounceScheduler::new(WINDOW);

        scheduler.notify(start);
        scheduler.fire(start + WINDOW);

        let later = start + Duration::from_secs(2);
        assert!(scheduler.notify(later));
        assert_eq!(scheduler.deadline(), Some(later + WINDOW));
    }

    #[test]
    fn cancel_clears_pending_run() {
        let start = Instant::now();
        let mut scheduler = DebounceScheduler::default();
        assert_eq!(scheduler.window(), DEFAULT_WINDOW);

        scheduler.notify(start);
        scheduler.cancel();
        assert!(!scheduler.fire(start + DEFAULT_WINDOW));
        assert_eq!(scheduler.remaining(start), None);
    }
}
