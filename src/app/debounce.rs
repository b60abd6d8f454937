//! Trailing-edge debouncer.
//!
//! Each `queue` replaces any pending payload and re-arms the timer; the
//! payload is released once a full quiet period has elapsed with no new
//! queues. The event loop drives it with a monotonic millisecond clock so
//! state transitions stay deterministic and testable.

/// Coalesces rapid triggers into one trailing release after `delay_ms` of
/// quiet.
#[derive(Debug)]
pub struct Debouncer<T> {
    delay_ms: u64,
    pending: Option<(T, u64)>,
}

impl<T> Debouncer<T> {
    pub const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    /// Arm (or re-arm) with a payload at `now_ms`, replacing any pending one.
    pub fn queue(&mut self, payload: T, now_ms: u64) {
        self.pending = Some((payload, now_ms));
    }

    /// Release the pending payload if the quiet period has elapsed.
    pub fn take_ready(&mut self, now_ms: u64) -> Option<T> {
        let (_, queued_at) = self.pending.as_ref()?;
        if now_ms.saturating_sub(*queued_at) >= self.delay_ms {
            self.pending.take().map(|(payload, _)| payload)
        } else {
            None
        }
    }

    /// Release the pending payload immediately, regardless of elapsed time.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|(payload, _)| payload)
    }

    /// Drop any pending payload without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_idle_debouncer_releases_nothing() {
        let mut debouncer: Debouncer<u32> = Debouncer::new(100);
        assert!(!debouncer.is_pending());
        assert_eq!(debouncer.take_ready(1_000), None);
    }

    #[test]
    fn test_release_only_after_quiet_period() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue("a", 0);
        assert_eq!(debouncer.take_ready(50), None);
        assert!(debouncer.is_pending());
        assert_eq!(debouncer.take_ready(100), Some("a"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_requeue_replaces_payload_and_restarts_timer() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue("first", 0);
        debouncer.queue("second", 80);
        // 100ms after the first queue, but only 20ms after the second.
        assert_eq!(debouncer.take_ready(100), None);
        assert_eq!(debouncer.take_ready(180), Some("second"));
    }

    #[test]
    fn test_cancel_drops_pending() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue("a", 0);
        debouncer.cancel();
        assert_eq!(debouncer.take_ready(1_000), None);
    }

    #[test]
    fn test_flush_releases_immediately() {
        let mut debouncer = Debouncer::new(1_000);
        debouncer.queue("a", 0);
        assert_eq!(debouncer.flush(), Some("a"));
        assert_eq!(debouncer.flush(), None);
    }

    #[test]
    fn test_release_consumes_pending_once() {
        let mut debouncer = Debouncer::new(100);
        debouncer.queue("a", 0);
        assert_eq!(debouncer.take_ready(200), Some("a"));
        assert_eq!(debouncer.take_ready(400), None);
    }

    proptest! {
        /// A burst of queues with gaps shorter than the window coalesces
        /// into exactly one release carrying the last payload.
        #[test]
        fn prop_burst_coalesces_to_last_payload(
            gaps in prop::collection::vec(0u64..100, 1..20),
        ) {
            let mut debouncer = Debouncer::new(100);
            let mut now = 0u64;
            let mut last = 0usize;
            for (i, gap) in gaps.iter().enumerate() {
                now += gap;
                debouncer.queue(i, now);
                last = i;
                // Checking mid-burst must never release: the latest queue
                // is always under the window.
                prop_assert_eq!(debouncer.take_ready(now + 50), None);
            }
            prop_assert_eq!(debouncer.take_ready(now + 100), Some(last));
            prop_assert_eq!(debouncer.take_ready(now + 10_000), None);
        }

        /// Bursts separated by more than the window release once per burst.
        #[test]
        fn prop_separated_bursts_release_once_each(
            burst_sizes in prop::collection::vec(1usize..5, 1..6),
        ) {
            let mut debouncer = Debouncer::new(100);
            let mut now = 0u64;
            let mut releases = 0usize;
            for (burst, size) in burst_sizes.iter().enumerate() {
                for i in 0..*size {
                    debouncer.queue((burst, i), now);
                    now += 10; // within the window
                }
                now += 100; // quiet period elapses
                if debouncer.take_ready(now).is_some() {
                    releases += 1;
                }
            }
            prop_assert_eq!(releases, burst_sizes.len());
        }
    }
}
