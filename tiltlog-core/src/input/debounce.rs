//! Per-button edge debouncing

/// Accepts an edge only if more than the window has passed since the last
/// accepted edge
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    window_us: u64,
    last_accepted_us: Option<u64>,
}

impl Debouncer {
    pub const fn new(window_ms: u32) -> Self {
        Self {
            window_us: window_ms as u64 * 1000,
            last_accepted_us: None,
        }
    }

    /// Register an edge seen at `now_us`; true if it counts
    pub fn accept(&mut self, now_us: u64) -> bool {
        let accepted = match self.last_accepted_us {
            None => true,
            Some(last) => now_us.saturating_sub(last) > self.window_us,
        };
        if accepted {
            self.last_accepted_us = Some(now_us);
        }
        accepted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEBOUNCE_MS;
    use proptest::prelude::*;

    #[test]
    fn test_first_edge_accepted() {
        let mut d = Debouncer::new(DEBOUNCE_MS);
        assert!(d.accept(0));
    }

    #[test]
    fn test_bounce_rejected() {
        let mut d = Debouncer::new(DEBOUNCE_MS);
        assert!(d.accept(1_000_000));
        assert!(!d.accept(1_000_500));
        assert!(!d.accept(1_150_000));
        assert!(d.accept(1_300_000));
    }

    #[test]
    fn test_window_is_strict() {
        let mut d = Debouncer::new(DEBOUNCE_MS);
        assert!(d.accept(0));
        assert!(!d.accept(200_000));
        assert!(d.accept(200_001));
    }

    #[test]
    fn test_rejected_edges_do_not_extend_window() {
        let mut d = Debouncer::new(DEBOUNCE_MS);
        assert!(d.accept(0));
        assert!(!d.accept(150_000));
        assert!(d.accept(250_000));
    }

    proptest! {
        #[test]
        fn prop_one_edge_per_window(gaps in proptest::collection::vec(0u64..400_000, 1..100)) {
            let mut d = Debouncer::new(DEBOUNCE_MS);
            let mut now = 0u64;
            let mut last: Option<u64> = None;
            for gap in gaps {
                now += gap;
                if d.accept(now) {
                    if let Some(prev) = last {
                        prop_assert!(now - prev > 200_000);
                    }
                    last = Some(now);
                }
            }
        }

        #[test]
        fn prop_two_edges_within_window_accept_once(
            start in 0u64..1_000_000_000,
            gap in 0u64..=200_000
        ) {
            let mut d = Debouncer::new(DEBOUNCE_MS);
            let accepted = [d.accept(start), d.accept(start + gap)];
            prop_assert_eq!(accepted, [true, false]);
        }
    }
}
