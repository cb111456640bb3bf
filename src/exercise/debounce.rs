//! Edge detection + cooldown for counting discrete actions (reps, grabs,
//! puzzle moves) from a per-frame boolean.

use std::time::{Duration, Instant};

/// Decide whether a rising edge counts.
///
/// Counts iff `matched_now && !matched_prev` and more than `cooldown` has
/// passed since the last counted edge.  `last_counted_at == None` (never
/// counted) always satisfies the cooldown.
///
/// Returns `(counted, new_last_counted_at)`.
pub fn should_count(
    matched_now: bool,
    matched_prev: bool,
    last_counted_at: Option<Instant>,
    cooldown: Duration,
    now: Instant,
) -> (bool, Option<Instant>) {
    let rising = matched_now && !matched_prev;
    let cooled = last_counted_at
        .map_or(true, |last| now.saturating_duration_since(last) > cooldown);

    if rising && cooled {
        (true, Some(now))
    } else {
        (false, last_counted_at)
    }
}

/// Stateful wrapper around [`should_count`] that remembers the previous
/// frame's match and the last counted instant.
#[derive(Debug, Clone)]
pub struct RepCounter {
    cooldown: Duration,
    prev: bool,
    last_counted_at: Option<Instant>,
}

impl RepCounter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            prev: false,
            last_counted_at: None,
        }
    }

    /// Feed one frame's match; `true` when this frame counts.
    pub fn observe(&mut self, matched: bool, now: Instant) -> bool {
        let (counted, last) =
            should_count(matched, self.prev, self.last_counted_at, self.cooldown, now);
        self.prev = matched;
        self.last_counted_at = last;
        counted
    }

    /// Like [`observe`](Self::observe) but the cooldown timestamp is only
    /// committed when `accept` agrees.  Used where an edge may be rejected
    /// by a later rule (e.g. a pinch off the target tile).
    pub fn observe_if(
        &mut self,
        matched: bool,
        now: Instant,
        accept: impl FnOnce() -> bool,
    ) -> bool {
        let (edge, _) =
            should_count(matched, self.prev, self.last_counted_at, self.cooldown, now);
        self.prev = matched;
        if edge && accept() {
            self.last_counted_at = Some(now);
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.prev = false;
        self.last_counted_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CD: Duration = Duration::from_millis(500);

    #[test]
    fn first_rising_edge_counts() {
        let now = Instant::now();
        assert_eq!(should_count(true, false, None, CD, now), (true, Some(now)));
    }

    #[test]
    fn held_pose_does_not_count_again() {
        let now = Instant::now();
        assert_eq!(should_count(true, true, None, CD, now), (false, None));
    }

    #[test]
    fn cooldown_is_strict() {
        let t0 = Instant::now();
        let (c, _) = should_count(true, false, Some(t0), CD, t0 + CD);
        assert!(!c, "exactly at the cooldown boundary does not count");
        let (c, last) = should_count(true, false, Some(t0), CD, t0 + CD + Duration::from_millis(1));
        assert!(c);
        assert_eq!(last, Some(t0 + CD + Duration::from_millis(1)));
    }

    #[test]
    fn sustained_pose_counts_once() {
        let t0 = Instant::now();
        let mut counter = RepCounter::new(CD);
        let counted = (0..120)
            .filter(|i| counter.observe(true, t0 + Duration::from_millis(16 * i)))
            .count();
        assert_eq!(counted, 1);
    }

    #[test]
    fn release_and_repeat_after_cooldown_counts_twice() {
        let t0 = Instant::now();
        let mut counter = RepCounter::new(CD);
        assert!(counter.observe(true, t0));
        assert!(!counter.observe(false, t0 + Duration::from_millis(100)));
        // Too soon.
        assert!(!counter.observe(true, t0 + Duration::from_millis(200)));
        assert!(!counter.observe(false, t0 + Duration::from_millis(300)));
        assert!(counter.observe(true, t0 + Duration::from_millis(600)));
    }

    #[test]
    fn refused_edge_still_tracks_the_held_pose() {
        let t0 = Instant::now();
        let mut counter = RepCounter::new(Duration::ZERO);
        assert!(!counter.observe_if(true, t0, || false));
        // Still held: no new edge once the caller would accept it.
        assert!(!counter.observe_if(true, t0 + Duration::from_millis(5), || true));
        counter.observe_if(false, t0 + Duration::from_millis(10), || true);
        assert!(counter.observe_if(true, t0 + Duration::from_millis(15), || true));
    }

    #[test]
    fn rejected_edge_does_not_start_cooldown() {
        let t0 = Instant::now();
        let mut counter = RepCounter::new(CD);
        assert!(!counter.observe_if(true, t0, || false));
        counter.observe_if(false, t0 + Duration::from_millis(10), || true);
        assert!(counter.observe_if(true, t0 + Duration::from_millis(20), || true));
    }

    proptest! {
        /// Counted edges are always more than `cooldown` apart and never
        /// outnumber rising edges.
        #[test]
        fn counts_respect_edges_and_cooldown(
            frames in prop::collection::vec((any::<bool>(), 1u64..400), 1..200),
            cooldown_ms in 0u64..1_000,
        ) {
            let cooldown = Duration::from_millis(cooldown_ms);
            let mut counter = RepCounter::new(cooldown);
            let mut now = Instant::now();
            let mut prev = false;
            let mut rising = 0usize;
            let mut counted: Vec<Instant> = Vec::new();

            for (matched, step) in frames {
                now += Duration::from_millis(step);
                if matched && !prev {
                    rising += 1;
                }
                prev = matched;
                if counter.observe(matched, now) {
                    counted.push(now);
                }
            }

            prop_assert!(counted.len() <= rising);
            for pair in counted.windows(2) {
                prop_assert!(pair[1] - pair[0] > cooldown);
            }
        }
    }
}
