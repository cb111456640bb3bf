//! Gesture match: perform each gesture of a shuffled cycle for a number of
//! reps.
//!
//! Reps are counted on the rising edge of the current gesture's predicate,
//! outside the rep cooldown.  Reaching the level's rep target awards points
//! and starts a short pause; the first frame with a hand after the pause
//! moves to the next gesture.  Exhausting the cycle advances the level,
//! restarts the clock and reshuffles.  The run completes when the pause
//! after the last gesture of the last level ends.  Frames without a hand
//! leave all state untouched.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::debounce::RepCounter;
use super::progress::{Outcome, Phase, Progress};
use super::seeded_rng;
use crate::config::GestureMatchConfig;
use crate::gesture::{GestureFacts, GestureKind};
use crate::stats::ResultTag;

#[derive(Debug, Clone)]
pub struct GestureMatch {
    config: GestureMatchConfig,
    order: Vec<GestureKind>,
    cursor: usize,
    reps: u32,
    counter: RepCounter,
    pause_until: Option<Instant>,
    progress: Progress,
    rng: StdRng,
}

impl GestureMatch {
    pub fn new(config: &GestureMatchConfig, seed: Option<u64>) -> Self {
        Self {
            config: config.clone(),
            order: GestureKind::ALL.to_vec(),
            cursor: 0,
            reps: 0,
            counter: RepCounter::new(Duration::from_millis(config.rep_cooldown_ms)),
            pause_until: None,
            progress: Progress::new(),
            rng: seeded_rng(seed),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.progress.begin(now);
        self.order = GestureKind::ALL.to_vec();
        self.order.shuffle(&mut self.rng);
        self.cursor = 0;
        self.reps = 0;
        self.counter.reset();
        self.pause_until = None;
    }

    pub fn update(&mut self, facts: Option<&GestureFacts>, now: Instant) -> Option<Outcome> {
        if self.progress.phase() != Phase::Playing {
            return None;
        }
        let facts = facts?;

        if let Some(until) = self.pause_until {
            if now < until {
                return None;
            }
            self.pause_until = None;
            if self.on_final_gesture() {
                let secs = self.progress.elapsed_secs(now);
                return self.progress.finish(Phase::Completed, ResultTag::Completed, secs);
            }
            self.next_gesture(now);
        }

        let Some(target) = self.rep_target() else {
            let secs = self.progress.elapsed_secs(now);
            return self.progress.finish(Phase::Completed, ResultTag::Completed, secs);
        };

        let gesture = self.current_gesture();
        if self.counter.observe(gesture.matches(&facts.fingers), now) {
            self.reps += 1;
            log::debug!("gesture: {} rep {}/{}", gesture.id(), self.reps, target);
        }
        if self.reps < target {
            return None;
        }

        self.progress.award(self.config.points_per_gesture);
        log::info!("gesture: {} done", gesture.id());
        self.pause_until = Some(now + Duration::from_millis(self.config.completion_pause_ms));
        None
    }

    /// Leaving an unfinished run reports `exit`.
    pub fn stop(&mut self, now: Instant) -> Option<Outcome> {
        let outcome = if self.progress.phase().is_active() {
            let secs = self.progress.elapsed_secs(now);
            self.progress.report(ResultTag::Exit, secs)
        } else {
            None
        };
        self.pause_until = None;
        self.progress.halt();
        outcome
    }

    fn on_final_gesture(&self) -> bool {
        self.cursor + 1 >= self.order.len()
            && self.progress.level() + 1 >= self.config.rep_levels.len()
    }

    fn next_gesture(&mut self, now: Instant) {
        self.reps = 0;
        self.cursor += 1;
        if self.cursor >= self.order.len() {
            self.cursor = 0;
            self.progress.advance_level();
            self.progress.restart_clock(now);
            self.order.shuffle(&mut self.rng);
            log::info!("gesture: level {} started", self.progress.level() + 1);
        }
    }

    pub fn current_gesture(&self) -> GestureKind {
        self.order
            .get(self.cursor)
            .copied()
            .unwrap_or(GestureKind::CloseAllFingers)
    }

    /// Reps needed per gesture at the current level.
    pub fn rep_target(&self) -> Option<u32> {
        self.config.rep_levels.get(self.progress.level()).copied()
    }

    pub fn reps(&self) -> u32 {
        self.reps
    }

    /// Current gesture's reps are done and the pause is running.
    pub fn is_paused(&self) -> bool {
        self.pause_until.is_some()
    }

    pub fn order(&self) -> &[GestureKind] {
        &self.order
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::{FingerStates, Point};

    fn facts_for(fingers: FingerStates) -> GestureFacts {
        GestureFacts {
            pointer: Point::default(),
            pinch: false,
            fingers,
            palm_down: false,
        }
    }

    fn doing(g: GestureKind) -> GestureFacts {
        facts_for(g.pattern())
    }

    /// A pose that matches none of the catalog gestures.
    fn open_hand() -> GestureFacts {
        facts_for(FingerStates::from_array([true; 5]))
    }

    fn engine(rep_levels: Vec<u32>) -> (GestureMatch, Instant) {
        let config = GestureMatchConfig {
            rep_levels,
            ..GestureMatchConfig::default()
        };
        let mut e = GestureMatch::new(&config, Some(42));
        let t0 = Instant::now();
        e.start(t0);
        (e, t0)
    }

    #[test]
    fn order_is_a_permutation_of_the_catalog() {
        let (e, _) = engine(vec![5]);
        let mut order = e.order().to_vec();
        order.sort_by_key(|g| g.id());
        let mut all = GestureKind::ALL.to_vec();
        all.sort_by_key(|g| g.id());
        assert_eq!(order, all);
    }

    #[test]
    fn sustained_pose_counts_one_rep() {
        let (mut e, t0) = engine(vec![5]);
        let g = e.current_gesture();
        e.update(Some(&doing(g)), t0);
        e.update(Some(&doing(g)), t0 + Duration::from_millis(100));
        assert_eq!(e.reps(), 1);
    }

    #[test]
    fn reps_need_release_and_cooldown() {
        let (mut e, t0) = engine(vec![5]);
        let g = e.current_gesture();
        let ms = |n| t0 + Duration::from_millis(n);

        e.update(Some(&doing(g)), ms(0));
        e.update(Some(&open_hand()), ms(100));
        e.update(Some(&doing(g)), ms(200));
        assert_eq!(e.reps(), 1, "inside cooldown");

        e.update(Some(&open_hand()), ms(600));
        e.update(Some(&doing(g)), ms(700));
        assert_eq!(e.reps(), 2);
    }

    #[test]
    fn no_hand_frames_hold_state() {
        let (mut e, t0) = engine(vec![5]);
        let g = e.current_gesture();
        e.update(Some(&doing(g)), t0);
        e.update(None, t0 + Duration::from_secs(1));
        // Still "held": no new edge.
        e.update(Some(&doing(g)), t0 + Duration::from_secs(2));
        assert_eq!(e.reps(), 1);
    }

    #[test]
    fn finishing_a_gesture_pauses_then_moves_on() {
        let (mut e, t0) = engine(vec![1, 1]);
        let first = e.current_gesture();

        assert_eq!(e.update(Some(&doing(first)), t0), None);
        assert!(e.is_paused());
        assert_eq!(e.progress().total(), 10);

        // Still pausing.
        e.update(Some(&open_hand()), t0 + Duration::from_millis(1_000));
        assert_eq!(e.current_gesture(), first);

        e.update(Some(&open_hand()), t0 + Duration::from_millis(2_000));
        assert!(!e.is_paused());
        assert_eq!(e.reps(), 0);
        assert_eq!(e.order()[1], e.current_gesture());
    }

    #[test]
    fn pause_only_resolves_with_a_hand() {
        let (mut e, t0) = engine(vec![1, 1]);
        e.update(Some(&doing(e.current_gesture())), t0);
        e.update(None, t0 + Duration::from_secs(5));
        assert!(e.is_paused());
    }

    /// Drive the engine through every gesture of the current level, one
    /// rep each, with the pause elapsed between gestures.
    fn clear_level(e: &mut GestureMatch, mut now: Instant) -> (Instant, Option<Outcome>) {
        let mut outcome = None;
        for _ in 0..GestureKind::ALL.len() {
            now += Duration::from_secs(3);
            e.update(Some(&open_hand()), now);
            now += Duration::from_secs(1);
            outcome = e.update(Some(&doing(e.current_gesture())), now);
        }
        (now, outcome)
    }

    #[test]
    fn cycle_exhaustion_advances_level_and_restarts_clock() {
        let (mut e, t0) = engine(vec![1, 1]);
        let (t1, out) = clear_level(&mut e, t0);
        assert_eq!(out, None);
        assert_eq!(e.progress().level(), 0);

        // First hand frame after the pause rolls over to level 2.
        let t2 = t1 + Duration::from_secs(3);
        e.update(Some(&open_hand()), t2);
        assert_eq!(e.progress().level(), 1);
        assert_eq!(e.progress().elapsed(t2), Duration::ZERO);
        assert_eq!(e.progress().total(), 50);
    }

    #[test]
    fn final_gesture_completes_after_its_pause_and_reports_once() {
        let (mut e, t0) = engine(vec![1]);
        let (t1, out) = clear_level(&mut e, t0);
        assert_eq!(out, None);
        assert!(e.is_paused());
        assert_eq!(e.progress().total(), 50);

        assert_eq!(e.update(Some(&open_hand()), t1 + Duration::from_secs(1)), None);
        assert_eq!(e.progress().phase(), Phase::Playing);

        let out = e
            .update(Some(&open_hand()), t1 + Duration::from_secs(2))
            .expect("completed");
        assert_eq!(out.result, ResultTag::Completed);
        assert_eq!(out.score, 50);
        assert_eq!(out.time_seconds, 22);
        assert_eq!(e.progress().phase(), Phase::Completed);

        assert_eq!(e.update(Some(&open_hand()), t1 + Duration::from_secs(3)), None);
        assert_eq!(e.stop(t1), None, "already reported");
    }

    #[test]
    fn stop_mid_run_reports_exit_once() {
        let (mut e, t0) = engine(vec![5]);
        e.update(Some(&doing(e.current_gesture())), t0);

        let out = e.stop(t0 + Duration::from_millis(7_500)).unwrap();
        assert_eq!(out.result, ResultTag::Exit);
        assert_eq!(out.time_seconds, 7);
        assert_eq!(out.score, 0);
        assert_eq!(e.progress().phase(), Phase::Ready);
        assert_eq!(e.stop(t0), None);
    }

    #[test]
    fn restart_rearms_exit_report() {
        let (mut e, t0) = engine(vec![5]);
        assert!(e.stop(t0).is_some());
        e.start(t0);
        assert!(e.stop(t0).is_some());
    }
}
