//! Phase, score and timing shared by every exercise.
//!
//! [`Progress`] owns the at-most-once reporting latch: the first call to
//! [`Progress::finish`] after [`Progress::begin`] yields an [`Outcome`];
//! every later call yields `None` until the next `begin`.

use std::time::{Duration, Instant};

use crate::stats::ResultTag;

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// Lifecycle of one playthrough.
///
/// ```text
/// Ready ──start──▶ Playing ──▶ Win | Lose | Completed
///                    │  ▲
///                    ▼  │ pinch edge
///               BetweenLevels
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    BetweenLevels,
    Win,
    Lose,
    Completed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Win | Phase::Lose | Phase::Completed)
    }

    /// `Playing` or `BetweenLevels`.
    pub fn is_active(self) -> bool {
        matches!(self, Phase::Playing | Phase::BetweenLevels)
    }

    pub fn label(self) -> &'static str {
        match self {
            Phase::Ready => "ready",
            Phase::Playing => "playing",
            Phase::BetweenLevels => "between_levels",
            Phase::Win => "win",
            Phase::Lose => "lose",
            Phase::Completed => "completed",
        }
    }
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

/// A terminal result, emitted once per playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub result: ResultTag,
    /// Total score of the run.
    pub score: u32,
    pub time_seconds: u64,
}

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Progress {
    phase: Phase,
    /// Score within the current level; cleared on level advance.
    level_score: u32,
    /// Score across the whole run.
    total: u32,
    /// Zero-based level index.
    level: usize,
    /// Start of the current timing window.
    started_at: Option<Instant>,
    reported: bool,
}

impl Progress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset everything and enter `Playing`.
    pub fn begin(&mut self, now: Instant) {
        *self = Self {
            phase: Phase::Playing,
            started_at: Some(now),
            ..Self::default()
        };
    }

    /// Move to the next level: level score cleared, total kept.  The phase
    /// and clock are left to the caller.
    pub fn advance_level(&mut self) {
        self.level += 1;
        self.level_score = 0;
    }

    pub fn restart_clock(&mut self, now: Instant) {
        self.started_at = Some(now);
    }

    pub fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub fn award(&mut self, points: u32) {
        self.level_score += points;
        self.total += points;
    }

    /// Time since the current window started (zero before `begin`).
    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |t| now.saturating_duration_since(t))
    }

    /// Elapsed time truncated to whole seconds.
    pub fn elapsed_secs(&self, now: Instant) -> u64 {
        self.elapsed(now).as_secs()
    }

    /// Elapsed time rounded to the nearest second.
    pub fn elapsed_secs_rounded(&self, now: Instant) -> u64 {
        self.elapsed(now).as_secs_f64().round() as u64
    }

    /// Enter `phase` and trip the latch.  Returns the outcome only the
    /// first time.
    pub fn finish(&mut self, phase: Phase, result: ResultTag, time_seconds: u64) -> Option<Outcome> {
        self.phase = phase;
        self.report(result, time_seconds)
    }

    /// Trip the latch without a phase change.
    pub fn report(&mut self, result: ResultTag, time_seconds: u64) -> Option<Outcome> {
        if self.reported {
            return None;
        }
        self.reported = true;
        Some(Outcome {
            result,
            score: self.total,
            time_seconds,
        })
    }

    /// Return to `Ready`, keeping scores for display.
    pub fn halt(&mut self) {
        self.phase = Phase::Ready;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level_score(&self) -> u32 {
        self.level_score
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Zero-based.
    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_reported(&self) -> bool {
        self.reported
    }
}
