//! Exercise engines.
//!
//! Each engine shares the [`Progress`] core (phase, scores, clock, report
//! latch) and differs only in its per-frame interaction rule:
//!
//! | Engine            | Input used                | Ends with            |
//! |-------------------|---------------------------|----------------------|
//! | [`CatchStars`]    | pointer + palm down       | win / lose           |
//! | [`DragPlace`]     | pointer + pinch           | win / lose           |
//! | [`SlidingPuzzle`] | pointer + pinch edge      | completed            |
//! | [`GestureMatch`]  | finger states             | completed / exit     |
//!
//! All engines expose the same three calls: `start(now)`,
//! `update(facts, now)` and `stop(now)`.  `update` and `stop` return an
//! [`Outcome`] at most once per playthrough.

pub mod catch;
pub mod debounce;
pub mod drag;
pub mod gesture_match;
pub mod progress;
pub mod puzzle;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use catch::{CatchStars, Star};
pub use debounce::{should_count, RepCounter};
pub use drag::{DragPlace, Shape, ShapeKind};
pub use gesture_match::GestureMatch;
pub use progress::{Outcome, Phase, Progress};
pub use puzzle::{Board, SlidingPuzzle, TilePos};

use crate::config::AppConfig;
use crate::gesture::{GestureFacts, PointerAnchor};

/// Deterministic RNG when seeded, entropy otherwise.
pub(crate) fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

// ---------------------------------------------------------------------------
// ExerciseKind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    #[default]
    Catch,
    DragPlace,
    SlidingPuzzle,
    GestureMatch,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 4] = [
        ExerciseKind::Catch,
        ExerciseKind::DragPlace,
        ExerciseKind::SlidingPuzzle,
        ExerciseKind::GestureMatch,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Catch => "catch",
            ExerciseKind::DragPlace => "drag_place",
            ExerciseKind::SlidingPuzzle => "sliding_puzzle",
            ExerciseKind::GestureMatch => "gesture_match",
        }
    }

    /// `game_name` sent with stats.
    pub fn game_name(self) -> &'static str {
        match self {
            ExerciseKind::Catch => "exercise_1",
            ExerciseKind::DragPlace => "exercise_2",
            ExerciseKind::SlidingPuzzle => "exercise_3",
            ExerciseKind::GestureMatch => "exercise_4",
        }
    }

    /// Landmark driving the pointer in this exercise.
    pub fn pointer_anchor(self) -> PointerAnchor {
        match self {
            ExerciseKind::Catch | ExerciseKind::GestureMatch => PointerAnchor::MiddleKnuckle,
            ExerciseKind::DragPlace => PointerAnchor::FingertipCentroid,
            ExerciseKind::SlidingPuzzle => PointerAnchor::IndexTip,
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error)]
#[error("unknown exercise `{0}` (expected catch, drag_place, sliding_puzzle, gesture_match or exercise_1..exercise_4)")]
pub struct ParseKindError(String);

impl FromStr for ExerciseKind {
    type Err = ParseKindError;

    /// Accepts the snake_case name, a dashed variant, or the stats
    /// `game_name`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        ExerciseKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted || k.game_name() == wanted)
            .ok_or_else(|| ParseKindError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Exercise
// ---------------------------------------------------------------------------

/// One engine of any kind.
#[derive(Debug, Clone)]
pub enum Exercise {
    Catch(CatchStars),
    DragPlace(DragPlace),
    SlidingPuzzle(SlidingPuzzle),
    GestureMatch(GestureMatch),
}

impl Exercise {
    /// Build the `kind` engine from its config section.  `seed` fixes
    /// entity placement and shuffles.
    pub fn from_config(kind: ExerciseKind, config: &AppConfig, seed: Option<u64>) -> Self {
        match kind {
            ExerciseKind::Catch => Self::Catch(CatchStars::new(&config.catch, &config.canvas, seed)),
            ExerciseKind::DragPlace => Self::DragPlace(DragPlace::new(&config.drag, seed)),
            ExerciseKind::SlidingPuzzle => {
                Self::SlidingPuzzle(SlidingPuzzle::new(&config.puzzle, &config.canvas, seed))
            }
            ExerciseKind::GestureMatch => {
                Self::GestureMatch(GestureMatch::new(&config.gesture_match, seed))
            }
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        match self {
            Self::Catch(_) => ExerciseKind::Catch,
            Self::DragPlace(_) => ExerciseKind::DragPlace,
            Self::SlidingPuzzle(_) => ExerciseKind::SlidingPuzzle,
            Self::GestureMatch(_) => ExerciseKind::GestureMatch,
        }
    }

    /// Reset to a fresh playthrough in `Playing`.
    pub fn start(&mut self, now: Instant) {
        match self {
            Self::Catch(e) => e.start(now),
            Self::DragPlace(e) => e.start(now),
            Self::SlidingPuzzle(e) => e.start(now),
            Self::GestureMatch(e) => e.start(now),
        }
    }

    /// Apply one frame.  `None` facts means no hand this frame.
    pub fn update(&mut self, facts: Option<&GestureFacts>, now: Instant) -> Option<Outcome> {
        match self {
            Self::Catch(e) => e.update(facts, now),
            Self::DragPlace(e) => e.update(facts, now),
            Self::SlidingPuzzle(e) => e.update(facts, now),
            Self::GestureMatch(e) => e.update(facts, now),
        }
    }

    /// Leave the playthrough and return to `Ready`.
    pub fn stop(&mut self, now: Instant) -> Option<Outcome> {
        match self {
            Self::Catch(e) => e.stop(now),
            Self::DragPlace(e) => e.stop(now),
            Self::SlidingPuzzle(e) => e.stop(now),
            Self::GestureMatch(e) => e.stop(now),
        }
    }

    pub fn progress(&self) -> &Progress {
        match self {
            Self::Catch(e) => e.progress(),
            Self::DragPlace(e) => e.progress(),
            Self::SlidingPuzzle(e) => e.progress(),
            Self::GestureMatch(e) => e.progress(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.progress().phase()
    }
}
