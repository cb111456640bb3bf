//! Session status and the snapshot shared with the presentation layer.
//!
//! [`SessionState`] is the single source of truth for everything a renderer
//! needs: session status, a copy of the exercise engine, the latest gesture
//! facts (hand marker), control availability and the last emitted record.
//!
//! [`SharedState`] is `Arc<Mutex<SessionState>>`.  The session controller is
//! its only writer; readers lock briefly once per display frame.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::exercise::Exercise;
use crate::gesture::GestureFacts;
use crate::stats::StatRecord;

// ---------------------------------------------------------------------------
// SessionStatus
// ---------------------------------------------------------------------------

/// Lifecycle of the camera session around an exercise.
///
/// ```text
/// Idle ──Start──▶ CameraRequested ──ok──▶ Running ──terminal phase──▶ Finished
///                        │                   ├──Stop──────────────▶ Stopped
///                        ▼                   ├──detector error────▶ DetectorFailed
///                   CameraFailed             └──stream ended──────▶ StreamEnded
/// ```
///
/// Every state except `CameraRequested` and `Running` accepts `Start` again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Idle,
    CameraRequested,
    Running,
    Stopped,
    CameraFailed,
    DetectorFailed,
    Finished,
    StreamEnded,
}

impl SessionStatus {
    /// Translation key for the status line.
    pub fn key(self) -> &'static str {
        match self {
            SessionStatus::Idle => "status_idle",
            SessionStatus::CameraRequested => "status_camera_requested",
            SessionStatus::Running => "status_running",
            SessionStatus::Stopped => "status_stopped",
            SessionStatus::CameraFailed => "status_camera_failed",
            SessionStatus::DetectorFailed => "status_detector_failed",
            SessionStatus::Finished => "status_finished",
            SessionStatus::StreamEnded => "status_stream_ended",
        }
    }

    /// Camera acquisition pending or frames flowing.
    pub fn is_live(self) -> bool {
        matches!(self, SessionStatus::CameraRequested | SessionStatus::Running)
    }

    /// A session ran (or tried to) and is over.  `Idle` has not begun yet.
    pub fn is_settled(self) -> bool {
        !self.is_live() && self != SessionStatus::Idle
    }
}

// ---------------------------------------------------------------------------
// Controls
// ---------------------------------------------------------------------------

/// Which session buttons are enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub start: bool,
    pub restart: bool,
    pub stop: bool,
}

impl Controls {
    pub fn for_status(status: SessionStatus) -> Self {
        match status {
            SessionStatus::CameraRequested => Self {
                start: false,
                restart: false,
                stop: false,
            },
            SessionStatus::Running => Self {
                start: false,
                restart: true,
                stop: true,
            },
            _ => Self {
                start: true,
                restart: true,
                stop: false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SessionState {
    pub status: SessionStatus,
    /// Translated status line.
    pub status_text: String,
    /// Set on camera or detector failure.
    pub error_message: Option<String>,
    /// Snapshot of the engine, refreshed every tick.
    pub exercise: Exercise,
    /// Facts from the most recent detection (`None` when no hand).
    pub facts: Option<GestureFacts>,
    pub camera_active: bool,
    pub controls: Controls,
    /// Last record handed to the stats reporter.
    pub last_record: Option<StatRecord>,
}

impl SessionState {
    pub fn new(exercise: Exercise) -> Self {
        let status = SessionStatus::Idle;
        Self {
            status,
            status_text: status.key().to_string(),
            error_message: None,
            exercise,
            facts: None,
            camera_active: false,
            controls: Controls::for_status(status),
            last_record: None,
        }
    }
}

// ---------------------------------------------------------------------------
// SharedState
// ---------------------------------------------------------------------------

/// Thread-safe handle to [`SessionState`].
///
/// Lock for a short critical section; never hold the guard across `.await`.
pub type SharedState = Arc<Mutex<SessionState>>;

pub fn new_shared_state(exercise: Exercise) -> SharedState {
    Arc::new(Mutex::new(SessionState::new(exercise)))
}

/// Lock, recovering the data if a previous holder panicked.
pub fn lock_state(state: &SharedState) -> MutexGuard<'_, SessionState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::exercise::{ExerciseKind, Phase};

    #[test]
    fn new_state_is_idle_and_startable() {
        let ex = Exercise::from_config(ExerciseKind::Catch, &AppConfig::default(), Some(1));
        let st = SessionState::new(ex);
        assert_eq!(st.status, SessionStatus::Idle);
        assert_eq!(st.exercise.phase(), Phase::Ready);
        assert!(st.controls.start);
        assert!(!st.controls.stop);
        assert!(!st.camera_active);
    }

    #[test]
    fn controls_follow_status() {
        let running = Controls::for_status(SessionStatus::Running);
        assert!(!running.start && running.restart && running.stop);

        for failed in [SessionStatus::CameraFailed, SessionStatus::DetectorFailed] {
            let c = Controls::for_status(failed);
            assert!(c.start && c.restart && !c.stop);
        }

        let pending = Controls::for_status(SessionStatus::CameraRequested);
        assert!(!pending.start && !pending.restart && !pending.stop);
    }

    #[test]
    fn status_keys_are_distinct() {
        use std::collections::HashSet;
        let all = [
            SessionStatus::Idle,
            SessionStatus::CameraRequested,
            SessionStatus::Running,
            SessionStatus::Stopped,
            SessionStatus::CameraFailed,
            SessionStatus::DetectorFailed,
            SessionStatus::Finished,
            SessionStatus::StreamEnded,
        ];
        let keys: HashSet<_> = all.iter().map(|s| s.key()).collect();
        assert_eq!(keys.len(), all.len());
        assert!(SessionStatus::Running.is_live());
        assert!(!SessionStatus::Finished.is_live());
    }

    #[test]
    fn idle_and_live_states_are_not_settled() {
        assert!(!SessionStatus::Idle.is_settled());
        assert!(!SessionStatus::CameraRequested.is_settled());
        assert!(!SessionStatus::Running.is_settled());
        assert!(SessionStatus::Finished.is_settled());
        assert!(SessionStatus::CameraFailed.is_settled());
        assert!(SessionStatus::StreamEnded.is_settled());
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let ex = Exercise::from_config(ExerciseKind::Catch, &AppConfig::default(), Some(1));
        let state = new_shared_state(ex);
        let clone = Arc::clone(&state);
        let _ = std::thread::spawn(move || {
            let _guard = clone.lock().unwrap();
            panic!("poison");
        })
        .join();
        assert_eq!(lock_state(&state).status, SessionStatus::Idle);
    }
}
