//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.
//! Every section uses `#[serde(default)]` so a partial `settings.toml` only
//! overrides the keys it names.

use std::path::PathBuf;

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::exercise::ExerciseKind;

// ---------------------------------------------------------------------------
// SubjectConfig
// ---------------------------------------------------------------------------

/// Who is playing.  Supplied by the hosting page; copied into every
/// [`StatRecord`](crate::stats::StatRecord).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubjectConfig {
    /// Account name sent as `username`.
    pub username: String,
    /// Age in whole years sent as `age`.
    pub age: u32,
}

impl Default for SubjectConfig {
    fn default() -> Self {
        Self {
            username: "Guest".into(),
            age: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// StatsConfig
// ---------------------------------------------------------------------------

/// Settings for the outbound stats endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// When `false` terminal results are only logged.
    pub enabled: bool,
    /// Base URL of the stats service; records are POSTed to
    /// `{base_url}/add_stat`.
    pub base_url: String,
    /// Maximum seconds to wait for the stats service before giving up.
    pub timeout_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:5000".into(),
            timeout_secs: 5,
        }
    }
}

// ---------------------------------------------------------------------------
// CanvasConfig
// ---------------------------------------------------------------------------

/// Geometry of the play field and the gesture classifier's pixel-space
/// thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    /// Internal canvas width in pixels.
    pub width: f32,
    /// Internal canvas height in pixels.
    pub height: f32,
    /// The camera feed is shown mirrored; flip landmark X so the pointer
    /// follows the user's real hand side.
    pub mirrored: bool,
    /// Thumb-tip to index-tip distance (pixels) below which the hand counts
    /// as pinched.
    pub pinch_threshold_px: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            mirrored: true,
            pinch_threshold_px: 35.0,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Scheduling and presentation hooks for the session controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Render/update ticks per second.
    pub render_fps: u32,
    /// Translation table (`key → template` JSON).  `None` falls back to the
    /// platform default location, then to untranslated keys.
    pub locale_file: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            render_fps: 60,
            locale_file: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Per-exercise tuning
// ---------------------------------------------------------------------------

/// Catch-the-stars tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatchConfig {
    /// Stars needed to win.
    pub target_score: u32,
    /// Whole-run time budget.
    pub time_limit_secs: u64,
    /// Stars on screen at once.
    pub star_count: usize,
    /// Star hit-box edge length in pixels.
    pub star_size: f32,
}

impl Default for CatchConfig {
    fn default() -> Self {
        Self {
            target_score: 10,
            time_limit_secs: 30,
            star_count: 5,
            star_size: 40.0,
        }
    }
}

/// Axis-aligned drop zone in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetZone {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Drag-and-place tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Placements required per level, in order.
    pub levels: Vec<u32>,
    /// Time budget of each level.
    pub level_time_secs: u64,
    /// Where shapes must be carried.
    pub target: TargetZone,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            levels: vec![10, 15, 20],
            level_time_secs: 60,
            target: TargetZone {
                x: 100.0,
                y: 100.0,
                w: 200.0,
                h: 200.0,
            },
        }
    }
}

/// Sliding-puzzle tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PuzzleConfig {
    /// Tiles per row and column.
    pub grid_size: usize,
    /// Tile edge length in pixels.
    pub tile_size: f32,
    /// Moves required per level, in order.
    pub level_goals: Vec<u32>,
    /// Minimum gap between two accepted moves.
    pub move_cooldown_ms: u64,
    /// Random legal moves applied to the solved board at each level start.
    pub shuffle_moves: usize,
}

impl Default for PuzzleConfig {
    fn default() -> Self {
        Self {
            grid_size: 4,
            tile_size: 100.0,
            level_goals: vec![5, 10, 15],
            move_cooldown_ms: 350,
            shuffle_moves: 50,
        }
    }
}

/// Gesture-match tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureMatchConfig {
    /// Reps required per gesture, one entry per level.
    pub rep_levels: Vec<u32>,
    /// Minimum gap between two counted reps.
    pub rep_cooldown_ms: u64,
    /// Pause shown after a gesture's reps are done.
    pub completion_pause_ms: u64,
    /// Score awarded per completed gesture.
    pub points_per_gesture: u32,
}

impl Default for GestureMatchConfig {
    fn default() -> Self {
        Self {
            rep_levels: vec![5, 10, 15, 20, 25],
            rep_cooldown_ms: 500,
            completion_pause_ms: 2_000,
            points_per_gesture: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use therahand::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Exercise played when none is given on the command line.
    pub exercise: ExerciseKind,
    pub subject: SubjectConfig,
    pub stats: StatsConfig,
    pub canvas: CanvasConfig,
    pub session: SessionConfig,
    pub catch: CatchConfig,
    pub drag: DragConfig,
    pub puzzle: PuzzleConfig,
    pub gesture_match: GestureMatchConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// so callers never need to special-case a missing file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolved translation table path: explicit setting first, then the
    /// platform default.
    pub fn locale_file(&self) -> PathBuf {
        self.session
            .locale_file
            .clone()
            .unwrap_or_else(|| AppPaths::new().locale_file)
    }

    /// Reject values that would leave an exercise unplayable.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.canvas.width > 0.0 && self.canvas.height > 0.0,
            "canvas must have a positive width and height"
        );
        ensure!(self.catch.star_count > 0, "catch.star_count must be at least 1");
        ensure!(self.catch.star_size > 0.0, "catch.star_size must be positive");
        ensure!(!self.drag.levels.is_empty(), "drag.levels must not be empty");
        ensure!(
            self.puzzle.grid_size >= 2,
            "puzzle.grid_size must be at least 2 (got {})",
            self.puzzle.grid_size
        );
        ensure!(self.puzzle.tile_size > 0.0, "puzzle.tile_size must be positive");
        ensure!(
            !self.puzzle.level_goals.is_empty(),
            "puzzle.level_goals must not be empty"
        );
        ensure!(
            !self.gesture_match.rep_levels.is_empty(),
            "gesture_match.rep_levels must not be empty"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// A default `AppConfig` survives a TOML round trip.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.exercise, loaded.exercise);
        assert_eq!(original.subject, loaded.subject);
        assert_eq!(original.stats.base_url, loaded.stats.base_url);
        assert_eq!(original.stats.timeout_secs, loaded.stats.timeout_secs);
        assert_eq!(original.canvas.width, loaded.canvas.width);
        assert_eq!(original.canvas.mirrored, loaded.canvas.mirrored);
        assert_eq!(original.drag.levels, loaded.drag.levels);
        assert_eq!(original.drag.target, loaded.drag.target);
        assert_eq!(original.puzzle.level_goals, loaded.puzzle.level_goals);
        assert_eq!(
            original.gesture_match.rep_levels,
            loaded.gesture_match.rep_levels
        );
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");

        assert_eq!(config.exercise, ExerciseKind::Catch);
        assert_eq!(config.catch.target_score, 10);
        assert_eq!(config.subject.username, "Guest");
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.catch.target_score, 10);
        assert_eq!(cfg.catch.time_limit_secs, 30);
        assert_eq!(cfg.catch.star_count, 5);
        assert_eq!(cfg.drag.levels, vec![10, 15, 20]);
        assert_eq!(cfg.drag.level_time_secs, 60);
        assert_eq!(cfg.puzzle.grid_size, 4);
        assert_eq!(cfg.puzzle.level_goals, vec![5, 10, 15]);
        assert_eq!(cfg.puzzle.move_cooldown_ms, 350);
        assert_eq!(cfg.gesture_match.rep_levels, vec![5, 10, 15, 20, 25]);
        assert_eq!(cfg.gesture_match.rep_cooldown_ms, 500);
        assert_eq!(cfg.gesture_match.completion_pause_ms, 2_000);
        assert!((cfg.canvas.pinch_threshold_px - 35.0).abs() < f32::EPSILON);
        assert!(cfg.stats.enabled);
    }

    /// A partial file only overrides the keys it names.
    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "exercise = \"sliding_puzzle\"\n\n[subject]\nusername = \"maria\"\nage = 71\n\n[puzzle]\nlevel_goals = [2, 3]\n",
        )
        .expect("write");

        let cfg = AppConfig::load_from(&path).expect("load");

        assert_eq!(cfg.exercise, ExerciseKind::SlidingPuzzle);
        assert_eq!(cfg.subject.username, "maria");
        assert_eq!(cfg.subject.age, 71);
        assert_eq!(cfg.puzzle.level_goals, vec![2, 3]);
        assert_eq!(cfg.puzzle.grid_size, 4);
        assert_eq!(cfg.catch.target_score, 10);
    }

    #[test]
    fn defaults_validate() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn degenerate_puzzle_grid_is_rejected_at_load() {
        let dir = tempdir().expect("temp dir");
        for (name, body) in [
            ("zero.toml", "[puzzle]\ngrid_size = 0\n"),
            ("one.toml", "[puzzle]\ngrid_size = 1\n"),
            ("flat.toml", "[puzzle]\ntile_size = 0.0\n"),
        ] {
            let path = dir.path().join(name);
            std::fs::write(&path, body).expect("write");
            let err = AppConfig::load_from(&path).expect_err(name);
            assert!(err.to_string().contains("puzzle."), "{name}: {err}");
        }
    }

    #[test]
    fn empty_level_tables_are_rejected_at_load() {
        let dir = tempdir().expect("temp dir");
        for body in [
            "[drag]\nlevels = []\n",
            "[puzzle]\nlevel_goals = []\n",
            "[gesture_match]\nrep_levels = []\n",
            "[catch]\nstar_count = 0\n",
        ] {
            let path = dir.path().join("bad.toml");
            std::fs::write(&path, body).expect("write");
            assert!(AppConfig::load_from(&path).is_err(), "accepted {body:?}");
        }
    }

    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.exercise = ExerciseKind::GestureMatch;
        cfg.stats.base_url = "https://therahand.example".into();
        cfg.stats.enabled = false;
        cfg.canvas.mirrored = false;
        cfg.session.locale_file = Some(PathBuf::from("/tmp/el.json"));
        cfg.gesture_match.rep_levels = vec![1, 2];

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.exercise, ExerciseKind::GestureMatch);
        assert_eq!(loaded.stats.base_url, "https://therahand.example");
        assert!(!loaded.stats.enabled);
        assert!(!loaded.canvas.mirrored);
        assert_eq!(loaded.locale_file(), PathBuf::from("/tmp/el.json"));
        assert_eq!(loaded.gesture_match.rep_levels, vec![1, 2]);
    }
}
