//! Configuration module for TheraHand.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the subject,
//! stats endpoint, canvas and each exercise, `AppPaths` for cross-platform
//! data directories, and TOML persistence via `AppConfig::load` /
//! `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, CanvasConfig, CatchConfig, DragConfig, GestureMatchConfig, PuzzleConfig,
    SessionConfig, StatsConfig, SubjectConfig, TargetZone,
};
