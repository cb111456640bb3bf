//! Hand-landmark input: frame types, the camera/detector seams, and recorded
//! sessions.
//!
//! # Pipeline
//!
//! ```text
//! Camera::next_frame ──▶ VideoFrame ──▶ HandDetector::detect ──▶ Option<HandFrame>
//! ```
//!
//! The detector is an external capability; this crate only consumes its
//! output.  [`recording`] provides a replayable implementation of both seams
//! for the command-line player and for tests.

pub mod frame;
pub mod recording;
pub mod source;

pub use frame::*;
pub use recording::{replay, Recording, RecordingError, ReplayCamera, ReplayDetector};
pub use source::{Camera, CameraError, DetectorError, HandDetector, VideoFrame};
