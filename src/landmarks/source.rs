//! Seams to the external camera and hand-landmark detector.
//!
//! Neither is implemented by this crate for real hardware.  A host plugs in
//! its own [`Camera`] (stream acquisition + frame grabbing) and
//! [`HandDetector`] (frame → zero-or-one [`HandFrame`]).  The session's frame
//! pump awaits one detection before grabbing the next frame, so at most one
//! inference is ever in flight.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use thiserror::Error;

use super::HandFrame;

// ---------------------------------------------------------------------------
// VideoFrame
// ---------------------------------------------------------------------------

/// Opaque handle to one captured video frame.
///
/// The core never inspects `pixels`; it only forwards the frame to the
/// detector.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Monotonic frame counter within one acquired stream, starting at 0.
    pub sequence: u64,
    /// When the frame was grabbed.
    pub captured_at: Instant,
    /// Raw image bytes in whatever layout the camera and detector agree on.
    pub pixels: Arc<[u8]>,
}

impl VideoFrame {
    /// A frame carrying no pixel data (recorded sessions, tests).
    pub fn empty(sequence: u64, captured_at: Instant) -> Self {
        Self {
            sequence,
            captured_at,
            pixels: Arc::from(Vec::new()),
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while acquiring the camera stream.
#[derive(Debug, Clone, Error)]
pub enum CameraError {
    /// The user (or platform policy) refused camera access.
    #[error("camera permission denied")]
    PermissionDenied,

    /// No usable camera, or the device failed to start.
    #[error("camera unavailable: {0}")]
    Unavailable(String),
}

/// Errors raised by a detector inference call.
#[derive(Debug, Clone, Error)]
pub enum DetectorError {
    /// The detector model is not loaded / not ready.
    #[error("hand detector is not ready")]
    NotReady,

    /// The inference call rejected.
    #[error("hand detection failed: {0}")]
    Inference(String),
}

// ---------------------------------------------------------------------------
// Camera
// ---------------------------------------------------------------------------

/// A camera stream that can be acquired, read frame by frame and released.
///
/// `release` must be deterministic: after it returns, the device is free and
/// its activity indicator is off.  Releasing an inactive camera is a no-op.
#[async_trait]
pub trait Camera: Send {
    /// Request the stream.  May suspend while the user answers a permission
    /// prompt.
    async fn acquire(&mut self) -> Result<(), CameraError>;

    /// Next frame, or `None` when the stream has ended or is not acquired.
    async fn next_frame(&mut self) -> Option<VideoFrame>;

    /// Stop all tracks and drop the stream.
    fn release(&mut self);

    /// `true` between a successful `acquire` and `release`.
    fn is_active(&self) -> bool;
}

// ---------------------------------------------------------------------------
// HandDetector
// ---------------------------------------------------------------------------

/// External hand-landmark model.
///
/// Returns `Ok(None)` when no hand is visible; at most one hand is reported.
#[async_trait]
pub trait HandDetector: Send + Sync {
    async fn detect(&self, frame: &VideoFrame) -> Result<Option<HandFrame>, DetectorError>;
}

// Compile-time assertion: both seams are object-safe.
const _: fn() = || {
    fn _assert_camera(_: Box<dyn Camera>) {}
    fn _assert_detector(_: Box<dyn HandDetector>) {}
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_frame_has_no_pixels() {
        let frame = VideoFrame::empty(7, Instant::now());
        assert_eq!(frame.sequence, 7);
        assert!(frame.pixels.is_empty());
    }

    #[test]
    fn errors_render_human_readable() {
        assert_eq!(
            CameraError::PermissionDenied.to_string(),
            "camera permission denied"
        );
        assert_eq!(
            DetectorError::Inference("wasm trap".into()).to_string(),
            "hand detection failed: wasm trap"
        );
    }

    #[test]
    fn video_frame_is_send() {
        fn assert_send<T: Send + Sync>() {}
        assert_send::<VideoFrame>();
    }
}
