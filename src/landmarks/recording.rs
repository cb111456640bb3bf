//! Recorded landmark sessions and their replay.
//!
//! A recording is a JSON-lines file: one line per processed video frame,
//! either `null` (no hand detected) or an array of 21 `[x, y]` / `[x, y, z]`
//! points.  Blank lines are skipped.
//!
//! ```text
//! null
//! [[0.51,0.82,0.0],[0.47,0.74,-0.01], … 21 points … ]
//! ```
//!
//! [`replay`] turns a [`Recording`] into a [`ReplayCamera`] +
//! [`ReplayDetector`] pair: the camera emits one empty [`VideoFrame`] per
//! line (paced at a fixed interval) and the detector answers with the
//! recorded hand for that frame's sequence number.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;

use super::source::{Camera, CameraError, DetectorError, HandDetector, VideoFrame};
use super::{HandFrame, Landmark, LANDMARK_COUNT};

// ---------------------------------------------------------------------------
// RecordingError
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("failed to read recording: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Json {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: expected 21 landmarks, found {found}")]
    LandmarkCount { line: usize, found: usize },

    #[error("line {line}: landmark {index} must have 2 or 3 coordinates")]
    Coordinates { line: usize, index: usize },
}

// ---------------------------------------------------------------------------
// Recording
// ---------------------------------------------------------------------------

/// An in-memory landmark recording.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recording {
    frames: Vec<Option<HandFrame>>,
}

impl Recording {
    pub fn from_frames(frames: Vec<Option<HandFrame>>) -> Self {
        Self { frames }
    }

    /// Read and parse a `.jsonl` file.
    pub fn load(path: &Path) -> Result<Self, RecordingError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse JSON-lines text.  Line numbers in errors are 1-based.
    pub fn parse(content: &str) -> Result<Self, RecordingError> {
        let mut frames = Vec::new();

        for (i, raw) in content.lines().enumerate() {
            let line = i + 1;
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }

            let points: Option<Vec<Vec<f32>>> = serde_json::from_str(raw)
                .map_err(|source| RecordingError::Json { line, source })?;

            let Some(points) = points else {
                frames.push(None);
                continue;
            };

            if points.len() != LANDMARK_COUNT {
                return Err(RecordingError::LandmarkCount {
                    line,
                    found: points.len(),
                });
            }

            let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
            for (index, coords) in points.iter().enumerate() {
                landmarks[index] = match coords.as_slice() {
                    [x, y] => Landmark::new(*x, *y),
                    [x, y, z] => Landmark {
                        x: *x,
                        y: *y,
                        z: *z,
                    },
                    _ => return Err(RecordingError::Coordinates { line, index }),
                };
            }
            frames.push(Some(HandFrame::new(landmarks)));
        }

        Ok(Self { frames })
    }

    /// Serialize back to JSON-lines (one frame per line, trailing newline).
    pub fn to_jsonl(&self) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            let line = match frame {
                None => serde_json::Value::Null,
                Some(hand) => serde_json::json!(hand
                    .landmarks()
                    .iter()
                    .map(|lm| [lm.x, lm.y, lm.z])
                    .collect::<Vec<_>>()),
            };
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Recorded detection for frame `sequence`; outer `None` when out of
    /// range, inner `None` for "no hand".
    pub fn frame(&self, sequence: u64) -> Option<&Option<HandFrame>> {
        usize::try_from(sequence)
            .ok()
            .and_then(|i| self.frames.get(i))
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Split a recording into a camera/detector pair sharing the same frames.
///
/// `frame_interval` paces the camera; `Duration::ZERO` replays as fast as the
/// consumer pulls.
pub fn replay(recording: Recording, frame_interval: Duration) -> (ReplayCamera, ReplayDetector) {
    let recording = Arc::new(recording);
    (
        ReplayCamera {
            recording: Arc::clone(&recording),
            frame_interval,
            cursor: 0,
            active: false,
        },
        ReplayDetector { recording },
    )
}

/// Camera that emits one frame per recorded line.
#[derive(Debug)]
pub struct ReplayCamera {
    recording: Arc<Recording>,
    frame_interval: Duration,
    cursor: u64,
    active: bool,
}

#[async_trait]
impl Camera for ReplayCamera {
    async fn acquire(&mut self) -> Result<(), CameraError> {
        if self.recording.is_empty() {
            return Err(CameraError::Unavailable("recording has no frames".into()));
        }
        self.cursor = 0;
        self.active = true;
        log::debug!("replay camera: acquired ({} frames)", self.recording.len());
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<VideoFrame> {
        if !self.active || self.recording.frame(self.cursor).is_none() {
            return None;
        }
        if !self.frame_interval.is_zero() {
            tokio::time::sleep(self.frame_interval).await;
        }
        let frame = VideoFrame::empty(self.cursor, Instant::now());
        self.cursor += 1;
        Some(frame)
    }

    fn release(&mut self) {
        if self.active {
            log::debug!("replay camera: released at frame {}", self.cursor);
        }
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Detector that answers from the recording by frame sequence number.
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    recording: Arc<Recording>,
}

#[async_trait]
impl HandDetector for ReplayDetector {
    async fn detect(&self, frame: &VideoFrame) -> Result<Option<HandFrame>, DetectorError> {
        self.recording
            .frame(frame.sequence)
            .cloned()
            .ok_or_else(|| {
                DetectorError::Inference(format!(
                    "frame {} is not in the recording",
                    frame.sequence
                ))
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
