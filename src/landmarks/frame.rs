//! One detected hand: 21 normalized landmark points.
//!
//! Coordinates are normalized to `[0, 1]` relative to the video frame,
//! origin top-left, `y` growing downwards.  `z` (depth) is carried through
//! but unused by the classifier.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Landmark indices
// ---------------------------------------------------------------------------

pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// The five fingertips, thumb first.
pub const FINGERTIPS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ---------------------------------------------------------------------------
// Landmark
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar distance in normalized units (depth ignored).
    pub fn distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ---------------------------------------------------------------------------
// HandFrame
// ---------------------------------------------------------------------------

/// A single hand as produced by the detector for one video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct HandFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl HandFrame {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Build from a slice; `None` unless exactly 21 points are given.
    pub fn from_slice(points: &[Landmark]) -> Option<Self> {
        let landmarks: [Landmark; LANDMARK_COUNT] = points.try_into().ok()?;
        Some(Self { landmarks })
    }

    /// Landmark by index (see the `*_TIP`, `*_MCP` … constants).
    ///
    /// # Panics
    ///
    /// Panics when `index >= 21`; callers use the named constants.
    pub fn landmark(&self, index: usize) -> Landmark {
        self.landmarks[index]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    /// Overwrite one landmark.  Handy for building synthetic poses.
    pub fn with_landmark(mut self, index: usize, landmark: Landmark) -> Self {
        if let Some(slot) = self.landmarks.get_mut(index) {
            *slot = landmark;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_slice_requires_21_points() {
        assert!(HandFrame::from_slice(&[Landmark::default(); 20]).is_none());
        assert!(HandFrame::from_slice(&[Landmark::default(); 22]).is_none());
        assert!(HandFrame::from_slice(&[Landmark::default(); 21]).is_some());
    }

    #[test]
    fn distance_ignores_depth() {
        let a = Landmark { x: 0.0, y: 0.0, z: 5.0 };
        let b = Landmark::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn with_landmark_replaces_single_point() {
        let frame = HandFrame::new([Landmark::default(); LANDMARK_COUNT])
            .with_landmark(INDEX_TIP, Landmark::new(0.25, 0.75));
        assert_eq!(frame.landmark(INDEX_TIP), Landmark::new(0.25, 0.75));
        assert_eq!(frame.landmark(WRIST), Landmark::default());
    }

    #[test]
    fn landmark_deserializes_without_depth() {
        let lm: Landmark = serde_json::from_str(r#"{"x":0.5,"y":0.25}"#).unwrap();
        assert_eq!(lm, Landmark::new(0.5, 0.25));
    }
}
