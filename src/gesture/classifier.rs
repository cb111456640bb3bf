//! Landmarks → gesture facts.
//!
//! [`GestureClassifier::classify`] is a pure, single-frame decision: no
//! smoothing, no history.  Debounce and edge detection live in the exercise
//! layer.
//!
//! Two coordinate spaces are used:
//!
//! * **canvas pixels** for everything compared against on-screen geometry
//!   (pointer, pinch distance, palm orientation);
//! * **normalized** `[0, 1]` space for per-finger open/closed state, so the
//!   thresholds do not depend on canvas size.

use serde::{Deserialize, Serialize};

use crate::config::CanvasConfig;
use crate::landmarks::{
    HandFrame, Landmark, FINGERTIPS, INDEX_DIP, INDEX_TIP, MIDDLE_DIP, MIDDLE_MCP, MIDDLE_TIP,
    PINKY_DIP, PINKY_TIP, RING_DIP, RING_TIP, THUMB_IP, THUMB_TIP, WRIST,
};

/// Minimum tip-to-DIP distance for index..pinky to count as open.
const FINGER_OPEN_MIN: f32 = 0.04;
/// Minimum tip-to-IP distance for the thumb to count as open.
const THUMB_OPEN_MIN: f32 = 0.05;
/// Thumb tip this close to the middle knuckle is tucked into the palm.
const THUMB_TUCKED_MAX: f32 = 0.06;

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A position in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

// ---------------------------------------------------------------------------
// Fingers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    fn tip(self) -> usize {
        match self {
            Finger::Thumb => THUMB_TIP,
            Finger::Index => INDEX_TIP,
            Finger::Middle => MIDDLE_TIP,
            Finger::Ring => RING_TIP,
            Finger::Pinky => PINKY_TIP,
        }
    }

    /// The joint just below the tip (IP for the thumb, DIP otherwise).
    fn joint(self) -> usize {
        match self {
            Finger::Thumb => THUMB_IP,
            Finger::Index => INDEX_DIP,
            Finger::Middle => MIDDLE_DIP,
            Finger::Ring => RING_DIP,
            Finger::Pinky => PINKY_DIP,
        }
    }
}

/// Open (`true`) / closed (`false`) per finger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FingerStates {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerStates {
    /// Build from `[thumb, index, middle, ring, pinky]`.
    pub fn from_array(open: [bool; 5]) -> Self {
        let [thumb, index, middle, ring, pinky] = open;
        Self {
            thumb,
            index,
            middle,
            ring,
            pinky,
        }
    }

    pub fn is_open(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    pub fn open_count(&self) -> usize {
        Finger::ALL.iter().filter(|f| self.is_open(**f)).count()
    }
}

/// Orientation-aware open/closed state of every finger.
///
/// The hand is "up" when the middle fingertip is above the wrist.  A
/// non-thumb finger is open when its tip is far enough from the DIP joint
/// *and* lies beyond it in the hand's direction, so a rotated hand does not
/// flip the reading.  The thumb is forced closed when its tip rests near the
/// middle knuckle.
pub fn finger_states(hand: &HandFrame) -> FingerStates {
    let wrist = hand.landmark(WRIST);
    let hand_up = hand.landmark(MIDDLE_TIP).y < wrist.y;
    let thumb_tucked =
        hand.landmark(THUMB_TIP).distance(&hand.landmark(MIDDLE_MCP)) < THUMB_TUCKED_MAX;

    let open = Finger::ALL.map(|finger| {
        let tip = hand.landmark(finger.tip());
        let joint = hand.landmark(finger.joint());
        let reach = tip.distance(&joint);

        match finger {
            Finger::Thumb => !thumb_tucked && reach > THUMB_OPEN_MIN,
            _ => {
                let dy = tip.y - joint.y;
                let extends = if hand_up { dy < 0.0 } else { dy > 0.0 };
                reach > FINGER_OPEN_MIN && extends
            }
        }
    });

    FingerStates::from_array(open)
}

// ---------------------------------------------------------------------------
// GestureFacts
// ---------------------------------------------------------------------------

/// Which landmark drives the on-screen pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerAnchor {
    /// Landmark 9: steady "hand centre".
    MiddleKnuckle,
    /// Landmark 8: precise, used for tile picking.
    IndexTip,
    /// Mean of the five fingertips: follows a pinched grip.
    FingertipCentroid,
}

/// Discrete facts derived from one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureFacts {
    /// Pointer position in canvas pixels.
    pub pointer: Point,
    /// Thumb tip and index tip are within the pinch threshold.
    pub pinch: bool,
    /// Per-finger open/closed state.
    pub fingers: FingerStates,
    /// Middle fingertip lies below the middle knuckle on screen.
    pub palm_down: bool,
}

// ---------------------------------------------------------------------------
// GestureClassifier
// ---------------------------------------------------------------------------

/// Projects landmarks into canvas space and derives [`GestureFacts`].
///
/// Mirroring is decided once here; no call site re-derives it.
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    width: f32,
    height: f32,
    mirrored: bool,
    pinch_threshold_px: f32,
    anchor: PointerAnchor,
}

impl GestureClassifier {
    pub fn new(canvas: &CanvasConfig, anchor: PointerAnchor) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            mirrored: canvas.mirrored,
            pinch_threshold_px: canvas.pinch_threshold_px,
            anchor,
        }
    }

    pub fn anchor(&self) -> PointerAnchor {
        self.anchor
    }

    /// `None` when no hand is present ("no gesture").
    pub fn classify(&self, hand: Option<&HandFrame>) -> Option<GestureFacts> {
        let hand = hand?;

        let thumb = self.project(hand.landmark(THUMB_TIP));
        let index = self.project(hand.landmark(INDEX_TIP));
        let knuckle = self.project(hand.landmark(MIDDLE_MCP));
        let middle_tip = self.project(hand.landmark(MIDDLE_TIP));

        let pointer = match self.anchor {
            PointerAnchor::MiddleKnuckle => knuckle,
            PointerAnchor::IndexTip => index,
            PointerAnchor::FingertipCentroid => {
                let (sx, sy) = FINGERTIPS.iter().fold((0.0, 0.0), |(sx, sy), &i| {
                    let p = self.project(hand.landmark(i));
                    (sx + p.x, sy + p.y)
                });
                let n = FINGERTIPS.len() as f32;
                Point::new(sx / n, sy / n)
            }
        };

        Some(GestureFacts {
            pointer,
            pinch: thumb.distance(&index) < self.pinch_threshold_px,
            fingers: finger_states(hand),
            palm_down: middle_tip.y > knuckle.y,
        })
    }

    /// Normalized landmark → canvas pixels, honouring the mirror flag.
    pub fn project(&self, lm: Landmark) -> Point {
        let x = if self.mirrored { 1.0 - lm.x } else { lm.x };
        Point::new(x * self.width, lm.y * self.height)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::testing::{fist_up, open_hand_up, pose, rotated_down};
    use crate::landmarks::{HandFrame, Landmark, INDEX_TIP, MIDDLE_MCP, THUMB_TIP};

    fn canvas(mirrored: bool) -> CanvasConfig {
        CanvasConfig {
            width: 640.0,
            height: 480.0,
            mirrored,
            pinch_threshold_px: 35.0,
        }
    }

    #[test]
    fn no_hand_is_no_gesture() {
        let c = GestureClassifier::new(&canvas(false), PointerAnchor::MiddleKnuckle);
        assert!(c.classify(None).is_none());
    }

    #[test]
    fn pointer_scales_to_canvas() {
        let hand = open_hand_up().with_landmark(MIDDLE_MCP, Landmark::new(0.25, 0.5));
        let c = GestureClassifier::new(&canvas(false), PointerAnchor::MiddleKnuckle);
        let facts = c.classify(Some(&hand)).unwrap();
        assert_eq!(facts.pointer, Point::new(160.0, 240.0));
    }

    #[test]
    fn mirrored_flips_x_only() {
        let hand = open_hand_up().with_landmark(INDEX_TIP, Landmark::new(0.25, 0.5));
        let c = GestureClassifier::new(&canvas(true), PointerAnchor::IndexTip);
        let facts = c.classify(Some(&hand)).unwrap();
        assert_eq!(facts.pointer, Point::new(480.0, 240.0));
    }

    #[test]
    fn centroid_averages_fingertips() {
        let mut points = [Landmark::new(0.5, 0.5); 21];
        for (k, &tip) in FINGERTIPS.iter().enumerate() {
            points[tip] = Landmark::new(0.1 * k as f32, 0.5);
        }
        let hand = HandFrame::new(points);
        let c = GestureClassifier::new(&canvas(false), PointerAnchor::FingertipCentroid);
        let facts = c.classify(Some(&hand)).unwrap();
        // mean x = (0 + .1 + .2 + .3 + .4) / 5 = 0.2
        assert!((facts.pointer.x - 128.0).abs() < 1e-3);
        assert!((facts.pointer.y - 240.0).abs() < 1e-3);
    }

    #[test]
    fn pinch_uses_pixel_threshold() {
        let c = GestureClassifier::new(&canvas(false), PointerAnchor::IndexTip);

        // 30 px apart horizontally on a 640-wide canvas.
        let close = open_hand_up()
            .with_landmark(THUMB_TIP, Landmark::new(0.5, 0.5))
            .with_landmark(INDEX_TIP, Landmark::new(0.5 + 30.0 / 640.0, 0.5));
        assert!(c.classify(Some(&close)).unwrap().pinch);

        // 40 px apart.
        let apart = open_hand_up()
            .with_landmark(THUMB_TIP, Landmark::new(0.5, 0.5))
            .with_landmark(INDEX_TIP, Landmark::new(0.5 + 40.0 / 640.0, 0.5));
        assert!(!c.classify(Some(&apart)).unwrap().pinch);
    }

    #[test]
    fn open_hand_reads_all_open() {
        assert_eq!(
            finger_states(&open_hand_up()),
            FingerStates::from_array([true; 5])
        );
    }

    #[test]
    fn fist_reads_all_closed() {
        assert_eq!(finger_states(&fist_up()), FingerStates::default());
    }

    #[test]
    fn orientation_is_respected_when_hand_points_down() {
        // Same extended fingers, hand rotated 180°: still open.
        assert_eq!(
            finger_states(&rotated_down()),
            FingerStates::from_array([true; 5])
        );
    }

    #[test]
    fn tucked_thumb_is_closed_even_when_far_from_its_joint() {
        let hand = open_hand_up().with_landmark(THUMB_TIP, Landmark::new(0.51, 0.61));
        assert!(!finger_states(&hand).thumb);
    }

    #[test]
    fn custom_pose_only_thumb_open() {
        let states = finger_states(&pose([true, false, false, false, false]));
        assert_eq!(states, FingerStates::from_array([true, false, false, false, false]));
        assert_eq!(states.open_count(), 1);
    }

    #[test]
    fn palm_down_compares_middle_tip_to_knuckle() {
        let c = GestureClassifier::new(&canvas(false), PointerAnchor::MiddleKnuckle);
        assert!(!c.classify(Some(&open_hand_up())).unwrap().palm_down);
        assert!(c.classify(Some(&rotated_down())).unwrap().palm_down);
    }
}
