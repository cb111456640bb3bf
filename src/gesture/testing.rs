//! Synthetic hand poses for tests.
//!
//! Hands are built upright (middle fingertip above the wrist) with each
//! finger either extended past its DIP joint or curled back below it.

use crate::landmarks::{
    HandFrame, Landmark, INDEX_DIP, INDEX_TIP, LANDMARK_COUNT, MIDDLE_DIP, MIDDLE_MCP, MIDDLE_TIP,
    PINKY_DIP, PINKY_TIP, RING_DIP, RING_TIP, THUMB_IP, THUMB_TIP, WRIST,
};

use super::GestureKind;

/// Upright hand with `open = [thumb, index, middle, ring, pinky]`.
pub fn pose(open: [bool; 5]) -> HandFrame {
    let mut lm = [Landmark::new(0.5, 0.7); LANDMARK_COUNT];
    lm[WRIST] = Landmark::new(0.5, 0.9);
    lm[MIDDLE_MCP] = Landmark::new(0.5, 0.6);

    lm[THUMB_IP] = Landmark::new(0.3, 0.6);
    lm[THUMB_TIP] = if open[0] {
        Landmark::new(0.22, 0.55)
    } else {
        Landmark::new(0.51, 0.61)
    };

    let fingers = [
        (INDEX_DIP, INDEX_TIP, 0.4, open[1]),
        (MIDDLE_DIP, MIDDLE_TIP, 0.5, open[2]),
        (RING_DIP, RING_TIP, 0.6, open[3]),
        (PINKY_DIP, PINKY_TIP, 0.7, open[4]),
    ];
    for (dip, tip, x, is_open) in fingers {
        lm[dip] = Landmark::new(x, 0.45);
        lm[tip] = Landmark::new(x, if is_open { 0.38 } else { 0.5 });
    }

    HandFrame::new(lm)
}

pub fn open_hand_up() -> HandFrame {
    pose([true; 5])
}

pub fn fist_up() -> HandFrame {
    pose([false; 5])
}

/// Open hand rotated 180° (fingers pointing down).
pub fn rotated_down() -> HandFrame {
    let flipped: Vec<Landmark> = open_hand_up()
        .landmarks()
        .iter()
        .map(|p| Landmark::new(p.x, 1.0 - p.y))
        .collect();
    HandFrame::from_slice(&flipped).expect("21 points")
}

/// A hand performing `gesture`.
pub fn gesture_pose(gesture: GestureKind) -> HandFrame {
    let open = match gesture {
        GestureKind::CloseAllFingers => [false; 5],
        GestureKind::OpenOnlyThumb => [true, false, false, false, false],
        GestureKind::CloseIndexThumb => [false, false, true, true, true],
        GestureKind::CloseThumbIndexMiddle => [false, false, false, true, true],
        GestureKind::CloseOnlyThumb => [false, true, true, true, true],
    };
    pose(open)
}
