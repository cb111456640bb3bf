//! Gesture recognition: one [`HandFrame`](crate::landmarks::HandFrame) in,
//! [`GestureFacts`] out.
//!
//! ```text
//! Option<HandFrame> ──▶ GestureClassifier::classify ──▶ Option<GestureFacts>
//!                                                        ├─ pointer (canvas px)
//!                                                        ├─ pinch
//!                                                        ├─ fingers (open/closed ×5)
//!                                                        └─ palm_down
//! ```

pub mod catalog;
pub mod classifier;

#[cfg(test)]
pub(crate) mod testing;

pub use catalog::GestureKind;
pub use classifier::{
    finger_states, Finger, FingerStates, GestureClassifier, GestureFacts, PointerAnchor, Point,
};
