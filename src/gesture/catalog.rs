//! The fixed catalog of therapy gestures used by the gesture-match exercise.

use serde::{Deserialize, Serialize};

use super::FingerStates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GestureKind {
    CloseAllFingers,
    OpenOnlyThumb,
    CloseIndexThumb,
    CloseThumbIndexMiddle,
    CloseOnlyThumb,
}

impl GestureKind {
    pub const ALL: [GestureKind; 5] = [
        GestureKind::CloseAllFingers,
        GestureKind::OpenOnlyThumb,
        GestureKind::CloseIndexThumb,
        GestureKind::CloseThumbIndexMiddle,
        GestureKind::CloseOnlyThumb,
    ];

    pub fn id(self) -> &'static str {
        match self {
            GestureKind::CloseAllFingers => "close_all_fingers",
            GestureKind::OpenOnlyThumb => "open_only_thumb",
            GestureKind::CloseIndexThumb => "close_index_thumb",
            GestureKind::CloseThumbIndexMiddle => "close_thumb_index_middle",
            GestureKind::CloseOnlyThumb => "close_only_thumb",
        }
    }

    /// Translation key for the instruction shown to the user.
    pub fn label_key(self) -> &'static str {
        match self {
            GestureKind::CloseAllFingers => "game4_ex_close_all_fingers",
            GestureKind::OpenOnlyThumb => "game4_ex_open_only_thumb",
            GestureKind::CloseIndexThumb => "game4_ex_close_index_thumb",
            GestureKind::CloseThumbIndexMiddle => "game4_ex_close_thumb_index_middle",
            GestureKind::CloseOnlyThumb => "game4_ex_close_only_thumb",
        }
    }

    /// Exact open/closed pattern this gesture requires.
    pub fn pattern(self) -> FingerStates {
        let open = match self {
            GestureKind::CloseAllFingers => [false; 5],
            GestureKind::OpenOnlyThumb => [true, false, false, false, false],
            GestureKind::CloseIndexThumb => [false, false, true, true, true],
            GestureKind::CloseThumbIndexMiddle => [false, false, false, true, true],
            GestureKind::CloseOnlyThumb => [false, true, true, true, true],
        };
        FingerStates::from_array(open)
    }

    pub fn matches(self, fingers: &FingerStates) -> bool {
        self.pattern() == *fingers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gesture::finger_states;
    use crate::gesture::testing::gesture_pose;
    use std::collections::HashSet;

    #[test]
    fn each_pose_matches_only_its_own_gesture() {
        for target in GestureKind::ALL {
            let states = finger_states(&gesture_pose(target));
            for other in GestureKind::ALL {
                assert_eq!(
                    other.matches(&states),
                    other == target,
                    "{} vs {}",
                    target.id(),
                    other.id()
                );
            }
        }
    }

    #[test]
    fn patterns_are_distinct() {
        let set: HashSet<_> = GestureKind::ALL.iter().map(|g| g.pattern()).collect();
        assert_eq!(set.len(), GestureKind::ALL.len());
    }

    #[test]
    fn label_keys_share_prefix() {
        for g in GestureKind::ALL {
            assert!(g.label_key().starts_with("game4_ex_"));
            assert!(g.label_key().ends_with(g.id()));
        }
    }
}
