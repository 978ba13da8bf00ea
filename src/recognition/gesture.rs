use std::fmt;

use super::classifier::{Finger, FingerState};

/// Closed set of gestures. Anything that is not one of the counting poses is
/// `Unknown` rather than a best guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gesture {
    Fist,
    One,
    Two,
    Three,
    Four,
    Five,
    Unknown,
}

impl Gesture {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fist => "0",
            Self::One => "1",
            Self::Two => "2",
            Self::Three => "3",
            Self::Four => "4",
            Self::Five => "5",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rule matches when exactly `extended` are raised and every other finger is
/// flexed.
struct GestureRule {
    gesture: Gesture,
    extended: &'static [Finger],
}

impl GestureRule {
    fn matches(&self, state: &FingerState) -> bool {
        state.extended_count() == self.extended.len()
            && self.extended.iter().all(|f| state.is_extended(*f))
    }
}

// 按顺序匹配，第一条命中即返回
const GESTURE_RULES: [GestureRule; 6] = [
    GestureRule {
        gesture: Gesture::Fist,
        extended: &[],
    },
    GestureRule {
        gesture: Gesture::One,
        extended: &[Finger::Index],
    },
    GestureRule {
        gesture: Gesture::Two,
        extended: &[Finger::Index, Finger::Middle],
    },
    GestureRule {
        gesture: Gesture::Three,
        extended: &[Finger::Index, Finger::Middle, Finger::Ring],
    },
    GestureRule {
        gesture: Gesture::Four,
        extended: &[Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky],
    },
    GestureRule {
        gesture: Gesture::Five,
        extended: &Finger::ALL,
    },
];

pub fn recognize(state: &FingerState) -> Gesture {
    GESTURE_RULES
        .iter()
        .find(|rule| rule.matches(state))
        .map(|rule| rule.gesture)
        .unwrap_or(Gesture::Unknown)
}
