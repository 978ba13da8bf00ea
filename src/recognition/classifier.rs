use crate::types::Hand;

pub const WRIST: usize = 0;
pub const MIDDLE_BASE: usize = 9;

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

    /// Landmark indices of this finger, base to tip.
    pub fn joints(&self) -> [usize; 4] {
        match self {
            Self::Thumb => [1, 2, 3, 4],
            Self::Index => [5, 6, 7, 8],
            Self::Middle => [9, 10, 11, 12],
            Self::Ring => [13, 14, 15, 16],
            Self::Pinky => [17, 18, 19, 20],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn is_right(&self) -> bool {
        matches!(self, Self::Right)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Extended/flexed flag for each of the five fingers of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState {
    extended: [bool; 5],
}

impl FingerState {
    pub fn from_fn(mut f: impl FnMut(Finger) -> bool) -> Self {
        let mut extended = [false; 5];
        for finger in Finger::ALL {
            extended[finger as usize] = f(finger);
        }
        Self { extended }
    }

    pub fn is_extended(&self, finger: Finger) -> bool {
        self.extended[finger as usize]
    }

    pub fn extended_count(&self) -> usize {
        self.extended.iter().filter(|e| **e).count()
    }

    pub fn extended(&self) -> impl Iterator<Item = Finger> + '_ {
        Finger::ALL.into_iter().filter(|f| self.is_extended(*f))
    }
}

/// Right hand when the wrist sits left of the middle finger base.
///
/// Only holds for an upright hand facing the camera; a rotated or
/// back-facing hand can come out reversed.
pub fn handedness(hand: &Hand) -> Handedness {
    if hand.point(WRIST).x < hand.point(MIDDLE_BASE).x {
        Handedness::Right
    } else {
        Handedness::Left
    }
}

/// Tip against the joint directly below it (third of the finger's four
/// landmarks). The thumb moves sideways so it is compared on x (direction
/// depends on handedness); other fingers on y, where a smaller y is higher in
/// the image.
pub fn is_finger_extended(hand: &Hand, finger: Finger, handedness: Handedness) -> bool {
    let joints = finger.joints();
    let tip = hand.point(joints[3]);
    let pip = hand.point(joints[2]);

    match finger {
        Finger::Thumb if handedness.is_right() => tip.x > pip.x,
        Finger::Thumb => tip.x < pip.x,
        _ => tip.y < pip.y,
    }
}

pub fn classify(hand: &Hand) -> (Handedness, FingerState) {
    let handedness = handedness(hand);
    let state = FingerState::from_fn(|finger| is_finger_extended(hand, finger, handedness));
    (handedness, state)
}

#[cfg(test)]
impl Handedness {
    pub(crate) fn flipped(&self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

#[cfg(test)]
impl FingerState {
    /// State with exactly `fingers` extended.
    pub(crate) fn with_extended(fingers: &[Finger]) -> Self {
        Self::from_fn(|finger| fingers.contains(&finger))
    }
}
