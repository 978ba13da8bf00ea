use serde::Deserialize;

/// Number of landmarks the hand model emits for one hand.
pub const LANDMARK_COUNT: usize = 21;

/// One normalized landmark. `x` grows rightward, `y` grows downward (image
/// coordinates), both in `[0, 1]`. `z` is relative depth and unused by the
/// classifier.
#[derive(Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

#[cfg(test)]
impl Landmark {
    pub(crate) fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LandmarkError {
    #[error("malformed hand: expected {expected} landmarks, got {actual}")]
    WrongPointCount { expected: usize, actual: usize },
    #[error("malformed hand: landmark {index} has non-finite coordinates")]
    NonFinite { index: usize },
}

/// A detected hand: exactly 21 landmarks in the model's fixed order
/// (wrist = 0, then four joints per finger from base to tip).
#[derive(Clone, Debug, PartialEq)]
pub struct Hand {
    points: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn point(&self, index: usize) -> &Landmark {
        &self.points[index]
    }
}

#[cfg(test)]
impl Hand {
    pub(crate) fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub(crate) fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }
}

impl TryFrom<Vec<Landmark>> for Hand {
    type Error = LandmarkError;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        if let Some(index) = points
            .iter()
            .position(|p| !p.x.is_finite() || !p.y.is_finite())
        {
            return Err(LandmarkError::NonFinite { index });
        }

        let actual = points.len();
        let points: [Landmark; LANDMARK_COUNT] = points
            .try_into()
            .map_err(|_| LandmarkError::WrongPointCount {
                expected: LANDMARK_COUNT,
                actual,
            })?;

        Ok(Self { points })
    }
}
