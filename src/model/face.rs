use serde::{Deserialize, Serialize};

/// Highest representable face value (Mahjong Tiles block, 1F000 + 41).
pub const MAX_FACE: u8 = 41;

/// Number of distinct faces used when generating boards.
pub const STANDARD_FACE_COUNT: u8 = 34;

/// The pictorial identity of a tile. Two tiles match only if their faces are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Face(u8);

impl Face {
    pub fn new(value: u8) -> Option<Self> {
        if value <= MAX_FACE {
            Some(Self(value))
        } else {
            None
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// All faces handed out by the generators, in canonical order.
    pub fn standard() -> Vec<Face> {
        (0..STANDARD_FACE_COUNT).map(Face).collect()
    }
}

impl TryFrom<u8> for Face {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Face::new(value).ok_or_else(|| format!("face value {} out of range", value))
    }
}

impl From<Face> for u8 {
    fn from(face: Face) -> u8 {
        face.0
    }
}

impl std::fmt::Display for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}
