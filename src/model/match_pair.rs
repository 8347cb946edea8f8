use serde::{Deserialize, Serialize};

/// An unordered pair of tile ids; stored lowest id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
pub struct MatchPair {
    pub first: usize,
    pub second: usize,
}

impl MatchPair {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn contains(&self, tile: usize) -> bool {
        self.first == tile || self.second == tile
    }

    /// The other end of the pair, if `tile` is one of its ends.
    pub fn partner_of(&self, tile: usize) -> Option<usize> {
        if self.first == tile {
            Some(self.second)
        } else if self.second == tile {
            Some(self.first)
        } else {
            None
        }
    }
}

impl std::fmt::Display for MatchPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} <-> {}", self.first, self.second)
    }
}
