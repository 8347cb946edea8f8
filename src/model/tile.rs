use serde::{Deserialize, Serialize};

use super::Face;

/// What a board cell currently holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum TileContent {
    Empty,
    Faced(Face),
    /// Matched and logically gone, but still shown while it animates out.
    Removing(Face),
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Tile {
    pub id: usize,
    pub content: TileContent,
}

impl Tile {
    pub fn new(id: usize, content: TileContent) -> Self {
        Self { id, content }
    }

    pub fn empty(id: usize) -> Self {
        Self::new(id, TileContent::Empty)
    }

    pub fn faced(id: usize, face: Face) -> Self {
        Self::new(id, TileContent::Faced(face))
    }

    /// The face of a tile that is still in play.
    pub fn face(&self) -> Option<Face> {
        match self.content {
            TileContent::Faced(face) => Some(face),
            _ => None,
        }
    }

    pub fn is_in_play(&self) -> bool {
        matches!(self.content, TileContent::Faced(_))
    }

    /// Lines may pass through empty cells and through tiles that are animating out.
    pub fn is_passable(&self) -> bool {
        !self.is_in_play()
    }
}

impl std::fmt::Display for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.content {
            TileContent::Empty => write!(f, ".."),
            TileContent::Faced(face) => write!(f, "{}", face),
            TileContent::Removing(_) => write!(f, "~~"),
        }
    }
}

impl std::fmt::Debug for Tile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}:{}", self.id, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_removing_tiles_are_passable() {
        let face = Face::new(3).unwrap();
        assert!(Tile::empty(0).is_passable());
        assert!(!Tile::faced(0, face).is_passable());
        assert!(Tile::new(0, TileContent::Removing(face)).is_passable());
        assert_eq!(Tile::new(0, TileContent::Removing(face)).face(), None);
    }
}
