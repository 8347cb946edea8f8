mod board;
mod face;
mod grid;
mod layout;
mod match_pair;
mod path;
mod tile;

pub use board::Board;
pub use face::{Face, MAX_FACE, STANDARD_FACE_COUNT};
pub use grid::Grid;
pub use layout::{LayoutCode, LayoutCodeError, Shape, MAX_LAYOUT_DIMENSION};
pub use match_pair::MatchPair;
pub use path::{Direction, Path, PathSegment, MAX_SEGMENTS};
pub use tile::{Tile, TileContent};
