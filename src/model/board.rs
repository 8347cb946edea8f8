use serde::{Deserialize, Serialize};

use super::{Face, Grid, Tile, TileContent};

/// A flat grid of tiles with a permanently empty ring around the playing area.
///
/// `width` and `height` describe the playing area; the tile vector covers the
/// padded `(width + 2) x (height + 2)` grid. See [`Grid`] for addressing.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "BoardData")]
pub struct Board {
    pub width: usize,
    pub height: usize,
    tiles: Vec<Tile>,
}

/// Unchecked wire form of a [`Board`].
#[derive(Deserialize)]
struct BoardData {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TryFrom<BoardData> for Board {
    type Error = String;

    fn try_from(data: BoardData) -> Result<Self, Self::Error> {
        let (width, height) = (data.width, data.height);
        let padded = width
            .checked_add(2)
            .zip(height.checked_add(2))
            .and_then(|(w, h)| w.checked_mul(h));
        if padded != Some(data.tiles.len()) {
            return Err(format!(
                "{} tiles do not cover a padded {}x{} board",
                data.tiles.len(),
                width,
                height
            ));
        }
        if let Some((index, tile)) = data.tiles.iter().enumerate().find(|(i, tile)| tile.id != *i) {
            return Err(format!("tile at position {} has id {}", index, tile.id));
        }
        let contents = data.tiles.into_iter().map(|tile| tile.content).collect();
        Board::from_contents(width, height, contents)
            .ok_or_else(|| format!("{}x{} board has tiles on its border", width, height))
    }
}

impl Board {
    pub fn new_empty(width: usize, height: usize) -> Self {
        let tiles = (0..Grid::new(width, height).len()).map(Tile::empty).collect();
        Self {
            width,
            height,
            tiles,
        }
    }

    /// Build a board from padded-grid contents. Returns `None` when the length does
    /// not fit the dimensions or the border ring is not empty.
    pub fn from_contents(
        width: usize,
        height: usize,
        contents: Vec<TileContent>,
    ) -> Option<Self> {
        let grid = Grid::new(width, height);
        if contents.len() != grid.len() {
            return None;
        }
        let border_occupied = contents
            .iter()
            .enumerate()
            .any(|(id, content)| grid.is_border(id) && *content != TileContent::Empty);
        if border_occupied {
            return None;
        }
        let tiles = contents
            .into_iter()
            .enumerate()
            .map(|(id, content)| Tile::new(id, content))
            .collect();
        Some(Self {
            width,
            height,
            tiles,
        })
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tile(&self, id: usize) -> Option<&Tile> {
        self.tiles.get(id)
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn face_at(&self, id: usize) -> Option<Face> {
        self.tile(id).and_then(|tile| tile.face())
    }

    /// Overwrite a cell. Writes to the border ring or past the end are ignored.
    pub fn set(&mut self, id: usize, content: TileContent) {
        if id < self.tiles.len() && !self.grid().is_border(id) {
            self.tiles[id].content = content;
        }
    }

    /// Tiles still in play, in id order.
    pub fn faced_tiles(&self) -> impl Iterator<Item = &Tile> + '_ {
        self.tiles.iter().filter(|tile| tile.is_in_play())
    }

    pub fn faced_count(&self) -> usize {
        self.faced_tiles().count()
    }

    /// Cell-by-cell content, used to compare generated layouts.
    pub fn contents(&self) -> Vec<TileContent> {
        self.tiles.iter().map(|tile| tile.content).collect()
    }

    #[cfg(test)]
    /// Parse the playing area from rows of whitespace separated cells: `..` for
    /// empty, a number for a face. The border ring is added around it.
    pub fn parse(s: &str) -> Self {
        let rows: Vec<Vec<&str>> = s
            .lines()
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|cells| !cells.is_empty())
            .collect();
        let height = rows.len();
        let width = rows[0].len();
        let mut board = Board::new_empty(width, height);
        let grid = board.grid();
        for (r, cells) in rows.iter().enumerate() {
            assert_eq!(cells.len(), width, "ragged row {}", r);
            for (c, cell) in cells.iter().enumerate() {
                if *cell == ".." {
                    continue;
                }
                let face = Face::new(cell.parse::<u8>().unwrap()).unwrap();
                board.set(grid.index(r + 1, c + 1), TileContent::Faced(face));
            }
        }
        board
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let grid = self.grid();
        let mut output = String::new();
        for row in 1..=self.height {
            let cells: Vec<String> = (1..=self.width)
                .map(|col| self.tiles[grid.index(row, col)].to_string())
                .collect();
            output.push_str(&cells.join(" "));
            output.push('\n');
        }
        write!(f, "{}", output)
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\n{}x{}\n{}", self.width, self.height, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let board = Board::parse(
            "
            01 .. 02
            .. 01 02
            ",
        );
        assert_eq!(board.width, 3);
        assert_eq!(board.height, 2);
        assert_eq!(board.len(), 20);
        assert_eq!(board.faced_count(), 4);
        assert_eq!(board.face_at(6), Face::new(1));
        assert_eq!(board.to_string(), "01 .. 02\n.. 01 02\n");
    }

    #[test]
    fn test_deserialize_checks_layout() {
        let board = Board::parse(
            "
            01 02
            02 01
            ",
        );
        let json = serde_json::to_value(&board).unwrap();
        assert_eq!(serde_json::from_value::<Board>(json.clone()).unwrap(), board);

        let mut on_border = json.clone();
        on_border["tiles"][0]["content"] = serde_json::json!({ "Faced": 1 });
        assert!(serde_json::from_value::<Board>(on_border).is_err());

        let mut too_wide = json.clone();
        too_wide["width"] = serde_json::json!(3);
        assert!(serde_json::from_value::<Board>(too_wide).is_err());

        let mut shuffled_ids = json;
        shuffled_ids["tiles"][5]["id"] = serde_json::json!(9);
        assert!(serde_json::from_value::<Board>(shuffled_ids).is_err());
    }

    #[test]
    fn test_border_is_read_only() {
        let mut board = Board::new_empty(2, 2);
        board.set(0, TileContent::Faced(Face::new(1).unwrap()));
        assert_eq!(board.tile(0).unwrap().content, TileContent::Empty);
        assert!(Board::from_contents(2, 2, board.contents()).is_some());

        let mut contents = board.contents();
        contents[0] = TileContent::Faced(Face::new(1).unwrap());
        assert!(Board::from_contents(2, 2, contents).is_none());
        assert!(Board::from_contents(3, 2, board.contents()).is_none());
    }
}
