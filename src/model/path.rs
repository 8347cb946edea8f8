use serde::{Deserialize, Serialize};

/// A path may bend at most twice.
pub const MAX_SEGMENTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub fn all() -> [Direction; 4] {
        [
            Direction::Right,
            Direction::Left,
            Direction::Down,
            Direction::Up,
        ]
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// The two directions a line can turn into from this one.
    pub fn perpendicular(&self) -> [Direction; 2] {
        if self.is_horizontal() {
            [Direction::Up, Direction::Down]
        } else {
            [Direction::Left, Direction::Right]
        }
    }

    /// (row delta, column delta)
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn code(&self) -> char {
        match self {
            Direction::Up => 'U',
            Direction::Down => 'D',
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// One straight run of a path. `cells` holds tile ids in walking order; a segment
/// that follows a turn starts on the corner cell the previous segment ended on.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathSegment {
    pub direction: Direction,
    pub cells: Vec<usize>,
}

impl PathSegment {
    pub fn new(direction: Direction, start: usize) -> Self {
        Self {
            direction,
            cells: vec![start],
        }
    }

    pub fn last_cell(&self) -> usize {
        // segments are never built empty
        self.cells[self.cells.len() - 1]
    }
}

impl std::fmt::Debug for PathSegment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{:?}", self.direction.code(), self.cells)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Path {
    pub segments: Vec<PathSegment>,
}

impl Path {
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn start(&self) -> Option<usize> {
        self.segments.first().and_then(|s| s.cells.first().copied())
    }

    pub fn end(&self) -> Option<usize> {
        self.segments.last().map(|s| s.last_cell())
    }

    /// Every cell the line touches, in order, with corner cells listed once.
    pub fn cells(&self) -> Vec<usize> {
        let mut cells: Vec<usize> = Vec::new();
        for segment in self.segments.iter() {
            for &cell in segment.cells.iter() {
                if cells.last() != Some(&cell) {
                    cells.push(cell);
                }
            }
        }
        cells
    }

    /// The same line walked from the other end.
    pub fn reversed(&self) -> Path {
        let segments = self
            .segments
            .iter()
            .rev()
            .map(|segment| PathSegment {
                direction: match segment.direction {
                    Direction::Up => Direction::Down,
                    Direction::Down => Direction::Up,
                    Direction::Left => Direction::Right,
                    Direction::Right => Direction::Left,
                },
                cells: segment.cells.iter().rev().copied().collect(),
            })
            .collect();
        Path { segments }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape() -> Path {
        Path::new(vec![
            PathSegment {
                direction: Direction::Right,
                cells: vec![8, 9, 10],
            },
            PathSegment {
                direction: Direction::Down,
                cells: vec![10, 16, 22],
            },
        ])
    }

    #[test]
    fn test_cells_lists_corners_once() {
        let path = l_shape();
        assert_eq!(path.cells(), vec![8, 9, 10, 16, 22]);
        assert_eq!(path.start(), Some(8));
        assert_eq!(path.end(), Some(22));
    }

    #[test]
    fn test_reversed() {
        let reversed = l_shape().reversed();
        assert_eq!(reversed.cells(), vec![22, 16, 10, 9, 8]);
        assert_eq!(reversed.segments[0].direction, Direction::Up);
        assert_eq!(reversed.segments[1].direction, Direction::Left);
    }
}
