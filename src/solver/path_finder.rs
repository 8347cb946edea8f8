use super::segment_search::{Occupancy, SearchLimits, SearchMode, SegmentSearch, TargetSet};
use super::trace::{NoopTrace, SearchTrace};
use crate::model::{Board, Path};

/// Gameplay occupancy: empty cells and tiles animating out are open, tiles in
/// play block the line.
pub struct PlayOccupancy<'a> {
    board: &'a Board,
}

impl<'a> PlayOccupancy<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self { board }
    }
}

impl Occupancy for PlayOccupancy<'_> {
    fn is_open(&self, cell: usize) -> bool {
        self.board.tile(cell).is_some_and(|tile| tile.is_passable())
    }
}

/// Find a line of at most three segments joining tiles `first` and `second`.
///
/// Returns a line with the fewest segments that exists, walked from `first` to
/// `second`, or `None` when the tiles cannot be joined. Tiles that are not both in
/// play with the same face never match.
pub fn find_simplest_path(first: usize, second: usize, board: &Board) -> Option<Path> {
    find_simplest_path_traced(first, second, board, SearchLimits::default(), &mut NoopTrace)
}

pub fn find_simplest_path_traced(
    first: usize,
    second: usize,
    board: &Board,
    limits: SearchLimits,
    trace: &mut dyn SearchTrace,
) -> Option<Path> {
    if first == second {
        return None;
    }
    let first_face = board.face_at(first)?;
    if board.face_at(second)? != first_face {
        return None;
    }

    let grid = board.grid();
    let occupancy = PlayOccupancy::new(board);
    let mut targets = TargetSet::single(grid, second);
    SegmentSearch::new(grid, &occupancy, limits, trace)
        .run(first, &mut targets, SearchMode::FirstHit)
        .into_iter()
        .next()
        .map(|reach| reach.path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Direction, TileContent};
    use crate::solver::trace::{LogTrace, RecordingTrace, SearchEvent};
    use crate::tests::UsingLogger;
    use test_context::test_context;

    fn id(board: &Board, row: usize, col: usize) -> usize {
        board.grid().index(row, col)
    }

    #[test]
    fn test_adjacent_tiles_single_segment() {
        let board = Board::parse(
            "
            05 05 01
            02 03 04
            ",
        );
        let (a, b) = (id(&board, 1, 1), id(&board, 1, 2));
        let path = find_simplest_path(a, b, &board).unwrap();
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.segments[0].direction, Direction::Right);
        assert_eq!(path.cells(), vec![a, b]);
    }

    #[test]
    fn test_straight_line_through_empty_cells() {
        let board = Board::parse(
            "
            07 .. .. 07
            01 02 03 04
            ",
        );
        let (a, b) = (id(&board, 1, 4), id(&board, 1, 1));
        let path = find_simplest_path(a, b, &board).unwrap();
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.segments[0].direction, Direction::Left);
        assert_eq!(path.start(), Some(a));
        assert_eq!(path.end(), Some(b));
    }

    #[test]
    fn test_l_shape_around_obstruction() {
        let board = Board::parse(
            "
            01 02 03
            04 05 06
            01 08 07
            ",
        );
        // column 1 is blocked by 04; go round through the left border
        let (a, b) = (id(&board, 1, 1), id(&board, 3, 1));
        let path = find_simplest_path(a, b, &board).unwrap();
        assert_eq!(path.segment_count(), 3);
        assert_eq!(path.start(), Some(a));
        assert_eq!(path.end(), Some(b));
    }

    #[test]
    fn test_two_segment_path_stays_two_when_obstruction_removed() {
        let mut board = Board::parse(
            "
            09 .. ..
            03 04 ..
            .. 02 09
            ",
        );
        let (a, b) = (id(&board, 1, 1), id(&board, 3, 3));
        let path = find_simplest_path(a, b, &board).unwrap();
        assert_eq!(path.segment_count(), 2);
        assert_eq!(path.cells(), vec![a, a + 1, a + 2, id(&board, 2, 3), b]);

        board.set(id(&board, 2, 2), TileContent::Empty);
        let path = find_simplest_path(a, b, &board).unwrap();
        assert_eq!(path.segment_count(), 2);
    }

    #[test]
    fn test_u_shape_via_border() {
        let board = Board::parse(
            "
            06 01 06
            02 03 04
            ",
        );
        let (a, b) = (id(&board, 1, 1), id(&board, 1, 3));
        let path = find_simplest_path(a, b, &board).unwrap();
        assert_eq!(path.segment_count(), 3);
        assert_eq!(path.segments[0].direction, Direction::Up);
        assert_eq!(path.segments[1].direction, Direction::Right);
        assert_eq!(path.segments[2].direction, Direction::Down);
        assert_eq!(path.cells(), vec![a, a - 5, a - 4, a - 3, b]);
    }

    #[test]
    fn test_no_path_when_enclosed() {
        let board = Board::parse(
            "
            01 02 03 04
            05 09 06 07
            08 10 09 11
            12 13 14 15
            ",
        );
        let (a, b) = (id(&board, 2, 2), id(&board, 3, 3));
        assert_eq!(find_simplest_path(a, b, &board), None);
    }

    #[test]
    fn test_removing_tiles_do_not_block() {
        let mut board = Board::parse(
            "
            04 05 04
            ",
        );
        let (a, b) = (id(&board, 1, 1), id(&board, 1, 3));
        let middle = id(&board, 1, 2);
        let face = board.face_at(middle).unwrap();
        board.set(middle, TileContent::Removing(face));

        let path = find_simplest_path(a, b, &board).unwrap();
        assert_eq!(path.segment_count(), 1);
        assert_eq!(path.cells(), vec![a, middle, b]);
    }

    #[test]
    fn test_rejects_invalid_pairs() {
        let mut board = Board::parse(
            "
            01 02 01
            ",
        );
        let (a, b, c) = (id(&board, 1, 1), id(&board, 1, 2), id(&board, 1, 3));
        assert_eq!(find_simplest_path(a, a, &board), None);
        assert_eq!(find_simplest_path(a, b, &board), None);
        assert_eq!(find_simplest_path(a, 0, &board), None);

        let face = board.face_at(c).unwrap();
        board.set(c, TileContent::Removing(face));
        assert_eq!(find_simplest_path(a, c, &board), None);
    }

    #[test]
    fn test_direction_from_either_end() {
        let board = Board::parse(
            "
            01 .. 02
            03 .. 01
            ",
        );
        let (a, b) = (id(&board, 1, 1), id(&board, 2, 3));
        let forward = find_simplest_path(a, b, &board).unwrap();
        let backward = find_simplest_path(b, a, &board).unwrap();
        assert_eq!(forward.segment_count(), 3);
        assert_eq!(backward.segment_count(), 3);
        assert_eq!(forward.start(), Some(a));
        assert_eq!(backward.start(), Some(b));
    }

    #[test_context(UsingLogger)]
    #[test]
    fn test_traced_search_reports_events(_: &mut UsingLogger) {
        let board = Board::parse(
            "
            01 .. 01
            ",
        );
        let (a, b) = (id(&board, 1, 1), id(&board, 1, 3));

        let mut trace = RecordingTrace::default();
        let path = find_simplest_path_traced(a, b, &board, SearchLimits::default(), &mut trace);
        assert!(path.is_some());
        assert_eq!(
            trace.events.first(),
            Some(&SearchEvent::Started {
                start: a,
                targets: 1
            })
        );
        assert!(trace.events.contains(&SearchEvent::Reached {
            target: b,
            segments: 1
        }));

        let logged = find_simplest_path_traced(a, b, &board, SearchLimits::default(), &mut LogTrace);
        assert_eq!(logged, path);
    }
}
