use std::collections::VecDeque;

use itertools::{Itertools, MinMaxResult};
use log::warn;
use serde::{Deserialize, Serialize};

use super::trace::{SearchEvent, SearchTrace};
use crate::model::{Direction, Grid, Path, PathSegment, MAX_SEGMENTS};

pub const DEFAULT_MAX_PATHS: usize = 50_000;

/// Which cells a line may pass through.
pub trait Occupancy {
    fn is_open(&self, cell: usize) -> bool;
}

/// Upper bound on the work a single search may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SearchLimits {
    /// Partial paths taken off the worklist before the search gives up.
    pub max_paths: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_paths: DEFAULT_MAX_PATHS,
        }
    }
}

/// A target reached by the search, with the line that reached it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reach {
    pub target: usize,
    pub path: Path,
}

impl Reach {
    pub fn segments(&self) -> usize {
        self.path.segment_count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Stop at the first target reached. Paths are explored in order of segment
    /// count, so this is also a line with the fewest segments.
    FirstHit,
    /// Keep going until every target was reached or the worklist runs dry.
    AllTargets,
}

/// The cells a search is trying to reach, plus the row/column span they cover.
///
/// The span drives pruning: a line only turns towards rows or columns that still
/// hold a target, and a second or third segment stops once it has passed them all.
#[derive(Debug, Clone)]
pub struct TargetSet {
    grid: Grid,
    is_target: Vec<bool>,
    row_counts: Vec<usize>,
    col_counts: Vec<usize>,
    remaining: usize,
    rows: (usize, usize),
    cols: (usize, usize),
}

fn span(counts: &[usize]) -> (usize, usize) {
    match counts.iter().positions(|&n| n > 0).minmax() {
        MinMaxResult::NoElements => (usize::MAX, 0),
        MinMaxResult::OneElement(only) => (only, only),
        MinMaxResult::MinMax(min, max) => (min, max),
    }
}

impl TargetSet {
    pub fn new(grid: Grid, cells: impl IntoIterator<Item = usize>) -> Self {
        let mut set = Self {
            grid,
            is_target: vec![false; grid.len()],
            row_counts: vec![0; grid.padded_height()],
            col_counts: vec![0; grid.stride()],
            remaining: 0,
            rows: (usize::MAX, 0),
            cols: (usize::MAX, 0),
        };
        for cell in cells {
            if cell < set.is_target.len() && !set.is_target[cell] {
                set.is_target[cell] = true;
                set.row_counts[grid.row_of(cell)] += 1;
                set.col_counts[grid.col_of(cell)] += 1;
                set.remaining += 1;
            }
        }
        set.recompute_span();
        set
    }

    pub fn single(grid: Grid, cell: usize) -> Self {
        Self::new(grid, [cell])
    }

    pub fn contains(&self, cell: usize) -> bool {
        self.is_target.get(cell).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    pub fn remove(&mut self, cell: usize) {
        if !self.contains(cell) {
            return;
        }
        self.is_target[cell] = false;
        self.row_counts[self.grid.row_of(cell)] -= 1;
        self.col_counts[self.grid.col_of(cell)] -= 1;
        self.remaining -= 1;
        self.recompute_span();
    }

    fn recompute_span(&mut self) {
        self.rows = span(&self.row_counts);
        self.cols = span(&self.col_counts);
    }

    fn has_row(&self, row: usize) -> bool {
        self.row_counts.get(row).is_some_and(|&n| n > 0)
    }

    fn has_col(&self, col: usize) -> bool {
        self.col_counts.get(col).is_some_and(|&n| n > 0)
    }

    /// True if some target lies strictly further along `direction` than `cell`.
    fn lies_ahead(&self, cell: usize, direction: Direction) -> bool {
        if self.is_empty() {
            return false;
        }
        let (row, col) = self.grid.coords(cell);
        match direction {
            Direction::Up => self.rows.0 < row,
            Direction::Down => self.rows.1 > row,
            Direction::Left => self.cols.0 < col,
            Direction::Right => self.cols.1 > col,
        }
    }

    /// A first segment heading away from targets that all share its line can
    /// never come back within the segment budget.
    fn worth_starting(&self, start: usize, direction: Direction) -> bool {
        let (row, col) = self.grid.coords(start);
        let all_in_row = self.rows == (row, row);
        let all_in_col = self.cols == (col, col);
        let along_line = if direction.is_horizontal() {
            all_in_row
        } else {
            all_in_col
        };
        !along_line || self.lies_ahead(start, direction)
    }
}

#[derive(Debug, Clone)]
struct PartialPath {
    segments: Vec<PathSegment>,
}

impl PartialPath {
    fn active(&self) -> &PathSegment {
        &self.segments[self.segments.len() - 1]
    }

    fn active_mut(&mut self) -> &mut PathSegment {
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }
}

/// Breadth-first walk over lines of up to three straight segments.
///
/// The worklist holds partial paths; each one is walked cell by cell along its last
/// segment, spawning a new partial path wherever a turn could still lead to a
/// target. Because turns are queued behind everything already waiting, all
/// one-segment lines are finished before any two-segment line, and so on.
pub struct SegmentSearch<'a> {
    grid: Grid,
    occupancy: &'a dyn Occupancy,
    limits: SearchLimits,
    trace: &'a mut dyn SearchTrace,
}

impl<'a> SegmentSearch<'a> {
    pub fn new(
        grid: Grid,
        occupancy: &'a dyn Occupancy,
        limits: SearchLimits,
        trace: &'a mut dyn SearchTrace,
    ) -> Self {
        Self {
            grid,
            occupancy,
            limits,
            trace,
        }
    }

    /// Search from `start` for the cells in `targets`. Reached targets are removed
    /// from the set; each appears at most once in the result, with a line of the
    /// fewest segments that reaches it.
    pub fn run(&mut self, start: usize, targets: &mut TargetSet, mode: SearchMode) -> Vec<Reach> {
        let mut reached = Vec::new();
        self.trace.record(&SearchEvent::Started {
            start,
            targets: targets.len(),
        });

        let mut worklist: VecDeque<PartialPath> = Direction::all()
            .into_iter()
            .filter(|&direction| targets.worth_starting(start, direction))
            .map(|direction| PartialPath {
                segments: vec![PathSegment::new(direction, start)],
            })
            .collect();

        let mut processed = 0;
        'worklist: while let Some(mut partial) = worklist.pop_front() {
            if targets.is_empty() {
                break;
            }
            if processed >= self.limits.max_paths {
                warn!(
                    target: "path_search",
                    "Search from {} stopped after {} paths with {} still queued",
                    start,
                    processed,
                    worklist.len() + 1
                );
                self.trace.record(&SearchEvent::LimitReached { processed });
                break;
            }
            processed += 1;

            let segments = partial.segments.len();
            let direction = partial.active().direction;
            let mut cell = partial.active().last_cell();

            while let Some(next) = self.grid.step(cell, direction) {
                if targets.contains(next) {
                    let mut found = partial.clone();
                    found.active_mut().cells.push(next);
                    self.trace.record(&SearchEvent::Reached {
                        target: next,
                        segments,
                    });
                    reached.push(Reach {
                        target: next,
                        path: Path::new(found.segments),
                    });
                    targets.remove(next);
                    if mode == SearchMode::FirstHit {
                        break 'worklist;
                    }
                    break;
                }

                if !self.occupancy.is_open(next) {
                    self.trace.record(&SearchEvent::Blocked { at: next, segments });
                    break;
                }

                partial.active_mut().cells.push(next);
                cell = next;

                if segments < MAX_SEGMENTS {
                    for turn in direction.perpendicular() {
                        if self.turn_worthwhile(targets, segments, cell, turn) {
                            self.trace.record(&SearchEvent::Branched {
                                at: cell,
                                direction: turn,
                                segments: segments + 1,
                            });
                            let mut branch = partial.clone();
                            branch.segments.push(PathSegment::new(turn, cell));
                            worklist.push_back(branch);
                        }
                    }
                }

                // Past the last target row/column, a later segment can only miss.
                if segments > 1 && !targets.lies_ahead(cell, direction) {
                    break;
                }
            }
        }

        self.trace.record(&SearchEvent::Finished {
            processed,
            reached: reached.len(),
        });
        reached
    }

    fn turn_worthwhile(
        &self,
        targets: &TargetSet,
        segments: usize,
        cell: usize,
        turn: Direction,
    ) -> bool {
        if !targets.lies_ahead(cell, turn) {
            return false;
        }
        if segments + 1 < MAX_SEGMENTS {
            return true;
        }
        // The last segment runs straight, so it must start in line with a target.
        let (row, col) = self.grid.coords(cell);
        if turn.is_horizontal() {
            targets.has_row(row)
        } else {
            targets.has_col(col)
        }
    }
}
