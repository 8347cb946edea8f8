use std::fmt::Display;

use log::{error, info, warn};
use rand::{rngs::StdRng, seq::IndexedRandom, seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use super::pair_order::{pair_faces, quadruplet_faces};
use super::rng::{resolve_seed, seeded_rng, Seed};
use crate::model::{Board, Face, Grid, LayoutCode, LayoutCodeError, MatchPair, Shape, TileContent};
use crate::solver::{NoopTrace, Occupancy, SearchLimits, SearchMode, SegmentSearch, TargetSet};

pub const DEFAULT_WIDTH: usize = 17;
pub const DEFAULT_HEIGHT: usize = 8;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;
/// Largest width or height a rectangular request may ask for.
pub const MAX_BOARD_DIMENSION: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShuffleMode {
    /// Random placement; the board may not be clearable.
    Simple,
    /// Pairs are placed along a removal order, so the board can always be cleared.
    #[default]
    Presolved,
}

impl Display for ShuffleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShuffleMode::Simple => write!(f, "simple"),
            ShuffleMode::Presolved => write!(f, "presolved"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GenerateRequest {
    /// Drawn at random when absent.
    pub seed: Option<Seed>,
    pub width: usize,
    pub height: usize,
    pub mode: ShuffleMode,
    pub exclude_singleton_pairs: bool,
    /// Replaces the `width x height` rectangle when set.
    pub layout: Option<LayoutCode>,
    pub max_attempts: u32,
    pub limits: SearchLimits,
}

impl Default for GenerateRequest {
    fn default() -> Self {
        Self {
            seed: None,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mode: ShuffleMode::default(),
            exclude_singleton_pairs: false,
            layout: None,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            limits: SearchLimits::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratedBoard {
    pub board: Board,
    /// The seed actually used, so the same board can be generated again.
    pub seed: Seed,
    pub width: usize,
    pub height: usize,
    /// Tiles holding a face; the blanked centre of an odd board is not counted.
    pub total_matchable_tiles: usize,
    /// `None` when the shape is too large to encode.
    pub layout_code: Option<LayoutCode>,
    /// For presolved boards, one order in which every pair can be removed.
    pub solution: Option<Vec<MatchPair>>,
    /// Placement attempts used; always 1 for simple boards.
    pub attempts: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error(
        "board dimensions must be between 1 and {max}, got {width}x{height}",
        max = MAX_BOARD_DIMENSION
    )]
    InvalidDimensions { width: usize, height: usize },
    #[error("search limit must allow at least one path")]
    InvalidSearchLimit,
    #[error(transparent)]
    Layout(#[from] LayoutCodeError),
    #[error("layout has no playable cells")]
    EmptyShape,
    #[error("layout has an odd number of cells ({count}) and no cell to leave blank")]
    OddTileCount { count: usize },
    #[error("seed {seed}: no clearable arrangement found in {attempts} attempts")]
    Exhausted { seed: Seed, attempts: u32 },
}

pub fn generate(request: &GenerateRequest) -> Result<GeneratedBoard, GenerationError> {
    if request.limits.max_paths == 0 {
        return Err(GenerationError::InvalidSearchLimit);
    }
    let seed = resolve_seed(request.seed);
    let dimensions = 1..=MAX_BOARD_DIMENSION;
    let shape = match &request.layout {
        Some(code) => LayoutCode::decode(code.as_str())?,
        None if !dimensions.contains(&request.width) || !dimensions.contains(&request.height) => {
            return Err(GenerationError::InvalidDimensions {
                width: request.width,
                height: request.height,
            })
        }
        None => Shape::rectangle(request.width, request.height),
    };

    let grid = Grid::new(shape.width, shape.height);
    let cells = playable_cells(&shape, grid)?;

    let (board, solution, attempts) = match request.mode {
        ShuffleMode::Simple => (
            simple_board(seed, grid, &cells, request.exclude_singleton_pairs),
            None,
            1,
        ),
        ShuffleMode::Presolved => {
            let (board, solution, attempts) = presolved_board(seed, grid, &cells, request)?;
            (board, Some(solution), attempts)
        }
    };

    info!(
        target: "board_generator",
        "Generated {} {}x{} board with {} tiles from seed {}",
        request.mode,
        shape.width,
        shape.height,
        cells.len(),
        seed
    );

    Ok(GeneratedBoard {
        board,
        seed,
        width: shape.width,
        height: shape.height,
        total_matchable_tiles: cells.len(),
        layout_code: LayoutCode::encode(&shape).ok(),
        solution,
        attempts,
    })
}

/// Like [`generate`], but falls back to the default board when the request cannot
/// be satisfied. The requested seed is kept.
pub fn generate_or_default(request: &GenerateRequest) -> Result<GeneratedBoard, GenerationError> {
    generate(request).or_else(|err| {
        error!(
            target: "board_generator",
            "Could not generate requested board ({}); using the default layout",
            err
        );
        generate(&GenerateRequest {
            seed: request.seed,
            mode: request.mode,
            exclude_singleton_pairs: request.exclude_singleton_pairs,
            ..GenerateRequest::default()
        })
    })
}

/// Padded ids of the cells that get a tile, row-major. An odd count is evened out
/// by leaving the active cell nearest the centre blank.
fn playable_cells(shape: &Shape, grid: Grid) -> Result<Vec<usize>, GenerationError> {
    let mut shape = shape.clone();
    let count = shape.active_count();
    if count % 2 == 1 {
        match shape.active_cell_nearest_center() {
            Some((row, col)) => shape.set_active(row, col, false),
            None => return Err(GenerationError::OddTileCount { count }),
        }
    }
    if shape.active_count() == 0 {
        return Err(GenerationError::EmptyShape);
    }

    let (width, height) = (shape.width, shape.height);
    Ok((0..height)
        .flat_map(|row| (0..width).map(move |col| (row, col)))
        .filter(|&(row, col)| shape.is_active(row, col))
        .map(|(row, col)| grid.index(row + 1, col + 1))
        .collect())
}

fn simple_board(seed: Seed, grid: Grid, cells: &[usize], exclude_singleton_pairs: bool) -> Board {
    let mut rng = seeded_rng(seed, 0);
    let mut faces = quadruplet_faces(&mut rng, cells.len(), exclude_singleton_pairs);
    faces.shuffle(&mut rng);

    let mut board = Board::new_empty(grid.width, grid.height);
    for (&cell, face) in cells.iter().zip(faces) {
        board.set(cell, TileContent::Faced(face));
    }
    board
}

fn presolved_board(
    seed: Seed,
    grid: Grid,
    cells: &[usize],
    request: &GenerateRequest,
) -> Result<(Board, Vec<MatchPair>, u32), GenerationError> {
    let attempts = request.max_attempts.max(1);
    for attempt in 0..attempts {
        let mut rng = seeded_rng(seed, attempt);
        let faces = pair_faces(&mut rng, cells.len() / 2, request.exclude_singleton_pairs);
        let placer = PairPlacer::new(grid, cells, request.limits);
        match placer.place_all(&mut rng, &faces) {
            Some((board, solution)) => {
                if attempt > 0 {
                    info!(
                        target: "board_generator",
                        "Seed {} needed {} attempts",
                        seed,
                        attempt + 1
                    );
                }
                return Ok((board, solution, attempt + 1));
            }
            None => warn!(
                target: "board_generator",
                "Seed {} attempt {} ran out of pairable cells; retrying",
                seed,
                attempt + 1
            ),
        }
    }
    Err(GenerationError::Exhausted { seed, attempts })
}

/// During placement, cells still waiting for a face stand in for tiles that will
/// be on the board when the current pair is removed, so they block the line.
/// Everything else has been removed by then, or was never there.
struct PendingOccupancy<'a> {
    pending: &'a [bool],
}

impl Occupancy for PendingOccupancy<'_> {
    fn is_open(&self, cell: usize) -> bool {
        !self.pending.get(cell).copied().unwrap_or(false)
    }
}

/// Assigns pairs from the outside in. The n-th pair placed is the n-th pair
/// removed, so each placement only has to be joinable with the cells placed
/// before it already gone.
struct PairPlacer {
    grid: Grid,
    board: Board,
    pending: Vec<bool>,
    /// Pending cells next to at least one open cell.
    frontier: Vec<usize>,
    limits: SearchLimits,
}

impl PairPlacer {
    fn new(grid: Grid, cells: &[usize], limits: SearchLimits) -> Self {
        let mut pending = vec![false; grid.len()];
        for &cell in cells {
            pending[cell] = true;
        }
        let frontier = cells
            .iter()
            .copied()
            .filter(|&cell| grid.neighbors(cell).any(|n| !pending[n]))
            .collect();
        Self {
            grid,
            board: Board::new_empty(grid.width, grid.height),
            pending,
            frontier,
            limits,
        }
    }

    fn place_all(mut self, rng: &mut StdRng, faces: &[Face]) -> Option<(Board, Vec<MatchPair>)> {
        let mut solution = Vec::with_capacity(faces.len());
        for &face in faces {
            let pair = self.place_pair(rng)?;
            self.board.set(pair.first, TileContent::Faced(face));
            self.board.set(pair.second, TileContent::Faced(face));
            solution.push(pair);
        }
        Some((self.board, solution))
    }

    /// Pick a random frontier cell and a partner it can be joined to. Frontier
    /// cells without a partner are skipped until none are left.
    fn place_pair(&mut self, rng: &mut StdRng) -> Option<MatchPair> {
        let mut untried = self.frontier.clone();
        while !untried.is_empty() {
            let first = untried.swap_remove(rng.random_range(0..untried.len()));
            match self.pick_partner(rng, first) {
                Some(second) => {
                    self.claim(first);
                    self.claim(second);
                    return Some(MatchPair::new(first, second));
                }
                None => warn!(
                    target: "board_generator",
                    "Dead end at cell {}, {} other cells left to try",
                    first,
                    untried.len()
                ),
            }
        }
        None
    }

    /// Partners come from the frontier and the pending cells around `first`.
    /// Lines with a bend are preferred so boards do not open with a run of
    /// neighbouring pairs.
    fn pick_partner(&self, rng: &mut StdRng, first: usize) -> Option<usize> {
        let around = self
            .grid
            .neighbors(first)
            .filter(|&n| self.pending[n] && !self.frontier.contains(&n));
        let candidates = self
            .frontier
            .iter()
            .copied()
            .filter(|&cell| cell != first)
            .chain(around);
        let mut targets = TargetSet::new(self.grid, candidates);
        if targets.is_empty() {
            return None;
        }

        let occupancy = PendingOccupancy {
            pending: &self.pending,
        };
        let mut trace = NoopTrace;
        let reached = SegmentSearch::new(self.grid, &occupancy, self.limits, &mut trace).run(
            first,
            &mut targets,
            SearchMode::AllTargets,
        );

        let bent: Vec<usize> = reached
            .iter()
            .filter(|reach| reach.segments() > 1)
            .map(|reach| reach.target)
            .collect();
        if bent.is_empty() {
            let straight: Vec<usize> = reached.iter().map(|reach| reach.target).collect();
            straight.choose(rng).copied()
        } else {
            bent.choose(rng).copied()
        }
    }

    fn claim(&mut self, cell: usize) {
        self.pending[cell] = false;
        self.frontier.retain(|&c| c != cell);
        let neighbors: Vec<usize> = self.grid.neighbors(cell).collect();
        for n in neighbors {
            if self.pending[n] && !self.frontier.contains(&n) {
                self.frontier.push(n);
            }
        }
    }
}
