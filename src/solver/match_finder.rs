use itertools::Itertools;

use super::path_finder::PlayOccupancy;
use super::segment_search::{SearchLimits, SearchMode, SegmentSearch, TargetSet};
use super::trace::{NoopTrace, SearchTrace};
use crate::model::{Board, Face, MatchPair};

/// Every pair of tiles that could be matched right now.
///
/// Each tile searches only towards same-faced tiles with a higher id, so every
/// unordered pair is reported once. Pairs come back sorted by id.
pub fn find_all_matches(board: &Board) -> Vec<MatchPair> {
    find_all_matches_traced(board, SearchLimits::default(), &mut NoopTrace)
}

pub fn find_all_matches_traced(
    board: &Board,
    limits: SearchLimits,
    trace: &mut dyn SearchTrace,
) -> Vec<MatchPair> {
    let mut pairs = Vec::new();
    for_each_candidate_group(board, |start, candidates| {
        let reached = search_from(
            board,
            start,
            candidates,
            SearchMode::AllTargets,
            limits,
            &mut *trace,
        );
        pairs.extend(reached.into_iter().map(|target| MatchPair::new(start, target)));
        true
    });
    pairs.sort();
    pairs
}

/// Cheaper than [`find_all_matches`] when only the presence of a move matters.
pub fn has_any_match(board: &Board) -> bool {
    let limits = SearchLimits::default();
    let mut trace = NoopTrace;
    let mut found = false;
    for_each_candidate_group(board, |start, candidates| {
        found = !search_from(board, start, candidates, SearchMode::FirstHit, limits, &mut trace)
            .is_empty();
        !found
    });
    found
}

/// Calls `visit(start, later_same_faced_tiles)` for every tile in play that has a
/// same-faced tile after it. Stops early when `visit` returns false.
fn for_each_candidate_group(board: &Board, mut visit: impl FnMut(usize, &[usize]) -> bool) {
    let by_face = board
        .faced_tiles()
        .filter_map(|tile| tile.face().map(|face| (face, tile.id)))
        .into_group_map();

    for face in by_face.keys().sorted() {
        let ids: &Vec<usize> = &by_face[face];
        for (i, &start) in ids.iter().enumerate() {
            let later = &ids[i + 1..];
            if later.is_empty() {
                continue;
            }
            if !visit(start, later) {
                return;
            }
        }
    }
}

fn search_from(
    board: &Board,
    start: usize,
    candidates: &[usize],
    mode: SearchMode,
    limits: SearchLimits,
    trace: &mut dyn SearchTrace,
) -> Vec<usize> {
    let grid = board.grid();
    let occupancy = PlayOccupancy::new(board);
    let mut targets = TargetSet::new(grid, candidates.iter().copied());
    SegmentSearch::new(grid, &occupancy, limits, trace)
        .run(start, &mut targets, mode)
        .into_iter()
        .map(|reach| reach.target)
        .collect()
}

/// Faces that still have at least one playable pair.
pub fn matchable_faces(board: &Board, pairs: &[MatchPair]) -> Vec<Face> {
    pairs
        .iter()
        .filter_map(|pair| board.face_at(pair.first))
        .unique()
        .sorted()
        .collect()
}
