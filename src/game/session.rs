use itertools::Itertools;
use log::{debug, info, trace};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board_generator::{generate_or_default, GeneratedBoard, GenerationError};
use super::rng::Seed;
use super::settings::EngineSettings;
use crate::model::{Board, Face, LayoutCode, MatchPair, Path, TileContent};
use crate::solver::{find_all_matches_traced, find_simplest_path_traced, NoopTrace, SearchLimits};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Won,
    /// Tiles remain but no pair can be joined.
    Lost,
}

/// A pair the player removed, kept so it can be undone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRecord {
    pub pair: MatchPair,
    pub face: Face,
    pub path: Path,
}

/// One playthrough of a generated board.
#[derive(Debug, Clone)]
pub struct GameSession {
    playthrough_id: Uuid,
    seed: Seed,
    layout_code: Option<LayoutCode>,
    total_tiles: usize,
    board: Board,
    history: Vec<MatchRecord>,
    matches: Vec<MatchPair>,
    limits: SearchLimits,
}

impl GameSession {
    pub fn new(generated: GeneratedBoard, limits: SearchLimits) -> Self {
        let mut session = Self {
            playthrough_id: Uuid::new_v4(),
            seed: generated.seed,
            layout_code: generated.layout_code,
            total_tiles: generated.total_matchable_tiles,
            board: generated.board,
            history: Vec::new(),
            matches: Vec::new(),
            limits,
        };
        session.refresh_matches();
        info!(
            target: "game_session",
            "Started playthrough {} (seed {}, {} tiles, {} moves available)",
            session.playthrough_id,
            session.seed,
            session.total_tiles,
            session.matches.len()
        );
        session
    }

    pub fn from_settings(settings: &EngineSettings) -> Result<Self, GenerationError> {
        let generated = generate_or_default(&settings.request())?;
        Ok(Self::new(generated, settings.search_limits()))
    }

    pub fn playthrough_id(&self) -> Uuid {
        self.playthrough_id
    }

    pub fn seed(&self) -> Seed {
        self.seed
    }

    pub fn layout_code(&self) -> Option<&LayoutCode> {
        self.layout_code.as_ref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn history(&self) -> &[MatchRecord] {
        &self.history
    }

    pub fn remaining_tiles(&self) -> usize {
        self.total_tiles.saturating_sub(self.history.len() * 2)
    }

    /// Pairs that can be joined on the current board.
    pub fn matches(&self) -> &[MatchPair] {
        &self.matches
    }

    /// Tiles that belong to at least one available pair.
    pub fn matchable_tiles(&self) -> Vec<usize> {
        self.matches
            .iter()
            .flat_map(|pair| [pair.first, pair.second])
            .sorted()
            .dedup()
            .collect()
    }

    /// Tiles `tile` could be matched with right now.
    pub fn hints_for(&self, tile: usize) -> Vec<usize> {
        self.matches
            .iter()
            .filter_map(|pair| pair.partner_of(tile))
            .sorted()
            .collect()
    }

    pub fn status(&self) -> GameStatus {
        if self.remaining_tiles() == 0 {
            GameStatus::Won
        } else if self.matches.is_empty() {
            GameStatus::Lost
        } else {
            GameStatus::InProgress
        }
    }

    /// Try to remove `first` and `second`. On success both tiles are left in the
    /// removing state until the next move or [`GameSession::settle_removals`], and
    /// the joining line is returned for display.
    pub fn try_match(&mut self, first: usize, second: usize) -> Option<Path> {
        self.settle_removals();
        let path = find_simplest_path_traced(first, second, &self.board, self.limits, &mut NoopTrace);
        let Some(path) = path else {
            debug!(target: "game_session", "Rejected match {} / {}", first, second);
            return None;
        };
        let face = self.board.face_at(first)?;

        self.board.set(first, TileContent::Removing(face));
        self.board.set(second, TileContent::Removing(face));
        self.history.push(MatchRecord {
            pair: MatchPair::new(first, second),
            face,
            path: path.clone(),
        });
        self.refresh_matches();

        trace!(
            target: "game_session",
            "Matched {} / {} ({}) over {} segments, {} tiles left",
            first,
            second,
            face,
            path.segment_count(),
            self.remaining_tiles()
        );
        match self.status() {
            GameStatus::Won => info!(target: "game_session", "Playthrough {} won", self.playthrough_id),
            GameStatus::Lost => info!(
                target: "game_session",
                "Playthrough {} has no moves left with {} tiles",
                self.playthrough_id,
                self.remaining_tiles()
            ),
            GameStatus::InProgress => (),
        }
        Some(path)
    }

    /// Clear tiles left in the removing state by earlier matches.
    pub fn settle_removals(&mut self) {
        let removing: Vec<usize> = self
            .board
            .tiles()
            .iter()
            .filter(|tile| matches!(tile.content, TileContent::Removing(_)))
            .map(|tile| tile.id)
            .collect();
        for id in removing {
            self.board.set(id, TileContent::Empty);
        }
    }

    /// Put the last removed pair back.
    pub fn undo(&mut self) -> Option<MatchRecord> {
        let record = self.history.pop()?;
        self.settle_removals();
        self.board.set(record.pair.first, TileContent::Faced(record.face));
        self.board.set(record.pair.second, TileContent::Faced(record.face));
        self.refresh_matches();
        debug!(target: "game_session", "Undid {}", record.pair);
        Some(record)
    }

    fn refresh_matches(&mut self) {
        self.matches = find_all_matches_traced(&self.board, self.limits, &mut NoopTrace);
    }
}
