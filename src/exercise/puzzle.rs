//! Sliding puzzle: pinch the highlighted tile to slide it into the gap.
//!
//! Only the current target tile accepts a move, and only while it is
//! 4-adjacent to the empty slot.  After every accepted move a new target is
//! drawn from the empty slot's occupied neighbours, so the player always has
//! a legal move available.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::debounce::RepCounter;
use super::progress::{Outcome, Phase, Progress};
use super::seeded_rng;
use crate::config::{CanvasConfig, PuzzleConfig};
use crate::gesture::{GestureFacts, Point};
use crate::stats::ResultTag;

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TilePos {
    pub row: usize,
    pub col: usize,
}

impl TilePos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn manhattan(self, other: TilePos) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

/// Square board in row-major order; `0` is the empty slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<u32>,
}

impl Board {
    /// `1, 2, …, n²−1` with the gap bottom-right.
    pub fn solved(size: usize) -> Self {
        let n = size * size;
        let cells = (1..n as u32).chain(std::iter::once(0)).collect();
        Self { size, cells }
    }

    /// `None` unless `cells` is a permutation of `0..size²`.
    pub fn from_cells(size: usize, cells: Vec<u32>) -> Option<Self> {
        let n = size * size;
        if size == 0 || cells.len() != n {
            return None;
        }
        let mut seen = vec![false; n];
        for &v in &cells {
            let slot = seen.get_mut(v as usize)?;
            if *slot {
                return None;
            }
            *slot = true;
        }
        Some(Self { size, cells })
    }

    /// Solved board scrambled by `moves` random legal slides.
    pub fn shuffled(size: usize, moves: usize, rng: &mut StdRng) -> Self {
        let mut board = Self::solved(size);
        for _ in 0..moves {
            let empty = board.empty();
            if let Some(&pick) = board.neighbors(empty).choose(rng) {
                board.swap(pick, empty);
            }
        }
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, pos: TilePos) -> Option<u32> {
        if pos.row >= self.size || pos.col >= self.size {
            return None;
        }
        self.cells.get(pos.row * self.size + pos.col).copied()
    }

    pub fn empty(&self) -> TilePos {
        let i = self.cells.iter().position(|&v| v == 0).unwrap_or_default();
        TilePos::new(i / self.size, i % self.size)
    }

    /// In-bounds 4-neighbours: left, right, up, down.
    pub fn neighbors(&self, pos: TilePos) -> Vec<TilePos> {
        let mut out = Vec::with_capacity(4);
        if pos.col > 0 {
            out.push(TilePos::new(pos.row, pos.col - 1));
        }
        if pos.col + 1 < self.size {
            out.push(TilePos::new(pos.row, pos.col + 1));
        }
        if pos.row > 0 {
            out.push(TilePos::new(pos.row - 1, pos.col));
        }
        if pos.row + 1 < self.size {
            out.push(TilePos::new(pos.row + 1, pos.col));
        }
        out
    }

    pub fn is_adjacent_to_empty(&self, pos: TilePos) -> bool {
        pos.manhattan(self.empty()) == 1
    }

    /// Slide the tile at `pos` into the gap.  `false` (board unchanged) when
    /// not adjacent.
    pub fn slide(&mut self, pos: TilePos) -> bool {
        if !self.is_adjacent_to_empty(pos) {
            return false;
        }
        let empty = self.empty();
        self.swap(pos, empty);
        true
    }

    pub fn is_solved(&self) -> bool {
        *self == Self::solved(self.size)
    }

    /// Inversion-parity test.
    ///
    /// Odd widths: solvable iff the inversion count is even.  Even widths:
    /// solvable iff the inversion count and the gap's row counted from the
    /// bottom (1-based) have opposite parity.
    pub fn is_solvable(&self) -> bool {
        let tiles: Vec<u32> = self.cells.iter().copied().filter(|&v| v != 0).collect();
        let inversions = tiles
            .iter()
            .enumerate()
            .map(|(i, a)| tiles[i + 1..].iter().filter(|b| a > b).count())
            .sum::<usize>();

        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            let gap_row_from_bottom = self.size - self.empty().row;
            (inversions % 2 == 0) != (gap_row_from_bottom % 2 == 0)
        }
    }

    fn swap(&mut self, a: TilePos, b: TilePos) {
        self.cells
            .swap(a.row * self.size + a.col, b.row * self.size + b.col);
    }
}

// ---------------------------------------------------------------------------
// SlidingPuzzle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SlidingPuzzle {
    config: PuzzleConfig,
    offset: Point,
    board: Board,
    target: Option<TilePos>,
    /// Moves made in the current level.
    moves: u32,
    /// Success cues raised so far; the presentation layer plays a sound
    /// whenever this grows.
    cues: u32,
    mover: RepCounter,
    /// Pinch edge that continues past a cleared level; no cooldown.
    confirm: RepCounter,
    progress: Progress,
    rng: StdRng,
}

impl SlidingPuzzle {
    pub fn new(config: &PuzzleConfig, canvas: &CanvasConfig, seed: Option<u64>) -> Self {
        let grid = config.grid_size as f32 * config.tile_size;
        let offset = Point::new(
            ((canvas.width - grid) / 2.0).floor(),
            ((canvas.height - grid) / 4.0).floor(),
        );
        Self {
            config: config.clone(),
            offset,
            board: Board::solved(config.grid_size),
            target: None,
            moves: 0,
            cues: 0,
            mover: RepCounter::new(Duration::from_millis(config.move_cooldown_ms)),
            confirm: RepCounter::new(Duration::ZERO),
            progress: Progress::new(),
            rng: seeded_rng(seed),
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.progress.begin(now);
        self.mover.reset();
        self.confirm.reset();
        self.cues = 0;
        self.reset_level(now);
    }

    pub fn update(&mut self, facts: Option<&GestureFacts>, now: Instant) -> Option<Outcome> {
        let pinch = facts.is_some_and(|f| f.pinch);
        let confirmed = self.confirm.observe(pinch, now);

        match self.progress.phase() {
            Phase::Playing => {
                let hit = facts
                    .and_then(|f| self.tile_at(f.pointer))
                    .filter(|&pos| Some(pos) == self.target && self.board.is_adjacent_to_empty(pos));

                let accepted = self.mover.observe_if(pinch, now, || hit.is_some());
                match hit {
                    Some(pos) if accepted => self.apply_move(pos, now),
                    _ => None,
                }
            }
            Phase::BetweenLevels => {
                // Track the pinch without arming the move cooldown.
                self.mover.observe_if(pinch, now, || false);
                if confirmed {
                    self.reset_level(now);
                    log::info!("puzzle: level {} started", self.progress.level() + 1);
                }
                None
            }
            _ => None,
        }
    }

    /// Return to `Ready`.  Never reports.
    pub fn stop(&mut self, _now: Instant) -> Option<Outcome> {
        self.progress.halt();
        None
    }

    fn apply_move(&mut self, pos: TilePos, now: Instant) -> Option<Outcome> {
        if !self.board.slide(pos) {
            return None;
        }
        self.moves += 1;
        self.cues += 1;
        self.progress.award(1);
        self.pick_target();

        let goal = self.level_goal().unwrap_or_default();
        if self.progress.level_score() < goal {
            return None;
        }

        if self.progress.level() + 1 < self.config.level_goals.len() {
            self.progress.advance_level();
            self.progress.set_phase(Phase::BetweenLevels);
            log::info!("puzzle: level {} cleared", self.progress.level());
            None
        } else {
            let secs = self.progress.elapsed_secs_rounded(now);
            self.progress.finish(Phase::Completed, ResultTag::Completed, secs)
        }
    }

    fn reset_level(&mut self, now: Instant) {
        self.board = Board::shuffled(self.config.grid_size, self.config.shuffle_moves, &mut self.rng);
        self.pick_target();
        self.moves = 0;
        self.progress.restart_clock(now);
        self.progress.set_phase(Phase::Playing);
    }

    fn pick_target(&mut self) {
        let occupied: Vec<TilePos> = self
            .board
            .neighbors(self.board.empty())
            .into_iter()
            .filter(|&p| self.board.get(p).is_some_and(|v| v != 0))
            .collect();
        self.target = occupied.choose(&mut self.rng).copied();
    }

    /// Board cell under a canvas pixel.
    pub fn tile_at(&self, p: Point) -> Option<TilePos> {
        let col = ((p.x - self.offset.x) / self.config.tile_size).floor();
        let row = ((p.y - self.offset.y) / self.config.tile_size).floor();
        let n = self.config.grid_size as f32;
        if col < 0.0 || row < 0.0 || col >= n || row >= n {
            return None;
        }
        Some(TilePos::new(row as usize, col as usize))
    }

    /// Top-left pixel of the grid.
    pub fn offset(&self) -> Point {
        self.offset
    }

    pub fn tile_size(&self) -> f32 {
        self.config.tile_size
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn target(&self) -> Option<TilePos> {
        self.target
    }

    /// Number shown on the target tile.
    pub fn target_value(&self) -> Option<u32> {
        self.target.and_then(|p| self.board.get(p))
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn cues(&self) -> u32 {
        self.cues
    }

    pub fn level_goal(&self) -> Option<u32> {
        self.config.level_goals.get(self.progress.level()).copied()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    #[cfg(test)]
    pub(crate) fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    #[cfg(test)]
    pub(crate) fn set_target(&mut self, pos: TilePos) {
        self.target = Some(pos);
    }
}
