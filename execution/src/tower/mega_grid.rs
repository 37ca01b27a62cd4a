//! Mega Grid.
//!
//! A 5x5 grid hides gold and black cells. Each gold pick banks the current
//! reward and grows the next one; a black pick loses everything banked.
//! The more black cells, the faster the reward grows.

use super::GameRng;
use serde::Serialize;

pub const GRID_CELLS: usize = 25;

/// Gold picks after which the grid pays out on its own.
pub const MAX_ROUNDS: u8 = 5;

pub const MIN_BLACK: u8 = 2;
pub const MAX_BLACK: u8 = 10;

const BASE_REWARD: u64 = 25_000;

/// First-round reward: `25000 * (1 + (black - 1) * 0.2)`.
pub fn initial_reward(black_count: u8) -> u64 {
    BASE_REWARD * (4 + black_count as u64) / 5
}

/// Growth after a gold pick: `floor(reward * (1 + black * 0.5))`.
pub fn next_reward(reward: u64, black_count: u8) -> u64 {
    let grown = reward as u128 * (2 + black_count as u128) / 2;
    grown.min(u64::MAX as u128) as u64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    Gold,
    Black,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GridOutcome {
    pub cell: Option<Cell>,
    pub accumulated: u64,
    pub potential: u64,
    pub round: u8,
    /// Amount added to the total when the grid closed.
    pub payout: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MegaGrid {
    #[serde(skip)]
    cells: [Cell; GRID_CELLS],
    revealed: [bool; GRID_CELLS],
    black_count: u8,
    potential: u64,
    accumulated: u64,
    round: u8,
    active: bool,
}

impl MegaGrid {
    pub fn start(rng: &mut GameRng) -> Self {
        let black_count = rng.range_inclusive(MIN_BLACK as u64, MAX_BLACK as u64) as u8;
        Self::with_black_count(black_count, rng)
    }

    pub fn with_black_count(black_count: u8, rng: &mut GameRng) -> Self {
        let mut cells = [Cell::Gold; GRID_CELLS];
        for cell in cells.iter_mut().take(black_count as usize) {
            *cell = Cell::Black;
        }
        rng.shuffle(&mut cells);
        Self {
            cells,
            revealed: [false; GRID_CELLS],
            black_count,
            potential: initial_reward(black_count),
            accumulated: 0,
            round: 1,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn black_count(&self) -> u8 {
        self.black_count
    }

    pub fn gold_count(&self) -> u8 {
        GRID_CELLS as u8 - self.black_count
    }

    /// Multiplier in halves (`6` is 3.0x).
    pub fn multiplier_halves(&self) -> u64 {
        2 + self.black_count as u64
    }

    pub fn potential(&self) -> u64 {
        self.potential
    }

    pub fn accumulated(&self) -> u64 {
        self.accumulated
    }

    fn outcome(&self, cell: Option<Cell>, payout: Option<u64>) -> GridOutcome {
        GridOutcome {
            cell,
            accumulated: self.accumulated,
            potential: self.potential,
            round: self.round,
            payout,
        }
    }

    /// Reveal a cell. Returns `None` if the grid is closed or the cell is
    /// out of range or already revealed.
    pub fn pick(&mut self, index: usize, total: &mut u64) -> Option<GridOutcome> {
        if !self.active || *self.revealed.get(index)? {
            return None;
        }
        self.revealed[index] = true;
        match self.cells[index] {
            Cell::Black => {
                self.accumulated = 0;
                self.active = false;
                Some(self.outcome(Some(Cell::Black), Some(0)))
            }
            Cell::Gold => {
                self.accumulated = self.accumulated.saturating_add(self.potential);
                self.potential = next_reward(self.potential, self.black_count);
                if self.round >= MAX_ROUNDS {
                    self.active = false;
                    *total = total.saturating_add(self.accumulated);
                    return Some(self.outcome(Some(Cell::Gold), Some(self.accumulated)));
                }
                self.round += 1;
                Some(self.outcome(Some(Cell::Gold), None))
            }
        }
    }

    /// Stop and bank what has been accumulated.
    pub fn cash_out(&mut self, total: &mut u64) -> Option<GridOutcome> {
        if !self.active {
            return None;
        }
        self.active = false;
        *total = total.saturating_add(self.accumulated);
        Some(self.outcome(None, Some(self.accumulated)))
    }
}
