//! Operator Roshambo.
//!
//! Six rounds of rock-paper-scissors against the Operator. Wins add to the
//! pot, losses cut it to a tenth, and a clean sweep replaces the pot with a
//! flat prize.

use super::GameRng;
use serde::Serialize;

pub const ROUNDS: u8 = 6;

pub const WIN_REWARD: u64 = 30_000;

/// Pot after winning every round.
pub const PERFECT_PRIZE: u64 = 2_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    Rock,
    Paper,
    Scissors,
}

impl Hand {
    pub const ALL: [Hand; 3] = [Self::Rock, Self::Paper, Self::Scissors];

    pub fn beats(self, other: Hand) -> bool {
        matches!(
            (self, other),
            (Self::Rock, Self::Scissors) | (Self::Paper, Self::Rock) | (Self::Scissors, Self::Paper)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundResult {
    Win,
    Loss,
    Tie,
}

pub fn play_against(player: Hand, operator: Hand) -> RoundResult {
    if player == operator {
        RoundResult::Tie
    } else if player.beats(operator) {
        RoundResult::Win
    } else {
        RoundResult::Loss
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct RoshamboRound {
    pub round: u8,
    pub player: Hand,
    pub operator: Hand,
    pub result: RoundResult,
    pub accumulated: u64,
    pub wins: u8,
    pub perfect: bool,
    /// Pot added to the total after the last round.
    pub payout: Option<u64>,
}

#[derive(Clone, Debug, Serialize)]
pub struct Roshambo {
    round: u8,
    wins: u8,
    accumulated: u64,
    active: bool,
}

impl Roshambo {
    pub fn start() -> Self {
        Self {
            round: 0,
            wins: 0,
            accumulated: 0,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn accumulated(&self) -> u64 {
        self.accumulated
    }

    pub fn rounds_played(&self) -> u8 {
        self.round
    }

    pub fn throw(&mut self, hand: Hand, total: &mut u64, rng: &mut GameRng) -> Option<RoshamboRound> {
        let operator = Hand::ALL[rng.next_bounded(3) as usize];
        self.throw_against(hand, operator, total)
    }

    /// Play a round against a known operator hand.
    pub fn throw_against(
        &mut self,
        player: Hand,
        operator: Hand,
        total: &mut u64,
    ) -> Option<RoshamboRound> {
        if !self.active {
            return None;
        }
        self.round += 1;
        let result = play_against(player, operator);
        match result {
            RoundResult::Win => {
                self.wins += 1;
                self.accumulated = self.accumulated.saturating_add(WIN_REWARD);
            }
            RoundResult::Loss => self.accumulated /= 10,
            RoundResult::Tie => {}
        }

        let mut round = RoshamboRound {
            round: self.round,
            player,
            operator,
            result,
            accumulated: self.accumulated,
            wins: self.wins,
            perfect: false,
            payout: None,
        };
        if self.round >= ROUNDS {
            self.active = false;
            if self.wins == ROUNDS {
                self.accumulated = PERFECT_PRIZE;
                round.perfect = true;
                round.accumulated = PERFECT_PRIZE;
            }
            *total = total.saturating_add(self.accumulated);
            round.payout = Some(self.accumulated);
        }
        Some(round)
    }
}
