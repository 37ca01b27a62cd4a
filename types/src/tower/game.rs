use super::Amount;
use serde::{Deserialize, Serialize};

/// Which of the two hidden tiles on a floor the player picks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// The two amounts hidden behind a floor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorPair {
    pub left: Amount,
    pub right: Amount,
}

impl FloorPair {
    pub fn get(&self, side: Side) -> &Amount {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

/// Why a game stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    /// Every round was played.
    Completed,
    /// The player left the tower with their money.
    Lobby,
    /// The player accepted the Operator's offer.
    OperatorDeal,
    /// A game-over tile was picked.
    GameOverTile,
    /// The player was broke at the end of a round after the first.
    NoMoney,
    /// The front end gave up on the game (timeout, admin stop).
    Abandoned,
}

impl EndReason {
    /// Whether the game counts as a win on the player's record.
    pub fn is_win(&self) -> bool {
        matches!(self, Self::Completed | Self::Lobby | Self::OperatorDeal)
    }
}
