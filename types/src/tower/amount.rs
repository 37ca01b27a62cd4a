use serde::{Deserialize, Serialize};
use std::fmt;

/// Actions carried by `special` tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialAction {
    /// Multiply the total by ten.
    AddZero,
    /// Prepend a `1` to the decimal total.
    AddOne,
    /// Multiply the total by a pre-rolled factor in `[0, 3)`.
    BoostMultiplier,
    /// Roll a percentage in `[-150, 150]` and apply it.
    RandomPercentage,
    /// Skip the last floor of the current round.
    XLevel,
}

impl SpecialAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AddZero => "Add a Zero",
            Self::AddOne => "Add a One",
            Self::BoostMultiplier => "Boost Multiplier",
            Self::RandomPercentage => "Random ± %",
            Self::XLevel => "X Level",
        }
    }
}

/// Minigames that an `event` tile hands control to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    Vault,
    OperatorOffer,
    MegaGrid,
    InfinityPercent,
    HideoutBreakthrough,
    Babushka,
    BoilingPoint,
    OperatorRoshambo,
    MysteryBox,
}

impl EventAction {
    pub const ALL: [EventAction; 9] = [
        Self::Vault,
        Self::OperatorOffer,
        Self::MegaGrid,
        Self::InfinityPercent,
        Self::HideoutBreakthrough,
        Self::Babushka,
        Self::BoilingPoint,
        Self::OperatorRoshambo,
        Self::MysteryBox,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vault => "The Vault",
            Self::OperatorOffer => "Operator Offer",
            Self::MegaGrid => "Mega Grid",
            Self::InfinityPercent => "∞%",
            Self::HideoutBreakthrough => "Hideout Breakthrough",
            Self::Babushka => "Babushka",
            Self::BoilingPoint => "Boiling Point",
            Self::OperatorRoshambo => "Operator Roshambo",
            Self::MysteryBox => "Mystery Box",
        }
    }
}

/// A reward or penalty hidden behind one side of a floor.
///
/// `generated` values are rolled once when the floor pool is built and never
/// change afterwards, so revealing a rejected side later shows the same value
/// the player would have received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Amount {
    Cash {
        value: i64,
    },
    Percentage {
        value: i32,
    },
    Random {
        min: u64,
        max: u64,
        label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generated: Option<u64>,
    },
    Special {
        action: SpecialAction,
        label: String,
        /// Boost multiplier in hundredths (`150` is 1.50x).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        generated: Option<u32>,
    },
    Event {
        action: EventAction,
        label: String,
    },
    Nothing,
    GameOver,
}

impl Amount {
    pub fn cash(value: i64) -> Self {
        Self::Cash { value }
    }

    pub fn percentage(value: i32) -> Self {
        Self::Percentage { value }
    }

    pub fn random(min: u64, max: u64, label: &str) -> Self {
        Self::Random {
            min,
            max,
            label: label.to_string(),
            generated: None,
        }
    }

    pub fn special(action: SpecialAction) -> Self {
        Self::Special {
            action,
            label: action.label().to_string(),
            generated: None,
        }
    }

    pub fn event(action: EventAction) -> Self {
        Self::Event {
            action,
            label: action.label().to_string(),
        }
    }

    /// Canonical ledger key for this amount.
    pub fn key(&self) -> AmountKey {
        match self {
            Self::Cash { value } => AmountKey::Cash(*value),
            Self::Percentage { value } => AmountKey::Percent(*value),
            Self::Random { label, .. } => AmountKey::Random(label.clone()),
            Self::Special { action, .. } => AmountKey::Special(*action),
            Self::Event { action, .. } => AmountKey::Event(*action),
            Self::Nothing => AmountKey::Nothing,
            Self::GameOver => AmountKey::GameOver,
        }
    }

    pub fn event_action(&self) -> Option<EventAction> {
        match self {
            Self::Event { action, .. } => Some(*action),
            _ => None,
        }
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Self::Nothing)
    }

    pub fn is_game_over(&self) -> bool {
        matches!(self, Self::GameOver)
    }

    /// Flat dollar value of the tile, counting only cash and rolled random
    /// amounts. Everything else is worth nothing on its own.
    pub fn face_value(&self) -> i64 {
        match self {
            Self::Cash { value } => *value,
            Self::Random { generated, .. } => generated.unwrap_or(0) as i64,
            _ => 0,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash { value } if *value < 0 => write!(f, "-${}", value.unsigned_abs()),
            Self::Cash { value } => write!(f, "${value}"),
            Self::Percentage { value } if *value >= 0 => write!(f, "+{value}%"),
            Self::Percentage { value } => write!(f, "{value}%"),
            Self::Random {
                generated: Some(v),
                label,
                ..
            } => write!(f, "{label} (${v})"),
            Self::Random { label, .. } => f.write_str(label),
            Self::Special {
                action: SpecialAction::BoostMultiplier,
                generated: Some(h),
                label,
            } => write!(f, "{label} (x{}.{:02})", h / 100, h % 100),
            Self::Special { label, .. } | Self::Event { label, .. } => f.write_str(label),
            Self::Nothing => f.write_str("Nothing"),
            Self::GameOver => f.write_str("Game Over"),
        }
    }
}

/// Identity of an amount for depletion bookkeeping.
///
/// Two tiles share a key when they are interchangeable from the player's
/// point of view (same cash value, same percentage, same random label...).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountKey {
    Cash(i64),
    Percent(i32),
    Random(String),
    Special(SpecialAction),
    Event(EventAction),
    Nothing,
    GameOver,
}

impl fmt::Display for AmountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cash(v) => write!(f, "cash_{v}"),
            Self::Percent(v) => write!(f, "percent_{v}"),
            Self::Random(label) => write!(f, "random_{label}"),
            Self::Special(action) => write!(f, "special_{action:?}"),
            Self::Event(action) => write!(f, "event_{action:?}"),
            Self::Nothing => f.write_str("nothing"),
            Self::GameOver => f.write_str("game_over"),
        }
    }
}
