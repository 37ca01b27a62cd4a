//! Mystery Box item pools.
//!
//! Each box first draws a category uniformly, then an item from that
//! category by weight. Effects that last several floors carry their
//! duration explicitly.

use serde::{Deserialize, Serialize};

/// Category a Mystery Box draws its item from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxCategory {
    Good,
    Bad,
    Neutral,
    Money,
}

impl BoxCategory {
    pub const ALL: [BoxCategory; 4] = [Self::Good, Self::Bad, Self::Neutral, Self::Money];

    pub fn items(&self) -> &'static [BoxItem] {
        match self {
            Self::Good => &GOOD_ITEMS,
            Self::Bad => &BAD_ITEMS,
            Self::Neutral => &NEUTRAL_ITEMS,
            Self::Money => &MONEY_ITEMS,
        }
    }

    pub fn total_weight(&self) -> u32 {
        self.items().iter().map(|i| i.weight).sum()
    }
}

/// Modifiers that stay on the session for a number of floors.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Money decreases from floor tiles are cancelled.
    Shield,
    /// Positive cash and random gains are doubled.
    DoubleCash,
    /// The player may peek at the current floor.
    Insight,
    /// Minigame banking and cash-outs are locked.
    NoBankCashout,
    /// Positive gains are halved.
    HalfGains,
}

/// What opening a box does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEffect {
    AddMoney { amount: u64 },
    AddMoneyRange { min: u64, max: u64 },
    /// Multiplier in hundredths (`200` doubles).
    MultiplyMoney { hundredths: u32 },
    PercentageMoney { percent: i32 },
    /// Swing the total by up to 50,000 either way.
    Random50k,
    /// Move the total halfway towards 100,000.
    BalanceMoney,
    /// Lose the cash behind both sides of the floor the box was found on.
    LoseLeftRight,
    Nothing,
    Timed { kind: EffectKind, floors: u32 },
}

/// A Mystery Box prize.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoxItem {
    pub id: &'static str,
    pub name: &'static str,
    pub category: BoxCategory,
    pub effect: ItemEffect,
    pub weight: u32,
}

const fn item(
    id: &'static str,
    name: &'static str,
    category: BoxCategory,
    effect: ItemEffect,
    weight: u32,
) -> BoxItem {
    BoxItem {
        id,
        name,
        category,
        effect,
        weight,
    }
}

pub const MONEY_ITEMS: [BoxItem; 5] = [
    item("panty_pant", "Panty Pant", BoxCategory::Money, ItemEffect::AddMoney { amount: 5_000 }, 30),
    item("gold_coin", "Gold Coin", BoxCategory::Money, ItemEffect::AddMoney { amount: 25_000 }, 25),
    item(
        "lottery_ticket",
        "Lottery Ticket",
        BoxCategory::Money,
        ItemEffect::AddMoneyRange { min: 10_000, max: 500_000 },
        15,
    ),
    item("ipad_pro", "iPad Pro", BoxCategory::Money, ItemEffect::AddMoney { amount: 100_000 }, 10),
    item(
        "million_cheque",
        "Million Dollar Cheque",
        BoxCategory::Money,
        ItemEffect::AddMoney { amount: 1_000_000 },
        2,
    ),
];

pub const GOOD_ITEMS: [BoxItem; 5] = [
    item(
        "lucky_charm",
        "Lucky Charm",
        BoxCategory::Good,
        ItemEffect::Timed { kind: EffectKind::Shield, floors: 2 },
        20,
    ),
    item(
        "golden_glove",
        "Golden Glove",
        BoxCategory::Good,
        ItemEffect::Timed { kind: EffectKind::DoubleCash, floors: 1 },
        15,
    ),
    item("piggy_bank", "Piggy Bank", BoxCategory::Good, ItemEffect::PercentageMoney { percent: 20 }, 25),
    item(
        "money_printer",
        "Money Printer",
        BoxCategory::Good,
        ItemEffect::MultiplyMoney { hundredths: 200 },
        5,
    ),
    item(
        "crystal_ball",
        "Crystal Ball",
        BoxCategory::Good,
        ItemEffect::Timed { kind: EffectKind::Insight, floors: 1 },
        15,
    ),
];

pub const BAD_ITEMS: [BoxItem; 5] = [
    item(
        "rusty_trap",
        "Rusty Trap",
        BoxCategory::Bad,
        ItemEffect::Timed { kind: EffectKind::NoBankCashout, floors: 2 },
        20,
    ),
    item("tax_man", "Tax Man", BoxCategory::Bad, ItemEffect::PercentageMoney { percent: -20 }, 25),
    item("debt_collector", "Debt Collector", BoxCategory::Bad, ItemEffect::LoseLeftRight, 10),
    item(
        "leaky_wallet",
        "Leaky Wallet",
        BoxCategory::Bad,
        ItemEffect::Timed { kind: EffectKind::HalfGains, floors: 2 },
        20,
    ),
    item("pickpocket", "Pickpocket", BoxCategory::Bad, ItemEffect::MultiplyMoney { hundredths: 50 }, 10),
];

pub const NEUTRAL_ITEMS: [BoxItem; 4] = [
    item("empty_box", "Empty Box", BoxCategory::Neutral, ItemEffect::Nothing, 30),
    item("coin_flip", "Coin Flip", BoxCategory::Neutral, ItemEffect::Random50k, 25),
    item("scale", "The Scale", BoxCategory::Neutral, ItemEffect::BalanceMoney, 20),
    item("fortune_cookie", "Fortune Cookie", BoxCategory::Neutral, ItemEffect::Nothing, 15),
];

/// Weighted pick: walk the pool subtracting weights from `roll` (drawn in
/// `[0, total_weight)`) until it drops below the current item's weight.
pub fn pick_item(category: BoxCategory, mut roll: u32) -> &'static BoxItem {
    let items = category.items();
    for item in items {
        if roll < item.weight {
            return item;
        }
        roll -= item.weight;
    }
    // Rolls past the total land on the last item.
    &items[items.len() - 1]
}
