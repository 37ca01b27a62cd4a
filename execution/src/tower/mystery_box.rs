//! Mystery Box.
//!
//! Four closed boxes, each holding an item from a random category. The player
//! opens one. Money items pay out on the spot; timed items stay on the session
//! for a fixed number of floors.

use super::effects::ActiveEffect;
use super::{money, GameRng};
use serde::Serialize;
use towercash_types::{
    pick_item, BoxCategory, BoxItem, ItemEffect, BALANCE_TARGET, COIN_FLIP_SWING,
};

pub const BOXES: usize = 4;

/// Draw one box: a uniform category, then a weighted item.
pub fn draw_item(rng: &mut GameRng) -> &'static BoxItem {
    let category = BoxCategory::ALL[rng.next_bounded(BoxCategory::ALL.len() as u64) as usize];
    let roll = rng.next_bounded(category.total_weight() as u64) as u32;
    pick_item(category, roll)
}

/// Apply an item to the total. Returns the timed effect it grants, if any.
///
/// `floor_loss` is the cash behind both sides of the floor the box was found
/// on.
pub fn apply_item(
    effect: ItemEffect,
    total: &mut u64,
    floor_loss: u64,
    rng: &mut GameRng,
) -> Option<ActiveEffect> {
    match effect {
        ItemEffect::AddMoney { amount } => *total = total.saturating_add(amount),
        ItemEffect::AddMoneyRange { min, max } => {
            *total = total.saturating_add(rng.range_inclusive(min, max))
        }
        ItemEffect::MultiplyMoney { hundredths } => {
            *total = money::apply_hundredths(*total, hundredths as u64)
        }
        ItemEffect::PercentageMoney { percent } => {
            *total = money::apply_percent(*total, percent as i64)
        }
        ItemEffect::Random50k => {
            let swing = COIN_FLIP_SWING as i64;
            *total = money::add_signed(*total, rng.range_i64(-swing, swing));
        }
        ItemEffect::BalanceMoney => {
            let target = BALANCE_TARGET as i64;
            let current = (*total).min(i64::MAX as u64) as i64;
            *total = money::add_signed(*total, (target - current) / 2);
        }
        ItemEffect::LoseLeftRight => *total = total.saturating_sub(floor_loss),
        ItemEffect::Nothing => {}
        ItemEffect::Timed { kind, floors } => {
            return Some(ActiveEffect {
                kind,
                floors_remaining: floors,
            })
        }
    }
    None
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BoxOpened {
    pub index: usize,
    pub item: BoxItem,
    pub granted: Option<ActiveEffect>,
}

#[derive(Clone, Debug, Serialize)]
pub struct MysteryBox {
    #[serde(skip)]
    boxes: [&'static BoxItem; BOXES],
    floor_loss: u64,
    opened: Option<usize>,
    active: bool,
}

impl MysteryBox {
    pub fn start(floor_loss: u64, rng: &mut GameRng) -> Self {
        let boxes = [
            draw_item(rng),
            draw_item(rng),
            draw_item(rng),
            draw_item(rng),
        ];
        Self {
            boxes,
            floor_loss,
            opened: None,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Contents of every box, for the reveal after one is opened.
    pub fn contents(&self) -> Option<[&'static BoxItem; BOXES]> {
        self.opened.map(|_| self.boxes)
    }

    pub fn open(&mut self, index: usize, total: &mut u64, rng: &mut GameRng) -> Option<BoxOpened> {
        if !self.active {
            return None;
        }
        let item = *self.boxes.get(index)?;
        self.active = false;
        self.opened = Some(index);
        let granted = apply_item(item.effect, total, self.floor_loss, rng);
        Some(BoxOpened {
            index,
            item: *item,
            granted,
        })
    }
}
