//! Timed Mystery Box modifiers.

use serde::Serialize;
use towercash_types::{Amount, EffectKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ActiveEffect {
    pub kind: EffectKind,
    pub floors_remaining: u32,
}

/// Modifiers currently on a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Effects {
    active: Vec<ActiveEffect>,
}

impl Effects {
    /// Add an effect. Granting an effect that is already running keeps the
    /// longer of the two durations.
    pub fn grant(&mut self, kind: EffectKind, floors: u32) {
        if floors == 0 {
            return;
        }
        match self.active.iter_mut().find(|e| e.kind == kind) {
            Some(existing) => existing.floors_remaining = existing.floors_remaining.max(floors),
            None => self.active.push(ActiveEffect {
                kind,
                floors_remaining: floors,
            }),
        }
    }

    pub fn has(&self, kind: EffectKind) -> bool {
        self.active.iter().any(|e| e.kind == kind)
    }

    /// One floor has been advanced past.
    pub fn tick(&mut self) {
        for effect in self.active.iter_mut() {
            effect.floors_remaining = effect.floors_remaining.saturating_sub(1);
        }
        self.active.retain(|e| e.floors_remaining > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.active.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Adjust the result of applying a floor amount: Shield cancels losses,
    /// Golden Glove doubles cash and random gains, Leaky Wallet halves gains.
    pub fn adjust(&self, amount: &Amount, before: u64, after: u64) -> u64 {
        if after < before {
            return if self.has(EffectKind::Shield) {
                before
            } else {
                after
            };
        }
        let mut gain = after - before;
        if self.has(EffectKind::DoubleCash)
            && matches!(amount, Amount::Cash { .. } | Amount::Random { .. })
        {
            gain = gain.saturating_mul(2);
        }
        if self.has(EffectKind::HalfGains) {
            gain /= 2;
        }
        before.saturating_add(gain)
    }
}
