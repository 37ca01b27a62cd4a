//! Game session: the floor/round state machine.
//!
//! A session walks through rounds of floor selection and floor play. Each
//! played floor reveals both of its amounts, applies the chosen one to the
//! money total and may hand control to a minigame. The session never starts
//! a minigame on its own; callers branch on [`FloorSignal`].

use super::{
    babushka::Babushka,
    boiling_point::BoilingPoint,
    effects::{ActiveEffect, Effects},
    hideout::Hideout,
    infinity::Infinity,
    ledger::Ledger,
    mega_grid::MegaGrid,
    money,
    mystery_box::MysteryBox,
    operator_offer::OperatorOffer,
    pool::{self, FloorPool},
    roshambo::Roshambo,
    vault::Vault,
    GameError, GameRng, Minigame, MinigameMove, MinigameOutcome, MinigameResult,
};
use serde::Serialize;
use std::collections::BTreeSet;
use towercash_types::{
    Amount, EffectKind, EndReason, EventAction, FloorPair, GameConfig, Side, SpecialAction,
    RANDOM_PERCENT_LIMIT,
};
use tracing::{debug, info};

/// Who a session belongs to and where it is played.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Player {
    pub user_id: String,
    pub username: String,
    pub channel_id: String,
    pub guild_id: String,
}

impl Player {
    pub fn new(user_id: &str, username: &str, channel_id: &str, guild_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            username: username.to_string(),
            channel_id: channel_id.to_string(),
            guild_id: guild_id.to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "reason", rename_all = "snake_case")]
pub enum Phase {
    /// Picking this round's floors.
    SelectingFloors,
    /// Standing on a floor, choosing left or right.
    ChoosingSide,
    /// A floor has been played; waiting for `advance` (and any minigame).
    FloorResolved,
    /// Every floor of the round is done; continue or cash out.
    RoundEnd,
    /// Terminal.
    Ended(EndReason),
}

/// What the caller must do after a floor is played.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FloorSignal {
    Continue,
    /// Start this minigame before advancing.
    StartMinigame(EventAction),
    /// A game-over tile ended the game.
    GameOver,
    /// Broke on the last floor of a round after the first.
    OutOfMoney,
    /// X Level removed this floor from the current round.
    FloorSkipScheduled(usize),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub round: usize,
    pub floor: usize,
    pub side: Side,
    pub chosen: Amount,
    pub rejected: Amount,
    pub money_before: u64,
    pub money_after: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FloorOutcome {
    pub floor: usize,
    pub side: Side,
    pub chosen: Amount,
    pub rejected: Amount,
    pub money_before: u64,
    pub money_after: u64,
    /// Total had the other side been picked.
    pub would_have_been: u64,
    /// Roll of a "Random ± %" tile.
    pub random_percent: Option<i64>,
    pub signal: FloorSignal,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "floor", rename_all = "snake_case")]
pub enum NextFloor {
    Floor(usize),
    RoundEnd,
    Complete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AdvanceOutcome {
    pub next: NextFloor,
    /// Floor removed by X Level on the way.
    pub skipped: Option<usize>,
}

/// Final result of an ended game. Lost games score zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameSummary {
    pub final_score: u64,
    pub floors_completed: u32,
    pub reason: EndReason,
    pub won: bool,
}

/// Read-only view for presentation.
#[derive(Debug, Serialize)]
pub struct SessionSnapshot<'a> {
    pub id: u64,
    pub player: &'a Player,
    pub event_mode: bool,
    pub phase: Phase,
    pub total_money: u64,
    pub current_round: usize,
    pub round_count: usize,
    pub floors_to_select: usize,
    pub selected_floors: &'a [usize],
    pub current_floor: Option<usize>,
    pub floors_completed: u32,
    pub minigame: Option<&'a Minigame>,
    pub effects: Vec<ActiveEffect>,
    pub remaining: Vec<(String, u32, bool)>,
}

pub struct Session {
    id: u64,
    seed: u64,
    moves: u32,
    player: Player,
    event_mode: bool,
    rounds: Vec<usize>,
    pool: FloorPool,
    ledger: Ledger,
    total_money: u64,
    current_round: usize,
    floors_to_select: usize,
    selected_floors: Vec<usize>,
    played_floors: BTreeSet<usize>,
    current_floor: usize,
    floors_completed: u32,
    skip_floor: Option<usize>,
    history: Vec<HistoryEntry>,
    pending_minigame: Option<EventAction>,
    minigame: Option<Minigame>,
    effects: Effects,
    phase: Phase,
}

impl Session {
    /// Create a session and deal its floor pool.
    pub fn new(id: u64, player: Player, config: &GameConfig, event_mode: bool, seed: u64) -> Self {
        let mut rng = GameRng::new(seed, id, 0);
        let pool = pool::generate(config, event_mode, &mut rng);
        let ledger = Ledger::new(&pool);
        let floors_to_select = config.floors_in_round(1).min(pool.len());
        info!(
            id,
            user = %player.user_id,
            channel = %player.channel_id,
            event_mode,
            floors = pool.len(),
            "session created"
        );
        Self {
            id,
            seed,
            moves: 1,
            player,
            event_mode,
            rounds: config.rounds.clone(),
            pool,
            ledger,
            total_money: 0,
            current_round: 1,
            floors_to_select,
            selected_floors: Vec::new(),
            played_floors: BTreeSet::new(),
            current_floor: 0,
            floors_completed: 0,
            skip_floor: None,
            history: Vec::new(),
            pending_minigame: None,
            minigame: None,
            effects: Effects::default(),
            phase: Phase::SelectingFloors,
        }
    }

    fn next_rng(&mut self) -> GameRng {
        let rng = GameRng::new(self.seed, self.id, self.moves);
        self.moves += 1;
        rng
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn event_mode(&self) -> bool {
        self.event_mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.phase, Phase::Ended(_))
    }

    pub fn total_money(&self) -> u64 {
        self.total_money
    }

    pub fn current_round(&self) -> usize {
        self.current_round
    }

    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    pub fn floors_to_select(&self) -> usize {
        self.floors_to_select
    }

    pub fn floor_count(&self) -> usize {
        self.pool.len()
    }

    pub fn selected_floors(&self) -> &[usize] {
        &self.selected_floors
    }

    pub fn played_floors(&self) -> &BTreeSet<usize> {
        &self.played_floors
    }

    pub fn floors_completed(&self) -> u32 {
        self.floors_completed
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    pub fn minigame(&self) -> Option<&Minigame> {
        self.minigame.as_ref()
    }

    /// Minigame the caller must start before advancing.
    pub fn pending_minigame(&self) -> Option<EventAction> {
        self.pending_minigame
    }

    /// Floor number being played, if any.
    pub fn current_floor(&self) -> Option<usize> {
        match self.phase {
            Phase::ChoosingSide | Phase::FloorResolved => {
                self.selected_floors.get(self.current_floor).copied()
            }
            _ => None,
        }
    }

    /// Floors that can still be selected.
    pub fn available_floors(&self) -> Vec<usize> {
        (1..=self.pool.len())
            .filter(|f| !self.played_floors.contains(f))
            .collect()
    }

    fn ensure_running(&self) -> Result<(), GameError> {
        if self.is_ended() {
            return Err(GameError::GameAlreadyComplete);
        }
        Ok(())
    }

    fn ensure_phase(&self, phase: Phase) -> Result<(), GameError> {
        self.ensure_running()?;
        if self.phase != phase {
            return Err(GameError::InvalidPhase(self.phase));
        }
        Ok(())
    }

    fn minigame_running(&self) -> bool {
        self.pending_minigame.is_some() || self.minigame.as_ref().is_some_and(|m| m.is_active())
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = Phase::Ended(reason);
        self.pending_minigame = None;
        info!(
            id = self.id,
            user = %self.player.user_id,
            ?reason,
            total = self.total_money,
            floors = self.floors_completed,
            "game ended"
        );
    }

    /// Add a floor to this round's selection. Returns false when nothing
    /// changed (already selected or played, out of range, selection full).
    pub fn select_floor(&mut self, floor: usize) -> Result<bool, GameError> {
        self.ensure_phase(Phase::SelectingFloors)?;
        if floor == 0
            || floor > self.pool.len()
            || self.played_floors.contains(&floor)
            || self.selected_floors.contains(&floor)
            || self.selected_floors.len() >= self.floors_to_select
        {
            return Ok(false);
        }
        self.selected_floors.push(floor);
        Ok(true)
    }

    pub fn deselect_floor(&mut self, floor: usize) -> Result<bool, GameError> {
        self.ensure_phase(Phase::SelectingFloors)?;
        match self.selected_floors.iter().position(|f| *f == floor) {
            Some(idx) => {
                self.selected_floors.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn toggle_floor(&mut self, floor: usize) -> Result<bool, GameError> {
        if self.selected_floors.contains(&floor) {
            self.deselect_floor(floor)
        } else {
            self.select_floor(floor)
        }
    }

    /// Lock in the selection and step onto the first selected floor.
    pub fn confirm_floors(&mut self) -> Result<&FloorPair, GameError> {
        self.ensure_phase(Phase::SelectingFloors)?;
        if self.selected_floors.is_empty() || self.selected_floors.len() != self.floors_to_select {
            return Err(GameError::NotReady);
        }
        self.current_floor = 0;
        self.phase = Phase::ChoosingSide;
        debug!(id = self.id, floors = ?self.selected_floors, "floors confirmed");
        self.current_choices()
    }

    /// The pair behind the floor being played. Hidden from the player unless
    /// Insight is active; exposed here for the presentation layer.
    pub fn current_choices(&self) -> Result<&FloorPair, GameError> {
        self.ensure_phase(Phase::ChoosingSide)?;
        self.selected_floors
            .get(self.current_floor)
            .and_then(|f| self.pool.floor(*f))
            .ok_or(GameError::InvalidPhase(self.phase))
    }

    /// Peek at the current floor while a Crystal Ball is active.
    pub fn insight(&self) -> Result<&FloorPair, GameError> {
        if !self.effects.has(EffectKind::Insight) {
            return Err(GameError::InvalidMove);
        }
        self.current_choices()
    }

    /// Play the current floor.
    pub fn resolve_choice(&mut self, side: Side) -> Result<FloorOutcome, GameError> {
        self.ensure_phase(Phase::ChoosingSide)?;
        let floor = self.selected_floors[self.current_floor];
        let pair = self
            .pool
            .floor(floor)
            .cloned()
            .ok_or(GameError::InvalidPhase(self.phase))?;
        self.ledger.resolve_floor(floor, &pair);

        let chosen = pair.get(side).clone();
        let rejected = pair.get(side.other()).clone();
        let before = self.total_money;

        let random_percent = match chosen {
            Amount::Special {
                action: SpecialAction::RandomPercentage,
                ..
            } => Some(
                self.next_rng()
                    .range_i64(-RANDOM_PERCENT_LIMIT, RANDOM_PERCENT_LIMIT),
            ),
            _ => None,
        };
        let raw = money::apply_amount(before, &chosen, random_percent);
        let after = self.effects.adjust(&chosen, before, raw);
        let would_have_been = money::apply_amount(before, &rejected, None);
        self.total_money = after;

        self.history.push(HistoryEntry {
            round: self.current_round,
            floor,
            side,
            chosen: chosen.clone(),
            rejected: rejected.clone(),
            money_before: before,
            money_after: after,
        });
        self.phase = Phase::FloorResolved;

        let last_in_round = self.current_floor + 1 >= self.selected_floors.len();
        let signal = if let Some(action) = chosen.event_action() {
            self.pending_minigame = Some(action);
            FloorSignal::StartMinigame(action)
        } else if chosen.is_game_over() {
            self.end(EndReason::GameOverTile);
            FloorSignal::GameOver
        } else if after == 0 && self.current_round > 1 && last_in_round {
            self.end(EndReason::NoMoney);
            FloorSignal::OutOfMoney
        } else if matches!(
            chosen,
            Amount::Special {
                action: SpecialAction::XLevel,
                ..
            }
        ) && !last_in_round
        {
            let last = self.selected_floors[self.selected_floors.len() - 1];
            if let Some(last_pair) = self.pool.floor(last) {
                self.ledger.resolve_floor(last, last_pair);
            }
            self.skip_floor = Some(last);
            FloorSignal::FloorSkipScheduled(last)
        } else {
            FloorSignal::Continue
        };

        debug!(
            id = self.id,
            floor,
            ?side,
            chosen = %chosen,
            before,
            after,
            ?signal,
            "floor resolved"
        );
        Ok(FloorOutcome {
            floor,
            side,
            chosen,
            rejected,
            money_before: before,
            money_after: after,
            would_have_been,
            random_percent,
            signal,
        })
    }

    fn move_to_next_floor(&mut self) {
        if let Some(floor) = self.selected_floors.get(self.current_floor) {
            self.played_floors.insert(*floor);
        }
        self.current_floor += 1;
        self.floors_completed += 1;
        self.effects.tick();
    }

    /// Leave the played floor and move to the next one, or to the end of
    /// the round.
    ///
    /// A floor skipped by X Level counts as advanced past: it is completed
    /// and timed effects tick for it as well.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, GameError> {
        self.ensure_running()?;
        if self.minigame_running() {
            return Err(GameError::MinigameActive);
        }
        self.ensure_phase(Phase::FloorResolved)?;
        self.minigame = None;

        self.move_to_next_floor();

        let mut skipped = None;
        if let Some(skip) = self.skip_floor {
            if self.selected_floors.get(self.current_floor) == Some(&skip) {
                self.move_to_next_floor();
                self.skip_floor = None;
                skipped = Some(skip);
                debug!(id = self.id, floor = skip, "floor skipped");
            }
        }

        let next = if self.current_floor < self.selected_floors.len() {
            self.phase = Phase::ChoosingSide;
            NextFloor::Floor(self.selected_floors[self.current_floor])
        } else if self.current_round >= self.rounds.len() {
            self.end(EndReason::Completed);
            NextFloor::Complete
        } else {
            self.phase = Phase::RoundEnd;
            NextFloor::RoundEnd
        };
        Ok(AdvanceOutcome { next, skipped })
    }

    /// Begin the next round's floor selection. Returns the number of floors
    /// to select. A tower with no floors left for the round is complete.
    pub fn start_next_round(&mut self) -> Result<usize, GameError> {
        self.ensure_phase(Phase::RoundEnd)?;
        self.current_round += 1;
        self.current_floor = 0;
        self.selected_floors.clear();
        self.skip_floor = None;
        let scheduled = self
            .rounds
            .get(self.current_round - 1)
            .copied()
            .unwrap_or(0);
        self.floors_to_select =
            scheduled.min(self.pool.len().saturating_sub(self.played_floors.len()));
        if self.floors_to_select == 0 {
            self.end(EndReason::Completed);
            return Ok(0);
        }
        self.phase = Phase::SelectingFloors;
        debug!(
            id = self.id,
            round = self.current_round,
            floors = self.floors_to_select,
            "round started"
        );
        Ok(self.floors_to_select)
    }

    /// Leave the tower at the end of a round, keeping the money.
    pub fn cash_out(&mut self) -> Result<GameSummary, GameError> {
        self.ensure_phase(Phase::RoundEnd)?;
        self.end(EndReason::Lobby);
        self.summary().ok_or(GameError::GameAlreadyComplete)
    }

    /// Abandon the game (timeouts, admin stop).
    pub fn force_end(&mut self) -> Result<GameSummary, GameError> {
        self.ensure_running()?;
        self.minigame = None;
        self.end(EndReason::Abandoned);
        self.summary().ok_or(GameError::GameAlreadyComplete)
    }

    pub fn summary(&self) -> Option<GameSummary> {
        match self.phase {
            Phase::Ended(reason) => Some(GameSummary {
                final_score: if reason.is_win() { self.total_money } else { 0 },
                floors_completed: self.floors_completed,
                reason,
                won: reason.is_win(),
            }),
            _ => None,
        }
    }

    /// Floors never played (or skipped), with what was behind them.
    pub fn unplayed_floors(&self) -> Vec<(usize, &FloorPair)> {
        self.pool
            .iter()
            .filter(|(floor, _)| !self.played_floors.contains(floor))
            .collect()
    }

    /// Every floor in the tower.
    pub fn reveal_all_floors(&self) -> Vec<(usize, &FloorPair)> {
        self.pool.iter().collect()
    }

    /// Unreached floors hiding a game-over tile.
    fn hazards(&self) -> Vec<usize> {
        self.pool
            .iter()
            .filter(|(floor, pair)| {
                !self.ledger.is_resolved(*floor)
                    && (pair.left.is_game_over() || pair.right.is_game_over())
            })
            .map(|(floor, _)| floor)
            .collect()
    }

    /// Start the minigame announced by the last floor.
    pub fn start_minigame(&mut self, action: EventAction) -> Result<&Minigame, GameError> {
        self.ensure_running()?;
        if self.pending_minigame != Some(action) {
            return Err(GameError::MinigameInactive);
        }
        let mut rng = self.next_rng();
        let game = match action {
            EventAction::Vault => Minigame::Vault(Vault::start(&mut rng)),
            EventAction::OperatorOffer => {
                Minigame::OperatorOffer(OperatorOffer::start(self.total_money, &mut rng))
            }
            EventAction::MegaGrid => Minigame::MegaGrid(MegaGrid::start(&mut rng)),
            EventAction::InfinityPercent => Minigame::InfinityPercent(Infinity::start()),
            EventAction::HideoutBreakthrough => {
                Minigame::HideoutBreakthrough(Hideout::start(&mut rng))
            }
            EventAction::Babushka => Minigame::Babushka(Babushka::start(&mut rng)),
            EventAction::BoilingPoint => Minigame::BoilingPoint(BoilingPoint::start(&mut rng)),
            EventAction::OperatorRoshambo => Minigame::OperatorRoshambo(Roshambo::start()),
            EventAction::MysteryBox => {
                // The box was found on the floor just played.
                let floor_loss = self
                    .selected_floors
                    .get(self.current_floor)
                    .and_then(|f| self.pool.floor(*f))
                    .map(|pair| pair.left.face_value().max(0) + pair.right.face_value().max(0))
                    .unwrap_or(0) as u64;
                Minigame::MysteryBox(MysteryBox::start(floor_loss, &mut rng))
            }
        };
        info!(id = self.id, ?action, "minigame started");
        self.pending_minigame = None;
        Ok(self.minigame.insert(game))
    }

    /// Send a move to the running minigame.
    pub fn play(&mut self, mv: MinigameMove) -> Result<MinigameResult, GameError> {
        self.ensure_running()?;
        if !self.minigame.as_ref().is_some_and(|m| m.is_active()) {
            return Err(GameError::MinigameInactive);
        }
        if mv.is_banking() && self.effects.has(EffectKind::NoBankCashout) {
            return Err(GameError::BankingLocked);
        }
        let hazards = match self.minigame {
            Some(Minigame::Vault(_)) => self.hazards(),
            _ => Vec::new(),
        };
        let mut rng = self.next_rng();
        let before = self.total_money;
        let total = &mut self.total_money;

        let outcome = match (self.minigame.as_mut(), mv) {
            (Some(Minigame::Vault(g)), MinigameMove::Guess(code)) => g
                .guess(&code, total, &mut rng, &hazards)
                .map(MinigameOutcome::Vault),
            (Some(Minigame::OperatorOffer(g)), MinigameMove::Accept) => {
                g.accept(total).map(MinigameOutcome::OperatorOffer)
            }
            (Some(Minigame::OperatorOffer(g)), MinigameMove::Decline) => {
                g.decline().map(MinigameOutcome::OperatorOffer)
            }
            (Some(Minigame::MegaGrid(g)), MinigameMove::Pick(i)) => {
                g.pick(i, total).map(MinigameOutcome::MegaGrid)
            }
            (Some(Minigame::MegaGrid(g)), MinigameMove::CashOut) => {
                g.cash_out(total).map(MinigameOutcome::MegaGrid)
            }
            (Some(Minigame::InfinityPercent(g)), MinigameMove::Choose(side)) => g
                .pick(side, total, &mut rng)
                .map(MinigameOutcome::InfinityPercent),
            (Some(Minigame::InfinityPercent(g)), MinigameMove::CashOut) => {
                g.cash_out(total).map(MinigameOutcome::InfinityPercent)
            }
            (Some(Minigame::HideoutBreakthrough(g)), MinigameMove::Pick(i)) => {
                g.pick(i, total).map(MinigameOutcome::HideoutBreakthrough)
            }
            (Some(Minigame::Babushka(g)), MinigameMove::OpenDoll(i)) => {
                g.open_doll(i, total).map(MinigameOutcome::Babushka)
            }
            (Some(Minigame::Babushka(g)), MinigameMove::Reveal) => {
                g.reveal(total).map(MinigameOutcome::Babushka)
            }
            (Some(Minigame::Babushka(g)), MinigameMove::Bank) => {
                g.bank(total).map(MinigameOutcome::Babushka)
            }
            (Some(Minigame::Babushka(g)), MinigameMove::CashOut) => {
                g.walk_away(total).map(MinigameOutcome::Babushka)
            }
            (Some(Minigame::BoilingPoint(g)), MinigameMove::Step(sign)) => {
                g.step(sign, total).map(MinigameOutcome::BoilingPoint)
            }
            (Some(Minigame::BoilingPoint(g)), MinigameMove::Change) => {
                g.change().map(MinigameOutcome::BoilingPoint)
            }
            (Some(Minigame::OperatorRoshambo(g)), MinigameMove::Throw(hand)) => g
                .throw(hand, total, &mut rng)
                .map(MinigameOutcome::OperatorRoshambo),
            (Some(Minigame::MysteryBox(g)), MinigameMove::Pick(i)) => {
                g.open(i, total, &mut rng).map(MinigameOutcome::MysteryBox)
            }
            _ => None,
        }
        .ok_or(GameError::InvalidMove)?;

        match &outcome {
            MinigameOutcome::MysteryBox(opened) => {
                if let Some(effect) = opened.granted {
                    self.effects.grant(effect.kind, effect.floors_remaining);
                }
            }
            MinigameOutcome::OperatorOffer(offer) if offer.accepted => {
                self.end(EndReason::OperatorDeal);
            }
            _ => {}
        }

        let finished = !self.minigame.as_ref().is_some_and(|m| m.is_active());
        if finished {
            info!(
                id = self.id,
                before,
                after = self.total_money,
                "minigame finished"
            );
        }
        Ok(MinigameResult {
            outcome,
            money_before: before,
            money_after: self.total_money,
            finished,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot<'_> {
        SessionSnapshot {
            id: self.id,
            player: &self.player,
            event_mode: self.event_mode,
            phase: self.phase,
            total_money: self.total_money,
            current_round: self.current_round,
            round_count: self.rounds.len(),
            floors_to_select: self.floors_to_select,
            selected_floors: &self.selected_floors,
            current_floor: self.current_floor(),
            floors_completed: self.floors_completed,
            minigame: self.minigame.as_ref(),
            effects: self.effects.iter().copied().collect(),
            remaining: self
                .ledger
                .iter()
                .map(|(key, entry)| (key.to_string(), entry.count, entry.revealed))
                .collect(),
        }
    }

    #[cfg(test)]
    pub(crate) fn set_total_money(&mut self, total: u64) {
        self.total_money = total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tower::roshambo::Hand;
    use towercash_types::{NORMAL_FLOORS, NORMAL_ROUNDS};

    fn player() -> Player {
        Player::new("u1", "alice", "c1", "g1")
    }

    fn session(seed: u64) -> Session {
        Session::new(1, player(), &GameConfig::normal(), false, seed)
    }

    /// A tiny tower with a known layout: rounds of 2 and 1 floors.
    fn scripted(amounts: Vec<Amount>, rounds: Vec<usize>) -> Session {
        let config = GameConfig {
            rounds,
            catalog: amounts,
            substitutions: vec![],
        };
        let mut session = Session::new(1, player(), &config, false, 0);
        // Lay the catalog out in order so tests know every floor.
        let floors = config
            .catalog
            .chunks(2)
            .map(|c| FloorPair {
                left: c[0].clone(),
                right: c[1].clone(),
            })
            .collect::<Vec<_>>();
        session.pool = FloorPool::from_pairs(floors);
        session.ledger = Ledger::new(&session.pool);
        session
    }

    fn conserved(s: &Session) -> bool {
        s.ledger.remaining() as usize + 2 * s.ledger.floors_resolved() == 2 * s.floor_count()
    }

    #[test]
    fn test_new_session() {
        let s = session(1);
        assert_eq!(s.phase(), Phase::SelectingFloors);
        assert_eq!(s.floor_count(), NORMAL_FLOORS);
        assert_eq!(s.floors_to_select(), NORMAL_ROUNDS[0]);
        assert_eq!(s.total_money(), 0);
        assert_eq!(s.available_floors().len(), NORMAL_FLOORS);
        assert!(conserved(&s));
    }

    #[test]
    fn test_selection_bounds() {
        let mut s = session(1);
        assert!(s.select_floor(1).unwrap());
        assert!(!s.select_floor(1).unwrap());
        assert!(!s.select_floor(0).unwrap());
        assert!(!s.select_floor(NORMAL_FLOORS + 1).unwrap());
        for f in 2..=6 {
            assert!(s.select_floor(f).unwrap());
        }
        assert!(!s.select_floor(7).unwrap());
        assert!(s.toggle_floor(3).unwrap());
        assert!(s.toggle_floor(7).unwrap());
        assert_eq!(s.selected_floors(), &[1, 2, 4, 5, 6, 7]);
        assert!(!s.deselect_floor(3).unwrap());
    }

    #[test]
    fn test_confirm_requires_full_selection() {
        let mut s = session(1);
        s.select_floor(4).unwrap();
        assert_eq!(s.confirm_floors().unwrap_err(), GameError::NotReady);
        for f in [9, 2, 11, 20, 15] {
            s.select_floor(f).unwrap();
        }
        let pair = s.confirm_floors().unwrap().clone();
        assert_eq!(&pair, s.pool.floor(4).unwrap());
        assert_eq!(s.current_floor(), Some(4));
        assert_eq!(
            s.select_floor(1).unwrap_err(),
            GameError::InvalidPhase(Phase::ChoosingSide)
        );
    }

    #[test]
    fn test_resolve_applies_and_records() {
        let mut s = scripted(
            vec![
                Amount::cash(10_000),
                Amount::cash(50_000),
                Amount::percentage(50),
                Amount::percentage(-50),
                Amount::Nothing,
                Amount::Nothing,
            ],
            vec![2, 1],
        );
        s.select_floor(1).unwrap();
        s.select_floor(2).unwrap();
        s.confirm_floors().unwrap();

        let out = s.resolve_choice(Side::Left).unwrap();
        assert_eq!(out.floor, 1);
        assert_eq!(out.money_before, 0);
        assert_eq!(out.money_after, 10_000);
        assert_eq!(out.would_have_been, 50_000);
        assert_eq!(out.signal, FloorSignal::Continue);
        assert_eq!(s.phase(), Phase::FloorResolved);
        assert!(conserved(&s));
        assert_eq!(
            s.resolve_choice(Side::Left).unwrap_err(),
            GameError::InvalidPhase(Phase::FloorResolved)
        );

        assert_eq!(s.advance().unwrap().next, NextFloor::Floor(2));
        let out = s.resolve_choice(Side::Right).unwrap();
        assert_eq!(out.money_after, 5_000);
        assert_eq!(out.would_have_been, 15_000);
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.history()[1].rejected, Amount::percentage(50));

        assert_eq!(s.advance().unwrap().next, NextFloor::RoundEnd);
        assert_eq!(s.phase(), Phase::RoundEnd);
        assert_eq!(s.floors_completed(), 2);
        assert!(s.played_floors().contains(&1));
        assert!(conserved(&s));
    }

    #[test]
    fn test_rounds_and_completion() {
        let mut s = scripted(
            vec![
                Amount::cash(1),
                Amount::cash(2),
                Amount::cash(3),
                Amount::cash(4),
                Amount::cash(5),
                Amount::cash(6),
            ],
            vec![2, 1],
        );
        assert_eq!(
            s.start_next_round().unwrap_err(),
            GameError::InvalidPhase(Phase::SelectingFloors)
        );
        s.select_floor(3).unwrap();
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        s.advance().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        s.advance().unwrap();

        assert_eq!(s.start_next_round().unwrap(), 1);
        assert_eq!(s.available_floors(), vec![2]);
        assert!(!s.select_floor(3).unwrap());
        s.select_floor(2).unwrap();
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Right).unwrap();
        let next = s.advance().unwrap();
        assert_eq!(next.next, NextFloor::Complete);
        assert_eq!(s.phase(), Phase::Ended(EndReason::Completed));
        assert_eq!(s.total_money(), 5 + 1 + 4);

        let summary = s.summary().unwrap();
        assert!(summary.won);
        assert_eq!(summary.floors_completed, 3);
        assert_eq!(s.advance().unwrap_err(), GameError::GameAlreadyComplete);
        assert_eq!(s.force_end().unwrap_err(), GameError::GameAlreadyComplete);
    }

    #[test]
    fn test_game_over_tile() {
        let mut s = scripted(
            vec![
                Amount::GameOver,
                Amount::cash(1),
                Amount::Nothing,
                Amount::Nothing,
            ],
            vec![1, 1],
        );
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        let out = s.resolve_choice(Side::Left).unwrap();
        assert_eq!(out.signal, FloorSignal::GameOver);
        assert_eq!(s.phase(), Phase::Ended(EndReason::GameOverTile));
        assert!(!s.summary().unwrap().won);
    }

    #[test]
    fn test_broke_at_round_end_after_round_one() {
        let mut s = scripted(
            vec![
                Amount::Nothing,
                Amount::Nothing,
                Amount::Nothing,
                Amount::Nothing,
                Amount::Nothing,
                Amount::Nothing,
            ],
            vec![1, 2],
        );
        // Broke at the end of round 1 is fine.
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        assert_eq!(
            s.resolve_choice(Side::Left).unwrap().signal,
            FloorSignal::Continue
        );
        s.advance().unwrap();
        s.start_next_round().unwrap();
        s.select_floor(2).unwrap();
        s.select_floor(3).unwrap();
        s.confirm_floors().unwrap();
        // Not the last floor yet.
        assert_eq!(
            s.resolve_choice(Side::Left).unwrap().signal,
            FloorSignal::Continue
        );
        s.advance().unwrap();
        let out = s.resolve_choice(Side::Left).unwrap();
        assert_eq!(out.signal, FloorSignal::OutOfMoney);
        assert_eq!(s.phase(), Phase::Ended(EndReason::NoMoney));
    }

    #[test]
    fn test_x_level_skips_last_floor() {
        let mut s = scripted(
            vec![
                Amount::special(SpecialAction::XLevel),
                Amount::cash(1),
                Amount::cash(10),
                Amount::cash(20),
                Amount::cash(100),
                Amount::cash(200),
                Amount::Nothing,
                Amount::Nothing,
            ],
            vec![3, 1],
        );
        for f in [1, 2, 3] {
            s.select_floor(f).unwrap();
        }
        s.confirm_floors().unwrap();
        let out = s.resolve_choice(Side::Left).unwrap();
        assert_eq!(out.signal, FloorSignal::FloorSkipScheduled(3));
        assert_eq!(s.ledger().floors_resolved(), 2);
        assert!(conserved(&s));

        assert_eq!(s.advance().unwrap().next, NextFloor::Floor(2));
        s.resolve_choice(Side::Right).unwrap();
        let adv = s.advance().unwrap();
        assert_eq!(adv.skipped, Some(3));
        assert_eq!(adv.next, NextFloor::RoundEnd);
        assert_eq!(s.floors_completed(), 3);
        assert!(s.played_floors().contains(&3));
        assert_eq!(s.total_money(), 20);
        assert!(conserved(&s));
        assert_eq!(s.unplayed_floors().len(), 1);
    }

    #[test]
    fn test_skipped_floor_ticks_effects() {
        let mut s = scripted(
            vec![
                Amount::special(SpecialAction::XLevel),
                Amount::cash(1),
                Amount::cash(10),
                Amount::cash(20),
                Amount::cash(100),
                Amount::cash(200),
                Amount::Nothing,
                Amount::Nothing,
            ],
            vec![3, 1],
        );
        for f in [1, 2, 3] {
            s.select_floor(f).unwrap();
        }
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        s.advance().unwrap();
        s.resolve_choice(Side::Right).unwrap();
        s.effects.grant(EffectKind::Shield, 2);
        s.effects.grant(EffectKind::DoubleCash, 3);

        // Floor 2 and the skipped floor 3 are both advanced past.
        let adv = s.advance().unwrap();
        assert_eq!(adv.skipped, Some(3));
        assert!(!s.effects().has(EffectKind::Shield));
        assert!(s.effects().has(EffectKind::DoubleCash));
        assert_eq!(
            s.effects().iter().map(|e| e.floors_remaining).collect::<Vec<_>>(),
            vec![1]
        );
    }

    #[test]
    fn test_round_without_floors_completes() {
        let mut s = scripted(
            vec![
                Amount::cash(1),
                Amount::cash(2),
                Amount::cash(3),
                Amount::cash(4),
            ],
            vec![2, 1],
        );
        s.select_floor(1).unwrap();
        s.select_floor(2).unwrap();
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        s.advance().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        assert_eq!(s.advance().unwrap().next, NextFloor::RoundEnd);

        assert_eq!(s.start_next_round().unwrap(), 0);
        assert_eq!(s.phase(), Phase::Ended(EndReason::Completed));
        let summary = s.summary().unwrap();
        assert!(summary.won);
        assert_eq!(summary.final_score, 4);
    }

    #[test]
    fn test_x_level_on_last_floor_does_nothing() {
        let mut s = scripted(
            vec![
                Amount::cash(5),
                Amount::cash(6),
                Amount::special(SpecialAction::XLevel),
                Amount::Nothing,
            ],
            vec![2],
        );
        s.select_floor(1).unwrap();
        s.select_floor(2).unwrap();
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        s.advance().unwrap();
        let out = s.resolve_choice(Side::Left).unwrap();
        assert_eq!(out.signal, FloorSignal::Continue);
        assert_eq!(s.advance().unwrap().next, NextFloor::Complete);
    }

    #[test]
    fn test_random_percentage_is_rolled() {
        let mut s = scripted(
            vec![
                Amount::special(SpecialAction::RandomPercentage),
                Amount::Nothing,
            ],
            vec![1],
        );
        s.set_total_money(100_000);
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        let out = s.resolve_choice(Side::Left).unwrap();
        let p = out.random_percent.unwrap();
        assert!((-150..=150).contains(&p));
        assert_eq!(out.money_after, money::apply_percent(100_000, p));
        assert_eq!(out.would_have_been, 100_000);
    }

    #[test]
    fn test_cash_out_only_at_round_end() {
        let mut s = scripted(
            vec![Amount::cash(7), Amount::Nothing, Amount::Nothing, Amount::Nothing],
            vec![1, 1],
        );
        assert!(s.cash_out().is_err());
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        assert!(s.cash_out().is_err());
        s.advance().unwrap();
        let summary = s.cash_out().unwrap();
        assert_eq!(summary.reason, EndReason::Lobby);
        assert!(summary.won);
        assert_eq!(summary.final_score, 7);
    }

    #[test]
    fn test_minigame_blocks_floor_flow() {
        let mut s = scripted(
            vec![
                Amount::event(EventAction::OperatorRoshambo),
                Amount::Nothing,
                Amount::Nothing,
                Amount::Nothing,
            ],
            vec![1, 1],
        );
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        let out = s.resolve_choice(Side::Left).unwrap();
        assert_eq!(
            out.signal,
            FloorSignal::StartMinigame(EventAction::OperatorRoshambo)
        );
        assert_eq!(s.advance().unwrap_err(), GameError::MinigameActive);
        assert_eq!(
            s.start_minigame(EventAction::Vault).unwrap_err(),
            GameError::MinigameInactive
        );
        assert!(s.start_minigame(EventAction::OperatorRoshambo).unwrap().is_active());
        assert_eq!(s.advance().unwrap_err(), GameError::MinigameActive);
        assert_eq!(
            s.play(MinigameMove::Accept).unwrap_err(),
            GameError::InvalidMove
        );

        let mut result = None;
        while s.minigame().is_some_and(|m| m.is_active()) {
            result = Some(
                s.play(MinigameMove::Throw(Hand::Rock))
                    .unwrap(),
            );
        }
        let result = result.unwrap();
        assert!(result.finished);
        assert_eq!(result.money_after, s.total_money());
        assert_eq!(
            s.play(MinigameMove::Throw(Hand::Rock))
                .unwrap_err(),
            GameError::MinigameInactive
        );
        assert_eq!(s.advance().unwrap().next, NextFloor::RoundEnd);
        assert!(s.minigame().is_none());
    }

    #[test]
    fn test_operator_deal_ends_game() {
        let mut s = scripted(
            vec![
                Amount::event(EventAction::OperatorOffer),
                Amount::Nothing,
            ],
            vec![1],
        );
        s.set_total_money(40_000);
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        let offer = match s.start_minigame(EventAction::OperatorOffer).unwrap() {
            Minigame::OperatorOffer(g) => g.offer(),
            other => panic!("unexpected minigame {:?}", other.action()),
        };
        let result = s.play(MinigameMove::Accept).unwrap();
        assert_eq!(result.money_after, offer);
        assert_eq!(s.phase(), Phase::Ended(EndReason::OperatorDeal));
        assert!(s.summary().unwrap().won);
    }

    #[test]
    fn test_rusty_trap_locks_banking() {
        let mut s = scripted(
            vec![
                Amount::event(EventAction::MegaGrid),
                Amount::Nothing,
            ],
            vec![1],
        );
        s.select_floor(1).unwrap();
        s.confirm_floors().unwrap();
        s.resolve_choice(Side::Left).unwrap();
        s.start_minigame(EventAction::MegaGrid).unwrap();
        s.effects.grant(EffectKind::NoBankCashout, 2);
        assert_eq!(
            s.play(MinigameMove::CashOut).unwrap_err(),
            GameError::BankingLocked
        );
        // Picking is still allowed.
        assert!(s.play(MinigameMove::Pick(0)).is_ok());
    }

    #[test]
    fn test_effects_shape_floor_outcomes() {
        let mut s = scripted(
            vec![
                Amount::percentage(-50),
                Amount::Nothing,
                Amount::cash(1_000),
                Amount::Nothing,
                Amount::cash(1_000),
                Amount::Nothing,
            ],
            vec![3],
        );
        s.set_total_money(10_000);
        s.effects.grant(EffectKind::Shield, 1);
        s.effects.grant(EffectKind::DoubleCash, 2);
        for f in [1, 2, 3] {
            s.select_floor(f).unwrap();
        }
        s.confirm_floors().unwrap();
        assert_eq!(s.resolve_choice(Side::Left).unwrap().money_after, 10_000);
        s.advance().unwrap();
        assert!(!s.effects().has(EffectKind::Shield));
        assert_eq!(s.resolve_choice(Side::Left).unwrap().money_after, 12_000);
        s.advance().unwrap();
        assert_eq!(s.resolve_choice(Side::Left).unwrap().money_after, 13_000);
    }

    #[test]
    fn test_insight_requires_effect() {
        let mut s = session(3);
        for f in 1..=6 {
            s.select_floor(f).unwrap();
        }
        s.confirm_floors().unwrap();
        assert_eq!(s.insight().unwrap_err(), GameError::InvalidMove);
        s.effects.grant(EffectKind::Insight, 1);
        assert_eq!(s.insight().unwrap(), s.pool.floor(1).unwrap());
    }

    #[test]
    fn test_force_end_from_any_phase() {
        let mut s = session(4);
        let summary = s.force_end().unwrap();
        assert_eq!(summary.reason, EndReason::Abandoned);
        assert!(!summary.won);
        assert_eq!(s.select_floor(1).unwrap_err(), GameError::GameAlreadyComplete);
    }

    #[test]
    fn test_snapshot_serializes() {
        let s = session(5);
        let json = serde_json::to_value(s.snapshot()).unwrap();
        assert_eq!(json["phase"]["phase"], "selecting_floors");
        assert_eq!(json["floors_to_select"], 6);
        assert_eq!(json["player"]["username"], "alice");
    }

    #[test]
    fn test_reveal_all_floors() {
        let s = session(6);
        assert_eq!(s.reveal_all_floors().len(), NORMAL_FLOORS);
        assert_eq!(s.unplayed_floors().len(), NORMAL_FLOORS);
    }
}
