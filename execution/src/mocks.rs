//! Helpers for driving sessions in tests and the simulator.

use crate::tower::{
    babushka::DOLLS,
    hideout::POSITIONS,
    mega_grid::GRID_CELLS,
    mystery_box::BOXES,
    roshambo::Hand,
    FloorSignal, GameSummary, Minigame, MinigameMove, Phase, Player, Session, Sign,
};
use rand::{seq::SliceRandom, Rng};
use towercash_types::Side;

/// A player in the shared test guild.
pub fn player(user_id: &str, channel_id: &str) -> Player {
    Player::new(user_id, user_id, channel_id, "guild")
}

/// Floors the session can still select that hold neither a game-over tile
/// nor a minigame, lowest first.
pub fn safe_floors(session: &Session) -> Vec<usize> {
    session
        .unplayed_floors()
        .into_iter()
        .filter(|(_, pair)| {
            [&pair.left, &pair.right]
                .iter()
                .all(|a| !a.is_game_over() && a.event_action().is_none())
        })
        .map(|(floor, _)| floor)
        .collect()
}

/// Play the current round on safe floors, always picking left.
pub fn play_safe_round(session: &mut Session) {
    let wanted = session.floors_to_select();
    for floor in safe_floors(session).into_iter().take(wanted) {
        session.select_floor(floor).expect("selecting floors");
    }
    session.confirm_floors().expect("confirming floors");
    while session.phase() == Phase::ChoosingSide {
        session.resolve_choice(Side::Left).expect("resolving floor");
        session.advance().expect("advancing");
    }
}

/// Play one safe round and leave through the lobby. Returns the final score.
pub fn finish_in_lobby(session: &mut Session) -> u64 {
    play_safe_round(session);
    session.cash_out().expect("cashing out").final_score
}

/// Every move that could be legal for `game`.
pub fn candidate_moves<R: Rng>(game: &Minigame, rng: &mut R) -> Vec<MinigameMove> {
    match game {
        Minigame::Vault(_) => {
            let mut digits: Vec<char> = ('0'..='9').collect();
            digits.shuffle(rng);
            vec![MinigameMove::Guess(digits.into_iter().take(6).collect())]
        }
        Minigame::OperatorOffer(_) => vec![MinigameMove::Accept, MinigameMove::Decline],
        Minigame::MegaGrid(_) => (0..GRID_CELLS)
            .map(MinigameMove::Pick)
            .chain([MinigameMove::CashOut])
            .collect(),
        Minigame::InfinityPercent(_) => vec![
            MinigameMove::Choose(Side::Left),
            MinigameMove::Choose(Side::Right),
            MinigameMove::CashOut,
        ],
        Minigame::HideoutBreakthrough(_) => (0..POSITIONS).map(MinigameMove::Pick).collect(),
        Minigame::Babushka(_) => (0..DOLLS)
            .map(MinigameMove::OpenDoll)
            .chain([
                MinigameMove::Reveal,
                MinigameMove::Bank,
                MinigameMove::CashOut,
            ])
            .collect(),
        Minigame::BoilingPoint(_) => vec![
            MinigameMove::Step(Sign::Plus),
            MinigameMove::Step(Sign::Minus),
            MinigameMove::Change,
        ],
        Minigame::OperatorRoshambo(_) => Hand::ALL.into_iter().map(MinigameMove::Throw).collect(),
        Minigame::MysteryBox(_) => (0..BOXES).map(MinigameMove::Pick).collect(),
    }
}

/// Play the running minigame to the end with random legal moves. Banking
/// moves are usually tried last.
pub fn play_minigame<R: Rng>(session: &mut Session, rng: &mut R) {
    while let Some(game) = session.minigame().filter(|m| m.is_active()) {
        let mut moves = candidate_moves(game, rng);
        moves.shuffle(rng);
        if !rng.gen_bool(0.2) {
            moves.sort_by_key(|m| m.is_banking());
        }
        let played = moves.into_iter().any(|mv| session.play(mv).is_ok());
        assert!(played, "no legal minigame move");
        if session.is_ended() {
            return;
        }
    }
}

/// Play a whole game with a random policy.
pub fn autoplay<R: Rng>(session: &mut Session, rng: &mut R, continue_chance: f64) -> GameSummary {
    loop {
        match session.phase() {
            Phase::SelectingFloors => {
                let mut floors = session.available_floors();
                floors.shuffle(rng);
                for floor in floors.into_iter().take(session.floors_to_select()) {
                    session.select_floor(floor).expect("selecting floors");
                }
                session.confirm_floors().expect("confirming floors");
            }
            Phase::ChoosingSide => {
                let side = if rng.gen_bool(0.5) {
                    Side::Left
                } else {
                    Side::Right
                };
                let outcome = session.resolve_choice(side).expect("resolving floor");
                if let FloorSignal::StartMinigame(action) = outcome.signal {
                    session.start_minigame(action).expect("starting minigame");
                    play_minigame(session, rng);
                }
            }
            Phase::FloorResolved => {
                session.advance().expect("advancing");
            }
            Phase::RoundEnd => {
                if rng.gen_bool(continue_chance) {
                    session.start_next_round().expect("starting round");
                } else {
                    session.cash_out().expect("cashing out");
                }
            }
            Phase::Ended(_) => return session.summary().expect("ended session has a summary"),
        }
    }
}
