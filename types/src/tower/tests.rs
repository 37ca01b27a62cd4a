use super::*;
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use std::collections::BTreeMap;

fn counts(amounts: &[Amount]) -> BTreeMap<AmountKey, usize> {
    let mut map = BTreeMap::new();
    for amount in amounts {
        *map.entry(amount.key()).or_insert(0) += 1;
    }
    map
}

#[test]
fn test_catalog_sizes_match_floor_counts() {
    assert_eq!(normal_catalog().len(), 2 * NORMAL_FLOORS);
    assert_eq!(event_catalog().len(), 2 * EVENT_FLOORS);
    assert_eq!(NORMAL_ROUNDS.iter().sum::<usize>(), NORMAL_FLOORS);
    assert_eq!(EVENT_ROUNDS.iter().sum::<usize>(), EVENT_FLOORS);
}

#[test]
fn test_normal_catalog_composition() {
    let catalog = counts(&normal_catalog());
    assert_eq!(catalog[&AmountKey::Nothing], 14);
    assert_eq!(catalog[&AmountKey::GameOver], 2);
    assert_eq!(catalog[&AmountKey::Cash(1_000_000)], 1);
    assert_eq!(catalog[&AmountKey::Percent(-100)], 1);
    assert_eq!(catalog[&AmountKey::Special(SpecialAction::XLevel)], 1);
    assert!(!catalog.contains_key(&AmountKey::Special(SpecialAction::RandomPercentage)));
    assert!(catalog.keys().all(|k| !matches!(k, AmountKey::Event(_))));
}

#[test]
fn test_event_substitutions_fit_nothing_slots() {
    let catalog = event_catalog();
    let subs = event_substitutions();
    let nothing = catalog.iter().filter(|a| a.is_nothing()).count();
    assert_eq!(subs.len(), 11);
    assert_eq!(nothing - subs.len(), 3);

    let subs = counts(&subs);
    assert_eq!(subs[&AmountKey::Event(EventAction::MysteryBox)], 2);
    assert_eq!(subs[&AmountKey::Special(SpecialAction::RandomPercentage)], 1);
    for action in EventAction::ALL {
        assert!(subs.contains_key(&AmountKey::Event(action)));
    }
}

#[test]
fn test_amount_serde_tags() {
    let amount = Amount::random(1_000, 100_000, "Lucky Draw");
    let json = serde_json::to_value(&amount).unwrap();
    assert_eq!(json["type"], "random");
    assert!(json.get("generated").is_none());

    let amount: Amount =
        serde_json::from_str(r#"{"type":"special","action":"add_zero","label":"Add a Zero"}"#)
            .unwrap();
    assert_eq!(amount, Amount::special(SpecialAction::AddZero));

    let amount: Amount = serde_json::from_str(r#"{"type":"game_over"}"#).unwrap();
    assert!(amount.is_game_over());
}

#[test]
fn test_amount_key_display() {
    assert_eq!(Amount::cash(5_000).key().to_string(), "cash_5000");
    assert_eq!(Amount::percentage(-25).key().to_string(), "percent_-25");
    assert_eq!(
        Amount::random(1, 2, "Lucky Draw").key().to_string(),
        "random_Lucky Draw"
    );
    assert_eq!(Amount::Nothing.key().to_string(), "nothing");
}

#[test]
fn test_amount_display() {
    assert_eq!(Amount::cash(25_000).to_string(), "$25000");
    assert_eq!(Amount::percentage(50).to_string(), "+50%");
    assert_eq!(Amount::percentage(-50).to_string(), "-50%");
    let boost = Amount::Special {
        action: SpecialAction::BoostMultiplier,
        label: "Boost Multiplier".to_string(),
        generated: Some(205),
    };
    assert_eq!(boost.to_string(), "Boost Multiplier (x2.05)");
}

#[test]
fn test_face_value() {
    let rolled = Amount::Random {
        min: 1,
        max: 10,
        label: "x".to_string(),
        generated: Some(7),
    };
    assert_eq!(rolled.face_value(), 7);
    assert_eq!(Amount::cash(20_000).face_value(), 20_000);
    assert_eq!(Amount::percentage(50).face_value(), 0);
    assert_eq!(Amount::special(SpecialAction::AddZero).face_value(), 0);
}

#[test]
fn test_end_reason_wins() {
    assert!(EndReason::Completed.is_win());
    assert!(EndReason::Lobby.is_win());
    assert!(EndReason::OperatorDeal.is_win());
    assert!(!EndReason::GameOverTile.is_win());
    assert!(!EndReason::NoMoney.is_win());
    assert!(!EndReason::Abandoned.is_win());
}

#[test]
fn test_box_weights() {
    assert_eq!(BoxCategory::Money.total_weight(), 82);
    assert_eq!(BoxCategory::Good.total_weight(), 80);
    assert_eq!(BoxCategory::Bad.total_weight(), 85);
    assert_eq!(BoxCategory::Neutral.total_weight(), 90);
    for category in BoxCategory::ALL {
        assert!(category.items().iter().all(|i| i.category == category));
    }
}

#[test]
fn test_pick_item_walks_weights() {
    assert_eq!(pick_item(BoxCategory::Money, 0).id, "panty_pant");
    assert_eq!(pick_item(BoxCategory::Money, 29).id, "panty_pant");
    assert_eq!(pick_item(BoxCategory::Money, 30).id, "gold_coin");
    assert_eq!(pick_item(BoxCategory::Money, 81).id, "million_cheque");
    assert_eq!(pick_item(BoxCategory::Neutral, 89).id, "fortune_cookie");
    assert_eq!(pick_item(BoxCategory::Bad, 10_000).id, "pickpocket");
}

#[test]
fn test_timed_items_carry_durations() {
    let trap = BAD_ITEMS.iter().find(|i| i.id == "rusty_trap").unwrap();
    assert_eq!(
        trap.effect,
        ItemEffect::Timed {
            kind: EffectKind::NoBankCashout,
            floors: 2
        }
    );
    let glove = GOOD_ITEMS.iter().find(|i| i.id == "golden_glove").unwrap();
    assert_eq!(
        glove.effect,
        ItemEffect::Timed {
            kind: EffectKind::DoubleCash,
            floors: 1
        }
    );
}

#[test]
fn test_config_presets() {
    let normal = GameConfig::normal();
    assert_eq!(normal.floor_count(), NORMAL_FLOORS);
    assert_eq!(normal.round_count(), 6);
    assert_eq!(normal.floors_in_round(1), 6);
    assert_eq!(normal.floors_in_round(6), 1);
    assert_eq!(normal.floors_in_round(0), 0);
    assert_eq!(normal.floors_in_round(7), 0);
    assert!(normal.substitutions.is_empty());

    let event = GameConfig::event();
    assert_eq!(event.floor_count(), EVENT_FLOORS);
    assert_eq!(event.floors_in_round(1), 7);

    let settings = Settings::default();
    assert_eq!(settings.game(true), &event);
    assert_eq!(settings.game(false), &normal);
    assert_eq!(settings.max_plays_per_day, 2);
}

#[test]
fn test_config_from_yaml() {
    let yaml = r#"
rounds: [2, 1]
catalog:
  - type: cash
    value: 1000
  - type: percentage
    value: -50
  - type: nothing
  - type: nothing
  - type: game_over
  - type: random
    min: 10
    max: 20
    label: Tiny
substitutions:
  - type: event
    action: vault
    label: The Vault
"#;
    let config = GameConfig::from_yaml(yaml).unwrap();
    assert_eq!(config.floor_count(), 3);
    assert_eq!(config.catalog.len(), 6);
    assert_eq!(config.substitutions, vec![Amount::event(EventAction::Vault)]);
}

#[test]
fn test_config_rejects_bad_schedule() {
    let err = GameConfig::from_yaml("rounds: []\ncatalog: []\n").unwrap_err();
    assert!(matches!(err, ConfigError::EmptySchedule));
    let err = GameConfig::from_yaml("rounds: [3, 0]\ncatalog: []\n").unwrap_err();
    assert!(matches!(err, ConfigError::EmptyRound(2)));
    let err = GameConfig::from_yaml("rounds: nope").unwrap_err();
    assert!(matches!(err, ConfigError::Yaml(_)));
}

#[test]
fn test_settings_partial_yaml_keeps_defaults() {
    let settings = Settings::from_yaml("max_plays_per_day: 5\n").unwrap();
    assert_eq!(settings.max_plays_per_day, 5);
    assert_eq!(settings.normal, GameConfig::normal());
    assert_eq!(settings.event, GameConfig::event());
}

#[test]
fn test_player_stats_record() {
    let mut stats = PlayerStats::new("1", "alice");
    stats.record("alice", 50_000, true);
    stats.record("alice", 20_000, false);
    assert_eq!(stats.total_games, 2);
    assert_eq!(stats.total_wins, 1);
    assert_eq!(stats.highest_score, 50_000);

    let long = "x".repeat(100);
    stats.record(&long, 0, false);
    assert_eq!(stats.username.len(), MAX_NAME_LENGTH);
}

#[test]
fn test_leaderboard_update() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut leaderboard = Leaderboard::default();

    let mut players: Vec<PlayerStats> = (0..15)
        .map(|i| {
            let mut stats = PlayerStats::new(&i.to_string(), &format!("Player{i}"));
            stats.record(&format!("Player{i}"), (i as u64 + 1) * 1000, rng.gen_bool(0.5));
            stats
        })
        .collect();
    players.shuffle(&mut rng);
    for stats in &players {
        leaderboard.update(stats);
    }

    // Should only keep top 10
    assert_eq!(leaderboard.entries.len(), LEADERBOARD_SIZE);

    // Should be sorted by score descending
    for i in 0..9 {
        assert!(leaderboard.entries[i].highest_score >= leaderboard.entries[i + 1].highest_score);
    }
    assert_eq!(leaderboard.entries[0].highest_score, 15_000);
    assert_eq!(leaderboard.entries[9].highest_score, 6_000);

    // Ranks should be 1-10
    for (i, entry) in leaderboard.entries.iter().enumerate() {
        assert_eq!(entry.rank, (i + 1) as u32);
    }
    assert_eq!(leaderboard.top(3).len(), 3);
    assert_eq!(leaderboard.top(50).len(), 10);
}

#[test]
fn test_leaderboard_ties_break_on_wins() {
    let mut leaderboard = Leaderboard::default();
    let mut a = PlayerStats::new("a", "a");
    a.record("a", 10_000, false);
    let mut b = PlayerStats::new("b", "b");
    b.record("b", 10_000, true);
    leaderboard.update(&a);
    leaderboard.update(&b);
    assert_eq!(leaderboard.entries[0].user_id, "b");
    assert_eq!(leaderboard.entries[1].user_id, "a");

    // Re-recording a player moves their entry rather than duplicating it
    a.record("a", 20_000, false);
    leaderboard.update(&a);
    assert_eq!(leaderboard.entries.len(), 2);
    assert_eq!(leaderboard.entries[0].user_id, "a");
    assert_eq!(leaderboard.entries[0].rank, 1);
}
