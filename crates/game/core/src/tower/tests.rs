use super::*;
use crate::battle::{AutoPlanner, BattlePhase, BattleRewards, PlayerPolicy, ScriptedPolicy};
use crate::config::GameConfig;
use crate::error::GameError;
use crate::state::{EncounterId, EnemyId, FloorId, UnitId};
use crate::testing::{content, env, party};

fn slime_floor(number: u32) -> TowerFloor {
    TowerFloor {
        id: FloorId::new(format!("floor-{number}")),
        floor_number: number,
        kind: FloorKind::Normal {
            encounter: EncounterId::new("slime-pair"),
        },
        normalized_level: None,
    }
}

fn rest_floor(number: u32, heal_fraction: Option<f64>) -> TowerFloor {
    TowerFloor {
        id: FloorId::new(format!("rest-{number}")),
        floor_number: number,
        kind: FloorKind::Rest {
            allow_loadout_change: true,
            heal_fraction,
        },
        normalized_level: None,
    }
}

fn start(difficulty: Difficulty, floors: Vec<TowerFloor>, config: TowerConfig) -> TowerRunState {
    TowerRunState::create(99, difficulty, floors, config).unwrap()
}

fn battle_config() -> GameConfig {
    GameConfig::default().with_crit_chance(0)
}

#[test]
fn floor_battle_normalizes_players_without_touching_hp() {
    let content = content();
    let run = start(Difficulty::Normal, vec![slime_floor(1)], DEFAULT_TOWER_CONFIG);

    let battle = prepare_floor_battle(&run, &party(&content, 1), &env(&content), battle_config())
        .unwrap();

    let isaac = battle.player_team().unit(&UnitId::new("isaac")).unwrap();
    assert_eq!(isaac.level, 5);
    assert_eq!(isaac.max_hp(), 50);
    assert_eq!(isaac.stats().atk, 22);
    assert_eq!(isaac.current_hp, 30);

    assert_eq!(battle.phase(), BattlePhase::Planning);
    assert_eq!(battle.enemies().len(), 2);
    assert_eq!(battle.enemies()[0].current_hp, 40);
    assert_eq!(
        battle.enemy_source(&UnitId::new("slime#2")),
        Some(&EnemyId::new("slime"))
    );
}

#[test]
fn explicit_floor_level_and_disabled_normalization() {
    let content = content();
    let mut floor = slime_floor(12);
    floor.normalized_level = Some(3);
    let run = start(Difficulty::Normal, vec![floor.clone()], DEFAULT_TOWER_CONFIG);
    assert_eq!(floor_level(&run, &floor), 3);
    let battle = prepare_floor_battle(&run, &party(&content, 1), &env(&content), battle_config())
        .unwrap();
    assert_eq!(battle.player_team().units[0].level, 3);

    let config = TowerConfig {
        normalize_levels: false,
        ..TowerConfig::default()
    };
    let run = start(Difficulty::Normal, vec![slime_floor(12)], config);
    let battle = prepare_floor_battle(&run, &party(&content, 2), &env(&content), battle_config())
        .unwrap();
    assert_eq!(battle.player_team().units[0].level, 2);
}

#[test]
fn hard_floors_scale_enemies() {
    let content = content();
    let floors = (1..=6).map(slime_floor).collect();
    let mut run = start(Difficulty::Hard, floors, DEFAULT_TOWER_CONFIG);
    for _ in 0..5 {
        run = run.advance_to_next_floor();
    }
    assert_eq!(run.current_floor().map(|f| f.floor_number), Some(6));

    let battle = prepare_floor_battle(&run, &party(&content, 1), &env(&content), battle_config())
        .unwrap();
    let slime = &battle.enemies()[0];
    assert_eq!(slime.max_hp(), 58);
    assert_eq!(slime.current_hp, 58);
    assert_eq!(slime.level, 9);
    assert_eq!(slime.stats().spd, 5);
}

#[test]
fn rest_floors_cannot_host_battles() {
    let content = content();
    let run = start(
        Difficulty::Normal,
        vec![rest_floor(1, None)],
        DEFAULT_TOWER_CONFIG,
    );
    let err = prepare_floor_battle(&run, &party(&content, 1), &env(&content), battle_config())
        .unwrap_err();
    assert_eq!(err, TowerError::BattleOnRestFloor(FloorId::new("rest-1")));
    assert!(err.severity().is_contract_violation());
}

#[test]
fn unfinished_battles_cannot_be_summarized() {
    let content = content();
    let run = start(Difficulty::Normal, vec![slime_floor(1)], DEFAULT_TOWER_CONFIG);
    let battle = prepare_floor_battle(&run, &party(&content, 1), &env(&content), battle_config())
        .unwrap();
    assert_eq!(
        BattleSummary::from_battle(&battle, BattleRewards::default()),
        Err(TowerError::BattleNotFinished)
    );
}

#[test]
fn a_won_floor_feeds_the_run() {
    let content = content();
    let env = env(&content);
    let mut team = party(&content, 1);
    let run = start(
        Difficulty::Normal,
        vec![slime_floor(1), slime_floor(2)],
        DEFAULT_TOWER_CONFIG,
    );

    let mut battle = prepare_floor_battle(&run, &team, &env, battle_config()).unwrap();
    while !battle.is_over() && battle.round() <= battle.config().max_rounds {
        AutoPlanner::new().plan(&mut battle, &content).unwrap();
        battle.execute_round(&env, &ScriptedPolicy).unwrap();
    }
    assert_eq!(battle.phase(), BattlePhase::Victory);

    let spoils = battle.calculate_rewards(&env).unwrap();
    let summary = BattleSummary::from_battle(&battle, spoils).unwrap();
    assert_eq!(summary.outcome, BattleOutcome::Victory);
    assert_eq!(summary.turns, battle.round());
    assert!(summary.damage_dealt >= 80);

    carry_battle_hp(&mut team, battle.player_team());
    assert_eq!(team.units[0].level, 1);

    let next = run.record_battle_result(&summary).unwrap();
    assert_eq!(next.floor_index(), 1);
    assert_eq!(next.stats().highest_floor, 1);
    // 15 floor xp plus 20 per slime
    assert_eq!(next.total_pending_rewards().xp, 55);
    assert_eq!(next.total_pending_rewards().drops.len(), 2);
}

#[test]
fn rest_heals_the_living_and_revives_the_fallen() {
    let content = content();
    let mut team = party(&content, 1);
    team.units[0].current_hp = 10;
    team.units[1].current_hp = 0;
    let run = start(
        Difficulty::Normal,
        vec![rest_floor(1, Some(0.5)), slime_floor(2)],
        DEFAULT_TOWER_CONFIG,
    );

    let summary = apply_rest(&run, &mut team, true).unwrap();

    assert_eq!(team.units[0].current_hp, 25);
    assert_eq!(team.units[1].current_hp, 12);
    assert_eq!(summary.hp_restored, 27);
    assert_eq!(summary.units_revived, 1);
    assert!(summary.loadout_changed);

    let next = run.complete_rest_floor(summary).unwrap();
    assert_eq!(next.history()[0].outcome, FloorOutcome::Rested);
    assert_eq!(
        apply_rest(&next, &mut team, false).unwrap_err(),
        TowerError::NotRestFloor(FloorId::new("floor-2"))
    );
}

#[test]
fn rest_uses_the_configured_default_fraction() {
    let content = content();
    let mut team = party(&content, 1);
    team.units[0].current_hp = 1;
    let config = TowerConfig {
        default_rest_heal_fraction: 1.0,
        ..DEFAULT_TOWER_CONFIG
    };
    let run = start(Difficulty::Normal, vec![rest_floor(1, None)], config);

    let summary = apply_rest(&run, &mut team, false).unwrap();
    assert_eq!(summary.heal_fraction, 1.0);
    assert_eq!(team.units[0].current_hp, team.units[0].max_hp());
}

#[cfg(feature = "serde")]
#[test]
fn run_state_round_trips_through_json() {
    let run = start(
        Difficulty::Hard,
        vec![slime_floor(2), rest_floor(1, Some(0.25))],
        DEFAULT_TOWER_CONFIG,
    );
    let json = serde_json::to_string(&run).unwrap();
    let restored: TowerRunState = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, run);
    assert!(restored.floors()[0].is_rest());
}
