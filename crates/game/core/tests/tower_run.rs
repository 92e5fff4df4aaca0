//! End-to-end tower runs driven through the public API.

use vale_core::battle::{AutoPlanner, PlayerPolicy, ScriptedPolicy, apply_rewards};
use vale_core::state::{TargetKind, UnitAbility};
use vale_core::tower::{
    BattleSummary, FloorOutcome, RestSummary, apply_rest, carry_battle_hp, prepare_floor_battle,
};
use vale_core::{
    Ability, AbilityId, AbilityKind, ContentSnapshot, DEFAULT_TOWER_CONFIG, Difficulty, Element,
    Encounter, EncounterId, Enemy, EnemyId, Env, FloorId, FloorKind, GameConfig, GrowthRates,
    PcgRng, Stats, Team, TowerFloor, TowerRunState, Unit, UnitDefinition, UnitId, UnitRole,
    calculate_enemy_scaling,
};

static RNG: PcgRng = PcgRng;

fn ability(id: &str, kind: AbilityKind, mana_cost: u8, power: u32, target: TargetKind) -> Ability {
    Ability {
        id: AbilityId::new(id),
        name: id.to_owned(),
        kind,
        element: None,
        mana_cost,
        power,
        target,
        unlock_level: 1,
        cooldown: 0,
        status: None,
    }
}

fn enemy(id: &str, stats: Stats, ability: &str, xp: u32) -> Enemy {
    Enemy {
        id: EnemyId::new(id),
        name: id.to_owned(),
        level: 2,
        element: Element::Neutral,
        stats,
        abilities: vec![AbilityId::new(ability)],
        xp_reward: xp,
        gold_reward: 5,
        drops: Vec::new(),
    }
}

fn hero(id: &str, role: UnitRole, abilities: &[&str]) -> UnitDefinition {
    UnitDefinition {
        id: UnitId::new(id),
        name: id.to_owned(),
        element: Element::Venus,
        role,
        base_stats: Stats::new(30, 10, 12, 8, 8, 10),
        growth_rates: GrowthRates {
            hp: 5,
            pp: 2,
            atk: 2,
            def: 2,
            mag: 2,
            spd: 1,
        },
        mana_contribution: 3,
        abilities: abilities
            .iter()
            .map(|id| UnitAbility {
                ability: AbilityId::new(*id),
                unlock_level: 1,
            })
            .collect(),
    }
}

fn content() -> ContentSnapshot {
    ContentSnapshot::new()
        .with_ability(ability("strike", AbilityKind::Physical, 0, 6, TargetKind::SingleEnemy))
        .with_ability(ability("heal", AbilityKind::Healing, 2, 12, TargetKind::SingleAlly))
        .with_ability(ability("claw", AbilityKind::Physical, 0, 3, TargetKind::SingleEnemy))
        .with_ability(ability("smash", AbilityKind::Physical, 0, 4, TargetKind::SingleEnemy))
        .with_ability(ability("inferno", AbilityKind::Physical, 0, 999, TargetKind::SingleEnemy))
        .with_unit(hero("felix", UnitRole::Dps, &["strike"]))
        .with_unit(hero("sheba", UnitRole::Healer, &["strike", "heal"]))
        .with_enemy(enemy("rat", Stats::new(30, 0, 8, 4, 2, 5), "claw", 10))
        .with_enemy(enemy("golem", Stats::new(90, 0, 10, 10, 2, 3), "smash", 50))
        .with_enemy(enemy("dragon", Stats::new(9_999, 0, 500, 500, 2, 99), "inferno", 0))
        .with_encounter(Encounter {
            id: EncounterId::new("rats"),
            name: "Rats".into(),
            enemies: vec![EnemyId::new("rat"), EnemyId::new("rat")],
        })
        .with_encounter(Encounter {
            id: EncounterId::new("golem"),
            name: "Golem".into(),
            enemies: vec![EnemyId::new("golem")],
        })
        .with_encounter(Encounter {
            id: EncounterId::new("dragon"),
            name: "Dragon".into(),
            enemies: vec![EnemyId::new("dragon")],
        })
}

fn team(content: &ContentSnapshot) -> Team {
    let units = ["felix", "sheba"]
        .map(|id| Unit::from_definition(&content.units[&UnitId::new(id)], 1));
    Team::new(units).unwrap()
}

fn floor(number: u32, kind: FloorKind) -> TowerFloor {
    TowerFloor {
        id: FloorId::new(format!("f{number}")),
        floor_number: number,
        kind,
        normalized_level: None,
    }
}

fn fight(encounter: &str) -> FloorKind {
    FloorKind::Normal {
        encounter: EncounterId::new(encounter),
    }
}

/// Plays the current floor's battle to the end and folds it into the run.
fn play_floor(run: &TowerRunState, team: &mut Team, content: &ContentSnapshot) -> TowerRunState {
    let env = Env::with_all(content, &RNG).as_game_env();
    let config = GameConfig::default();
    let mut battle = prepare_floor_battle(run, team, &env, config.clone()).unwrap();
    while !battle.is_over() && battle.round() <= config.max_rounds {
        AutoPlanner::new().plan(&mut battle, content).unwrap();
        battle.execute_round(&env, &ScriptedPolicy).unwrap();
    }
    let spoils = battle.calculate_rewards(&env).unwrap();
    let summary = BattleSummary::from_battle(&battle, spoils).unwrap();
    carry_battle_hp(team, battle.player_team());
    run.record_battle_result(&summary).unwrap()
}

#[test]
fn ten_floor_run_starts_clean() {
    let floors = (1..=10).map(|n| floor(n, fight("rats"))).collect();
    let run = TowerRunState::create(42, Difficulty::Normal, floors, DEFAULT_TOWER_CONFIG).unwrap();

    assert_eq!(run.floor_index(), 0);
    assert_eq!(run.stats().highest_floor, 0);
    assert_eq!(run.history().len(), 10);
    assert!(
        run.history()
            .iter()
            .all(|record| record.outcome == FloorOutcome::Pending)
    );
}

#[test]
fn hard_floor_six_scaling_matches_the_curve() {
    let scaling = calculate_enemy_scaling(6, Difficulty::Hard, &DEFAULT_TOWER_CONFIG);
    assert!((scaling.stat_multiplier - 1.45).abs() < 1e-9);
    assert_eq!(scaling.level_delta, 7);
}

#[test]
fn full_run_with_a_rest_stop() {
    let content = content();
    let mut team = team(&content);
    let floors = vec![
        floor(3, FloorKind::Boss {
            encounter: EncounterId::new("golem"),
        }),
        floor(1, fight("rats")),
        floor(2, FloorKind::Rest {
            allow_loadout_change: false,
            heal_fraction: Some(1.0),
        }),
    ];
    let mut run = TowerRunState::create(7, Difficulty::Normal, floors, DEFAULT_TOWER_CONFIG).unwrap();

    run = play_floor(&run, &mut team, &content);
    assert_eq!(run.floor_index(), 1);

    let rest: RestSummary = apply_rest(&run, &mut team, true).unwrap();
    assert!(!rest.loadout_changed);
    assert!(team.units.iter().all(|unit| unit.current_hp == unit.max_hp()));
    run = run.complete_rest_floor(rest).unwrap();

    run = play_floor(&run, &mut team, &content);

    assert!(run.is_completed());
    assert!(!run.is_failed());
    assert_eq!(run.floor_index(), 3);
    assert_eq!(run.stats().highest_floor, 3);
    assert_eq!(run.stats().battles_won, 2);
    let outcomes: Vec<_> = run.history().iter().map(|record| record.outcome).collect();
    assert_eq!(
        outcomes,
        vec![FloorOutcome::Victory, FloorOutcome::Rested, FloorOutcome::Victory]
    );

    // Further reducers are no-ops once the run is over.
    assert_eq!(run.advance_to_next_floor(), run);

    let (claimed, rewards) = run.clear_pending_rewards();
    assert!(claimed.pending_rewards().is_empty());
    // rats: 15 + 2 * 10, golem boss floor 3: 15 * 3 * 3 + 50
    assert_eq!(rewards.xp, 35 + 185);

    let level_ups = apply_rewards(&mut team, &rewards);
    assert_eq!(level_ups.len(), 2);
    assert!(team.units.iter().all(|unit| unit.level == 2));
}

#[test]
fn defeat_fails_the_run() {
    let content = content();
    let mut team = team(&content);
    let floors = vec![floor(1, fight("dragon")), floor(2, fight("rats"))];
    let run = TowerRunState::create(3, Difficulty::Hard, floors, DEFAULT_TOWER_CONFIG).unwrap();

    let run = play_floor(&run, &mut team, &content);

    assert!(run.is_failed());
    assert!(run.is_completed());
    assert_eq!(run.floor_index(), 0);
    assert_eq!(run.history()[0].outcome, FloorOutcome::Defeat);
    assert!(run.pending_rewards().is_empty());
    assert!(team.units.iter().all(|unit| !unit.is_alive()));
}
