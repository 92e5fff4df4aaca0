//! Shared fixtures for unit tests.

use arrayvec::ArrayVec;

use crate::battle::BattleState;
use crate::config::GameConfig;
use crate::env::{ContentSnapshot, Env, GameEnv, PcgRng};
use crate::state::{
    Ability, AbilityId, AbilityKind, Djinn, DjinnGrant, DjinnId, DropEntry, Element,
    ElementRelation, Encounter, EncounterId, Enemy, EnemyId, Equipment, EquipmentId,
    EquipmentSlot, StatusApplication, StatusEffect, SummonEffect, TargetKind, Team, Unit,
    UnitAbility, UnitDefinition, UnitId, UnitRole,
};
use crate::stats::{GrowthRates, StatDelta, Stats};

pub(crate) static RNG: PcgRng = PcgRng;

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

pub(crate) fn content() -> ContentSnapshot {
    let mut quake = ability("quake", AbilityKind::Psynergy, 4, 8, TargetKind::AllEnemies);
    quake.element = Some(Element::Venus);
    quake.cooldown = 2;

    let mut stun = ability("stun-strike", AbilityKind::Physical, 1, 2, TargetKind::SingleEnemy);
    stun.status = Some(StatusApplication {
        effect: StatusEffect::Stun { turns: 1 },
        chance: 100,
    });

    let mut grant = ArrayVec::new();
    grant.push(AbilityId::new("ragnarok"));

    ContentSnapshot::new()
        .with_ability(ability("slash", AbilityKind::Physical, 0, 5, TargetKind::SingleEnemy))
        .with_ability(ability("bite", AbilityKind::Physical, 0, 3, TargetKind::SingleEnemy))
        .with_ability(ability("cure", AbilityKind::Healing, 2, 10, TargetKind::SingleAlly))
        .with_ability(ability("ragnarok", AbilityKind::Physical, 3, 20, TargetKind::SingleEnemy))
        .with_ability(quake)
        .with_ability(stun)
        .with_unit(UnitDefinition {
            id: UnitId::new("isaac"),
            name: "Isaac".into(),
            element: Element::Venus,
            role: UnitRole::Dps,
            base_stats: Stats::new(30, 10, 12, 8, 6, 10),
            growth_rates: GrowthRates {
                hp: 5,
                pp: 2,
                atk: 2,
                def: 2,
                mag: 1,
                spd: 1,
            },
            mana_contribution: 3,
            abilities: vec![
                UnitAbility {
                    ability: AbilityId::new("slash"),
                    unlock_level: 1,
                },
                UnitAbility {
                    ability: AbilityId::new("quake"),
                    unlock_level: 1,
                },
                UnitAbility {
                    ability: AbilityId::new("stun-strike"),
                    unlock_level: 1,
                },
            ],
        })
        .with_unit(UnitDefinition {
            id: UnitId::new("mia"),
            name: "Mia".into(),
            element: Element::Mercury,
            role: UnitRole::Healer,
            base_stats: Stats::new(24, 14, 6, 6, 12, 8),
            growth_rates: GrowthRates {
                hp: 4,
                pp: 3,
                atk: 1,
                def: 1,
                mag: 2,
                spd: 1,
            },
            mana_contribution: 4,
            abilities: vec![UnitAbility {
                ability: AbilityId::new("cure"),
                unlock_level: 1,
            }],
        })
        .with_enemy(Enemy {
            id: EnemyId::new("slime"),
            name: "Slime".into(),
            level: 2,
            element: Element::Mercury,
            stats: Stats::new(40, 0, 8, 4, 2, 5),
            abilities: vec![AbilityId::new("bite")],
            xp_reward: 20,
            gold_reward: 10,
            drops: vec![DropEntry {
                item: EquipmentId::new("leather-cap"),
                chance: 100,
            }],
        })
        .with_encounter(Encounter {
            id: EncounterId::new("slime-pair"),
            name: "Slime Pair".into(),
            enemies: vec![EnemyId::new("slime"), EnemyId::new("slime")],
        })
        .with_equipment(Equipment {
            id: EquipmentId::new("leather-cap"),
            name: "Leather Cap".into(),
            slot: EquipmentSlot::Helm,
            allowed_elements: Vec::new(),
            bonus: StatDelta {
                def: 2,
                ..StatDelta::ZERO
            },
            grants_ability: None,
            cost: 40,
        })
        .with_djinn(Djinn {
            id: DjinnId::new("flint"),
            name: "Flint".into(),
            element: Element::Venus,
            tier: 1,
            summon: SummonEffect::Damage { magnitude: 30 },
            set_bonus: StatDelta {
                atk: 3,
                ..StatDelta::ZERO
            },
            grants: vec![DjinnGrant {
                role: UnitRole::Dps,
                relation: ElementRelation::Same,
                abilities: grant,
            }],
        })
}

pub(crate) fn env(content: &ContentSnapshot) -> GameEnv<'_> {
    Env::with_all(content, &RNG).as_game_env()
}

pub(crate) fn party(content: &ContentSnapshot, level: u8) -> Team {
    let units = ["isaac", "mia"].map(|id| {
        let definition = &content.units[&UnitId::new(id)];
        Unit::from_definition(definition, level)
    });
    Team::new(units).expect("fixture party is valid")
}

pub(crate) fn battle(content: &ContentSnapshot, seed: u64) -> BattleState {
    let encounter = &content.encounters[&EncounterId::new("slime-pair")];
    BattleState::from_encounter(
        party(content, 1),
        encounter,
        &env(content),
        GameConfig::default().with_crit_chance(0),
        seed,
    )
    .expect("fixture battle is valid")
}
