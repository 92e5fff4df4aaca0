//! Startup validation for content tables and tower floors.
//!
//! Schema checks produce [`ValidationIssue`]s and fail the load. Balance checks
//! produce [`BalanceWarning`]s, which are advisory only.

use std::collections::{BTreeMap, BTreeSet};

use vale_core::{
    AbilityId, ContentSnapshot, ErrorSeverity, GameConfig, GameError, Stats, TowerFloor, UnitId,
};

use crate::catalog::ContentCatalog;

/// Category of a schema problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum IssueKind {
    DuplicateId,
    DanglingReference,
    ManaCostTooHigh,
    EmptyAbilityList,
    DuplicateFloorNumber,
    PartySize,
    Malformed,
    ChecksumMismatch,
    UnsupportedVersion,
}

/// A single structured schema failure.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {path}: {message}")]
pub struct ValidationIssue {
    pub kind: IssueKind,
    /// Dotted location of the offending value, e.g. `encounters[2].enemies[0]`.
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(kind: IssueKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl GameError for ValidationIssue {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self.kind {
            IssueKind::DuplicateId => "CONTENT_DUPLICATE_ID",
            IssueKind::DanglingReference => "CONTENT_DANGLING_REFERENCE",
            IssueKind::ManaCostTooHigh => "CONTENT_MANA_COST_TOO_HIGH",
            IssueKind::EmptyAbilityList => "CONTENT_EMPTY_ABILITY_LIST",
            IssueKind::DuplicateFloorNumber => "CONTENT_DUPLICATE_FLOOR_NUMBER",
            IssueKind::PartySize => "CONTENT_PARTY_SIZE",
            IssueKind::Malformed => "SAVE_MALFORMED",
            IssueKind::ChecksumMismatch => "SAVE_CHECKSUM_MISMATCH",
            IssueKind::UnsupportedVersion => "SAVE_UNSUPPORTED_VERSION",
        }
    }
}

/// Advisory balance diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BalanceWarning {
    pub path: String,
    pub message: String,
}

/// Result of validating a content set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub warnings: Vec<BalanceWarning>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    fn issue(&mut self, kind: IssueKind, path: String, message: String) {
        self.issues.push(ValidationIssue::new(kind, path, message));
    }

    fn warn(&mut self, path: String, message: String) {
        tracing::warn!(path = %path, "{message}");
        self.warnings.push(BalanceWarning { path, message });
    }
}

/// Attack/defense ratio outside this band is flagged as unbalanced.
pub const ATK_DEF_RATIO_RANGE: (f64, f64) = (0.5, 3.0);

/// Runs every schema and balance check over the catalog and floor list.
pub fn validate(catalog: &ContentCatalog, floors: &[TowerFloor]) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_duplicates(&mut report, "abilities", catalog.abilities.iter().map(|a| a.id.as_str()));
    check_duplicates(&mut report, "units", catalog.units.iter().map(|u| u.id.as_str()));
    check_duplicates(&mut report, "enemies", catalog.enemies.iter().map(|e| e.id.as_str()));
    check_duplicates(&mut report, "equipment", catalog.equipment.iter().map(|e| e.id.as_str()));
    check_duplicates(&mut report, "djinn", catalog.djinn.iter().map(|d| d.id.as_str()));
    check_duplicates(
        &mut report,
        "encounters",
        catalog.encounters.iter().map(|e| e.id.as_str()),
    );

    check_abilities(&mut report, catalog);
    check_references(&mut report, catalog);
    check_floors(&mut report, catalog, floors);
    check_balance(&mut report, catalog);

    if !report.is_valid() {
        tracing::warn!(issues = report.issues.len(), "content validation failed");
    }
    report
}

/// Checks a chosen party against the size bounds and the unit table.
pub fn validate_party(content: &ContentSnapshot, party: &[UnitId]) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if !(GameConfig::MIN_PARTY_SIZE..=GameConfig::MAX_PARTY_SIZE).contains(&party.len()) {
        issues.push(ValidationIssue::new(
            IssueKind::PartySize,
            "party",
            format!(
                "party has {} units, expected {}..={}",
                party.len(),
                GameConfig::MIN_PARTY_SIZE,
                GameConfig::MAX_PARTY_SIZE
            ),
        ));
    }

    let mut seen = BTreeSet::new();
    for (i, id) in party.iter().enumerate() {
        if !content.units.contains_key(id) {
            issues.push(ValidationIssue::new(
                IssueKind::DanglingReference,
                format!("party[{i}]"),
                format!("unknown unit '{id}'"),
            ));
        }
        if !seen.insert(id) {
            issues.push(ValidationIssue::new(
                IssueKind::DuplicateId,
                format!("party[{i}]"),
                format!("unit '{id}' listed twice"),
            ));
        }
    }
    issues
}

fn check_duplicates<'a>(
    report: &mut ValidationReport,
    table: &str,
    ids: impl Iterator<Item = &'a str>,
) {
    let mut first_seen: BTreeMap<&str, usize> = BTreeMap::new();
    for (i, id) in ids.enumerate() {
        if let Some(first) = first_seen.get(id) {
            report.issue(
                IssueKind::DuplicateId,
                format!("{table}[{i}].id"),
                format!("'{id}' already defined at {table}[{first}]"),
            );
        } else {
            first_seen.insert(id, i);
        }
    }
}

fn check_abilities(report: &mut ValidationReport, catalog: &ContentCatalog) {
    for (i, ability) in catalog.abilities.iter().enumerate() {
        if ability.mana_cost > GameConfig::MAX_MANA_COST {
            report.issue(
                IssueKind::ManaCostTooHigh,
                format!("abilities[{i}].mana_cost"),
                format!(
                    "'{}' costs {}, maximum is {}",
                    ability.id,
                    ability.mana_cost,
                    GameConfig::MAX_MANA_COST
                ),
            );
        }
    }

    for (i, enemy) in catalog.enemies.iter().enumerate() {
        if enemy.abilities.is_empty() {
            report.issue(
                IssueKind::EmptyAbilityList,
                format!("enemies[{i}].abilities"),
                format!("enemy '{}' has no abilities", enemy.id),
            );
        }
    }
}

fn check_references(report: &mut ValidationReport, catalog: &ContentCatalog) {
    let abilities: BTreeSet<&AbilityId> = catalog.abilities.iter().map(|a| &a.id).collect();
    let enemies: BTreeSet<&str> = catalog.enemies.iter().map(|e| e.id.as_str()).collect();
    let equipment: BTreeSet<&str> = catalog.equipment.iter().map(|e| e.id.as_str()).collect();

    let missing_ability = |report: &mut ValidationReport, path: String, id: &AbilityId| {
        if !abilities.contains(id) {
            report.issue(
                IssueKind::DanglingReference,
                path,
                format!("unknown ability '{id}'"),
            );
        }
    };

    for (i, unit) in catalog.units.iter().enumerate() {
        for (j, entry) in unit.abilities.iter().enumerate() {
            missing_ability(report, format!("units[{i}].abilities[{j}]"), &entry.ability);
        }
    }
    for (i, enemy) in catalog.enemies.iter().enumerate() {
        for (j, id) in enemy.abilities.iter().enumerate() {
            missing_ability(report, format!("enemies[{i}].abilities[{j}]"), id);
        }
        for (j, drop) in enemy.drops.iter().enumerate() {
            if !equipment.contains(drop.item.as_str()) {
                report.issue(
                    IssueKind::DanglingReference,
                    format!("enemies[{i}].drops[{j}].item"),
                    format!("unknown equipment '{}'", drop.item),
                );
            }
        }
    }
    for (i, djinn) in catalog.djinn.iter().enumerate() {
        for (j, grant) in djinn.grants.iter().enumerate() {
            for (k, id) in grant.abilities.iter().enumerate() {
                missing_ability(report, format!("djinn[{i}].grants[{j}].abilities[{k}]"), id);
            }
        }
    }
    for (i, item) in catalog.equipment.iter().enumerate() {
        if let Some(id) = &item.grants_ability {
            missing_ability(report, format!("equipment[{i}].grants_ability"), id);
        }
    }
    for (i, encounter) in catalog.encounters.iter().enumerate() {
        for (j, id) in encounter.enemies.iter().enumerate() {
            if !enemies.contains(id.as_str()) {
                report.issue(
                    IssueKind::DanglingReference,
                    format!("encounters[{i}].enemies[{j}]"),
                    format!("unknown enemy '{id}'"),
                );
            }
        }
    }
}

fn check_floors(report: &mut ValidationReport, catalog: &ContentCatalog, floors: &[TowerFloor]) {
    let encounters: BTreeSet<&str> = catalog.encounters.iter().map(|e| e.id.as_str()).collect();
    check_duplicates(report, "floors", floors.iter().map(|f| f.id.as_str()));

    let mut numbers: BTreeMap<u32, usize> = BTreeMap::new();
    for (i, floor) in floors.iter().enumerate() {
        if let Some(first) = numbers.insert(floor.floor_number, i) {
            report.issue(
                IssueKind::DuplicateFloorNumber,
                format!("floors[{i}].floor_number"),
                format!(
                    "floor number {} already used by floors[{first}]",
                    floor.floor_number
                ),
            );
        }
        if let Some(encounter) = floor.encounter()
            && !encounters.contains(encounter.as_str())
        {
            report.issue(
                IssueKind::DanglingReference,
                format!("floors[{i}].kind.encounter"),
                format!("unknown encounter '{encounter}'"),
            );
        }
    }
}

fn check_balance(report: &mut ValidationReport, catalog: &ContentCatalog) {
    for (i, unit) in catalog.units.iter().enumerate() {
        check_ratio(report, format!("units[{i}].base_stats"), &unit.base_stats);
    }
    for (i, enemy) in catalog.enemies.iter().enumerate() {
        check_ratio(report, format!("enemies[{i}].stats"), &enemy.stats);
    }
    for (i, ability) in catalog.abilities.iter().enumerate() {
        if ability.mana_cost > 0 && ability.power == 0 && ability.status.is_none() {
            report.warn(
                format!("abilities[{i}]"),
                format!(
                    "'{}' costs {} mana but has no power or status",
                    ability.id, ability.mana_cost
                ),
            );
        }
    }
}

fn check_ratio(report: &mut ValidationReport, path: String, stats: &Stats) {
    let (low, high) = ATK_DEF_RATIO_RANGE;
    if stats.def == 0 {
        if stats.atk > 0 {
            report.warn(path, format!("atk {} against zero def", stats.atk));
        }
        return;
    }
    let ratio = f64::from(stats.atk) / f64::from(stats.def);
    if !(low..=high).contains(&ratio) {
        report.warn(
            path,
            format!("atk/def ratio {ratio:.2} outside {low}..={high}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use vale_core::{
        Ability, AbilityKind, Element, Encounter, EncounterId, Enemy, EnemyId, FloorId, FloorKind,
        GrowthRates, UnitDefinition, UnitRole, state::TargetKind, state::UnitAbility,
    };

    use super::*;

    fn ability(id: &str, mana_cost: u8, power: u32) -> Ability {
        Ability {
            id: AbilityId::new(id),
            name: id.to_owned(),
            kind: AbilityKind::Psynergy,
            element: None,
            mana_cost,
            power,
            target: TargetKind::SingleEnemy,
            unlock_level: 1,
            cooldown: 0,
            status: None,
        }
    }

    fn enemy(id: &str, abilities: &[&str]) -> Enemy {
        Enemy {
            id: EnemyId::new(id),
            name: id.to_owned(),
            level: 1,
            element: Element::Neutral,
            stats: Stats::new(30, 0, 8, 6, 4, 5),
            abilities: abilities.iter().map(|a| AbilityId::new(*a)).collect(),
            xp_reward: 5,
            gold_reward: 5,
            drops: Vec::new(),
        }
    }

    fn catalog() -> ContentCatalog {
        ContentCatalog {
            abilities: vec![ability("bolt", 2, 20)],
            units: vec![UnitDefinition {
                id: UnitId::new("isaac"),
                name: "Isaac".into(),
                element: Element::Venus,
                role: UnitRole::Dps,
                base_stats: Stats::new(40, 10, 10, 8, 6, 8),
                growth_rates: GrowthRates::ZERO,
                mana_contribution: 2,
                abilities: vec![UnitAbility {
                    ability: AbilityId::new("bolt"),
                    unlock_level: 1,
                }],
            }],
            enemies: vec![enemy("slime", &["bolt"])],
            encounters: vec![Encounter {
                id: EncounterId::new("slimes"),
                name: "Slimes".into(),
                enemies: vec![EnemyId::new("slime")],
            }],
            ..ContentCatalog::default()
        }
    }

    fn floor(number: u32, encounter: &str) -> TowerFloor {
        TowerFloor {
            id: FloorId::new(format!("floor-{number}")),
            floor_number: number,
            kind: FloorKind::Normal {
                encounter: EncounterId::new(encounter),
            },
            normalized_level: None,
        }
    }

    fn kinds(report: &ValidationReport) -> Vec<IssueKind> {
        report.issues.iter().map(|issue| issue.kind).collect()
    }

    #[test]
    fn clean_content_passes() {
        let report = validate(&catalog(), &[floor(1, "slimes")]);
        assert!(report.is_valid(), "{:?}", report.issues);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn duplicate_ids_are_reported_with_both_positions() {
        let mut catalog = catalog();
        catalog.enemies.push(enemy("slime", &["bolt"]));

        let report = validate(&catalog, &[]);
        assert_eq!(kinds(&report), vec![IssueKind::DuplicateId]);
        assert_eq!(report.issues[0].path, "enemies[1].id");
        assert!(report.issues[0].message.contains("enemies[0]"));
    }

    #[test]
    fn dangling_references_are_reported() {
        let mut catalog = catalog();
        catalog.encounters[0].enemies.push(EnemyId::new("ghost"));
        catalog.units[0].abilities.push(UnitAbility {
            ability: AbilityId::new("meteor"),
            unlock_level: 3,
        });

        let report = validate(&catalog, &[floor(1, "nowhere")]);
        let paths: Vec<&str> = report.issues.iter().map(|i| i.path.as_str()).collect();
        assert!(paths.contains(&"encounters[0].enemies[1]"));
        assert!(paths.contains(&"units[0].abilities[1]"));
        assert!(paths.contains(&"floors[0].kind.encounter"));
        assert!(report.issues.iter().all(|i| i.kind == IssueKind::DanglingReference));
    }

    #[test]
    fn mana_cost_and_empty_enemy_abilities() {
        let mut catalog = catalog();
        catalog.abilities.push(ability("apocalypse", 11, 999));
        catalog.enemies.push(enemy("statue", &[]));

        let report = validate(&catalog, &[]);
        assert_eq!(
            kinds(&report),
            vec![IssueKind::ManaCostTooHigh, IssueKind::EmptyAbilityList]
        );
        assert_eq!(report.issues[0].error_code(), "CONTENT_MANA_COST_TOO_HIGH");
        assert_eq!(report.issues[0].severity(), ErrorSeverity::Validation);
    }

    #[test]
    fn duplicate_floor_numbers() {
        let floors = [floor(1, "slimes"), floor(1, "slimes")];
        // same id and same number
        let report = validate(&catalog(), &floors);
        assert_eq!(
            kinds(&report),
            vec![IssueKind::DuplicateId, IssueKind::DuplicateFloorNumber]
        );
    }

    #[test]
    fn balance_warnings_do_not_fail_validation() {
        let mut catalog = catalog();
        catalog.abilities.push(ability("fizzle", 3, 0));
        catalog.enemies[0].stats = Stats::new(30, 0, 40, 5, 4, 5);

        let report = validate(&catalog, &[]);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0].path, "enemies[0].stats");
        assert_eq!(report.warnings[1].path, "abilities[1]");
    }

    #[test]
    fn party_bounds_and_unknown_members() {
        let catalog = catalog().into_snapshot();
        assert!(validate_party(&catalog, &[UnitId::new("isaac")]).is_empty());

        let issues = validate_party(&catalog, &[]);
        assert_eq!(issues[0].kind, IssueKind::PartySize);

        let issues = validate_party(&catalog, &[UnitId::new("isaac"), UnitId::new("garet")]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "party[1]");

        let five: Vec<UnitId> = (0..5).map(|_| UnitId::new("isaac")).collect();
        let issues = validate_party(&catalog, &five);
        assert_eq!(issues[0].kind, IssueKind::PartySize);
        assert_eq!(issues.len(), 5);
    }

    #[test]
    fn issue_display_includes_kind_and_path() {
        let issue = ValidationIssue::new(IssueKind::DanglingReference, "units[0]", "missing");
        assert_eq!(issue.to_string(), "dangling_reference at units[0]: missing");
    }
}
