//! Property tests for the regenerate algorithm
//!
//! Random edit sequences are applied to a weapon and a robot; whatever
//! survives must be a fixpoint of regenerate, and speculative queries must
//! leave the construction untouched.

use proptest::prelude::*;
use traveller_forge::construction::{
    AttributeGroup, Construction, ConstructionDomain, RecordedStep, StageId,
};
use traveller_forge::gunsmith::{Gunsmith, Weapon, WeaponType};
use traveller_forge::robots::{Robot, RobotType, Robotics};

/// Every stage of every sequence plus the common stages
fn all_stages<D: ConstructionDomain>(construction: &Construction<D>) -> Vec<StageId> {
    let mut stages: Vec<StageId> = construction
        .sequences()
        .iter()
        .flat_map(|id| construction.stage_ids(Some(id)))
        .collect();
    stages.extend(construction.stage_ids(None));
    stages
}

/// Apply `(stage, type)` picks, ignoring rejected edits
fn apply_edits<D: ConstructionDomain>(construction: &mut Construction<D>, edits: &[(usize, usize)]) {
    let types: Vec<&'static str> = D::registry().iter().map(|factory| factory.type_name).collect();
    for &(stage_pick, type_pick) in edits {
        let stages = all_stages(construction);
        let stage = stages[stage_pick % stages.len()];
        let Ok(component) = D::registry().create(types[type_pick % types.len()]) else {
            continue;
        };
        let _ = construction.add_component(stage, component, true);
    }
}

/// Steps and attributes of every sequence, in sequence order
fn snapshot<D: ConstructionDomain>(
    construction: &Construction<D>,
) -> Vec<(Vec<RecordedStep<D>>, AttributeGroup<D::Attribute>)> {
    construction
        .sequences()
        .iter()
        .map(|id| {
            let state = construction.sequence(id);
            (state.steps().to_vec(), state.attributes().clone())
        })
        .collect()
}

fn weapon_type() -> impl Strategy<Value = WeaponType> {
    prop_oneof![Just(WeaponType::Conventional), Just(WeaponType::Launcher)]
}

fn edits() -> impl Strategy<Value = Vec<(usize, usize)>> {
    prop::collection::vec((0usize..64, 0usize..256), 0..10)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// A second regenerate changes nothing
    #[test]
    fn prop_weapon_regenerate_idempotent(
        tl in 5u32..=15,
        primary in weapon_type(),
        secondary in proptest::option::of(weapon_type()),
        edits in edits(),
    ) {
        let mut weapon = Weapon::with_sequence("Prop", tl, primary);
        if let Some(kind) = secondary {
            weapon.add_sequence(kind, true);
        }
        apply_edits(&mut weapon, &edits);

        let json = weapon.to_json().unwrap();
        let before = snapshot(&weapon);
        let manifest = weapon.manifest().clone();
        weapon.regenerate();
        prop_assert_eq!(weapon.to_json().unwrap(), json);
        prop_assert_eq!(snapshot(&weapon), before);
        prop_assert_eq!(weapon.manifest(), &manifest);
    }

    /// Compatibility queries run on a copy and leave the weapon as it was
    #[test]
    fn prop_speculative_checks_restore(tl in 5u32..=15, edits in edits()) {
        let mut weapon = Weapon::with_sequence("Prop", tl, WeaponType::Conventional);
        apply_edits(&mut weapon, &edits);
        let json = weapon.to_json().unwrap();
        let before = snapshot(&weapon);

        for stage in all_stages(&weapon) {
            let replacing = (!weapon.stage(stage).is_empty()).then_some(0);
            for candidate in weapon.find_compatible_components(stage, replacing) {
                weapon.is_component_compatible(stage, candidate.as_ref());
            }
        }
        prop_assert_eq!(weapon.to_json().unwrap(), json);
        prop_assert_eq!(snapshot(&weapon), before);
    }

    /// Saved state reloads to the same construction
    #[test]
    fn prop_weapon_reload_matches(tl in 5u32..=15, edits in edits()) {
        let mut weapon = Weapon::with_sequence("Prop", tl, WeaponType::Conventional);
        apply_edits(&mut weapon, &edits);
        let loaded = Weapon::from_json(&weapon.to_json().unwrap()).unwrap();
        prop_assert_eq!(loaded.to_json().unwrap(), weapon.to_json().unwrap());
        prop_assert_eq!(loaded.total_cost(), weapon.total_cost());
    }

    /// Slot and bandwidth budgets hold after any edits under strict limits
    #[test]
    fn prop_robot_budgets_hold(tl in 7u32..=16, drone in any::<bool>(), edits in edits()) {
        use traveller_forge::robots::{RobotAttribute, RobotRule};

        let kind = if drone { RobotType::Drone } else { RobotType::Robot };
        let mut robot = Robot::with_sequence("Prop", tl, kind)
            .with_rules([RobotRule::StrictSlotLimits]);
        apply_edits(&mut robot, &edits);
        let primary = robot.primary_sequence().unwrap();

        let slots = robot.attribute_value(RobotAttribute::Slots, Some(&primary)).unwrap_or(0.0);
        let used = robot.attribute_value(RobotAttribute::SlotsUsed, Some(&primary)).unwrap_or(0.0);
        prop_assert!(used <= slots, "{} of {} slots used", used, slots);

        let bandwidth = robot.attribute_value(RobotAttribute::Bandwidth, Some(&primary)).unwrap_or(0.0);
        let load = robot.attribute_value(RobotAttribute::BandwidthUsed, Some(&primary)).unwrap_or(0.0);
        prop_assert!(load <= bandwidth);
    }
}

#[test]
fn test_registries_are_populated() {
    assert!(Gunsmith::registry().contains("HandgunReceiver"));
    assert!(Gunsmith::registry().contains("LoadedFragGrenade"));
    assert!(Robotics::registry().contains("SkillPackage"));
    assert!(Robotics::registry().contains("Size1Chassis"));
}
