//! Integration tests for robot construction

use traveller_forge::construction::{ComponentQuery, OptionValue};
use traveller_forge::core::error::ForgeError;
use traveller_forge::robots::domain::{
    BRAIN_STAGE, CHASSIS_STAGE, LOCOMOTION_STAGE, MANIPULATORS_STAGE, OPTIONS_STAGE, SKILLS_STAGE,
};
use traveller_forge::robots::{
    Robot, RobotAttribute, RobotComponentKind, RobotRule, RobotType, SkillPackage,
};
use traveller_forge::skills::{SkillId, SkillKey};

fn robot() -> Robot {
    Robot::with_sequence("Test Robot", 12, RobotType::Robot)
}

fn add_skill(robot: &mut Robot, key: SkillKey, level: i64) -> Result<(), ForgeError> {
    let primary = robot.primary_sequence().unwrap();
    let stage = robot.find_stage(Some(&primary), SKILLS_STAGE).unwrap();
    robot.add_component(stage, Box::new(SkillPackage::new(key, level)?), true)
}

#[test]
fn test_default_robot() {
    let robot = robot();
    let primary = robot.primary_sequence().unwrap();

    assert!(!robot.is_incomplete());
    assert!(robot.has_component(ComponentQuery::Type("Size5Chassis"), Some(&primary)));
    assert!(robot.has_component(ComponentQuery::Type("WheelsLocomotion"), Some(&primary)));
    assert!(robot.has_component(ComponentQuery::Type("BasicBrain"), Some(&primary)));
    assert_eq!(robot.attribute_value(RobotAttribute::Slots, Some(&primary)), Some(12.0));
    assert_eq!(robot.attribute_value(RobotAttribute::Hits, Some(&primary)), Some(20.0));
    assert_eq!(robot.attribute_value(RobotAttribute::Bandwidth, Some(&primary)), Some(2.0));
    assert_eq!(robot.total_cost(), 5000.0);
    assert_eq!(robot.total_weight(), 60.0);
}

#[test]
fn test_drone_has_no_brain() {
    let drone = Robot::with_sequence("Drone", 12, RobotType::Drone);
    let primary = drone.primary_sequence().unwrap();

    assert!(drone.find_stage(Some(&primary), BRAIN_STAGE).is_none());
    assert!(!drone.has_attribute(RobotAttribute::Bandwidth, Some(&primary)));
    assert_eq!(drone.total_cost(), 1000.0);
}

#[test]
fn test_skill_packages_within_bandwidth() {
    let mut robot = robot();
    let primary = robot.primary_sequence().unwrap();
    let recon = SkillKey::new(SkillId::Recon);
    let slug = SkillKey::with_speciality(SkillId::GunCombat, "Slug").unwrap();

    add_skill(&mut robot, recon, 1).unwrap();
    add_skill(&mut robot, slug, 1).unwrap();
    assert_eq!(robot.skills(&primary), vec![(slug, 1), (recon, 1)]);
    assert_eq!(robot.attribute_value(RobotAttribute::BandwidthUsed, Some(&primary)), Some(2.0));
    assert_eq!(robot.total_cost(), 7000.0);

    // The basic brain's bandwidth is used up
    let stealth = SkillKey::new(SkillId::Stealth);
    let result = add_skill(&mut robot, stealth, 1);
    assert!(matches!(result, Err(ForgeError::Compatibility { .. })));
}

#[test]
fn test_duplicate_skill_rejected() {
    let mut robot = robot();
    let recon = SkillKey::new(SkillId::Recon);
    add_skill(&mut robot, recon, 0).unwrap();
    let result = add_skill(&mut robot, recon, 0);
    assert!(matches!(result, Err(ForgeError::Compatibility { .. })));
}

/// Levels above what the brain supports are clamped
#[test]
fn test_skill_level_capped_by_brain() {
    let mut robot = robot();
    let primary = robot.primary_sequence().unwrap();
    let recon = SkillKey::new(SkillId::Recon);
    add_skill(&mut robot, recon, 3).unwrap();
    assert_eq!(robot.skills(&primary), vec![(recon, 1)]);

    // A general skill with specialities never goes above 0
    let melee = SkillKey::new(SkillId::Melee);
    add_skill(&mut robot, melee, 1).unwrap();
    assert!(robot.skills(&primary).contains(&(melee, 0)));
}

#[test]
fn test_primitive_brain_limits_skills() {
    let mut robot = robot();
    let primary = robot.primary_sequence().unwrap();
    robot
        .add_component_by_name(Some(&primary), BRAIN_STAGE, "PrimitiveBrain")
        .unwrap();

    let result = add_skill(&mut robot, SkillKey::new(SkillId::Admin), 0);
    assert!(matches!(result, Err(ForgeError::Compatibility { .. })));
    add_skill(&mut robot, SkillKey::new(SkillId::Athletics), 0).unwrap();
}

/// Swapping to a smaller brain drops packages that no longer fit
#[test]
fn test_brain_swap_drops_packages() {
    let mut robot = robot();
    let primary = robot.primary_sequence().unwrap();
    add_skill(&mut robot, SkillKey::new(SkillId::Admin), 1).unwrap();
    robot
        .add_component_by_name(Some(&primary), BRAIN_STAGE, "PrimitiveBrain")
        .unwrap();
    assert!(robot.skills(&primary).is_empty());
}

#[test]
fn test_manipulator_size_follows_chassis() {
    let mut robot = robot();
    let primary = robot.primary_sequence().unwrap();
    let stage = robot
        .add_component_by_name(Some(&primary), MANIPULATORS_STAGE, "Manipulator")
        .unwrap();

    let arm = robot.stage(stage).component(0).unwrap();
    assert_eq!(arm.option("size").unwrap().value(), OptionValue::Int(5));
    assert_eq!(robot.attribute_value(RobotAttribute::Manipulators, Some(&primary)), Some(1.0));

    robot
        .add_component_by_name(Some(&primary), CHASSIS_STAGE, "Size3Chassis")
        .unwrap();
    let arm = robot.stage(stage).component(0).unwrap();
    assert_eq!(arm.option("size").unwrap().value(), OptionValue::Int(3));
}

#[test]
fn test_walker_loses_slots() {
    let mut robot = robot();
    let primary = robot.primary_sequence().unwrap();
    robot
        .add_component_by_name(Some(&primary), LOCOMOTION_STAGE, "WalkerLocomotion")
        .unwrap();
    assert_eq!(robot.attribute_value(RobotAttribute::Slots, Some(&primary)), Some(10.0));
    // Walker adds twice the chassis cost
    assert_eq!(robot.total_cost(), 7000.0);
}

#[test]
fn test_armour_stacks_and_power_pack() {
    let mut robot = robot();
    let primary = robot.primary_sequence().unwrap();
    robot
        .add_component_by_name(Some(&primary), OPTIONS_STAGE, "ArmourPlating")
        .unwrap();
    robot
        .add_component_by_name(Some(&primary), OPTIONS_STAGE, "ArmourPlating")
        .unwrap();
    robot
        .add_component_by_name(Some(&primary), OPTIONS_STAGE, "ExtraPowerPack")
        .unwrap();

    assert_eq!(robot.attribute_value(RobotAttribute::Armour, Some(&primary)), Some(4.0));
    assert_eq!(robot.attribute_value(RobotAttribute::SlotsUsed, Some(&primary)), Some(4.0));
    assert_eq!(robot.attribute_value(RobotAttribute::Endurance, Some(&primary)), Some(108.0));

    let result = robot.add_component_by_name(Some(&primary), OPTIONS_STAGE, "ExtraPowerPack");
    assert!(matches!(result, Err(ForgeError::Compatibility { .. })));
}

#[test]
fn test_slot_overrun() {
    let mut robot = Robot::with_sequence("Tiny", 12, RobotType::Drone);
    let primary = robot.primary_sequence().unwrap();
    robot
        .add_component_by_name(Some(&primary), CHASSIS_STAGE, "Size1Chassis")
        .unwrap();
    robot
        .add_component_by_name(Some(&primary), OPTIONS_STAGE, "ArmourPlating")
        .unwrap();
    robot
        .add_component_by_name(Some(&primary), OPTIONS_STAGE, "FireExtinguisher")
        .unwrap();

    let notes: Vec<&String> = robot.manifest().entries().flat_map(|entry| entry.notes.iter()).collect();
    assert!(notes.iter().any(|note| note.starts_with("Over capacity")));

    // Strict limits drop options until the rest fit
    robot.set_rule_enabled(RobotRule::StrictSlotLimits, true, true);
    let options = robot.find_components(RobotComponentKind::RobotOption, Some(&primary));
    assert_eq!(options.len(), 1);
    assert_eq!(robot.attribute_value(RobotAttribute::SlotsUsed, Some(&primary)), Some(1.0));
}
