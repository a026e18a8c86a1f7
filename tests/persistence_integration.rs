//! Saving and reloading constructions

use traveller_forge::construction::{ComponentQuery, OptionValue};
use traveller_forge::core::error::ForgeError;
use traveller_forge::gunsmith::domain::{LOADED_MAGAZINE_STAGE, RECEIVER_FEATURES_STAGE, RECEIVER_STAGE};
use traveller_forge::gunsmith::{Weapon, WeaponAttribute, WeaponRule, WeaponType};
use traveller_forge::robots::domain::SKILLS_STAGE;
use traveller_forge::robots::{Robot, RobotType, SkillPackage};
use traveller_forge::skills::{SkillId, SkillKey};

fn rifle() -> Weapon {
    let mut weapon = Weapon::with_sequence("Rifle", 12, WeaponType::Conventional)
        .with_rules([WeaponRule::QuickdrawWeightPenalty]);
    let primary = weapon.primary_sequence().unwrap();
    weapon
        .add_component_by_name(Some(&primary), RECEIVER_STAGE, "AssaultReceiver")
        .unwrap();
    let features = weapon
        .add_component_by_name(Some(&primary), RECEIVER_FEATURES_STAGE, "AutoFeature")
        .unwrap();
    weapon
        .set_component_option(features, 0, "level", OptionValue::Int(3), true)
        .unwrap();
    weapon
        .add_component_by_name(Some(&primary), LOADED_MAGAZINE_STAGE, "LoadedDrumMagazine")
        .unwrap();
    weapon.add_sequence(WeaponType::Launcher, true);
    weapon
}

#[test]
fn test_weapon_json_round_trip() {
    let weapon = rifle();
    let json = weapon.to_json().unwrap();
    let loaded = Weapon::from_json(&json).unwrap();

    assert_eq!(loaded.name(), "Rifle");
    assert_eq!(loaded.tech_level(), 12);
    assert!(loaded.is_rule_enabled(WeaponRule::QuickdrawWeightPenalty));
    assert_eq!(loaded.sequence_count(), 2);
    assert_eq!(loaded.total_cost(), weapon.total_cost());
    assert_eq!(loaded.total_weight(), weapon.total_weight());

    let primary = loaded.primary_sequence().unwrap();
    assert_eq!(loaded.attribute_value(WeaponAttribute::Auto, Some(&primary)), Some(3.0));
    assert!(loaded.has_component(ComponentQuery::Type("LoadedDrumMagazine"), Some(&primary)));
    assert_eq!(loaded.to_json().unwrap(), json);
}

#[test]
fn test_saved_data_lists_only_filled_stages() {
    let data = rifle().to_data();
    let primary = &data.sequences[0];
    assert_eq!(primary.kind, WeaponType::Conventional);
    assert!(primary.stages.iter().all(|stage| !stage.components.is_empty()));

    let features = primary
        .stages
        .iter()
        .find(|stage| stage.stage == RECEIVER_FEATURES_STAGE)
        .unwrap();
    assert_eq!(features.components[0].component, "AutoFeature");
    assert_eq!(features.components[0].options.get("level"), Some(&OptionValue::Int(3)));
}

#[test]
fn test_unknown_component_type_fails() {
    let json = rifle().to_json().unwrap().replace("AssaultReceiver", "PlasmaReceiver");
    let result = Weapon::from_json(&json);
    assert!(matches!(result, Err(ForgeError::UnknownComponentType(name)) if name == "PlasmaReceiver"));
}

#[test]
fn test_unknown_stage_fails() {
    let json = rifle().to_json().unwrap().replace("\"Receiver Features\"", "\"Turret\"");
    let result = Weapon::from_json(&json);
    assert!(matches!(result, Err(ForgeError::UnknownStage(_))));
}

#[test]
fn test_malformed_json_fails() {
    let result = Weapon::from_json("{ \"name\": ");
    assert!(matches!(result, Err(ForgeError::SerdeError(_))));
}

/// Components saved at a tech level they no longer meet are dropped on load
#[test]
fn test_load_drops_incompatible() {
    let mut data = rifle().to_data();
    data.tech_level = 5;
    let loaded = Weapon::from_data(&data).unwrap();
    let primary = loaded.primary_sequence().unwrap();
    assert!(!loaded.has_component(ComponentQuery::Type("AssaultReceiver"), Some(&primary)));
    assert!(!loaded.has_component(ComponentQuery::Type("AutoFeature"), Some(&primary)));
    assert!(!loaded.has_component(ComponentQuery::Type("LoadedDrumMagazine"), Some(&primary)));
    // No launcher receiver exists at TL5
    assert!(loaded.is_incomplete());
}

#[test]
fn test_robot_skill_round_trip() {
    let mut robot = Robot::with_sequence("Guard", 12, RobotType::Robot);
    let primary = robot.primary_sequence().unwrap();
    let stage = robot.find_stage(Some(&primary), SKILLS_STAGE).unwrap();
    let slug = SkillKey::with_speciality(SkillId::GunCombat, "Slug").unwrap();
    robot
        .add_component(stage, Box::new(SkillPackage::new(slug, 1).unwrap()), true)
        .unwrap();

    let loaded = Robot::from_json(&robot.to_json().unwrap()).unwrap();
    let primary = loaded.primary_sequence().unwrap();
    assert_eq!(loaded.skills(&primary), vec![(slug, 1)]);
    assert_eq!(loaded.total_cost(), robot.total_cost());
}

#[test]
fn test_save_and_load_file() {
    let weapon = rifle();
    let path = std::env::temp_dir().join(format!("forge-{}.json", uuid::Uuid::new_v4()));
    weapon.save(&path).unwrap();
    let loaded = Weapon::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(loaded.total_cost(), weapon.total_cost());
}
