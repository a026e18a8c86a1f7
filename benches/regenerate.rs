//! Benchmarks for full regeneration of weapons and robots

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use traveller_forge::construction::OptionValue;
use traveller_forge::gunsmith::domain::{LOADED_MAGAZINE_STAGE, RECEIVER_FEATURES_STAGE, RECEIVER_STAGE};
use traveller_forge::gunsmith::{Weapon, WeaponType};
use traveller_forge::robots::domain::{OPTIONS_STAGE, SKILLS_STAGE};
use traveller_forge::robots::{Robot, RobotType, SkillPackage};
use traveller_forge::skills::{SkillId, SkillKey};

fn assault_rifle() -> Weapon {
    let mut weapon = Weapon::with_sequence("Bench Rifle", 12, WeaponType::Conventional);
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
        .add_component_by_name(Some(&primary), LOADED_MAGAZINE_STAGE, "LoadedExtendedMagazine")
        .unwrap();
    weapon.add_sequence(WeaponType::Launcher, true);
    weapon
}

fn guard_robot() -> Robot {
    let mut robot = Robot::with_sequence("Bench Robot", 12, RobotType::Robot);
    let primary = robot.primary_sequence().unwrap();
    robot
        .add_component_by_name(Some(&primary), OPTIONS_STAGE, "ArmourPlating")
        .unwrap();
    let skills = robot.find_stage(Some(&primary), SKILLS_STAGE).unwrap();
    let recon = SkillPackage::new(SkillKey::new(SkillId::Recon), 1).unwrap();
    robot.add_component(skills, Box::new(recon), true).unwrap();
    robot
}

fn bench_regenerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("regenerate");

    let mut weapon = assault_rifle();
    group.bench_function("weapon", |b| {
        b.iter(|| {
            weapon.regenerate();
            black_box(weapon.total_cost())
        })
    });

    let mut robot = guard_robot();
    group.bench_function("robot", |b| {
        b.iter(|| {
            robot.regenerate();
            black_box(robot.total_cost())
        })
    });

    group.finish();
}

fn bench_alternatives(c: &mut Criterion) {
    let weapon = assault_rifle();
    let primary = weapon.primary_sequence().unwrap();
    let receiver = weapon.find_stage(Some(&primary), RECEIVER_STAGE).unwrap();

    c.bench_function("receiver_alternatives", |b| {
        b.iter(|| black_box(weapon.find_compatible_components(receiver, Some(0)).len()))
    });
}

fn bench_reload(c: &mut Criterion) {
    let json = assault_rifle().to_json().unwrap();
    c.bench_function("weapon_from_json", |b| {
        b.iter(|| black_box(Weapon::from_json(black_box(&json)).unwrap()))
    });
}

criterion_group!(benches, bench_regenerate, bench_alternatives, bench_reload);
criterion_main!(benches);
