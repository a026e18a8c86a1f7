//! Traveller Forge command line
//!
//! Builds weapons and robots from the command line, prints their manifest and
//! attributes, and saves or reloads them as JSON.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use traveller_forge::construction::{
    AttributeValue, Construction, ConstructionDomain, Manifest, ScalarValue,
};
use traveller_forge::core::config::{config, set_config, ForgeConfig};
use traveller_forge::core::error::{ForgeError, Result};
use traveller_forge::core::types::TechLevel;
use traveller_forge::gunsmith::{Weapon, WeaponAttribute, WeaponRule, WeaponType};
use traveller_forge::robots::domain::SKILLS_STAGE;
use traveller_forge::robots::{Robot, RobotRule, RobotType, SkillPackage};
use traveller_forge::skills::SkillKey;

#[derive(Parser, Debug)]
#[command(name = "traveller-forge")]
#[command(about = "Build Traveller weapons and robots")]
struct Cli {
    /// TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format: text or json
    #[arg(long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build a weapon
    Weapon {
        #[arg(long, default_value = "Weapon")]
        name: String,

        /// Conventional or launcher
        #[arg(long = "type", default_value = "conventional")]
        weapon_type: WeaponType,

        /// Tech level, defaults to the configured one
        #[arg(long)]
        tl: Option<TechLevel>,

        /// Extra weapon types fitted alongside the primary
        #[arg(long)]
        secondary: Vec<WeaponType>,

        /// Component to add to the primary weapon, as STAGE=COMPONENT
        #[arg(long, value_parser = parse_assignment)]
        add: Vec<(String, String)>,

        #[arg(long = "rule")]
        rules: Vec<WeaponRule>,

        /// Roll the primary weapon's damage
        #[arg(long)]
        roll: bool,

        /// Random seed for --roll
        #[arg(long)]
        seed: Option<u64>,

        /// Write the construction to a JSON file
        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Build a robot or drone
    Robot {
        #[arg(long, default_value = "Robot")]
        name: String,

        /// Robot or drone
        #[arg(long = "type", default_value = "robot")]
        robot_type: RobotType,

        #[arg(long)]
        tl: Option<TechLevel>,

        /// Component to add, as STAGE=COMPONENT
        #[arg(long, value_parser = parse_assignment)]
        add: Vec<(String, String)>,

        /// Skill package, as SKILL=LEVEL (`Gun Combat (Slug)=1`)
        #[arg(long, value_parser = parse_assignment)]
        skill: Vec<(String, String)>,

        #[arg(long = "rule")]
        rules: Vec<RobotRule>,

        #[arg(long)]
        save: Option<PathBuf>,
    },

    /// Print a saved construction
    Show {
        file: PathBuf,

        /// weapon or robot
        #[arg(long, default_value = "weapon")]
        kind: String,
    },

    /// List components that could go in a stage of a saved construction
    Alternatives {
        file: PathBuf,

        #[arg(long)]
        stage: String,

        /// Index of the component being replaced
        #[arg(long)]
        index: Option<usize>,

        #[arg(long, default_value = "weapon")]
        kind: String,
    },
}

fn parse_assignment(s: &str) -> std::result::Result<(String, String), String> {
    s.split_once('=')
        .map(|(left, right)| (left.trim().to_string(), right.trim().to_string()))
        .filter(|(left, right)| !left.is_empty() && !right.is_empty())
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ForgeError::Config(format!("unknown output format '{}'", s))),
        }
    }
}

/// JSON output structure
#[derive(Serialize)]
struct Report<'a> {
    name: &'a str,
    tech_level: TechLevel,
    incomplete: bool,
    total_cost: ScalarValue,
    total_weight: ScalarValue,
    sequences: Vec<BTreeMap<String, AttributeValue>>,
    manifest: &'a Manifest,
    #[serde(skip_serializing_if = "Option::is_none")]
    damage_roll: Option<i32>,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Some(path) = &cli.config {
        // Only fails if something read the config first, which nothing has yet
        let _ = set_config(ForgeConfig::load(path)?);
    }
    init_tracing(&config().log_filter);

    let format = OutputFormat::parse(&cli.format)?;
    match cli.command {
        Command::Weapon {
            name,
            weapon_type,
            tl,
            secondary,
            add,
            rules,
            roll,
            seed,
            save,
        } => {
            let tl = tl.unwrap_or(config().default_tech_level);
            let rules = config().weapon_rules.iter().copied().chain(rules);
            let mut weapon = Weapon::with_sequence(name, tl, weapon_type).with_rules(rules);
            for kind in secondary {
                weapon.add_sequence(kind, true);
            }
            apply_additions(&mut weapon, &add)?;

            let damage_roll = if roll { roll_damage(&weapon, seed) } else { None };
            if let Some(path) = save {
                save_construction(&weapon, &path)?;
            }
            report(&weapon, format, damage_roll)
        }
        Command::Robot {
            name,
            robot_type,
            tl,
            add,
            skill,
            rules,
            save,
        } => {
            let tl = tl.unwrap_or(config().default_tech_level);
            let rules = config().robot_rules.iter().copied().chain(rules);
            let mut robot = Robot::with_sequence(name, tl, robot_type).with_rules(rules);
            apply_additions(&mut robot, &add)?;
            add_skills(&mut robot, &skill)?;

            if let Some(path) = save {
                save_construction(&robot, &path)?;
            }
            report(&robot, format, None)
        }
        Command::Show { file, kind } => match kind.as_str() {
            "weapon" => report(&Weapon::load(&file)?, format, None),
            "robot" => report(&Robot::load(&file)?, format, None),
            other => Err(ForgeError::Config(format!("unknown construction kind '{}'", other))),
        },
        Command::Alternatives {
            file,
            stage,
            index,
            kind,
        } => match kind.as_str() {
            "weapon" => alternatives(&Weapon::load(&file)?, &stage, index, format),
            "robot" => alternatives(&Robot::load(&file)?, &stage, index, format),
            other => Err(ForgeError::Config(format!("unknown construction kind '{}'", other))),
        },
    }
}

fn init_tracing(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn apply_additions<D: ConstructionDomain>(
    construction: &mut Construction<D>,
    additions: &[(String, String)],
) -> Result<()> {
    let primary = construction.primary_sequence();
    for (stage, component) in additions {
        construction.add_component_by_name(primary.as_ref(), stage, component)?;
        tracing::info!("Added {} to {}", component, stage);
    }
    Ok(())
}

fn add_skills(robot: &mut Robot, skills: &[(String, String)]) -> Result<()> {
    if skills.is_empty() {
        return Ok(());
    }
    let primary = robot.primary_sequence();
    let stage = robot
        .find_stage(primary.as_ref(), SKILLS_STAGE)
        .ok_or_else(|| ForgeError::UnknownStage(SKILLS_STAGE.to_string()))?;
    for (label, level) in skills {
        let key = SkillKey::from_label(label)
            .ok_or_else(|| ForgeError::UnknownComponentType(label.clone()))?;
        let level: i64 = level.parse().map_err(|_| ForgeError::InvalidOptionValue {
            option: "level".to_string(),
            reason: format!("'{}' is not a number", level),
        })?;
        robot.add_component(stage, Box::new(SkillPackage::new(key, level)?), true)?;
    }
    Ok(())
}

fn roll_damage(weapon: &Weapon, seed: Option<u64>) -> Option<i32> {
    let primary = weapon.primary_sequence()?;
    let damage = weapon
        .attribute(WeaponAttribute::Damage, Some(&primary))
        .and_then(|value| value.as_dice())?;
    let seed = seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    tracing::debug!("Rolling {} with seed {}", damage, seed);
    Some(damage.roll(&mut rng))
}

fn save_construction<D: ConstructionDomain>(construction: &Construction<D>, path: &Path) -> Result<()> {
    construction.save(path)?;
    tracing::info!("Saved {} '{}' to {}", D::NAME, construction.name(), path.display());
    Ok(())
}

fn sequence_attributes<D: ConstructionDomain>(
    construction: &Construction<D>,
) -> Vec<BTreeMap<String, AttributeValue>> {
    construction
        .sequences()
        .iter()
        .map(|id| {
            construction
                .sequence(id)
                .attributes()
                .iter()
                .map(|(attribute, value)| (attribute.to_string(), value.clone()))
                .collect()
        })
        .collect()
}

fn report<D: ConstructionDomain>(
    construction: &Construction<D>,
    format: OutputFormat,
    damage_roll: Option<i32>,
) -> Result<()> {
    let manifest = construction.manifest();
    match format {
        OutputFormat::Json => {
            let report = Report {
                name: construction.name(),
                tech_level: construction.tech_level(),
                incomplete: construction.is_incomplete(),
                total_cost: manifest.total_cost(),
                total_weight: manifest.total_weight(),
                sequences: sequence_attributes(construction),
                manifest,
                damage_roll,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{} (TL{})", construction.name(), construction.tech_level());
            if construction.is_incomplete() {
                println!("  incomplete: a mandatory stage has no compatible component");
            }
            print!("{}", manifest);
            for (index, attributes) in sequence_attributes(construction).iter().enumerate() {
                println!("Sequence {}", index + 1);
                for (attribute, value) in attributes {
                    println!("  {}: {}", attribute, value);
                }
            }
            if let Some(roll) = damage_roll {
                println!("Damage roll: {}", roll);
            }
        }
    }
    Ok(())
}

fn alternatives<D: ConstructionDomain>(
    construction: &Construction<D>,
    stage: &str,
    index: Option<usize>,
    format: OutputFormat,
) -> Result<()> {
    let primary = construction.primary_sequence();
    let stage_id = construction
        .find_stage(primary.as_ref(), stage)
        .ok_or_else(|| ForgeError::UnknownStage(stage.to_string()))?;
    let names: Vec<String> = construction
        .find_compatible_components(stage_id, index)
        .iter()
        .map(|component| format!("{} ({})", component.instance_string(), component.type_name()))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Text => {
            for name in names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}
