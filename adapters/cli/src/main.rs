#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs and replays Idle Arena battles.

mod watch;

use std::{fs, path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use idle_arena_catalog::ProfileRegistry;
use idle_arena_core::{BattleSeed, CharacterSnapshot, MapKey, SkillKey, SkillSnapshot};
use idle_arena_playback::{PlaybackDriver, DEFAULT_TICKS_PER_SECOND};
use idle_arena_simulation::{BattleFactory, SimulationConfig, SimulationFactory};
use uuid::Uuid;

/// Deterministic idle battles from the command line.
#[derive(Debug, Parser)]
#[command(name = "idle-arena", version, about)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Runs one battle to completion and prints its result as JSON.
    Run(RunArgs),
    /// Prints the built-in catalog as JSON.
    Catalog,
}

#[derive(Debug, Args)]
struct RunArgs {
    /// Map to fight on.
    #[arg(long, default_value = "starter-village")]
    map: MapKey,
    /// Level monsters are scaled from.
    #[arg(long, default_value_t = 1)]
    map_level: i32,
    /// Difficulty tier recorded in the result.
    #[arg(long, default_value_t = 1)]
    difficulty: i32,
    /// Seed of the spawn and combat stream.
    #[arg(long, default_value_t = 12345, allow_negative_numbers = true)]
    battle_seed: i32,
    /// Seed of the loot stream.
    #[arg(long, default_value_t = 67890, allow_negative_numbers = true)]
    loot_seed: i32,
    /// Name of the hero.
    #[arg(long, default_value = "Hero")]
    name: String,
    /// Level of the hero.
    #[arg(long, default_value_t = 5)]
    level: i32,
    /// Strength of the hero.
    #[arg(long, default_value_t = 10)]
    strength: i32,
    /// Dexterity of the hero.
    #[arg(long, default_value_t = 10)]
    dexterity: i32,
    /// Intelligence of the hero.
    #[arg(long, default_value_t = 10)]
    intelligence: i32,
    /// Vitality of the hero.
    #[arg(long, default_value_t = 10)]
    vitality: i32,
    /// Skills in cast priority order.
    #[arg(
        long = "skill",
        value_delimiter = ',',
        default_values = ["fireball", "basic-attack"]
    )]
    skills: Vec<SkillKey>,
    /// Level shared by every skill gem.
    #[arg(long, default_value_t = 1)]
    skill_level: i32,
    /// Catalog JSON to use instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Overrides the map's tick cap.
    #[arg(long)]
    tick_cap: Option<u32>,
    /// Replays the finished battle, logging each tick.
    #[arg(long)]
    watch: bool,
    /// Replay rate used with `--watch`.
    #[arg(long, default_value_t = DEFAULT_TICKS_PER_SECOND)]
    tps: u32,
}

impl RunArgs {
    fn seed(&self) -> BattleSeed {
        let skills = self
            .skills
            .iter()
            .zip(1u128..)
            .map(|(skill, index)| SkillSnapshot {
                id: Uuid::from_u128(index),
                skill: *skill,
                level: self.skill_level,
                linked_supports: Vec::new(),
            })
            .collect();

        BattleSeed {
            battle_seed: self.battle_seed,
            loot_seed: self.loot_seed,
            player: CharacterSnapshot {
                id: Uuid::nil(),
                name: self.name.clone(),
                level: self.level,
                experience: 0,
                strength: self.strength,
                dexterity: self.dexterity,
                intelligence: self.intelligence,
                vitality: self.vitality,
                skills,
                equipment: Vec::new(),
            },
            map: self.map,
            difficulty: self.difficulty,
            map_level: self.map_level,
        }
    }

    fn config(&self) -> SimulationConfig {
        match self.tick_cap {
            Some(cap) => SimulationConfig::default().with_tick_cap(cap),
            None => SimulationConfig::default(),
        }
    }
}

/// Entry point for the Idle Arena command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        CliCommand::Run(args) => run(&args),
        CliCommand::Catalog => {
            let registry = ProfileRegistry::builtin().context("built-in catalog is invalid")?;
            println!("{}", registry.to_json()?);
            Ok(())
        }
    }
}

fn run(args: &RunArgs) -> Result<()> {
    let registry = load_catalog(args.catalog.as_ref())?;
    let factory = SimulationFactory::new(Arc::new(registry), args.config());

    let mut battle = factory
        .create_battle(args.seed())
        .context("failed to start the battle")?;
    let result = battle.run_to_completion();

    if args.watch {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .context("failed to start the playback runtime")?;
        let driver = PlaybackDriver::new(factory).with_ticks_per_second(args.tps);
        let mut observer = watch::TickLogger::default();
        let _ = runtime
            .block_on(driver.play(&result, &mut observer))
            .context("failed to replay the battle")?;
    }

    println!(
        "{}",
        serde_json::to_string_pretty(&result).context("failed to encode the battle result")?
    );
    Ok(())
}

fn load_catalog(path: Option<&PathBuf>) -> Result<ProfileRegistry> {
    let Some(path) = path else {
        return ProfileRegistry::builtin().context("built-in catalog is invalid");
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    ProfileRegistry::from_json(&json)
        .with_context(|| format!("failed to load catalog {}", path.display()))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use idle_arena_core::{MapKey, SkillKey};

    use super::{Cli, CliCommand};

    #[test]
    fn run_flags_build_the_requested_seed() {
        let cli = Cli::try_parse_from([
            "idle-arena",
            "run",
            "--map",
            "dark-cave",
            "--map-level",
            "6",
            "--battle-seed",
            "-42",
            "--skill",
            "ice-arrow,basic-attack",
            "--tick-cap",
            "90",
        ])
        .expect("valid flags");

        let CliCommand::Run(args) = cli.command else {
            panic!("expected the run subcommand");
        };
        let seed = args.seed();
        assert_eq!(seed.map, MapKey::DarkCave);
        assert_eq!(seed.map_level, 6);
        assert_eq!(seed.battle_seed, -42);
        assert_eq!(seed.loot_seed, 67890);
        let skills: Vec<_> = seed.player.skills.iter().map(|gem| gem.skill).collect();
        assert_eq!(skills, vec![SkillKey::IceArrow, SkillKey::BasicAttack]);
        assert_eq!(args.config().tick_cap(), Some(90));
    }

    #[test]
    fn default_skills_lead_with_fireball() {
        let cli = Cli::try_parse_from(["idle-arena", "run"]).expect("valid flags");
        let CliCommand::Run(args) = cli.command else {
            panic!("expected the run subcommand");
        };
        assert_eq!(args.skills, vec![SkillKey::Fireball, SkillKey::BasicAttack]);
        assert_eq!(args.map, MapKey::StarterVillage);
    }

    #[test]
    fn unknown_maps_are_rejected() {
        assert!(Cli::try_parse_from(["idle-arena", "run", "--map", "moon-base"]).is_err());
    }
}
