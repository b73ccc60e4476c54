#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system that places the player and each wave.
//!
//! Every coordinate is drawn from the caller's battle stream, so identical
//! seeds always reproduce the same layout.

use idle_arena_core::{
    Command, MapProfile, MonsterBlueprint, MonsterSpawn, Position, ProfileLookup, SpawnRegion,
    DEFAULT_MONSTER_MOVE_SPEED,
};
use idle_arena_world::{query, World};
use rand::Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    monster_move_speed: f64,
}

impl Config {
    /// Creates a new configuration using the provided monster speed.
    #[must_use]
    pub const fn new(monster_move_speed: f64) -> Self {
        Self { monster_move_speed }
    }

    /// Distance each spawned monster covers per tick.
    #[must_use]
    pub const fn monster_move_speed(&self) -> f64 {
        self.monster_move_speed
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_MONSTER_MOVE_SPEED)
    }
}

/// Pure system that emits spawn commands for the requested wave.
#[derive(Debug, Default)]
pub struct WaveSpawning {
    config: Config,
}

impl WaveSpawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Draws the player's starting position near the left edge of the map.
    pub fn player_start<R: Rng + ?Sized>(&self, map: &MapProfile, rng: &mut R) -> Position {
        let height = f64::from(map.effective_height());
        let x = rng.gen::<f64>() * 3.0 + 1.0;
        let y = rng.gen::<f64>() * (height - 2.0) + 1.0;
        Position::new(x, y)
    }

    /// Replaces the current wave's monsters with those of `wave_number`.
    ///
    /// Emits [`Command::DespawnMonsters`] followed by one
    /// [`Command::SpawnMonster`] per monster and returns the number of
    /// monsters queued. Spawns naming a monster absent from the catalog are
    /// skipped.
    #[allow(clippy::too_many_arguments)]
    pub fn handle<R: Rng + ?Sized>(
        &mut self,
        world: &World,
        map: &MapProfile,
        wave_number: u32,
        map_level: i32,
        catalog: &dyn ProfileLookup,
        rng: &mut R,
        out: &mut Vec<Command>,
    ) -> u32 {
        out.push(Command::DespawnMonsters);

        let Some(wave) = map.wave(wave_number) else {
            log::debug!("{} has no definition for wave {wave_number}", map.key);
            return 0;
        };

        let mut spawned = 0;
        for spawn in &wave.spawns {
            let Some(profile) = catalog.monster_profile(spawn.monster) else {
                log::debug!("skipping unregistered monster {}", spawn.monster);
                continue;
            };

            let level = spawn_level(map_level, spawn);
            for _ in 0..spawn.count {
                let position = self.spawn_position(world, map, wave.region, rng);
                out.push(Command::SpawnMonster {
                    blueprint: MonsterBlueprint {
                        monster: profile.key,
                        name: profile.name.clone(),
                        level,
                        max_health: profile.health_at(level),
                        damage: profile.damage_at(level),
                        armor: profile.armor_at(level),
                        experience_value: profile.experience_at(level),
                        damage_type: profile.damage_type,
                        move_speed: self.config.monster_move_speed,
                        position,
                    },
                });
                spawned += 1;
            }
        }

        spawned
    }

    fn spawn_position<R: Rng + ?Sized>(
        &self,
        world: &World,
        map: &MapProfile,
        region: SpawnRegion,
        rng: &mut R,
    ) -> Position {
        match region {
            SpawnRegion::OppositeHalf => {
                let half = f64::from(map.effective_width() / 2);
                let height = f64::from(map.effective_height());
                let x = rng.gen::<f64>() * (half - 1.0) + half;
                let y = rng.gen::<f64>() * (height - 2.0) + 1.0;
                Position::new(x, y)
            }
            SpawnRegion::Anywhere => query::map(world).random_position(rng),
        }
    }
}

fn spawn_level(map_level: i32, spawn: &MonsterSpawn) -> i32 {
    map_level.saturating_add(spawn.level_modifier).max(0)
}

#[cfg(test)]
mod tests {
    use idle_arena_catalog::ProfileRegistry;
    use idle_arena_core::{Command, MapKey, MonsterKey, ProfileLookup};
    use idle_arena_world::World;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::{Config, WaveSpawning};

    fn spawn_wave(map: MapKey, wave: u32, map_level: i32, seed: u64) -> Vec<Command> {
        let registry = ProfileRegistry::builtin().expect("builtin catalog");
        let profile = registry.map_profile(map).expect("map registered").clone();
        let world = World::new();
        let mut spawning = WaveSpawning::new(Config::default());
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut out = Vec::new();
        let _ = spawning.handle(&world, &profile, wave, map_level, &registry, &mut rng, &mut out);
        out
    }

    #[test]
    fn wave_scales_monsters_from_map_level() {
        let commands = spawn_wave(MapKey::StarterVillage, 2, 4, 1);
        assert_eq!(commands.first(), Some(&Command::DespawnMonsters));

        let blueprints: Vec<_> = commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnMonster { blueprint } => Some(blueprint),
                _ => None,
            })
            .collect();
        assert_eq!(blueprints.len(), 3);
        for blueprint in blueprints {
            assert_eq!(blueprint.monster, MonsterKey::Skeleton);
            assert_eq!(blueprint.level, 4);
            assert_eq!(blueprint.max_health, 90);
            assert_eq!(blueprint.damage, 18);
            assert_eq!(blueprint.armor, 4);
            assert_eq!(blueprint.experience_value, 60);
        }
    }

    #[test]
    fn monsters_appear_on_the_far_half_of_the_map() {
        for seed in 0..32 {
            for command in spawn_wave(MapKey::DarkCave, 2, 5, seed) {
                if let Command::SpawnMonster { blueprint } = command {
                    let position = blueprint.position;
                    assert!((7.0..14.0).contains(&position.x()), "x = {}", position.x());
                    assert!((1.0..14.0).contains(&position.y()), "y = {}", position.y());
                }
            }
        }
    }

    #[test]
    fn level_modifier_is_added_per_group() {
        let commands = spawn_wave(MapKey::GoblinCamp, 2, 6, 3);
        let levels: Vec<_> = commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnMonster { blueprint } => Some(blueprint.level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![6, 6, 6, 8]);
    }

    #[test]
    fn identical_seeds_reproduce_layouts() {
        assert_eq!(
            spawn_wave(MapKey::UndeadCrypt, 3, 10, 99),
            spawn_wave(MapKey::UndeadCrypt, 3, 10, 99)
        );
    }

    #[test]
    fn missing_wave_only_clears_the_roster() {
        assert_eq!(
            spawn_wave(MapKey::StarterVillage, 9, 1, 0),
            vec![Command::DespawnMonsters]
        );
    }
}
