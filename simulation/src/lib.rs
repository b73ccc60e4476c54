#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic tick engine that drives one battle from seed to verdict.
//!
//! A [`BattleSimulation`] owns the world, the pure systems, and the two
//! random streams derived from a [`BattleSeed`]. Each call to
//! [`BattleSimulation::tick`] runs targeting, movement, collision, the
//! player's action, monster strikes, the end check, and recovery, in that
//! order. Two simulations built from equal seeds and catalogs produce equal
//! event streams and equal [`BattleSimulation::state_digest`] values.

mod assembly;
mod config;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use idle_arena_core::{
    BattleOutcome, BattleResult, BattleSeed, BattleState, Command, Event, FinishCause,
    ItemSnapshot, MapKey, MapProfile, ProfileLookup,
};
use idle_arena_system_combat::Combat;
use idle_arena_system_loot::LootGeneration;
use idle_arena_system_targeting::Targeting;
use idle_arena_system_wave_spawning::{Config as SpawningConfig, WaveSpawning};
use idle_arena_world::{self as world, query, Actor, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use config::SimulationConfig;

/// Catalog handle shared by every battle built from the same registry.
pub type SharedCatalog = Arc<dyn ProfileLookup + Send + Sync>;

/// Failures that prevent a battle from being constructed.
#[derive(Debug, Error)]
pub enum BattleError {
    /// The seed names a map the catalog does not register.
    #[error("map profile `{0}` is not registered")]
    MapProfileMissing(MapKey),
}

/// Produces fresh battles from seeds.
pub trait BattleFactory {
    /// Builds a new simulation in the `Running` state.
    fn create_battle(&self, seed: BattleSeed) -> Result<BattleSimulation, BattleError>;
}

/// Factory that builds every battle against one shared catalog.
#[derive(Clone)]
pub struct SimulationFactory {
    catalog: SharedCatalog,
    config: SimulationConfig,
}

impl SimulationFactory {
    /// Creates a factory using the provided catalog and configuration.
    #[must_use]
    pub fn new(catalog: SharedCatalog, config: SimulationConfig) -> Self {
        Self { catalog, config }
    }

    /// Configuration applied to each battle.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

impl std::fmt::Debug for SimulationFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BattleFactory for SimulationFactory {
    fn create_battle(&self, seed: BattleSeed) -> Result<BattleSimulation, BattleError> {
        BattleSimulation::new(Arc::clone(&self.catalog), seed, self.config)
    }
}

/// One battle in progress.
pub struct BattleSimulation {
    catalog: SharedCatalog,
    seed: BattleSeed,
    config: SimulationConfig,
    map: MapProfile,
    world: World,
    battle_rng: ChaCha8Rng,
    loot_rng: ChaCha8Rng,
    targeting: Targeting,
    combat: Combat,
    spawning: WaveSpawning,
    loot: LootGeneration,
    commands: Vec<Command>,
    opening_events: Vec<Event>,
    state: BattleState,
    finish_cause: Option<FinishCause>,
    current_tick: u32,
    current_wave: u32,
    experience_gained: i32,
    items_dropped: Vec<ItemSnapshot>,
    completed_at: Option<DateTime<Utc>>,
}

impl BattleSimulation {
    /// Builds the world for `seed`, places the player, and spawns wave one.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::MapProfileMissing`] when the catalog has no row
    /// for the seed's map.
    pub fn new(
        catalog: SharedCatalog,
        seed: BattleSeed,
        config: SimulationConfig,
    ) -> Result<Self, BattleError> {
        let map = catalog
            .map_profile(seed.map)
            .cloned()
            .ok_or(BattleError::MapProfileMissing(seed.map))?;

        let mut simulation = Self {
            battle_rng: ChaCha8Rng::seed_from_u64(stream_seed(seed.battle_seed)),
            loot_rng: ChaCha8Rng::seed_from_u64(stream_seed(seed.loot_seed)),
            spawning: WaveSpawning::new(SpawningConfig::new(config.monster_move_speed())),
            catalog,
            seed,
            config,
            map,
            world: World::new(),
            targeting: Targeting::new(),
            combat: Combat::new(),
            loot: LootGeneration::new(),
            commands: Vec::new(),
            opening_events: Vec::new(),
            state: BattleState::Initializing,
            finish_cause: None,
            current_tick: 0,
            current_wave: 0,
            experience_gained: 0,
            items_dropped: Vec::new(),
            completed_at: None,
        };

        let mut events = Vec::new();
        simulation.initialize(&mut events);
        simulation.opening_events = events;
        simulation.state = BattleState::Running;

        log::info!(
            "battle started on {} at level {} with seeds {}/{}",
            simulation.seed.map,
            simulation.seed.map_level,
            simulation.seed.battle_seed,
            simulation.seed.loot_seed
        );
        Ok(simulation)
    }

    fn initialize(&mut self, out_events: &mut Vec<Event>) {
        world::apply(
            &mut self.world,
            Command::ConfigureMap {
                width: self.map.effective_width(),
                height: self.map.effective_height(),
            },
            out_events,
        );

        let position = self.spawning.player_start(&self.map, &mut self.battle_rng);
        let blueprint = assembly::character_blueprint(
            &self.seed.player,
            self.catalog.as_ref(),
            self.config.character_move_speed(),
            position,
        );
        world::apply(
            &mut self.world,
            Command::SpawnCharacter {
                blueprint: Box::new(blueprint),
            },
            out_events,
        );

        self.start_wave(1, out_events);
    }

    /// Advances the battle by one tick, appending what happened to `out_events`.
    ///
    /// Does nothing once the battle has finished.
    pub fn tick(&mut self, out_events: &mut Vec<Event>) {
        if self.state.is_finished() {
            return;
        }

        self.current_tick += 1;
        let first_event = out_events.len();

        self.targeting.handle(&self.world, &mut self.commands);
        self.commands.push(Command::AdvanceMovement);
        self.flush(out_events);

        world::apply(&mut self.world, Command::DetectCollisions, out_events);

        self.combat.player_action(&self.world, &mut self.commands);
        self.flush(out_events);

        self.combat.monster_action(&self.world, &mut self.commands);
        self.flush(out_events);

        self.experience_gained = out_events[first_event..]
            .iter()
            .filter_map(|event| match event {
                Event::ActorDefeated {
                    experience_value, ..
                } => Some(*experience_value),
                _ => None,
            })
            .fold(self.experience_gained, i32::saturating_add);

        self.check_end(out_events);

        if let Some(player) = query::player_id(&self.world) {
            world::apply(
                &mut self.world,
                Command::RecoverCooldowns {
                    actor: player,
                    mana_regen: self.config.mana_regen_per_tick(),
                },
                out_events,
            );
        }

        log::trace!(
            "tick {} produced {} events",
            self.current_tick,
            out_events.len() - first_event
        );
    }

    /// Ticks until the battle finishes or the default cap is reached.
    pub fn run_to_completion(&mut self) -> BattleResult {
        self.run_to_completion_with(self.max_ticks())
    }

    /// Ticks until the battle finishes or `max_ticks` ticks have elapsed.
    ///
    /// A battle still running at the cap is recorded as a defeat.
    pub fn run_to_completion_with(&mut self, max_ticks: u32) -> BattleResult {
        let mut events = Vec::new();
        while !self.state.is_finished() && self.current_tick < max_ticks {
            events.clear();
            self.tick(&mut events);
        }
        let _ = self.enforce_tick_cap(&mut events);
        self.build_result()
    }

    /// Forces a defeat when the battle is still running; returns whether it did.
    pub fn enforce_tick_cap(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.state.is_finished() {
            return false;
        }
        self.finish(BattleOutcome::Defeat, FinishCause::TickCapReached, out_events);
        true
    }

    /// Final record of the battle, once it has finished.
    #[must_use]
    pub fn result(&self) -> Option<BattleResult> {
        self.state.is_finished().then(|| self.build_result())
    }

    /// SHA-256 over the tick, wave, lifecycle state, and every actor's
    /// position, health, mana, and cooldowns.
    #[must_use]
    pub fn state_digest(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.current_tick.to_le_bytes());
        hasher.update(self.current_wave.to_le_bytes());
        hasher.update([state_tag(self.state)]);
        hasher.update(self.experience_gained.to_le_bytes());
        for actor in query::actors(&self.world).iter() {
            hash_actor(&mut hasher, actor);
        }

        let mut digest = [0; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }

    /// Lifecycle state of the battle.
    #[must_use]
    pub const fn state(&self) -> BattleState {
        self.state
    }

    /// Reason the battle ended, once finished.
    #[must_use]
    pub const fn finish_cause(&self) -> Option<FinishCause> {
        self.finish_cause
    }

    /// Ticks processed so far.
    #[must_use]
    pub const fn current_tick(&self) -> u32 {
        self.current_tick
    }

    /// One-based number of the wave in progress.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Number of waves defined by the map.
    #[must_use]
    pub fn total_waves(&self) -> u32 {
        self.map.total_waves()
    }

    /// Tick cap applied by [`Self::run_to_completion`].
    #[must_use]
    pub fn max_ticks(&self) -> u32 {
        self.config
            .tick_cap()
            .unwrap_or_else(|| self.map.max_ticks())
    }

    /// Experience earned from kills so far.
    #[must_use]
    pub const fn experience_gained(&self) -> i32 {
        self.experience_gained
    }

    /// Items rolled on victory.
    #[must_use]
    pub fn items_dropped(&self) -> &[ItemSnapshot] {
        &self.items_dropped
    }

    /// Seed the battle was built from.
    #[must_use]
    pub const fn seed(&self) -> &BattleSeed {
        &self.seed
    }

    /// Map the battle is fought on.
    #[must_use]
    pub const fn map(&self) -> &MapProfile {
        &self.map
    }

    /// Read-only view of the battle world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Events emitted while the player and the first wave were placed.
    #[must_use]
    pub fn opening_events(&self) -> &[Event] {
        &self.opening_events
    }

    fn flush(&mut self, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }

    fn start_wave(&mut self, wave: u32, out_events: &mut Vec<Event>) {
        self.current_wave = wave;
        self.commands.clear();
        let monsters = self.spawning.handle(
            &self.world,
            &self.map,
            wave,
            self.seed.map_level,
            self.catalog.as_ref(),
            &mut self.battle_rng,
            &mut self.commands,
        );
        self.flush(out_events);

        out_events.push(Event::WaveStarted { wave, monsters });
        log::info!(
            "wave {wave}/{} started with {monsters} monsters",
            self.map.total_waves()
        );
    }

    fn check_end(&mut self, out_events: &mut Vec<Event>) {
        let player_alive = query::player(&self.world).is_some_and(Actor::is_alive);
        if !player_alive {
            self.finish(BattleOutcome::Defeat, FinishCause::PlayerDefeated, out_events);
            return;
        }

        if !query::wave_cleared(&self.world) {
            return;
        }

        if self.current_wave < self.map.total_waves() {
            self.start_wave(self.current_wave + 1, out_events);
        } else {
            self.loot.roll(
                self.catalog.as_ref(),
                self.seed.player.level,
                &mut self.loot_rng,
                &mut self.items_dropped,
            );
            self.finish(BattleOutcome::Victory, FinishCause::WavesCleared, out_events);
        }
    }

    fn finish(&mut self, outcome: BattleOutcome, cause: FinishCause, out_events: &mut Vec<Event>) {
        self.state = BattleState::Finished(outcome);
        self.finish_cause = Some(cause);
        self.completed_at = Some(Utc::now());
        out_events.push(Event::BattleFinished {
            outcome,
            cause,
            tick: self.current_tick,
        });
        log::info!(
            "battle finished with {outcome:?} ({cause:?}) after {} ticks, {} experience, {} items",
            self.current_tick,
            self.experience_gained,
            self.items_dropped.len()
        );
    }

    fn build_result(&self) -> BattleResult {
        BattleResult {
            battle_seed: self.seed.battle_seed,
            loot_seed: self.seed.loot_seed,
            map: self.seed.map,
            map_level: self.seed.map_level,
            difficulty: self.seed.difficulty,
            player: self.seed.player.clone(),
            total_ticks: self.current_tick,
            is_victory: self.state.outcome() == Some(BattleOutcome::Victory),
            experience_gained: self.experience_gained,
            items_dropped: self.items_dropped.clone(),
            completed_at: self.completed_at.unwrap_or_else(Utc::now),
        }
    }
}

impl std::fmt::Debug for BattleSimulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleSimulation")
            .field("seed", &self.seed)
            .field("state", &self.state)
            .field("current_tick", &self.current_tick)
            .field("current_wave", &self.current_wave)
            .finish_non_exhaustive()
    }
}

/// Sign-extends a persisted seed into the stream's key space.
fn stream_seed(seed: i32) -> u64 {
    i64::from(seed) as u64
}

fn state_tag(state: BattleState) -> u8 {
    match state {
        BattleState::Initializing => 0,
        BattleState::Running => 1,
        BattleState::Finished(BattleOutcome::Victory) => 2,
        BattleState::Finished(BattleOutcome::Defeat) => 3,
    }
}

fn hash_actor(hasher: &mut Sha256, actor: &Actor) {
    hasher.update(actor.id().get().to_le_bytes());
    hasher.update(actor.position().x().to_bits().to_le_bytes());
    hasher.update(actor.position().y().to_bits().to_le_bytes());
    hasher.update(actor.health().to_le_bytes());
    hasher.update(actor.mana().to_le_bytes());
    if let Some(character) = actor.as_character() {
        for skill in character.skills() {
            hasher.update(skill.current_cooldown().to_le_bytes());
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use idle_arena_catalog::ProfileRegistry;
    use idle_arena_core::{
        BattleSeed, BattleState, CharacterSnapshot, FinishCause, MapKey, SkillKey, SkillSnapshot,
    };
    use idle_arena_world::query;
    use uuid::Uuid;

    use super::{stream_seed, BattleError, BattleSimulation, SimulationConfig};

    fn seed(map: MapKey) -> BattleSeed {
        BattleSeed {
            battle_seed: 12345,
            loot_seed: 67890,
            player: CharacterSnapshot {
                id: Uuid::from_u128(1),
                name: "Hero".to_owned(),
                level: 5,
                experience: 0,
                strength: 10,
                dexterity: 10,
                intelligence: 10,
                vitality: 10,
                skills: vec![SkillSnapshot {
                    id: Uuid::from_u128(2),
                    skill: SkillKey::BasicAttack,
                    level: 1,
                    linked_supports: Vec::new(),
                }],
                equipment: Vec::new(),
            },
            map,
            difficulty: 1,
            map_level: 1,
        }
    }

    #[test]
    fn missing_map_profile_is_rejected() {
        let catalog = ProfileRegistry::builder().build().expect("empty catalog");
        let error = BattleSimulation::new(
            Arc::new(catalog),
            seed(MapKey::StarterVillage),
            SimulationConfig::default(),
        )
        .expect_err("map is not registered");

        assert!(matches!(
            error,
            BattleError::MapProfileMissing(MapKey::StarterVillage)
        ));
    }

    #[test]
    fn construction_spawns_player_and_first_wave() {
        let catalog = ProfileRegistry::builtin().expect("builtin catalog");
        let battle = BattleSimulation::new(
            Arc::new(catalog),
            seed(MapKey::StarterVillage),
            SimulationConfig::default(),
        )
        .expect("battle");

        assert_eq!(battle.state(), BattleState::Running);
        assert_eq!(battle.current_tick(), 0);
        assert_eq!(battle.current_wave(), 1);
        assert_eq!(battle.total_waves(), 2);
        assert_eq!(query::wave_monsters(battle.world()).count(), 2);

        let player = query::player(battle.world()).expect("player spawned");
        assert_eq!(player.max_health(), 150);
        assert_eq!(player.max_mana(), 80);
        assert!((1.0..4.0).contains(&player.position().x()));
        assert!((1.0..9.0).contains(&player.position().y()));
    }

    #[test]
    fn run_finishes_and_freezes() {
        let catalog = ProfileRegistry::builtin().expect("builtin catalog");
        let mut battle = BattleSimulation::new(
            Arc::new(catalog),
            seed(MapKey::StarterVillage),
            SimulationConfig::default(),
        )
        .expect("battle");

        let result = battle.run_to_completion();
        assert!(battle.state().is_finished());
        assert!(result.total_ticks > 0);
        assert!(result.total_ticks <= battle.max_ticks());
        assert_eq!(result.is_victory, !result.items_dropped.is_empty());

        let digest = battle.state_digest();
        let mut events = Vec::new();
        battle.tick(&mut events);
        assert!(events.is_empty());
        assert_eq!(battle.current_tick(), result.total_ticks);
        assert_eq!(battle.state_digest(), digest);
    }

    #[test]
    fn tick_cap_forces_defeat() {
        let catalog = ProfileRegistry::builtin().expect("builtin catalog");
        let mut battle = BattleSimulation::new(
            Arc::new(catalog),
            seed(MapKey::UndeadCrypt),
            SimulationConfig::default(),
        )
        .expect("battle");

        let result = battle.run_to_completion_with(5);
        assert_eq!(result.total_ticks, 5);
        assert!(!result.is_victory);
        assert!(result.items_dropped.is_empty());
        assert_eq!(battle.finish_cause(), Some(FinishCause::TickCapReached));
    }

    #[test]
    fn huge_map_levels_build_and_finish() {
        let catalog = ProfileRegistry::builtin().expect("builtin catalog");
        let mut huge = seed(MapKey::StarterVillage);
        huge.map_level = i32::MAX / 5;
        let mut battle = BattleSimulation::new(Arc::new(catalog), huge, SimulationConfig::default())
            .expect("battle");

        let monster = query::wave_monsters(battle.world())
            .next()
            .expect("first wave spawned");
        assert_eq!(monster.max_health(), i32::MAX);

        let result = battle.run_to_completion_with(60);
        assert!(battle.state().is_finished());
        assert!(!result.is_victory);
    }

    #[test]
    fn negative_seeds_sign_extend() {
        assert_eq!(stream_seed(-1), u64::MAX);
        assert_eq!(stream_seed(7), 7);
    }
}
