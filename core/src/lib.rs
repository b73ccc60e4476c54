#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Idle Arena battle engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The battle simulation submits
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. Systems query immutable world state and respond
//! exclusively with new command batches.
//!
//! The static content catalog is consumed through [`ProfileLookup`], and a
//! battle is fully described by a [`BattleSeed`].

mod battle;
mod geometry;
mod keys;
mod profiles;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use battle::{
    BattleOutcome, BattleResult, BattleSeed, BattleState, CharacterSnapshot, FinishCause,
    ItemSnapshot, SkillSnapshot,
};
pub use geometry::{GridCoord, Position};
pub use keys::{
    Attribute, DamageType, EquipmentCategory, EquipmentSlot, ItemCategory, ItemKey,
    KeyParseError, MapKey, MonsterKey, SkillKey, SupportSkill,
};
pub use profiles::{
    EquipmentProfile, MapProfile, MonsterProfile, MonsterSpawn, ProfileLookup, SkillProfile,
    SpawnRegion, WaveDefinition,
};

/// Fixed simulation rate.
pub const TICKS_PER_SECOND: u32 = 30;

/// Radius shared by every actor, measured in map units.
pub const STANDARD_RADIUS: f64 = 0.5;

/// Edge distance below which two actors touch.
pub const COLLISION_THRESHOLD: f64 = STANDARD_RADIUS / 4.0;

/// Screen pixels covered by one map unit.
pub const PIXELS_PER_UNIT: f64 = 32.0;

/// Map extent used when a profile leaves a dimension unset.
pub const DEFAULT_MAP_DIMENSION: u32 = 20;

/// Distance the player covers per tick.
pub const DEFAULT_CHARACTER_MOVE_SPEED: f64 = 0.1;

/// Distance a monster covers per tick.
pub const DEFAULT_MONSTER_MOVE_SPEED: f64 = 0.08;

/// Mana the player regains per tick.
pub const DEFAULT_MANA_REGEN_PER_TICK: i32 = 1;

/// Lowest damage any hit can deal after armor.
pub const MINIMUM_DAMAGE: i32 = 1;

/// Unique identifier assigned to an actor within one battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(u32);

impl ActorId {
    /// Creates a new actor identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Fully resolved skill gem ready to be placed on a character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillLoadout {
    /// Stable identifier of the gem.
    pub id: Uuid,
    /// Catalog key of the skill.
    pub skill: SkillKey,
    /// Gem level.
    pub level: i32,
    /// Damage at level zero.
    pub base_damage: i32,
    /// Mana consumed per cast.
    pub mana_cost: i32,
    /// Ticks the skill stays unavailable after a cast.
    pub cooldown_ticks: u32,
    /// Maximum edge distance to the primary target.
    pub range: f64,
    /// Element of the skill's damage.
    pub damage_type: DamageType,
    /// Splash radius for area skills.
    pub area_radius: Option<f64>,
    /// Supports linked to the gem.
    pub linked_supports: Vec<SupportSkill>,
}

/// Fully resolved item ready to be worn by a character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentLoadout {
    /// Stable identifier of the item.
    pub id: Uuid,
    /// Catalog key of the item definition.
    pub item: ItemKey,
    /// Top-level classification.
    pub category: ItemCategory,
    /// Slot the item occupies.
    pub slot: Option<EquipmentSlot>,
    /// Level the item dropped at.
    pub item_level: i32,
    /// Attributes granted by the item.
    pub attributes: BTreeMap<Attribute, i32>,
}

/// Everything the world needs to place the player character.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterBlueprint {
    /// Stable identifier carried over from the snapshot.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Character level.
    pub level: i32,
    /// Experience toward the next level.
    pub experience: i32,
    /// Strength stat.
    pub strength: i32,
    /// Dexterity stat.
    pub dexterity: i32,
    /// Intelligence stat.
    pub intelligence: i32,
    /// Vitality stat.
    pub vitality: i32,
    /// Skill gems in priority order.
    pub skills: Vec<SkillLoadout>,
    /// Worn items.
    pub equipment: Vec<EquipmentLoadout>,
    /// Distance covered per tick.
    pub move_speed: f64,
    /// Starting location.
    pub position: Position,
}

/// Everything the world needs to place one monster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterBlueprint {
    /// Archetype of the monster.
    pub monster: MonsterKey,
    /// Display name.
    pub name: String,
    /// Monster level.
    pub level: i32,
    /// Health at spawn.
    pub max_health: i32,
    /// Melee damage per strike.
    pub damage: i32,
    /// Flat damage reduction.
    pub armor: i32,
    /// Experience awarded when slain.
    pub experience_value: i32,
    /// Element of the monster's attacks.
    pub damage_type: DamageType,
    /// Distance covered per tick.
    pub move_speed: f64,
    /// Starting location.
    pub position: Position,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the spatial map with an empty one of the given extent.
    ConfigureMap {
        /// Horizontal extent in map units.
        width: u32,
        /// Vertical extent in map units.
        height: u32,
    },
    /// Places the player character on the map.
    SpawnCharacter {
        /// Resolved character description.
        blueprint: Box<CharacterBlueprint>,
    },
    /// Places a monster on the map.
    SpawnMonster {
        /// Resolved monster description.
        blueprint: MonsterBlueprint,
    },
    /// Removes every monster of the current wave from the map.
    DespawnMonsters,
    /// Points an actor at another actor it should walk toward.
    AssignMoveTarget {
        /// Actor that moves.
        actor: ActorId,
        /// Actor to walk toward, or `None` to stand still.
        target: Option<ActorId>,
    },
    /// Advances every eligible actor one step toward its move target.
    AdvanceMovement,
    /// Recomputes collision flags from scratch.
    DetectCollisions,
    /// Resolves one cast of a character's skill.
    CastSkill {
        /// Character casting the skill.
        caster: ActorId,
        /// Index of the skill in the caster's skill list.
        slot: usize,
        /// Primary target of the cast.
        target: ActorId,
    },
    /// Resolves one melee strike.
    MeleeStrike {
        /// Actor landing the strike.
        attacker: ActorId,
        /// Actor receiving the strike.
        target: ActorId,
    },
    /// Ticks skill cooldowns down and regenerates mana.
    RecoverCooldowns {
        /// Character recovering.
        actor: ActorId,
        /// Mana regained this tick.
        mana_regen: i32,
    },
}

/// Events broadcast by the world and the battle simulation.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The player character was placed on the map.
    CharacterSpawned {
        /// Identifier assigned to the character.
        actor: ActorId,
        /// Starting location.
        position: Position,
    },
    /// A monster was placed on the map.
    MonsterSpawned {
        /// Identifier assigned to the monster.
        actor: ActorId,
        /// Archetype of the monster.
        monster: MonsterKey,
        /// Level of the monster.
        level: i32,
        /// Starting location.
        position: Position,
    },
    /// A new wave started.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Monsters spawned for the wave.
        monsters: u32,
    },
    /// Two actors were found touching.
    CollisionDetected {
        /// Actor with the lower identifier.
        first: ActorId,
        /// Actor with the higher identifier.
        second: ActorId,
    },
    /// A character cast a skill.
    SkillCast {
        /// Character that cast the skill.
        caster: ActorId,
        /// Skill that was cast.
        skill: SkillKey,
        /// Primary target of the cast.
        target: ActorId,
        /// Mana deducted for the cast.
        mana_spent: i32,
    },
    /// An actor lost health.
    DamageApplied {
        /// Actor that dealt the damage.
        source: ActorId,
        /// Actor that received the damage.
        target: ActorId,
        /// Health removed after armor.
        amount: i32,
        /// Health left after the hit.
        remaining_health: i32,
    },
    /// An actor's health reached zero.
    ActorDefeated {
        /// Actor that fell.
        actor: ActorId,
        /// Experience awarded for the kill; zero for the player.
        experience_value: i32,
    },
    /// The battle reached a terminal state.
    BattleFinished {
        /// Verdict of the battle.
        outcome: BattleOutcome,
        /// Reason the battle ended.
        cause: FinishCause,
        /// Tick on which the battle finished.
        tick: u32,
    },
}
