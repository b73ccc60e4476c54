use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Attribute, EquipmentSlot, ItemKey, MapKey, SkillKey, SupportSkill, TICKS_PER_SECOND};

/// Persisted state of one skill gem owned by a character.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillSnapshot {
    /// Stable identifier of the gem.
    pub id: Uuid,
    /// Catalog key of the skill.
    pub skill: SkillKey,
    /// Gem level.
    pub level: i32,
    /// Supports linked to the gem.
    #[serde(default)]
    pub linked_supports: Vec<SupportSkill>,
}

/// Persisted state of one item instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Stable identifier of the item.
    pub id: Uuid,
    /// Catalog key of the item definition.
    pub item: ItemKey,
    /// Level the item dropped at.
    pub item_level: i32,
    /// Slot the item is worn in, if any.
    #[serde(default)]
    pub equipped_slot: Option<EquipmentSlot>,
    /// Rolled attributes keyed by attribute.
    #[serde(default)]
    pub attributes: BTreeMap<Attribute, i32>,
}

/// Persisted state of the player character entering a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSnapshot {
    /// Stable identifier of the character.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Character level.
    pub level: i32,
    /// Experience accumulated toward the next level.
    #[serde(default)]
    pub experience: i32,
    /// Strength stat; half of it is added to skill damage.
    pub strength: i32,
    /// Dexterity stat.
    pub dexterity: i32,
    /// Intelligence stat; drives maximum mana.
    pub intelligence: i32,
    /// Vitality stat; drives maximum health.
    pub vitality: i32,
    /// Skill gems in priority order.
    #[serde(default)]
    pub skills: Vec<SkillSnapshot>,
    /// Worn items.
    #[serde(default)]
    pub equipment: Vec<ItemSnapshot>,
}

/// Complete reproducible input of a battle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleSeed {
    /// Seed of the stream driving spawns and combat.
    pub battle_seed: i32,
    /// Seed of the stream driving loot drops.
    pub loot_seed: i32,
    /// Character entering the battle.
    pub player: CharacterSnapshot,
    /// Location of the battle.
    pub map: MapKey,
    /// Difficulty tier selected by the caller.
    pub difficulty: i32,
    /// Level monsters are scaled from.
    pub map_level: i32,
}

/// Outcome of a finished battle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BattleResult {
    /// Seed of the stream that drove spawns and combat.
    pub battle_seed: i32,
    /// Seed of the stream that drove loot drops.
    pub loot_seed: i32,
    /// Location of the battle.
    pub map: MapKey,
    /// Level monsters were scaled from.
    pub map_level: i32,
    /// Difficulty tier the battle was started with.
    pub difficulty: i32,
    /// Character as it entered the battle.
    pub player: CharacterSnapshot,
    /// Ticks simulated before the battle finished.
    pub total_ticks: u32,
    /// Whether every wave was cleared.
    pub is_victory: bool,
    /// Experience earned from kills.
    pub experience_gained: i32,
    /// Items rolled on victory, in drop order.
    pub items_dropped: Vec<ItemSnapshot>,
    /// Wall-clock instant the battle finished.
    pub completed_at: DateTime<Utc>,
}

impl BattleResult {
    /// In-game duration of the battle.
    #[must_use]
    pub fn duration_seconds(&self) -> f64 {
        f64::from(self.total_ticks) / f64::from(TICKS_PER_SECOND)
    }

    /// Rebuilds the seed that produced this result.
    #[must_use]
    pub fn to_seed(&self) -> BattleSeed {
        BattleSeed {
            battle_seed: self.battle_seed,
            loot_seed: self.loot_seed,
            player: self.player.clone(),
            map: self.map,
            difficulty: self.difficulty,
            map_level: self.map_level,
        }
    }
}

/// Terminal verdict of a battle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleOutcome {
    /// Every wave was cleared.
    Victory,
    /// The player died or the tick cap was reached.
    Defeat,
}

/// Lifecycle of a battle simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleState {
    /// The map and first wave are being constructed.
    Initializing,
    /// Ticks are being processed.
    Running,
    /// No further ticks will change the battle.
    Finished(BattleOutcome),
}

impl BattleState {
    /// Reports whether the battle reached a terminal state.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Finished(_))
    }

    /// Terminal verdict, if the battle finished.
    #[must_use]
    pub const fn outcome(&self) -> Option<BattleOutcome> {
        match self {
            Self::Finished(outcome) => Some(*outcome),
            _ => None,
        }
    }
}

/// Reason a battle transitioned to [`BattleState::Finished`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FinishCause {
    /// The player's health reached zero.
    PlayerDefeated,
    /// The final wave was cleared.
    WavesCleared,
    /// The tick cap elapsed before a natural finish.
    TickCapReached,
}
