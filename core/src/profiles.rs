use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    Attribute, DamageType, EquipmentCategory, EquipmentSlot, ItemCategory, ItemKey, MapKey,
    MonsterKey, SkillKey, DEFAULT_MAP_DIMENSION, TICKS_PER_SECOND,
};

/// Region of the map monsters of a wave are scattered across.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnRegion {
    /// Half of the map opposite the player's starting edge.
    #[default]
    OppositeHalf,
    /// Anywhere inside the playable bounds.
    Anywhere,
}

/// Group of identical monsters spawned together.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MonsterSpawn {
    /// Archetype to spawn.
    pub monster: MonsterKey,
    /// Number of monsters in the group.
    pub count: u32,
    /// Offset added to the map level to obtain the monster level.
    #[serde(default)]
    pub level_modifier: i32,
}

impl MonsterSpawn {
    /// Creates a spawn group at the map's base level.
    #[must_use]
    pub const fn new(monster: MonsterKey, count: u32) -> Self {
        Self {
            monster,
            count,
            level_modifier: 0,
        }
    }

    /// Adjusts the level offset of the group.
    #[must_use]
    pub const fn with_level_modifier(mut self, level_modifier: i32) -> Self {
        self.level_modifier = level_modifier;
        self
    }
}

/// One wave within a map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveDefinition {
    /// One-based index of the wave.
    pub wave_number: u32,
    /// Monster groups spawned when the wave starts.
    pub spawns: Vec<MonsterSpawn>,
    /// Where the wave's monsters appear.
    #[serde(default)]
    pub region: SpawnRegion,
}

/// Read-only description of a battle location.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapProfile {
    /// Catalog key of the map.
    pub key: MapKey,
    /// Display name.
    pub name: String,
    /// Horizontal extent in map units; zero selects the default dimension.
    pub width: u32,
    /// Vertical extent in map units; zero selects the default dimension.
    pub height: u32,
    /// Lowest recommended map level.
    pub min_level: i32,
    /// Highest recommended map level.
    pub max_level: i32,
    /// Longest a battle may last before it is declared lost.
    pub max_battle_duration_secs: u32,
    /// Waves in the order they are fought.
    pub waves: Vec<WaveDefinition>,
}

impl MapProfile {
    /// Playable width, falling back to the default dimension when unset.
    #[must_use]
    pub fn effective_width(&self) -> u32 {
        non_zero_or_default(self.width)
    }

    /// Playable height, falling back to the default dimension when unset.
    #[must_use]
    pub fn effective_height(&self) -> u32 {
        non_zero_or_default(self.height)
    }

    /// Tick cap implied by the maximum battle duration.
    #[must_use]
    pub fn max_ticks(&self) -> u32 {
        self.max_battle_duration_secs
            .saturating_mul(TICKS_PER_SECOND)
    }

    /// Number of waves that must be cleared for victory.
    #[must_use]
    pub fn total_waves(&self) -> u32 {
        u32::try_from(self.waves.len()).unwrap_or(u32::MAX)
    }

    /// Looks up the wave with the provided one-based number.
    #[must_use]
    pub fn wave(&self, wave_number: u32) -> Option<&WaveDefinition> {
        self.waves
            .iter()
            .find(|wave| wave.wave_number == wave_number)
    }
}

fn non_zero_or_default(dimension: u32) -> u32 {
    if dimension == 0 {
        DEFAULT_MAP_DIMENSION
    } else {
        dimension
    }
}

/// Read-only description of a monster archetype.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterProfile {
    /// Catalog key of the monster.
    pub key: MonsterKey,
    /// Display name.
    pub name: String,
    /// Health at level zero.
    pub base_health: i32,
    /// Melee damage at level zero.
    pub base_damage: i32,
    /// Armor at level zero.
    pub base_armor: i32,
    /// Experience awarded at level zero.
    pub base_experience: i32,
    /// Element of the monster's attacks.
    #[serde(default)]
    pub damage_type: DamageType,
}

impl MonsterProfile {
    /// Maximum health at the provided level.
    #[must_use]
    pub const fn health_at(&self, level: i32) -> i32 {
        self.base_health.saturating_add(level.saturating_mul(10))
    }

    /// Melee damage at the provided level.
    #[must_use]
    pub const fn damage_at(&self, level: i32) -> i32 {
        self.base_damage.saturating_add(level.saturating_mul(2))
    }

    /// Armor at the provided level.
    #[must_use]
    pub const fn armor_at(&self, level: i32) -> i32 {
        self.base_armor.saturating_add(level / 2)
    }

    /// Experience awarded for a kill at the provided level.
    #[must_use]
    pub const fn experience_at(&self, level: i32) -> i32 {
        self.base_experience.saturating_add(level.saturating_mul(10))
    }
}

/// Read-only description of an active skill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    /// Catalog key of the skill.
    pub key: SkillKey,
    /// Display name.
    pub name: String,
    /// Damage at level zero. Negative values still land the minimum hit.
    pub base_damage: i32,
    /// Mana consumed per cast.
    pub mana_cost: i32,
    /// Ticks the skill stays unavailable after a cast.
    pub cooldown_ticks: u32,
    /// Maximum edge distance to the primary target.
    pub range: f64,
    /// Element of the skill's damage.
    #[serde(default)]
    pub damage_type: DamageType,
    /// Splash radius around the primary target for area skills.
    #[serde(default)]
    pub area_radius: Option<f64>,
}

/// Flat record describing an item definition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquipmentProfile {
    /// Catalog key of the item.
    pub key: ItemKey,
    /// Display name.
    pub name: String,
    /// Top-level classification.
    pub category: ItemCategory,
    /// Equipment sub-classification, absent for junk.
    #[serde(default)]
    pub equipment_category: Option<EquipmentCategory>,
    /// Slot the item occupies when worn.
    #[serde(default)]
    pub slot: Option<EquipmentSlot>,
    /// Minimum character level required to wear the item.
    #[serde(default)]
    pub required_level: i32,
    /// Gold received when selling the item.
    #[serde(default)]
    pub sell_value: u32,
    /// Attributes every instance starts with.
    #[serde(default)]
    pub base_attributes: BTreeMap<Attribute, i32>,
}

impl EquipmentProfile {
    /// Reports whether the item can be worn.
    #[must_use]
    pub fn is_equipment(&self) -> bool {
        self.category == ItemCategory::Equipment
    }
}

/// Read-only lookup over the static content catalog.
///
/// Enumerations return entries in registration order, which is stable for the
/// lifetime of the implementor.
pub trait ProfileLookup {
    /// Retrieves the map profile registered under `key`.
    fn map_profile(&self, key: MapKey) -> Option<&MapProfile>;

    /// Retrieves the monster profile registered under `key`.
    fn monster_profile(&self, key: MonsterKey) -> Option<&MonsterProfile>;

    /// Retrieves the skill profile registered under `key`.
    fn skill_profile(&self, key: SkillKey) -> Option<&SkillProfile>;

    /// Retrieves the item profile registered under `key`.
    fn equipment_profile(&self, key: ItemKey) -> Option<&EquipmentProfile>;

    /// Enumerates every registered map profile.
    fn map_profiles(&self) -> &[MapProfile];

    /// Enumerates every registered monster profile.
    fn monster_profiles(&self) -> &[MonsterProfile];

    /// Enumerates every registered skill profile.
    fn skill_profiles(&self) -> &[SkillProfile];

    /// Enumerates every registered item profile.
    fn equipment_profiles(&self) -> &[EquipmentProfile];
}
