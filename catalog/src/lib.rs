#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Immutable registry of map, monster, skill, and item definitions.
//!
//! The registry is assembled once from an explicit registration table, either
//! the built-in rows in [`builtin`] or a JSON [`CatalogDocument`], and is
//! read-only afterwards. Battles consume it through
//! [`idle_arena_core::ProfileLookup`] and may share a single instance across
//! threads.

pub mod builtin;

use std::collections::BTreeMap;

use idle_arena_core::{
    EquipmentProfile, ItemKey, MapKey, MapProfile, MonsterKey, MonsterProfile, ProfileLookup,
    SkillKey, SkillProfile,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Serializable registration table.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    /// Map rows in registration order.
    #[serde(default)]
    pub maps: Vec<MapProfile>,
    /// Monster rows in registration order.
    #[serde(default)]
    pub monsters: Vec<MonsterProfile>,
    /// Skill rows in registration order.
    #[serde(default)]
    pub skills: Vec<SkillProfile>,
    /// Item rows in registration order.
    #[serde(default)]
    pub equipment: Vec<EquipmentProfile>,
}

/// Errors raised while assembling a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Two map rows share a key.
    #[error("map `{0}` is registered more than once")]
    DuplicateMap(MapKey),
    /// Two monster rows share a key.
    #[error("monster `{0}` is registered more than once")]
    DuplicateMonster(MonsterKey),
    /// Two skill rows share a key.
    #[error("skill `{0}` is registered more than once")]
    DuplicateSkill(SkillKey),
    /// Two item rows share a key.
    #[error("item `{0:?}` is registered more than once")]
    DuplicateEquipment(ItemKey),
    /// A wave spawns a monster that has no row.
    #[error("map `{map}` wave {wave} spawns unregistered monster `{monster}`")]
    UnknownMonster {
        /// Map owning the wave.
        map: MapKey,
        /// Wave number referencing the monster.
        wave: u32,
        /// Monster that is missing.
        monster: MonsterKey,
    },
    /// The JSON document could not be read or written.
    #[error("malformed catalog document")]
    Json(#[from] serde_json::Error),
}

/// Builder collecting registration rows before validation.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    document: CatalogDocument,
}

impl RegistryBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a map row.
    #[must_use]
    pub fn with_map(mut self, profile: MapProfile) -> Self {
        self.document.maps.push(profile);
        self
    }

    /// Registers a monster row.
    #[must_use]
    pub fn with_monster(mut self, profile: MonsterProfile) -> Self {
        self.document.monsters.push(profile);
        self
    }

    /// Registers a skill row.
    #[must_use]
    pub fn with_skill(mut self, profile: SkillProfile) -> Self {
        self.document.skills.push(profile);
        self
    }

    /// Registers an item row.
    #[must_use]
    pub fn with_equipment(mut self, profile: EquipmentProfile) -> Self {
        self.document.equipment.push(profile);
        self
    }

    /// Validates the collected rows and freezes them into a registry.
    pub fn build(self) -> Result<ProfileRegistry, RegistryError> {
        ProfileRegistry::from_document(self.document)
    }
}

/// Immutable catalog shared by every battle.
#[derive(Clone, Debug)]
pub struct ProfileRegistry {
    maps: Vec<MapProfile>,
    monsters: Vec<MonsterProfile>,
    skills: Vec<SkillProfile>,
    equipment: Vec<EquipmentProfile>,
    map_index: BTreeMap<MapKey, usize>,
    monster_index: BTreeMap<MonsterKey, usize>,
    skill_index: BTreeMap<SkillKey, usize>,
    equipment_index: BTreeMap<ItemKey, usize>,
}

impl ProfileRegistry {
    /// Creates a builder for a custom registration table.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Builds the registry from the built-in registration table.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_document(builtin::document())
    }

    /// Validates a registration table and freezes it into a registry.
    pub fn from_document(document: CatalogDocument) -> Result<Self, RegistryError> {
        let CatalogDocument {
            maps,
            monsters,
            skills,
            equipment,
        } = document;

        let map_index = index_rows(&maps, |row| row.key, RegistryError::DuplicateMap)?;
        let monster_index =
            index_rows(&monsters, |row| row.key, RegistryError::DuplicateMonster)?;
        let skill_index = index_rows(&skills, |row| row.key, RegistryError::DuplicateSkill)?;
        let equipment_index =
            index_rows(&equipment, |row| row.key, RegistryError::DuplicateEquipment)?;

        for map in &maps {
            for wave in &map.waves {
                if let Some(spawn) = wave
                    .spawns
                    .iter()
                    .find(|spawn| !monster_index.contains_key(&spawn.monster))
                {
                    return Err(RegistryError::UnknownMonster {
                        map: map.key,
                        wave: wave.wave_number,
                        monster: spawn.monster,
                    });
                }
            }
        }

        log::debug!(
            "catalog registered {} maps, {} monsters, {} skills, {} items",
            maps.len(),
            monsters.len(),
            skills.len(),
            equipment.len()
        );

        Ok(Self {
            maps,
            monsters,
            skills,
            equipment,
            map_index,
            monster_index,
            skill_index,
            equipment_index,
        })
    }

    /// Parses a JSON registration table.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::from_document(document)
    }

    /// Copies the registration table back into document form.
    #[must_use]
    pub fn to_document(&self) -> CatalogDocument {
        CatalogDocument {
            maps: self.maps.clone(),
            monsters: self.monsters.clone(),
            skills: self.skills.clone(),
            equipment: self.equipment.clone(),
        }
    }

    /// Renders the registration table as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RegistryError> {
        Ok(serde_json::to_string_pretty(&self.to_document())?)
    }
}

fn index_rows<T, K>(
    rows: &[T],
    key: impl Fn(&T) -> K,
    duplicate: impl Fn(K) -> RegistryError,
) -> Result<BTreeMap<K, usize>, RegistryError>
where
    K: Copy + Ord,
{
    let mut index = BTreeMap::new();
    for (position, row) in rows.iter().enumerate() {
        let row_key = key(row);
        if index.insert(row_key, position).is_some() {
            return Err(duplicate(row_key));
        }
    }
    Ok(index)
}

impl ProfileLookup for ProfileRegistry {
    fn map_profile(&self, key: MapKey) -> Option<&MapProfile> {
        self.map_index.get(&key).map(|&index| &self.maps[index])
    }

    fn monster_profile(&self, key: MonsterKey) -> Option<&MonsterProfile> {
        self.monster_index
            .get(&key)
            .map(|&index| &self.monsters[index])
    }

    fn skill_profile(&self, key: SkillKey) -> Option<&SkillProfile> {
        self.skill_index.get(&key).map(|&index| &self.skills[index])
    }

    fn equipment_profile(&self, key: ItemKey) -> Option<&EquipmentProfile> {
        self.equipment_index
            .get(&key)
            .map(|&index| &self.equipment[index])
    }

    fn map_profiles(&self) -> &[MapProfile] {
        &self.maps
    }

    fn monster_profiles(&self) -> &[MonsterProfile] {
        &self.monsters
    }

    fn skill_profiles(&self) -> &[SkillProfile] {
        &self.skills
    }

    fn equipment_profiles(&self) -> &[EquipmentProfile] {
        &self.equipment
    }
}
