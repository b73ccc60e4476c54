//! Static registration table backing [`ProfileRegistry::builtin`](crate::ProfileRegistry::builtin).

use std::collections::BTreeMap;

use idle_arena_core::{
    Attribute, DamageType, EquipmentCategory, EquipmentProfile, EquipmentSlot, ItemCategory,
    ItemKey, MapKey, MapProfile, MonsterKey, MonsterProfile, MonsterSpawn, SkillKey,
    SkillProfile, SpawnRegion, WaveDefinition,
};

use crate::CatalogDocument;

/// Assembles the built-in catalog document.
#[must_use]
pub fn document() -> CatalogDocument {
    CatalogDocument {
        maps: maps(),
        monsters: monsters(),
        skills: skills(),
        equipment: equipment(),
    }
}

fn maps() -> Vec<MapProfile> {
    vec![
        map(
            MapKey::StarterVillage,
            "Starter Village",
            (10, 10),
            (1, 5),
            120,
            vec![
                wave(1, vec![MonsterSpawn::new(MonsterKey::Skeleton, 2)]),
                wave(2, vec![MonsterSpawn::new(MonsterKey::Skeleton, 3)]),
            ],
        ),
        map(
            MapKey::DarkCave,
            "Dark Cave",
            (15, 15),
            (5, 10),
            180,
            vec![
                wave(1, vec![MonsterSpawn::new(MonsterKey::Zombie, 3)]),
                wave(2, vec![MonsterSpawn::new(MonsterKey::Spider, 4)]),
                wave(
                    3,
                    vec![
                        MonsterSpawn::new(MonsterKey::Zombie, 2),
                        MonsterSpawn::new(MonsterKey::Spider, 2),
                    ],
                ),
            ],
        ),
        map(
            MapKey::ForestPath,
            "Forest Path",
            (20, 20),
            (3, 8),
            150,
            vec![
                wave(1, vec![MonsterSpawn::new(MonsterKey::Wolf, 3)]),
                wave(
                    2,
                    vec![
                        MonsterSpawn::new(MonsterKey::Wolf, 2),
                        MonsterSpawn::new(MonsterKey::Goblin, 2),
                    ],
                ),
            ],
        ),
        map(
            MapKey::GoblinCamp,
            "Goblin Camp",
            (20, 20),
            (6, 12),
            180,
            vec![
                wave(1, vec![MonsterSpawn::new(MonsterKey::Goblin, 4)]),
                wave(
                    2,
                    vec![
                        MonsterSpawn::new(MonsterKey::Goblin, 3),
                        MonsterSpawn::new(MonsterKey::Goblin, 1).with_level_modifier(2),
                    ],
                ),
                wave(3, vec![MonsterSpawn::new(MonsterKey::Goblin, 5)]),
            ],
        ),
        map(
            MapKey::UndeadCrypt,
            "Undead Crypt",
            (15, 15),
            (10, 15),
            240,
            vec![
                wave(1, vec![MonsterSpawn::new(MonsterKey::Skeleton, 4)]),
                wave(2, vec![MonsterSpawn::new(MonsterKey::Zombie, 3)]),
                WaveDefinition {
                    wave_number: 3,
                    spawns: vec![
                        MonsterSpawn::new(MonsterKey::Skeleton, 2),
                        MonsterSpawn::new(MonsterKey::Zombie, 2),
                    ],
                    region: SpawnRegion::Anywhere,
                },
            ],
        ),
    ]
}

fn map(
    key: MapKey,
    name: &str,
    (width, height): (u32, u32),
    (min_level, max_level): (i32, i32),
    max_battle_duration_secs: u32,
    waves: Vec<WaveDefinition>,
) -> MapProfile {
    MapProfile {
        key,
        name: name.to_owned(),
        width,
        height,
        min_level,
        max_level,
        max_battle_duration_secs,
        waves,
    }
}

fn wave(wave_number: u32, spawns: Vec<MonsterSpawn>) -> WaveDefinition {
    WaveDefinition {
        wave_number,
        spawns,
        region: SpawnRegion::OppositeHalf,
    }
}

fn monsters() -> Vec<MonsterProfile> {
    vec![
        monster(MonsterKey::Skeleton, "Skeleton", [50, 10, 2, 20], DamageType::Physical),
        monster(MonsterKey::Zombie, "Zombie", [80, 15, 5, 30], DamageType::Physical),
        monster(MonsterKey::Goblin, "Goblin", [40, 12, 1, 25], DamageType::Physical),
        monster(MonsterKey::Wolf, "Wolf", [45, 14, 2, 22], DamageType::Physical),
        monster(MonsterKey::Spider, "Giant Spider", [35, 18, 1, 28], DamageType::Chaos),
    ]
}

fn monster(
    key: MonsterKey,
    name: &str,
    [base_health, base_damage, base_armor, base_experience]: [i32; 4],
    damage_type: DamageType,
) -> MonsterProfile {
    MonsterProfile {
        key,
        name: name.to_owned(),
        base_health,
        base_damage,
        base_armor,
        base_experience,
        damage_type,
    }
}

fn skills() -> Vec<SkillProfile> {
    vec![
        skill(SkillKey::BasicAttack, "Basic Attack", [10, 0], 1, 1.0, DamageType::Physical, None),
        skill(SkillKey::Fireball, "Fireball", [25, 15], 3, 5.0, DamageType::Fire, Some(2.0)),
        skill(SkillKey::IceArrow, "Ice Arrow", [20, 10], 2, 6.0, DamageType::Cold, None),
        skill(
            SkillKey::LightningBolt,
            "Lightning Bolt",
            [30, 20],
            4,
            7.0,
            DamageType::Lightning,
            None,
        ),
        skill(
            SkillKey::HealingTouch,
            "Healing Touch",
            [-30, 25],
            5,
            1.0,
            DamageType::Physical,
            None,
        ),
    ]
}

fn skill(
    key: SkillKey,
    name: &str,
    [base_damage, mana_cost]: [i32; 2],
    cooldown_ticks: u32,
    range: f64,
    damage_type: DamageType,
    area_radius: Option<f64>,
) -> SkillProfile {
    SkillProfile {
        key,
        name: name.to_owned(),
        base_damage,
        mana_cost,
        cooldown_ticks,
        range,
        damage_type,
        area_radius,
    }
}

fn equipment() -> Vec<EquipmentProfile> {
    use Attribute::{Armor, Dexterity, Intelligence, Strength, Vitality};
    use EquipmentCategory::{Accessory, Armor as ArmorPiece, Weapon};
    use EquipmentSlot as Slot;

    vec![
        gear(ItemKey::LongSword, "Long Sword", Weapon, Slot::MainHand, 10, &[(Strength, 5)]),
        gear(
            ItemKey::ShortSword,
            "Short Sword",
            Weapon,
            Slot::MainHand,
            8,
            &[(Dexterity, 3), (Strength, 2)],
        ),
        gear(ItemKey::Dagger, "Dagger", Weapon, Slot::MainHand, 7, &[(Dexterity, 5)]),
        gear(ItemKey::Staff, "Staff", Weapon, Slot::MainHand, 12, &[(Intelligence, 8)]),
        gear(ItemKey::Bow, "Bow", Weapon, Slot::MainHand, 10, &[(Dexterity, 6)]),
        gear(ItemKey::Shield, "Shield", ArmorPiece, Slot::OffHand, 8, &[(Armor, 10)]),
        gear(ItemKey::Helmet, "Helmet", ArmorPiece, Slot::Head, 6, &[(Armor, 5)]),
        gear(
            ItemKey::ChestArmor,
            "Chest Armor",
            ArmorPiece,
            Slot::Body,
            15,
            &[(Armor, 15), (Vitality, 3)],
        ),
        gear(
            ItemKey::Boots,
            "Boots",
            ArmorPiece,
            Slot::Feet,
            5,
            &[(Armor, 3), (Dexterity, 2)],
        ),
        gear(
            ItemKey::Gloves,
            "Gloves",
            ArmorPiece,
            Slot::Hands,
            4,
            &[(Armor, 2), (Strength, 1)],
        ),
        gear(ItemKey::Ring, "Ring", Accessory, Slot::Ring1, 20, &[(Intelligence, 2)]),
        gear(ItemKey::Amulet, "Amulet", Accessory, Slot::Amulet, 25, &[(Vitality, 3)]),
        gear(ItemKey::Belt, "Belt", Accessory, Slot::Belt, 10, &[(Vitality, 2)]),
        junk(ItemKey::BrokenSword, "Broken Sword", 2),
        junk(ItemKey::RustyHelmet, "Rusty Helmet", 1),
        junk(ItemKey::MonsterBone, "Monster Bone", 3),
    ]
}

fn gear(
    key: ItemKey,
    name: &str,
    equipment_category: EquipmentCategory,
    slot: EquipmentSlot,
    sell_value: u32,
    attributes: &[(Attribute, i32)],
) -> EquipmentProfile {
    EquipmentProfile {
        key,
        name: name.to_owned(),
        category: ItemCategory::Equipment,
        equipment_category: Some(equipment_category),
        slot: Some(slot),
        required_level: 1,
        sell_value,
        base_attributes: attributes.iter().copied().collect::<BTreeMap<_, _>>(),
    }
}

fn junk(key: ItemKey, name: &str, sell_value: u32) -> EquipmentProfile {
    EquipmentProfile {
        key,
        name: name.to_owned(),
        category: ItemCategory::Junk,
        equipment_category: None,
        slot: None,
        required_level: 1,
        sell_value,
        base_attributes: BTreeMap::new(),
    }
}
