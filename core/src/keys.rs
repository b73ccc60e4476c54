use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error raised when a textual catalog key does not name a known entry.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {kind} `{value}`")]
pub struct KeyParseError {
    kind: &'static str,
    value: String,
}

impl KeyParseError {
    /// Category of key that failed to parse, such as `map` or `skill`.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        self.kind
    }

    /// Text that failed to parse.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

fn parse_slug<T: Copy>(
    all: &[T],
    slug: fn(T) -> &'static str,
    kind: &'static str,
    value: &str,
) -> Result<T, KeyParseError> {
    let normalized = value.trim().to_ascii_lowercase().replace('_', "-");
    all.iter()
        .copied()
        .find(|candidate| slug(*candidate) == normalized)
        .ok_or_else(|| KeyParseError {
            kind,
            value: value.to_owned(),
        })
}

/// Identifies a battle location in the content catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MapKey {
    /// Beginner map close to town.
    StarterVillage,
    /// Damp cave inhabited by zombies and spiders.
    DarkCave,
    /// Wooded trail patrolled by wolves.
    ForestPath,
    /// Fortified goblin encampment.
    GoblinCamp,
    /// Burial vault overrun by the undead.
    UndeadCrypt,
}

impl MapKey {
    /// Every map key in declaration order.
    pub const ALL: [Self; 5] = [
        Self::StarterVillage,
        Self::DarkCave,
        Self::ForestPath,
        Self::GoblinCamp,
        Self::UndeadCrypt,
    ];

    /// Kebab-case name used on the command line and in logs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::StarterVillage => "starter-village",
            Self::DarkCave => "dark-cave",
            Self::ForestPath => "forest-path",
            Self::GoblinCamp => "goblin-camp",
            Self::UndeadCrypt => "undead-crypt",
        }
    }
}

/// Identifies a monster archetype in the content catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MonsterKey {
    /// Brittle undead warrior.
    Skeleton,
    /// Slow, durable undead.
    Zombie,
    /// Quick raider with light armor.
    Goblin,
    /// Pack hunter.
    Wolf,
    /// Venomous cave spider.
    Spider,
}

impl MonsterKey {
    /// Every monster key in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Skeleton,
        Self::Zombie,
        Self::Goblin,
        Self::Wolf,
        Self::Spider,
    ];

    /// Kebab-case name used on the command line and in logs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Skeleton => "skeleton",
            Self::Zombie => "zombie",
            Self::Goblin => "goblin",
            Self::Wolf => "wolf",
            Self::Spider => "spider",
        }
    }
}

/// Identifies an active skill in the content catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SkillKey {
    /// Free melee swing.
    BasicAttack,
    /// Exploding fire projectile.
    Fireball,
    /// Piercing cold projectile.
    IceArrow,
    /// Long-range lightning strike.
    LightningBolt,
    /// Restorative spell.
    HealingTouch,
}

impl SkillKey {
    /// Every skill key in declaration order.
    pub const ALL: [Self; 5] = [
        Self::BasicAttack,
        Self::Fireball,
        Self::IceArrow,
        Self::LightningBolt,
        Self::HealingTouch,
    ];

    /// Kebab-case name used on the command line and in logs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::BasicAttack => "basic-attack",
            Self::Fireball => "fireball",
            Self::IceArrow => "ice-arrow",
            Self::LightningBolt => "lightning-bolt",
            Self::HealingTouch => "healing-touch",
        }
    }
}

/// Support gems that can be linked to an active skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SupportSkill {
    /// Multiplies skill damage by a fixed percentage.
    IncreasedDamage,
    /// Reduces cast time.
    FasterCasting,
    /// Enlarges area effects.
    IncreasedArea,
    /// Fires additional projectiles.
    MultipleProjectiles,
    /// Returns a share of damage as life.
    LifeLeech,
}

impl SupportSkill {
    /// Every support in declaration order.
    pub const ALL: [Self; 5] = [
        Self::IncreasedDamage,
        Self::FasterCasting,
        Self::IncreasedArea,
        Self::MultipleProjectiles,
        Self::LifeLeech,
    ];

    /// Kebab-case name used on the command line and in logs.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::IncreasedDamage => "increased-damage",
            Self::FasterCasting => "faster-casting",
            Self::IncreasedArea => "increased-area",
            Self::MultipleProjectiles => "multiple-projectiles",
            Self::LifeLeech => "life-leech",
        }
    }
}

/// Identifies an item definition in the content catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum ItemKey {
    LongSword,
    ShortSword,
    Dagger,
    Staff,
    Bow,
    Shield,
    Helmet,
    ChestArmor,
    Boots,
    Gloves,
    Ring,
    Amulet,
    Belt,
    BrokenSword,
    RustyHelmet,
    MonsterBone,
}

/// Numeric attribute an item can grant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Attribute {
    Strength,
    Dexterity,
    Intelligence,
    Vitality,
    Health,
    Mana,
    Armor,
    FireResistance,
    ColdResistance,
    LightningResistance,
}

impl Attribute {
    /// Attributes eligible for random loot bonuses, in a stable order.
    pub const BONUS_POOL: [Self; 10] = [
        Self::Strength,
        Self::Dexterity,
        Self::Intelligence,
        Self::Vitality,
        Self::Health,
        Self::Mana,
        Self::Armor,
        Self::FireResistance,
        Self::ColdResistance,
        Self::LightningResistance,
    ];
}

/// Elemental tag carried by skills and monster attacks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum DamageType {
    #[default]
    Physical,
    Fire,
    Cold,
    Lightning,
    Chaos,
}

/// Body slot an equipment item occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum EquipmentSlot {
    MainHand,
    OffHand,
    Head,
    Body,
    Hands,
    Feet,
    Ring1,
    Ring2,
    Amulet,
    Belt,
}

/// Top-level item classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCategory {
    /// Wearable gear that grants attributes.
    Equipment,
    /// Vendor trash with no combat use.
    Junk,
}

/// Classification of equipment items.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum EquipmentCategory {
    Weapon,
    Armor,
    Accessory,
}

macro_rules! slug_conversions {
    ($($key:ty => $kind:literal),* $(,)?) => {
        $(
            impl fmt::Display for $key {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.slug())
                }
            }

            impl FromStr for $key {
                type Err = KeyParseError;

                fn from_str(value: &str) -> Result<Self, Self::Err> {
                    parse_slug(&Self::ALL, Self::slug, $kind, value)
                }
            }
        )*
    };
}

slug_conversions!(
    MapKey => "map",
    MonsterKey => "monster",
    SkillKey => "skill",
    SupportSkill => "support",
);
