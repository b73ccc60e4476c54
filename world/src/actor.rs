use std::collections::BTreeMap;

use idle_arena_core::{
    ActorId, Attribute, CharacterBlueprint, DamageType, EquipmentLoadout, EquipmentSlot,
    ItemCategory, ItemKey, MonsterBlueprint, MonsterKey, Position, SkillKey, SkillLoadout,
    SupportSkill, MINIMUM_DAMAGE, STANDARD_RADIUS,
};
use uuid::Uuid;

const SKILL_DAMAGE_PER_LEVEL: i32 = 5;
const INCREASED_DAMAGE_MULTIPLIER: f64 = 1.3;

/// Discriminates the two kinds of actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorKind {
    /// The player character.
    Character,
    /// A hostile monster.
    Monster,
}

/// Runtime state of a single participant in a battle.
#[derive(Clone, Debug)]
pub struct Actor {
    id: ActorId,
    level: i32,
    health: i32,
    max_health: i32,
    mana: i32,
    max_mana: i32,
    armor: i32,
    damage: i32,
    position: Position,
    radius: f64,
    move_speed: f64,
    move_target: Option<ActorId>,
    colliding: bool,
    role: Role,
}

#[derive(Clone, Debug)]
enum Role {
    Character(CharacterState),
    Monster(MonsterState),
}

impl Actor {
    pub(crate) fn character(id: ActorId, blueprint: CharacterBlueprint) -> Self {
        let equipment: Vec<EquipmentInstance> = blueprint
            .equipment
            .into_iter()
            .map(EquipmentInstance::from)
            .collect();
        let armor = equipment
            .iter()
            .map(|item| item.attribute(Attribute::Armor))
            .sum();
        let max_health = blueprint.vitality * 10 + 50;
        let max_mana = blueprint.intelligence * 5 + 30;

        Self {
            id,
            level: blueprint.level,
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            armor,
            damage: 0,
            position: blueprint.position,
            radius: STANDARD_RADIUS,
            move_speed: blueprint.move_speed,
            move_target: None,
            colliding: false,
            role: Role::Character(CharacterState {
                uuid: blueprint.id,
                name: blueprint.name,
                experience: blueprint.experience,
                strength: blueprint.strength,
                dexterity: blueprint.dexterity,
                intelligence: blueprint.intelligence,
                vitality: blueprint.vitality,
                skills: blueprint.skills.into_iter().map(SkillInstance::from).collect(),
                equipment,
            }),
        }
    }

    pub(crate) fn monster(id: ActorId, blueprint: MonsterBlueprint) -> Self {
        let max_health = blueprint.max_health.max(1);

        Self {
            id,
            level: blueprint.level,
            health: max_health,
            max_health,
            mana: 0,
            max_mana: 0,
            armor: blueprint.armor,
            damage: blueprint.damage,
            position: blueprint.position,
            radius: STANDARD_RADIUS,
            move_speed: blueprint.move_speed,
            move_target: None,
            colliding: false,
            role: Role::Monster(MonsterState {
                monster: blueprint.monster,
                name: blueprint.name,
                experience_value: blueprint.experience_value,
                damage_type: blueprint.damage_type,
            }),
        }
    }

    /// Identifier of the actor within its battle.
    #[must_use]
    pub const fn id(&self) -> ActorId {
        self.id
    }

    /// Kind of actor.
    #[must_use]
    pub const fn kind(&self) -> ActorKind {
        match self.role {
            Role::Character(_) => ActorKind::Character,
            Role::Monster(_) => ActorKind::Monster,
        }
    }

    /// Level of the actor.
    #[must_use]
    pub const fn level(&self) -> i32 {
        self.level
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Maximum health.
    #[must_use]
    pub const fn max_health(&self) -> i32 {
        self.max_health
    }

    /// Current mana.
    #[must_use]
    pub const fn mana(&self) -> i32 {
        self.mana
    }

    /// Maximum mana.
    #[must_use]
    pub const fn max_mana(&self) -> i32 {
        self.max_mana
    }

    /// Flat damage reduction applied to every incoming hit.
    #[must_use]
    pub const fn armor(&self) -> i32 {
        self.armor
    }

    /// Melee damage dealt per strike.
    #[must_use]
    pub const fn damage(&self) -> i32 {
        self.damage
    }

    /// Centre of the actor.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Radius of the actor's footprint.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Distance covered per tick.
    #[must_use]
    pub const fn move_speed(&self) -> f64 {
        self.move_speed
    }

    /// Actor this actor is walking toward.
    #[must_use]
    pub const fn move_target(&self) -> Option<ActorId> {
        self.move_target
    }

    /// Whether the most recent collision scan found this actor touching another.
    #[must_use]
    pub const fn is_colliding(&self) -> bool {
        self.colliding
    }

    /// Reports whether the actor still has health left.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Gap between the two footprints; negative when they overlap.
    #[must_use]
    pub fn edge_distance(&self, other: &Actor) -> f64 {
        self.position.distance(other.position) - self.radius - other.radius
    }

    /// Character-specific state, if the actor is the player.
    #[must_use]
    pub const fn as_character(&self) -> Option<&CharacterState> {
        match &self.role {
            Role::Character(state) => Some(state),
            Role::Monster(_) => None,
        }
    }

    /// Monster-specific state, if the actor is a monster.
    #[must_use]
    pub const fn as_monster(&self) -> Option<&MonsterState> {
        match &self.role {
            Role::Monster(state) => Some(state),
            Role::Character(_) => None,
        }
    }

    /// Experience awarded when this actor is slain.
    #[must_use]
    pub fn experience_value(&self) -> i32 {
        self.as_monster()
            .map_or(0, |monster| monster.experience_value)
    }

    pub(crate) fn skills_mut(&mut self) -> Option<&mut Vec<SkillInstance>> {
        match &mut self.role {
            Role::Character(state) => Some(&mut state.skills),
            Role::Monster(_) => None,
        }
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_move_target(&mut self, target: Option<ActorId>) {
        self.move_target = target;
    }

    pub(crate) fn set_colliding(&mut self, colliding: bool) {
        self.colliding = colliding;
    }

    /// Applies a hit after armor and returns the health actually removed.
    pub(crate) fn take_damage(&mut self, raw: i32) -> i32 {
        let applied = raw.saturating_sub(self.armor).max(MINIMUM_DAMAGE);
        self.health = self.health.saturating_sub(applied).max(0);
        applied
    }

    pub(crate) fn spend_mana(&mut self, amount: i32) {
        self.mana = self.mana.saturating_sub(amount.max(0)).max(0);
    }

    pub(crate) fn regenerate_mana(&mut self, amount: i32) {
        self.mana = self.mana.saturating_add(amount.max(0)).min(self.max_mana);
    }
}

/// State specific to the player character.
#[derive(Clone, Debug)]
pub struct CharacterState {
    uuid: Uuid,
    name: String,
    experience: i32,
    strength: i32,
    dexterity: i32,
    intelligence: i32,
    vitality: i32,
    skills: Vec<SkillInstance>,
    equipment: Vec<EquipmentInstance>,
}

impl CharacterState {
    /// Identifier carried over from the character snapshot.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Experience toward the next level.
    #[must_use]
    pub const fn experience(&self) -> i32 {
        self.experience
    }

    /// Strength stat.
    #[must_use]
    pub const fn strength(&self) -> i32 {
        self.strength
    }

    /// Dexterity stat.
    #[must_use]
    pub const fn dexterity(&self) -> i32 {
        self.dexterity
    }

    /// Intelligence stat.
    #[must_use]
    pub const fn intelligence(&self) -> i32 {
        self.intelligence
    }

    /// Vitality stat.
    #[must_use]
    pub const fn vitality(&self) -> i32 {
        self.vitality
    }

    /// Skill gems in priority order.
    #[must_use]
    pub fn skills(&self) -> &[SkillInstance] {
        &self.skills
    }

    /// Worn items.
    #[must_use]
    pub fn equipment(&self) -> &[EquipmentInstance] {
        &self.equipment
    }
}

/// State specific to a monster.
#[derive(Clone, Debug)]
pub struct MonsterState {
    monster: MonsterKey,
    name: String,
    experience_value: i32,
    damage_type: DamageType,
}

impl MonsterState {
    /// Archetype of the monster.
    #[must_use]
    pub const fn monster(&self) -> MonsterKey {
        self.monster
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Element of the monster's attacks.
    #[must_use]
    pub const fn damage_type(&self) -> DamageType {
        self.damage_type
    }
}

/// Skill gem with its runtime cooldown.
#[derive(Clone, Debug)]
pub struct SkillInstance {
    loadout: SkillLoadout,
    current_cooldown: u32,
}

impl From<SkillLoadout> for SkillInstance {
    fn from(loadout: SkillLoadout) -> Self {
        Self {
            loadout,
            current_cooldown: 0,
        }
    }
}

impl SkillInstance {
    /// Catalog key of the skill.
    #[must_use]
    pub const fn skill(&self) -> SkillKey {
        self.loadout.skill
    }

    /// Gem level.
    #[must_use]
    pub const fn level(&self) -> i32 {
        self.loadout.level
    }

    /// Mana consumed per cast.
    #[must_use]
    pub const fn mana_cost(&self) -> i32 {
        self.loadout.mana_cost
    }

    /// Maximum edge distance to the primary target.
    #[must_use]
    pub const fn range(&self) -> f64 {
        self.loadout.range
    }

    /// Splash radius for area skills.
    #[must_use]
    pub const fn area_radius(&self) -> Option<f64> {
        self.loadout.area_radius
    }

    /// Element of the skill's damage.
    #[must_use]
    pub const fn damage_type(&self) -> DamageType {
        self.loadout.damage_type
    }

    /// Supports linked to the gem.
    #[must_use]
    pub fn linked_supports(&self) -> &[SupportSkill] {
        &self.loadout.linked_supports
    }

    /// Ticks until the skill can be cast again.
    #[must_use]
    pub const fn current_cooldown(&self) -> u32 {
        self.current_cooldown
    }

    /// Reports whether the cooldown has elapsed.
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.current_cooldown == 0
    }

    /// Skill damage before the caster's strength bonus.
    ///
    /// Each linked [`SupportSkill::IncreasedDamage`] multiplies the running
    /// total by 1.3, truncating toward zero.
    #[must_use]
    pub fn damage(&self) -> i32 {
        let base = self.loadout.base_damage + self.loadout.level * SKILL_DAMAGE_PER_LEVEL;
        self.loadout
            .linked_supports
            .iter()
            .filter(|support| **support == SupportSkill::IncreasedDamage)
            .fold(base, |damage, _| {
                (f64::from(damage) * INCREASED_DAMAGE_MULTIPLIER) as i32
            })
    }

    pub(crate) fn start_cooldown(&mut self) {
        self.current_cooldown = self.loadout.cooldown_ticks;
    }

    pub(crate) fn tick_cooldown(&mut self) {
        self.current_cooldown = self.current_cooldown.saturating_sub(1);
    }
}

/// Item worn by the player character.
#[derive(Clone, Debug)]
pub struct EquipmentInstance {
    id: Uuid,
    item: ItemKey,
    category: ItemCategory,
    slot: Option<EquipmentSlot>,
    item_level: i32,
    attributes: BTreeMap<Attribute, i32>,
}

impl From<EquipmentLoadout> for EquipmentInstance {
    fn from(loadout: EquipmentLoadout) -> Self {
        Self {
            id: loadout.id,
            item: loadout.item,
            category: loadout.category,
            slot: loadout.slot,
            item_level: loadout.item_level,
            attributes: loadout.attributes,
        }
    }
}

impl EquipmentInstance {
    /// Stable identifier of the item.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Catalog key of the item definition.
    #[must_use]
    pub const fn item(&self) -> ItemKey {
        self.item
    }

    /// Top-level classification.
    #[must_use]
    pub const fn category(&self) -> ItemCategory {
        self.category
    }

    /// Slot the item occupies.
    #[must_use]
    pub const fn slot(&self) -> Option<EquipmentSlot> {
        self.slot
    }

    /// Level the item dropped at.
    #[must_use]
    pub const fn item_level(&self) -> i32 {
        self.item_level
    }

    /// Bonus the item grants for `attribute`, zero when absent.
    #[must_use]
    pub fn attribute(&self, attribute: Attribute) -> i32 {
        self.attributes.get(&attribute).copied().unwrap_or(0)
    }
}

/// Append-only arena of actors addressed by [`ActorId`].
#[derive(Clone, Debug, Default)]
pub struct ActorArena {
    actors: Vec<Actor>,
}

impl ActorArena {
    pub(crate) fn next_id(&self) -> ActorId {
        ActorId::new(u32::try_from(self.actors.len()).unwrap_or(u32::MAX))
    }

    pub(crate) fn insert(&mut self, actor: Actor) -> ActorId {
        let id = actor.id();
        self.actors.push(actor);
        id
    }

    /// Retrieves the actor with the provided identifier.
    #[must_use]
    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(index(id))
    }

    pub(crate) fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(index(id))
    }

    /// Iterates every actor ever spawned in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    /// Number of actors ever spawned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actors.len()
    }

    /// Reports whether no actor has been spawned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }
}

pub(crate) fn index(id: ActorId) -> usize {
    usize::try_from(id.get()).unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use idle_arena_core::{
        ActorId, Attribute, CharacterBlueprint, DamageType, EquipmentLoadout, EquipmentSlot,
        ItemCategory, ItemKey, MonsterBlueprint, MonsterKey, Position, SkillKey, SkillLoadout,
        SupportSkill,
    };
    use uuid::Uuid;

    use super::{Actor, SkillInstance};

    fn loadout(supports: Vec<SupportSkill>) -> SkillLoadout {
        SkillLoadout {
            id: Uuid::nil(),
            skill: SkillKey::Fireball,
            level: 2,
            base_damage: 25,
            mana_cost: 15,
            cooldown_ticks: 3,
            range: 5.0,
            damage_type: DamageType::Fire,
            area_radius: Some(2.0),
            linked_supports: supports,
        }
    }

    fn hero() -> Actor {
        Actor::character(
            ActorId::new(0),
            CharacterBlueprint {
                id: Uuid::nil(),
                name: "Hero".to_owned(),
                level: 5,
                experience: 0,
                strength: 10,
                dexterity: 10,
                intelligence: 10,
                vitality: 10,
                skills: vec![loadout(Vec::new())],
                equipment: vec![EquipmentLoadout {
                    id: Uuid::nil(),
                    item: ItemKey::Helmet,
                    category: ItemCategory::Equipment,
                    slot: Some(EquipmentSlot::Head),
                    item_level: 1,
                    attributes: BTreeMap::from([(Attribute::Armor, 5)]),
                }],
                move_speed: 0.1,
                position: Position::new(1.0, 1.0),
            },
        )
    }

    #[test]
    fn character_stats_derive_from_attributes_and_gear() {
        let actor = hero();
        assert_eq!(actor.max_health(), 150);
        assert_eq!(actor.max_mana(), 80);
        assert_eq!(actor.armor(), 5);
        assert_eq!(actor.health(), actor.max_health());
        assert!(actor.is_alive());
    }

    #[test]
    fn damage_never_drops_below_one() {
        let mut actor = hero();
        assert_eq!(actor.take_damage(2), 1);
        assert_eq!(actor.health(), 149);
    }

    #[test]
    fn health_is_clamped_to_bounds() {
        let mut actor = Actor::monster(
            ActorId::new(1),
            MonsterBlueprint {
                monster: MonsterKey::Skeleton,
                name: "Skeleton".to_owned(),
                level: 1,
                max_health: 60,
                damage: 12,
                armor: 2,
                experience_value: 30,
                damage_type: DamageType::Physical,
                move_speed: 0.08,
                position: Position::new(5.0, 5.0),
            },
        );

        let _ = actor.take_damage(1_000);
        assert_eq!(actor.health(), 0);
        assert!(!actor.is_alive());
    }

    #[test]
    fn increased_damage_supports_compound_with_truncation() {
        let plain = SkillInstance::from(loadout(Vec::new()));
        assert_eq!(plain.damage(), 35);

        let supported = SkillInstance::from(loadout(vec![
            SupportSkill::IncreasedDamage,
            SupportSkill::FasterCasting,
            SupportSkill::IncreasedDamage,
        ]));
        assert_eq!(supported.damage(), 58);
    }

    #[test]
    fn cooldown_counts_down_to_zero() {
        let mut skill = SkillInstance::from(loadout(Vec::new()));
        assert!(skill.is_ready());
        skill.start_cooldown();
        assert_eq!(skill.current_cooldown(), 3);
        for _ in 0..5 {
            skill.tick_cooldown();
        }
        assert_eq!(skill.current_cooldown(), 0);
        assert!(skill.is_ready());
    }

    #[test]
    fn mana_stays_within_bounds() {
        let mut actor = hero();
        actor.spend_mana(500);
        assert_eq!(actor.mana(), 0);
        actor.regenerate_mana(1_000);
        assert_eq!(actor.mana(), actor.max_mana());
    }
}
