#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state for Idle Arena.
//!
//! The world owns the actor arena and the spatial map. It is mutated only
//! through [`apply`], which executes one [`Command`] and reports what happened
//! as [`Event`] values. Systems read it through [`query`].

mod actor;
mod spatial;

use idle_arena_core::{
    ActorId, CharacterBlueprint, Command, Event, MonsterBlueprint, DEFAULT_MAP_DIMENSION,
};

pub use actor::{
    Actor, ActorArena, ActorKind, CharacterState, EquipmentInstance, MonsterState, SkillInstance,
};
pub use spatial::{GridCell, SpatialMap};

/// Represents the authoritative state of one battle.
#[derive(Clone, Debug)]
pub struct World {
    map: SpatialMap,
    actors: ActorArena,
    player: Option<ActorId>,
    monsters: Vec<ActorId>,
}

impl World {
    /// Creates an empty world on a default-sized map.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: SpatialMap::new(DEFAULT_MAP_DIMENSION, DEFAULT_MAP_DIMENSION),
            actors: ActorArena::default(),
            player: None,
            monsters: Vec::new(),
        }
    }

    fn spawn_character(&mut self, blueprint: CharacterBlueprint, out_events: &mut Vec<Event>) {
        let id = self.actors.next_id();
        let mut actor = actor::Actor::character(id, blueprint);
        actor.set_position(self.map.clamp_to_map(actor.position(), actor.radius()));
        let position = actor.position();

        self.map.add(&actor);
        let _ = self.actors.insert(actor);
        self.player = Some(id);
        out_events.push(Event::CharacterSpawned {
            actor: id,
            position,
        });
    }

    fn spawn_monster(&mut self, blueprint: MonsterBlueprint, out_events: &mut Vec<Event>) {
        let id = self.actors.next_id();
        let monster = blueprint.monster;
        let level = blueprint.level;
        let mut actor = actor::Actor::monster(id, blueprint);
        actor.set_position(self.map.clamp_to_map(actor.position(), actor.radius()));
        let position = actor.position();

        self.map.add(&actor);
        let _ = self.actors.insert(actor);
        self.monsters.push(id);
        out_events.push(Event::MonsterSpawned {
            actor: id,
            monster,
            level,
            position,
        });
    }

    fn cast_skill(
        &mut self,
        caster: ActorId,
        slot: usize,
        target: ActorId,
        out_events: &mut Vec<Event>,
    ) {
        let Some(target_position) = self
            .actors
            .get(target)
            .filter(|actor| actor.is_alive())
            .map(Actor::position)
        else {
            return;
        };

        let Some(actor) = self.actors.get_mut(caster).filter(|actor| actor.is_alive()) else {
            return;
        };
        let strength = actor
            .as_character()
            .map_or(0, CharacterState::strength);
        let mana = actor.mana();
        let Some(skill) = actor.skills_mut().and_then(|skills| skills.get_mut(slot)) else {
            return;
        };
        if !skill.is_ready() || skill.mana_cost() > mana {
            log::trace!("skill slot {slot} of actor {} is unavailable", caster.get());
            return;
        }

        skill.start_cooldown();
        let key = skill.skill();
        let mana_cost = skill.mana_cost();
        let area_radius = skill.area_radius();
        let damage = skill.damage() + strength.div_euclid(2);
        actor.spend_mana(mana_cost);

        out_events.push(Event::SkillCast {
            caster,
            skill: key,
            target,
            mana_spent: mana_cost,
        });

        let victims = match area_radius {
            Some(radius) => {
                let mut victims: Vec<ActorId> = self
                    .map
                    .actors_in_range(&self.actors, target_position, radius)
                    .into_iter()
                    .filter(|id| self.monsters.contains(id))
                    .collect();
                if !victims.contains(&target) {
                    victims.insert(0, target);
                }
                victims
            }
            None => vec![target],
        };

        for victim in victims {
            self.strike(caster, victim, damage, out_events);
        }
    }

    fn strike(
        &mut self,
        source: ActorId,
        target: ActorId,
        raw_damage: i32,
        out_events: &mut Vec<Event>,
    ) {
        let Some(actor) = self.actors.get_mut(target).filter(|actor| actor.is_alive()) else {
            return;
        };

        let amount = actor.take_damage(raw_damage);
        out_events.push(Event::DamageApplied {
            source,
            target,
            amount,
            remaining_health: actor.health(),
        });

        if !actor.is_alive() {
            out_events.push(Event::ActorDefeated {
                actor: target,
                experience_value: actor.experience_value(),
            });
            self.map.remove(target);
        }
    }

    fn despawn_monsters(&mut self) {
        for id in self.monsters.drain(..) {
            self.map.remove(id);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMap { width, height } => {
            *world = World {
                map: SpatialMap::new(width, height),
                ..World::new()
            };
        }
        Command::SpawnCharacter { blueprint } => {
            world.spawn_character(*blueprint, out_events);
        }
        Command::SpawnMonster { blueprint } => {
            world.spawn_monster(blueprint, out_events);
        }
        Command::DespawnMonsters => world.despawn_monsters(),
        Command::AssignMoveTarget { actor, target } => {
            if let Some(actor) = world.actors.get_mut(actor) {
                actor.set_move_target(target);
            }
        }
        Command::AdvanceMovement => world.map.process_movement(&mut world.actors),
        Command::DetectCollisions => {
            let pairs = world.map.check_collisions(&mut world.actors);
            out_events.extend(
                pairs
                    .into_iter()
                    .map(|(first, second)| Event::CollisionDetected { first, second }),
            );
        }
        Command::CastSkill {
            caster,
            slot,
            target,
        } => world.cast_skill(caster, slot, target, out_events),
        Command::MeleeStrike { attacker, target } => {
            let Some(damage) = world
                .actors
                .get(attacker)
                .filter(|actor| actor.is_alive())
                .map(Actor::damage)
            else {
                return;
            };
            world.strike(attacker, target, damage, out_events);
        }
        Command::RecoverCooldowns { actor, mana_regen } => {
            if let Some(actor) = world.actors.get_mut(actor) {
                if let Some(skills) = actor.skills_mut() {
                    for skill in skills.iter_mut() {
                        skill.tick_cooldown();
                    }
                }
                actor.regenerate_mana(mana_regen);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use idle_arena_core::ActorId;

    use super::{Actor, ActorArena, SpatialMap, World};

    /// Provides read-only access to the spatial map.
    #[must_use]
    pub fn map(world: &World) -> &SpatialMap {
        &world.map
    }

    /// Provides read-only access to every actor ever spawned.
    #[must_use]
    pub fn actors(world: &World) -> &ActorArena {
        &world.actors
    }

    /// Retrieves the actor with the provided identifier.
    #[must_use]
    pub fn actor(world: &World, id: ActorId) -> Option<&Actor> {
        world.actors.get(id)
    }

    /// Identifier of the player character, once spawned.
    #[must_use]
    pub fn player_id(world: &World) -> Option<ActorId> {
        world.player
    }

    /// The player character, once spawned.
    #[must_use]
    pub fn player(world: &World) -> Option<&Actor> {
        world.player.and_then(|id| world.actors.get(id))
    }

    /// Monsters of the current wave in spawn order, including fallen ones.
    pub fn wave_monsters(world: &World) -> impl Iterator<Item = &Actor> + '_ {
        world
            .monsters
            .iter()
            .filter_map(|id| world.actors.get(*id))
    }

    /// Monsters of the current wave that are still alive, in spawn order.
    pub fn living_monsters(world: &World) -> impl Iterator<Item = &Actor> + '_ {
        wave_monsters(world).filter(|monster| monster.is_alive())
    }

    /// Reports whether every monster of the current wave has fallen.
    #[must_use]
    pub fn wave_cleared(world: &World) -> bool {
        living_monsters(world).next().is_none()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use idle_arena_core::{
        ActorId, Attribute, CharacterBlueprint, Command, DamageType, EquipmentLoadout,
        EquipmentSlot, Event, ItemCategory, ItemKey, MonsterBlueprint, MonsterKey, Position,
        SkillKey, SkillLoadout,
    };
    use uuid::Uuid;

    use super::{apply, query, World};

    fn skill(key: SkillKey, base_damage: i32, mana_cost: i32, area: Option<f64>) -> SkillLoadout {
        SkillLoadout {
            id: Uuid::nil(),
            skill: key,
            level: 0,
            base_damage,
            mana_cost,
            cooldown_ticks: 2,
            range: 5.0,
            damage_type: DamageType::Physical,
            area_radius: area,
            linked_supports: Vec::new(),
        }
    }

    fn character(skills: Vec<SkillLoadout>, position: Position) -> CharacterBlueprint {
        CharacterBlueprint {
            id: Uuid::nil(),
            name: "Hero".to_owned(),
            level: 1,
            experience: 0,
            strength: 7,
            dexterity: 1,
            intelligence: 0,
            vitality: 0,
            skills,
            equipment: vec![EquipmentLoadout {
                id: Uuid::nil(),
                item: ItemKey::Shield,
                category: ItemCategory::Equipment,
                slot: Some(EquipmentSlot::OffHand),
                item_level: 1,
                attributes: BTreeMap::from([(Attribute::Armor, 100)]),
            }],
            move_speed: 0.1,
            position,
        }
    }

    fn monster(position: Position, health: i32, armor: i32) -> MonsterBlueprint {
        MonsterBlueprint {
            monster: MonsterKey::Zombie,
            name: "Zombie".to_owned(),
            level: 1,
            max_health: health,
            damage: 15,
            armor,
            experience_value: 40,
            damage_type: DamageType::Physical,
            move_speed: 0.08,
            position,
        }
    }

    fn setup(skills: Vec<SkillLoadout>, monsters: &[(Position, i32, i32)]) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureMap {
                width: 20,
                height: 20,
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::SpawnCharacter {
                blueprint: Box::new(character(skills, Position::new(2.0, 2.0))),
            },
            &mut events,
        );
        for (position, health, armor) in monsters {
            apply(
                &mut world,
                Command::SpawnMonster {
                    blueprint: monster(*position, *health, *armor),
                },
                &mut events,
            );
        }
        world
    }

    #[test]
    fn area_skill_hits_every_monster_near_primary_target() {
        let mut world = setup(
            vec![skill(SkillKey::Fireball, 20, 10, Some(2.0))],
            &[
                (Position::new(5.0, 2.0), 100, 0),
                (Position::new(6.5, 2.0), 100, 0),
                (Position::new(12.0, 2.0), 100, 0),
            ],
        );
        let player = query::player_id(&world).expect("player spawned");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::CastSkill {
                caster: player,
                slot: 0,
                target: ActorId::new(1),
            },
            &mut events,
        );

        let hits: Vec<_> = events
            .iter()
            .filter_map(|event| match event {
                Event::DamageApplied { target, amount, .. } => Some((*target, *amount)),
                _ => None,
            })
            .collect();
        assert_eq!(hits, vec![(ActorId::new(1), 23), (ActorId::new(2), 23)]);

        let caster = query::player(&world).expect("player spawned");
        assert_eq!(caster.mana(), caster.max_mana() - 10);
        assert!(!caster.as_character().expect("character").skills()[0].is_ready());
    }

    #[test]
    fn armor_cannot_reduce_damage_below_one() {
        let mut world = setup(Vec::new(), &[(Position::new(2.5, 2.0), 100, 0)]);
        let player = query::player_id(&world).expect("player spawned");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::MeleeStrike {
                attacker: ActorId::new(1),
                target: player,
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![Event::DamageApplied {
                source: ActorId::new(1),
                target: player,
                amount: 1,
                remaining_health: 49,
            }]
        );
    }

    #[test]
    fn slain_monsters_leave_the_map_and_report_experience() {
        let mut world = setup(
            vec![skill(SkillKey::BasicAttack, 50, 0, None)],
            &[(Position::new(4.0, 2.0), 10, 0)],
        );
        let player = query::player_id(&world).expect("player spawned");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::CastSkill {
                caster: player,
                slot: 0,
                target: ActorId::new(1),
            },
            &mut events,
        );

        assert!(events.contains(&Event::ActorDefeated {
            actor: ActorId::new(1),
            experience_value: 40,
        }));
        assert!(!query::map(&world).contains(ActorId::new(1)));
        assert!(query::wave_cleared(&world));
    }

    #[test]
    fn cooldown_blocks_recasting_until_recovered() {
        let mut world = setup(
            vec![skill(SkillKey::BasicAttack, 5, 0, None)],
            &[(Position::new(4.0, 2.0), 500, 0)],
        );
        let player = query::player_id(&world).expect("player spawned");
        let cast = Command::CastSkill {
            caster: player,
            slot: 0,
            target: ActorId::new(1),
        };
        let mut events = Vec::new();

        apply(&mut world, cast.clone(), &mut events);
        apply(&mut world, cast.clone(), &mut events);
        assert_eq!(
            events
                .iter()
                .filter(|event| matches!(event, Event::SkillCast { .. }))
                .count(),
            1
        );

        for _ in 0..2 {
            apply(
                &mut world,
                Command::RecoverCooldowns {
                    actor: player,
                    mana_regen: 1,
                },
                &mut events,
            );
        }
        events.clear();
        apply(&mut world, cast, &mut events);
        assert!(matches!(events.first(), Some(Event::SkillCast { .. })));
    }

    #[test]
    fn negative_skill_damage_still_lands_the_minimum_hit() {
        let mut world = setup(
            vec![skill(SkillKey::HealingTouch, -40, 0, None)],
            &[(Position::new(3.0, 2.0), 100, 0)],
        );
        let player = query::player_id(&world).expect("player spawned");
        let mut events = Vec::new();

        apply(
            &mut world,
            Command::CastSkill {
                caster: player,
                slot: 0,
                target: ActorId::new(1),
            },
            &mut events,
        );

        assert!(events.contains(&Event::DamageApplied {
            source: player,
            target: ActorId::new(1),
            amount: 1,
            remaining_health: 99,
        }));
        let caster = query::player(&world).expect("player spawned");
        assert_eq!(caster.health(), caster.max_health());
    }

    #[test]
    fn despawning_clears_the_wave_roster() {
        let mut world = setup(Vec::new(), &[(Position::new(9.0, 9.0), 30, 0)]);
        let mut events = Vec::new();
        apply(&mut world, Command::DespawnMonsters, &mut events);

        assert_eq!(query::wave_monsters(&world).count(), 0);
        assert_eq!(query::map(&world).members().len(), 1);
        assert_eq!(query::actors(&world).len(), 2);
    }
}
