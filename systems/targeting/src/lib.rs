#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that assigns move targets from world queries.
//!
//! The player walks toward the nearest living monster of the current wave;
//! every living monster walks toward the player.

use idle_arena_core::{ActorId, Command};
use idle_arena_world::{query, Actor, World};

/// Targeting system that reuses a scratch buffer between ticks.
#[derive(Debug, Default)]
pub struct Targeting {
    candidates: Vec<Candidate>,
}

impl Targeting {
    /// Creates a new targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits [`Command::AssignMoveTarget`] for the player and every monster.
    ///
    /// The output buffer is cleared before populating it.
    pub fn handle(&mut self, world: &World, out: &mut Vec<Command>) {
        out.clear();

        let Some(player) = query::player(world) else {
            return;
        };

        if player.is_alive() {
            self.candidates.clear();
            self.candidates
                .extend(query::living_monsters(world).enumerate().map(|(order, monster)| {
                    Candidate {
                        id: monster.id(),
                        order,
                        distance: player.edge_distance(monster),
                    }
                }));
            out.push(Command::AssignMoveTarget {
                actor: player.id(),
                target: nearest(&self.candidates),
            });
        }

        for monster in query::living_monsters(world) {
            out.push(Command::AssignMoveTarget {
                actor: monster.id(),
                target: Some(player.id()),
            });
        }
    }
}

/// Picks the living monster closest to `actor` whose edge distance is within `range`.
///
/// Ties resolve to the monster spawned first.
#[must_use]
pub fn nearest_monster_within(world: &World, actor: &Actor, range: f64) -> Option<ActorId> {
    let candidates: Vec<Candidate> = query::living_monsters(world)
        .enumerate()
        .map(|(order, monster)| Candidate {
            id: monster.id(),
            order,
            distance: actor.edge_distance(monster),
        })
        .filter(|candidate| candidate.distance <= range)
        .collect();
    nearest(&candidates)
}

fn nearest(candidates: &[Candidate]) -> Option<ActorId> {
    let mut best: Option<&Candidate> = None;
    for candidate in candidates {
        match best {
            Some(existing) if !candidate.precedes(existing) => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|candidate| candidate.id)
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Candidate {
    id: ActorId,
    order: usize,
    distance: f64,
}

impl Candidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.distance != other.distance {
            return self.distance < other.distance;
        }

        self.order < other.order
    }
}

#[cfg(test)]
mod tests {
    use idle_arena_core::{
        ActorId, CharacterBlueprint, Command, DamageType, MonsterBlueprint, MonsterKey, Position,
    };
    use idle_arena_world::{self as world, query, World};
    use uuid::Uuid;

    use super::{nearest_monster_within, Targeting};

    fn world_with(monsters: &[Position]) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnCharacter {
                blueprint: Box::new(CharacterBlueprint {
                    id: Uuid::nil(),
                    name: "Hero".to_owned(),
                    level: 1,
                    experience: 0,
                    strength: 1,
                    dexterity: 1,
                    intelligence: 1,
                    vitality: 1,
                    skills: Vec::new(),
                    equipment: Vec::new(),
                    move_speed: 0.1,
                    position: Position::new(5.0, 5.0),
                }),
            },
            &mut events,
        );
        for position in monsters {
            world::apply(
                &mut world,
                Command::SpawnMonster {
                    blueprint: MonsterBlueprint {
                        monster: MonsterKey::Skeleton,
                        name: "Skeleton".to_owned(),
                        level: 1,
                        max_health: 60,
                        damage: 12,
                        armor: 2,
                        experience_value: 30,
                        damage_type: DamageType::Physical,
                        move_speed: 0.08,
                        position: *position,
                    },
                },
                &mut events,
            );
        }
        world
    }

    #[test]
    fn player_targets_nearest_monster_and_monsters_target_player() {
        let world = world_with(&[Position::new(12.0, 5.0), Position::new(8.0, 5.0)]);
        let mut targeting = Targeting::new();
        let mut commands = Vec::new();
        targeting.handle(&world, &mut commands);

        let player = query::player_id(&world).expect("player spawned");
        assert_eq!(
            commands,
            vec![
                Command::AssignMoveTarget {
                    actor: player,
                    target: Some(ActorId::new(2)),
                },
                Command::AssignMoveTarget {
                    actor: ActorId::new(1),
                    target: Some(player),
                },
                Command::AssignMoveTarget {
                    actor: ActorId::new(2),
                    target: Some(player),
                },
            ]
        );
    }

    #[test]
    fn equidistant_monsters_resolve_to_spawn_order() {
        let world = world_with(&[Position::new(8.0, 5.0), Position::new(2.0, 5.0)]);
        let player = query::player(&world).expect("player spawned");
        assert_eq!(
            nearest_monster_within(&world, player, 10.0),
            Some(ActorId::new(1))
        );
    }

    #[test]
    fn range_excludes_distant_monsters() {
        let world = world_with(&[Position::new(10.0, 5.0)]);
        let player = query::player(&world).expect("player spawned");
        assert_eq!(nearest_monster_within(&world, player, 3.9), None);
        assert_eq!(
            nearest_monster_within(&world, player, 4.0),
            Some(ActorId::new(1))
        );
    }

    #[test]
    fn player_without_monsters_clears_its_target() {
        let world = world_with(&[]);
        let mut targeting = Targeting::new();
        let mut commands = Vec::new();
        targeting.handle(&world, &mut commands);

        assert_eq!(
            commands,
            vec![Command::AssignMoveTarget {
                actor: ActorId::new(0),
                target: None,
            }]
        );
    }
}
