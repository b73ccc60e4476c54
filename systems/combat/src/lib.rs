#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that decides which attacks land during a tick.

use idle_arena_core::{Command, COLLISION_THRESHOLD};
use idle_arena_system_targeting::nearest_monster_within;
use idle_arena_world::{query, World};

/// Combat system that queues skill casts and melee strikes.
#[derive(Debug, Default)]
pub struct Combat {
    scratch: Vec<Command>,
}

impl Combat {
    /// Creates a new combat system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emits at most one [`Command::CastSkill`] for the player.
    ///
    /// The first skill in list order that is off cooldown and affordable is
    /// chosen; it is cast at the nearest living monster within its range.
    pub fn player_action(&mut self, world: &World, out: &mut Vec<Command>) {
        let Some(player) = query::player(world).filter(|player| player.is_alive()) else {
            return;
        };
        let Some(character) = player.as_character() else {
            return;
        };

        let Some((slot, skill)) = character
            .skills()
            .iter()
            .enumerate()
            .find(|(_, skill)| skill.is_ready() && skill.mana_cost() <= player.mana())
        else {
            return;
        };

        if let Some(target) = nearest_monster_within(world, player, skill.range()) {
            out.push(Command::CastSkill {
                caster: player.id(),
                slot,
                target,
            });
        }
    }

    /// Emits [`Command::MeleeStrike`] for every living monster touching the player.
    pub fn monster_action(&mut self, world: &World, out: &mut Vec<Command>) {
        let Some(player) = query::player(world).filter(|player| player.is_alive()) else {
            return;
        };

        self.scratch.clear();
        for monster in query::living_monsters(world) {
            if monster.is_colliding() || monster.edge_distance(player) <= COLLISION_THRESHOLD {
                self.scratch.push(Command::MeleeStrike {
                    attacker: monster.id(),
                    target: player.id(),
                });
            }
        }

        out.reserve(self.scratch.len());
        out.append(&mut self.scratch);
    }
}
