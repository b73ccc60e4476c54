use idle_arena_core::{
    ActorId, Command, DamageType, Event, MonsterBlueprint, MonsterKey, Position,
    COLLISION_THRESHOLD,
};
use idle_arena_world::{self as world, query, World};
use proptest::prelude::*;

fn monster_at(x: f64, y: f64) -> MonsterBlueprint {
    MonsterBlueprint {
        monster: MonsterKey::Wolf,
        name: "Wolf".to_owned(),
        level: 1,
        max_health: 55,
        damage: 16,
        armor: 2,
        experience_value: 32,
        damage_type: DamageType::Physical,
        move_speed: 0.3,
        position: Position::new(x, y),
    }
}

fn populate(positions: &[(f64, f64)]) -> World {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureMap {
            width: 8,
            height: 8,
        },
        &mut events,
    );
    for &(x, y) in positions {
        world::apply(
            &mut world,
            Command::SpawnMonster {
                blueprint: monster_at(x, y),
            },
            &mut events,
        );
    }
    world
}

fn assert_cells_match_positions(world: &World) {
    let map = query::map(world);
    for id in map.members() {
        let actor = query::actor(world, *id).expect("member exists");
        assert_eq!(map.cell_of(*id), Some(actor.position().grid_coord()));
        let cell = map
            .cell(actor.position().grid_coord())
            .expect("clamped positions are in bounds");
        assert!(cell.occupants().contains(id));
    }
}

proptest! {
    #[test]
    fn collision_flags_are_symmetric(
        positions in prop::collection::vec((0.0f64..8.0, 0.0f64..8.0), 2..12)
    ) {
        let mut world = populate(&positions);
        let mut events = Vec::new();
        world::apply(&mut world, Command::DetectCollisions, &mut events);

        let pairs: Vec<(ActorId, ActorId)> = events
            .iter()
            .filter_map(|event| match event {
                Event::CollisionDetected { first, second } => Some((*first, *second)),
                _ => None,
            })
            .collect();

        for (first, second) in &pairs {
            prop_assert!(first < second);
            let a = query::actor(&world, *first).expect("exists");
            let b = query::actor(&world, *second).expect("exists");
            prop_assert!(a.is_colliding());
            prop_assert!(b.is_colliding());
            prop_assert!(a.edge_distance(b) < COLLISION_THRESHOLD);
        }

        for id in query::map(&world).members() {
            let actor = query::actor(&world, *id).expect("exists");
            let paired = pairs
                .iter()
                .any(|(first, second)| first == id || second == id);
            prop_assert_eq!(actor.is_colliding(), paired);
        }
    }

    #[test]
    fn cell_membership_tracks_movement(
        positions in prop::collection::vec((0.0f64..8.0, 0.0f64..8.0), 2..8),
        steps in 1usize..40,
    ) {
        let mut world = populate(&positions);
        let mut events = Vec::new();
        let members = query::map(&world).members().to_vec();
        for (index, id) in members.iter().enumerate() {
            let target = members[(index + 1) % members.len()];
            world::apply(
                &mut world,
                Command::AssignMoveTarget { actor: *id, target: Some(target) },
                &mut events,
            );
        }
        assert_cells_match_positions(&world);

        for _ in 0..steps {
            world::apply(&mut world, Command::DetectCollisions, &mut events);
            world::apply(&mut world, Command::AdvanceMovement, &mut events);
            assert_cells_match_positions(&world);
        }
    }
}
