use idle_arena_core::{ActorId, GridCoord, Position, COLLISION_THRESHOLD};
use rand::Rng;

use crate::actor::{index, Actor, ActorArena};

/// One square of the spatial grid and the actors whose centre floors into it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridCell {
    coord: GridCoord,
    occupants: Vec<ActorId>,
}

impl GridCell {
    fn new(coord: GridCoord) -> Self {
        Self {
            coord,
            occupants: Vec::new(),
        }
    }

    /// Coordinate of the cell.
    #[must_use]
    pub const fn coord(&self) -> GridCoord {
        self.coord
    }

    /// Actors inside the cell, ordered by identifier.
    #[must_use]
    pub fn occupants(&self) -> &[ActorId] {
        &self.occupants
    }

    fn insert(&mut self, id: ActorId) {
        if let Err(slot) = self.occupants.binary_search(&id) {
            self.occupants.insert(slot, id);
        }
    }

    fn remove(&mut self, id: ActorId) {
        if let Ok(slot) = self.occupants.binary_search(&id) {
            let _ = self.occupants.remove(slot);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Membership {
    cell: Option<GridCoord>,
}

/// Grid-partitioned container of actor identifiers.
///
/// Cell membership is tracked by identifier in `index`, so relocating an
/// actor only touches the two cells involved.
#[derive(Clone, Debug)]
pub struct SpatialMap {
    width: u32,
    height: u32,
    cells: Vec<GridCell>,
    members: Vec<ActorId>,
    index: Vec<Option<Membership>>,
}

impl SpatialMap {
    /// Creates an empty map with the provided extent in map units.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                cells.push(GridCell::new(GridCoord::new(
                    i32::try_from(x).unwrap_or(i32::MAX),
                    i32::try_from(y).unwrap_or(i32::MAX),
                )));
            }
        }

        Self {
            width,
            height,
            cells,
            members: Vec::new(),
            index: Vec::new(),
        }
    }

    /// Horizontal extent in map units.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Vertical extent in map units.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Actors currently on the map, in the order they were added.
    #[must_use]
    pub fn members(&self) -> &[ActorId] {
        &self.members
    }

    /// Reports whether the actor is on the map.
    #[must_use]
    pub fn contains(&self, id: ActorId) -> bool {
        self.membership(id).is_some()
    }

    /// Cell the actor currently occupies, if it is on the map and in bounds.
    #[must_use]
    pub fn cell_of(&self, id: ActorId) -> Option<GridCoord> {
        self.membership(id).and_then(|membership| membership.cell)
    }

    /// Retrieves the cell at `coord`, if it lies inside the grid.
    #[must_use]
    pub fn cell(&self, coord: GridCoord) -> Option<&GridCell> {
        self.cell_index(coord).map(|slot| &self.cells[slot])
    }

    /// Enumerates the 3×3 block of cells centred on `coord`, clipped to the grid.
    pub fn neighbors(&self, coord: GridCoord) -> impl Iterator<Item = &GridCell> + '_ {
        (-1..=1).flat_map(move |dy| {
            (-1..=1).filter_map(move |dx| {
                self.cell(GridCoord::new(coord.x() + dx, coord.y() + dy))
            })
        })
    }

    /// Places an actor on the map. Adding an actor twice only refreshes its cell.
    pub fn add(&mut self, actor: &Actor) {
        let id = actor.id();
        if self.contains(id) {
            self.relocate(id, actor.position());
            return;
        }

        let slot = index(id);
        if self.index.len() <= slot {
            self.index.resize(slot + 1, None);
        }

        let cell = self.in_bounds_cell(actor.position());
        self.index[slot] = Some(Membership { cell });
        self.members.push(id);
        if let Some(cell) = cell.and_then(|coord| self.cell_mut(coord)) {
            cell.insert(id);
        }
    }

    /// Takes an actor off the map. Removing an absent actor is a no-op.
    pub fn remove(&mut self, id: ActorId) {
        let Some(membership) = self.membership(id) else {
            return;
        };

        if let Some(cell) = membership.cell.and_then(|coord| self.cell_mut(coord)) {
            cell.remove(id);
        }
        self.index[index(id)] = None;
        self.members.retain(|member| *member != id);
    }

    /// Recomputes the actor's cell from its position.
    pub fn update_cell(&mut self, actor: &Actor) {
        self.relocate(actor.id(), actor.position());
    }

    fn relocate(&mut self, id: ActorId, position: Position) {
        let Some(membership) = self.membership(id) else {
            return;
        };

        let next = self.in_bounds_cell(position);
        if next == membership.cell {
            return;
        }

        if let Some(cell) = membership.cell.and_then(|coord| self.cell_mut(coord)) {
            cell.remove(id);
        }
        if let Some(cell) = next.and_then(|coord| self.cell_mut(coord)) {
            cell.insert(id);
        }
        self.index[index(id)] = Some(Membership { cell: next });
    }

    /// Recomputes collision flags for every actor on the map.
    ///
    /// Returns each touching pair once, lower identifier first, in discovery
    /// order.
    pub fn check_collisions(&self, actors: &mut ActorArena) -> Vec<(ActorId, ActorId)> {
        for id in &self.members {
            if let Some(actor) = actors.get_mut(*id) {
                actor.set_colliding(false);
            }
        }

        let mut pairs = Vec::new();
        for &id in &self.members {
            let (Some(actor), Some(coord)) = (actors.get(id), self.cell_of(id)) else {
                continue;
            };
            if !actor.is_alive() {
                continue;
            }

            for cell in self.neighbors(coord) {
                for &other_id in cell.occupants() {
                    if other_id <= id {
                        continue;
                    }
                    let Some(other) = actors.get(other_id) else {
                        continue;
                    };
                    if other.is_alive() && actor.edge_distance(other) < COLLISION_THRESHOLD {
                        pairs.push((id, other_id));
                    }
                }
            }
        }

        for &(first, second) in &pairs {
            for id in [first, second] {
                if let Some(actor) = actors.get_mut(id) {
                    actor.set_colliding(true);
                }
            }
        }

        pairs
    }

    /// Enumerates live actors whose footprint reaches within `range` of `center`.
    #[must_use]
    pub fn actors_in_range(
        &self,
        actors: &ActorArena,
        center: Position,
        range: f64,
    ) -> Vec<ActorId> {
        self.members
            .iter()
            .copied()
            .filter(|id| {
                actors.get(*id).is_some_and(|actor| {
                    actor.is_alive() && center.distance(actor.position()) - actor.radius() <= range
                })
            })
            .collect()
    }

    /// Clamps a position so a footprint of `radius` stays inside the map.
    #[must_use]
    pub fn clamp_to_map(&self, position: Position, radius: f64) -> Position {
        let max_x = (f64::from(self.width) - radius).max(radius);
        let max_y = (f64::from(self.height) - radius).max(radius);
        position.clamp(Position::new(radius, radius), Position::new(max_x, max_y))
    }

    /// Reports whether the position lies inside the map rectangle.
    #[must_use]
    pub fn is_within_bounds(&self, position: Position) -> bool {
        (0.0..=f64::from(self.width)).contains(&position.x())
            && (0.0..=f64::from(self.height)).contains(&position.y())
    }

    /// Draws a uniform position half a unit inside every edge.
    pub fn random_position<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        let span_x = (f64::from(self.width) - 1.0).max(0.0);
        let span_y = (f64::from(self.height) - 1.0).max(0.0);
        let x = rng.gen::<f64>() * span_x + 0.5;
        let y = rng.gen::<f64>() * span_y + 0.5;
        Position::new(x, y)
    }

    /// Steps every eligible actor toward its move target.
    ///
    /// Actors that are dead, colliding, or without a living target stay put.
    pub fn process_movement(&mut self, actors: &mut ActorArena) {
        for slot in 0..self.members.len() {
            let id = self.members[slot];
            let Some(destination) = self.next_step(actors, id) else {
                continue;
            };
            if let Some(actor) = actors.get_mut(id) {
                actor.set_position(destination);
            }
            self.relocate(id, destination);
        }
    }

    fn next_step(&self, actors: &ActorArena, id: ActorId) -> Option<Position> {
        let actor = actors.get(id)?;
        if !actor.is_alive() || actor.is_colliding() {
            return None;
        }

        let target = actors.get(actor.move_target()?)?;
        if !target.is_alive() {
            return None;
        }

        let stepped = actor
            .position()
            .move_towards(target.position(), actor.move_speed());
        Some(self.clamp_to_map(stepped, actor.radius()))
    }

    fn membership(&self, id: ActorId) -> Option<Membership> {
        self.index.get(index(id)).copied().flatten()
    }

    fn in_bounds_cell(&self, position: Position) -> Option<GridCoord> {
        let coord = position.grid_coord();
        self.cell_index(coord).map(|_| coord)
    }

    fn cell_index(&self, coord: GridCoord) -> Option<usize> {
        let x = u32::try_from(coord.x()).ok()?;
        let y = u32::try_from(coord.y()).ok()?;
        if x >= self.width || y >= self.height {
            return None;
        }
        usize::try_from(y * self.width + x).ok()
    }

    fn cell_mut(&mut self, coord: GridCoord) -> Option<&mut GridCell> {
        self.cell_index(coord).map(|slot| &mut self.cells[slot])
    }
}
