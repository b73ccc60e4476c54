use idle_arena_core::{
    DEFAULT_CHARACTER_MOVE_SPEED, DEFAULT_MANA_REGEN_PER_TICK, DEFAULT_MONSTER_MOVE_SPEED,
};

/// Tunables shared by every battle a factory produces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    character_move_speed: f64,
    monster_move_speed: f64,
    mana_regen_per_tick: i32,
    tick_cap: Option<u32>,
}

impl SimulationConfig {
    /// Creates a configuration from explicit movement and regeneration rates.
    #[must_use]
    pub const fn new(
        character_move_speed: f64,
        monster_move_speed: f64,
        mana_regen_per_tick: i32,
    ) -> Self {
        Self {
            character_move_speed,
            monster_move_speed,
            mana_regen_per_tick,
            tick_cap: None,
        }
    }

    /// Overrides the player's per-tick movement distance.
    #[must_use]
    pub const fn with_character_move_speed(mut self, speed: f64) -> Self {
        self.character_move_speed = speed;
        self
    }

    /// Overrides every monster's per-tick movement distance.
    #[must_use]
    pub const fn with_monster_move_speed(mut self, speed: f64) -> Self {
        self.monster_move_speed = speed;
        self
    }

    /// Overrides the mana the player regains each tick.
    #[must_use]
    pub const fn with_mana_regen_per_tick(mut self, regen: i32) -> Self {
        self.mana_regen_per_tick = regen;
        self
    }

    /// Replaces the map-derived tick cap used by `run_to_completion`.
    #[must_use]
    pub const fn with_tick_cap(mut self, cap: u32) -> Self {
        self.tick_cap = Some(cap);
        self
    }

    /// Distance the player covers per tick.
    #[must_use]
    pub const fn character_move_speed(&self) -> f64 {
        self.character_move_speed
    }

    /// Distance a monster covers per tick.
    #[must_use]
    pub const fn monster_move_speed(&self) -> f64 {
        self.monster_move_speed
    }

    /// Mana the player regains per tick.
    #[must_use]
    pub const fn mana_regen_per_tick(&self) -> i32 {
        self.mana_regen_per_tick
    }

    /// Explicit tick cap, if one was configured.
    #[must_use]
    pub const fn tick_cap(&self) -> Option<u32> {
        self.tick_cap
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(
            DEFAULT_CHARACTER_MOVE_SPEED,
            DEFAULT_MONSTER_MOVE_SPEED,
            DEFAULT_MANA_REGEN_PER_TICK,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::SimulationConfig;

    #[test]
    fn builders_override_only_their_field() {
        let config = SimulationConfig::default()
            .with_mana_regen_per_tick(4)
            .with_tick_cap(90);

        assert_eq!(config.mana_regen_per_tick(), 4);
        assert_eq!(config.tick_cap(), Some(90));
        assert!((config.character_move_speed() - 0.1).abs() < f64::EPSILON);
        assert!((config.monster_move_speed() - 0.08).abs() < f64::EPSILON);
    }
}
