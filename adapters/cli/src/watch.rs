use idle_arena_core::Event;
use idle_arena_playback::{PlaybackObserver, PlaybackStatus};
use idle_arena_simulation::BattleSimulation;
use idle_arena_world::query;

/// Observer that logs a line per replayed tick.
#[derive(Debug, Default)]
pub(crate) struct TickLogger {
    damage_dealt: i64,
}

impl PlaybackObserver for TickLogger {
    fn on_tick(&mut self, battle: &BattleSimulation, events: &[Event]) {
        for event in events {
            match event {
                Event::DamageApplied { amount, .. } => self.damage_dealt += i64::from(*amount),
                Event::WaveStarted { wave, monsters } => {
                    log::info!("wave {wave} begins with {monsters} monsters");
                }
                _ => log::debug!("{event:?}"),
            }
        }

        let world = battle.world();
        let (health, mana) = query::player(world)
            .map_or((0, 0), |player| (player.health(), player.mana()));
        log::info!(
            "tick {:>5} | wave {}/{} | hp {health:>4} | mana {mana:>4} | monsters {}",
            battle.current_tick(),
            battle.current_wave(),
            battle.total_waves(),
            query::living_monsters(world).count()
        );
    }

    fn on_complete(&mut self, battle: &BattleSimulation, status: PlaybackStatus) {
        log::info!(
            "replay {status:?} at tick {} after {} total damage",
            battle.current_tick(),
            self.damage_dealt
        );
    }
}
