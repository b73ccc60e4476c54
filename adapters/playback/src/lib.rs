#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Paced replay of finished battles.
//!
//! A [`PlaybackDriver`] rebuilds a battle from a stored [`BattleResult`] and
//! steps it at a configurable rate, handing every tick to a
//! [`PlaybackObserver`]. Pacing never changes the outcome: the replay reaches
//! the same state as the run that produced the result.

use std::{
    sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering},
    time::Duration,
};

use idle_arena_core::{BattleResult, Event, TICKS_PER_SECOND};
use idle_arena_simulation::{BattleError, BattleFactory, BattleSimulation};
use thiserror::Error;
use tokio::sync::watch;

/// Replay rate used until one is configured.
pub const DEFAULT_TICKS_PER_SECOND: u32 = TICKS_PER_SECOND;

/// Wall-clock delay between two replayed ticks.
#[must_use]
pub fn tick_delay(ticks_per_second: u32) -> Duration {
    Duration::from_millis(u64::from(1000 / ticks_per_second.max(1)))
}

/// How a playback ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackStatus {
    /// Every recorded tick was replayed.
    Completed,
    /// The playback was stopped before the end.
    Cancelled,
}

/// Summary returned once a playback ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackOutcome {
    /// How the playback ended.
    pub status: PlaybackStatus,
    /// Ticks handed to the observer.
    pub ticks_played: u32,
}

/// Failures that prevent a playback from starting.
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The stored result could not be rebuilt into a battle.
    #[error("failed to rebuild the battle for playback")]
    Battle(#[from] BattleError),
}

/// Receives replayed ticks.
pub trait PlaybackObserver {
    /// Called after each replayed tick with the events it produced.
    fn on_tick(&mut self, battle: &BattleSimulation, events: &[Event]);

    /// Called exactly once when the playback ends.
    fn on_complete(&mut self, battle: &BattleSimulation, status: PlaybackStatus);
}

/// Drives paced replays of stored battle results.
#[derive(Debug)]
pub struct PlaybackDriver<F> {
    factory: F,
    ticks_per_second: AtomicU32,
    playing: AtomicBool,
    session: AtomicU64,
    stop: watch::Sender<u64>,
}

impl<F: BattleFactory> PlaybackDriver<F> {
    /// Creates a driver that rebuilds battles through `factory`.
    #[must_use]
    pub fn new(factory: F) -> Self {
        let (stop, _) = watch::channel(0);
        Self {
            factory,
            ticks_per_second: AtomicU32::new(DEFAULT_TICKS_PER_SECOND),
            playing: AtomicBool::new(false),
            session: AtomicU64::new(0),
            stop,
        }
    }

    /// Sets the initial replay rate.
    #[must_use]
    pub fn with_ticks_per_second(self, ticks_per_second: u32) -> Self {
        self.set_ticks_per_second(ticks_per_second);
        self
    }

    /// Changes the replay rate, taking effect from the next delay.
    ///
    /// Rates below one tick per second are raised to one.
    pub fn set_ticks_per_second(&self, ticks_per_second: u32) {
        self.ticks_per_second
            .store(ticks_per_second.max(1), Ordering::Relaxed);
    }

    /// Current replay rate.
    #[must_use]
    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second.load(Ordering::Relaxed)
    }

    /// Reports whether a playback is in progress.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing.load(Ordering::Acquire)
    }

    /// Asks the running playback, if any, to stop before its next tick.
    pub fn stop(&self) {
        self.stop
            .send_modify(|generation| *generation = generation.wrapping_add(1));
    }

    /// Replays `result`, stopping any playback already in progress.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::Battle`] when the result's seed no longer
    /// builds a battle, for example after its map left the catalog.
    pub async fn play<O>(
        &self,
        result: &BattleResult,
        observer: &mut O,
    ) -> Result<PlaybackOutcome, PlaybackError>
    where
        O: PlaybackObserver + ?Sized,
    {
        self.stop();
        let mut stop = self.stop.subscribe();
        let session = self.session.fetch_add(1, Ordering::AcqRel) + 1;

        let mut battle = self.factory.create_battle(result.to_seed())?;
        self.playing.store(true, Ordering::Release);
        log::info!(
            "replaying {} ticks at {} ticks per second",
            result.total_ticks,
            self.ticks_per_second()
        );

        let mut events = Vec::new();
        let mut ticks_played = 0;
        let mut status = PlaybackStatus::Completed;

        while !battle.state().is_finished() && battle.current_tick() < result.total_ticks {
            if stop.has_changed().unwrap_or(true) {
                status = PlaybackStatus::Cancelled;
                break;
            }

            events.clear();
            battle.tick(&mut events);
            ticks_played += 1;
            observer.on_tick(&battle, &events);

            if battle.state().is_finished() || battle.current_tick() >= result.total_ticks {
                break;
            }

            tokio::select! {
                () = tokio::time::sleep(tick_delay(self.ticks_per_second())) => {}
                _ = stop.changed() => {
                    status = PlaybackStatus::Cancelled;
                    break;
                }
            }
        }

        if status == PlaybackStatus::Completed {
            events.clear();
            let _ = battle.enforce_tick_cap(&mut events);
        }

        if self.session.load(Ordering::Acquire) == session {
            self.playing.store(false, Ordering::Release);
        }
        log::info!("playback {status:?} after {ticks_played} ticks");
        observer.on_complete(&battle, status);

        Ok(PlaybackOutcome {
            status,
            ticks_played,
        })
    }
}
