#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting wave and spawn commands.

use std::{
    collections::{BTreeMap, VecDeque},
    time::Duration,
};

use lane_defence_core::{Command, Event, GameConfig};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    wave_interval: Duration,
    spawn_delay: Duration,
    enemies_per_wave: u32,
}

impl Config {
    /// Creates a new configuration from the wave cadence and batch size.
    #[must_use]
    pub const fn new(wave_interval: Duration, spawn_delay: Duration, enemies_per_wave: u32) -> Self {
        Self {
            wave_interval,
            spawn_delay,
            enemies_per_wave,
        }
    }

    /// Derives the scheduler configuration from the game parameters.
    #[must_use]
    pub const fn from_game(config: &GameConfig) -> Self {
        Self::new(
            config.wave_interval(),
            config.spawn_delay(),
            config.enemies_per_wave,
        )
    }
}

/// Pure system that starts waves on a fixed cadence and staggers their spawns.
///
/// Wave `n` queues `n * enemies_per_wave` spawns, the first at the moment the
/// wave fired and each following one `spawn_delay` later.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    clock: Duration,
    accumulator: Duration,
    launched: VecDeque<Duration>,
    pending: BTreeMap<(Duration, u64), u32>,
    sequence: u64,
    halted: bool,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            clock: Duration::ZERO,
            accumulator: Duration::ZERO,
            launched: VecDeque::new(),
            pending: BTreeMap::new(),
            sequence: 0,
            halted: false,
        }
    }

    /// Number of spawns queued but not yet due.
    #[must_use]
    pub fn pending_spawns(&self) -> usize {
        self.pending.len()
    }

    /// Consumes world events to emit wave and spawn commands.
    ///
    /// Spawns that fell due are emitted before any wave start requested by
    /// the same batch. A `GameOver` event drops the queue for good.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.halted {
            return;
        }

        let mut wave_starts = 0_usize;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => {
                    self.clock = self.clock.saturating_add(*dt);
                    wave_starts += self.accumulate(*dt);
                }
                Event::WaveStarted { wave } => self.schedule_wave(*wave),
                Event::GameOver => {
                    self.halted = true;
                    self.pending.clear();
                    self.launched.clear();
                    return;
                }
                _ => {}
            }
        }

        while let Some(entry) = self.pending.first_entry() {
            if entry.key().0 > self.clock {
                break;
            }
            let wave = entry.remove();
            out.push(Command::SpawnEnemy { wave });
        }

        out.extend(std::iter::repeat(Command::StartWave).take(wave_starts));
    }

    fn accumulate(&mut self, dt: Duration) -> usize {
        if self.config.wave_interval.is_zero() {
            return 0;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut fired = 0;
        while self.accumulator >= self.config.wave_interval {
            self.accumulator -= self.config.wave_interval;
            self.launched
                .push_back(self.clock.saturating_sub(self.accumulator));
            fired += 1;
        }
        fired
    }

    fn schedule_wave(&mut self, wave: u32) {
        let fired_at = self.launched.pop_front().unwrap_or(self.clock);
        let count = wave.saturating_mul(self.config.enemies_per_wave);
        for index in 0..count {
            let due = fired_at.saturating_add(self.config.spawn_delay.saturating_mul(index));
            let _ = self.pending.insert((due, self.sequence), wave);
            self.sequence = self.sequence.wrapping_add(1);
        }
    }
}
