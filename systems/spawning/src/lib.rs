#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.

use grid_defence_core::{Command, Event, SPAWN_CADENCE};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    spawn_cadence: u64,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadence in ticks.
    #[must_use]
    pub const fn new(spawn_cadence: u64) -> Self {
        Self { spawn_cadence }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(SPAWN_CADENCE)
    }
}

/// Pure system that emits a spawn command on every cadence boundary.
#[derive(Debug)]
pub struct Spawning {
    spawn_cadence: u64,
}

impl Default for Spawning {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            spawn_cadence: config.spawn_cadence,
        }
    }

    /// Consumes world events to emit spawn commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        if self.spawn_cadence == 0 {
            return;
        }

        for event in events {
            let Event::TickAdvanced { tick } = event else {
                continue;
            };
            if tick % self.spawn_cadence == 0 {
                out.push(Command::SpawnEnemy);
            }
        }
    }
}
