#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic movement system that schedules enemy move evaluations.
//!
//! Every enemy alternates between moving and attacking: the first evaluation
//! after spawning arms the attack flag and moves, the next one attacks a
//! tower in range instead of moving (or moves when none is), and so on. The
//! flag itself lives in the world; this system only reads it from the enemy
//! view and picks the command for the current evaluation.

use grid_defence_core::{
    CellPoint, Command, EnemyView, Event, TowerId, TowerView, ENEMY_ATTACK_RANGE, MOVE_CADENCE,
};

/// Configuration parameters required to construct the movement system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    move_cadence: u64,
}

impl Config {
    /// Creates a new configuration using the provided move cadence in ticks.
    #[must_use]
    pub const fn new(move_cadence: u64) -> Self {
        Self { move_cadence }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(MOVE_CADENCE)
    }
}

/// Pure system that emits one evaluation command per enemy on the move cadence.
#[derive(Debug)]
pub struct Movement {
    move_cadence: u64,
}

impl Default for Movement {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Movement {
    /// Creates a new movement system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            move_cadence: config.move_cadence,
        }
    }

    /// Consumes world events and immutable views to emit movement commands.
    ///
    /// Enemies are evaluated in identifier (spawn) order; towers are scanned
    /// in raster order so the counter-attack target is deterministic.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        if self.move_cadence == 0 {
            return;
        }

        let due = events.iter().any(
            |event| matches!(event, Event::TickAdvanced { tick } if tick % self.move_cadence == 0),
        );
        if !due {
            return;
        }

        for enemy in enemies.iter() {
            if enemy.attack_armed {
                if let Some(tower) = first_tower_in_range(enemy.position, towers) {
                    out.push(Command::CounterAttack {
                        enemy: enemy.id,
                        tower,
                    });
                    continue;
                }
            }
            out.push(Command::StepEnemy { enemy: enemy.id });
        }
    }
}

fn first_tower_in_range(position: CellPoint, towers: &TowerView) -> Option<TowerId> {
    towers
        .iter()
        .find(|tower| tower.cell.to_point().distance_to(position) <= ENEMY_ATTACK_RANGE)
        .map(|tower| tower.id)
}
