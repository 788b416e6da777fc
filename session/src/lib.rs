#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Match controller that pumps the world and systems through fixed ticks.
//!
//! Each call to [`Match::advance`] runs exactly one tick: the clock advances,
//! the spawning, movement, and tower combat systems react to the tick events
//! in that order, projectiles advance, and retired entities are compacted.
//! Player input enters through [`Match::place_or_upgrade`] between ticks.

use grid_defence_core::{
    CellCoord, Command, EnemyView, Event, MatchSnapshot, MatchStatus, PlacementError,
    ProjectileView, TowerId, TowerLevel, TowerView, UpgradeError, PLACEMENT_COST,
};
use grid_defence_system_movement::Movement;
use grid_defence_system_spawning::Spawning;
use grid_defence_system_tower_combat::TowerCombat;
use grid_defence_world::{self as world, query, World};
use thiserror::Error;

/// Difficulty presets controlling the player's starting money.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Difficulty {
    /// Generous starting funds.
    Easy,
    /// Standard starting funds.
    Normal,
    /// Tight starting funds.
    Hard,
}

impl Difficulty {
    /// Money the player starts with at this difficulty.
    #[must_use]
    pub const fn starting_money(self) -> u32 {
        match self {
            Difficulty::Easy => 150,
            Difficulty::Normal => 100,
            Difficulty::Hard => 75,
        }
    }
}

/// Configuration for a new match.
#[derive(Clone, Copy, Debug)]
pub struct MatchConfig {
    columns: u32,
    rows: u32,
    initial_money: u32,
}

impl MatchConfig {
    /// Default grid columns.
    pub const DEFAULT_COLUMNS: u32 = 20;
    /// Default grid rows.
    pub const DEFAULT_ROWS: u32 = 15;

    /// Creates a configuration with explicit grid dimensions and funds.
    #[must_use]
    pub const fn new(columns: u32, rows: u32, initial_money: u32) -> Self {
        Self {
            columns,
            rows,
            initial_money,
        }
    }

    /// Creates a configuration for the default grid at the given difficulty.
    #[must_use]
    pub const fn with_difficulty(difficulty: Difficulty) -> Self {
        Self::new(
            Self::DEFAULT_COLUMNS,
            Self::DEFAULT_ROWS,
            difficulty.starting_money(),
        )
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self::with_difficulty(Difficulty::Normal)
    }
}

/// Everything that happened during one simulated tick.
#[derive(Clone, Debug)]
pub struct TickReport {
    /// Value of the tick counter after advancing.
    pub tick: u64,
    /// Match status after the tick resolved.
    pub status: MatchStatus,
    /// Events emitted by the world during the tick, in order.
    pub events: Vec<Event>,
}

/// Error returned when advancing a match that already ended.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("match is already over")]
pub struct MatchOver {
    /// Terminal status the match ended with.
    pub status: MatchStatus,
}

/// Successful resolution of a placement intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    /// A new tower was placed on the requested cell.
    Placed {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Cell the tower occupies.
        cell: CellCoord,
    },
    /// The tower already on the cell advanced one level.
    Upgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower reached.
        level: TowerLevel,
    },
}

/// Failure modes of a placement intent.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum IntentError {
    /// The match already reached a terminal status.
    #[error("match is already over")]
    MatchOver,
    /// The requested cell lies outside the grid.
    #[error("cell ({column}, {row}) is outside the grid")]
    OutOfBounds {
        /// Column of the rejected cell.
        column: u32,
        /// Row of the rejected cell.
        row: u32,
    },
    /// The player cannot afford the placement or upgrade.
    #[error("not enough money: need {required}, have {available}")]
    InsufficientFunds {
        /// Cost of the rejected request.
        required: u32,
        /// Money available when the request was made.
        available: u32,
    },
    /// The tower on the cell is already at the maximum level.
    #[error("tower is already at the maximum level")]
    MaxLevel,
}

/// A running match: the world plus the systems that drive it.
#[derive(Debug)]
pub struct Match {
    world: World,
    spawning: Spawning,
    movement: Movement,
    combat: TowerCombat,
    command_buffer: Vec<Command>,
}

impl Match {
    /// Starts a fresh match from the given configuration.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::StartMatch {
                columns: config.columns,
                rows: config.rows,
                initial_money: config.initial_money,
            },
            &mut events,
        );
        Self {
            world,
            spawning: Spawning::default(),
            movement: Movement::default(),
            combat: TowerCombat::new(),
            command_buffer: Vec::new(),
        }
    }

    /// Runs exactly one tick of the simulation.
    ///
    /// Returns the events the tick produced, or [`MatchOver`] when the match
    /// already ended. A tick that itself ends the match still returns `Ok`;
    /// the terminal event is part of the report.
    pub fn advance(&mut self) -> Result<TickReport, MatchOver> {
        let status = query::match_snapshot(&self.world).status;
        if status.is_terminal() {
            return Err(MatchOver { status });
        }

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::Tick, &mut events);
        let tick_events = events.clone();

        self.command_buffer.clear();
        self.spawning.handle(&tick_events, &mut self.command_buffer);
        drain_commands(&mut self.world, &mut self.command_buffer, &mut events);

        let enemies = query::enemy_view(&self.world);
        let towers = query::tower_view(&self.world);
        self.movement
            .handle(&tick_events, &enemies, &towers, &mut self.command_buffer);
        drain_commands(&mut self.world, &mut self.command_buffer, &mut events);

        let enemies = query::enemy_view(&self.world);
        let towers = query::tower_view(&self.world);
        self.combat
            .handle(&tick_events, &enemies, &towers, &mut self.command_buffer);
        drain_commands(&mut self.world, &mut self.command_buffer, &mut events);

        world::apply(&mut self.world, Command::AdvanceProjectiles, &mut events);
        world::apply(&mut self.world, Command::EndTick, &mut events);

        let snapshot = query::match_snapshot(&self.world);
        Ok(TickReport {
            tick: snapshot.tick,
            status: snapshot.status,
            events,
        })
    }

    /// Resolves a player intent to place a tower on `cell`, or upgrade the
    /// tower already there.
    pub fn place_or_upgrade(&mut self, cell: CellCoord) -> Result<IntentOutcome, IntentError> {
        let snapshot = query::match_snapshot(&self.world);
        if snapshot.status.is_terminal() {
            return Err(IntentError::MatchOver);
        }

        let occupant_level = query::tower_at(&self.world, cell).and_then(|id| {
            query::tower_view(&self.world)
                .iter()
                .find(|tower| tower.id == id)
                .map(|tower| tower.level)
        });

        let mut events = Vec::new();
        world::apply(
            &mut self.world,
            Command::PlaceOrUpgradeTower { cell },
            &mut events,
        );

        for event in events {
            match event {
                Event::TowerPlaced { tower, cell, .. } => {
                    return Ok(IntentOutcome::Placed { tower, cell });
                }
                Event::TowerUpgraded { tower, level } => {
                    return Ok(IntentOutcome::Upgraded { tower, level });
                }
                Event::PlacementRejected { cell, reason } => {
                    return Err(match reason {
                        PlacementError::OutOfBounds => IntentError::OutOfBounds {
                            column: cell.column(),
                            row: cell.row(),
                        },
                        PlacementError::InsufficientFunds => IntentError::InsufficientFunds {
                            required: PLACEMENT_COST,
                            available: snapshot.money,
                        },
                    });
                }
                Event::UpgradeRejected { reason, .. } => {
                    return Err(match reason {
                        UpgradeError::MaxLevel => IntentError::MaxLevel,
                        UpgradeError::InsufficientFunds => IntentError::InsufficientFunds {
                            required: occupant_level
                                .and_then(TowerLevel::upgrade_cost)
                                .unwrap_or(0),
                            available: snapshot.money,
                        },
                    });
                }
                _ => {}
            }
        }

        Err(IntentError::MatchOver)
    }

    /// Aggregate match state.
    #[must_use]
    pub fn snapshot(&self) -> MatchSnapshot {
        query::match_snapshot(&self.world)
    }

    /// Live enemies in spawn order.
    #[must_use]
    pub fn enemies(&self) -> EnemyView {
        query::enemy_view(&self.world)
    }

    /// Towers in raster order.
    #[must_use]
    pub fn towers(&self) -> TowerView {
        query::tower_view(&self.world)
    }

    /// Projectiles currently in flight.
    #[must_use]
    pub fn projectiles(&self) -> ProjectileView {
        query::projectile_view(&self.world)
    }

    /// Grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn grid_dimensions(&self) -> (u32, u32) {
        query::grid_dimensions(&self.world)
    }

    /// Cell enemies spawn on.
    #[must_use]
    pub fn spawn_cell(&self) -> CellCoord {
        query::spawn_cell(&self.world)
    }

    /// Cell enemies try to reach.
    #[must_use]
    pub fn goal_cell(&self) -> CellCoord {
        query::goal_cell(&self.world)
    }
}

impl Default for Match {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

fn drain_commands(world: &mut World, commands: &mut Vec<Command>, out_events: &mut Vec<Event>) {
    for command in commands.drain(..) {
        world::apply(world, command, out_events);
    }
}
