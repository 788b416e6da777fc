#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Grid Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. The session and adapters submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems to react to deterministically. Systems consume event streams,
//! query immutable snapshots, and respond exclusively with new command
//! batches.

use serde::{Deserialize, Serialize};

/// Money deducted when a tower is placed on an open cell.
pub const PLACEMENT_COST: u32 = 25;

/// Money awarded when an enemy is destroyed.
pub const BOUNTY: u32 = 11;

/// Life total a fresh match starts with.
pub const STARTING_LIFE: u32 = 10;

/// Number of defeated enemies required to win the match.
pub const WIN_THRESHOLD: u32 = 100;

/// Tick interval between enemy spawns.
pub const SPAWN_CADENCE: u64 = 180;

/// Tick interval between enemy move evaluations.
pub const MOVE_CADENCE: u64 = 45;

/// Euclidean radius, in cells, within which an enemy counter-attacks towers.
pub const ENEMY_ATTACK_RANGE: f32 = 4.0;

/// Damage applied by every enemy projectile impact.
pub const ENEMY_PROJECTILE_DAMAGE: u32 = 1;

/// Distance below which a projectile is considered to have hit its target.
pub const IMPACT_EPSILON: f32 = 0.1;

/// Side length of a single grid cell measured in world units.
pub const CELL_LENGTH: f32 = 40.0;

/// Projectile travel speed in world units per tick.
///
/// Divided by [`CELL_LENGTH`] this yields the per-tick step in cell units
/// used by the homing update.
pub const PROJECTILE_SPEED: f32 = 4.0;

/// Hit points assigned to enemies spawned at the start of a match.
pub const ENEMY_BASE_HP: u32 = 15;

/// Hit-point increment applied to the spawn baseline on ratchet steps.
pub const ENEMY_HP_STEP: u32 = 2;

/// Number of cumulative defeats between enemy hit-point ratchet steps.
pub const ENEMY_HP_STEP_EVERY: u32 = 5;

/// Hit points assigned to towers placed at the start of a match.
pub const TOWER_BASE_HP: u32 = 20;

/// Upper bound on the tower hit-point baseline ratchet.
pub const TOWER_HP_CAP: u32 = 40;

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Resets the world to a fresh match over an all-open grid.
    StartMatch {
        /// Number of grid columns.
        columns: u32,
        /// Number of grid rows.
        rows: u32,
        /// Money the player starts the match with.
        initial_money: u32,
    },
    /// Advances the simulation clock by exactly one tick.
    Tick,
    /// Requests that a new enemy enter the grid at the spawn cell.
    SpawnEnemy,
    /// Requests that an enemy run one move evaluation.
    StepEnemy {
        /// Identifier of the enemy to evaluate.
        enemy: EnemyId,
    },
    /// Requests that an enemy fire a counter-attack projectile at a tower.
    CounterAttack {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Tower targeted by the counter-attack.
        tower: TowerId,
    },
    /// Requests that a tower fire a projectile at an enemy.
    FireProjectile {
        /// Identifier of the firing tower.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
    },
    /// Advances every live projectile and resolves impacts.
    AdvanceProjectiles,
    /// Requests placement of a tower, or an upgrade if the cell has one.
    PlaceOrUpgradeTower {
        /// Cell the intent applies to.
        cell: CellCoord,
    },
    /// Compacts entities retired earlier in the tick.
    EndTick,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TickAdvanced {
        /// Value of the tick counter after advancing.
        tick: u64,
    },
    /// Confirms that an enemy entered the grid.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Cell the enemy occupies after spawning.
        cell: CellCoord,
        /// Hit points the enemy spawned with.
        health: Health,
    },
    /// Confirms that an enemy advanced one step along its path.
    EnemyAdvanced {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after moving.
        to: CellCoord,
    },
    /// Reports that an enemy reached the goal cell and was retired.
    EnemyEscaped {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Life total remaining after the deduction.
        life_remaining: u32,
    },
    /// Reports that an enemy was destroyed by tower fire.
    EnemyDefeated {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Money awarded for the kill.
        bounty: u32,
        /// Cumulative defeat count after this kill.
        defeated: u32,
    },
    /// Confirms that an enemy fired a projectile at a tower.
    CounterAttackFired {
        /// Identifier of the attacking enemy.
        enemy: EnemyId,
        /// Tower targeted by the projectile.
        tower: TowerId,
        /// Identifier assigned to the projectile.
        projectile: EnemyProjectileId,
    },
    /// Confirms that a tower fired a projectile at an enemy.
    ProjectileFired {
        /// Identifier of the firing tower.
        tower: TowerId,
        /// Enemy targeted by the projectile.
        target: EnemyId,
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
    },
    /// Reports that a tower projectile struck its target.
    ProjectileHit {
        /// Identifier of the impacting projectile.
        projectile: ProjectileId,
        /// Enemy that absorbed the impact.
        target: EnemyId,
        /// Damage applied by the impact.
        damage: u32,
    },
    /// Reports that a tower projectile expired without a live target.
    ProjectileExpired {
        /// Identifier of the expired projectile.
        projectile: ProjectileId,
    },
    /// Reports that an enemy projectile struck its target tower.
    EnemyProjectileHit {
        /// Identifier of the impacting projectile.
        projectile: EnemyProjectileId,
        /// Tower that absorbed the impact.
        target: TowerId,
        /// Damage applied by the impact.
        damage: u32,
    },
    /// Reports that an enemy projectile expired without a live target.
    EnemyProjectileExpired {
        /// Identifier of the expired projectile.
        projectile: EnemyProjectileId,
    },
    /// Confirms that a tower was placed into the world.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Cell occupied by the tower.
        cell: CellCoord,
        /// Hit points the tower was placed with.
        health: Health,
    },
    /// Confirms that a tower advanced to the next level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower reached.
        level: TowerLevel,
    },
    /// Reports that a tower was destroyed by enemy fire.
    TowerDestroyed {
        /// Identifier of the destroyed tower.
        tower: TowerId,
        /// Cell the tower previously occupied.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    PlacementRejected {
        /// Cell provided in the placement request.
        cell: CellCoord,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Reports that a tower upgrade request was rejected.
    UpgradeRejected {
        /// Identifier of the tower targeted for upgrade.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Announces that the defeat threshold was reached.
    MatchWon {
        /// Total number of enemies defeated.
        defeated: u32,
    },
    /// Announces that the life total reached zero.
    MatchLost,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an enemy projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyProjectileId(u32);

impl EnemyProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Converts the cell into a fractional point at the same cell indices.
    #[must_use]
    pub fn to_point(self) -> CellPoint {
        CellPoint::new(self.column as f32, self.row as f32)
    }
}

/// Fractional position expressed in cell units.
///
/// Enemies occupy whole cells; projectiles travel between them, so their
/// positions carry fractional cell coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellPoint {
    x: f32,
    y: f32,
}

impl CellPoint {
    /// Creates a new fractional cell position.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal coordinate measured in cell units.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical coordinate measured in cell units.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance between two fractional positions.
    #[must_use]
    pub fn distance_to(self, other: CellPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the position advanced `step` cell units toward `target`.
    ///
    /// A degenerate zero-length direction leaves the position unchanged so
    /// callers never divide by zero when a projectile overlaps its target.
    #[must_use]
    pub fn step_toward(self, target: CellPoint, step: f32) -> Self {
        let distance = self.distance_to(target);
        if distance <= f32::EPSILON {
            return self;
        }

        let dx = (target.x - self.x) / distance;
        let dy = (target.y - self.y) / distance;
        Self {
            x: self.x + dx * step,
            y: self.y + dy * step,
        }
    }
}

/// Hit-point pool tracked for enemies and towers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    maximum: u32,
}

impl Health {
    /// Creates a full pool with the provided maximum.
    #[must_use]
    pub const fn new(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    /// Hit points currently remaining.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Upper bound of the pool.
    #[must_use]
    pub const fn maximum(&self) -> u32 {
        self.maximum
    }

    /// Returns the pool after absorbing `amount` damage, saturating at zero.
    #[must_use]
    pub fn damaged(self, amount: u32) -> Self {
        Self {
            current: self.current.saturating_sub(amount),
            maximum: self.maximum,
        }
    }

    /// Reports whether the pool has been reduced to zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Upgrade levels a tower can reach, each with a fixed stat row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerLevel {
    /// Freshly placed tower.
    One,
    /// First upgrade.
    Two,
    /// Second upgrade.
    Three,
    /// Final upgrade.
    Four,
}

impl TowerLevel {
    /// Damage carried by projectiles the tower fires at this level.
    #[must_use]
    pub const fn damage(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 5,
        }
    }

    /// Euclidean targeting radius measured in cells.
    #[must_use]
    pub const fn range(self) -> f32 {
        match self {
            Self::One => 3.0,
            Self::Two => 3.5,
            Self::Three => 4.0,
            Self::Four => 5.0,
        }
    }

    /// Minimum number of ticks between two firings.
    #[must_use]
    pub const fn attack_interval(self) -> u64 {
        match self {
            Self::One => 30,
            Self::Two => 25,
            Self::Three => 20,
            Self::Four => 15,
        }
    }

    /// Money required to reach the next level, if one exists.
    #[must_use]
    pub const fn upgrade_cost(self) -> Option<u32> {
        match self {
            Self::One => Some(30),
            Self::Two => Some(50),
            Self::Three => Some(100),
            Self::Four => None,
        }
    }

    /// Level reached by a successful upgrade, if one exists.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::One => Some(Self::Two),
            Self::Two => Some(Self::Three),
            Self::Three => Some(Self::Four),
            Self::Four => None,
        }
    }

    /// One-based numeric rank used for display.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
        }
    }
}

/// Lifecycle of a match; `Won` and `Lost` are terminal and exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchStatus {
    /// The simulation is accepting ticks and intents.
    Running,
    /// The defeat threshold was reached.
    Won,
    /// The life total was exhausted.
    Lost,
}

impl MatchStatus {
    /// Reports whether the match has ended.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested cell lies beyond the configured grid bounds.
    OutOfBounds,
    /// The player cannot afford the placement cost.
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// The tower already sits at the final level.
    MaxLevel,
    /// The player cannot afford the upgrade cost.
    InsufficientFunds,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Fractional position exposed for display and projectile homing.
    pub position: CellPoint,
    /// Remaining hit points.
    pub health: Health,
    /// Indicates whether the next move evaluation is an attack turn.
    pub attack_armed: bool,
    /// Indicates whether the enemy holds a usable path step.
    pub has_next_step: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in identifier (spawn) order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Current upgrade level.
    pub level: TowerLevel,
    /// Remaining hit points.
    pub health: Health,
    /// Tick of the tower's most recent firing.
    pub last_attack_tick: u64,
}

/// Read-only snapshot describing all towers placed in the grid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view ordered by raster (row-major) position.
    ///
    /// Raster order is the deterministic scan order both for tower firing
    /// and for enemy counter-attack target selection.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| (snapshot.cell.row(), snapshot.cell.column()));
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in raster order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a tower projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Fractional position in cell units.
    pub position: CellPoint,
    /// Enemy the projectile is homing toward.
    pub target: EnemyId,
    /// Damage the projectile will apply on impact.
    pub damage: u32,
}

/// Immutable representation of an enemy projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProjectileSnapshot {
    /// Unique identifier assigned to the projectile.
    pub id: EnemyProjectileId,
    /// Fractional position in cell units.
    pub position: CellPoint,
    /// Tower the projectile is homing toward.
    pub target: TowerId,
}

/// Read-only snapshot describing all projectiles in flight.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProjectileView {
    tower_shots: Vec<ProjectileSnapshot>,
    enemy_shots: Vec<EnemyProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(
        mut tower_shots: Vec<ProjectileSnapshot>,
        mut enemy_shots: Vec<EnemyProjectileSnapshot>,
    ) -> Self {
        tower_shots.sort_by_key(|snapshot| snapshot.id);
        enemy_shots.sort_by_key(|snapshot| snapshot.id);
        Self {
            tower_shots,
            enemy_shots,
        }
    }

    /// Iterator over tower projectiles in identifier order.
    pub fn tower_shots(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.tower_shots.iter()
    }

    /// Iterator over enemy projectiles in identifier order.
    pub fn enemy_shots(&self) -> impl Iterator<Item = &EnemyProjectileSnapshot> {
        self.enemy_shots.iter()
    }
}

/// Aggregate match state exposed to display adapters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSnapshot {
    /// Value of the tick counter.
    pub tick: u64,
    /// Current lifecycle state.
    pub status: MatchStatus,
    /// Money available for placements and upgrades.
    pub money: u32,
    /// Remaining life total.
    pub life: u32,
    /// Cumulative defeated enemy count.
    pub defeated: u32,
    /// Defeat count required to win.
    pub win_threshold: u32,
}

#[cfg(test)]
mod tests {
    use super::{
        CellCoord, CellPoint, Health, MatchStatus, PlacementError, TowerId, TowerLevel,
        UpgradeError,
    };
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn level_table_matches_design() {
        let rows = [
            (TowerLevel::One, 1, 3.0, 30, Some(30)),
            (TowerLevel::Two, 2, 3.5, 25, Some(50)),
            (TowerLevel::Three, 3, 4.0, 20, Some(100)),
            (TowerLevel::Four, 5, 5.0, 15, None),
        ];

        for (level, damage, range, interval, cost) in rows {
            assert_eq!(level.damage(), damage);
            assert!((level.range() - range).abs() < f32::EPSILON);
            assert_eq!(level.attack_interval(), interval);
            assert_eq!(level.upgrade_cost(), cost);
        }
    }

    #[test]
    fn level_progression_terminates_at_four() {
        assert_eq!(TowerLevel::One.next(), Some(TowerLevel::Two));
        assert_eq!(TowerLevel::Three.next(), Some(TowerLevel::Four));
        assert_eq!(TowerLevel::Four.next(), None);
        assert_eq!(TowerLevel::Four.rank(), 4);
    }

    #[test]
    fn health_saturates_at_zero() {
        let health = Health::new(3);
        assert_eq!(health.current(), 3);
        assert_eq!(health.maximum(), 3);

        let damaged = health.damaged(5);
        assert!(damaged.is_depleted());
        assert_eq!(damaged.maximum(), 3);
    }

    #[test]
    fn step_toward_covers_exact_distance() {
        let start = CellPoint::new(0.0, 0.0);
        let target = CellPoint::new(3.0, 4.0);

        let moved = start.step_toward(target, 5.0);
        assert!(moved.distance_to(target) < 1e-4);
    }

    #[test]
    fn step_toward_is_stable_on_overlap() {
        let point = CellPoint::new(2.0, 2.0);
        assert_eq!(point.step_toward(point, 1.0), point);
    }

    #[test]
    fn terminal_states_are_recognised() {
        assert!(!MatchStatus::Running.is_terminal());
        assert!(MatchStatus::Won.is_terminal());
        assert!(MatchStatus::Lost.is_terminal());
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn tower_id_round_trips_through_bincode() {
        assert_round_trip(&TowerId::new(42));
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(5, 7));
    }

    #[test]
    fn tower_level_round_trips_through_bincode() {
        assert_round_trip(&TowerLevel::Three);
    }

    #[test]
    fn rejection_reasons_round_trip_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientFunds);
        assert_round_trip(&UpgradeError::MaxLevel);
    }

    #[test]
    fn match_status_round_trips_through_bincode() {
        assert_round_trip(&MatchStatus::Won);
    }
}
