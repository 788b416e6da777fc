#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Grid Defence.
//!
//! The world owns every piece of match state and mutates it exclusively
//! through [`apply`]. Systems and adapters observe the world through the
//! read-only functions in [`query`] and the events emitted by [`apply`].

use std::collections::{BTreeMap, VecDeque};

use grid_defence_core::{
    CellCoord, CellPoint, Command, EnemyId, EnemyProjectileId, EnemySnapshot, EnemyView, Event,
    Health, MatchSnapshot, MatchStatus, PlacementError, ProjectileId, ProjectileSnapshot,
    ProjectileView, TowerId, TowerSnapshot, TowerView, UpgradeError, BOUNTY, CELL_LENGTH,
    ENEMY_BASE_HP, ENEMY_HP_STEP, ENEMY_HP_STEP_EVERY, ENEMY_PROJECTILE_DAMAGE, IMPACT_EPSILON,
    PLACEMENT_COST, PROJECTILE_SPEED, STARTING_LIFE, TOWER_BASE_HP, TOWER_HP_CAP, WIN_THRESHOLD,
};

mod navigation;
mod towers;

use navigation::PathPlanner;
use towers::TowerRegistry;

const DEFAULT_GRID_COLUMNS: u32 = 20;
const DEFAULT_GRID_ROWS: u32 = 15;
const DEFAULT_INITIAL_MONEY: u32 = 100;

/// Authoritative state for a single match.
#[derive(Debug)]
pub struct World {
    columns: u32,
    rows: u32,
    spawn: CellCoord,
    goal: CellCoord,
    status: MatchStatus,
    tick_index: u64,
    money: u32,
    life: u32,
    defeated: u32,
    enemy_hp_baseline: u32,
    tower_hp_baseline: u32,
    occupancy: OccupancyGrid,
    towers: TowerRegistry,
    enemies: BTreeMap<EnemyId, Enemy>,
    next_enemy_id: u32,
    projectiles: BTreeMap<ProjectileId, Projectile>,
    next_projectile_id: u32,
    enemy_projectiles: BTreeMap<EnemyProjectileId, EnemyProjectile>,
    next_enemy_projectile_id: u32,
    planner: PathPlanner,
    path_scratch: Vec<CellCoord>,
}

impl World {
    /// Creates a world running a fresh match over the default grid.
    #[must_use]
    pub fn new() -> Self {
        let mut world = Self {
            columns: 0,
            rows: 0,
            spawn: CellCoord::new(0, 0),
            goal: CellCoord::new(0, 0),
            status: MatchStatus::Running,
            tick_index: 0,
            money: 0,
            life: 0,
            defeated: 0,
            enemy_hp_baseline: ENEMY_BASE_HP,
            tower_hp_baseline: TOWER_BASE_HP,
            occupancy: OccupancyGrid::new(0, 0),
            towers: TowerRegistry::new(),
            enemies: BTreeMap::new(),
            next_enemy_id: 0,
            projectiles: BTreeMap::new(),
            next_projectile_id: 0,
            enemy_projectiles: BTreeMap::new(),
            next_enemy_projectile_id: 0,
            planner: PathPlanner::default(),
            path_scratch: Vec::new(),
        };
        world.reset(DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS, DEFAULT_INITIAL_MONEY);
        world
    }

    fn reset(&mut self, columns: u32, rows: u32, initial_money: u32) {
        let columns = columns.max(1);
        let rows = rows.max(1);

        self.columns = columns;
        self.rows = rows;
        self.spawn = CellCoord::new(columns - 1, 0);
        self.goal = CellCoord::new(0, rows - 1);
        self.status = MatchStatus::Running;
        self.tick_index = 0;
        self.money = initial_money;
        self.life = STARTING_LIFE;
        self.defeated = 0;
        self.enemy_hp_baseline = ENEMY_BASE_HP;
        self.tower_hp_baseline = TOWER_BASE_HP;
        self.occupancy = OccupancyGrid::new(columns, rows);
        self.towers.clear();
        self.enemies.clear();
        self.next_enemy_id = 0;
        self.projectiles.clear();
        self.next_projectile_id = 0;
        self.enemy_projectiles.clear();
        self.next_enemy_projectile_id = 0;
        self.path_scratch.clear();
    }

    fn spawn_enemy(&mut self, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.saturating_add(1);

        let health = Health::new(self.enemy_hp_baseline);
        let _ = self.enemies.insert(
            id,
            Enemy {
                cell: self.spawn,
                health,
                path: VecDeque::new(),
                needs_path: true,
                attack_armed: false,
                removed: false,
            },
        );
        out_events.push(Event::EnemySpawned {
            enemy: id,
            cell: self.spawn,
            health,
        });
    }

    /// Runs one move evaluation: toggles the attack flag and advances the
    /// enemy one step along its path, recomputing the path first when a grid
    /// mutation invalidated it. An enemy with no usable path stays in place.
    fn step_enemy(&mut self, enemy_id: EnemyId, out_events: &mut Vec<Event>) {
        let goal = self.goal;
        let columns = self.columns;
        let rows = self.rows;

        let Some(enemy) = self.enemies.get_mut(&enemy_id).filter(|enemy| !enemy.removed) else {
            return;
        };
        enemy.attack_armed = !enemy.attack_armed;

        if enemy.needs_path {
            let cell = enemy.cell;
            let occupancy = &self.occupancy;
            self.planner.find_path(
                columns,
                rows,
                cell,
                goal,
                |candidate| occupancy.is_blocked(candidate),
                &mut self.path_scratch,
            );

            let Some(enemy) = self.enemies.get_mut(&enemy_id) else {
                return;
            };
            enemy.path.clear();
            // The planner's first cell is the one the enemy already stands on.
            enemy.path.extend(self.path_scratch.iter().copied().skip(1));
            enemy.needs_path = false;
        }

        let Some(enemy) = self.enemies.get_mut(&enemy_id) else {
            return;
        };
        let Some(next) = enemy.path.pop_front() else {
            return;
        };
        let from = enemy.cell;
        enemy.cell = next;
        out_events.push(Event::EnemyAdvanced {
            enemy: enemy_id,
            from,
            to: next,
        });

        if next != goal {
            return;
        }

        let Some(enemy) = self.enemies.get_mut(&enemy_id) else {
            return;
        };
        enemy.removed = true;
        self.life = self.life.saturating_sub(1);
        out_events.push(Event::EnemyEscaped {
            enemy: enemy_id,
            life_remaining: self.life,
        });
        if self.life == 0 {
            self.status = MatchStatus::Lost;
            out_events.push(Event::MatchLost);
        }
    }

    /// Runs one attack evaluation: toggles the attack flag and launches an
    /// enemy projectile at the tower. The enemy does not move this turn.
    fn counter_attack(&mut self, enemy_id: EnemyId, tower_id: TowerId, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(&enemy_id).filter(|enemy| !enemy.removed) else {
            return;
        };
        enemy.attack_armed = !enemy.attack_armed;
        let position = enemy.cell.to_point();

        if self.towers.get_live(tower_id).is_none() {
            return;
        }

        let id = EnemyProjectileId::new(self.next_enemy_projectile_id);
        self.next_enemy_projectile_id = self.next_enemy_projectile_id.saturating_add(1);
        let _ = self.enemy_projectiles.insert(
            id,
            EnemyProjectile {
                position,
                target: tower_id,
                removed: false,
            },
        );
        out_events.push(Event::CounterAttackFired {
            enemy: enemy_id,
            tower: tower_id,
            projectile: id,
        });
    }

    fn fire_projectile(&mut self, tower_id: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if !self
            .enemies
            .get(&target)
            .is_some_and(|enemy| !enemy.removed)
        {
            return;
        }

        let tick = self.tick_index;
        let Some(tower) = self.towers.get_live_mut(tower_id) else {
            return;
        };
        tower.last_attack_tick = tick;
        let damage = tower.level.damage();
        let position = tower.cell.to_point();

        let id = ProjectileId::new(self.next_projectile_id);
        self.next_projectile_id = self.next_projectile_id.saturating_add(1);
        let _ = self.projectiles.insert(
            id,
            Projectile {
                position,
                target,
                damage,
                removed: false,
            },
        );
        out_events.push(Event::ProjectileFired {
            tower: tower_id,
            target,
            projectile: id,
        });
    }

    /// Moves every live projectile one step toward its target's current
    /// position and resolves impacts. A projectile whose target is already
    /// gone expires without effect.
    fn advance_projectiles(&mut self, out_events: &mut Vec<Event>) {
        let step = PROJECTILE_SPEED / CELL_LENGTH;

        let tower_shot_ids: Vec<ProjectileId> = self.projectiles.keys().copied().collect();
        for id in tower_shot_ids {
            let Some(target_id) = self
                .projectiles
                .get(&id)
                .filter(|projectile| !projectile.removed)
                .map(|projectile| projectile.target)
            else {
                continue;
            };
            let target_position = self
                .enemies
                .get(&target_id)
                .filter(|enemy| !enemy.removed)
                .map(|enemy| enemy.cell.to_point());

            let Some(projectile) = self.projectiles.get_mut(&id) else {
                continue;
            };
            let Some(target_position) = target_position else {
                projectile.removed = true;
                out_events.push(Event::ProjectileExpired { projectile: id });
                continue;
            };

            projectile.position = projectile.position.step_toward(target_position, step);
            if projectile.position.distance_to(target_position) > IMPACT_EPSILON {
                continue;
            }
            let damage = projectile.damage;
            projectile.removed = true;
            out_events.push(Event::ProjectileHit {
                projectile: id,
                target: target_id,
                damage,
            });
            self.damage_enemy(target_id, damage, out_events);
        }

        let enemy_shot_ids: Vec<EnemyProjectileId> =
            self.enemy_projectiles.keys().copied().collect();
        for id in enemy_shot_ids {
            let Some(target_id) = self
                .enemy_projectiles
                .get(&id)
                .filter(|projectile| !projectile.removed)
                .map(|projectile| projectile.target)
            else {
                continue;
            };
            let target_position = self
                .towers
                .get_live(target_id)
                .map(|tower| tower.cell.to_point());

            let Some(projectile) = self.enemy_projectiles.get_mut(&id) else {
                continue;
            };
            let Some(target_position) = target_position else {
                projectile.removed = true;
                out_events.push(Event::EnemyProjectileExpired { projectile: id });
                continue;
            };

            projectile.position = projectile.position.step_toward(target_position, step);
            if projectile.position.distance_to(target_position) > IMPACT_EPSILON {
                continue;
            }
            projectile.removed = true;
            out_events.push(Event::EnemyProjectileHit {
                projectile: id,
                target: target_id,
                damage: ENEMY_PROJECTILE_DAMAGE,
            });
            self.damage_tower(target_id, ENEMY_PROJECTILE_DAMAGE, out_events);
        }
    }

    fn damage_enemy(&mut self, enemy_id: EnemyId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(enemy) = self.enemies.get_mut(&enemy_id).filter(|enemy| !enemy.removed) else {
            return;
        };
        enemy.health = enemy.health.damaged(amount);
        if !enemy.health.is_depleted() {
            return;
        }
        enemy.removed = true;

        self.money = self.money.saturating_add(BOUNTY);
        self.defeated = self.defeated.saturating_add(1);
        self.tower_hp_baseline = self.tower_hp_baseline.saturating_add(1).min(TOWER_HP_CAP);
        if self.defeated % ENEMY_HP_STEP_EVERY == 0 {
            self.enemy_hp_baseline = self.enemy_hp_baseline.saturating_add(ENEMY_HP_STEP);
        }
        out_events.push(Event::EnemyDefeated {
            enemy: enemy_id,
            bounty: BOUNTY,
            defeated: self.defeated,
        });

        if self.defeated >= WIN_THRESHOLD && self.status == MatchStatus::Running {
            self.status = MatchStatus::Won;
            out_events.push(Event::MatchWon {
                defeated: self.defeated,
            });
        }
    }

    fn damage_tower(&mut self, tower_id: TowerId, amount: u32, out_events: &mut Vec<Event>) {
        let Some(tower) = self.towers.get_live_mut(tower_id) else {
            return;
        };
        tower.health = tower.health.damaged(amount);
        if !tower.health.is_depleted() {
            return;
        }
        let cell = tower.cell;
        tower.removed = true;

        // A destroyed tower may reopen a shorter route.
        self.occupancy.vacate(cell);
        self.invalidate_paths();
        out_events.push(Event::TowerDestroyed {
            tower: tower_id,
            cell,
        });
    }

    fn place_or_upgrade(&mut self, cell: CellCoord, out_events: &mut Vec<Event>) {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::OutOfBounds,
            });
            return;
        }

        if let Some(tower_id) = self.occupancy.tower_at(cell) {
            let Some(tower) = self.towers.get_live_mut(tower_id) else {
                return;
            };
            let (Some(next_level), Some(cost)) = (tower.level.next(), tower.level.upgrade_cost())
            else {
                out_events.push(Event::UpgradeRejected {
                    tower: tower_id,
                    reason: UpgradeError::MaxLevel,
                });
                return;
            };
            if self.money < cost {
                out_events.push(Event::UpgradeRejected {
                    tower: tower_id,
                    reason: UpgradeError::InsufficientFunds,
                });
                return;
            }
            self.money -= cost;
            tower.level = next_level;
            out_events.push(Event::TowerUpgraded {
                tower: tower_id,
                level: next_level,
            });
            return;
        }

        if self.money < PLACEMENT_COST {
            out_events.push(Event::PlacementRejected {
                cell,
                reason: PlacementError::InsufficientFunds,
            });
            return;
        }
        self.money -= PLACEMENT_COST;
        let health = Health::new(self.tower_hp_baseline);
        let id = self.towers.insert(cell, health);
        self.occupancy.occupy(id, cell);
        self.invalidate_paths();
        out_events.push(Event::TowerPlaced {
            tower: id,
            cell,
            health,
        });
    }

    /// Clears every live enemy's path so the next move evaluation replans
    /// from the enemy's current cell.
    fn invalidate_paths(&mut self) {
        for enemy in self.enemies.values_mut().filter(|enemy| !enemy.removed) {
            enemy.path.clear();
            enemy.needs_path = true;
        }
    }

    fn end_tick(&mut self) {
        self.towers.compact();
        self.enemies.retain(|_, enemy| !enemy.removed);
        self.projectiles.retain(|_, projectile| !projectile.removed);
        self.enemy_projectiles
            .retain(|_, projectile| !projectile.removed);
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies a command to the world, appending resulting events to
/// `out_events`.
///
/// Once the match reaches a terminal status every command except
/// [`Command::StartMatch`] is ignored.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    if world.status.is_terminal() && !matches!(command, Command::StartMatch { .. }) {
        return;
    }

    match command {
        Command::StartMatch {
            columns,
            rows,
            initial_money,
        } => world.reset(columns, rows, initial_money),
        Command::Tick => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TickAdvanced {
                tick: world.tick_index,
            });
        }
        Command::SpawnEnemy => world.spawn_enemy(out_events),
        Command::StepEnemy { enemy } => world.step_enemy(enemy, out_events),
        Command::CounterAttack { enemy, tower } => world.counter_attack(enemy, tower, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceProjectiles => world.advance_projectiles(out_events),
        Command::PlaceOrUpgradeTower { cell } => world.place_or_upgrade(cell, out_events),
        Command::EndTick => world.end_tick(),
    }
}

/// Read-only world queries used by systems and adapters.
pub mod query {
    use super::{
        CellCoord, EnemySnapshot, EnemyView, MatchSnapshot, ProjectileSnapshot, ProjectileView,
        TowerId, TowerSnapshot, TowerView, World, WIN_THRESHOLD,
    };
    use grid_defence_core::EnemyProjectileSnapshot;

    /// Captures all live enemies in identifier (spawn) order.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .filter(|(_, enemy)| !enemy.removed)
            .map(|(id, enemy)| EnemySnapshot {
                id: *id,
                cell: enemy.cell,
                position: enemy.cell.to_point(),
                health: enemy.health,
                attack_armed: enemy.attack_armed,
                has_next_step: !enemy.path.is_empty(),
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures all live towers in raster (row-major) order.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots: Vec<TowerSnapshot> = world
            .towers
            .iter_live()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                cell: tower.cell,
                level: tower.level,
                health: tower.health,
                last_attack_tick: tower.last_attack_tick,
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures all projectiles in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        let tower_shots: Vec<ProjectileSnapshot> = world
            .projectiles
            .iter()
            .filter(|(_, projectile)| !projectile.removed)
            .map(|(id, projectile)| ProjectileSnapshot {
                id: *id,
                position: projectile.position,
                target: projectile.target,
                damage: projectile.damage,
            })
            .collect();
        let enemy_shots: Vec<EnemyProjectileSnapshot> = world
            .enemy_projectiles
            .iter()
            .filter(|(_, projectile)| !projectile.removed)
            .map(|(id, projectile)| EnemyProjectileSnapshot {
                id: *id,
                position: projectile.position,
                target: projectile.target,
            })
            .collect();
        ProjectileView::from_snapshots(tower_shots, enemy_shots)
    }

    /// Captures the aggregate match state.
    #[must_use]
    pub fn match_snapshot(world: &World) -> MatchSnapshot {
        MatchSnapshot {
            tick: world.tick_index,
            status: world.status,
            money: world.money,
            life: world.life,
            defeated: world.defeated,
            win_threshold: WIN_THRESHOLD,
        }
    }

    /// Reports the tower occupying a cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: CellCoord) -> Option<TowerId> {
        world.occupancy.tower_at(cell)
    }

    /// Reports whether a cell is blocked for enemy movement.
    #[must_use]
    pub fn is_blocked(world: &World, cell: CellCoord) -> bool {
        world.occupancy.is_blocked(cell)
    }

    /// Reports the grid dimensions as `(columns, rows)`.
    #[must_use]
    pub fn grid_dimensions(world: &World) -> (u32, u32) {
        (world.columns, world.rows)
    }

    /// Reports the cell where enemies enter the grid.
    #[must_use]
    pub fn spawn_cell(world: &World) -> CellCoord {
        world.spawn
    }

    /// Reports the cell enemies try to reach.
    #[must_use]
    pub fn goal_cell(world: &World) -> CellCoord {
        world.goal
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    cell: CellCoord,
    health: Health,
    path: VecDeque<CellCoord>,
    needs_path: bool,
    attack_armed: bool,
    removed: bool,
}

#[derive(Clone, Copy, Debug)]
struct Projectile {
    position: CellPoint,
    target: EnemyId,
    damage: u32,
    removed: bool,
}

#[derive(Clone, Copy, Debug)]
struct EnemyProjectile {
    position: CellPoint,
    target: TowerId,
    removed: bool,
}

#[derive(Debug)]
struct OccupancyGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Option<TowerId>>,
}

impl OccupancyGrid {
    fn new(columns: u32, rows: u32) -> Self {
        let cell_count = usize::try_from(columns)
            .ok()
            .and_then(|columns| usize::try_from(rows).ok().map(|rows| columns * rows))
            .unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![None; cell_count],
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let column = usize::try_from(cell.column()).ok()?;
        let row = usize::try_from(cell.row()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }

    fn occupy(&mut self, tower_id: TowerId, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = Some(tower_id);
        }
    }

    fn vacate(&mut self, cell: CellCoord) {
        if let Some(index) = self.index(cell) {
            self.cells[index] = None;
        }
    }

    fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.index(cell).and_then(|index| self.cells[index])
    }

    fn is_blocked(&self, cell: CellCoord) -> bool {
        self.tower_at(cell).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grid_defence_core::TowerLevel;

    fn start(columns: u32, rows: u32, initial_money: u32) -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StartMatch {
                columns,
                rows,
                initial_money,
            },
            &mut events,
        );
        world
    }

    fn place(world: &mut World, column: u32, row: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceOrUpgradeTower {
                cell: CellCoord::new(column, row),
            },
            &mut events,
        );
        events
    }

    fn spawn(world: &mut World) -> EnemyId {
        let mut events = Vec::new();
        apply(world, Command::SpawnEnemy, &mut events);
        match events.as_slice() {
            [Event::EnemySpawned { enemy, .. }] => *enemy,
            other => panic!("expected spawn event, got {other:?}"),
        }
    }

    fn step(world: &mut World, enemy: EnemyId) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::StepEnemy { enemy }, &mut events);
        events
    }

    fn enemy_cell(world: &World, enemy: EnemyId) -> Option<CellCoord> {
        query::enemy_view(world)
            .iter()
            .find(|snapshot| snapshot.id == enemy)
            .map(|snapshot| snapshot.cell)
    }

    // Fires enough point-blank projectiles at an enemy parked on the tower's
    // cell to destroy it in a single resolution pass.
    fn destroy_enemy(world: &mut World, tower: TowerId, enemy: EnemyId) -> Vec<Event> {
        let hp = query::enemy_view(world)
            .iter()
            .find(|snapshot| snapshot.id == enemy)
            .map(|snapshot| snapshot.health.current())
            .unwrap_or(0);
        let mut events = Vec::new();
        for _ in 0..hp {
            apply(
                world,
                Command::FireProjectile { tower, target: enemy },
                &mut events,
            );
        }
        events.clear();
        apply(world, Command::AdvanceProjectiles, &mut events);
        events
    }

    #[test]
    fn start_match_resets_state() {
        let world = start(8, 6, 150);
        let snapshot = query::match_snapshot(&world);

        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.status, MatchStatus::Running);
        assert_eq!(snapshot.money, 150);
        assert_eq!(snapshot.life, STARTING_LIFE);
        assert_eq!(snapshot.defeated, 0);
        assert_eq!(query::grid_dimensions(&world), (8, 6));
        assert_eq!(query::spawn_cell(&world), CellCoord::new(7, 0));
        assert_eq!(query::goal_cell(&world), CellCoord::new(0, 5));
    }

    #[test]
    fn tick_advances_the_clock() {
        let mut world = start(4, 4, 100);
        let mut events = Vec::new();
        apply(&mut world, Command::Tick, &mut events);
        apply(&mut world, Command::Tick, &mut events);

        assert_eq!(
            events,
            vec![
                Event::TickAdvanced { tick: 1 },
                Event::TickAdvanced { tick: 2 }
            ]
        );
        assert_eq!(query::match_snapshot(&world).tick, 2);
    }

    #[test]
    fn placement_deducts_cost_and_occupies_cell() {
        let mut world = start(6, 6, 100);
        let events = place(&mut world, 2, 3);

        let cell = CellCoord::new(2, 3);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlaced { cell: placed, .. }] if *placed == cell
        ));
        assert_eq!(query::match_snapshot(&world).money, 100 - PLACEMENT_COST);
        assert!(query::tower_at(&world, cell).is_some());
        assert!(query::is_blocked(&world, cell));
    }

    #[test]
    fn placement_rejected_when_funds_are_short() {
        let mut world = start(6, 6, PLACEMENT_COST - 1);
        let events = place(&mut world, 1, 1);

        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::InsufficientFunds,
                ..
            }]
        ));
        assert_eq!(query::match_snapshot(&world).money, PLACEMENT_COST - 1);
        assert!(query::tower_at(&world, CellCoord::new(1, 1)).is_none());
    }

    #[test]
    fn placement_rejected_outside_the_grid() {
        let mut world = start(6, 6, 100);
        let events = place(&mut world, 6, 0);

        assert!(matches!(
            events.as_slice(),
            [Event::PlacementRejected {
                reason: PlacementError::OutOfBounds,
                ..
            }]
        ));
        assert_eq!(query::match_snapshot(&world).money, 100);
    }

    #[test]
    fn placing_on_an_occupied_cell_upgrades_the_tower() {
        let mut world = start(6, 6, 100);
        let _ = place(&mut world, 2, 2);
        let events = place(&mut world, 2, 2);

        assert!(matches!(
            events.as_slice(),
            [Event::TowerUpgraded {
                level: TowerLevel::Two,
                ..
            }]
        ));
        assert_eq!(query::match_snapshot(&world).money, 100 - 25 - 30);

        let view = query::tower_view(&world);
        let tower = view.iter().next().expect("tower should exist");
        assert_eq!(tower.level, TowerLevel::Two);
    }

    #[test]
    fn upgrades_stop_at_the_maximum_level() {
        let mut world = start(6, 6, 300);
        for _ in 0..4 {
            let _ = place(&mut world, 2, 2);
        }
        assert_eq!(query::match_snapshot(&world).money, 300 - 25 - 30 - 50 - 100);

        let events = place(&mut world, 2, 2);
        assert!(matches!(
            events.as_slice(),
            [Event::UpgradeRejected {
                reason: UpgradeError::MaxLevel,
                ..
            }]
        ));
        assert_eq!(query::match_snapshot(&world).money, 95);
    }

    #[test]
    fn upgrade_rejected_when_funds_are_short() {
        let mut world = start(6, 6, 40);
        let _ = place(&mut world, 2, 2);
        let events = place(&mut world, 2, 2);

        assert!(matches!(
            events.as_slice(),
            [Event::UpgradeRejected {
                reason: UpgradeError::InsufficientFunds,
                ..
            }]
        ));
        assert_eq!(query::match_snapshot(&world).money, 15);
    }

    #[test]
    fn step_evaluations_alternate_the_attack_flag() {
        let mut world = start(4, 4, 100);
        let enemy = spawn(&mut world);

        let armed = |world: &World| {
            query::enemy_view(world)
                .iter()
                .next()
                .map(|snapshot| snapshot.attack_armed)
        };
        assert_eq!(armed(&world), Some(false));

        let _ = step(&mut world, enemy);
        assert_eq!(armed(&world), Some(true));
        let _ = step(&mut world, enemy);
        assert_eq!(armed(&world), Some(false));
    }

    #[test]
    fn enemy_walks_to_the_goal_and_escapes() {
        let mut world = start(2, 2, 100);
        let enemy = spawn(&mut world);
        assert_eq!(enemy_cell(&world, enemy), Some(CellCoord::new(1, 0)));

        let _ = step(&mut world, enemy);
        let events = step(&mut world, enemy);

        assert!(events.contains(&Event::EnemyEscaped {
            enemy,
            life_remaining: STARTING_LIFE - 1
        }));
        assert_eq!(query::match_snapshot(&world).life, STARTING_LIFE - 1);

        let mut events = Vec::new();
        apply(&mut world, Command::EndTick, &mut events);
        assert_eq!(query::enemy_view(&world).iter().count(), 0);
    }

    #[test]
    fn match_is_lost_when_life_runs_out() {
        let mut world = start(1, 2, 100);
        for index in 0..STARTING_LIFE {
            let enemy = spawn(&mut world);
            let events = step(&mut world, enemy);
            if index == STARTING_LIFE - 1 {
                assert!(events.contains(&Event::MatchLost));
            }
        }
        assert_eq!(query::match_snapshot(&world).status, MatchStatus::Lost);

        // Terminal matches ignore further commands.
        let money_before = query::match_snapshot(&world).money;
        let events = place(&mut world, 0, 0);
        assert!(events.is_empty());
        assert_eq!(query::match_snapshot(&world).money, money_before);
    }

    #[test]
    fn point_blank_projectiles_resolve_in_one_pass() {
        let mut world = start(4, 4, 100);
        let _ = place(&mut world, 3, 0);
        let tower = query::tower_at(&world, CellCoord::new(3, 0)).expect("tower placed");
        let enemy = spawn(&mut world);

        let events = destroy_enemy(&mut world, tower, enemy);
        assert!(events.contains(&Event::EnemyDefeated {
            enemy,
            bounty: BOUNTY,
            defeated: 1
        }));
        let snapshot = query::match_snapshot(&world);
        assert_eq!(snapshot.defeated, 1);
        assert_eq!(snapshot.money, 100 - PLACEMENT_COST + BOUNTY);
    }

    #[test]
    fn projectiles_without_a_live_target_expire() {
        let mut world = start(4, 4, 100);
        let _ = place(&mut world, 3, 0);
        let tower = query::tower_at(&world, CellCoord::new(3, 0)).expect("tower placed");
        let enemy = spawn(&mut world);

        // One projectile more than the enemy can absorb.
        let hp = ENEMY_BASE_HP;
        let mut events = Vec::new();
        for _ in 0..=hp {
            apply(
                &mut world,
                Command::FireProjectile { tower, target: enemy },
                &mut events,
            );
        }
        events.clear();
        apply(&mut world, Command::AdvanceProjectiles, &mut events);

        let expirations = events
            .iter()
            .filter(|event| matches!(event, Event::ProjectileExpired { .. }))
            .count();
        assert_eq!(expirations, 1);
    }

    #[test]
    fn defeats_ratchet_tower_and_enemy_hit_points() {
        let mut world = start(4, 4, 500);
        let _ = place(&mut world, 3, 0);
        let tower = query::tower_at(&world, CellCoord::new(3, 0)).expect("tower placed");

        for kill in 1..=ENEMY_HP_STEP_EVERY {
            let enemy = spawn(&mut world);
            let expected_hp = ENEMY_BASE_HP;
            let view = query::enemy_view(&world);
            let snapshot = view
                .iter()
                .find(|snapshot| snapshot.id == enemy)
                .expect("enemy spawned");
            assert_eq!(snapshot.health.maximum(), expected_hp, "kill {kill}");
            let _ = destroy_enemy(&mut world, tower, enemy);
        }

        // The fifth defeat raises the enemy baseline.
        let enemy = spawn(&mut world);
        let view = query::enemy_view(&world);
        let snapshot = view
            .iter()
            .find(|snapshot| snapshot.id == enemy)
            .expect("enemy spawned");
        assert_eq!(snapshot.health.maximum(), ENEMY_BASE_HP + ENEMY_HP_STEP);

        // Each defeat raises the tower baseline by one.
        let _ = place(&mut world, 0, 0);
        let view = query::tower_view(&world);
        let fresh = view
            .iter()
            .find(|snapshot| snapshot.cell == CellCoord::new(0, 0))
            .expect("tower placed");
        assert_eq!(
            fresh.health.maximum(),
            TOWER_BASE_HP + ENEMY_HP_STEP_EVERY
        );
    }

    #[test]
    fn counter_attacks_destroy_towers_and_free_the_cell() {
        let mut world = start(4, 4, 100);
        let cell = CellCoord::new(3, 0);
        let _ = place(&mut world, 3, 0);
        let tower = query::tower_at(&world, cell).expect("tower placed");
        let enemy = spawn(&mut world);

        let mut destroyed = false;
        for _ in 0..TOWER_BASE_HP {
            let mut events = Vec::new();
            apply(
                &mut world,
                Command::CounterAttack { enemy, tower },
                &mut events,
            );
            assert!(events
                .iter()
                .any(|event| matches!(event, Event::CounterAttackFired { .. })));
            events.clear();
            apply(&mut world, Command::AdvanceProjectiles, &mut events);
            if events.contains(&Event::TowerDestroyed { tower, cell }) {
                destroyed = true;
            }
        }
        assert!(destroyed);
        assert!(query::tower_at(&world, cell).is_none());

        // The freed cell accepts a fresh placement rather than an upgrade.
        let events = place(&mut world, 3, 0);
        assert!(matches!(events.as_slice(), [Event::TowerPlaced { .. }]));
    }

    #[test]
    fn placement_reroutes_an_enemy_mid_walk() {
        let mut world = start(3, 3, 100);
        let enemy = spawn(&mut world);

        let _ = step(&mut world, enemy);
        let first = enemy_cell(&world, enemy).expect("enemy alive");

        // Block the straight continuation; the enemy must replan around it.
        let blocked = CellCoord::new(first.column(), first.row() + 1);
        let _ = place(&mut world, blocked.column(), blocked.row());

        let mut visited = Vec::new();
        for _ in 0..8 {
            let events = step(&mut world, enemy);
            for event in &events {
                if let Event::EnemyAdvanced { to, .. } = event {
                    visited.push(*to);
                }
            }
            if events
                .iter()
                .any(|event| matches!(event, Event::EnemyEscaped { .. }))
            {
                break;
            }
        }

        assert!(!visited.contains(&blocked));
        assert_eq!(visited.last().copied(), Some(CellCoord::new(0, 2)));
    }

    #[test]
    fn fully_enclosed_enemy_stays_in_place() {
        let mut world = start(3, 3, 100);
        let enemy = spawn(&mut world);
        // Wall off the spawn corner.
        let _ = place(&mut world, 1, 0);
        let _ = place(&mut world, 2, 1);

        for _ in 0..4 {
            let events = step(&mut world, enemy);
            assert!(!events
                .iter()
                .any(|event| matches!(event, Event::EnemyAdvanced { .. })));
        }
        assert_eq!(enemy_cell(&world, enemy), Some(CellCoord::new(2, 0)));
    }

    #[test]
    fn destroying_a_wall_restores_the_route() {
        let mut world = start(3, 3, 100);
        let enemy = spawn(&mut world);
        let _ = place(&mut world, 1, 0);
        let _ = place(&mut world, 2, 1);

        let events = step(&mut world, enemy);
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::EnemyAdvanced { .. })));

        let wall = CellCoord::new(2, 1);
        let tower = query::tower_at(&world, wall).expect("wall tower placed");
        let mut destroyed = false;
        for _ in 0..TOWER_BASE_HP {
            let mut events = Vec::new();
            apply(
                &mut world,
                Command::CounterAttack { enemy, tower },
                &mut events,
            );
            apply(&mut world, Command::AdvanceProjectiles, &mut events);
            if events.contains(&Event::TowerDestroyed { tower, cell: wall }) {
                destroyed = true;
            }
        }
        assert!(destroyed);

        // The next evaluation replans through the reopened cell.
        let events = step(&mut world, enemy);
        assert!(events.contains(&Event::EnemyAdvanced {
            enemy,
            from: CellCoord::new(2, 0),
            to: wall,
        }));
        assert_eq!(enemy_cell(&world, enemy), Some(wall));
    }

    #[test]
    fn match_is_won_at_the_defeat_threshold() {
        let mut world = start(4, 4, 100);
        let _ = place(&mut world, 3, 0);
        let tower = query::tower_at(&world, CellCoord::new(3, 0)).expect("tower placed");

        let mut won = false;
        for _ in 0..WIN_THRESHOLD {
            let enemy = spawn(&mut world);
            let events = destroy_enemy(&mut world, tower, enemy);
            if events.contains(&Event::MatchWon {
                defeated: WIN_THRESHOLD,
            }) {
                won = true;
            }
        }
        assert!(won);
        assert_eq!(query::match_snapshot(&world).status, MatchStatus::Won);

        // Terminal matches ignore further commands.
        let mut events = Vec::new();
        apply(&mut world, Command::SpawnEnemy, &mut events);
        assert!(events.is_empty());
    }
}
