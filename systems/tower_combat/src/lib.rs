#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that emits projectile firing commands for ready towers.
//!
//! A tower is ready when at least its attack interval has elapsed since its
//! last shot. The interval is measured against the tick the tower actually
//! fired on, so a tower that finds no target does not forfeit its readiness.

use grid_defence_core::{Command, EnemyId, EnemyView, Event, TowerSnapshot, TowerView};

/// Tower combat system that queues firing commands for ready towers.
#[derive(Debug, Default)]
pub struct TowerCombat;

impl TowerCombat {
    /// Creates a new tower combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Emits `Command::FireProjectile` entries for towers ready to fire.
    ///
    /// Towers are scanned in raster order and each one targets the first
    /// enemy in identifier (spawn) order within its level's range.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemies: &EnemyView,
        towers: &TowerView,
        out: &mut Vec<Command>,
    ) {
        let Some(tick) = events.iter().find_map(|event| match event {
            Event::TickAdvanced { tick } => Some(*tick),
            _ => None,
        }) else {
            return;
        };

        for tower in towers.iter() {
            if tick.saturating_sub(tower.last_attack_tick) < tower.level.attack_interval() {
                continue;
            }
            let Some(target) = first_enemy_in_range(tower, enemies) else {
                continue;
            };
            out.push(Command::FireProjectile {
                tower: tower.id,
                target,
            });
        }
    }
}

fn first_enemy_in_range(tower: &TowerSnapshot, enemies: &EnemyView) -> Option<EnemyId> {
    let origin = tower.cell.to_point();
    enemies
        .iter()
        .find(|enemy| enemy.position.distance_to(origin) <= tower.level.range())
        .map(|enemy| enemy.id)
}
