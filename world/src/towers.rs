//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use grid_defence_core::{CellCoord, Health, TowerId, TowerLevel};

/// Mutable state of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Cell the tower occupies; immutable after placement.
    pub(crate) cell: CellCoord,
    /// Current upgrade level.
    pub(crate) level: TowerLevel,
    /// Remaining hit points.
    pub(crate) health: Health,
    /// Tick of the most recent firing; zero for a tower that never fired.
    pub(crate) last_attack_tick: u64,
    /// Marks the tower retired pending end-of-tick compaction.
    pub(crate) removed: bool,
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Removes every tower and resets identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = 0;
    }

    /// Allocates an identifier and stores a fresh level-one tower.
    pub(crate) fn insert(&mut self, cell: CellCoord, health: Health) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.saturating_add(1);
        let previous = self.entries.insert(
            id,
            TowerState {
                id,
                cell,
                level: TowerLevel::One,
                health,
                last_attack_tick: 0,
                removed: false,
            },
        );
        debug_assert!(previous.is_none(), "tower identifiers are never reused");
        id
    }

    /// Retrieves a tower unless it has been retired.
    pub(crate) fn get_live(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id).filter(|tower| !tower.removed)
    }

    /// Mutably retrieves a tower unless it has been retired.
    pub(crate) fn get_live_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id).filter(|tower| !tower.removed)
    }

    /// Iterator over live towers in identifier order.
    pub(crate) fn iter_live(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values().filter(|tower| !tower.removed)
    }

    /// Drops towers marked removed.
    pub(crate) fn compact(&mut self) {
        self.entries.retain(|_, tower| !tower.removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_allocates_sequential_identifiers() {
        let mut registry = TowerRegistry::new();
        let first = registry.insert(CellCoord::new(1, 1), Health::new(20));
        let second = registry.insert(CellCoord::new(2, 1), Health::new(20));

        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
        assert_eq!(registry.iter_live().count(), 2);
    }

    #[test]
    fn fresh_towers_start_at_level_one() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(CellCoord::new(3, 4), Health::new(25));

        let tower = registry.get_live(id).expect("tower should be live");
        assert_eq!(tower.level, TowerLevel::One);
        assert_eq!(tower.health, Health::new(25));
        assert_eq!(tower.last_attack_tick, 0);
    }

    #[test]
    fn removed_towers_are_hidden_until_compaction() {
        let mut registry = TowerRegistry::new();
        let id = registry.insert(CellCoord::new(0, 0), Health::new(20));

        registry
            .get_live_mut(id)
            .expect("tower should be live")
            .removed = true;

        assert!(registry.get_live(id).is_none());
        assert_eq!(registry.iter_live().count(), 0);

        registry.compact();
        assert!(registry.entries.is_empty());
    }

    #[test]
    fn clear_resets_identifier_allocation() {
        let mut registry = TowerRegistry::new();
        let _ = registry.insert(CellCoord::new(0, 0), Health::new(20));
        registry.clear();

        let id = registry.insert(CellCoord::new(1, 0), Health::new(20));
        assert_eq!(id.get(), 0);
    }
}
