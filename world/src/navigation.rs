//! Shortest-path planner used by the world crate.

use std::collections::VecDeque;

use grid_defence_core::CellCoord;

const UNVISITED: u32 = u32::MAX;

/// Breadth-first path planner with reusable scratch buffers.
///
/// Paths are computed under 4-directional movement with unit step cost,
/// treating blocked cells as impassable. An unreachable goal produces an
/// empty path so callers can treat "cannot advance" as ordinary state
/// rather than an error.
#[derive(Clone, Debug, Default)]
pub(crate) struct PathPlanner {
    width: u32,
    height: u32,
    parents: Vec<u32>,
    frontier: VecDeque<CellCoord>,
}

impl PathPlanner {
    /// Computes the shortest path from `start` to `goal` into `out`.
    ///
    /// The output always begins with `start` and ends with `goal` when a
    /// path exists, and is cleared to empty when none does. The start cell
    /// is expanded even when blocked so an enemy standing on a freshly
    /// blocked cell can still path out of it.
    pub(crate) fn find_path<F>(
        &mut self,
        width: u32,
        height: u32,
        start: CellCoord,
        goal: CellCoord,
        mut is_blocked: F,
        out: &mut Vec<CellCoord>,
    ) where
        F: FnMut(CellCoord) -> bool,
    {
        out.clear();

        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        if cell_count == 0 {
            return;
        }

        if start.column() >= width || start.row() >= height {
            return;
        }

        if goal.column() >= width || goal.row() >= height {
            return;
        }

        if goal != start && is_blocked(goal) {
            return;
        }

        if self.width != width || self.height != height || self.parents.len() != cell_count {
            self.width = width;
            self.height = height;
            self.parents = vec![UNVISITED; cell_count];
        } else {
            self.parents.fill(UNVISITED);
        }

        self.frontier.clear();

        let Some(start_index) = index(width_usize, start) else {
            return;
        };
        self.parents[start_index] = start_index as u32;
        self.frontier.push_back(start);

        let mut reached = start == goal;

        while let Some(cell) = self.frontier.pop_front() {
            if reached {
                break;
            }

            let Some(current_index) = index(width_usize, cell) else {
                continue;
            };

            for neighbor in neighbors(cell, width, height) {
                let Some(neighbor_index) = index(width_usize, neighbor) else {
                    continue;
                };

                if self.parents[neighbor_index] != UNVISITED {
                    continue;
                }

                if is_blocked(neighbor) {
                    continue;
                }

                self.parents[neighbor_index] = current_index as u32;

                if neighbor == goal {
                    reached = true;
                    break;
                }

                self.frontier.push_back(neighbor);
            }
        }

        if !reached {
            return;
        }

        let Some(goal_index) = index(width_usize, goal) else {
            return;
        };

        let mut cursor = goal_index;
        loop {
            out.push(cell_at(width_usize, cursor));
            let parent = self.parents[cursor] as usize;
            if parent == cursor {
                break;
            }
            cursor = parent;
        }

        out.reverse();
    }
}

fn neighbors(cell: CellCoord, width: u32, height: u32) -> impl Iterator<Item = CellCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(CellCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(CellCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(CellCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

fn cell_at(width: usize, index: usize) -> CellCoord {
    let column = (index % width) as u32;
    let row = (index / width) as u32;
    CellCoord::new(column, row)
}
