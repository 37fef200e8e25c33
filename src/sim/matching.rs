//! Connected-region search and pop resolution

use std::collections::{HashSet, VecDeque};

use super::adjacency::neighbors_of;
use super::coords::Cell;
use super::grid::{Bubble, ColorType, GridError, GridStore};

/// Result of resolving a landing
#[derive(Debug, Default)]
pub struct MatchOutcome {
    /// Connected same-color region around the seed, seed first
    pub region: Vec<Cell>,
    /// Bubbles that were popped (empty if the region was below threshold)
    pub removed: Vec<Bubble>,
}

impl MatchOutcome {
    pub fn popped(&self) -> bool {
        !self.removed.is_empty()
    }
}

/// Breadth-first flood fill from `seed` over occupied cells of `color`.
///
/// The seed must hold a bubble of `color` and is always first in the
/// region. Cells come back in visit order, which is deterministic because
/// neighbors expand in a fixed order.
pub fn find_connected_region(
    grid: &GridStore,
    seed: Cell,
    color: ColorType,
) -> Result<Vec<Cell>, GridError> {
    if grid.color_at(seed) != Some(color) {
        return Err(GridError::InvalidSeed(seed));
    }

    let mut visited = HashSet::from([seed]);
    let mut frontier = VecDeque::from([seed]);
    let mut region = vec![seed];

    while let Some(current) = frontier.pop_front() {
        for neighbor in neighbors_of(current) {
            if grid.color_at(neighbor) != Some(color) {
                continue;
            }
            if visited.insert(neighbor) {
                region.push(neighbor);
                frontier.push_back(neighbor);
            }
        }
    }

    Ok(region)
}

/// Find the region around `seed` and pop it if it reaches `threshold`.
///
/// Removal walks the precomputed region, so removal handlers never observe a
/// half-iterated store. Bubbles cut off from the rest of the grid stay put.
pub fn resolve_matches(
    grid: &mut GridStore,
    seed: Cell,
    color: ColorType,
    threshold: usize,
) -> Result<MatchOutcome, GridError> {
    let region = find_connected_region(grid, seed, color)?;
    log::debug!("Region at {} has {} bubble(s) of color {}", seed, region.len(), color);

    if region.len() < threshold {
        return Ok(MatchOutcome {
            region,
            removed: Vec::new(),
        });
    }

    let removed = region
        .iter()
        .map(|&cell| grid.remove(cell))
        .collect::<Result<Vec<_>, _>>()?;
    log::info!("Popped {} bubble(s) at {}", removed.len(), seed);

    Ok(MatchOutcome { region, removed })
}
