//! Authoritative store of occupied cells

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

use super::coords::Cell;

/// Bubble color index into the palette
pub type ColorType = u8;

/// Handle the presentation layer uses to refer to a spawned entity
pub type EntityId = u32;

/// Called once when a bubble leaves the grid, before it is purged
pub type RemovalHandler = Box<dyn FnOnce(&Bubble)>;

/// Grid/game-state desync. These are never expected at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("cell {0} is already occupied")]
    DuplicateCell(Cell),
    #[error("cell {0} is not occupied")]
    MissingCell(Cell),
    #[error("match search seed {0} is empty or holds another color")]
    InvalidSeed(Cell),
}

/// One grid cell's occupant
pub struct Bubble {
    cell: Cell,
    color: ColorType,
    entity: EntityId,
    on_removed: Option<RemovalHandler>,
}

impl Bubble {
    pub fn new(cell: Cell, color: ColorType, entity: EntityId) -> Self {
        Self {
            cell,
            color,
            entity,
            on_removed: None,
        }
    }

    /// Register the removal handler, replacing any previous one
    pub fn with_removal_handler(mut self, handler: impl FnOnce(&Bubble) + 'static) -> Self {
        self.on_removed = Some(Box::new(handler));
        self
    }

    #[inline]
    pub fn cell(&self) -> Cell {
        self.cell
    }

    #[inline]
    pub fn color(&self) -> ColorType {
        self.color
    }

    #[inline]
    pub fn entity(&self) -> EntityId {
        self.entity
    }

    fn notify_removed(&mut self) {
        if let Some(handler) = self.on_removed.take() {
            handler(self);
        }
    }
}

impl fmt::Debug for Bubble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bubble")
            .field("cell", &self.cell)
            .field("color", &self.color)
            .field("entity", &self.entity)
            .field("has_handler", &self.on_removed.is_some())
            .finish()
    }
}

/// Occupied cells and their bubbles
#[derive(Debug, Default)]
pub struct GridStore {
    cells: HashMap<Cell, Bubble>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a bubble at its cell
    pub fn insert(&mut self, bubble: Bubble) -> Result<(), GridError> {
        let cell = bubble.cell;
        if self.cells.contains_key(&cell) {
            return Err(GridError::DuplicateCell(cell));
        }
        self.cells.insert(cell, bubble);
        Ok(())
    }

    /// Remove the bubble at `cell`, firing its removal handler first
    pub fn remove(&mut self, cell: Cell) -> Result<Bubble, GridError> {
        let bubble = self.cells.get_mut(&cell).ok_or(GridError::MissingCell(cell))?;
        bubble.notify_removed();
        self.cells.remove(&cell).ok_or(GridError::MissingCell(cell))
    }

    pub fn get(&self, cell: Cell) -> Option<&Bubble> {
        self.cells.get(&cell)
    }

    #[inline]
    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Color at `cell`, if occupied
    pub fn color_at(&self, cell: Cell) -> Option<ColorType> {
        self.cells.get(&cell).map(Bubble::color)
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Bubbles in cell order (stable across runs)
    pub fn iter(&self) -> impl Iterator<Item = &Bubble> {
        let mut bubbles: Vec<&Bubble> = self.cells.values().collect();
        bubbles.sort_by_key(|b| b.cell);
        bubbles.into_iter()
    }

    /// Bubbles in no particular order
    pub fn values(&self) -> impl Iterator<Item = &Bubble> {
        self.cells.values()
    }

    /// Drop every bubble without firing removal handlers
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}
