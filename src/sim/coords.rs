//! Logical grid cells and world-space mapping
//!
//! The grid is an offset ("brick wall") layout: every even row is shifted
//! half a cell toward +X, which gives hex-like packing from a rectangular
//! index space. Rows grow toward +Y.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;

/// A logical (row, column) index into the bubble grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: i32,
    pub column: i32,
}

impl Cell {
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Whether this cell's row is shifted half a cell toward +X
    #[inline]
    pub fn is_shifted_row(self) -> bool {
        is_shifted_row(self.row)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((row, column): (i32, i32)) -> Self {
        Self::new(row, column)
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Even rows (including negative even rows) carry the half-cell shift.
///
/// Shared by the mapper and the adjacency resolver; both must agree.
#[inline]
pub fn is_shifted_row(row: i32) -> bool {
    row.rem_euclid(2) == 0
}

/// Lateral shift of a row in cell units
#[inline]
fn row_shift(row: i32) -> f32 {
    if is_shifted_row(row) { 0.5 } else { 0.0 }
}

/// World placement of the grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridTransform {
    pub origin: Vec3,
    pub rotation: Quat,
}

impl Default for GridTransform {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl GridTransform {
    pub fn new(origin: Vec3, rotation: Quat) -> Self {
        Self { origin, rotation }
    }

    pub fn from_origin(origin: Vec3) -> Self {
        Self {
            origin,
            ..Default::default()
        }
    }

    /// Grid-local point to world space
    #[inline]
    pub fn apply(&self, local: Vec3) -> Vec3 {
        self.rotation * local + self.origin
    }

    /// World point to grid-local space
    #[inline]
    pub fn inverse_apply(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.origin)
    }
}

/// Converts between logical cells and world positions.
///
/// Cell centers are laid out around the middle of a `width` x `height`
/// extent, so the populated level sits centered on the transform origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateMapper {
    pub spacing: f32,
    pub width: u32,
    pub height: u32,
}

impl CoordinateMapper {
    pub fn new(spacing: f32, width: u32, height: u32) -> Self {
        Self {
            spacing,
            width,
            height,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.bubble_spacing, config.grid_width, config.grid_height)
    }

    #[inline]
    fn center_column(&self) -> f32 {
        (self.width as f32 - 1.0) / 2.0
    }

    #[inline]
    fn center_row(&self) -> f32 {
        (self.height as f32 - 1.0) / 2.0
    }

    /// Cell center in grid-local space (before the transform)
    pub fn to_local(&self, cell: Cell) -> Vec3 {
        let x = (cell.column as f32 - self.center_column() + row_shift(cell.row)) * self.spacing;
        let y = (cell.row as f32 - self.center_row()) * self.spacing;
        Vec3::new(x, y, 0.0)
    }

    /// Cell center in world space
    pub fn to_world(&self, cell: Cell, transform: &GridTransform) -> Vec3 {
        transform.apply(self.to_local(cell))
    }

    /// Nearest cell to a world position.
    ///
    /// Never fails: positions far outside the level still map to some cell.
    /// Exact ties round half to even, on the row first and then on the
    /// column using the chosen row's shift.
    pub fn to_grid(&self, world: Vec3, transform: &GridTransform) -> Cell {
        let local = transform.inverse_apply(world);

        let row = (local.y / self.spacing + self.center_row()).round_ties_even();
        let row = row as i32;
        let column = (local.x / self.spacing - row_shift(row) + self.center_column())
            .round_ties_even() as i32;

        Cell::new(row, column)
    }
}
