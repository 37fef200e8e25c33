//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by cell)
//! - No rendering or platform dependencies

pub mod adjacency;
pub mod collision;
pub mod coords;
pub mod grid;
pub mod matching;
pub mod projectile;
pub mod state;
pub mod tick;

pub use adjacency::{are_adjacent, neighbors_of};
pub use collision::{BoardCollider, Collider, HitKind, SweepHit, reflect_velocity};
pub use coords::{Cell, CoordinateMapper, GridTransform, is_shifted_row};
pub use grid::{Bubble, ColorType, EntityId, GridError, GridStore, RemovalHandler};
pub use matching::{MatchOutcome, find_connected_region, resolve_matches};
pub use projectile::{Projectile, ProjectileEvent, ProjectileState};
pub use state::{EventQueue, Game, GameError, GameEvent, GamePhase};
pub use tick::{TickInput, tick};
