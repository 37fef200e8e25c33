//! Game state and core simulation types

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use thiserror::Error;

use super::collision::BoardCollider;
use super::coords::{Cell, CoordinateMapper, GridTransform};
use super::grid::{Bubble, ColorType, EntityId, GridError, GridStore};
use super::projectile::Projectile;
use crate::config::{ConfigError, GameConfig};
use crate::{angle_from_up, direction_from_angle};

/// Why a session could not be started
#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Grid(#[from] GridError),
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Projectile staged, waiting for the fire input
    Aiming,
    /// Projectile travelling
    InFlight,
    /// Grid cleared
    Won,
    /// Grid reached the game-over line
    Lost,
}

impl GamePhase {
    pub fn is_over(self) -> bool {
        matches!(self, GamePhase::Won | GamePhase::Lost)
    }
}

/// Something the presentation layer should know about
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BubbleSpawned {
        entity: EntityId,
        cell: Cell,
        color: ColorType,
        position: Vec3,
    },
    BubbleRemoved {
        entity: EntityId,
        cell: Cell,
        color: ColorType,
    },
    ProjectilePrepped {
        entity: EntityId,
        color: ColorType,
        position: Vec3,
    },
    ProjectileFired {
        entity: EntityId,
        direction: Vec3,
    },
    /// `inserted` is false when the snapped cell was already taken
    ProjectileLanded {
        entity: EntityId,
        cell: Cell,
        inserted: bool,
    },
    ProjectileDespawned {
        entity: EntityId,
    },
    Matched {
        seed: Cell,
        size: usize,
        popped: bool,
    },
    GameOver {
        phase: GamePhase,
    },
}

/// Events raised during a tick, drained by the owner afterwards.
///
/// Cloned into each bubble's removal handler, so removals land here in the
/// order they happen.
#[derive(Debug, Clone, Default)]
pub struct EventQueue(Rc<RefCell<VecDeque<GameEvent>>>);

impl EventQueue {
    pub fn push(&self, event: GameEvent) {
        self.0.borrow_mut().push_back(event);
    }

    pub fn drain(&self) -> Vec<GameEvent> {
        self.0.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }
}

/// One play session
#[derive(Debug)]
pub struct Game {
    pub config: GameConfig,
    pub mapper: CoordinateMapper,
    /// Grid placement; only the driver writes it
    pub transform: GridTransform,
    pub grid: GridStore,
    /// Staged or flying projectile
    pub projectile: Option<Projectile>,
    pub phase: GamePhase,
    /// Fire input is accepted
    pub can_fire: bool,
    /// Grid keeps descending
    pub can_move: bool,
    /// Cannon angle from straight up (radians)
    pub aim_angle: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    rng: Pcg32,
    events: EventQueue,
    next_id: EntityId,
}

impl Game {
    /// Start a session with a freshly populated level
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let mut game = Self::blank(config);
        game.populate_level()?;
        game.prep_projectile();
        game.can_move = true;
        Ok(game)
    }

    /// A session with an empty grid and a staged projectile
    pub fn empty(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut game = Self::blank(config);
        game.prep_projectile();
        Ok(game)
    }

    fn blank(config: GameConfig) -> Self {
        Self {
            mapper: CoordinateMapper::from_config(&config),
            transform: GridTransform::from_origin(config.grid_origin),
            grid: GridStore::new(),
            projectile: None,
            phase: GamePhase::Aiming,
            can_fire: false,
            can_move: false,
            aim_angle: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(config.seed),
            events: EventQueue::default(),
            next_id: 1,
            config,
        }
    }

    /// Throw away the session and load the level again from the same seed.
    ///
    /// Bubbles leave through [`GridStore::remove`], so each one reports its
    /// own removal.
    pub fn reset(&mut self) -> Result<(), GridError> {
        let cells: Vec<Cell> = self.grid.iter().map(Bubble::cell).collect();
        for cell in cells {
            self.grid.remove(cell)?;
        }
        if let Some(projectile) = self.projectile.take() {
            self.events.push(GameEvent::ProjectileDespawned {
                entity: projectile.entity,
            });
        }

        self.transform = GridTransform::from_origin(self.config.grid_origin);
        self.rng = Pcg32::seed_from_u64(self.config.seed);
        self.phase = GamePhase::Aiming;
        self.aim_angle = 0.0;
        self.time_ticks = 0;

        self.populate_level()?;
        self.prep_projectile();
        self.can_move = true;
        Ok(())
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random palette color
    pub fn random_color(&mut self) -> ColorType {
        self.rng.random_range(0..self.config.palette_size.max(1))
    }

    /// Fill the level extent. Shifted rows are one bubble shorter so the
    /// level keeps a straight right edge.
    fn populate_level(&mut self) -> Result<(), GridError> {
        let width = self.config.grid_width as i32;
        let height = self.config.grid_height as i32;

        for row in 0..height {
            for column in 0..width {
                let cell = Cell::new(row, column);
                if cell.is_shifted_row() && column == width - 1 {
                    continue;
                }
                let color = self.random_color();
                self.place_bubble(cell, color)?;
            }
        }

        log::info!(
            "Level loaded: {} bubbles, {} colors",
            self.grid.count(),
            self.config.palette_size
        );
        Ok(())
    }

    /// Insert a bubble whose removal reports back through the event queue
    pub fn place_bubble(&mut self, cell: Cell, color: ColorType) -> Result<EntityId, GridError> {
        if self.grid.contains(cell) {
            return Err(GridError::DuplicateCell(cell));
        }

        let entity = self.next_entity_id();
        let events = self.events.clone();
        let bubble = Bubble::new(cell, color, entity).with_removal_handler(move |b| {
            events.push(GameEvent::BubbleRemoved {
                entity: b.entity(),
                cell: b.cell(),
                color: b.color(),
            });
        });
        self.grid.insert(bubble)?;

        self.events.push(GameEvent::BubbleSpawned {
            entity,
            cell,
            color,
            position: self.cell_position(cell),
        });
        Ok(entity)
    }

    /// Stage a new projectile at the launch point
    pub fn prep_projectile(&mut self) {
        let entity = self.next_entity_id();
        let color = self.random_color();
        let position = self.config.launch_point;

        self.projectile = Some(Projectile::new(
            entity,
            color,
            position,
            self.config.bubble_radius,
        ));
        self.events.push(GameEvent::ProjectilePrepped {
            entity,
            color,
            position,
        });
        if !self.phase.is_over() {
            self.phase = GamePhase::Aiming;
            self.can_fire = true;
        }
    }

    /// Point the cannon along `direction`, clamped to the swing limit
    pub fn aim(&mut self, direction: Vec3) {
        if direction.truncate().length_squared() <= f32::EPSILON {
            return;
        }
        let limit = self.config.max_aim_radians();
        self.aim_angle = angle_from_up(direction).clamp(-limit, limit);
    }

    pub fn aim_direction(&self) -> Vec3 {
        direction_from_angle(self.aim_angle)
    }

    /// Launch the staged projectile along the current aim
    pub fn fire(&mut self) -> bool {
        if !self.can_fire {
            return false;
        }
        let direction = self.aim_direction();
        let speed = self.config.projectile_speed;
        let Some(projectile) = self.projectile.as_mut() else {
            return false;
        };
        if !projectile.fire_in_direction(direction, speed) {
            return false;
        }

        let entity = projectile.entity;
        self.can_fire = false;
        self.phase = GamePhase::InFlight;
        self.events.push(GameEvent::ProjectileFired { entity, direction });
        log::debug!("Fired projectile {} at {:.1} deg", entity, self.aim_angle.to_degrees());
        true
    }

    /// World position of a cell center under the current transform
    pub fn cell_position(&self, cell: Cell) -> Vec3 {
        self.mapper.to_world(cell, &self.transform)
    }

    /// Nearest cell to a world position under the current transform
    pub fn snap_to_cell(&self, position: Vec3) -> Cell {
        self.mapper.to_grid(position, &self.transform)
    }

    /// Arena snapshot with the grid at its current position
    pub fn board_collider(&self) -> BoardCollider {
        BoardCollider::new(
            self.config.wall_half_width,
            self.config.floor_y,
            self.config.bubble_radius,
        )
        .with_bubbles(self.grid.iter().map(|b| self.cell_position(b.cell())))
    }

    pub(crate) fn push_event(&self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }
}
