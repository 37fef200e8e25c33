//! Rendering/instantiation collaborator
//!
//! The simulation owns no visuals. It reports [`GameEvent`]s and the owner
//! forwards them here once per frame with [`present`].

use glam::Vec3;

use crate::sim::{Cell, ColorType, EntityId, GameEvent, GamePhase};

/// Receives entity lifecycle calls. Every method defaults to a no-op.
pub trait Presenter {
    fn spawn_bubble(&mut self, _entity: EntityId, _cell: Cell, _color: ColorType, _position: Vec3) {}
    fn despawn_bubble(&mut self, _entity: EntityId, _cell: Cell) {}
    fn spawn_projectile(&mut self, _entity: EntityId, _color: ColorType, _position: Vec3) {}
    fn despawn_projectile(&mut self, _entity: EntityId) {}
    fn game_over(&mut self, _phase: GamePhase) {}
}

/// Presenter that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPresenter;

impl Presenter for NullPresenter {}

/// Presenter that logs every call
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

impl Presenter for LogPresenter {
    fn spawn_bubble(&mut self, entity: EntityId, cell: Cell, color: ColorType, position: Vec3) {
        log::trace!("spawn bubble #{} color {} at {} ({:.2}, {:.2})", entity, color, cell, position.x, position.y);
    }

    fn despawn_bubble(&mut self, entity: EntityId, cell: Cell) {
        log::debug!("despawn bubble #{} at {}", entity, cell);
    }

    fn spawn_projectile(&mut self, entity: EntityId, color: ColorType, _position: Vec3) {
        log::debug!("spawn projectile #{} color {}", entity, color);
    }

    fn despawn_projectile(&mut self, entity: EntityId) {
        log::debug!("despawn projectile #{}", entity);
    }

    fn game_over(&mut self, phase: GamePhase) {
        log::info!("game over: {:?}", phase);
    }
}

/// Forward entity lifecycle events to `presenter`
pub fn present(events: &[GameEvent], presenter: &mut dyn Presenter) {
    for event in events {
        match *event {
            GameEvent::BubbleSpawned {
                entity,
                cell,
                color,
                position,
            } => presenter.spawn_bubble(entity, cell, color, position),
            GameEvent::BubbleRemoved { entity, cell, .. } => presenter.despawn_bubble(entity, cell),
            GameEvent::ProjectilePrepped {
                entity,
                color,
                position,
            } => presenter.spawn_projectile(entity, color, position),
            GameEvent::ProjectileDespawned { entity } => presenter.despawn_projectile(entity),
            GameEvent::GameOver { phase } => presenter.game_over(phase),
            GameEvent::ProjectileFired { .. }
            | GameEvent::ProjectileLanded { .. }
            | GameEvent::Matched { .. } => {}
        }
    }
}
