//! Projectile motion
//!
//! A projectile is staged `Idle` at the launch point, flies while `Moving`,
//! and either comes to rest against the grid (back to `Idle`, reported as a
//! landing) or is `Despawned` by the floor.

use glam::Vec3;

use super::collision::{Collider, HitKind, reflect_velocity};
use super::grid::{ColorType, EntityId};

/// Projectile lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileState {
    /// Staged, or resting after contact with the grid
    Idle,
    Moving,
    /// Hit the floor; terminal
    Despawned,
}

/// What happened during a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectileEvent {
    /// Stopped against a grid bubble
    Landed {
        /// Where the surfaces touched
        contact_point: Vec3,
        /// Projectile center at rest
        position: Vec3,
    },
    /// Reached the floor
    Despawned,
}

/// A fired (or about to be fired) bubble
#[derive(Debug, Clone)]
pub struct Projectile {
    pub entity: EntityId,
    pub color: ColorType,
    pub pos: Vec3,
    pub vel: Vec3,
    pub radius: f32,
    pub state: ProjectileState,
}

impl Projectile {
    pub fn new(entity: EntityId, color: ColorType, pos: Vec3, radius: f32) -> Self {
        Self {
            entity,
            color,
            pos,
            vel: Vec3::ZERO,
            radius,
            state: ProjectileState::Idle,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.state == ProjectileState::Moving
    }

    /// Launch along `direction` at `speed`.
    ///
    /// Returns false (and stays put) for a zero direction, a speed that is
    /// not positive, or when the projectile is not idle.
    pub fn fire_in_direction(&mut self, direction: Vec3, speed: f32) -> bool {
        if self.state != ProjectileState::Idle || !(speed > 0.0) {
            return false;
        }
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return false;
        }
        self.vel = dir * speed;
        self.state = ProjectileState::Moving;
        true
    }

    /// Advance one tick against `collider`
    pub fn step(&mut self, dt: f32, collider: &dyn Collider) -> Option<ProjectileEvent> {
        if !self.is_moving() {
            return None;
        }

        let speed = self.vel.length();
        let travel = speed * dt;
        let dir = self.vel / speed.max(f32::EPSILON);

        if let Some(hit) = collider.sweep(self.pos, self.radius, dir, travel + self.radius) {
            self.vel = reflect_velocity(self.vel, hit.normal);

            match hit.kind {
                HitKind::Bubble => {
                    self.vel = Vec3::ZERO;
                    self.state = ProjectileState::Idle;
                    return Some(ProjectileEvent::Landed {
                        contact_point: hit.point,
                        position: self.pos,
                    });
                }
                HitKind::Floor => {
                    self.vel = Vec3::ZERO;
                    self.state = ProjectileState::Despawned;
                    return Some(ProjectileEvent::Despawned);
                }
                HitKind::Other => {}
            }
        }

        // Motion stays in the grid plane
        self.vel.z = 0.0;
        self.pos += self.vel * dt;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::{BoardCollider, SweepHit};

    /// Collider that never reports a hit
    struct Open;

    impl Collider for Open {
        fn sweep(&self, _: Vec3, _: f32, _: Vec3, _: f32) -> Option<SweepHit> {
            None
        }
    }

    /// Collider that always reports the same hit
    struct Always(SweepHit);

    impl Collider for Always {
        fn sweep(&self, _: Vec3, _: f32, _: Vec3, _: f32) -> Option<SweepHit> {
            Some(self.0)
        }
    }

    fn hit(kind: HitKind, normal: Vec3) -> SweepHit {
        SweepHit {
            point: Vec3::new(1.0, 2.0, 0.0),
            normal,
            distance: 0.1,
            kind,
        }
    }

    #[test]
    fn test_fire_sets_velocity() {
        let mut p = Projectile::new(1, 0, Vec3::ZERO, 0.5);
        assert!(p.fire_in_direction(Vec3::new(0.0, 2.0, 0.0), 45.0));
        assert!(p.is_moving());
        assert!(p.vel.abs_diff_eq(Vec3::new(0.0, 45.0, 0.0), 1e-5));
        // Already moving
        assert!(!p.fire_in_direction(Vec3::X, 10.0));
    }

    #[test]
    fn test_fire_with_zero_direction_stays_idle() {
        let mut p = Projectile::new(1, 0, Vec3::ZERO, 0.5);
        assert!(!p.fire_in_direction(Vec3::ZERO, 45.0));
        assert_eq!(p.state, ProjectileState::Idle);
    }

    #[test]
    fn test_fire_without_speed_stays_idle() {
        let mut p = Projectile::new(1, 0, Vec3::ZERO, 0.5);
        assert!(!p.fire_in_direction(Vec3::Y, 0.0));
        assert!(!p.fire_in_direction(Vec3::Y, -5.0));
        assert!(!p.fire_in_direction(Vec3::Y, f32::NAN));
        assert_eq!(p.state, ProjectileState::Idle);
        assert_eq!(p.vel, Vec3::ZERO);
    }

    #[test]
    fn test_idle_does_not_move() {
        let mut p = Projectile::new(1, 0, Vec3::new(3.0, 4.0, 0.0), 0.5);
        assert_eq!(p.step(0.1, &Open), None);
        assert_eq!(p.pos, Vec3::new(3.0, 4.0, 0.0));
    }

    #[test]
    fn test_free_flight_is_planar() {
        let mut p = Projectile::new(1, 0, Vec3::ZERO, 0.5);
        p.fire_in_direction(Vec3::new(0.0, 1.0, 0.5), 10.0);
        p.step(0.1, &Open);
        assert_eq!(p.vel.z, 0.0);
        assert_eq!(p.pos.z, 0.0);
        assert!(p.pos.y > 0.0);
    }

    #[test]
    fn test_wall_reflects_and_keeps_moving() {
        let mut p = Projectile::new(1, 0, Vec3::ZERO, 0.5);
        p.fire_in_direction(Vec3::new(1.0, 1.0, 0.0), 2.0_f32.sqrt());
        let event = p.step(1.0, &Always(hit(HitKind::Other, Vec3::NEG_X)));
        assert_eq!(event, None);
        assert!(p.is_moving());
        assert!(p.vel.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
        assert!(p.pos.abs_diff_eq(Vec3::new(-1.0, 1.0, 0.0), 1e-5));
    }

    #[test]
    fn test_bubble_hit_lands_in_place() {
        let mut p = Projectile::new(1, 2, Vec3::new(0.0, 5.0, 0.0), 0.5);
        p.fire_in_direction(Vec3::Y, 10.0);
        let event = p.step(0.1, &Always(hit(HitKind::Bubble, Vec3::NEG_Y)));
        assert_eq!(
            event,
            Some(ProjectileEvent::Landed {
                contact_point: Vec3::new(1.0, 2.0, 0.0),
                position: Vec3::new(0.0, 5.0, 0.0),
            })
        );
        assert_eq!(p.state, ProjectileState::Idle);
        assert_eq!(p.vel, Vec3::ZERO);
        assert_eq!(p.pos, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_floor_despawns() {
        let mut p = Projectile::new(1, 2, Vec3::ZERO, 0.5);
        p.fire_in_direction(Vec3::NEG_Y, 10.0);
        let event = p.step(0.1, &Always(hit(HitKind::Floor, Vec3::Y)));
        assert_eq!(event, Some(ProjectileEvent::Despawned));
        assert_eq!(p.state, ProjectileState::Despawned);
        assert!(!p.fire_in_direction(Vec3::Y, 10.0));
    }

    #[test]
    fn test_bounces_off_wall_into_bubble() {
        // Fired up-right, bounces off the right wall, lands on a bubble up-left
        let collider = BoardCollider::new(5.0, -20.0, 1.0).with_bubbles([Vec3::new(-1.0, 8.0, 0.0)]);
        let mut p = Projectile::new(1, 0, Vec3::ZERO, 1.0);
        p.fire_in_direction(Vec3::new(1.0, 1.0, 0.0), 20.0);

        let mut bounced = false;
        let mut landed = None;
        for _ in 0..200 {
            let before = p.vel;
            match p.step(1.0 / 120.0, &collider) {
                Some(event) => {
                    landed = Some(event);
                    break;
                }
                None if before.x > 0.0 && p.vel.x < 0.0 => bounced = true,
                None => {}
            }
        }
        assert!(bounced);
        assert!(matches!(landed, Some(ProjectileEvent::Landed { .. })));
        assert!(p.pos.x < 5.0 - 1.0 + 1e-3);
    }
}
