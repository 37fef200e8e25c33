//! Swept collision queries and reflection
//!
//! The simulation only depends on the [`Collider`] contract. [`BoardCollider`]
//! is a straightforward implementation over a snapshot of the arena: two
//! side walls, a floor, an optional ceiling and the grid's bubbles.

use glam::Vec3;

/// What a sweep ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    /// A grid bubble; the projectile sticks
    Bubble,
    /// The lower boundary; the projectile is despawned
    Floor,
    /// Anything else (walls, ceiling); the projectile bounces
    Other,
}

/// Result of a swept query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepHit {
    /// Contact point on the surface that was hit
    pub point: Vec3,
    /// Unit surface normal at the contact, pointing back toward the sweep
    pub normal: Vec3,
    /// Distance travelled along the sweep before contact
    pub distance: f32,
    pub kind: HitKind,
}

/// Swept-sphere query provider
pub trait Collider {
    /// Sweep a sphere of `radius` from `origin` along unit `direction` for at
    /// most `max_distance`. Returns the first hit, if any.
    fn sweep(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<SweepHit>;
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec3, normal: Vec3) -> Vec3 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// An infinite plane the sweep can hit from its normal side
#[derive(Debug, Clone, Copy)]
struct Plane {
    point: Vec3,
    normal: Vec3,
    kind: HitKind,
}

impl Plane {
    fn sweep(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<SweepHit> {
        let approach = self.normal.dot(direction);
        if approach >= 0.0 {
            return None; // Moving away or parallel
        }

        let separation = self.normal.dot(origin - self.point);
        let t = ((separation - radius) / -approach).max(0.0);
        if t > max_distance {
            return None;
        }

        let center = origin + direction * t;
        Some(SweepHit {
            point: center - self.normal * radius,
            normal: self.normal,
            distance: t,
            kind: self.kind,
        })
    }
}

/// Sweep a sphere against a static sphere
fn sweep_sphere(
    origin: Vec3,
    radius: f32,
    direction: Vec3,
    max_distance: f32,
    center: Vec3,
    target_radius: f32,
) -> Option<SweepHit> {
    let combined = radius + target_radius;
    let m = origin - center;
    let b = m.dot(direction);
    let c = m.length_squared() - combined * combined;

    // Outside and moving away
    if c > 0.0 && b > 0.0 {
        return None;
    }
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let t = (-b - disc.sqrt()).max(0.0);
    if t > max_distance {
        return None;
    }

    let at = origin + direction * t;
    let normal = (at - center).normalize_or_zero();
    if normal == Vec3::ZERO {
        return None; // Degenerate: centers coincide
    }
    Some(SweepHit {
        point: center + normal * target_radius,
        normal,
        distance: t,
        kind: HitKind::Bubble,
    })
}

/// Arena snapshot for swept queries
#[derive(Debug, Clone)]
pub struct BoardCollider {
    planes: Vec<Plane>,
    bubble_radius: f32,
    bubbles: Vec<Vec3>,
}

impl BoardCollider {
    /// Side walls at x = ±`wall_half_width` and a floor at y = `floor_y`
    pub fn new(wall_half_width: f32, floor_y: f32, bubble_radius: f32) -> Self {
        let planes = vec![
            Plane {
                point: Vec3::new(-wall_half_width, 0.0, 0.0),
                normal: Vec3::X,
                kind: HitKind::Other,
            },
            Plane {
                point: Vec3::new(wall_half_width, 0.0, 0.0),
                normal: Vec3::NEG_X,
                kind: HitKind::Other,
            },
            Plane {
                point: Vec3::new(0.0, floor_y, 0.0),
                normal: Vec3::Y,
                kind: HitKind::Floor,
            },
        ];
        Self {
            planes,
            bubble_radius,
            bubbles: Vec::new(),
        }
    }

    /// Add a bouncing ceiling at y = `ceiling_y`
    pub fn with_ceiling(mut self, ceiling_y: f32) -> Self {
        self.planes.push(Plane {
            point: Vec3::new(0.0, ceiling_y, 0.0),
            normal: Vec3::NEG_Y,
            kind: HitKind::Other,
        });
        self
    }

    /// Replace the bubble snapshot
    pub fn with_bubbles(mut self, centers: impl IntoIterator<Item = Vec3>) -> Self {
        self.bubbles = centers.into_iter().collect();
        self
    }

    pub fn bubble_count(&self) -> usize {
        self.bubbles.len()
    }
}

impl Collider for BoardCollider {
    fn sweep(&self, origin: Vec3, radius: f32, direction: Vec3, max_distance: f32) -> Option<SweepHit> {
        let planes = self
            .planes
            .iter()
            .filter_map(|plane| plane.sweep(origin, radius, direction, max_distance));
        let bubbles = self.bubbles.iter().filter_map(|&center| {
            sweep_sphere(origin, radius, direction, max_distance, center, self.bubble_radius)
        });

        planes
            .chain(bubbles)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}
