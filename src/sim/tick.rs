//! Fixed timestep simulation tick
//!
//! One call per frame: aim, fire, move the projectile, resolve a landing,
//! lower the grid, then check for a win or loss.

use glam::Vec3;

use super::collision::Collider;
use super::grid::GridError;
use super::matching::resolve_matches;
use super::projectile::ProjectileEvent;
use super::state::{Game, GameEvent, GamePhase};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired cannon direction (pointer, stick, ...). `None` keeps the last aim.
    pub aim: Option<Vec3>,
    /// Fire the staged projectile
    pub fire: bool,
}

/// Advance the game by one fixed timestep.
///
/// A [`GridError`] means the grid and game state disagree; the tick stops
/// where it failed and the error is handed back.
pub fn tick(
    game: &mut Game,
    input: &TickInput,
    dt: f32,
    collider: &dyn Collider,
) -> Result<(), GridError> {
    if game.phase.is_over() {
        return Ok(());
    }

    game.time_ticks += 1;

    if let Some(aim) = input.aim {
        game.aim(aim);
    }
    if input.fire && game.can_fire {
        game.fire();
    }

    let event = game
        .projectile
        .as_mut()
        .filter(|p| p.is_moving())
        .and_then(|p| p.step(dt, collider));

    match event {
        Some(ProjectileEvent::Landed { position, .. }) => {
            if let Err(err) = land_projectile(game, position) {
                log::error!("Grid desync while landing: {}", err);
                return Err(err);
            }
        }
        Some(ProjectileEvent::Despawned) => {
            despawn_projectile(game);
            game.prep_projectile();
        }
        None => {}
    }

    if game.can_move {
        game.transform.origin.y -= game.config.descent_speed * dt;
    }

    check_game_over(game);
    Ok(())
}

/// Commit a resting projectile to the grid and pop any match
fn land_projectile(game: &mut Game, position: Vec3) -> Result<(), GridError> {
    let Some(projectile) = game.projectile.as_ref() else {
        return Ok(());
    };
    let entity = projectile.entity;
    let color = projectile.color;
    let cell = game.snap_to_cell(position);

    let inserted = !game.grid.contains(cell);
    game.push_event(GameEvent::ProjectileLanded {
        entity,
        cell,
        inserted,
    });

    if inserted {
        log::debug!("Projectile {} landed at {}", entity, cell);
        game.place_bubble(cell, color)?;

        let outcome = resolve_matches(&mut game.grid, cell, color, game.config.match_threshold)?;
        game.push_event(GameEvent::Matched {
            seed: cell,
            size: outcome.region.len(),
            popped: outcome.popped(),
        });
    } else {
        log::warn!("Projectile {} snapped to occupied cell {}, discarding", entity, cell);
    }

    despawn_projectile(game);
    game.prep_projectile();
    Ok(())
}

fn despawn_projectile(game: &mut Game) {
    if let Some(projectile) = game.projectile.take() {
        game.push_event(GameEvent::ProjectileDespawned {
            entity: projectile.entity,
        });
    }
}

/// Lose when any bubble reaches the game-over line, win when none are left
fn check_game_over(game: &mut Game) {
    let phase = if game.grid.is_empty() {
        GamePhase::Won
    } else if game
        .grid
        .values()
        .any(|b| game.cell_position(b.cell()).y <= game.config.game_over_y)
    {
        GamePhase::Lost
    } else {
        return;
    };

    game.phase = phase;
    game.can_fire = false;
    game.can_move = false;
    game.push_event(GameEvent::GameOver { phase });
    log::info!("Game over after {} ticks: {:?}", game.time_ticks, phase);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::consts::SIM_DT;
    use crate::sim::collision::{HitKind, SweepHit};
    use crate::sim::coords::Cell;

    /// Collider that never reports a hit
    struct Open;

    impl Collider for Open {
        fn sweep(&self, _: Vec3, _: f32, _: Vec3, _: f32) -> Option<SweepHit> {
            None
        }
    }

    /// Collider that reports an immediate hit of one kind
    struct Touch(HitKind);

    impl Collider for Touch {
        fn sweep(&self, origin: Vec3, _: f32, _: Vec3, _: f32) -> Option<SweepHit> {
            Some(SweepHit {
                point: origin,
                normal: Vec3::NEG_Y,
                distance: 0.0,
                kind: self.0,
            })
        }
    }

    fn still_config() -> GameConfig {
        GameConfig {
            descent_speed: 0.0,
            ..Default::default()
        }
    }

    fn fire() -> TickInput {
        TickInput {
            fire: true,
            ..Default::default()
        }
    }

    /// Put the staged projectile on `cell`'s center with `color`
    fn stage_at(game: &mut Game, cell: Cell, color: u8) {
        let position = game.cell_position(cell);
        let projectile = game.projectile.as_mut().unwrap();
        projectile.pos = position + Vec3::new(0.3, -0.2, 0.0);
        projectile.color = color;
    }

    #[test]
    fn test_landing_pops_trio_and_wins() {
        let mut game = Game::empty(still_config()).unwrap();
        game.place_bubble(Cell::new(0, 0), 0).unwrap();
        game.place_bubble(Cell::new(0, 1), 0).unwrap();
        stage_at(&mut game, Cell::new(1, 0), 0);
        game.drain_events();

        tick(&mut game, &fire(), SIM_DT, &Touch(HitKind::Bubble)).unwrap();

        assert!(game.grid.is_empty());
        assert_eq!(game.phase, GamePhase::Won);
        assert!(!game.can_fire);

        let events = game.drain_events();
        let removed = events
            .iter()
            .filter(|e| matches!(e, GameEvent::BubbleRemoved { .. }))
            .count();
        assert_eq!(removed, 3);
        assert!(events.contains(&GameEvent::Matched {
            seed: Cell::new(1, 0),
            size: 3,
            popped: true
        }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameOver {
                phase: GamePhase::Won
            })
        );
    }

    #[test]
    fn test_landing_below_threshold_sticks() {
        let mut game = Game::empty(still_config()).unwrap();
        game.place_bubble(Cell::new(5, 5), 2).unwrap();
        stage_at(&mut game, Cell::new(4, 4), 1);

        tick(&mut game, &fire(), SIM_DT, &Touch(HitKind::Bubble)).unwrap();

        assert_eq!(game.grid.count(), 2);
        assert_eq!(game.grid.color_at(Cell::new(4, 4)), Some(1));
        assert_eq!(game.phase, GamePhase::Aiming);
        assert!(game.can_fire);
        // A fresh projectile is waiting at the launch point
        let projectile = game.projectile.as_ref().unwrap();
        assert_eq!(projectile.pos, game.config.launch_point);
        assert!(!projectile.is_moving());
    }

    #[test]
    fn test_landing_on_occupied_cell_is_discarded() {
        let mut game = Game::empty(still_config()).unwrap();
        game.place_bubble(Cell::new(1, 0), 0).unwrap();
        game.place_bubble(Cell::new(3, 3), 1).unwrap();
        stage_at(&mut game, Cell::new(1, 0), 0);
        game.drain_events();

        tick(&mut game, &fire(), SIM_DT, &Touch(HitKind::Bubble)).unwrap();

        assert_eq!(game.grid.count(), 2);
        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ProjectileLanded {
                inserted: false,
                ..
            }
        )));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::BubbleSpawned { .. }))
        );
        assert!(game.can_fire);
    }

    #[test]
    fn test_floor_hit_preps_next_projectile() {
        let mut game = Game::empty(still_config()).unwrap();
        game.place_bubble(Cell::new(3, 3), 1).unwrap();
        let first = game.projectile.as_ref().unwrap().entity;
        game.drain_events();

        tick(&mut game, &fire(), SIM_DT, &Touch(HitKind::Floor)).unwrap();

        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ProjectileDespawned { entity: first }));
        assert!(matches!(
            events.last(),
            Some(GameEvent::ProjectilePrepped { .. })
        ));
        assert_ne!(game.projectile.as_ref().unwrap().entity, first);
        assert_eq!(game.grid.count(), 1);
        assert!(game.can_fire);
    }

    #[test]
    fn test_fire_needs_input() {
        let mut game = Game::new(still_config()).unwrap();
        tick(&mut game, &TickInput::default(), SIM_DT, &Open).unwrap();
        assert_eq!(game.phase, GamePhase::Aiming);

        tick(&mut game, &fire(), SIM_DT, &Open).unwrap();
        assert_eq!(game.phase, GamePhase::InFlight);
        let projectile = game.projectile.as_ref().unwrap();
        assert!(projectile.pos.y > game.config.launch_point.y);
    }

    #[test]
    fn test_descent_and_loss() {
        let config = GameConfig {
            descent_speed: 100.0,
            ..Default::default()
        };
        let mut game = Game::new(config).unwrap();
        let start = game.transform.origin.y;

        for _ in 0..600 {
            tick(&mut game, &TickInput::default(), SIM_DT, &Open).unwrap();
        }

        assert_eq!(game.phase, GamePhase::Lost);
        assert!(!game.can_fire);
        assert!(!game.can_move);
        assert!(game.transform.origin.y < start);

        // Frozen once over
        let ticks = game.time_ticks;
        let origin = game.transform.origin;
        tick(&mut game, &fire(), SIM_DT, &Open).unwrap();
        assert_eq!(game.time_ticks, ticks);
        assert_eq!(game.transform.origin, origin);
    }

    #[test]
    fn test_shot_into_real_grid() {
        // Full top row of color 1; a color 2 shot straight up sticks under it
        let mut game = Game::empty(still_config()).unwrap();
        for column in 0..8 {
            game.place_bubble(Cell::new(3, column), 1).unwrap();
        }
        game.projectile.as_mut().unwrap().color = 2;

        let mut landed = None;
        for i in 0..600 {
            let input = if i == 0 { fire() } else { TickInput::default() };
            let collider = game.board_collider();
            tick(&mut game, &input, SIM_DT, &collider).unwrap();
            landed = game.drain_events().into_iter().find_map(|e| match e {
                GameEvent::ProjectileLanded { cell, inserted, .. } => Some((cell, inserted)),
                _ => None,
            });
            if landed.is_some() {
                break;
            }
        }

        let (cell, inserted) = landed.expect("projectile should reach the grid");
        assert!(inserted);
        assert_eq!(cell.row, 2);
        assert_eq!(game.grid.color_at(cell), Some(2));
        assert_eq!(game.grid.count(), 9);
        assert_eq!(game.phase, GamePhase::Aiming);
    }

    #[test]
    fn test_determinism() {
        // Two games with the same seed and inputs end up identical
        let config = GameConfig {
            seed: 99999,
            ..Default::default()
        };
        let mut game1 = Game::new(config.clone()).unwrap();
        let mut game2 = Game::new(config).unwrap();

        let inputs = [
            TickInput {
                aim: Some(Vec3::new(-0.3, 1.0, 0.0)),
                ..Default::default()
            },
            fire(),
            TickInput {
                aim: Some(Vec3::new(0.7, 1.0, 0.0)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for _ in 0..200 {
            for input in &inputs {
                let c1 = game1.board_collider();
                let c2 = game2.board_collider();
                tick(&mut game1, input, SIM_DT, &c1).unwrap();
                tick(&mut game2, input, SIM_DT, &c2).unwrap();
            }
        }

        assert_eq!(game1.time_ticks, game2.time_ticks);
        assert_eq!(game1.phase, game2.phase);
        assert_eq!(game1.grid.count(), game2.grid.count());
        assert_eq!(game1.drain_events(), game2.drain_events());
    }
}
