//! Bubble Pop headless runner
//!
//! Plays a deterministic session with a wandering cannon and logs what
//! happens. Pass a JSON config path as the first argument to override the
//! defaults; set `RUST_LOG=debug` for a shot-by-shot log.

use std::process::ExitCode;

use bubble_pop::consts::*;
use bubble_pop::presenter::present;
use bubble_pop::sim::{Game, GamePhase, TickInput, tick};
use bubble_pop::{GameConfig, LogPresenter, direction_from_angle};

/// Give up after this many simulated seconds
const MAX_SECONDS: u64 = 600;

fn main() -> ExitCode {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log::error!("{}", err);
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(err) => {
            log::error!("Could not start game: {}", err);
            return ExitCode::FAILURE;
        }
    };
    let mut presenter = LogPresenter;
    present(&game.drain_events(), &mut presenter);

    let max_ticks = MAX_SECONDS * SIM_HZ as u64;
    let ceiling = game.config.grid_origin.y + game.config.bubble_spacing * game.config.grid_height as f32;

    while !game.phase.is_over() && game.time_ticks < max_ticks {
        // Sweep the cannon back and forth and fire whenever a shot is staged
        let t = game.time_ticks as f32 * SIM_DT;
        let input = TickInput {
            aim: Some(direction_from_angle((t * 0.7).sin() * game.config.max_aim_radians())),
            fire: game.can_fire,
        };

        let collider = game.board_collider().with_ceiling(ceiling);
        if let Err(err) = tick(&mut game, &input, SIM_DT, &collider) {
            log::error!("Simulation stopped: {}", err);
            return ExitCode::FAILURE;
        }
        present(&game.drain_events(), &mut presenter);
    }

    let seconds = game.time_ticks as f32 * SIM_DT;
    match game.phase {
        GamePhase::Won => log::info!("Cleared the grid in {:.1}s", seconds),
        GamePhase::Lost => log::info!("Grid reached the line after {:.1}s, {} bubbles left", seconds, game.grid.count()),
        _ => log::info!("Stopped after {:.1}s with {} bubbles left", seconds, game.grid.count()),
    }
    ExitCode::SUCCESS
}
