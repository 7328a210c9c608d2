//! Headless demo: runs the simulation for a fixed number of ticks while
//! scripted input walks the player toward a chasing enemy.

use anyhow::Result;
use bevy::prelude::*;
use clap::Parser;
use glam::{IVec2, Vec2};
use log::info;

use gully::collision::Obstacles;
use gully::grid::{TileGrid, TileObstacleQuery};
use gully::input::{Action, ControlInput};
use gully::spawn::{spawn_ground_enemy, spawn_player, EntityConfig};
use gully::{init_logging, GullyPlugin, PlayerState, Position, ReloadRequest};

/// Per-tick platformer movement simulation
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Number of simulation ticks to run
    #[arg(short, long, default_value_t = 300)]
    ticks: u32,
}

fn demo_grid() -> TileGrid {
    // 40x24 tiles of 16px with a floor and a small step.
    let mut grid = TileGrid::new(40, 24, 16, 16);
    for x in 0..40 {
        grid.set_solid(IVec2::new(x, 20));
    }
    for x in 25..28 {
        grid.set_solid(IVec2::new(x, 19));
    }
    grid
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let grid = demo_grid();

    let mut app = App::new();
    app.insert_resource(Obstacles(Box::new(TileObstacleQuery::new(grid.clone()))))
        .insert_resource(grid)
        .add_plugins(GullyPlugin);

    let player = spawn_player(
        app.world_mut(),
        &EntityConfig::default(),
        Vec2::new(64.0, 280.0),
    );
    spawn_ground_enemy(
        app.world_mut(),
        &EntityConfig::default(),
        Vec2::new(500.0, 280.0),
    );

    for tick in 0..args.ticks {
        {
            let mut input = app.world_mut().resource_mut::<ControlInput>();
            input.tick();
            if tick == 0 {
                input.press(Action::Right);
            }
        }
        app.update();

        if tick % 30 == 0 {
            if let Some(position) = app.world().get::<Position>(player) {
                info!("tick {tick}: player at {:?}", position.0);
            }
        }
    }

    if app.world().resource::<ReloadRequest>().0 {
        info!("player died; level reload was requested");
    }
    if let Some(state) = app.world().get::<PlayerState>(player) {
        info!("final player state: {state:?}");
    }
    Ok(())
}
