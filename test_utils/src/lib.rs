//! Shared helpers for integration tests: canned worlds, scripted
//! collaborators, and input shorthand.

use bevy::prelude::*;
use glam::IVec2;

use gully::collision::Obstacles;
use gully::grid::{TileGrid, TileObstacleQuery};
use gully::input::{Action, ControlInput};
use gully::pursuit::PathPlanner;
use gully::GullyPlugin;

/// A 16x16-tile grid with 16px tiles and a solid floor along `floor_row`.
pub fn floor_grid(floor_row: i32) -> TileGrid {
    let mut grid = TileGrid::new(16, 16, 16, 16);
    for x in 0..16 {
        grid.set_solid(IVec2::new(x, floor_row));
    }
    grid
}

/// Builds an app with the plugin installed over `grid`'s obstacles.
pub fn app_with_grid(grid: TileGrid) -> App {
    let mut app = App::new();
    app.insert_resource(Obstacles(Box::new(TileObstacleQuery::new(grid.clone()))))
        .insert_resource(grid)
        .add_plugins(GullyPlugin);
    app
}

/// Builds an app with the plugin and a floor at row 12 (world Y 192).
pub fn sim_app() -> App {
    app_with_grid(floor_grid(12))
}

/// Advances input edges then runs one simulation tick.
pub fn step(app: &mut App) {
    app.world_mut().resource_mut::<ControlInput>().tick();
    app.update();
}

/// Registers a key-down edge for `action`.
pub fn press(app: &mut App, action: Action) {
    app.world_mut().resource_mut::<ControlInput>().press(action);
}

/// Registers a key-up edge for `action`.
pub fn release(app: &mut App, action: Action) {
    app.world_mut()
        .resource_mut::<ControlInput>()
        .release(action);
}

/// Pathfinder stub returning a fixed cell sequence on every plan.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPlanner {
    /// Cells handed back by every [`PathPlanner::last_path`] call.
    pub cells: Vec<IVec2>,
    /// Number of `create_path` calls observed.
    pub plans: usize,
}

impl ScriptedPlanner {
    /// Builds a planner that always returns `cells`.
    pub fn with_cells(cells: Vec<IVec2>) -> Self {
        Self { cells, plans: 0 }
    }
}

impl PathPlanner for ScriptedPlanner {
    fn create_path(&mut self, _: IVec2, _: IVec2, _: i32, _: i32, _: i32) -> bool {
        self.plans += 1;
        !self.cells.is_empty()
    }

    fn last_path(&self) -> &[IVec2] {
        &self.cells
    }
}
