//! Tile grid: world/grid coordinate conversion and a tile-based obstacle
//! index.
//!
//! The grid is a read-only collaborator for the movement core: pursuit uses
//! the coordinate conversions to talk to the pathfinder, the death check
//! reads the world's pixel height, and [`TileObstacleQuery`] implements the
//! directional clearance contract over the grid's solid cells.

use bevy::prelude::*;
use glam::{IVec2, Vec2};
use hashbrown::HashSet;

use crate::collision::ObstacleQuery;
use crate::components::Bounds;
use crate::numeric::{floor_to_i32, span_last_cell};

/// Tile map dimensions and solid-cell index.
#[derive(Resource, Debug, Clone)]
pub struct TileGrid {
    /// Map width in tiles.
    pub width: i32,
    /// Map height in tiles.
    pub height: i32,
    /// Tile width in world units.
    pub tile_width: i32,
    /// Tile height in world units.
    pub tile_height: i32,
    solid: HashSet<IVec2>,
}

impl TileGrid {
    /// Creates an empty grid of `width` by `height` tiles.
    #[must_use]
    pub fn new(width: i32, height: i32, tile_width: i32, tile_height: i32) -> Self {
        Self {
            width,
            height,
            tile_width,
            tile_height,
            solid: HashSet::new(),
        }
    }

    /// Marks `cell` as solid.
    pub fn set_solid(&mut self, cell: IVec2) {
        self.solid.insert(cell);
    }

    /// Whether `cell` is solid. Cells outside the map are open.
    #[must_use]
    pub fn is_solid(&self, cell: IVec2) -> bool {
        self.solid.contains(&cell)
    }

    /// Converts a world-space point to the grid cell containing it.
    #[must_use]
    pub fn world_to_cell(&self, point: Vec2) -> IVec2 {
        IVec2::new(
            floor_to_i32(point.x / self.tile_width as f32),
            floor_to_i32(point.y / self.tile_height as f32),
        )
    }

    /// World-space position of a cell's top-left corner.
    #[must_use]
    pub fn cell_to_world(&self, cell: IVec2) -> Vec2 {
        Vec2::new(
            (cell.x * self.tile_width) as f32,
            (cell.y * self.tile_height) as f32,
        )
    }

    /// World-space position of a cell's centre; waypoints are tile-centred.
    #[must_use]
    pub fn cell_centre(&self, cell: IVec2) -> Vec2 {
        self.cell_to_world(cell)
            + Vec2::new(self.tile_width as f32 / 2.0, self.tile_height as f32 / 2.0)
    }

    /// Map height in world units; entities below this line are dead.
    #[must_use]
    pub fn pixel_height(&self) -> f32 {
        (self.height * self.tile_height) as f32
    }
}

/// Clearances smaller than this count as contact. Integration accumulates
/// float dust around tile boundaries; without the snap an entity can stall
/// a few micro-units above a floor, below the velocity threshold, and never
/// report grounded.
const CONTACT_EPSILON: f32 = 1e-3;

fn contact_snap(clearance: f32) -> f32 {
    if clearance.abs() < CONTACT_EPSILON {
        0.0
    } else {
        clearance
    }
}

/// Directional clearance queries over a [`TileGrid`]'s solid cells.
///
/// Distances follow the collision-clamp sign contract: right/bottom return
/// non-negative clearance, left/top non-positive, and zero means resting
/// contact (within [`CONTACT_EPSILON`]). When no solid cell exists in the
/// queried direction the result is the extreme of the axis, meaning
/// "unbounded".
#[derive(Debug, Clone)]
pub struct TileObstacleQuery {
    grid: TileGrid,
}

impl TileObstacleQuery {
    /// Builds the query over a snapshot of `grid`.
    #[must_use]
    pub fn new(grid: TileGrid) -> Self {
        Self { grid }
    }

    fn row_span(&self, bounds: &Bounds) -> (i32, i32) {
        let first = floor_to_i32(bounds.y / self.grid.tile_height as f32);
        let last = span_last_cell(bounds.y, bounds.h, self.grid.tile_height as f32);
        (first, last)
    }

    fn col_span(&self, bounds: &Bounds) -> (i32, i32) {
        let first = floor_to_i32(bounds.x / self.grid.tile_width as f32);
        let last = span_last_cell(bounds.x, bounds.w, self.grid.tile_width as f32);
        (first, last)
    }

    fn any_solid_in_rows(&self, col: i32, rows: (i32, i32)) -> bool {
        (rows.0..=rows.1).any(|row| self.grid.is_solid(IVec2::new(col, row)))
    }

    fn any_solid_in_cols(&self, row: i32, cols: (i32, i32)) -> bool {
        (cols.0..=cols.1).any(|col| self.grid.is_solid(IVec2::new(col, row)))
    }
}

impl ObstacleQuery for TileObstacleQuery {
    fn distance_to_right(&self, bounds: &Bounds) -> f32 {
        let rows = self.row_span(bounds);
        let start = floor_to_i32(bounds.right() / self.grid.tile_width as f32);
        for col in start..self.grid.width {
            if self.any_solid_in_rows(col, rows) {
                let clearance = (col * self.grid.tile_width) as f32 - bounds.right();
                return contact_snap(clearance.max(0.0));
            }
        }
        f32::MAX
    }

    fn distance_to_left(&self, bounds: &Bounds) -> f32 {
        let rows = self.row_span(bounds);
        let start = floor_to_i32(bounds.x / self.grid.tile_width as f32);
        for col in (0..=start.min(self.grid.width - 1)).rev() {
            if self.any_solid_in_rows(col, rows) {
                let clearance = ((col + 1) * self.grid.tile_width) as f32 - bounds.x;
                return contact_snap(clearance.min(0.0));
            }
        }
        f32::MIN
    }

    fn distance_to_top(&self, bounds: &Bounds) -> f32 {
        let cols = self.col_span(bounds);
        let start = floor_to_i32(bounds.y / self.grid.tile_height as f32);
        for row in (0..=start.min(self.grid.height - 1)).rev() {
            if self.any_solid_in_cols(row, cols) {
                let clearance = ((row + 1) * self.grid.tile_height) as f32 - bounds.y;
                return contact_snap(clearance.min(0.0));
            }
        }
        f32::MIN
    }

    fn distance_to_bottom(&self, bounds: &Bounds) -> f32 {
        let cols = self.col_span(bounds);
        let start = floor_to_i32(bounds.bottom() / self.grid.tile_height as f32);
        for row in start..self.grid.height {
            if self.any_solid_in_cols(row, cols) {
                let clearance = (row * self.grid.tile_height) as f32 - bounds.bottom();
                return contact_snap(clearance.max(0.0));
            }
        }
        f32::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with_floor() -> TileGrid {
        // 8x8 tiles of 16px; row 6 is a solid floor.
        let mut grid = TileGrid::new(8, 8, 16, 16);
        for x in 0..8 {
            grid.set_solid(IVec2::new(x, 6));
        }
        grid
    }

    #[test]
    fn bottom_clearance_above_floor() {
        let query = TileObstacleQuery::new(grid_with_floor());
        let bounds = Bounds {
            x: 20.0,
            y: 60.0,
            w: 10.0,
            h: 16.0,
        };
        // Floor top edge sits at 96; collider bottom at 76.
        assert!((query.distance_to_bottom(&bounds) - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn resting_contact_is_exactly_zero() {
        let query = TileObstacleQuery::new(grid_with_floor());
        let bounds = Bounds {
            x: 20.0,
            y: 80.0,
            w: 10.0,
            h: 16.0,
        };
        assert_eq!(query.distance_to_bottom(&bounds), 0.0);
    }

    #[test]
    fn open_directions_are_unbounded() {
        let query = TileObstacleQuery::new(grid_with_floor());
        let bounds = Bounds {
            x: 20.0,
            y: 20.0,
            w: 10.0,
            h: 10.0,
        };
        assert_eq!(query.distance_to_right(&bounds), f32::MAX);
        assert_eq!(query.distance_to_left(&bounds), f32::MIN);
        assert_eq!(query.distance_to_top(&bounds), f32::MIN);
    }

    #[test]
    fn wall_clearance_left_is_non_positive() {
        let mut grid = grid_with_floor();
        grid.set_solid(IVec2::new(0, 5));
        let query = TileObstacleQuery::new(grid);
        let bounds = Bounds {
            x: 24.0,
            y: 80.0,
            w: 10.0,
            h: 16.0,
        };
        // Wall right edge at 16; collider left edge at 24.
        assert!((query.distance_to_left(&bounds) + 8.0).abs() < f32::EPSILON);
    }
}
