//! Pursuit: chase gating, path acquisition, and waypoint following.
//!
//! Every tick each enemy re-evaluates the chase predicate against the
//! tracked target position (passed in through [`ChaseTarget`], never read
//! from a global registry). While chasing, the enemy asks the external
//! pathfinder for a fresh grid path and walks a cursor along the converted
//! world-space waypoints, emitting directional and jump intents for the
//! state machine. Losing the chase clears the path and every intent at
//! once.
//!
//! Replanning is not throttled beyond the chase gate itself: an enemy that
//! keeps chasing replans every tick, which makes `create_path` the hot path
//! of this module.

use bevy::prelude::*;
use glam::{IVec2, Vec2};
use log::trace;

use crate::components::{Chase, FlyingEnemy, MoveIntent, Player, Position, PursuitPath};
use crate::constants::{PATH_SLACK_X, PATH_SLACK_Y};
use crate::grid::TileGrid;

/// Position the pursuit systems steer toward, refreshed each tick.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct ChaseTarget {
    /// World-space position of the tracked target.
    pub position: Vec2,
}

/// External pathfinder contract. The path is consumed as-is: empty or
/// partial results are accepted and simply leave the follower idle until
/// the next replan.
pub trait PathPlanner {
    /// Plans a path between two grid cells. Returns whether a path was
    /// found; the cells are retrieved separately via
    /// [`PathPlanner::last_path`].
    fn create_path(
        &mut self,
        origin: IVec2,
        destination: IVec2,
        slack_x: i32,
        slack_y: i32,
        max_jump_height: i32,
    ) -> bool;

    /// Grid cells of the most recent plan, in walk order. May be empty.
    fn last_path(&self) -> &[IVec2];
}

/// Resource wrapping the installed pathfinder.
#[derive(Resource)]
pub struct Planner(pub Box<dyn PathPlanner + Send + Sync>);

impl Default for Planner {
    fn default() -> Self {
        Self(Box::new(NullPlanner))
    }
}

/// Pathfinder that never finds a path; enemies gate on chase but stay put.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPlanner;

impl PathPlanner for NullPlanner {
    fn create_path(&mut self, _: IVec2, _: IVec2, _: i32, _: i32, _: i32) -> bool {
        false
    }

    fn last_path(&self) -> &[IVec2] {
        &[]
    }
}

/// Copies the player position into [`ChaseTarget`]. Embedders tracking a
/// different target can replace this by writing the resource themselves.
pub fn sync_chase_target_system(
    players: Query<&Position, With<Player>>,
    mut target: ResMut<ChaseTarget>,
) {
    if let Some(position) = players.iter().next() {
        target.position = position.0;
    }
}

/// Re-evaluates the chase predicate for every enemy. Leaving the chase
/// clears the path and resets all movement intents immediately, overriding
/// whatever the follower emitted last tick.
pub fn chase_gate_system(
    target: Res<ChaseTarget>,
    mut enemies: Query<(&Position, &mut Chase, &mut PursuitPath, &mut MoveIntent)>,
) {
    for (position, mut chase, mut path, mut intent) in &mut enemies {
        let delta = target.position - position.0;
        chase.active = delta.x.abs() + delta.y.abs() < chase.minimum_distance;
        if !chase.active {
            path.clear();
            intent.clear();
        }
    }
}

/// Requests a fresh path for every chasing enemy and resets its cursor.
///
/// The plan result is accepted as-is; there is no retry. Waypoints are the
/// centres of the returned tiles.
pub fn plan_path_system(
    grid: Option<Res<TileGrid>>,
    target: Res<ChaseTarget>,
    mut planner: ResMut<Planner>,
    mut enemies: Query<(&Position, &Chase, &mut PursuitPath, &mut MoveIntent)>,
) {
    let Some(grid) = grid else {
        return;
    };
    for (position, chase, mut path, mut intent) in &mut enemies {
        if !chase.active {
            continue;
        }
        let origin = grid.world_to_cell(position.0);
        let destination = grid.world_to_cell(target.position);
        let found = planner.0.create_path(
            origin,
            destination,
            PATH_SLACK_X,
            PATH_SLACK_Y,
            chase.jump_height,
        );
        trace!("replan {origin:?} -> {destination:?}: found={found}");

        let waypoints = planner
            .0
            .last_path()
            .iter()
            .map(|cell| grid.cell_centre(*cell))
            .collect();
        path.replace(waypoints);
        intent.clear();
    }
}

/// Walks each enemy's cursor along its path, emitting movement intents.
///
/// The reached tests are deliberately asymmetric, matching long-standing
/// behaviour: X checks that the current waypoint lies between the previous
/// waypoint and the entity (direction-agnostic interval test), while Y
/// compares the entity against the current waypoint only. See the pursuit
/// tests for the pinned behaviour.
pub fn follow_path_system(
    mut enemies: Query<(
        &Position,
        &mut PursuitPath,
        &mut MoveIntent,
        Option<&FlyingEnemy>,
    )>,
) {
    for (position, mut path, mut intent, flier) in &mut enemies {
        if path.waypoints.is_empty() {
            continue;
        }
        intent.clear();

        let (Some(previous), Some(current)) = (
            path.waypoints.get(path.previous).copied(),
            path.waypoints.get(path.current).copied(),
        ) else {
            // Cursor ran past a shrunken path; treat it as consumed.
            path.clear();
            continue;
        };

        let reached_x = (previous.x <= current.x && current.x <= position.0.x)
            || (previous.x >= current.x && current.x >= position.0.x);
        let reached_y = (previous.y <= current.y && position.0.y >= current.y)
            || (previous.y >= current.y && position.0.y <= current.y);

        if !reached_x {
            if position.0.x < current.x {
                intent.right = true;
            } else if position.0.x > current.x {
                intent.left = true;
            }
        }

        if !reached_y {
            if position.0.y > current.y {
                // Waypoint is above us (Y grows downward): ascend.
                intent.jump = true;
            } else if flier.is_some() && position.0.y < current.y {
                intent.down = true;
            }
        }

        if reached_x && reached_y {
            path.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_reset_matches_path_length() {
        let mut path = PursuitPath::default();
        path.replace(vec![Vec2::ZERO, Vec2::ONE, Vec2::splat(2.0)]);
        assert_eq!((path.previous, path.current, path.next), (0, 1, Some(2)));

        path.replace(vec![Vec2::ZERO, Vec2::ONE]);
        assert_eq!((path.previous, path.current, path.next), (0, 1, None));

        path.replace(vec![Vec2::ZERO]);
        assert_eq!((path.previous, path.current, path.next), (0, 0, None));
    }

    #[test]
    fn advancing_past_the_end_clears_the_path() {
        let mut path = PursuitPath::default();
        path.replace(vec![Vec2::ZERO, Vec2::ONE]);
        path.advance();
        assert!(path.waypoints.is_empty());
        assert_eq!((path.previous, path.current, path.next), (0, 0, None));
    }
}
