//! Per-axis collision clamp.
//!
//! Given the displacement the integrator proposed, each axis is bounded by
//! the signed clearance to the nearest obstacle in the direction of motion,
//! so an entity can never tunnel regardless of speed. The vertical axis is
//! resolved before the horizontal one: grounded state must settle before
//! consumers branch on it later in the tick.
//!
//! Zero clearance is resting contact, not an error. Downward contact sets
//! the grounded flag; upward contact also zeroes the vertical target speed
//! so it cannot re-accumulate against a ceiling.

use bevy::prelude::*;

use crate::components::{
    Collider, FlyingEnemy, GroundEnemy, Grounded, MotionTunables, Player, PlayerState, Position,
    TargetSpeed, Velocity,
};

/// Directional clearance contract consumed by the clamp.
///
/// Every method returns a signed distance from the collider edge to the
/// nearest obstacle: right/bottom non-negative, left/top non-positive,
/// zero meaning contact.
pub trait ObstacleQuery {
    /// Clearance from the right edge, `>= 0`.
    fn distance_to_right(&self, bounds: &crate::components::Bounds) -> f32;
    /// Clearance from the left edge, `<= 0`.
    fn distance_to_left(&self, bounds: &crate::components::Bounds) -> f32;
    /// Clearance from the top edge, `<= 0`.
    fn distance_to_top(&self, bounds: &crate::components::Bounds) -> f32;
    /// Clearance from the bottom edge, `>= 0`.
    fn distance_to_bottom(&self, bounds: &crate::components::Bounds) -> f32;
}

/// Resource wrapping the installed obstacle index.
#[derive(Resource)]
pub struct Obstacles(pub Box<dyn ObstacleQuery + Send + Sync>);

impl Default for Obstacles {
    fn default() -> Self {
        Self(Box::new(OpenWorld))
    }
}

/// Obstacle index with no obstacles at all; every direction is unbounded.
/// Entities over an open world never become grounded.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenWorld;

impl ObstacleQuery for OpenWorld {
    fn distance_to_right(&self, _bounds: &crate::components::Bounds) -> f32 {
        f32::MAX
    }

    fn distance_to_left(&self, _bounds: &crate::components::Bounds) -> f32 {
        f32::MIN
    }

    fn distance_to_top(&self, _bounds: &crate::components::Bounds) -> f32 {
        f32::MIN
    }

    fn distance_to_bottom(&self, _bounds: &crate::components::Bounds) -> f32 {
        f32::MAX
    }
}

/// Outcome of a vertical clamp, applied back onto the entity by the caller.
struct VerticalResolution {
    /// Grounded state, when the downward query ran.
    grounded: Option<bool>,
    /// Whether the upward clamp stopped the entity dead on a ceiling.
    hit_ceiling: bool,
}

/// Clamps `velocity_y` against the nearest obstacle above or below.
#[expect(
    clippy::float_cmp,
    reason = "Resting contact is exactly zero by the clearance contract."
)]
fn clamp_vertical(
    velocity_y: &mut f32,
    bounds: &crate::components::Bounds,
    obstacles: &dyn ObstacleQuery,
) -> VerticalResolution {
    if *velocity_y < 0.0 {
        // Moving up; clearance above is non-positive.
        *velocity_y = velocity_y.max(obstacles.distance_to_top(bounds));
        VerticalResolution {
            grounded: None,
            hit_ceiling: *velocity_y == 0.0,
        }
    } else {
        let distance = obstacles.distance_to_bottom(bounds);
        *velocity_y = velocity_y.min(distance);
        VerticalResolution {
            grounded: Some(distance == 0.0),
            hit_ceiling: false,
        }
    }
}

/// Clamps `velocity_x` against the nearest obstacle in the direction of
/// horizontal motion.
fn clamp_horizontal(
    velocity_x: &mut f32,
    bounds: &crate::components::Bounds,
    obstacles: &dyn ObstacleQuery,
) {
    if *velocity_x > 0.0 {
        *velocity_x = velocity_x.min(obstacles.distance_to_right(bounds));
    } else if *velocity_x < 0.0 {
        *velocity_x = velocity_x.max(obstacles.distance_to_left(bounds));
    }
}

/// Snaps `value` to exactly zero when its magnitude is below `threshold`,
/// preventing sub-pixel jitter at rest.
fn snap_to_zero(value: &mut f32, threshold: f32) {
    if value.abs() < threshold {
        *value = 0.0;
    }
}

/// Vertical step shared by every entity kind: clamp (unless skipped), snap,
/// advance position, reposition the collider.
#[expect(
    clippy::too_many_arguments,
    reason = "The step touches every kinematic component by design."
)]
fn step_vertical(
    position: &mut Position,
    velocity: &mut Velocity,
    target: &mut TargetSpeed,
    grounded: Option<&mut Grounded>,
    collider: &mut Collider,
    tunables: &MotionTunables,
    obstacles: &dyn ObstacleQuery,
    skip_clamp: bool,
) {
    if !skip_clamp {
        let resolution = clamp_vertical(&mut velocity.0.y, &collider.bounds, obstacles);
        if resolution.hit_ceiling {
            target.0.y = 0.0;
        }
        if let (Some(grounded), Some(on_ground)) = (grounded, resolution.grounded) {
            grounded.0 = on_ground;
        }
    }
    snap_to_zero(&mut velocity.0.y, tunables.threshold);
    position.0.y += velocity.0.y;
    collider.bounds.y = position.0.y + tunables.collider_offset;
}

/// Horizontal step shared by every entity kind.
fn step_horizontal(
    position: &mut Position,
    velocity: &mut Velocity,
    collider: &mut Collider,
    tunables: &MotionTunables,
    obstacles: &dyn ObstacleQuery,
    skip_clamp: bool,
) {
    if !skip_clamp {
        clamp_horizontal(&mut velocity.0.x, &collider.bounds, obstacles);
    }
    snap_to_zero(&mut velocity.0.x, tunables.threshold);
    position.0.x += velocity.0.x;
    collider.bounds.x = position.0.x;
}

/// Collision-clamps and moves the player. God mode skips the obstacle clamp
/// entirely (including the grounded update) but keeps the threshold snap.
pub fn step_player_system(
    obstacles: Res<Obstacles>,
    mut players: Query<
        (
            &mut Position,
            &mut Velocity,
            &mut TargetSpeed,
            &mut Grounded,
            &mut Collider,
            &PlayerState,
            &MotionTunables,
        ),
        With<Player>,
    >,
) {
    for (mut position, mut velocity, mut target, mut grounded, mut collider, state, tunables) in
        &mut players
    {
        let skip_clamp = *state == PlayerState::God;
        step_vertical(
            &mut position,
            &mut velocity,
            &mut target,
            Some(&mut grounded),
            &mut collider,
            tunables,
            obstacles.0.as_ref(),
            skip_clamp,
        );
        step_horizontal(
            &mut position,
            &mut velocity,
            &mut collider,
            tunables,
            obstacles.0.as_ref(),
            skip_clamp,
        );
    }
}

/// Collision-clamps and moves walking enemies.
pub fn step_enemy_system(
    obstacles: Res<Obstacles>,
    mut enemies: Query<
        (
            &mut Position,
            &mut Velocity,
            &mut TargetSpeed,
            &mut Grounded,
            &mut Collider,
            &MotionTunables,
        ),
        With<GroundEnemy>,
    >,
) {
    for (mut position, mut velocity, mut target, mut grounded, mut collider, tunables) in
        &mut enemies
    {
        step_vertical(
            &mut position,
            &mut velocity,
            &mut target,
            Some(&mut grounded),
            &mut collider,
            tunables,
            obstacles.0.as_ref(),
            false,
        );
        step_horizontal(
            &mut position,
            &mut velocity,
            &mut collider,
            tunables,
            obstacles.0.as_ref(),
            false,
        );
    }
}

/// Collision-clamps and moves fliers. Fliers still collide with the world
/// but never write the grounded flag; they hover rather than land.
pub fn step_flier_system(
    obstacles: Res<Obstacles>,
    mut fliers: Query<
        (
            &mut Position,
            &mut Velocity,
            &mut TargetSpeed,
            &mut Collider,
            &MotionTunables,
        ),
        With<FlyingEnemy>,
    >,
) {
    for (mut position, mut velocity, mut target, mut collider, tunables) in &mut fliers {
        step_vertical(
            &mut position,
            &mut velocity,
            &mut target,
            None,
            &mut collider,
            tunables,
            obstacles.0.as_ref(),
            false,
        );
        step_horizontal(
            &mut position,
            &mut velocity,
            &mut collider,
            tunables,
            obstacles.0.as_ref(),
            false,
        );
    }
}
